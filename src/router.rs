//! Route table and request dispatch.
//!
//! One radix tree per HTTP method, O(path-length) lookup via [`matchit`].
//! Routes are grouped into [`Controller`]s, each mounted under its prefix at
//! startup. The table is immutable once the server starts.
//!
//! A request's lifecycle:
//!
//! ```text
//! global stages → lookup → route stages → handler → Response
//!        └──────────── any Err ─────────────┴──→ FilterChain → Response
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;
use tracing::{debug, info};

use crate::error::Error;
use crate::failure::{AppError, HttpError};
use crate::filter::{ErrorContext, FilterChain};
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{self, BoxedMiddleware, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

// ── Route ─────────────────────────────────────────────────────────────────────

/// A (method, path) binding to a handler and its ordered middleware.
///
/// Paths use `:name` segments for parameters: `/:offerId/comments`.
pub struct Route {
    method: Method,
    path: String,
    handler: BoxedHandler,
    middlewares: Vec<BoxedMiddleware>,
}

impl Route {
    pub fn new(method: Method, path: &str, handler: impl Handler) -> Self {
        Self {
            method,
            path: path.to_owned(),
            handler: handler.into_boxed_handler(),
            middlewares: Vec::new(),
        }
    }

    pub fn get(path: &str, handler: impl Handler) -> Self { Self::new(Method::GET, path, handler) }
    pub fn post(path: &str, handler: impl Handler) -> Self { Self::new(Method::POST, path, handler) }
    pub fn put(path: &str, handler: impl Handler) -> Self { Self::new(Method::PUT, path, handler) }
    pub fn patch(path: &str, handler: impl Handler) -> Self { Self::new(Method::PATCH, path, handler) }
    pub fn delete(path: &str, handler: impl Handler) -> Self { Self::new(Method::DELETE, path, handler) }

    /// Appends a stage; stages run in the order they are added.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// A group of routes sharing a mount prefix.
pub trait Controller: Send + Sync + 'static {
    /// Mount point, e.g. `/offers`.
    fn prefix(&self) -> &str;

    /// Builds the controller's routes, in match order.
    fn register_routes(self: Arc<Self>) -> Vec<Route>;
}

// ── Router ────────────────────────────────────────────────────────────────────

struct Endpoint {
    handler: BoxedHandler,
    middlewares: Vec<BoxedMiddleware>,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or call [`dispatch`](Router::dispatch) directly.
pub struct Router {
    trees: HashMap<Method, MatchitRouter<Arc<Endpoint>>>,
    registered: Vec<(Method, String)>,
    global: Vec<BoxedMiddleware>,
    filters: FilterChain,
}

impl Router {
    /// An empty router with the default filter chain.
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            registered: Vec::new(),
            global: Vec::new(),
            filters: FilterChain::default(),
        }
    }

    /// Adds a stage that runs for every request, before route lookup.
    pub fn global(mut self, middleware: impl Middleware) -> Self {
        self.global.push(Arc::new(middleware));
        self
    }

    /// Replaces the exception filter chain.
    pub fn filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Mounts every route of `controller` under its prefix.
    ///
    /// Fails on a duplicate (path, method) pair or a pattern that conflicts
    /// with one already mounted.
    pub fn mount<C: Controller>(mut self, controller: Arc<C>) -> Result<Self, Error> {
        let prefix = controller.prefix().to_owned();
        for route in controller.register_routes() {
            self.insert(&prefix, route)?;
        }
        Ok(self)
    }

    /// Mounts a single route at the root.
    pub fn route(mut self, route: Route) -> Result<Self, Error> {
        self.insert("", route)?;
        Ok(self)
    }

    fn insert(&mut self, prefix: &str, route: Route) -> Result<(), Error> {
        let Route { method, path, handler, middlewares } = route;
        let full = join(prefix, &path);
        let invalid = |reason: String| Error::Route { method: method.clone(), path: full.clone(), reason };

        if self.registered.iter().any(|(m, p)| *m == method && *p == full) {
            return Err(invalid("duplicate route".to_owned()));
        }
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(to_matchit(&full), Arc::new(Endpoint { handler, middlewares }))
            .map_err(|e| invalid(e.to_string()))?;

        info!("Route registered: {method} {full}");
        self.registered.push((method, full));
        Ok(())
    }

    /// Registered routes in mount order.
    pub fn routes(&self) -> &[(Method, String)] {
        &self.registered
    }

    /// Runs one request through the pipeline and produces its single response.
    pub async fn dispatch(&self, req: Request) -> Response {
        let method = req.method().clone();
        let path = req.path().to_owned();

        match self.execute(req).await {
            Ok(response) => {
                debug!(%method, path = %path, status = response.status().as_u16(), "handled");
                response
            }
            Err(error) => self.render(error, &method, &path),
        }
    }

    /// Renders `error` through the filter chain.
    pub(crate) fn render(&self, error: AppError, method: &Method, path: &str) -> Response {
        self.filters.handle(error, ErrorContext { method, path })
    }

    async fn execute(&self, mut req: Request) -> Result<Response, AppError> {
        middleware::run_stages(&self.global, &[], &mut req).await?;

        let (endpoint, params) = self.lookup(req.method(), req.path()).ok_or_else(|| {
            HttpError::new(Status::NotFound, format!("Cannot {} {}", req.method(), req.path()), "Router")
        })?;
        req.set_params(params);

        middleware::run_stages(&[], &endpoint.middlewares, &mut req).await?;
        endpoint.handler.call(req).await
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(Arc<Endpoint>, HashMap<String, String>)> {
        let tree = self.trees.get(method)?;
        let normalized = normalize(path);
        let matched = tree.at(&normalized).ok()?;
        let endpoint = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((endpoint, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

/// `("/offers", "/")` → `/offers`, `("", "/healthz")` → `/healthz`.
fn join(prefix: &str, path: &str) -> String {
    normalize(&format!("{}/{}", prefix.trim_end_matches('/'), path.trim_start_matches('/')))
}

/// Leading slash, no trailing slash (except the root).
fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// `/offers/:offerId` → `/offers/{offerId}`.
fn to_matchit(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
