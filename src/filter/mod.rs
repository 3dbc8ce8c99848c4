//! Exception filter chain.
//!
//! Every [`AppError`] raised by a middleware stage, a handler, or the router
//! itself ends up here exactly once. Filters are tried in registration order;
//! the first whose [`matches`](ExceptionFilter::matches) returns `true`
//! renders the response and logs the failure, and the chain stops.
//!
//! The catch-all is not an ordinary entry: it is supplied to
//! [`FilterChain::new`] and always runs last, so no error can fall through
//! without a response.
//!
//! ```rust
//! use sluice::filter::{AppFilter, FilterChain, HttpErrorFilter, ValidationFilter};
//!
//! let chain = FilterChain::new(AppFilter::new())
//!     .with(ValidationFilter::new())
//!     .with(HttpErrorFilter::new());
//! assert_eq!(
//!     chain.names(),
//!     ["ValidationExceptionFilter", "HttpErrorExceptionFilter", "AppExceptionFilter"],
//! );
//! ```

use std::sync::Arc;

use http::Method;

use crate::failure::AppError;
use crate::response::Response;

mod app;
mod http_error;
mod validation;

pub use app::AppFilter;
pub use http_error::HttpErrorFilter;
pub use validation::ValidationFilter;

/// Where the failing request was headed.
#[derive(Clone, Copy, Debug)]
pub struct ErrorContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
}

/// Claims and renders one kind of error.
pub trait ExceptionFilter: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Decides applicability from the error's variant alone.
    fn matches(&self, error: &AppError) -> bool;

    /// Renders the response and logs the failure. Called at most once per error.
    fn handle(&self, error: &AppError, ctx: ErrorContext<'_>) -> Response;
}

/// Ordered filters ending in a catch-all.
pub struct FilterChain {
    filters: Vec<Arc<dyn ExceptionFilter>>,
    fallback: Arc<dyn ExceptionFilter>,
}

impl FilterChain {
    /// Starts a chain whose last resort is `fallback`.
    pub fn new(fallback: impl ExceptionFilter) -> Self {
        Self { filters: Vec::new(), fallback: Arc::new(fallback) }
    }

    /// Appends `filter` after the ones already registered, ahead of the
    /// catch-all. Register specific filters before general ones.
    pub fn with(mut self, filter: impl ExceptionFilter) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Produces the single response for `error`.
    pub fn handle(&self, error: AppError, ctx: ErrorContext<'_>) -> Response {
        let filter = self
            .filters
            .iter()
            .find(|f| f.matches(&error))
            .unwrap_or(&self.fallback);
        filter.handle(&error, ctx)
    }

    /// Filter names in the order they are tried.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|f| f.name())
            .collect()
    }
}

/// `[Validation, HttpError, catch-all]`.
impl Default for FilterChain {
    fn default() -> Self {
        Self::new(AppFilter::new())
            .with(ValidationFilter::new())
            .with(HttpErrorFilter::new())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::failure::{FieldViolation, HttpError, ValidationError};
    use crate::status::Status;

    /// Wraps a filter and counts how often each capability is used.
    struct Counting<F> {
        inner: F,
        handled: Arc<AtomicUsize>,
    }

    impl<F: ExceptionFilter> ExceptionFilter for Counting<F> {
        fn name(&self) -> &'static str {
            self.inner.name()
        }

        fn matches(&self, error: &AppError) -> bool {
            self.inner.matches(error)
        }

        fn handle(&self, error: &AppError, ctx: ErrorContext<'_>) -> Response {
            self.handled.fetch_add(1, Ordering::SeqCst);
            self.inner.handle(error, ctx)
        }
    }

    fn counting<F: ExceptionFilter>(inner: F) -> (Counting<F>, Arc<AtomicUsize>) {
        let handled = Arc::new(AtomicUsize::new(0));
        (Counting { inner, handled: Arc::clone(&handled) }, handled)
    }

    static GET: Method = Method::GET;

    fn ctx() -> ErrorContext<'static> {
        ErrorContext { method: &GET, path: "/offers" }
    }

    #[test]
    fn first_matching_filter_wins() {
        let (validation, v) = counting(ValidationFilter::new());
        let (http, h) = counting(HttpErrorFilter::new());
        let (app, a) = counting(AppFilter::new());
        let chain = FilterChain::new(app).with(validation).with(http);

        let res = chain.handle(HttpError::new(Status::NotFound, "gone", "Test").into(), ctx());
        assert_eq!(res.status().as_u16(), 404);
        assert_eq!((v.load(Ordering::SeqCst), h.load(Ordering::SeqCst), a.load(Ordering::SeqCst)), (0, 1, 0));

        let res = chain.handle(AppError::unclassified("boom"), ctx());
        assert_eq!(res.status().as_u16(), 500);
        assert_eq!((v.load(Ordering::SeqCst), h.load(Ordering::SeqCst), a.load(Ordering::SeqCst)), (0, 1, 1));

        let invalid = ValidationError::new("Invalid", vec![FieldViolation::new("price", ["must be >= 500"])]).unwrap();
        let res = chain.handle(invalid.into(), ctx());
        assert_eq!(res.status().as_u16(), 400);
        assert_eq!((v.load(Ordering::SeqCst), h.load(Ordering::SeqCst), a.load(Ordering::SeqCst)), (1, 1, 1));
    }

    #[test]
    fn catch_all_runs_when_nothing_else_is_registered() {
        let chain = FilterChain::new(AppFilter::new());
        let res = chain.handle(HttpError::new(Status::Conflict, "dup", "Test").into(), ctx());
        assert_eq!(res.status().as_u16(), 500);
    }

    #[test]
    fn default_order() {
        assert_eq!(
            FilterChain::default().names(),
            ["ValidationExceptionFilter", "HttpErrorExceptionFilter", "AppExceptionFilter"],
        );
    }
}
