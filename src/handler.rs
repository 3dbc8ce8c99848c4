//! Route handlers and how the route table stores them.
//!
//! Every handler is its own concrete type, so the table keeps them behind one
//! trait object, `dyn ErasedHandler`.
//!
//! ```text
//! async fn show(req: Request) -> Result<Response, AppError>   ← user writes this
//!        ↓ Route::get("/:offerId", show)
//! show.into_boxed_handler()                                    ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))                                    ← heap-allocated wrapper
//!        ↓  kept in the table as BoxedHandler
//! handler.call(req)  at request time                           ← one vtable dispatch
//! ```
//!
//! Controllers that hold collaborators use [`bind`] to turn a method taking
//! `Arc<Self>` into a handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::failure::AppError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to the handler's outcome.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send + 'static>>;

/// Object-safe call interface behind [`BoxedHandler`]. Public only because
/// [`Handler::into_boxed_handler`] names it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Anything a [`Route`](crate::Route) accepts as its handler.
///
/// You never implement this yourself. It is satisfied by any `async fn` (or
/// closure returning a future) with the signature:
///
/// ```text
/// async fn name(req: Request) -> Result<impl IntoResponse, AppError>
/// ```
///
/// Returning `Err` hands the error to the exception filter chain.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, AppError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, AppError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype bridging a concrete handler `F` to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, AppError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

// ── State binding ─────────────────────────────────────────────────────────────

/// Binds shared state to a handler taking it as its first argument.
///
/// ```rust
/// use std::sync::Arc;
/// use sluice::{AppError, Request, Response, Route, handler::bind};
///
/// struct Greeter { word: &'static str }
///
/// impl Greeter {
///     async fn greet(self: Arc<Self>, _req: Request) -> Result<Response, AppError> {
///         Ok(Response::text(self.word))
///     }
/// }
///
/// let greeter = Arc::new(Greeter { word: "hi" });
/// let route = Route::get("/", bind(&greeter, Greeter::greet));
/// ```
pub fn bind<S, F, Fut, R>(state: &Arc<S>, f: F) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, AppError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let state = Arc::clone(state);
    move |req| f(Arc::clone(&state), req)
}
