//! Middleware layer.
//!
//! A middleware is a pre-handler stage. It inspects (and may enrich) the
//! request, then returns a control signal:
//!
//! - `Ok(())` continues to the next stage, and after the last one, to the handler;
//! - `Err(error)` aborts. Later stages and the handler never run, and the error
//!   goes straight to the exception filter chain.
//!
//! Stages run strictly in declared order, each at most once per request:
//! the router's global stages first, then the matched route's own stages.
//!
//! Built-in stages:
//! - [`Authenticate`] resolves a bearer token into an [`Identity`](crate::Identity)
//! - [`PrivateRoute`] rejects requests without an identity (401)
//! - [`ValidateObjectId`] rejects malformed identifier path segments (400)
//! - [`ValidateBody`] parses and validates a JSON body DTO (400)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::failure::AppError;
use crate::request::Request;

mod auth;
mod body;
mod object_id;

pub use auth::{Authenticate, PrivateRoute, TokenVerifier};
pub use body::{Validate, ValidateBody};
pub use object_id::{ValidateObjectId, is_object_id};

/// Control signal returned by a stage: `Ok(())` continues, `Err` aborts.
pub type Outcome = Result<(), AppError>;

/// A pre-handler pipeline stage.
///
/// Implementations are shared across concurrent requests and hold only
/// immutable configuration.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    /// Stage name, used as the `source` of errors it raises and in logs.
    fn name(&self) -> &'static str;

    async fn intercept(&self, req: &mut Request) -> Outcome;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Runs `global` then `route` stages in order, stopping at the first abort.
pub(crate) async fn run_stages(
    global: &[BoxedMiddleware],
    route: &[BoxedMiddleware],
    req: &mut Request,
) -> Outcome {
    for stage in global.iter().chain(route) {
        debug!(middleware = stage.name(), path = req.path(), "intercept");
        stage.intercept(req).await?;
    }
    Ok(())
}
