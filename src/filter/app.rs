use http::StatusCode;
use tracing::{error, info};

use super::{ErrorContext, ExceptionFilter};
use crate::failure::{AppError, ErrorType, build_error_body};
use crate::response::Response;

/// Catch-all: any error reaching it becomes a 500 `ServiceError`.
///
/// The client receives the error's own message text. The server log gets the
/// full error, including its cause chain.
#[derive(Clone, Copy, Debug)]
pub struct AppFilter;

impl AppFilter {
    pub fn new() -> Self {
        info!("Register AppExceptionFilter");
        Self
    }
}

impl Default for AppFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionFilter for AppFilter {
    fn name(&self) -> &'static str {
        "AppExceptionFilter"
    }

    fn matches(&self, _error: &AppError) -> bool {
        true
    }

    fn handle(&self, error: &AppError, ctx: ErrorContext<'_>) -> Response {
        error!(method = %ctx.method, path = ctx.path, error = ?error, "{error}");

        let body = build_error_body(ErrorType::ServiceError, error.to_string(), None);
        Response::error(StatusCode::INTERNAL_SERVER_ERROR, &body)
    }
}
