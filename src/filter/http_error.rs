use http::StatusCode;
use tracing::{error, info};

use super::{ErrorContext, ExceptionFilter};
use crate::failure::{AppError, ErrorType, build_error_body};
use crate::response::Response;

/// Renders [`AppError::Http`] with the status the error carries.
#[derive(Clone, Copy, Debug)]
pub struct HttpErrorFilter;

impl HttpErrorFilter {
    pub fn new() -> Self {
        info!("Register HttpErrorExceptionFilter");
        Self
    }
}

impl Default for HttpErrorFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionFilter for HttpErrorFilter {
    fn name(&self) -> &'static str {
        "HttpErrorExceptionFilter"
    }

    fn matches(&self, error: &AppError) -> bool {
        matches!(error, AppError::Http(_))
    }

    fn handle(&self, error: &AppError, ctx: ErrorContext<'_>) -> Response {
        let (status, source) = match error {
            AppError::Http(e) => (e.status(), e.component()),
            _ => (StatusCode::BAD_REQUEST, self.name()),
        };
        error!(
            method = %ctx.method,
            path = ctx.path,
            source,
            status = status.as_u16(),
            "[HttpErrorException]: {} # {error}",
            ctx.path,
        );

        let body = build_error_body(ErrorType::CommonError, error.to_string(), None);
        Response::error(status, &body)
    }
}
