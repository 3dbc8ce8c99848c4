use http::StatusCode;
use tracing::{info, warn};

use super::{ErrorContext, ExceptionFilter};
use crate::failure::{AppError, ErrorType, FieldViolation, build_error_body};
use crate::response::Response;

/// Renders [`AppError::Validation`] as 400 with field details, logging one
/// warning per offending property.
#[derive(Clone, Copy, Debug)]
pub struct ValidationFilter;

impl ValidationFilter {
    pub fn new() -> Self {
        info!("Register ValidationExceptionFilter");
        Self
    }
}

impl Default for ValidationFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionFilter for ValidationFilter {
    fn name(&self) -> &'static str {
        "ValidationExceptionFilter"
    }

    fn matches(&self, error: &AppError) -> bool {
        matches!(error, AppError::Validation(_))
    }

    fn handle(&self, error: &AppError, ctx: ErrorContext<'_>) -> Response {
        let details: &[FieldViolation] = match error {
            AppError::Validation(e) => e.details(),
            _ => &[],
        };
        for field in details {
            warn!(path = ctx.path, "[{}] — {}", field.property, field.messages.join(", "));
        }

        let body = build_error_body(ErrorType::ValidationError, error.to_string(), Some(details));
        Response::error(StatusCode::BAD_REQUEST, &body)
    }
}
