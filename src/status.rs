//! The fixed status vocabulary used by response helpers and errors.
//!
//! Handlers never pick a free-form status code. Use [`Status`] anywhere a
//! status is accepted: the [`Response`](crate::Response) helpers and
//! [`HttpError::new`](crate::HttpError::new).
//!
//! ```rust
//! use sluice::{HttpError, Status};
//!
//! let err = HttpError::new(Status::NotFound, "no such offer", "OfferController");
//! assert_eq!(err.status().as_u16(), 404);
//! ```

use http::StatusCode;

/// Status codes the pipeline knows how to produce.
#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    Created,             // 201
    NoContent,           // 204

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    Unauthorized,        // 401
    Forbidden,           // 403
    NotFound,            // 404
    Conflict,            // 409

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
    NotImplemented,      // 501
}

impl From<Status> for StatusCode {
    fn from(s: Status) -> StatusCode {
        match s {
            Status::Ok                  => StatusCode::OK,
            Status::Created             => StatusCode::CREATED,
            Status::NoContent           => StatusCode::NO_CONTENT,
            Status::BadRequest          => StatusCode::BAD_REQUEST,
            Status::Unauthorized        => StatusCode::UNAUTHORIZED,
            Status::Forbidden           => StatusCode::FORBIDDEN,
            Status::NotFound            => StatusCode::NOT_FOUND,
            Status::Conflict            => StatusCode::CONFLICT,
            Status::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Status::NotImplemented      => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        StatusCode::from(s).as_u16()
    }
}
