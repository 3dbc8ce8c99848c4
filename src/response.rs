//! Outgoing HTTP response and the fixed response-helper vocabulary.
//!
//! Handlers finish by returning one of the helpers below. A [`Response`] is a
//! plain value handed back to the router by move, so a request can only ever
//! produce one of them: there is no response object to write to twice.
//!
//! ```rust
//! use serde_json::json;
//! use sluice::Response;
//!
//! # fn demo() -> Result<(), sluice::AppError> {
//! Response::ok(&json!({"id": 1}))?;
//! Response::created(&json!({"id": 2}))?;
//! Response::no_content();
//! Response::not_found("no such offer");
//! # Ok(()) }
//! ```

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::failure::{AppError, ErrorBody, ErrorType, build_error_body};
use crate::projection::{Projection, project_as};
use crate::status::Status;

const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// An outgoing HTTP response.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
}

impl Response {
    // ── Success helpers ───────────────────────────────────────────────────────

    /// `200 OK` with `body` serialised as JSON.
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> Result<Self, AppError> {
        Self::json(Status::Ok, body)
    }

    /// `200 OK` with `source` projected through `P`'s shape.
    pub fn ok_as<P: Projection, T: Serialize + ?Sized>(source: &T) -> Result<Self, AppError> {
        Self::json(Status::Ok, &project_as::<P, T>(source)?)
    }

    /// `201 Created` with `body` serialised as JSON.
    pub fn created<T: Serialize + ?Sized>(body: &T) -> Result<Self, AppError> {
        Self::json(Status::Created, body)
    }

    /// `201 Created` with `source` projected through `P`'s shape.
    pub fn created_as<P: Projection, T: Serialize + ?Sized>(source: &T) -> Result<Self, AppError> {
        Self::json(Status::Created, &project_as::<P, T>(source)?)
    }

    /// `204 No Content`. A 204 never carries a body on the wire.
    pub fn no_content() -> Self {
        Self::empty(Status::NoContent)
    }

    // ── Error helpers ─────────────────────────────────────────────────────────

    /// `404` with a `CommonError` envelope.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::common_error(Status::NotFound, message)
    }

    /// `400` with a `CommonError` envelope.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::common_error(Status::BadRequest, message)
    }

    /// `401` with a `CommonError` envelope.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::common_error(Status::Unauthorized, message)
    }

    /// `501` with a `CommonError` envelope.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::common_error(Status::NotImplemented, message)
    }

    /// Renders an error envelope with an explicit status. Used by the
    /// exception filters.
    pub fn error(status: StatusCode, body: &ErrorBody) -> Self {
        Self::json_or_bare_500(status, body)
    }

    /// A body that will not serialise is logged and replaced by a bare 500.
    fn json_or_bare_500<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self { status, content_type: Some(JSON), body: bytes.into() },
            Err(e) => {
                error!(status = status.as_u16(), "cannot serialise error body: {e}");
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, content_type: None, body: Bytes::new() }
            }
        }
    }

    // ── Plain constructors ────────────────────────────────────────────────────

    /// `200 OK` as `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self { status: StatusCode::OK, content_type: Some(TEXT), body: Bytes::from(body.into()) }
    }

    /// Response with no body.
    pub fn empty(status: Status) -> Self {
        Self { status: status.into(), content_type: None, body: Bytes::new() }
    }

    fn json<T: Serialize + ?Sized>(status: Status, body: &T) -> Result<Self, AppError> {
        let bytes = serde_json::to_vec(body).map_err(anyhow::Error::from)?;
        Ok(Self { status: status.into(), content_type: Some(JSON), body: bytes.into() })
    }

    fn common_error(status: Status, message: impl Into<String>) -> Self {
        Self::error(status.into(), &build_error_body(ErrorType::CommonError, message, None))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn status(&self) -> StatusCode { self.status }
    pub fn content_type(&self) -> Option<&str> { self.content_type }
    pub fn body(&self) -> &[u8] { &self.body }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        res
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Handlers may return any `Result<R, AppError>` where `R: IntoResponse`.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `Ok(Status::NoContent)`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::empty(self) }
}
