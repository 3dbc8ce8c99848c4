//! Incoming HTTP request and its request-scoped context.

use std::any::{Any, type_name};
use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::failure::AppError;

/// The caller identity resolved by an authentication stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// An incoming HTTP request with its body fully buffered.
///
/// Besides the wire data it carries the request-scoped state that pipeline
/// stages hand to the handler: matched path parameters, the resolved
/// [`Identity`], and a validated body DTO.
pub struct Request {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    identity: Option<Identity>,
    dto: Option<Box<dyn Any + Send + Sync>>,
}

impl Request {
    pub fn new(parts: http::request::Parts, body: Bytes) -> Self {
        let query = parts.uri.query().map(parse_query).unwrap_or_default();
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            query,
            headers: parts.headers,
            body,
            params: HashMap::new(),
            identity: None,
            dto: None,
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. Values that are not visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/offers/:offerId`, `req.param("offerId")` on `/offers/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a query-string value. `?limit=5` gives `query("limit") == Some("5")`.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// The body DTO stored by a validation stage, if it has type `T`.
    pub fn dto<T: Any>(&self) -> Option<&T> {
        self.dto.as_ref()?.downcast_ref()
    }

    /// Moves the validated body DTO out of the request.
    ///
    /// A route whose handler calls this without a matching
    /// [`ValidateBody`](crate::middleware::ValidateBody) stage is a wiring
    /// defect, reported as an unclassified error.
    pub fn take_dto<T: Any>(&mut self) -> Result<T, AppError> {
        self.dto
            .take()
            .and_then(|dto| dto.downcast::<T>().ok())
            .map(|dto| *dto)
            .ok_or_else(|| {
                AppError::unclassified(format!("no validated `{}` body on request", type_name::<T>()))
            })
    }

    pub fn set_dto<T: Any + Send + Sync>(&mut self, dto: T) {
        self.dto = Some(Box::new(dto));
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body)
    }
}

/// Decodes `a=1&b=%32` as `application/x-www-form-urlencoded`. The first
/// occurrence of a key wins; keys without `=` map to an empty value.
fn parse_query(raw: &str) -> HashMap<String, String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
    let mut query = HashMap::new();
    for (key, value) in pairs {
        query.entry(key).or_insert(value);
    }
    query
}
