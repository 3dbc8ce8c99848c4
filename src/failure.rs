//! Request-time failure taxonomy and the client-visible error envelope.
//!
//! Everything that can go wrong between accepting a request and producing its
//! response is an [`AppError`]. There are exactly three kinds:
//!
//! | Variant | Raised by | Rendered as |
//! |---|---|---|
//! | [`AppError::Validation`] | body / DTO checks | 400 `ValidationError` with `details` |
//! | [`AppError::Http`] | middleware and handlers, deliberately | the error's own status, `CommonError` |
//! | [`AppError::Unclassified`] | anything else (`?` on a collaborator) | 500 `ServiceError` |
//!
//! The `errorType` tags in [`ErrorType`] are part of the wire contract.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::Status;

// ── Wire tags ─────────────────────────────────────────────────────────────────

/// The closed set of `errorType` tags sent to clients.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorType {
    ValidationError,
    CommonError,
    ServiceError,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::CommonError     => "CommonError",
            Self::ServiceError    => "ServiceError",
        }
    }
}

/// One offending property and every rule it broke.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldViolation {
    pub property: String,
    pub messages: Vec<String>,
}

impl FieldViolation {
    pub fn new<M>(property: impl Into<String>, messages: impl IntoIterator<Item = M>) -> Self
    where
        M: Into<String>,
    {
        Self {
            property: property.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collects rule failures in the order they are checked, grouping messages
/// by property.
///
/// ```rust
/// use sluice::Violations;
///
/// let price = 100;
/// let mut v = Violations::default();
/// v.check(price >= 500, "price", "must be >= 500");
/// v.check(price % 10 == 0, "price", "must be a multiple of 10");
/// assert_eq!(v.into_vec()[0].messages, ["must be >= 500"]);
/// ```
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Records `message` against `property` unless `ok` holds.
    pub fn check(&mut self, ok: bool, property: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.push(property, message);
        }
        self
    }

    pub fn push(&mut self, property: &str, message: impl Into<String>) {
        match self.0.iter_mut().find(|v| v.property == property) {
            Some(existing) => existing.messages.push(message.into()),
            None => self.0.push(FieldViolation::new(property, [message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

/// Returned by [`ValidationError::new`] when no details are supplied.
#[derive(Debug, Error)]
#[error("a validation error must carry at least one field violation")]
pub struct EmptyDetails;

/// A request failed one or more field rules.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    details: Vec<FieldViolation>,
}

impl ValidationError {
    /// Fails with [`EmptyDetails`] if `details` is empty.
    pub fn new(message: impl Into<String>, details: Vec<FieldViolation>) -> Result<Self, EmptyDetails> {
        if details.is_empty() {
            return Err(EmptyDetails);
        }
        Ok(Self { message: message.into(), details })
    }

    pub fn message(&self) -> &str { &self.message }
    pub fn details(&self) -> &[FieldViolation] { &self.details }
}

/// A deliberate failure with a caller-chosen status, tagged with the
/// component that raised it.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    status: StatusCode,
    message: String,
    component: &'static str,
}

impl HttpError {
    pub fn new(status: Status, message: impl Into<String>, component: &'static str) -> Self {
        Self { status: status.into(), message: message.into(), component }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn message(&self) -> &str { &self.message }

    /// Name of the middleware or controller that raised the error.
    pub fn component(&self) -> &'static str { self.component }
}

/// Any failure raised while processing a request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything that is not a known variant. Treated as a defect.
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl AppError {
    pub fn unclassified(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Unclassified(anyhow::Error::msg(message))
    }
}

impl From<EmptyDetails> for AppError {
    fn from(e: EmptyDetails) -> Self {
        Self::Unclassified(e.into())
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// The JSON body of every error response.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_type: ErrorType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

/// Builds the client-visible error envelope.
pub fn build_error_body(
    kind: ErrorType,
    message: impl Into<String>,
    details: Option<&[FieldViolation]>,
) -> ErrorBody {
    ErrorBody {
        error_type: kind,
        message: message.into(),
        details: details.map(<[FieldViolation]>::to_vec),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_details_are_rejected() {
        assert!(ValidationError::new("Invalid", Vec::new()).is_err());
    }

    #[test]
    fn validation_body_carries_details() {
        let err = ValidationError::new(
            "Invalid",
            vec![FieldViolation::new("price", ["must be >= 500"])],
        )
        .unwrap();
        let body = build_error_body(ErrorType::ValidationError, err.message(), Some(err.details()));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "errorType": "ValidationError",
                "message": "Invalid",
                "details": [{"property": "price", "messages": ["must be >= 500"]}],
            }),
        );
    }

    #[test]
    fn details_key_is_omitted_when_absent() {
        let body = build_error_body(ErrorType::ServiceError, "boom", None);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"errorType": "ServiceError", "message": "boom"}),
        );
    }

    #[test]
    fn violations_group_by_property_in_check_order() {
        let mut v = Violations::default();
        v.check(false, "title", "too short")
            .check(true, "price", "never recorded")
            .check(false, "city", "unknown city")
            .check(false, "title", "must not be blank");

        let details = v.into_vec();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], FieldViolation::new("title", ["too short", "must not be blank"]));
        assert_eq!(details[1].property, "city");
    }

    #[test]
    fn anyhow_errors_are_unclassified() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Unclassified(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn tags_match_wire_names() {
        for tag in [ErrorType::ValidationError, ErrorType::CommonError, ErrorType::ServiceError] {
            assert_eq!(serde_json::to_value(tag).unwrap(), json!(tag.as_str()));
        }
    }
}
