use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{Middleware, Outcome};
use crate::failure::{FieldViolation, ValidationError};
use crate::request::Request;

/// Field rules of an input DTO. An empty result means the DTO is valid.
pub trait Validate {
    fn validate(&self) -> Vec<FieldViolation>;
}

/// Parses the JSON body into `T`, checks its rules, and stores it on the
/// request for the handler ([`Request::take_dto`]).
pub struct ValidateBody<T> {
    _dto: PhantomData<fn() -> T>,
}

impl<T> ValidateBody<T> {
    pub const fn new() -> Self {
        Self { _dto: PhantomData }
    }
}

impl<T> Default for ValidateBody<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Middleware for ValidateBody<T>
where
    T: DeserializeOwned + Validate + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "ValidateDtoMiddleware"
    }

    async fn intercept(&self, req: &mut Request) -> Outcome {
        let message = format!("Validation error: \"{}\"", req.path());
        let dto = match serde_json::from_slice::<T>(req.body()) {
            Ok(dto) => dto,
            Err(e) => {
                let details = vec![FieldViolation::new("body", [e.to_string()])];
                return Err(ValidationError::new(message, details)?.into());
            }
        };

        let details = dto.validate();
        if !details.is_empty() {
            return Err(ValidationError::new(message, details)?.into());
        }

        req.set_dto(dto);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde::Deserialize;

    use super::*;
    use crate::failure::{AppError, Violations};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Price {
        price: u32,
    }

    impl Validate for Price {
        fn validate(&self) -> Vec<FieldViolation> {
            let mut v = Violations::default();
            v.check(self.price >= 500, "price", "must be >= 500");
            v.into_vec()
        }
    }

    fn request(body: &'static str) -> Request {
        http::Request::builder()
            .uri("/offers")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn valid_body_is_stored_for_the_handler() {
        let mut req = request(r#"{"price": 900}"#);
        ValidateBody::<Price>::new().intercept(&mut req).await.unwrap();
        assert_eq!(req.take_dto::<Price>().unwrap(), Price { price: 900 });
    }

    #[tokio::test]
    async fn rule_violations_become_validation_errors() {
        let mut req = request(r#"{"price": 100}"#);
        let err = ValidateBody::<Price>::new().intercept(&mut req).await.unwrap_err();

        let AppError::Validation(err) = err else { panic!("expected ValidationError, got {err:?}") };
        assert_eq!(err.message(), "Validation error: \"/offers\"");
        assert_eq!(err.details(), [FieldViolation::new("price", ["must be >= 500"])]);
        assert!(req.dto::<Price>().is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_reported_against_the_body() {
        let mut req = request("{");
        let err = ValidateBody::<Price>::new().intercept(&mut req).await.unwrap_err();

        let AppError::Validation(err) = err else { panic!("expected ValidationError, got {err:?}") };
        assert_eq!(err.details()[0].property, "body");
    }
}
