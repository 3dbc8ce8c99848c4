use async_trait::async_trait;

use super::{Middleware, Outcome};
use crate::failure::HttpError;
use crate::request::Request;
use crate::status::Status;

/// Length of a storage identifier in hex digits (12 bytes).
const OBJECT_ID_LEN: usize = 24;

/// Whether `id` has the storage layer's identifier syntax.
pub fn is_object_id(id: &str) -> bool {
    id.len() == OBJECT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Rejects a request whose named path segment is not a valid identifier,
/// before the handler or any collaborator sees it.
#[derive(Clone, Debug)]
pub struct ValidateObjectId {
    param: &'static str,
}

impl ValidateObjectId {
    pub const fn new(param: &'static str) -> Self {
        Self { param }
    }
}

#[async_trait]
impl Middleware for ValidateObjectId {
    fn name(&self) -> &'static str {
        "ValidateObjectIdMiddleware"
    }

    async fn intercept(&self, req: &mut Request) -> Outcome {
        match req.param(self.param) {
            Some(id) if is_object_id(id) => Ok(()),
            Some(id) => Err(HttpError::new(Status::BadRequest, format!("{id} is not valid"), self.name()).into()),
            None => Err(HttpError::new(Status::BadRequest, format!("{} is not valid", self.param), self.name()).into()),
        }
    }
}
