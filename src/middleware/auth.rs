use std::sync::Arc;

use async_trait::async_trait;
use http::header::AUTHORIZATION;

use super::{Middleware, Outcome};
use crate::failure::HttpError;
use crate::request::{Identity, Request};
use crate::status::Status;

/// Resolves a bearer token into a caller identity.
///
/// Token issuing and signature checks live behind this trait; the pipeline
/// only decides what happens when a token does or does not resolve.
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Option<Identity>;
}

/// Global stage: attaches the identity carried by `Authorization: Bearer …`.
///
/// A request without the header passes through anonymously. A header whose
/// token does not verify is rejected with 401.
pub struct Authenticate {
    verifier: Arc<dyn TokenVerifier>,
}

impl Authenticate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl Middleware for Authenticate {
    fn name(&self) -> &'static str {
        "AuthenticateMiddleware"
    }

    async fn intercept(&self, req: &mut Request) -> Outcome {
        let Some(header) = req.headers().get(AUTHORIZATION) else {
            return Ok(());
        };
        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let identity = match token {
            Some(token) => self.verifier.verify(token).await,
            None => None,
        };
        match identity {
            Some(identity) => {
                req.set_identity(identity);
                Ok(())
            }
            None => Err(HttpError::new(Status::Unauthorized, "Invalid token", self.name()).into()),
        }
    }
}

/// Authorization guard: only requests with a resolved identity continue.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrivateRoute;

#[async_trait]
impl Middleware for PrivateRoute {
    fn name(&self) -> &'static str {
        "PrivateRouteMiddleware"
    }

    async fn intercept(&self, req: &mut Request) -> Outcome {
        if req.identity().is_none() {
            return Err(HttpError::new(Status::Unauthorized, "Unauthorized", self.name()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::failure::AppError;

    struct OneToken;

    #[async_trait]
    impl TokenVerifier for OneToken {
        async fn verify(&self, token: &str) -> Option<Identity> {
            (token == "good").then(|| Identity { id: "u1".into(), email: "a@x".into() })
        }
    }

    fn request(auth: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder.body(Bytes::new()).unwrap().into()
    }

    fn status(err: AppError) -> u16 {
        match err {
            AppError::Http(e) => e.status().as_u16(),
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn guard_rejects_anonymous_requests() {
        let err = PrivateRoute.intercept(&mut request(None)).await.unwrap_err();
        assert_eq!(status(err), 401);
    }

    #[tokio::test]
    async fn verified_token_attaches_identity_and_passes_guard() {
        let auth = Authenticate::new(Arc::new(OneToken));
        let mut req = request(Some("Bearer good"));

        auth.intercept(&mut req).await.unwrap();
        assert_eq!(req.identity().map(|i| i.email.as_str()), Some("a@x"));
        assert!(PrivateRoute.intercept(&mut req).await.is_ok());
    }

    #[tokio::test]
    async fn missing_header_stays_anonymous() {
        let auth = Authenticate::new(Arc::new(OneToken));
        let mut req = request(None);
        auth.intercept(&mut req).await.unwrap();
        assert!(req.identity().is_none());
    }

    #[tokio::test]
    async fn bad_tokens_are_unauthorized() {
        let auth = Authenticate::new(Arc::new(OneToken));
        for header in ["Bearer bad", "Basic good", "Bearer "] {
            let err = auth.intercept(&mut request(Some(header))).await.unwrap_err();
            assert_eq!(status(err), 401, "{header}");
        }
    }
}
