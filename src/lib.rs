//! # sluice
//!
//! The request pipeline of a JSON REST backend: route registry, ordered
//! middleware, an exception filter chain and an allow-list projector for
//! response bodies.
//!
//! ## The contract
//!
//! Every request flows through one pipeline:
//!
//! ```text
//! global middleware → route lookup → route middleware → handler → projector
//!                         │                 │              │
//!                         └──── Err(AppError) ─────────────┴──→ filter chain
//! ```
//!
//! A stage either continues or aborts with an [`AppError`]. Errors are never
//! swallowed: each one reaches the [`FilterChain`](filter::FilterChain)
//! exactly once and produces exactly one response plus one log record.
//!
//! Handlers return `Result<Response, AppError>`, so a request can only ever
//! be answered once.
//!
//! What is left to the host application:
//!
//! - **Persistence**: the `*Service` traits in [`offer`], [`comment`] and [`user`]
//! - **Token verification**: [`middleware::TokenVerifier`]
//! - **TLS, rate limiting, body-size limits**: the reverse proxy in front
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sluice::{AppError, Config, Request, Response, Route, Router, Server, logger};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     logger::init(&config.log_level)?;
//!
//!     let app = Router::new().route(Route::get("/offers/:offerId", show))?;
//!
//!     Server::from_addr(config.addr()?).serve(app).await?;
//!     Ok(())
//! }
//!
//! async fn show(req: Request) -> Result<Response, AppError> {
//!     let id = req.param("offerId").unwrap_or_default();
//!     Response::ok(&serde_json::json!({ "id": id }))
//! }
//! ```

mod error;
mod failure;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod comment;
pub mod config;
pub mod filter;
pub mod handler;
pub mod health;
pub mod logger;
pub mod middleware;
pub mod offer;
pub mod projection;
pub mod user;

pub use config::Config;
pub use error::Error;
pub use failure::{
    AppError, EmptyDetails, ErrorBody, ErrorType, FieldViolation, HttpError, ValidationError, Violations,
    build_error_body,
};
pub use handler::Handler;
pub use http::Method;
pub use request::{Identity, Request};
pub use response::{IntoResponse, Response};
pub use router::{Controller, Route, Router};
pub use server::Server;
pub use status::Status;
