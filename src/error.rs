//! Startup and infrastructure error type.

use std::net::AddrParseError;

use http::Method;
use thiserror::Error;

/// The error type returned by sluice's fallible startup operations.
///
/// Request-time failures (validation, 404, 500, etc.) are [`AppError`](crate::AppError)
/// values rendered by the exception filter chain, never `Error`s. This type
/// surfaces failures that stop the process from serving at all: binding a
/// port, loading configuration, or mounting a bad route table.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    /// A route could not be mounted: duplicate (path, method) or a pattern
    /// the radix tree rejects.
    #[error("invalid route `{method} {path}`: {reason}")]
    Route {
        method: Method,
        path: String,
        reason: String,
    },

    #[error("config `{key}`: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("logger: {0}")]
    Logger(String),
}
