//! Built-in health-check handlers for process supervisors.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |
//!
//! ```rust
//! use sluice::{Route, Router, health};
//!
//! let app = Router::new()
//!     .route(Route::get("/healthz", health::liveness)).unwrap()
//!     .route(Route::get("/readyz", health::readiness)).unwrap();
//! ```

use crate::{AppError, Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Result<Response, AppError> {
    Ok(Response::text("ok"))
}

/// `200 OK` with body `"ready"`. Replace it with your own handler to gate on
/// collaborator availability.
pub async fn readiness(_req: Request) -> Result<Response, AppError> {
    Ok(Response::text("ready"))
}
