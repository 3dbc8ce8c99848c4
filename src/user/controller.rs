use std::sync::Arc;

use tracing::info;

use super::{CreateUserDto, UserRdo, UserService};
use crate::failure::{AppError, HttpError};
use crate::handler::bind;
use crate::middleware::{PrivateRoute, ValidateBody};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Controller, Route};
use crate::status::Status;

const COMPONENT: &str = "UserController";

/// `/users`: registration and the authenticated-user check.
pub struct UserController {
    users: Arc<dyn UserService>,
    salt: String,
}

impl UserController {
    pub fn new(users: Arc<dyn UserService>, salt: impl Into<String>) -> Arc<Self> {
        info!("Register routes for UserController...");
        Arc::new(Self { users, salt: salt.into() })
    }

    async fn register(self: Arc<Self>, mut req: Request) -> Result<Response, AppError> {
        let dto = req.take_dto::<CreateUserDto>()?;

        if self.users.find_by_email(&dto.email).await?.is_some() {
            return Err(HttpError::new(
                Status::Conflict,
                format!("User with email «{}» exists.", dto.email),
                COMPONENT,
            )
            .into());
        }

        let user = self.users.create(dto, &self.salt).await?;
        Response::created_as::<UserRdo, _>(&user)
    }

    async fn check_auth(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let unauthorized = || HttpError::new(Status::Unauthorized, "Unauthorized", COMPONENT);

        let email = req.identity().map(|i| i.email.as_str()).ok_or_else(unauthorized)?;
        let user = self.users.find_by_email(email).await?.ok_or_else(unauthorized)?;

        Response::ok_as::<UserRdo, _>(&user)
    }
}

impl Controller for UserController {
    fn prefix(&self) -> &str {
        "/users"
    }

    fn register_routes(self: Arc<Self>) -> Vec<Route> {
        vec![
            Route::post("/register", bind(&self, Self::register))
                .with(ValidateBody::<CreateUserDto>::new()),
            Route::get("/login", bind(&self, Self::check_auth))
                .with(PrivateRoute),
        ]
    }
}
