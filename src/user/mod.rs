//! Users: entity, output shape, collaborator contract and controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::projection::{Field, Projection};

mod controller;
mod dto;

pub use controller::UserController;
pub use dto::CreateUserDto;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Pro,
    Regular,
}

/// A stored user. `password` holds the salted hash and must never be sent
/// to clients; project through [`UserRdo`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub user_type: UserType,
    pub password: String,
}

/// Public view of a user.
pub struct UserRdo;

impl Projection for UserRdo {
    const SHAPE: &'static [Field] = &[
        Field::plain("name"),
        Field::plain("email"),
        Field::plain("avatar"),
        Field::plain("userType"),
    ];
}

/// User persistence, provided by the host application.
#[async_trait]
pub trait UserService: Send + Sync + 'static {
    /// Stores a new user, hashing the password with `salt`.
    async fn create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_or_create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User>;
}
