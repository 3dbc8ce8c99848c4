use serde::{Deserialize, Serialize};

use super::UserType;
use crate::failure::{FieldViolation, Violations};
use crate::middleware::Validate;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub password: String,
    pub user_type: UserType,
}

impl Validate for CreateUserDto {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut v = Violations::default();

        let name = self.name.chars().count();
        v.check((1..=15).contains(&name), "name", "length must be between 1 and 15");
        v.check(looks_like_email(&self.email), "email", "must be a valid email address");
        if let Some(avatar) = &self.avatar {
            let lower = avatar.to_ascii_lowercase();
            v.check(
                lower.ends_with(".jpg") || lower.ends_with(".png"),
                "avatar",
                "must be a .jpg or .png image",
            );
        }
        let password = self.password.chars().count();
        v.check((6..=12).contains(&password), "password", "length must be between 6 and 12");

        v.into_vec()
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
