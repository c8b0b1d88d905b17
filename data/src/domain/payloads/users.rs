//! User payloads

use serde::Deserialize;
use validator::Validate;

use crate::core::constants::USER_ROLE_USER;

use super::default_true;

/// New user. `password` is an opaque credential string; hashing and auth
/// policy live outside this crate.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = "crate::domain::validate::valid_user_role"))]
    pub role: String,

    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_role() -> String {
    USER_ROLE_USER.to_string()
}
