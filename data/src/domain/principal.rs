//! Request-scoped caller identity
//!
//! Mutating collaboration operations take an explicit [`Principal`] so that
//! activity records are attributed to the authenticated caller. There is no
//! ambient session state anywhere in this crate; whoever terminates the
//! session (HTTP layer, import job) constructs one per request.

use serde::{Deserialize, Serialize};

use crate::core::constants::USER_ROLE_ADMIN;

/// The authenticated principal on whose behalf a data-layer call runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: i64,
    pub role: String,
}

impl Principal {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == USER_ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_check() {
        assert!(Principal::new(1, "admin").is_admin());
        assert!(!Principal::new(2, "user").is_admin());
    }
}
