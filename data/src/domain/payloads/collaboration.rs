//! Collaboration payloads: projects, invitations, items, links, comments
//!
//! Caller identity never rides in a payload; repositories take a
//! [`crate::domain::Principal`] alongside these. Invitation status and link
//! tokens are server-assigned.

use serde::Deserialize;
use validator::Validate;

use crate::core::constants::PROJECT_STATUS_ACTIVE;

/// New shared project
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSharedProject {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default = "default_status")]
    #[validate(custom(function = "crate::domain::validate::valid_project_status"))]
    pub status: String,

    #[serde(default)]
    pub is_public: bool,
}

fn default_status() -> String {
    PROJECT_STATUS_ACTIVE.to_string()
}

/// Partial project update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SharedProjectUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "crate::domain::validate::valid_project_status"))]
    pub status: Option<String>,

    pub is_public: Option<bool>,
}

/// Invite a user to a project. Invitations always start pending.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProjectInvitation {
    pub project_id: i64,

    pub user_id: i64,

    #[validate(custom(function = "crate::domain::validate::valid_project_role"))]
    pub role: String,
}

/// Attach a record to a project by polymorphic reference
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProjectItem {
    pub project_id: i64,

    #[validate(custom(function = "crate::domain::validate::valid_target_kind"))]
    pub item_type: String,

    pub item_id: i64,
}

/// New shareable link. The token is generated server-side and returned with
/// the created row.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSharedLink {
    pub project_id: i64,

    #[validate(custom(function = "crate::domain::validate::valid_link_access"))]
    pub access_level: String,

    /// Epoch seconds; `None` means the link never expires
    pub expires_at: Option<i64>,

    pub description: Option<String>,
}

/// New comment on any commentable target
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewComment {
    #[validate(custom(function = "crate::domain::validate::valid_target_kind"))]
    pub target_type: String,

    pub target_id: i64,

    #[validate(length(min = 1, max = 8192))]
    pub content: String,

    pub parent_comment_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    #[test]
    fn test_project_defaults() {
        let project: NewSharedProject =
            parse_payload(json!({"name": "2025 revaluation"})).unwrap();
        assert_eq!(project.status, "active");
        assert!(!project.is_public);
    }

    #[test]
    fn test_invitation_rejects_unknown_role() {
        let err = parse_payload::<NewProjectInvitation>(json!({
            "projectId": 1,
            "userId": 2,
            "role": "owner"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_some());
    }

    #[test]
    fn test_invitation_status_is_not_a_field() {
        let err = parse_payload::<NewProjectInvitation>(json!({
            "projectId": 1,
            "userId": 2,
            "role": "editor",
            "status": "accepted"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn test_link_token_is_not_a_field() {
        let err = parse_payload::<NewSharedLink>(json!({
            "projectId": 1,
            "accessLevel": "view",
            "token": "abc123"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn test_comment_target_kind_checked() {
        let err = parse_payload::<NewComment>(json!({
            "targetType": "parcel",
            "targetId": 9,
            "content": "Looks off"
        }))
        .unwrap_err();
        assert!(err.field_errors().is_some());
    }
}
