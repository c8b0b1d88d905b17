//! Collaboration row types: users, projects, members, invitations, items,
//! links, activities, comments

use serde::{Deserialize, Serialize};

/// User row. `password` is an opaque credential owned by the external auth
/// layer; this crate never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: Option<String>,
    pub is_active: bool,
}

/// Shared project row (a collaboration scope over calculations/matrices)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedProjectRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub status: String,
    pub is_public: bool,
}

/// Project membership row; unique per (projectId, userId)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberRow {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub role: String,
    pub joined_at: i64,
    pub invited_by: i64,
}

/// Member joined with user info for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithUser {
    pub user_id: i64,
    pub username: String,
    pub name: Option<String>,
    pub role: String,
    pub joined_at: i64,
}

/// Project invitation row; unique per (projectId, userId), terminal once
/// accepted or declined
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInvitationRow {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub invited_by: i64,
    pub role: String,
    pub status: String,
    pub invited_at: i64,
}

/// Polymorphic item reference attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemRow {
    pub id: i64,
    pub project_id: i64,
    pub item_type: String,
    pub item_id: i64,
    pub added_by: i64,
    pub added_at: i64,
}

/// Shareable link row. An expired link must be treated as invalid regardless
/// of row presence; repository reads enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLinkRow {
    pub id: i64,
    pub project_id: i64,
    pub token: String,
    pub access_level: String,
    pub expires_at: Option<i64>,
    pub created_at: i64,
    pub created_by: i64,
    pub description: Option<String>,
}

/// Audit record of one mutating project action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivityRow {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub activity_type: String,
    pub activity_data: Option<serde_json::Value>,
    pub created_at: i64,
}

/// Threaded comment attached to any target by (targetType, targetId)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub id: i64,
    pub user_id: i64,
    pub target_type: String,
    pub target_id: i64,
    pub content: String,
    pub parent_comment_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub is_resolved: bool,
    pub is_edited: bool,
}
