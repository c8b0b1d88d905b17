//! Shared project repository: projects, members, invitations, items, links,
//! activities
//!
//! Every mutating operation takes the caller's [`Principal`] and records a
//! project activity row in the same transaction, so the audit trail can never
//! drift from the data.

use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::core::constants::{
    INVITATION_STATUS_ACCEPTED, INVITATION_STATUS_DECLINED, INVITATION_STATUS_PENDING,
    PROJECT_ROLE_ADMIN, SHARED_LINK_TOKEN_BYTES,
};
use crate::data::sqlite::error::{SqliteError, map_unique};
use crate::data::types::collaboration::{
    MemberWithUser, ProjectActivityRow, ProjectInvitationRow, ProjectItemRow, SharedLinkRow,
    SharedProjectRow,
};
use crate::data::types::transactional::{AttachOutcome, InvitationOutcome, ItemOutcome};
use crate::domain::Principal;
use crate::domain::payloads::collaboration::{
    NewProjectInvitation, NewProjectItem, NewSharedLink, NewSharedProject, SharedProjectUpdate,
};
use crate::domain::target::TargetKind;
use crate::utils::crypto::generate_token;

use super::{clamp_limit, json_col_opt};

/// Create a project. The creator becomes an admin member in the same
/// transaction.
pub async fn create(
    pool: &SqlitePool,
    principal: &Principal,
    project: &NewSharedProject,
) -> Result<SharedProjectRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO shared_projects (name, description, created_by_id, created_at, updated_at, status, is_public) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&project.name)
    .bind(&project.description)
    .bind(principal.user_id)
    .bind(now)
    .bind(now)
    .bind(&project.status)
    .bind(project.is_public)
    .execute(&mut *tx)
    .await?;
    let project_id = result.last_insert_rowid();

    sqlx::query(
        "INSERT INTO project_members (project_id, user_id, role, joined_at, invited_by) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(project_id)
    .bind(principal.user_id)
    .bind(PROJECT_ROLE_ADMIN)
    .bind(now)
    .bind(principal.user_id)
    .execute(&mut *tx)
    .await?;

    record_activity(&mut tx, project_id, principal, "project_created", None, now).await?;
    tx.commit().await?;

    tracing::debug!(project_id, user_id = principal.user_id, "Project created");

    Ok(SharedProjectRow {
        id: project_id,
        name: project.name.clone(),
        description: project.description.clone(),
        created_by_id: principal.user_id,
        created_at: now,
        updated_at: now,
        status: project.status.clone(),
        is_public: project.is_public,
    })
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<SharedProjectRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM shared_projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_project(&r)).transpose()
}

/// Projects the user belongs to, most recently updated first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<SharedProjectRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT p.* FROM shared_projects p \
         JOIN project_members m ON m.project_id = p.id \
         WHERE m.user_id = ? ORDER BY p.updated_at DESC, p.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_project).collect()
}

/// Apply a partial update; any change refreshes `updated_at`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    update: &SharedProjectUpdate,
) -> Result<Option<SharedProjectRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut sets: Vec<&str> = Vec::new();
    if update.name.is_some() {
        sets.push("name = ?");
    }
    if update.description.is_some() {
        sets.push("description = ?");
    }
    if update.status.is_some() {
        sets.push("status = ?");
    }
    if update.is_public.is_some() {
        sets.push("is_public = ?");
    }

    if sets.is_empty() {
        return get(pool, id).await;
    }
    sets.push("updated_at = ?");

    let sql = format!("UPDATE shared_projects SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    if let Some(v) = &update.name {
        query = query.bind(v);
    }
    if let Some(v) = &update.description {
        query = query.bind(v);
    }
    if let Some(v) = &update.status {
        query = query.bind(v);
    }
    if let Some(v) = update.is_public {
        query = query.bind(v);
    }

    let result = query.bind(now).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

/// Delete a project. Members, invitations, items, links, and activities
/// cascade.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM shared_projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------
// Members and invitations
// -----------------------------------------------------------------------------

pub async fn list_members(
    pool: &SqlitePool,
    project_id: i64,
) -> Result<Vec<MemberWithUser>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, String, Option<String>, String, i64)>(
        "SELECT u.id, u.username, u.name, m.role, m.joined_at \
         FROM project_members m JOIN users u ON m.user_id = u.id \
         WHERE m.project_id = ? ORDER BY m.joined_at ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, username, name, role, joined_at)| MemberWithUser {
            user_id,
            username,
            name,
            role,
            joined_at,
        })
        .collect())
}

pub async fn member_role(
    pool: &SqlitePool,
    project_id: i64,
    user_id: i64,
) -> Result<Option<String>, SqliteError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT role FROM project_members WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(role,)| role))
}

/// Remove a member; records the removal in the activity log
pub async fn remove_member(
    pool: &SqlitePool,
    principal: &Principal,
    project_id: i64,
    user_id: i64,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
        .bind(project_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    let data = serde_json::json!({ "removedUserId": user_id });
    record_activity(&mut tx, project_id, principal, "member_removed", Some(&data), now).await?;
    tx.commit().await?;

    Ok(true)
}

/// Invite a user. Fails with `Conflict` when the user is already a member or
/// already has an invitation for this project.
pub async fn invite_user(
    pool: &SqlitePool,
    principal: &Principal,
    invitation: &NewProjectInvitation,
) -> Result<ProjectInvitationRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let already_member: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM project_members WHERE project_id = ? AND user_id = ?")
            .bind(invitation.project_id)
            .bind(invitation.user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if already_member.is_some() {
        return Err(SqliteError::Conflict("user is already a member".into()));
    }

    let result = sqlx::query(
        "INSERT INTO project_invitations (project_id, user_id, invited_by, role, status, invited_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(invitation.project_id)
    .bind(invitation.user_id)
    .bind(principal.user_id)
    .bind(&invitation.role)
    .bind(INVITATION_STATUS_PENDING)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_unique(e, "invitation for (project, user)"))?;

    let data = serde_json::json!({ "invitedUserId": invitation.user_id, "role": invitation.role });
    record_activity(
        &mut tx,
        invitation.project_id,
        principal,
        "invitation_sent",
        Some(&data),
        now,
    )
    .await?;
    tx.commit().await?;

    Ok(ProjectInvitationRow {
        id: result.last_insert_rowid(),
        project_id: invitation.project_id,
        user_id: invitation.user_id,
        invited_by: principal.user_id,
        role: invitation.role.clone(),
        status: INVITATION_STATUS_PENDING.to_string(),
        invited_at: now,
    })
}

pub async fn list_invitations_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ProjectInvitationRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM project_invitations WHERE user_id = ? AND status = ? \
         ORDER BY invited_at DESC, id DESC",
    )
    .bind(user_id)
    .bind(INVITATION_STATUS_PENDING)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_invitation).collect()
}

/// Respond to an invitation. Only the invited user may respond, only once;
/// accepting creates the membership in the same transaction.
pub async fn respond_invitation(
    pool: &SqlitePool,
    principal: &Principal,
    invitation_id: i64,
    accept: bool,
) -> Result<InvitationOutcome, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT * FROM project_invitations WHERE id = ?")
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(row) = row else {
        return Ok(InvitationOutcome::NotFound);
    };
    let invitation = to_invitation(&row)?;

    if invitation.user_id != principal.user_id {
        return Ok(InvitationOutcome::NotFound);
    }
    if invitation.status != INVITATION_STATUS_PENDING {
        return Ok(InvitationOutcome::AlreadyResponded(invitation.status));
    }

    let status = if accept {
        INVITATION_STATUS_ACCEPTED
    } else {
        INVITATION_STATUS_DECLINED
    };
    sqlx::query("UPDATE project_invitations SET status = ? WHERE id = ?")
        .bind(status)
        .bind(invitation_id)
        .execute(&mut *tx)
        .await?;

    if !accept {
        tx.commit().await?;
        return Ok(InvitationOutcome::Declined);
    }

    let member = sqlx::query(
        "INSERT INTO project_members (project_id, user_id, role, joined_at, invited_by) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(invitation.project_id)
    .bind(invitation.user_id)
    .bind(&invitation.role)
    .bind(now)
    .bind(invitation.invited_by)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_unique(e, "project membership"))?;

    record_activity(
        &mut tx,
        invitation.project_id,
        principal,
        "member_joined",
        None,
        now,
    )
    .await?;
    tx.commit().await?;

    Ok(InvitationOutcome::Accepted(
        crate::data::types::collaboration::ProjectMemberRow {
            id: member.last_insert_rowid(),
            project_id: invitation.project_id,
            user_id: invitation.user_id,
            role: invitation.role,
            joined_at: now,
            invited_by: invitation.invited_by,
        },
    ))
}

// -----------------------------------------------------------------------------
// Items
// -----------------------------------------------------------------------------

/// Attach a record to a project. The referenced target must exist; the
/// (project, itemType, itemId) triple is unique.
pub async fn add_item(
    pool: &SqlitePool,
    principal: &Principal,
    item: &NewProjectItem,
) -> Result<ItemOutcome, SqliteError> {
    let kind: TargetKind = item
        .item_type
        .parse()
        .map_err(|_| SqliteError::Conflict(format!("unknown item type {}", item.item_type)))?;
    if !kind.exists(pool, item.item_id).await? {
        return Ok(AttachOutcome::MissingTarget);
    }

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO project_items (project_id, item_type, item_id, added_by, added_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(item.project_id)
    .bind(&item.item_type)
    .bind(item.item_id)
    .bind(principal.user_id)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_unique(e, "project item"))?;

    let data = serde_json::json!({ "itemType": item.item_type, "itemId": item.item_id });
    record_activity(&mut tx, item.project_id, principal, "item_added", Some(&data), now).await?;
    tx.commit().await?;

    Ok(AttachOutcome::Attached(ProjectItemRow {
        id: result.last_insert_rowid(),
        project_id: item.project_id,
        item_type: item.item_type.clone(),
        item_id: item.item_id,
        added_by: principal.user_id,
        added_at: now,
    }))
}

pub async fn remove_item(
    pool: &SqlitePool,
    principal: &Principal,
    project_id: i64,
    item_type: &str,
    item_id: i64,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "DELETE FROM project_items WHERE project_id = ? AND item_type = ? AND item_id = ?",
    )
    .bind(project_id)
    .bind(item_type)
    .bind(item_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    let data = serde_json::json!({ "itemType": item_type, "itemId": item_id });
    record_activity(&mut tx, project_id, principal, "item_removed", Some(&data), now).await?;
    tx.commit().await?;

    Ok(true)
}

pub async fn list_items(
    pool: &SqlitePool,
    project_id: i64,
) -> Result<Vec<ProjectItemRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, i64, i64, i64)>(
        "SELECT id, project_id, item_type, item_id, added_by, added_at \
         FROM project_items WHERE project_id = ? ORDER BY added_at ASC, id ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, project_id, item_type, item_id, added_by, added_at)| ProjectItemRow {
            id,
            project_id,
            item_type,
            item_id,
            added_by,
            added_at,
        })
        .collect())
}

// -----------------------------------------------------------------------------
// Shareable links
// -----------------------------------------------------------------------------

/// Create a shareable link with a server-generated token
pub async fn create_link(
    pool: &SqlitePool,
    principal: &Principal,
    link: &NewSharedLink,
) -> Result<SharedLinkRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let token = generate_token(SHARED_LINK_TOKEN_BYTES);
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO shared_links (project_id, token, access_level, expires_at, created_at, created_by, description) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(link.project_id)
    .bind(&token)
    .bind(&link.access_level)
    .bind(link.expires_at)
    .bind(now)
    .bind(principal.user_id)
    .bind(&link.description)
    .execute(&mut *tx)
    .await?;

    let data = serde_json::json!({ "accessLevel": link.access_level });
    record_activity(&mut tx, link.project_id, principal, "link_created", Some(&data), now).await?;
    tx.commit().await?;

    Ok(SharedLinkRow {
        id: result.last_insert_rowid(),
        project_id: link.project_id,
        token,
        access_level: link.access_level.clone(),
        expires_at: link.expires_at,
        created_at: now,
        created_by: principal.user_id,
        description: link.description.clone(),
    })
}

/// Resolve a link token. Expired links read as `None`.
pub async fn find_link_by_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<SharedLinkRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let row = sqlx::query(
        "SELECT * FROM shared_links WHERE token = ? AND (expires_at IS NULL OR expires_at > ?)",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    row.map(|r| to_link(&r)).transpose()
}

pub async fn revoke_link(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM shared_links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------
// Activities
// -----------------------------------------------------------------------------

pub async fn list_activities(
    pool: &SqlitePool,
    project_id: i64,
    page: u32,
    limit: u32,
) -> Result<(Vec<ProjectActivityRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let rows = sqlx::query(
        "SELECT * FROM project_activities WHERE project_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(project_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM project_activities WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(pool)
            .await?;

    let activities = rows.iter().map(to_activity).collect::<Result<Vec<_>, _>>()?;
    Ok((activities, total.0 as u64))
}

async fn record_activity(
    tx: &mut Transaction<'_, Sqlite>,
    project_id: i64,
    principal: &Principal,
    activity_type: &str,
    activity_data: Option<&serde_json::Value>,
    now: i64,
) -> Result<(), SqliteError> {
    sqlx::query(
        "INSERT INTO project_activities (project_id, user_id, activity_type, activity_data, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(project_id)
    .bind(principal.user_id)
    .bind(activity_type)
    .bind(activity_data.map(|d| d.to_string()))
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn to_project(row: &sqlx::sqlite::SqliteRow) -> Result<SharedProjectRow, SqliteError> {
    Ok(SharedProjectRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_by_id: row.try_get("created_by_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        status: row.try_get("status")?,
        is_public: row.try_get("is_public")?,
    })
}

fn to_invitation(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectInvitationRow, SqliteError> {
    Ok(ProjectInvitationRow {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        user_id: row.try_get("user_id")?,
        invited_by: row.try_get("invited_by")?,
        role: row.try_get("role")?,
        status: row.try_get("status")?,
        invited_at: row.try_get("invited_at")?,
    })
}

fn to_link(row: &sqlx::sqlite::SqliteRow) -> Result<SharedLinkRow, SqliteError> {
    Ok(SharedLinkRow {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        token: row.try_get("token")?,
        access_level: row.try_get("access_level")?,
        expires_at: row.try_get("expires_at")?,
        created_at: row.try_get("created_at")?,
        created_by: row.try_get("created_by")?,
        description: row.try_get("description")?,
    })
}

fn to_activity(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectActivityRow, SqliteError> {
    Ok(ProjectActivityRow {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        user_id: row.try_get("user_id")?,
        activity_type: row.try_get("activity_type")?,
        activity_data: json_col_opt(row, "activity_data")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{calculation, seed_user, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn principal(user_id: i64) -> Principal {
        Principal::new(user_id, "user")
    }

    fn new_project(name: &str) -> NewSharedProject {
        parse_payload(json!({"name": name})).unwrap()
    }

    async fn seed_calculation(pool: &SqlitePool, user_id: i64) -> i64 {
        let calc = parse_payload(json!({
            "userId": user_id,
            "region": "Benton",
            "buildingType": "RES",
            "squareFootage": 2400,
            "baseCost": "145.50",
            "regionFactor": "1.05",
            "complexity": "standard",
            "complexityFactor": "1.00",
            "costPerSqft": "152.78",
            "totalCost": "366672.00",
            "adjustedCost": "366672.00"
        }))
        .unwrap();
        calculation::insert(pool, &calc).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_makes_creator_admin_and_logs() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();

        let role = member_role(&pool, project.id, owner).await.unwrap();
        assert_eq!(role.as_deref(), Some("admin"));

        let (activities, total) = list_activities(&pool, project.id, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(activities[0].activity_type, "project_created");
    }

    #[tokio::test]
    async fn test_invitation_lifecycle() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let invitee = seed_user(&pool, "invitee").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();

        let invite: NewProjectInvitation = parse_payload(json!({
            "projectId": project.id,
            "userId": invitee,
            "role": "editor"
        }))
        .unwrap();
        let sent = invite_user(&pool, &principal(owner), &invite).await.unwrap();
        assert_eq!(sent.status, "pending");

        // duplicate invitation conflicts
        assert!(invite_user(&pool, &principal(owner), &invite).await.unwrap_err().is_conflict());

        // only the invitee may respond
        let outcome = respond_invitation(&pool, &principal(owner), sent.id, true).await.unwrap();
        assert!(matches!(outcome, InvitationOutcome::NotFound));

        let outcome = respond_invitation(&pool, &principal(invitee), sent.id, true).await.unwrap();
        let InvitationOutcome::Accepted(member) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(member.role, "editor");
        assert_eq!(member_role(&pool, project.id, invitee).await.unwrap().as_deref(), Some("editor"));

        // the invitation is now terminal
        let outcome = respond_invitation(&pool, &principal(invitee), sent.id, false).await.unwrap();
        assert!(matches!(outcome, InvitationOutcome::AlreadyResponded(s) if s == "accepted"));

        // re-inviting a member conflicts
        assert!(invite_user(&pool, &principal(owner), &invite).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_declined_invitation_adds_no_member() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let invitee = seed_user(&pool, "invitee").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();
        let invite: NewProjectInvitation = parse_payload(json!({
            "projectId": project.id,
            "userId": invitee,
            "role": "viewer"
        }))
        .unwrap();
        let sent = invite_user(&pool, &principal(owner), &invite).await.unwrap();

        let outcome = respond_invitation(&pool, &principal(invitee), sent.id, false).await.unwrap();
        assert!(matches!(outcome, InvitationOutcome::Declined));
        assert!(member_role(&pool, project.id, invitee).await.unwrap().is_none());
        assert!(list_invitations_for_user(&pool, invitee).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_items_require_live_target() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();

        let missing: NewProjectItem = parse_payload(json!({
            "projectId": project.id,
            "itemType": "calculation",
            "itemId": 999
        }))
        .unwrap();
        let outcome = add_item(&pool, &principal(owner), &missing).await.unwrap();
        assert!(matches!(outcome, AttachOutcome::MissingTarget));

        let calc_id = seed_calculation(&pool, owner).await;
        let item: NewProjectItem = parse_payload(json!({
            "projectId": project.id,
            "itemType": "calculation",
            "itemId": calc_id
        }))
        .unwrap();
        let added = add_item(&pool, &principal(owner), &item).await.unwrap();
        assert!(added.attached().is_some());

        // duplicates conflict
        assert!(add_item(&pool, &principal(owner), &item).await.unwrap_err().is_conflict());

        assert_eq!(list_items(&pool, project.id).await.unwrap().len(), 1);
        assert!(remove_item(&pool, &principal(owner), project.id, "calculation", calc_id)
            .await
            .unwrap());
        assert!(list_items(&pool, project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_link_token_and_expiry() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();

        let link: NewSharedLink = parse_payload(json!({
            "projectId": project.id,
            "accessLevel": "view"
        }))
        .unwrap();
        let created = create_link(&pool, &principal(owner), &link).await.unwrap();
        assert_eq!(created.token.len(), SHARED_LINK_TOKEN_BYTES * 2);

        let found = find_link_by_token(&pool, &created.token).await.unwrap();
        assert_eq!(found.unwrap().id, created.id);

        // expire it
        sqlx::query("UPDATE shared_links SET expires_at = ? WHERE id = ?")
            .bind(chrono::Utc::now().timestamp() - 1)
            .bind(created.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(find_link_by_token(&pool, &created.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_collaboration_rows() {
        let pool = setup_test_pool().await;
        let owner = seed_user(&pool, "owner").await;

        let project = create(&pool, &principal(owner), &new_project("Revaluation")).await.unwrap();
        let link: NewSharedLink =
            parse_payload(json!({"projectId": project.id, "accessLevel": "view"})).unwrap();
        create_link(&pool, &principal(owner), &link).await.unwrap();

        assert!(delete(&pool, project.id).await.unwrap());

        for table in ["project_members", "shared_links", "project_activities"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} should be empty after cascade");
        }
    }
}
