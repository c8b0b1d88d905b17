//! Comment repository
//!
//! Comments attach to any target by (targetType, targetId); the target's
//! existence is checked at the application layer since no foreign key can
//! span tables. Replies must stay on the same target as their parent.

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::collaboration::CommentRow;
use crate::data::types::transactional::{AttachOutcome, CommentOutcome};
use crate::domain::Principal;
use crate::domain::payloads::collaboration::NewComment;
use crate::domain::target::TargetKind;

/// Create a comment. A reply's parent must exist and reference the same
/// target; a mismatch is a `Conflict`.
pub async fn create(
    pool: &SqlitePool,
    principal: &Principal,
    comment: &NewComment,
) -> Result<CommentOutcome, SqliteError> {
    let kind: TargetKind = comment
        .target_type
        .parse()
        .map_err(|_| SqliteError::Conflict(format!("unknown target type {}", comment.target_type)))?;
    if !kind.exists(pool, comment.target_id).await? {
        return Ok(AttachOutcome::MissingTarget);
    }

    if let Some(parent_id) = comment.parent_comment_id {
        let parent: Option<(String, i64)> =
            sqlx::query_as("SELECT target_type, target_id FROM comments WHERE id = ?")
                .bind(parent_id)
                .fetch_optional(pool)
                .await?;
        match parent {
            None => {
                return Err(SqliteError::Conflict(format!(
                    "parent comment {parent_id} does not exist"
                )));
            }
            Some((parent_type, parent_target)) => {
                if parent_type != comment.target_type || parent_target != comment.target_id {
                    return Err(SqliteError::Conflict(
                        "reply must target the same record as its parent".into(),
                    ));
                }
            }
        }
    }

    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO comments (user_id, target_type, target_id, content, parent_comment_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(principal.user_id)
    .bind(&comment.target_type)
    .bind(comment.target_id)
    .bind(&comment.content)
    .bind(comment.parent_comment_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(AttachOutcome::Attached(CommentRow {
        id: result.last_insert_rowid(),
        user_id: principal.user_id,
        target_type: comment.target_type.clone(),
        target_id: comment.target_id,
        content: comment.content.clone(),
        parent_comment_id: comment.parent_comment_id,
        created_at: now,
        updated_at: now,
        is_resolved: false,
        is_edited: false,
    }))
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<CommentRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_comment(&r)).transpose()
}

/// Edit a comment's content. Only the author may edit; an edit marks the
/// comment edited and refreshes `updated_at`.
pub async fn edit(
    pool: &SqlitePool,
    principal: &Principal,
    id: i64,
    content: &str,
) -> Result<Option<CommentRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE comments SET content = ?, is_edited = 1, updated_at = ? WHERE id = ? AND user_id = ?",
    )
    .bind(content)
    .bind(now)
    .bind(id)
    .bind(principal.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

pub async fn set_resolved(
    pool: &SqlitePool,
    id: i64,
    is_resolved: bool,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE comments SET is_resolved = ?, updated_at = ? WHERE id = ?")
        .bind(is_resolved)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All comments on a target, oldest first so threads read top-down
pub async fn list_for_target(
    pool: &SqlitePool,
    target_type: &str,
    target_id: i64,
) -> Result<Vec<CommentRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM comments WHERE target_type = ? AND target_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(target_type)
    .bind(target_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_comment).collect()
}

fn to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<CommentRow, SqliteError> {
    Ok(CommentRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        target_type: row.try_get("target_type")?,
        target_id: row.try_get("target_id")?,
        content: row.try_get("content")?,
        parent_comment_id: row.try_get("parent_comment_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        is_resolved: row.try_get("is_resolved")?,
        is_edited: row.try_get("is_edited")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{calculation, seed_user, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

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

    fn new_comment(calc_id: i64, content: &str, parent: Option<i64>) -> NewComment {
        parse_payload(json!({
            "targetType": "calculation",
            "targetId": calc_id,
            "content": content,
            "parentCommentId": parent
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_comment_requires_live_target() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "assessor1").await;

        let outcome = create(&pool, &Principal::new(user, "user"), &new_comment(999, "hm", None))
            .await
            .unwrap();
        assert!(matches!(outcome, AttachOutcome::MissingTarget));
    }

    #[tokio::test]
    async fn test_reply_must_share_target() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "assessor1").await;
        let p = Principal::new(user, "user");
        let calc_a = seed_calculation(&pool, user).await;
        let calc_b = seed_calculation(&pool, user).await;

        let root = create(&pool, &p, &new_comment(calc_a, "base cost looks low", None))
            .await
            .unwrap()
            .attached()
            .unwrap();

        // reply on the same target works
        let reply = create(&pool, &p, &new_comment(calc_a, "agreed", Some(root.id)))
            .await
            .unwrap()
            .attached()
            .unwrap();
        assert_eq!(reply.parent_comment_id, Some(root.id));

        // reply pointing at a different target is rejected
        let err = create(&pool, &p, &new_comment(calc_b, "wrong thread", Some(root.id)))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // missing parent is rejected
        let err = create(&pool, &p, &new_comment(calc_a, "orphan", Some(999)))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_edit_only_by_author_and_marks_edited() {
        let pool = setup_test_pool().await;
        let author = seed_user(&pool, "author").await;
        let other = seed_user(&pool, "other").await;
        let calc_id = seed_calculation(&pool, author).await;

        let comment = create(
            &pool,
            &Principal::new(author, "user"),
            &new_comment(calc_id, "first draft", None),
        )
        .await
        .unwrap()
        .attached()
        .unwrap();
        assert!(!comment.is_edited);

        let not_author = edit(&pool, &Principal::new(other, "user"), comment.id, "hijack").await.unwrap();
        assert!(not_author.is_none());

        let edited = edit(&pool, &Principal::new(author, "user"), comment.id, "second draft")
            .await
            .unwrap()
            .unwrap();
        assert!(edited.is_edited);
        assert_eq!(edited.content, "second draft");
    }

    #[tokio::test]
    async fn test_resolve_and_list_for_target() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "assessor1").await;
        let p = Principal::new(user, "user");
        let calc_id = seed_calculation(&pool, user).await;

        let first = create(&pool, &p, &new_comment(calc_id, "one", None))
            .await
            .unwrap()
            .attached()
            .unwrap();
        create(&pool, &p, &new_comment(calc_id, "two", None)).await.unwrap();

        assert!(set_resolved(&pool, first.id, true).await.unwrap());

        let listed = list_for_target(&pool, "calculation", calc_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "one");
        assert!(listed[0].is_resolved);
        assert!(!listed[1].is_resolved);
    }
}
