//! File-upload audit repository
//!
//! Tracks uploaded import files through pending, processing, and terminal
//! states. The upload bytes themselves are handled outside this crate.

use sqlx::{Row, SqlitePool};

use crate::core::constants::UPLOAD_STATUS_PENDING;
use crate::data::sqlite::error::SqliteError;
use crate::data::types::sync::FileUploadRow;
use crate::domain::payloads::sync::NewFileUpload;

use super::{clamp_limit, json_col};

pub async fn create(pool: &SqlitePool, upload: &NewFileUpload) -> Result<FileUploadRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO file_uploads (file_name, file_type, file_size, uploaded_by, total_items, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&upload.file_name)
    .bind(&upload.file_type)
    .bind(upload.file_size)
    .bind(upload.uploaded_by)
    .bind(upload.total_items)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(FileUploadRow {
        id: result.last_insert_rowid(),
        file_name: upload.file_name.clone(),
        file_type: upload.file_type.clone(),
        file_size: upload.file_size,
        uploaded_by: upload.uploaded_by,
        status: UPLOAD_STATUS_PENDING.to_string(),
        processed_items: 0,
        total_items: upload.total_items,
        error_count: 0,
        errors: serde_json::Value::Array(vec![]),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<FileUploadRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM file_uploads WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_upload(&r)).transpose()
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: &str) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE file_uploads SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record processing progress for an upload in flight
pub async fn update_progress(
    pool: &SqlitePool,
    id: i64,
    processed_items: i32,
    error_count: i32,
    errors: &serde_json::Value,
) -> Result<Option<FileUploadRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE file_uploads SET processed_items = ?, error_count = ?, errors = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(processed_items)
    .bind(error_count)
    .bind(errors.to_string())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

/// One user's uploads, newest first, paged
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    page: u32,
    limit: u32,
) -> Result<(Vec<FileUploadRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let rows = sqlx::query(
        "SELECT * FROM file_uploads WHERE uploaded_by = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM file_uploads WHERE uploaded_by = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let uploads = rows.iter().map(to_upload).collect::<Result<Vec<_>, _>>()?;
    Ok((uploads, total.0 as u64))
}

fn to_upload(row: &sqlx::sqlite::SqliteRow) -> Result<FileUploadRow, SqliteError> {
    Ok(FileUploadRow {
        id: row.try_get("id")?,
        file_name: row.try_get("file_name")?,
        file_type: row.try_get("file_type")?,
        file_size: row.try_get("file_size")?,
        uploaded_by: row.try_get("uploaded_by")?,
        status: row.try_get("status")?,
        processed_items: row.try_get("processed_items")?,
        total_items: row.try_get("total_items")?,
        error_count: row.try_get("error_count")?,
        errors: json_col(row, "errors")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{UPLOAD_STATUS_COMPLETED, UPLOAD_STATUS_PROCESSING};
    use crate::data::sqlite::repositories::{seed_user, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn upload(user_id: i64, file_name: &str) -> NewFileUpload {
        parse_payload(json!({
            "fileName": file_name,
            "fileType": "csv",
            "fileSize": 18_432,
            "uploadedBy": user_id,
            "totalItems": 250
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_starts_pending_with_zero_counters() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "importer").await;

        let created = create(&pool, &upload(user, "matrix_2025.csv")).await.unwrap();
        assert_eq!(created.status, "pending");
        assert_eq!(created.processed_items, 0);
        assert_eq!(created.error_count, 0);
        assert_eq!(created.errors, json!([]));

        let fetched = get(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_items, Some(250));
        assert_eq!(fetched.errors, json!([]));
    }

    #[tokio::test]
    async fn test_progress_and_status_updates() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "importer").await;
        let created = create(&pool, &upload(user, "matrix_2025.csv")).await.unwrap();

        assert!(set_status(&pool, created.id, UPLOAD_STATUS_PROCESSING).await.unwrap());

        let progressed = update_progress(
            &pool,
            created.id,
            120,
            2,
            &json!([{"row": 17, "message": "bad cell value"}, {"row": 84, "message": "bad cell value"}]),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(progressed.status, "processing");
        assert_eq!(progressed.processed_items, 120);
        assert_eq!(progressed.error_count, 2);

        assert!(set_status(&pool, created.id, UPLOAD_STATUS_COMPLETED).await.unwrap());
        let done = get(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(done.status, "completed");
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let pool = setup_test_pool().await;
        let importer = seed_user(&pool, "importer").await;
        let other = seed_user(&pool, "other").await;

        let first = create(&pool, &upload(importer, "a.csv")).await.unwrap();
        let second = create(&pool, &upload(importer, "b.csv")).await.unwrap();
        create(&pool, &upload(other, "c.csv")).await.unwrap();

        let (uploads, total) = list_for_user(&pool, importer, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(uploads[0].id, second.id);
        assert_eq!(uploads[1].id, first.id);
    }

    #[tokio::test]
    async fn test_missing_upload() {
        let pool = setup_test_pool().await;
        assert!(get(&pool, 404).await.unwrap().is_none());
        assert!(update_progress(&pool, 404, 1, 0, &json!([])).await.unwrap().is_none());
    }
}
