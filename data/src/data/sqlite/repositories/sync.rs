//! Ingestion repository: FTP connections, sync schedules, run history,
//! connection tests

use sqlx::{Row, SqlitePool};

use crate::core::constants::{
    CONNECTION_STATUS_UNKNOWN, SYNC_STATUS_FAILED, SYNC_STATUS_RUNNING, SYNC_STATUS_SUCCESS,
};
use crate::data::sqlite::error::SqliteError;
use crate::data::types::sync::{
    ConnectionHistoryRow, FtpConnectionRow, SyncHistoryRow, SyncScheduleRow,
};
use crate::domain::Principal;
use crate::domain::payloads::sync::{
    FtpConnectionUpdate, NewConnectionEvent, NewFtpConnection, NewSyncSchedule,
};

use super::{clamp_limit, json_col};

// -----------------------------------------------------------------------------
// FTP connections
// -----------------------------------------------------------------------------

/// Create a connection profile. At most one connection is the default; when
/// this one claims the flag, the previous holder loses it in the same
/// transaction.
pub async fn create_connection(
    pool: &SqlitePool,
    principal: &Principal,
    conn: &NewFtpConnection,
) -> Result<FtpConnectionRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    if conn.is_default {
        sqlx::query("UPDATE ftp_connections SET is_default = 0, updated_at = ? WHERE is_default = 1")
            .bind(now)
            .execute(&mut *tx)
            .await?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO ftp_connections
            (name, host, port, username, password, secure, passive_mode, default_path,
             description, status, created_by, is_default, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&conn.name)
    .bind(&conn.host)
    .bind(conn.port)
    .bind(&conn.username)
    .bind(&conn.password)
    .bind(conn.secure)
    .bind(conn.passive_mode)
    .bind(&conn.default_path)
    .bind(&conn.description)
    .bind(CONNECTION_STATUS_UNKNOWN)
    .bind(principal.user_id)
    .bind(conn.is_default)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(FtpConnectionRow {
        id: result.last_insert_rowid(),
        name: conn.name.clone(),
        host: conn.host.clone(),
        port: conn.port,
        username: conn.username.clone(),
        password: conn.password.clone(),
        secure: conn.secure,
        passive_mode: conn.passive_mode,
        default_path: conn.default_path.clone(),
        description: conn.description.clone(),
        last_connected: None,
        status: CONNECTION_STATUS_UNKNOWN.to_string(),
        created_by: principal.user_id,
        is_default: conn.is_default,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_connection(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<FtpConnectionRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM ftp_connections WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_connection(&r)).transpose()
}

pub async fn list_connections(pool: &SqlitePool) -> Result<Vec<FtpConnectionRow>, SqliteError> {
    let rows = sqlx::query("SELECT * FROM ftp_connections ORDER BY is_default DESC, name ASC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(to_connection).collect()
}

pub async fn default_connection(
    pool: &SqlitePool,
) -> Result<Option<FtpConnectionRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM ftp_connections WHERE is_default = 1")
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_connection(&r)).transpose()
}

/// Apply a partial update; any change refreshes `updated_at`
pub async fn update_connection(
    pool: &SqlitePool,
    id: i64,
    update: &FtpConnectionUpdate,
) -> Result<Option<FtpConnectionRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut sets: Vec<&str> = Vec::new();
    if update.name.is_some() {
        sets.push("name = ?");
    }
    if update.host.is_some() {
        sets.push("host = ?");
    }
    if update.port.is_some() {
        sets.push("port = ?");
    }
    if update.username.is_some() {
        sets.push("username = ?");
    }
    if update.password.is_some() {
        sets.push("password = ?");
    }
    if update.secure.is_some() {
        sets.push("secure = ?");
    }
    if update.passive_mode.is_some() {
        sets.push("passive_mode = ?");
    }
    if update.default_path.is_some() {
        sets.push("default_path = ?");
    }
    if update.description.is_some() {
        sets.push("description = ?");
    }

    if sets.is_empty() {
        return get_connection(pool, id).await;
    }
    sets.push("updated_at = ?");

    let sql = format!("UPDATE ftp_connections SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    if let Some(v) = &update.name {
        query = query.bind(v);
    }
    if let Some(v) = &update.host {
        query = query.bind(v);
    }
    if let Some(v) = update.port {
        query = query.bind(v);
    }
    if let Some(v) = &update.username {
        query = query.bind(v);
    }
    if let Some(v) = &update.password {
        query = query.bind(v);
    }
    if let Some(v) = update.secure {
        query = query.bind(v);
    }
    if let Some(v) = update.passive_mode {
        query = query.bind(v);
    }
    if let Some(v) = &update.default_path {
        query = query.bind(v);
    }
    if let Some(v) = &update.description {
        query = query.bind(v);
    }

    let result = query.bind(now).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_connection(pool, id).await
}

/// Move the default flag to this connection, atomically
pub async fn set_default_connection(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let result = sqlx::query("UPDATE ftp_connections SET is_default = 1, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE ftp_connections SET is_default = 0, updated_at = ? WHERE is_default = 1 AND id != ?")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// Record the outcome of a connection attempt on the profile
pub async fn mark_connection_status(
    pool: &SqlitePool,
    id: i64,
    status: &str,
    connected: bool,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = if connected {
        sqlx::query(
            "UPDATE ftp_connections SET status = ?, last_connected = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?
    } else {
        sqlx::query("UPDATE ftp_connections SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?
    };

    Ok(result.rows_affected() > 0)
}

/// Delete a connection; its schedules cascade
pub async fn delete_connection(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM ftp_connections WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------
// Sync schedules
// -----------------------------------------------------------------------------

pub async fn create_schedule(
    pool: &SqlitePool,
    schedule: &NewSyncSchedule,
) -> Result<SyncScheduleRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO sync_schedules
            (name, connection_id, source, destination, frequency, time, day_of_week,
             day_of_month, options, enabled, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&schedule.name)
    .bind(schedule.connection_id)
    .bind(schedule.source.to_string())
    .bind(schedule.destination.to_string())
    .bind(&schedule.frequency)
    .bind(&schedule.time)
    .bind(schedule.day_of_week)
    .bind(schedule.day_of_month)
    .bind(schedule.options.to_string())
    .bind(schedule.enabled)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(SyncScheduleRow {
        id: result.last_insert_rowid(),
        name: schedule.name.clone(),
        connection_id: schedule.connection_id,
        source: schedule.source.clone(),
        destination: schedule.destination.clone(),
        frequency: schedule.frequency.clone(),
        time: schedule.time.clone(),
        day_of_week: schedule.day_of_week,
        day_of_month: schedule.day_of_month,
        options: schedule.options.clone(),
        enabled: schedule.enabled,
        last_run: None,
        next_run: None,
        status: Some("idle".to_string()),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_schedule(pool: &SqlitePool, id: i64) -> Result<Option<SyncScheduleRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM sync_schedules WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_schedule(&r)).transpose()
}

pub async fn list_schedules(
    pool: &SqlitePool,
    enabled_only: bool,
) -> Result<Vec<SyncScheduleRow>, SqliteError> {
    let sql = if enabled_only {
        "SELECT * FROM sync_schedules WHERE enabled = 1 ORDER BY name ASC"
    } else {
        "SELECT * FROM sync_schedules ORDER BY name ASC"
    };
    let rows = sqlx::query(sql).fetch_all(pool).await?;

    rows.iter().map(to_schedule).collect()
}

pub async fn set_schedule_enabled(
    pool: &SqlitePool,
    id: i64,
    enabled: bool,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE sync_schedules SET enabled = ?, updated_at = ? WHERE id = ?")
        .bind(enabled)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_schedule(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM sync_schedules WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// -----------------------------------------------------------------------------
// Sync runs
// -----------------------------------------------------------------------------

/// Open a run record and mark the schedule running. Fails with `Conflict`
/// when the schedule is unknown.
pub async fn start_run(pool: &SqlitePool, schedule_id: i64) -> Result<SyncHistoryRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let schedule: Option<(i64, String)> =
        sqlx::query_as("SELECT connection_id, name FROM sync_schedules WHERE id = ?")
            .bind(schedule_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((connection_id, schedule_name)) = schedule else {
        return Err(SqliteError::Conflict(format!(
            "sync schedule {schedule_id} does not exist"
        )));
    };

    let result = sqlx::query(
        "INSERT INTO sync_history (schedule_id, connection_id, schedule_name, start_time, status) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(schedule_id)
    .bind(connection_id)
    .bind(&schedule_name)
    .bind(now)
    .bind(SYNC_STATUS_RUNNING)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE sync_schedules SET status = ?, last_run = ?, updated_at = ? WHERE id = ?")
        .bind(SYNC_STATUS_RUNNING)
        .bind(now)
        .bind(now)
        .bind(schedule_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(schedule_id, schedule_name = %schedule_name, "Sync run started");

    Ok(SyncHistoryRow {
        id: result.last_insert_rowid(),
        schedule_id,
        connection_id,
        schedule_name,
        start_time: now,
        end_time: None,
        status: SYNC_STATUS_RUNNING.to_string(),
        files_transferred: 0,
        total_bytes: 0,
        errors: serde_json::Value::Array(vec![]),
        details: serde_json::Value::Array(vec![]),
    })
}

/// Close a run record with its results and settle the schedule status
pub async fn finish_run(
    pool: &SqlitePool,
    run_id: i64,
    success: bool,
    files_transferred: i32,
    total_bytes: i64,
    errors: &serde_json::Value,
    details: &serde_json::Value,
) -> Result<Option<SyncHistoryRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let status = if success { SYNC_STATUS_SUCCESS } else { SYNC_STATUS_FAILED };
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE sync_history SET end_time = ?, status = ?, files_transferred = ?, \
         total_bytes = ?, errors = ?, details = ? WHERE id = ?",
    )
    .bind(now)
    .bind(status)
    .bind(files_transferred)
    .bind(total_bytes)
    .bind(errors.to_string())
    .bind(details.to_string())
    .bind(run_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query(
        "UPDATE sync_schedules SET status = ?, updated_at = ? \
         WHERE id = (SELECT schedule_id FROM sync_history WHERE id = ?)",
    )
    .bind(status)
    .bind(now)
    .bind(run_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let row = sqlx::query("SELECT * FROM sync_history WHERE id = ?")
        .bind(run_id)
        .fetch_one(pool)
        .await?;
    to_run(&row).map(Some)
}

/// Runs of one schedule, newest first, paged
pub async fn list_runs(
    pool: &SqlitePool,
    schedule_id: i64,
    page: u32,
    limit: u32,
) -> Result<(Vec<SyncHistoryRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let rows = sqlx::query(
        "SELECT * FROM sync_history WHERE schedule_id = ? \
         ORDER BY start_time DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(schedule_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sync_history WHERE schedule_id = ?")
        .bind(schedule_id)
        .fetch_one(pool)
        .await?;

    let runs = rows.iter().map(to_run).collect::<Result<Vec<_>, _>>()?;
    Ok((runs, total.0 as u64))
}

// -----------------------------------------------------------------------------
// Connection tests
// -----------------------------------------------------------------------------

pub async fn record_connection_event(
    pool: &SqlitePool,
    event: &NewConnectionEvent,
) -> Result<ConnectionHistoryRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO connection_history (connection_type, status, message, details, user_id, timestamp) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&event.connection_type)
    .bind(&event.status)
    .bind(&event.message)
    .bind(event.details.to_string())
    .bind(event.user_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ConnectionHistoryRow {
        id: result.last_insert_rowid(),
        connection_type: event.connection_type.clone(),
        status: event.status.clone(),
        message: event.message.clone(),
        details: event.details.clone(),
        user_id: event.user_id,
        timestamp: now,
    })
}

pub async fn list_connection_events(
    pool: &SqlitePool,
    connection_type: Option<&str>,
    page: u32,
    limit: u32,
) -> Result<(Vec<ConnectionHistoryRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let (rows, total) = if let Some(connection_type) = connection_type {
        let rows = sqlx::query(
            "SELECT * FROM connection_history WHERE connection_type = ? \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(connection_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM connection_history WHERE connection_type = ?")
                .bind(connection_type)
                .fetch_one(pool)
                .await?;
        (rows, total)
    } else {
        let rows = sqlx::query(
            "SELECT * FROM connection_history ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connection_history")
            .fetch_one(pool)
            .await?;
        (rows, total)
    };

    let events = rows.iter().map(to_event).collect::<Result<Vec<_>, _>>()?;
    Ok((events, total.0 as u64))
}

fn to_connection(row: &sqlx::sqlite::SqliteRow) -> Result<FtpConnectionRow, SqliteError> {
    Ok(FtpConnectionRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        host: row.try_get("host")?,
        port: row.try_get("port")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        secure: row.try_get("secure")?,
        passive_mode: row.try_get("passive_mode")?,
        default_path: row.try_get("default_path")?,
        description: row.try_get("description")?,
        last_connected: row.try_get("last_connected")?,
        status: row.try_get("status")?,
        created_by: row.try_get("created_by")?,
        is_default: row.try_get("is_default")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_schedule(row: &sqlx::sqlite::SqliteRow) -> Result<SyncScheduleRow, SqliteError> {
    Ok(SyncScheduleRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        connection_id: row.try_get("connection_id")?,
        source: json_col(row, "source")?,
        destination: json_col(row, "destination")?,
        frequency: row.try_get("frequency")?,
        time: row.try_get("time")?,
        day_of_week: row.try_get("day_of_week")?,
        day_of_month: row.try_get("day_of_month")?,
        options: json_col(row, "options")?,
        enabled: row.try_get("enabled")?,
        last_run: row.try_get("last_run")?,
        next_run: row.try_get("next_run")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_run(row: &sqlx::sqlite::SqliteRow) -> Result<SyncHistoryRow, SqliteError> {
    Ok(SyncHistoryRow {
        id: row.try_get("id")?,
        schedule_id: row.try_get("schedule_id")?,
        connection_id: row.try_get("connection_id")?,
        schedule_name: row.try_get("schedule_name")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        status: row.try_get("status")?,
        files_transferred: row.try_get("files_transferred")?,
        total_bytes: row.try_get("total_bytes")?,
        errors: json_col(row, "errors")?,
        details: json_col(row, "details")?,
    })
}

fn to_event(row: &sqlx::sqlite::SqliteRow) -> Result<ConnectionHistoryRow, SqliteError> {
    Ok(ConnectionHistoryRow {
        id: row.try_get("id")?,
        connection_type: row.try_get("connection_type")?,
        status: row.try_get("status")?,
        message: row.try_get("message")?,
        details: json_col(row, "details")?,
        user_id: row.try_get("user_id")?,
        timestamp: row.try_get("timestamp")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{seed_user, setup_test_pool};
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn connection(name: &str, is_default: bool) -> NewFtpConnection {
        parse_payload(json!({
            "name": name,
            "host": "ftp.example.gov",
            "username": "sync",
            "password": "secret",
            "isDefault": is_default
        }))
        .unwrap()
    }

    fn schedule(connection_id: i64, name: &str) -> NewSyncSchedule {
        parse_payload(json!({
            "name": name,
            "connectionId": connection_id,
            "source": {"path": "/exports"},
            "destination": {"table": "benton_matrix"},
            "frequency": "manual"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_default_connection() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "operator").await;
        let p = Principal::new(user, "admin");

        let a = create_connection(&pool, &p, &connection("a", true)).await.unwrap();
        let b = create_connection(&pool, &p, &connection("b", true)).await.unwrap();

        let default = default_connection(&pool).await.unwrap().unwrap();
        assert_eq!(default.id, b.id);

        assert!(set_default_connection(&pool, a.id).await.unwrap());
        let default = default_connection(&pool).await.unwrap().unwrap();
        assert_eq!(default.id, a.id);

        let defaults: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ftp_connections WHERE is_default = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(defaults, 1);
    }

    #[tokio::test]
    async fn test_run_lifecycle() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "operator").await;
        let p = Principal::new(user, "admin");

        let conn = create_connection(&pool, &p, &connection("a", false)).await.unwrap();
        let sched = create_schedule(&pool, &schedule(conn.id, "Nightly pull")).await.unwrap();

        let run = start_run(&pool, sched.id).await.unwrap();
        assert_eq!(run.status, "running");
        assert_eq!(get_schedule(&pool, sched.id).await.unwrap().unwrap().status.as_deref(), Some("running"));

        let finished = finish_run(&pool, run.id, true, 12, 4096, &json!([]), &json!([{"file": "x.csv"}]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finished.status, "success");
        assert_eq!(finished.files_transferred, 12);
        assert!(finished.end_time.is_some());
        assert_eq!(get_schedule(&pool, sched.id).await.unwrap().unwrap().status.as_deref(), Some("success"));

        let (runs, total) = list_runs(&pool, sched.id, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(runs[0].id, run.id);
    }

    #[tokio::test]
    async fn test_start_run_unknown_schedule_conflicts() {
        let pool = setup_test_pool().await;
        assert!(start_run(&pool, 42).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_delete_connection_cascades_schedules() {
        let pool = setup_test_pool().await;
        let user = seed_user(&pool, "operator").await;
        let p = Principal::new(user, "admin");

        let conn = create_connection(&pool, &p, &connection("a", false)).await.unwrap();
        create_schedule(&pool, &schedule(conn.id, "Nightly pull")).await.unwrap();

        assert!(delete_connection(&pool, conn.id).await.unwrap());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sync_schedules")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_connection_events_filtered_listing() {
        let pool = setup_test_pool().await;

        for (kind, status) in [("ftp", "connected"), ("ftp", "error"), ("arcgis", "connected")] {
            let event: NewConnectionEvent = parse_payload(json!({
                "connectionType": kind,
                "status": status,
                "message": "probe"
            }))
            .unwrap();
            record_connection_event(&pool, &event).await.unwrap();
        }

        let (ftp_events, ftp_total) = list_connection_events(&pool, Some("ftp"), 1, 10).await.unwrap();
        assert_eq!(ftp_total, 2);
        assert_eq!(ftp_events.len(), 2);

        let (_, all_total) = list_connection_events(&pool, None, 1, 10).await.unwrap();
        assert_eq!(all_total, 3);
    }
}
