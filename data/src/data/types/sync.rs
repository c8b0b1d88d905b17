//! Ingestion row types: FTP connections, sync schedules, run history,
//! connection tests, file uploads

use serde::{Deserialize, Serialize};

/// FTP connection profile. Credentials are stored as given; the FTP client
/// itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpConnectionRow {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub secure: bool,
    pub passive_mode: bool,
    pub default_path: Option<String>,
    pub description: Option<String>,
    pub last_connected: Option<i64>,
    pub status: String,
    pub created_by: i64,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Scheduled sync definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncScheduleRow {
    pub id: i64,
    pub name: String,
    pub connection_id: i64,
    pub source: serde_json::Value,
    pub destination: serde_json::Value,
    pub frequency: String,
    pub time: Option<String>,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub options: serde_json::Value,
    pub enabled: bool,
    pub last_run: Option<i64>,
    pub next_run: Option<i64>,
    pub status: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Audit record of one sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncHistoryRow {
    pub id: i64,
    pub schedule_id: i64,
    pub connection_id: i64,
    pub schedule_name: String,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: String,
    pub files_transferred: i32,
    pub total_bytes: i64,
    pub errors: serde_json::Value,
    pub details: serde_json::Value,
}

/// One connection test (FTP or otherwise) and its outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionHistoryRow {
    pub id: i64,
    pub connection_type: String,
    pub status: String,
    pub message: String,
    pub details: serde_json::Value,
    pub user_id: Option<i64>,
    pub timestamp: i64,
}

/// File-upload audit row; upload handling itself is external
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadRow {
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by: i64,
    pub status: String,
    pub processed_items: i32,
    pub total_items: Option<i32>,
    pub error_count: i32,
    pub errors: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}
