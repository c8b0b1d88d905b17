//! Ingestion payloads: FTP connections, sync schedules, connection events,
//! file uploads

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::core::constants::{
    DEFAULT_FTP_PORT, SYNC_FREQ_DAILY, SYNC_FREQ_MONTHLY, SYNC_FREQ_WEEKLY,
};

use super::{default_true, empty_json_object};

/// New FTP connection profile
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFtpConnection {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 255))]
    pub host: String,

    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(default)]
    pub secure: bool,

    #[serde(default = "default_true")]
    pub passive_mode: bool,

    pub default_path: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}

fn default_port() -> u16 {
    DEFAULT_FTP_PORT
}

/// Partial FTP connection update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FtpConnectionUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub host: Option<String>,

    #[validate(range(min = 1))]
    pub port: Option<u16>,

    #[validate(length(min = 1, max = 128))]
    pub username: Option<String>,

    #[validate(length(min = 1))]
    pub password: Option<String>,

    pub secure: Option<bool>,
    pub passive_mode: Option<bool>,
    pub default_path: Option<String>,
    pub description: Option<String>,
}

/// New sync schedule. Frequency decides which timing fields are required:
/// daily, weekly, and monthly runs need a time of day; weekly additionally a
/// day of week; monthly a day of month.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_schedule_timing"))]
pub struct NewSyncSchedule {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub connection_id: i64,

    pub source: serde_json::Value,

    pub destination: serde_json::Value,

    #[validate(custom(function = "crate::domain::validate::valid_sync_frequency"))]
    pub frequency: String,

    #[validate(custom(function = "crate::domain::validate::valid_time_of_day"))]
    pub time: Option<String>,

    /// 0 = Sunday .. 6 = Saturday
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i32>,

    #[validate(range(min = 1, max = 31))]
    pub day_of_month: Option<i32>,

    #[serde(default = "empty_json_object")]
    pub options: serde_json::Value,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn validate_schedule_timing(schedule: &NewSyncSchedule) -> Result<(), ValidationError> {
    let needs_time = [SYNC_FREQ_DAILY, SYNC_FREQ_WEEKLY, SYNC_FREQ_MONTHLY]
        .contains(&schedule.frequency.as_str());
    if needs_time && schedule.time.is_none() {
        let mut error = ValidationError::new("missing_time");
        error.message = Some("time is required for daily, weekly, and monthly schedules".into());
        return Err(error);
    }
    if schedule.frequency == SYNC_FREQ_WEEKLY && schedule.day_of_week.is_none() {
        let mut error = ValidationError::new("missing_day_of_week");
        error.message = Some("dayOfWeek is required for weekly schedules".into());
        return Err(error);
    }
    if schedule.frequency == SYNC_FREQ_MONTHLY && schedule.day_of_month.is_none() {
        let mut error = ValidationError::new("missing_day_of_month");
        error.message = Some("dayOfMonth is required for monthly schedules".into());
        return Err(error);
    }
    Ok(())
}

/// One connection test outcome to record
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewConnectionEvent {
    #[validate(length(min = 1, max = 32))]
    pub connection_type: String,

    #[validate(custom(function = "crate::domain::validate::valid_connection_status"))]
    pub status: String,

    #[validate(length(min = 1))]
    pub message: String,

    #[serde(default = "empty_json_object")]
    pub details: serde_json::Value,

    pub user_id: Option<i64>,
}

/// New file-upload audit record; starts pending with zero counters
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFileUpload {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    #[validate(length(min = 1, max = 64))]
    pub file_type: String,

    #[validate(range(min = 0))]
    pub file_size: i64,

    pub uploaded_by: i64,

    #[validate(range(min = 0))]
    pub total_items: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn schedule(frequency: &str, extra: serde_json::Value) -> serde_json::Value {
        let mut payload = json!({
            "name": "Nightly matrix pull",
            "connectionId": 1,
            "source": {"path": "/exports"},
            "destination": {"table": "benton_matrix"},
            "frequency": frequency
        });
        payload
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        payload
    }

    #[test]
    fn test_ftp_defaults() {
        let conn: NewFtpConnection = parse_payload(json!({
            "name": "County export server",
            "host": "ftp.example.gov",
            "username": "sync",
            "password": "secret"
        }))
        .unwrap();
        assert_eq!(conn.port, 21);
        assert!(conn.passive_mode);
        assert!(!conn.secure);
    }

    #[test]
    fn test_daily_schedule_requires_time() {
        let err = parse_payload::<NewSyncSchedule>(schedule("daily", json!({}))).unwrap_err();
        assert!(err.field_errors().is_some());

        let ok: NewSyncSchedule =
            parse_payload(schedule("daily", json!({"time": "02:30"}))).unwrap();
        assert!(ok.enabled);
    }

    #[test]
    fn test_weekly_schedule_requires_day_of_week() {
        let err = parse_payload::<NewSyncSchedule>(schedule("weekly", json!({"time": "02:30"})))
            .unwrap_err();
        assert!(err.field_errors().is_some());

        assert!(parse_payload::<NewSyncSchedule>(schedule(
            "weekly",
            json!({"time": "02:30", "dayOfWeek": 1})
        ))
        .is_ok());
    }

    #[test]
    fn test_manual_schedule_needs_no_timing() {
        assert!(parse_payload::<NewSyncSchedule>(schedule("manual", json!({}))).is_ok());
    }

    #[test]
    fn test_bad_time_format() {
        let err = parse_payload::<NewSyncSchedule>(schedule("daily", json!({"time": "2:30"})))
            .unwrap_err();
        assert!(err.field_errors().is_some());
    }
}
