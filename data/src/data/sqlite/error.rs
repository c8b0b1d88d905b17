//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A write violated a uniqueness or integrity invariant. The message
    /// names the constraint so the caller can re-read and decide.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid decimal in column {column}: {value}")]
    Decimal {
        column: &'static str,
        value: String,
    },

    #[error("Invalid JSON in column {column}: {error}")]
    Json {
        column: &'static str,
        error: String,
    },
}

impl SqliteError {
    /// True when the error is a uniqueness-constraint conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Map a unique-constraint violation to [`SqliteError::Conflict`], naming the
/// duplicated key. Other database errors pass through unchanged.
pub(crate) fn map_unique(e: sqlx::Error, what: &str) -> SqliteError {
    if let sqlx::Error::Database(db) = &e
        && db.kind() == sqlx::error::ErrorKind::UniqueViolation
    {
        return SqliteError::Conflict(format!("{what} already exists"));
    }
    SqliteError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 2,
            name: "add_cost_matrix".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_cost_matrix) failed: syntax error"
        );
    }

    #[test]
    fn test_conflict_display_and_predicate() {
        let err = SqliteError::Conflict("cost matrix for (region, building type, year)".into());
        assert!(err.is_conflict());
        assert!(err.to_string().starts_with("Conflict:"));
    }

    #[test]
    fn test_decimal_error_display() {
        let err = SqliteError::Decimal {
            column: "base_cost",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid decimal in column base_cost: abc");
    }

    #[test]
    fn test_map_unique_passthrough() {
        let err = map_unique(sqlx::Error::PoolClosed, "whatever");
        assert!(matches!(err, SqliteError::Database(_)));
    }
}
