// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "TerraBuild";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "terrabuild";

// =============================================================================
// Configuration Files / Environment Variables
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "terrabuild.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TERRABUILD_CONFIG";

/// Environment variable to override the data directory
pub const ENV_DATA_DIR: &str = "TERRABUILD_DATA_DIR";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TERRABUILD_LOG";

// =============================================================================
// SQLite
// =============================================================================

/// Database file name
pub const SQLITE_DB_FILENAME: &str = "terrabuild.db";

/// Max pool connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout before a locked write gives up
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// Page cache size pragma (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// WAL autocheckpoint pragma (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

// =============================================================================
// Pagination
// =============================================================================

/// Default page size for listings
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Hard cap on page size
pub const MAX_PAGE_LIMIT: u32 = 500;

// =============================================================================
// Users
// =============================================================================

pub const USER_ROLE_USER: &str = "user";
pub const USER_ROLE_ADMIN: &str = "admin";

pub const USER_ROLES: [&str; 2] = [USER_ROLE_USER, USER_ROLE_ADMIN];

// =============================================================================
// Collaboration
// =============================================================================

pub const PROJECT_ROLE_VIEWER: &str = "viewer";
pub const PROJECT_ROLE_EDITOR: &str = "editor";
pub const PROJECT_ROLE_ADMIN: &str = "admin";

pub const PROJECT_ROLES: [&str; 3] = [
    PROJECT_ROLE_VIEWER,
    PROJECT_ROLE_EDITOR,
    PROJECT_ROLE_ADMIN,
];

pub const PROJECT_STATUS_ACTIVE: &str = "active";
pub const PROJECT_STATUS_ARCHIVED: &str = "archived";

pub const PROJECT_STATUSES: [&str; 2] = [PROJECT_STATUS_ACTIVE, PROJECT_STATUS_ARCHIVED];

pub const INVITATION_STATUS_PENDING: &str = "pending";
pub const INVITATION_STATUS_ACCEPTED: &str = "accepted";
pub const INVITATION_STATUS_DECLINED: &str = "declined";

pub const LINK_ACCESS_VIEW: &str = "view";
pub const LINK_ACCESS_EDIT: &str = "edit";
pub const LINK_ACCESS_ADMIN: &str = "admin";

pub const LINK_ACCESS_LEVELS: [&str; 3] = [LINK_ACCESS_VIEW, LINK_ACCESS_EDIT, LINK_ACCESS_ADMIN];

/// Random bytes in a shareable link token (hex-encoded, so 2x chars)
pub const SHARED_LINK_TOKEN_BYTES: usize = 24;

// =============================================================================
// Cost data
// =============================================================================

/// Region used when a material cost has no row for the requested region
pub const DEFAULT_FALLBACK_REGION: &str = "National";

// =============================================================================
// Ingestion / sync
// =============================================================================

pub const SYNC_FREQ_HOURLY: &str = "hourly";
pub const SYNC_FREQ_DAILY: &str = "daily";
pub const SYNC_FREQ_WEEKLY: &str = "weekly";
pub const SYNC_FREQ_MONTHLY: &str = "monthly";
pub const SYNC_FREQ_MANUAL: &str = "manual";

pub const SYNC_FREQUENCIES: [&str; 5] = [
    SYNC_FREQ_HOURLY,
    SYNC_FREQ_DAILY,
    SYNC_FREQ_WEEKLY,
    SYNC_FREQ_MONTHLY,
    SYNC_FREQ_MANUAL,
];

pub const SYNC_STATUS_IDLE: &str = "idle";
pub const SYNC_STATUS_RUNNING: &str = "running";
pub const SYNC_STATUS_SUCCESS: &str = "success";
pub const SYNC_STATUS_FAILED: &str = "failed";

pub const CONNECTION_STATUS_UNKNOWN: &str = "unknown";
pub const CONNECTION_STATUS_CONNECTED: &str = "connected";
pub const CONNECTION_STATUS_DISCONNECTED: &str = "disconnected";
pub const CONNECTION_STATUS_ERROR: &str = "error";

pub const CONNECTION_STATUSES: [&str; 4] = [
    CONNECTION_STATUS_UNKNOWN,
    CONNECTION_STATUS_CONNECTED,
    CONNECTION_STATUS_DISCONNECTED,
    CONNECTION_STATUS_ERROR,
];

pub const DEFAULT_FTP_PORT: u16 = 21;

// =============================================================================
// File uploads
// =============================================================================

pub const UPLOAD_STATUS_PENDING: &str = "pending";
pub const UPLOAD_STATUS_PROCESSING: &str = "processing";
pub const UPLOAD_STATUS_COMPLETED: &str = "completed";
pub const UPLOAD_STATUS_FAILED: &str = "failed";

pub const UPLOAD_STATUSES: [&str; 4] = [
    UPLOAD_STATUS_PENDING,
    UPLOAD_STATUS_PROCESSING,
    UPLOAD_STATUS_COMPLETED,
    UPLOAD_STATUS_FAILED,
];
