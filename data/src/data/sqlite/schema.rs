//! SQLite schema definitions
//!
//! Initial schema with all tables. Column names and decimal (precision,
//! scale) pairs are the wire contract with existing exports and reports;
//! decimals are stored as TEXT and validated against their declared bounds
//! before any write, timestamps are Unix epoch seconds.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('user', 'admin')),
    name TEXT,
    is_active INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 2. Cost factors (region/type baseline multipliers)
-- =============================================================================
CREATE TABLE IF NOT EXISTS cost_factors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    region TEXT NOT NULL,
    building_type TEXT NOT NULL,
    base_cost TEXT NOT NULL,                              -- decimal(10,2)
    complexity_factor TEXT NOT NULL DEFAULT '1.0',        -- decimal(5,2)
    region_factor TEXT NOT NULL DEFAULT '1.0',            -- decimal(5,2)
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cost_factors_region_type ON cost_factors(region, building_type);

-- =============================================================================
-- 3. Cost matrix (authoritative per-region/type baseline by matrix year)
-- =============================================================================
CREATE TABLE IF NOT EXISTS cost_matrix (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    region TEXT NOT NULL,
    building_type TEXT NOT NULL,
    building_type_description TEXT NOT NULL,
    base_cost TEXT NOT NULL,                              -- decimal(14,2)
    matrix_year INTEGER NOT NULL,
    source_matrix_id INTEGER NOT NULL,
    matrix_description TEXT NOT NULL,
    data_points INTEGER NOT NULL DEFAULT 0,
    min_cost TEXT,                                        -- decimal(14,2)
    max_cost TEXT,                                        -- decimal(14,2)
    complexity_factor_base TEXT NOT NULL DEFAULT '1.0',   -- decimal(5,2)
    quality_factor_base TEXT NOT NULL DEFAULT '1.0',      -- decimal(5,2)
    condition_factor_base TEXT NOT NULL DEFAULT '1.0',    -- decimal(5,2)
    county TEXT,
    state TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS region_building_type_year_idx
    ON cost_matrix(region, building_type, matrix_year);

-- =============================================================================
-- 4. Material catalog
-- =============================================================================
CREATE TABLE IF NOT EXISTS material_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    description TEXT,
    unit TEXT NOT NULL DEFAULT 'sqft',
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS material_costs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    material_type_id INTEGER NOT NULL REFERENCES material_types(id),
    building_type TEXT NOT NULL,
    region TEXT NOT NULL,
    cost_per_unit TEXT NOT NULL,                          -- decimal(10,2)
    default_percentage TEXT NOT NULL,                     -- decimal(5,2)
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS material_building_region_idx
    ON material_costs(material_type_id, building_type, region);

-- =============================================================================
-- 5. Saved estimates and their material line items
-- =============================================================================
CREATE TABLE IF NOT EXISTS building_costs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    region TEXT NOT NULL,
    building_type TEXT NOT NULL,
    square_footage INTEGER NOT NULL,
    cost_per_sqft TEXT NOT NULL,                          -- decimal(10,2)
    total_cost TEXT NOT NULL,                             -- decimal(14,2)
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS building_cost_materials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    building_cost_id INTEGER NOT NULL REFERENCES building_costs(id) ON DELETE CASCADE,
    material_type_id INTEGER NOT NULL REFERENCES material_types(id),
    quantity TEXT NOT NULL,                               -- decimal(10,2)
    cost_per_unit TEXT NOT NULL,                          -- decimal(10,2)
    percentage TEXT NOT NULL,                             -- decimal(5,2)
    total_cost TEXT NOT NULL,                             -- decimal(14,2)
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bcm_building_cost ON building_cost_materials(building_cost_id);

-- =============================================================================
-- 6. Calculation history (append-only)
-- =============================================================================
CREATE TABLE IF NOT EXISTS calculation_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    name TEXT,
    region TEXT NOT NULL,
    building_type TEXT NOT NULL,
    square_footage INTEGER NOT NULL,
    base_cost TEXT NOT NULL,
    region_factor TEXT NOT NULL,
    complexity TEXT NOT NULL,
    complexity_factor TEXT NOT NULL,
    quality TEXT,
    quality_factor TEXT,
    condition TEXT,
    condition_factor TEXT,
    cost_per_sqft TEXT NOT NULL,
    total_cost TEXT NOT NULL,
    adjusted_cost TEXT NOT NULL,
    assessed_value TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_calc_history_user ON calculation_history(user_id, created_at DESC);

-- =============================================================================
-- 7. Benton assessment matrix reference tables (imported, versioned by year)
-- =============================================================================
CREATE TABLE IF NOT EXISTS benton_matrix_axis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    matrix_year INTEGER NOT NULL,
    axis_cd TEXT NOT NULL,
    data_type TEXT NOT NULL,
    lookup_query TEXT,
    matrix_type TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS benton_matrix (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    matrix_id INTEGER NOT NULL,
    matrix_year INTEGER NOT NULL,
    label TEXT NOT NULL,
    axis_1 TEXT NOT NULL,
    axis_2 TEXT NOT NULL,
    matrix_description TEXT NOT NULL,
    operator TEXT NOT NULL,
    default_cell_value TEXT NOT NULL,                     -- decimal(10,2)
    b_interpolate INTEGER NOT NULL DEFAULT 0,
    matrix_type TEXT NOT NULL,
    matrix_sub_type_cd TEXT,
    created_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS benton_matrix_id_year_idx
    ON benton_matrix(matrix_id, matrix_year);

CREATE TABLE IF NOT EXISTS benton_matrix_detail (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    matrix_id INTEGER NOT NULL,
    matrix_year INTEGER NOT NULL,
    axis_1_value TEXT NOT NULL,
    axis_2_value TEXT NOT NULL,
    cell_value TEXT NOT NULL,                             -- decimal(14,2)
    created_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS benton_matrix_detail_cell_idx
    ON benton_matrix_detail(matrix_id, matrix_year, axis_1_value, axis_2_value);

CREATE TABLE IF NOT EXISTS benton_imprv_sched_matrix_assoc (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imprv_det_meth_cd TEXT NOT NULL,
    imprv_det_type_cd TEXT NOT NULL,
    imprv_det_class_cd TEXT NOT NULL,
    imprv_yr INTEGER NOT NULL,
    matrix_id INTEGER NOT NULL,
    matrix_order INTEGER NOT NULL,
    adj_factor INTEGER NOT NULL,
    imprv_det_sub_class_cd TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS benton_depreciation_matrix (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    val_sub_element TEXT NOT NULL,
    matrix_id INTEGER NOT NULL,
    age INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    condition_mapped TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- =============================================================================
-- 8. What-if scenarios
-- =============================================================================
CREATE TABLE IF NOT EXISTS what_if_scenarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    name TEXT NOT NULL,
    description TEXT,
    base_calculation_id INTEGER REFERENCES calculation_history(id),
    parameters TEXT NOT NULL,                             -- json
    results TEXT NOT NULL DEFAULT '{}',                   -- json
    is_saved INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS scenario_variations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scenario_id INTEGER NOT NULL REFERENCES what_if_scenarios(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    parameter_key TEXT NOT NULL,
    original_value TEXT NOT NULL,                         -- json
    new_value TEXT NOT NULL,                              -- json
    impact_value TEXT,                                    -- decimal(14,2)
    impact_percentage TEXT,                               -- decimal(5,2)
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scenario_variations ON scenario_variations(scenario_id);

CREATE TABLE IF NOT EXISTS scenario_impacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scenario_id INTEGER NOT NULL REFERENCES what_if_scenarios(id) ON DELETE CASCADE,
    analysis_type TEXT NOT NULL,
    impact_summary TEXT NOT NULL,                         -- json
    calculated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scenario_impacts ON scenario_impacts(scenario_id);

-- =============================================================================
-- 9. Collaboration: projects, members, invitations, items, links, activities
-- =============================================================================
CREATE TABLE IF NOT EXISTS shared_projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    created_by_id INTEGER NOT NULL REFERENCES users(id),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active', 'archived')),
    is_public INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS project_members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES shared_projects(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id),
    role TEXT NOT NULL DEFAULT 'viewer' CHECK(role IN ('viewer', 'editor', 'admin')),
    joined_at INTEGER NOT NULL,
    invited_by INTEGER NOT NULL REFERENCES users(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS project_user_idx ON project_members(project_id, user_id);

CREATE TABLE IF NOT EXISTS project_invitations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES shared_projects(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id),
    invited_by INTEGER NOT NULL REFERENCES users(id),
    role TEXT NOT NULL DEFAULT 'viewer' CHECK(role IN ('viewer', 'editor', 'admin')),
    status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending', 'accepted', 'declined')),
    invited_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS project_invitation_idx ON project_invitations(project_id, user_id);

CREATE TABLE IF NOT EXISTS project_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES shared_projects(id) ON DELETE CASCADE,
    item_type TEXT NOT NULL,
    item_id INTEGER NOT NULL,
    added_by INTEGER NOT NULL REFERENCES users(id),
    added_at INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS project_item_idx ON project_items(project_id, item_type, item_id);

CREATE TABLE IF NOT EXISTS shared_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES shared_projects(id) ON DELETE CASCADE,
    token TEXT NOT NULL UNIQUE,
    access_level TEXT NOT NULL DEFAULT 'view' CHECK(access_level IN ('view', 'edit', 'admin')),
    expires_at INTEGER,
    created_at INTEGER NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id),
    description TEXT
);

CREATE TABLE IF NOT EXISTS project_activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES shared_projects(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id),
    activity_type TEXT NOT NULL,
    activity_data TEXT,                                   -- json
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_project_activities ON project_activities(project_id, created_at DESC);

-- =============================================================================
-- 10. Comments (polymorphic target, integrity checked at application layer)
-- =============================================================================
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    target_type TEXT NOT NULL,
    target_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    parent_comment_id INTEGER REFERENCES comments(id),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    is_resolved INTEGER NOT NULL DEFAULT 0,
    is_edited INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS target_type_id_idx ON comments(target_type, target_id);

-- =============================================================================
-- 11. Materials price cache (expiring third-party lookups)
-- =============================================================================
CREATE TABLE IF NOT EXISTS materials_price_cache (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    material_code TEXT NOT NULL,
    source TEXT NOT NULL,
    region TEXT NOT NULL,
    price TEXT NOT NULL,                                  -- decimal(10,2)
    unit TEXT NOT NULL,
    fetched_at INTEGER NOT NULL,
    valid_until INTEGER NOT NULL,
    metadata TEXT                                          -- json
);

CREATE UNIQUE INDEX IF NOT EXISTS material_code_source_region_idx
    ON materials_price_cache(material_code, source, region);

-- =============================================================================
-- 12. Cost factor presets
-- =============================================================================
CREATE TABLE IF NOT EXISTS cost_factor_presets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    weights TEXT NOT NULL,                                -- json
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 13. File upload audit trail
-- =============================================================================
CREATE TABLE IF NOT EXISTS file_uploads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    uploaded_by INTEGER NOT NULL REFERENCES users(id),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK(status IN ('pending', 'processing', 'completed', 'failed')),
    processed_items INTEGER NOT NULL DEFAULT 0,
    total_items INTEGER,
    error_count INTEGER NOT NULL DEFAULT 0,
    errors TEXT NOT NULL DEFAULT '[]',                    -- json
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 14. Ingestion: FTP connections, sync schedules, run history
-- =============================================================================
CREATE TABLE IF NOT EXISTS ftp_connections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    host TEXT NOT NULL,
    port INTEGER NOT NULL DEFAULT 21,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    secure INTEGER NOT NULL DEFAULT 0,
    passive_mode INTEGER NOT NULL DEFAULT 1,
    default_path TEXT DEFAULT '/',
    description TEXT,
    last_connected INTEGER,
    status TEXT NOT NULL DEFAULT 'unknown'
        CHECK(status IN ('connected', 'disconnected', 'error', 'unknown')),
    created_by INTEGER NOT NULL REFERENCES users(id),
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_schedules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    connection_id INTEGER NOT NULL REFERENCES ftp_connections(id) ON DELETE CASCADE,
    source TEXT NOT NULL,                                 -- json {type, path}
    destination TEXT NOT NULL,                            -- json {type, path}
    frequency TEXT NOT NULL
        CHECK(frequency IN ('hourly', 'daily', 'weekly', 'monthly', 'manual')),
    time TEXT,
    day_of_week INTEGER,
    day_of_month INTEGER,
    options TEXT NOT NULL DEFAULT '{}',                   -- json
    enabled INTEGER NOT NULL DEFAULT 1,
    last_run INTEGER,
    next_run INTEGER,
    status TEXT DEFAULT 'idle',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    schedule_id INTEGER NOT NULL,
    connection_id INTEGER NOT NULL,
    schedule_name TEXT NOT NULL,
    start_time INTEGER NOT NULL,
    end_time INTEGER,
    status TEXT NOT NULL,
    files_transferred INTEGER NOT NULL DEFAULT 0,
    total_bytes INTEGER NOT NULL DEFAULT 0,
    errors TEXT NOT NULL DEFAULT '[]',                    -- json
    details TEXT NOT NULL DEFAULT '[]'                    -- json
);

CREATE INDEX IF NOT EXISTS idx_sync_history_schedule ON sync_history(schedule_id, start_time DESC);

-- =============================================================================
-- 15. Connection test history
-- =============================================================================
CREATE TABLE IF NOT EXISTS connection_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    connection_type TEXT NOT NULL,
    status TEXT NOT NULL,
    message TEXT NOT NULL,
    details TEXT NOT NULL DEFAULT '{}',                   -- json
    user_id INTEGER,
    timestamp INTEGER NOT NULL
);
"#;
