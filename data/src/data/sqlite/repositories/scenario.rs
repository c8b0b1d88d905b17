//! What-if scenario repository

use sqlx::{Row, SqlitePool};

use crate::data::sqlite::error::SqliteError;
use crate::data::types::scenarios::{ScenarioImpactRow, ScenarioVariationRow, WhatIfScenarioRow};
use crate::domain::payloads::scenarios::{
    NewScenarioImpact, NewScenarioVariation, NewWhatIfScenario, WhatIfScenarioUpdate,
};

use super::{dec_col_opt, json_col};

pub async fn create(
    pool: &SqlitePool,
    scenario: &NewWhatIfScenario,
) -> Result<WhatIfScenarioRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO what_if_scenarios \
         (user_id, name, description, base_calculation_id, parameters, results, is_saved, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(scenario.user_id)
    .bind(&scenario.name)
    .bind(&scenario.description)
    .bind(scenario.base_calculation_id)
    .bind(scenario.parameters.to_string())
    .bind(scenario.results.to_string())
    .bind(scenario.is_saved)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(WhatIfScenarioRow {
        id: result.last_insert_rowid(),
        user_id: scenario.user_id,
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        base_calculation_id: scenario.base_calculation_id,
        parameters: scenario.parameters.clone(),
        results: scenario.results.clone(),
        is_saved: scenario.is_saved,
        created_at: now,
        updated_at: now,
    })
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<WhatIfScenarioRow>, SqliteError> {
    let row = sqlx::query("SELECT * FROM what_if_scenarios WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| to_scenario(&r)).transpose()
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<WhatIfScenarioRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM what_if_scenarios WHERE user_id = ? ORDER BY updated_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_scenario).collect()
}

/// Apply a partial update; any change refreshes `updated_at`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    update: &WhatIfScenarioUpdate,
) -> Result<Option<WhatIfScenarioRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut sets: Vec<&str> = Vec::new();
    if update.name.is_some() {
        sets.push("name = ?");
    }
    if update.description.is_some() {
        sets.push("description = ?");
    }
    if update.parameters.is_some() {
        sets.push("parameters = ?");
    }
    if update.results.is_some() {
        sets.push("results = ?");
    }
    if update.is_saved.is_some() {
        sets.push("is_saved = ?");
    }

    if sets.is_empty() {
        return get(pool, id).await;
    }
    sets.push("updated_at = ?");

    let sql = format!("UPDATE what_if_scenarios SET {} WHERE id = ?", sets.join(", "));
    let mut query = sqlx::query(&sql);

    if let Some(v) = &update.name {
        query = query.bind(v);
    }
    if let Some(v) = &update.description {
        query = query.bind(v);
    }
    if let Some(v) = &update.parameters {
        query = query.bind(v.to_string());
    }
    if let Some(v) = &update.results {
        query = query.bind(v.to_string());
    }
    if let Some(v) = update.is_saved {
        query = query.bind(v);
    }

    let result = query.bind(now).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get(pool, id).await
}

/// Delete a scenario; variations and impacts cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM what_if_scenarios WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record a variation under a scenario. The scenario must exist.
pub async fn add_variation(
    pool: &SqlitePool,
    scenario_id: i64,
    variation: &NewScenarioVariation,
) -> Result<ScenarioVariationRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO scenario_variations \
         (scenario_id, name, parameter_key, original_value, new_value, impact_value, impact_percentage, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(scenario_id)
    .bind(&variation.name)
    .bind(&variation.parameter_key)
    .bind(variation.original_value.to_string())
    .bind(variation.new_value.to_string())
    .bind(variation.impact_value.map(|d| d.to_string()))
    .bind(variation.impact_percentage.map(|d| d.to_string()))
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ScenarioVariationRow {
        id: result.last_insert_rowid(),
        scenario_id,
        name: variation.name.clone(),
        parameter_key: variation.parameter_key.clone(),
        original_value: variation.original_value.clone(),
        new_value: variation.new_value.clone(),
        impact_value: variation.impact_value,
        impact_percentage: variation.impact_percentage,
        created_at: now,
    })
}

pub async fn list_variations(
    pool: &SqlitePool,
    scenario_id: i64,
) -> Result<Vec<ScenarioVariationRow>, SqliteError> {
    let rows = sqlx::query("SELECT * FROM scenario_variations WHERE scenario_id = ? ORDER BY id ASC")
        .bind(scenario_id)
        .fetch_all(pool)
        .await?;

    rows.iter().map(to_variation).collect()
}

pub async fn add_impact(
    pool: &SqlitePool,
    scenario_id: i64,
    impact: &NewScenarioImpact,
) -> Result<ScenarioImpactRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO scenario_impacts (scenario_id, analysis_type, impact_summary, calculated_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(scenario_id)
    .bind(&impact.analysis_type)
    .bind(impact.impact_summary.to_string())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ScenarioImpactRow {
        id: result.last_insert_rowid(),
        scenario_id,
        analysis_type: impact.analysis_type.clone(),
        impact_summary: impact.impact_summary.clone(),
        calculated_at: now,
    })
}

pub async fn list_impacts(
    pool: &SqlitePool,
    scenario_id: i64,
) -> Result<Vec<ScenarioImpactRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT * FROM scenario_impacts WHERE scenario_id = ? ORDER BY calculated_at DESC, id DESC",
    )
    .bind(scenario_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(to_impact).collect()
}

fn to_scenario(row: &sqlx::sqlite::SqliteRow) -> Result<WhatIfScenarioRow, SqliteError> {
    Ok(WhatIfScenarioRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        base_calculation_id: row.try_get("base_calculation_id")?,
        parameters: json_col(row, "parameters")?,
        results: json_col(row, "results")?,
        is_saved: row.try_get("is_saved")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_variation(row: &sqlx::sqlite::SqliteRow) -> Result<ScenarioVariationRow, SqliteError> {
    Ok(ScenarioVariationRow {
        id: row.try_get("id")?,
        scenario_id: row.try_get("scenario_id")?,
        name: row.try_get("name")?,
        parameter_key: row.try_get("parameter_key")?,
        original_value: json_col(row, "original_value")?,
        new_value: json_col(row, "new_value")?,
        impact_value: dec_col_opt(row, "impact_value")?,
        impact_percentage: dec_col_opt(row, "impact_percentage")?,
        created_at: row.try_get("created_at")?,
    })
}

fn to_impact(row: &sqlx::sqlite::SqliteRow) -> Result<ScenarioImpactRow, SqliteError> {
    Ok(ScenarioImpactRow {
        id: row.try_get("id")?,
        scenario_id: row.try_get("scenario_id")?,
        analysis_type: row.try_get("analysis_type")?,
        impact_summary: json_col(row, "impact_summary")?,
        calculated_at: row.try_get("calculated_at")?,
    })
}
