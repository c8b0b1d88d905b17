//! User repository

use sqlx::SqlitePool;

use crate::data::sqlite::error::{SqliteError, map_unique};
use crate::data::types::collaboration::UserRow;
use crate::domain::payloads::users::NewUser;

use super::clamp_limit;

/// Create a user. Fails with `Conflict` when the username is taken.
pub async fn create(pool: &SqlitePool, user: &NewUser) -> Result<UserRow, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO users (username, password, role, name, is_active) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.role)
    .bind(&user.name)
    .bind(user.is_active)
    .execute(pool)
    .await
    .map_err(|e| map_unique(e, "username"))?;

    Ok(UserRow {
        id: result.last_insert_rowid(),
        username: user.username.clone(),
        password: user.password.clone(),
        role: user.role.clone(),
        name: user.name.clone(),
        is_active: user.is_active,
    })
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, String, String, Option<String>, bool)>(
        "SELECT id, username, password, role, name, is_active FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_user))
}

pub async fn get_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, String, String, Option<String>, bool)>(
        "SELECT id, username, password, role, name, is_active FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_user))
}

/// List users, paged, ordered by username
pub async fn list(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<UserRow>, u64), SqliteError> {
    let limit = clamp_limit(limit);
    let offset = page.saturating_sub(1) * limit;

    let rows = sqlx::query_as::<_, (i64, String, String, String, Option<String>, bool)>(
        "SELECT id, username, password, role, name, is_active FROM users \
         ORDER BY username ASC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok((rows.into_iter().map(to_user).collect(), total.0 as u64))
}

/// Toggle a user's active flag. Returns false when the user does not exist.
pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> Result<bool, SqliteError> {
    let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn to_user(row: (i64, String, String, String, Option<String>, bool)) -> UserRow {
    let (id, username, password, role, name, is_active) = row;
    UserRow {
        id,
        username,
        password,
        role,
        name,
        is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::setup_test_pool;
    use crate::domain::validate::parse_payload;
    use serde_json::json;

    fn new_user(username: &str) -> NewUser {
        parse_payload(json!({"username": username, "password": "secret"})).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_test_pool().await;

        let created = create(&pool, &new_user("assessor1")).await.unwrap();
        assert_eq!(created.role, "user");
        assert!(created.is_active);

        let fetched = get(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "assessor1");

        let by_name = get_by_username(&pool, "assessor1").await.unwrap();
        assert_eq!(by_name.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = setup_test_pool().await;

        create(&pool, &new_user("assessor1")).await.unwrap();
        let err = create(&pool, &new_user("assessor1")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_set_active() {
        let pool = setup_test_pool().await;

        let created = create(&pool, &new_user("assessor1")).await.unwrap();
        assert!(set_active(&pool, created.id, false).await.unwrap());
        assert!(!get(&pool, created.id).await.unwrap().unwrap().is_active);

        assert!(!set_active(&pool, 999, false).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_paged() {
        let pool = setup_test_pool().await;

        for name in ["carol", "alice", "bob"] {
            create(&pool, &new_user(name)).await.unwrap();
        }

        let (users, total) = list(&pool, 1, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");

        let (page2, _) = list(&pool, 2, 2).await.unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].username, "carol");
    }
}
