// src/common/migrations.rs
//! Database schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Create the database schema
///
/// Tables are created if they do not exist. Setting RESET_DB=true drops
/// everything first, which is useful for local development but loses data
/// on restart.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    }

    create_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Drop tables in reverse dependency order
    let tables = [
        "expense_participants",
        "expenses",
        "group_members",
        "groups",
        "api_keys",
        "users",
    ];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            id TEXT PRIMARY KEY,
            key_hash TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            created_by TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS group_members (
            id TEXT PRIMARY KEY,
            group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role TEXT NOT NULL DEFAULT 'member',
            joined_at TEXT,
            UNIQUE (group_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
            created_by TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            description TEXT NOT NULL,
            category TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expense_participants (
            id TEXT PRIMARY KEY,
            expense_id TEXT NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            share_cents INTEGER NOT NULL CHECK (share_cents >= 0),
            paid_cents INTEGER NOT NULL DEFAULT 0 CHECK (paid_cents >= 0),
            UNIQUE (expense_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_api_keys_key_hash ON api_keys(key_hash)",
        "CREATE INDEX IF NOT EXISTS idx_group_members_group ON group_members(group_id)",
        "CREATE INDEX IF NOT EXISTS idx_group_members_user ON group_members(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_expenses_group ON expenses(group_id)",
        "CREATE INDEX IF NOT EXISTS idx_expense_participants_expense ON expense_participants(expense_id)",
        "CREATE INDEX IF NOT EXISTS idx_expense_participants_user ON expense_participants(user_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_pool() -> SqlitePool {
        // Single connection: each in-memory SQLite connection is its own db
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid sqlite url")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .expect("count query");
        n
    }

    #[tokio::test]
    async fn test_group_delete_cascades_to_dependents() {
        let pool = test_pool().await;

        for query in [
            "INSERT INTO users (id, name, email, password_hash) VALUES ('U_AAAAAA', 'Alice', 'alice@example.com', 'hash')",
            "INSERT INTO users (id, name, email, password_hash) VALUES ('U_BBBBBB', 'Bob', 'bob@example.com', 'hash')",
            "INSERT INTO groups (id, name, created_by) VALUES ('G_AAAAAA', 'Trip', 'U_AAAAAA')",
            "INSERT INTO group_members (id, group_id, user_id, role) VALUES ('M_AAAAAA', 'G_AAAAAA', 'U_AAAAAA', 'admin')",
            "INSERT INTO group_members (id, group_id, user_id, role) VALUES ('M_BBBBBB', 'G_AAAAAA', 'U_BBBBBB', 'member')",
            "INSERT INTO expenses (id, group_id, created_by, amount_cents, description) VALUES ('E_AAAAAA', 'G_AAAAAA', 'U_AAAAAA', 4000, 'Dinner')",
            "INSERT INTO expense_participants (id, expense_id, user_id, share_cents, paid_cents) VALUES ('P_AAAAAA', 'E_AAAAAA', 'U_AAAAAA', 2000, 4000)",
            "INSERT INTO expense_participants (id, expense_id, user_id, share_cents, paid_cents) VALUES ('P_BBBBBB', 'E_AAAAAA', 'U_BBBBBB', 2000, 0)",
        ] {
            sqlx::query(query).execute(&pool).await.expect("seed row");
        }

        sqlx::query("DELETE FROM groups WHERE id = 'G_AAAAAA'")
            .execute(&pool)
            .await
            .expect("delete group");

        assert_eq!(count(&pool, "groups").await, 0);
        assert_eq!(count(&pool, "group_members").await, 0);
        assert_eq!(count(&pool, "expenses").await, 0);
        assert_eq!(count(&pool, "expense_participants").await, 0);
        // Users are not owned by the group and must survive
        assert_eq!(count(&pool, "users").await, 2);
    }

    #[tokio::test]
    async fn test_user_delete_cascades_keys_and_memberships() {
        let pool = test_pool().await;

        for query in [
            "INSERT INTO users (id, name, email, password_hash) VALUES ('U_AAAAAA', 'Alice', 'alice@example.com', 'hash')",
            "INSERT INTO api_keys (id, key_hash, user_id) VALUES ('K_AAAAAA', 'deadbeef', 'U_AAAAAA')",
            "INSERT INTO groups (id, name, created_by) VALUES ('G_AAAAAA', 'Trip', 'U_AAAAAA')",
            "INSERT INTO group_members (id, group_id, user_id, role) VALUES ('M_AAAAAA', 'G_AAAAAA', 'U_AAAAAA', 'admin')",
        ] {
            sqlx::query(query).execute(&pool).await.expect("seed row");
        }

        sqlx::query("DELETE FROM users WHERE id = 'U_AAAAAA'")
            .execute(&pool)
            .await
            .expect("delete user");

        assert_eq!(count(&pool, "api_keys").await, 0);
        assert_eq!(count(&pool, "group_members").await, 0);
    }
}
