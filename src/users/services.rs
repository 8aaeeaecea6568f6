use super::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::auth::keys;
use crate::common::{generate_api_key_id, generate_user_id, ApiError, Validator};
use sqlx::SqlitePool;
use tracing::info;

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get all users
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(users)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("User {} does not exist", user_id)))?;

        Ok(user)
    }

    /// Create a new user and issue their API key in one transaction.
    /// Returns the user together with the raw key, which is shown exactly
    /// once.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<(User, String), ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "User with email {} already exists",
                request.email
            )));
        }

        let user_id = generate_user_id();
        let raw_key = keys::mint_key();
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::Conflict(format!("User with email {} already exists", request.email))
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, key_hash, user_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(generate_api_key_id())
        .bind(keys::hash_key(&raw_key))
        .bind(&user_id)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!("Created user: {} ({})", request.name, user_id);

        let user = self.get_user(&user_id).await?;
        Ok((user, raw_key))
    }

    /// Update an existing user
    pub async fn update_user(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let user = self.get_user(user_id).await?;

        // Re-check email uniqueness when the address changes
        if let Some(email) = &request.email {
            if *email != user.email {
                let existing: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM users WHERE email = ?")
                        .bind(email)
                        .fetch_optional(&self.db)
                        .await
                        .map_err(ApiError::DatabaseError)?;
                if existing.is_some() {
                    return Err(ApiError::Conflict(format!(
                        "User with email {} already exists",
                        email
                    )));
                }
            }
        }

        let mut updates = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(name) = &request.name {
            updates.push("name = ?");
            params.push(name.clone());
        }
        if let Some(email) = &request.email {
            updates.push("email = ?");
            params.push(email.clone());
        }
        if let Some(password_hash) = &request.password_hash {
            updates.push("password_hash = ?");
            params.push(password_hash.clone());
        }

        if updates.is_empty() {
            return Ok(user);
        }

        updates.push("updated_at = ?");
        params.push(chrono::Utc::now().to_rfc3339());
        params.push(user_id.to_string());

        let query = format!("UPDATE users SET {} WHERE id = ?", updates.join(", "));

        let mut query_builder = sqlx::query(&query);
        for param in params {
            query_builder = query_builder.bind(param);
        }

        query_builder
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Updated user: {}", user_id);

        self.get_user(user_id).await
    }

    /// Delete a user. Foreign keys cascade to API keys, memberships,
    /// created groups and expense participations.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        self.get_user(user_id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Deleted user: {}", user_id);

        Ok(())
    }

    /// IDs of groups this user created
    pub async fn created_group_ids(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM groups WHERE created_by = ? ORDER BY created_at ASC")
                .bind(user_id)
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// IDs of groups this user belongs to
    pub async fn membership_group_ids(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT group_id FROM group_members WHERE user_id = ? ORDER BY joined_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
