//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn};

use super::keys;
use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Resolves the `X-API-Key` header to a user by looking up the key's
/// SHA-256 hash. Mutating handlers take this as an argument; read-only
/// handlers simply omit it.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(sqlx::FromRow)]
struct KeyOwnerRow {
    id: String,
    name: String,
    email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let api_key = parts
            .headers
            .get("X-API-Key")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let api_key = match api_key {
            Some(k) if !k.is_empty() => k,
            _ => {
                warn!("Authentication failed: missing X-API-Key header");
                return Err(ApiError::Unauthorized("API key is required".to_string()));
            }
        };

        let key_hash = keys::hash_key(&api_key);

        let owner: Option<KeyOwnerRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.name, u.email
            FROM api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE k.key_hash = ?
            "#,
        )
        .bind(&key_hash)
        .fetch_optional(&app_state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during API key lookup");
            ApiError::DatabaseError(e)
        })?;

        match owner {
            Some(u) => Ok(AuthedUser {
                id: u.id,
                name: u.name,
                email: u.email,
            }),
            None => {
                warn!("Authentication failed: unknown API key");
                Err(ApiError::Unauthorized("invalid API key".to_string()))
            }
        }
    }
}
