use crate::common::money;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub created_by: String,
    #[serde(rename = "amount", serialize_with = "money::serialize_cents")]
    pub amount_cents: i64,
    pub description: String,
    pub category: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseParticipant {
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    #[serde(rename = "share", serialize_with = "money::serialize_cents")]
    pub share_cents: i64,
    #[serde(rename = "paid", serialize_with = "money::serialize_cents")]
    pub paid_cents: i64,
}

/// Participant row joined with the user's display name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseParticipantDetail {
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(rename = "share", serialize_with = "money::serialize_cents")]
    pub share_cents: i64,
    #[serde(rename = "paid", serialize_with = "money::serialize_cents")]
    pub paid_cents: i64,
}

/// One participant as supplied by the client, in decimal amounts
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantPayload {
    pub user_id: String,
    pub share: f64,
    pub paid: Option<f64>,
}

impl ParticipantPayload {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["user_id", "share"],
            "properties": {
                "user_id": {"type": "string"},
                "share": {"type": "number", "minimum": 0},
                "paid": {"type": "number", "minimum": 0}
            }
        })
    }
}

/// Create payload. Participants come either as an explicit list whose shares
/// must sum to the amount, or as `split_among` member ids for a server-side
/// equal split where `paid_by` fronts the full amount.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub description: String,
    pub category: Option<String>,
    pub participants: Option<Vec<ParticipantPayload>>,
    pub split_among: Option<Vec<String>>,
    pub paid_by: Option<String>,
}

impl CreateExpenseRequest {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["amount", "description"],
            "properties": {
                "amount": {"type": "number", "exclusiveMinimum": 0},
                "description": {"type": "string"},
                "category": {"type": "string"},
                "participants": {"type": "array", "items": ParticipantPayload::schema()},
                "split_among": {"type": "array", "items": {"type": "string"}},
                "paid_by": {"type": "string"}
            }
        })
    }
}

/// Update payload. `category` distinguishes an explicit `null` (clear the
/// field) from an absent key (keep the stored value); the other fields are
/// keep-when-absent.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    pub participants: Option<Vec<ParticipantPayload>>,
}

/// Deserialize a present key (value or null) as `Some`, leaving an absent
/// key as `None` via `#[serde(default)]`
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateExpenseRequest {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {"type": "number", "exclusiveMinimum": 0},
                "description": {"type": "string"},
                "category": {"type": ["string", "null"]},
                "participants": {"type": "array", "items": ParticipantPayload::schema()}
            }
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddParticipantRequest {
    pub user_id: String,
    pub share: f64,
    pub paid: Option<f64>,
}

impl AddParticipantRequest {
    pub fn schema() -> Value {
        ParticipantPayload::schema()
    }
}
