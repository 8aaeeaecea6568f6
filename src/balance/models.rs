//! Input and output types for the balance engine

use crate::common::money;
use serde::Serialize;

/// A group member as seen by the engine
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: String,
    pub user_name: String,
}

/// One participant row of an expense
#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    pub user_id: String,
    pub share_cents: i64,
    pub paid_cents: i64,
}

/// The participant rows of one expense. The expense grouping matters to the
/// engine (a payerless expense is skipped as a unit); the amount itself does
/// not, since contributions derive from `paid - share` alone.
#[derive(Debug, Clone)]
pub struct ExpenseRecord {
    pub participants: Vec<ParticipantRecord>,
}

/// A member's aggregate position. Positive means the member is net owed
/// money; negative means the member owes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBalance {
    pub user_id: String,
    pub user_name: String,
    #[serde(rename = "balance", serialize_with = "money::serialize_cents")]
    pub balance_cents: i64,
}

/// A recommended settling payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub from_user: String,
    pub to_user: String,
    #[serde(rename = "amount", serialize_with = "money::serialize_cents")]
    pub amount_cents: i64,
}

/// Full settlement report for a group
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<Transfer>,
}
