use super::models::{
    AddParticipantRequest, CreateExpenseRequest, Expense, ExpenseParticipant,
    ExpenseParticipantDetail, ParticipantPayload, UpdateExpenseRequest,
};
use crate::balance::split;
use crate::common::{
    amount_to_cents, cents_to_amount, generate_expense_id, generate_participant_id, ApiError,
    Validator,
};
use sqlx::SqlitePool;
use tracing::info;

/// A participant resolved to cents, ready for insertion
struct ParticipantRow {
    user_id: String,
    share_cents: i64,
    paid_cents: i64,
}

pub struct ExpensesService {
    db: SqlitePool,
}

impl ExpensesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Expense CRUD Operations
    // ========================================================================

    /// Get all expenses in a group
    pub async fn list_by_group(&self, group_id: &str) -> Result<Vec<Expense>, ApiError> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, group_id, created_by, amount_cents, description, category,
                   created_at, updated_at
            FROM expenses
            WHERE group_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(expenses)
    }

    /// Get expense by ID
    pub async fn get_expense(&self, expense_id: &str) -> Result<Expense, ApiError> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, group_id, created_by, amount_cents, description, category,
                   created_at, updated_at
            FROM expenses
            WHERE id = ?
            "#,
        )
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("Expense {} does not exist", expense_id)))?;

        Ok(expense)
    }

    /// Get all participants of an expense, with display names
    pub async fn list_participants(
        &self,
        expense_id: &str,
    ) -> Result<Vec<ExpenseParticipantDetail>, ApiError> {
        let participants = sqlx::query_as::<_, ExpenseParticipantDetail>(
            r#"
            SELECT p.id, p.expense_id, p.user_id, u.name AS user_name,
                   p.share_cents, p.paid_cents
            FROM expense_participants p
            JOIN users u ON u.id = p.user_id
            WHERE p.expense_id = ?
            ORDER BY p.id ASC
            "#,
        )
        .bind(expense_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(participants)
    }

    /// All of a group's expenses with their participant rows, the balance
    /// engine's input shape
    pub async fn list_with_participants(
        &self,
        group_id: &str,
    ) -> Result<Vec<(Expense, Vec<ExpenseParticipant>)>, ApiError> {
        let expenses = self.list_by_group(group_id).await?;

        let mut result = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let participants = sqlx::query_as::<_, ExpenseParticipant>(
                r#"
                SELECT id, expense_id, user_id, share_cents, paid_cents
                FROM expense_participants
                WHERE expense_id = ?
                ORDER BY id ASC
                "#,
            )
            .bind(&expense.id)
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
            result.push((expense, participants));
        }

        Ok(result)
    }

    /// Create an expense with its participant rows in one transaction
    pub async fn create_expense(
        &self,
        group_id: &str,
        created_by: &str,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let amount_cents = amount_to_cents(request.amount)
            .map_err(|e| ApiError::ValidationError(format!("amount: {}", e)))?;

        let rows = if let Some(participants) = &request.participants {
            let rows = self.resolve_explicit_rows(group_id, participants).await?;
            check_totals(amount_cents, &rows)?;
            rows
        } else if let Some(split_among) = &request.split_among {
            // Validator guarantees paid_by is present alongside split_among
            let paid_by = request.paid_by.as_deref().unwrap_or_default();
            self.resolve_split_rows(group_id, amount_cents, split_among, paid_by)
                .await?
        } else {
            Vec::new()
        };

        let expense_id = generate_expense_id();
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, group_id, created_by, amount_cents, description,
                                  category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense_id)
        .bind(group_id)
        .bind(created_by)
        .bind(amount_cents)
        .bind(&request.description)
        .bind(&request.category)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        for row in &rows {
            sqlx::query(
                r#"
                INSERT INTO expense_participants (id, expense_id, user_id, share_cents, paid_cents)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(generate_participant_id())
            .bind(&expense_id)
            .bind(&row.user_id)
            .bind(row.share_cents)
            .bind(row.paid_cents)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;
        }

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!("Created expense: {} in group {}", expense_id, group_id);

        self.get_expense(&expense_id).await
    }

    /// Update an expense. A supplied participant list replaces the existing
    /// rows wholesale and is re-validated against the (possibly updated)
    /// amount.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let expense = self.get_expense(expense_id).await?;

        let amount_cents = match request.amount {
            Some(amount) => amount_to_cents(amount)
                .map_err(|e| ApiError::ValidationError(format!("amount: {}", e)))?,
            None => expense.amount_cents,
        };

        let new_rows = match &request.participants {
            Some(participants) => {
                let rows = self
                    .resolve_explicit_rows(&expense.group_id, participants)
                    .await?;
                check_totals(amount_cents, &rows)?;
                Some(rows)
            }
            None => {
                // An amount change must not desync the stored participant
                // rows, so the existing rows are held to the same totals
                if amount_cents != expense.amount_cents {
                    let existing = self.participant_rows(expense_id).await?;
                    if !existing.is_empty() {
                        check_totals(amount_cents, &existing)?;
                    }
                }
                None
            }
        };

        let category = match &request.category {
            Some(value) => value.clone(),
            None => expense.category.clone(),
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query(
            r#"
            UPDATE expenses
            SET amount_cents = ?, description = ?, category = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(amount_cents)
        .bind(request.description.as_deref().unwrap_or(&expense.description))
        .bind(category)
        .bind(&now)
        .bind(expense_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(rows) = &new_rows {
            sqlx::query("DELETE FROM expense_participants WHERE expense_id = ?")
                .bind(expense_id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

            for row in rows {
                sqlx::query(
                    r#"
                    INSERT INTO expense_participants (id, expense_id, user_id, share_cents, paid_cents)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(generate_participant_id())
                .bind(expense_id)
                .bind(&row.user_id)
                .bind(row.share_cents)
                .bind(row.paid_cents)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;
            }
        }

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!("Updated expense: {}", expense_id);

        self.get_expense(expense_id).await
    }

    /// Delete an expense. Participant rows cascade.
    pub async fn delete_expense(&self, expense_id: &str) -> Result<(), ApiError> {
        self.get_expense(expense_id).await?;

        sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(expense_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Deleted expense: {}", expense_id);

        Ok(())
    }

    /// Add a single participant row to an existing expense
    pub async fn add_participant(
        &self,
        expense_id: &str,
        request: AddParticipantRequest,
    ) -> Result<ExpenseParticipantDetail, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let expense = self.get_expense(expense_id).await?;
        self.require_group_member(&expense.group_id, &request.user_id)
            .await?;

        let share_cents = amount_to_cents(request.share)
            .map_err(|e| ApiError::ValidationError(format!("share: {}", e)))?;
        let paid_cents = match request.paid {
            Some(paid) => amount_to_cents(paid)
                .map_err(|e| ApiError::ValidationError(format!("paid: {}", e)))?,
            None => 0,
        };

        let participant_id = generate_participant_id();

        sqlx::query(
            r#"
            INSERT INTO expense_participants (id, expense_id, user_id, share_cents, paid_cents)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&participant_id)
        .bind(expense_id)
        .bind(&request.user_id)
        .bind(share_cents)
        .bind(paid_cents)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::Conflict(format!(
                    "User {} is already a participant of this expense",
                    request.user_id
                ))
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(
            "Added participant {} to expense {}",
            request.user_id, expense_id
        );

        let participants = self.list_participants(expense_id).await?;
        participants
            .into_iter()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| {
                ApiError::InternalServer("participant vanished after insert".to_string())
            })
    }

    // ========================================================================
    // Participant Resolution
    // ========================================================================

    /// The stored participant rows of an expense, in cents
    async fn participant_rows(&self, expense_id: &str) -> Result<Vec<ParticipantRow>, ApiError> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT user_id, share_cents, paid_cents FROM expense_participants WHERE expense_id = ?",
        )
        .bind(expense_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, share_cents, paid_cents)| ParticipantRow {
                user_id,
                share_cents,
                paid_cents,
            })
            .collect())
    }

    /// Reject unless the user exists and belongs to the group
    async fn require_group_member(&self, group_id: &str, user_id: &str) -> Result<(), ApiError> {
        let user: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
        if user.is_none() {
            return Err(ApiError::BadRequest(format!(
                "User {} does not exist",
                user_id
            )));
        }

        let member: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM group_members WHERE group_id = ? AND user_id = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;
        if member.is_none() {
            return Err(ApiError::BadRequest(format!(
                "User {} is not a member of this group",
                user_id
            )));
        }

        Ok(())
    }

    /// Convert an explicit participant list to cents, checking membership
    async fn resolve_explicit_rows(
        &self,
        group_id: &str,
        participants: &[ParticipantPayload],
    ) -> Result<Vec<ParticipantRow>, ApiError> {
        let mut rows = Vec::with_capacity(participants.len());
        for participant in participants {
            self.require_group_member(group_id, &participant.user_id)
                .await?;

            let share_cents = amount_to_cents(participant.share)
                .map_err(|e| ApiError::ValidationError(format!("share: {}", e)))?;
            let paid_cents = match participant.paid {
                Some(paid) => amount_to_cents(paid)
                    .map_err(|e| ApiError::ValidationError(format!("paid: {}", e)))?,
                None => 0,
            };

            rows.push(ParticipantRow {
                user_id: participant.user_id.clone(),
                share_cents,
                paid_cents,
            });
        }
        Ok(rows)
    }

    /// Build rows for a server-side equal split. The payer fronts the full
    /// amount; if the payer is not among the sharers they get a zero share.
    async fn resolve_split_rows(
        &self,
        group_id: &str,
        amount_cents: i64,
        split_among: &[String],
        paid_by: &str,
    ) -> Result<Vec<ParticipantRow>, ApiError> {
        self.require_group_member(group_id, paid_by).await?;
        for user_id in split_among {
            self.require_group_member(group_id, user_id).await?;
        }

        let shares = split::equal_shares(amount_cents, split_among.len());

        let mut rows: Vec<ParticipantRow> = split_among
            .iter()
            .zip(shares)
            .map(|(user_id, share_cents)| ParticipantRow {
                user_id: user_id.clone(),
                share_cents,
                paid_cents: if user_id == paid_by { amount_cents } else { 0 },
            })
            .collect();

        if !split_among.iter().any(|u| u == paid_by) {
            rows.push(ParticipantRow {
                user_id: paid_by.to_string(),
                share_cents: 0,
                paid_cents: amount_cents,
            });
        }

        Ok(rows)
    }
}

/// Enforce the share and paid conservation rules, in cents with a one-cent
/// tolerance on explicit client lists
fn check_totals(amount_cents: i64, rows: &[ParticipantRow]) -> Result<(), ApiError> {
    let share_total: i64 = rows.iter().map(|r| r.share_cents).sum();
    if (share_total - amount_cents).abs() > 1 {
        return Err(ApiError::ValidationError(format!(
            "Total participant shares ({:.2}) must equal expense amount ({:.2})",
            cents_to_amount(share_total),
            cents_to_amount(amount_cents)
        )));
    }

    let paid_total: i64 = rows.iter().map(|r| r.paid_cents).sum();
    if paid_total != 0 && (paid_total - amount_cents).abs() > 1 {
        return Err(ApiError::ValidationError(format!(
            "Total paid ({:.2}) must equal expense amount ({:.2}) or be zero",
            cents_to_amount(paid_total),
            cents_to_amount(amount_cents)
        )));
    }

    Ok(())
}
