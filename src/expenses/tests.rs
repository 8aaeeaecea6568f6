//! Tests for the expenses module

#[cfg(test)]
mod tests {
    use super::super::models::{
        AddParticipantRequest, CreateExpenseRequest, ParticipantPayload, UpdateExpenseRequest,
    };
    use crate::common::Validator;

    fn payload(user_id: &str, share: f64, paid: Option<f64>) -> ParticipantPayload {
        ParticipantPayload {
            user_id: user_id.to_string(),
            share,
            paid,
        }
    }

    #[test]
    fn test_create_expense_explicit_participants_valid() {
        let request = CreateExpenseRequest {
            amount: 90.0,
            description: "Dinner".to_string(),
            category: Some("food".to_string()),
            participants: Some(vec![
                payload("U_AAAAAA", 30.0, Some(90.0)),
                payload("U_BBBBBB", 30.0, None),
                payload("U_CCCCCC", 30.0, None),
            ]),
            split_among: None,
            paid_by: None,
        };

        let result = request.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_expense_split_among_valid() {
        let request = CreateExpenseRequest {
            amount: 100.0,
            description: "Groceries".to_string(),
            category: None,
            participants: None,
            split_among: Some(vec!["U_AAAAAA".to_string(), "U_BBBBBB".to_string()]),
            paid_by: Some("U_AAAAAA".to_string()),
        };

        let result = request.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_expense_rejects_both_forms() {
        let request = CreateExpenseRequest {
            amount: 50.0,
            description: "Taxi".to_string(),
            category: None,
            participants: Some(vec![payload("U_AAAAAA", 50.0, None)]),
            split_among: Some(vec!["U_AAAAAA".to_string()]),
            paid_by: Some("U_AAAAAA".to_string()),
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "participants" && e.message.contains("not both")));
    }

    #[test]
    fn test_create_expense_split_among_requires_paid_by() {
        let request = CreateExpenseRequest {
            amount: 50.0,
            description: "Taxi".to_string(),
            category: None,
            participants: None,
            split_among: Some(vec!["U_AAAAAA".to_string(), "U_BBBBBB".to_string()]),
            paid_by: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "paid_by"));
    }

    #[test]
    fn test_create_expense_rejects_stray_paid_by() {
        let request = CreateExpenseRequest {
            amount: 50.0,
            description: "Taxi".to_string(),
            category: None,
            participants: Some(vec![payload("U_AAAAAA", 50.0, None)]),
            split_among: None,
            paid_by: Some("U_AAAAAA".to_string()),
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "paid_by"));
    }

    #[test]
    fn test_create_expense_rejects_bad_amounts() {
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let request = CreateExpenseRequest {
                amount,
                description: "Rent".to_string(),
                category: None,
                participants: None,
                split_among: None,
                paid_by: None,
            };
            let result = request.validate(&request);
            assert!(!result.is_valid, "amount {} should be rejected", amount);
        }
    }

    #[test]
    fn test_create_expense_rejects_duplicate_participant() {
        let request = CreateExpenseRequest {
            amount: 60.0,
            description: "Drinks".to_string(),
            category: None,
            participants: Some(vec![
                payload("U_AAAAAA", 30.0, None),
                payload("U_AAAAAA", 30.0, None),
            ]),
            split_among: None,
            paid_by: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("cannot appear twice")));
    }

    #[test]
    fn test_create_expense_rejects_negative_share() {
        let request = CreateExpenseRequest {
            amount: 60.0,
            description: "Drinks".to_string(),
            category: None,
            participants: Some(vec![payload("U_AAAAAA", -5.0, None)]),
            split_among: None,
            paid_by: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_update_expense_empty_is_valid() {
        let request = UpdateExpenseRequest {
            amount: None,
            description: None,
            category: None,
            participants: None,
        };

        let result = request.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_update_expense_rejects_blank_description() {
        let request = UpdateExpenseRequest {
            amount: None,
            description: Some("   ".to_string()),
            category: None,
            participants: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "description"));
    }

    #[test]
    fn test_add_participant_validation() {
        let valid = AddParticipantRequest {
            user_id: "U_AAAAAA".to_string(),
            share: 12.5,
            paid: Some(25.0),
        };
        assert!(valid.validate(&valid).is_valid);

        let missing_user = AddParticipantRequest {
            user_id: "".to_string(),
            share: 12.5,
            paid: None,
        };
        assert!(!missing_user.validate(&missing_user).is_valid);
    }

    #[test]
    fn test_create_expense_schema_lists_required_fields() {
        let schema = CreateExpenseRequest::schema();
        let required = schema["required"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();
        assert!(required.contains(&"amount"));
        assert!(required.contains(&"description"));
        assert!(schema["properties"]["split_among"].is_object());
    }

    #[test]
    fn test_update_category_null_differs_from_absent() {
        let request: UpdateExpenseRequest =
            serde_json::from_str(r#"{"description": "Team dinner"}"#).unwrap();
        assert!(request.category.is_none());

        let request: UpdateExpenseRequest = serde_json::from_str(r#"{"category": null}"#).unwrap();
        assert_eq!(request.category, Some(None));

        let request: UpdateExpenseRequest =
            serde_json::from_str(r#"{"category": "food"}"#).unwrap();
        assert_eq!(request.category, Some(Some("food".to_string())));
    }

    // ========================================================================
    // Service tests against an in-memory database
    // ========================================================================

    use super::super::services::ExpensesService;
    use crate::common::migrations::run_migrations;
    use crate::groups::models::{AddMemberRequest, CreateGroupRequest};
    use crate::groups::services::GroupsService;
    use crate::users::models::CreateUserRequest;
    use crate::users::services::UsersService;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::str::FromStr;

    async fn test_pool() -> SqlitePool {
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

    /// A group with two members; returns (group_id, admin_id, member_id)
    async fn seed_group(pool: &SqlitePool) -> (String, String, String) {
        let users = UsersService::new(pool.clone());
        let (alice, _) = users
            .create_user(CreateUserRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("create alice");
        let (bob, _) = users
            .create_user(CreateUserRequest {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("create bob");

        let groups = GroupsService::new(pool.clone());
        let group = groups
            .create_group(
                &alice.id,
                CreateGroupRequest {
                    name: "Trip".to_string(),
                    description: None,
                },
            )
            .await
            .expect("create group");
        groups
            .add_member(
                &group.id,
                AddMemberRequest {
                    user_id: bob.id.clone(),
                    role: None,
                },
            )
            .await
            .expect("add bob");

        (group.id, alice.id, bob.id)
    }

    #[tokio::test]
    async fn test_update_with_null_category_clears_it() {
        let pool = test_pool().await;
        let (group_id, alice, bob) = seed_group(&pool).await;
        let service = ExpensesService::new(pool.clone());

        let expense = service
            .create_expense(
                &group_id,
                &alice,
                CreateExpenseRequest {
                    amount: 40.0,
                    description: "Dinner".to_string(),
                    category: Some("food".to_string()),
                    participants: Some(vec![
                        payload(&alice, 20.0, Some(40.0)),
                        payload(&bob, 20.0, None),
                    ]),
                    split_among: None,
                    paid_by: None,
                },
            )
            .await
            .expect("create expense");
        assert_eq!(expense.category.as_deref(), Some("food"));

        // Omitting the key keeps the stored category
        let request: UpdateExpenseRequest =
            serde_json::from_str(r#"{"description": "Team dinner"}"#).unwrap();
        let updated = service
            .update_expense(&expense.id, request)
            .await
            .expect("update description");
        assert_eq!(updated.category.as_deref(), Some("food"));

        // An explicit null clears it
        let request: UpdateExpenseRequest = serde_json::from_str(r#"{"category": null}"#).unwrap();
        let updated = service
            .update_expense(&expense.id, request)
            .await
            .expect("clear category");
        assert_eq!(updated.category, None);
    }

    #[tokio::test]
    async fn test_update_amount_requires_matching_participant_shares() {
        let pool = test_pool().await;
        let (group_id, alice, bob) = seed_group(&pool).await;
        let service = ExpensesService::new(pool.clone());

        let expense = service
            .create_expense(
                &group_id,
                &alice,
                CreateExpenseRequest {
                    amount: 40.0,
                    description: "Dinner".to_string(),
                    category: None,
                    participants: Some(vec![
                        payload(&alice, 20.0, Some(40.0)),
                        payload(&bob, 20.0, None),
                    ]),
                    split_among: None,
                    paid_by: None,
                },
            )
            .await
            .expect("create expense");

        // Changing the amount alone would desync the stored shares
        let request = UpdateExpenseRequest {
            amount: Some(60.0),
            description: None,
            category: None,
            participants: None,
        };
        assert!(service.update_expense(&expense.id, request).await.is_err());

        let unchanged = service.get_expense(&expense.id).await.expect("reload");
        assert_eq!(unchanged.amount_cents, 4000);

        // With a replacement participant list the same change goes through
        let request = UpdateExpenseRequest {
            amount: Some(60.0),
            description: None,
            category: None,
            participants: Some(vec![
                payload(&alice, 30.0, Some(60.0)),
                payload(&bob, 30.0, None),
            ]),
        };
        let updated = service
            .update_expense(&expense.id, request)
            .await
            .expect("update with new shares");
        assert_eq!(updated.amount_cents, 6000);
    }
}
