//! Tests for the balance engine
//!
//! These cover the settlement invariants: shares conservation, zero-sum
//! balances, transfers actually settling the group, and determinism.

#[cfg(test)]
mod tests {
    use super::super::engine;
    use super::super::models::{ExpenseRecord, Member, MemberBalance, ParticipantRecord};

    fn member(id: &str) -> Member {
        Member {
            user_id: id.to_string(),
            user_name: format!("user {}", id),
        }
    }

    fn participant(id: &str, share: i64, paid: i64) -> ParticipantRecord {
        ParticipantRecord {
            user_id: id.to_string(),
            share_cents: share,
            paid_cents: paid,
        }
    }

    fn balance_of(balances: &[MemberBalance], id: &str) -> i64 {
        balances
            .iter()
            .find(|b| b.user_id == id)
            .map(|b| b.balance_cents)
            .expect("member missing from balances")
    }

    #[test]
    fn test_single_expense_one_payer() {
        // 90.00 split equally among 3 where "a" fronted the full amount
        let members = vec![member("a"), member("b"), member("c")];
        let expenses = vec![ExpenseRecord {
            participants: vec![
                participant("a", 3000, 9000),
                participant("b", 3000, 0),
                participant("c", 3000, 0),
            ],
        }];

        let report = engine::compute(&members, &expenses);

        assert_eq!(balance_of(&report.balances, "a"), 6000);
        assert_eq!(balance_of(&report.balances, "b"), -3000);
        assert_eq!(balance_of(&report.balances, "c"), -3000);

        // Two transfers of 30.00 each, both toward the payer
        assert_eq!(report.transfers.len(), 2);
        for transfer in &report.transfers {
            assert_eq!(transfer.to_user, "a");
            assert_eq!(transfer.amount_cents, 3000);
        }
    }

    #[test]
    fn test_balances_sum_to_zero() {
        let members = vec![member("a"), member("b"), member("c"), member("d")];
        let expenses = vec![
            ExpenseRecord {
                participants: vec![
                    participant("a", 3334, 10000),
                    participant("b", 3333, 0),
                    participant("c", 3333, 0),
                ],
            },
            ExpenseRecord {
                participants: vec![
                    participant("b", 1500, 0),
                    participant("c", 1500, 4500),
                    participant("d", 1500, 0),
                ],
            },
        ];

        let balances = engine::net_balances(&members, &expenses);
        let total: i64 = balances.iter().map(|b| b.balance_cents).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_transfers_settle_all_balances() {
        let members = vec![member("a"), member("b"), member("c"), member("d")];
        let expenses = vec![
            ExpenseRecord {
                participants: vec![
                    participant("a", 4001, 12001),
                    participant("b", 4000, 0),
                    participant("c", 4000, 0),
                ],
            },
            ExpenseRecord {
                participants: vec![
                    participant("a", 2450, 0),
                    participant("b", 2450, 7350),
                    participant("d", 2450, 0),
                ],
            },
        ];

        let report = engine::compute(&members, &expenses);

        // Apply the transfers and verify every residual drops below one cent
        let mut residuals: std::collections::HashMap<String, i64> = report
            .balances
            .iter()
            .map(|b| (b.user_id.clone(), b.balance_cents))
            .collect();
        for transfer in &report.transfers {
            *residuals.get_mut(&transfer.from_user).unwrap() += transfer.amount_cents;
            *residuals.get_mut(&transfer.to_user).unwrap() -= transfer.amount_cents;
        }
        for (user, residual) in residuals {
            assert!(
                residual.abs() < 1,
                "user {} left with residual {}",
                user,
                residual
            );
        }
    }

    #[test]
    fn test_empty_group_has_no_activity() {
        let members = vec![member("a"), member("b")];
        let report = engine::compute(&members, &[]);

        assert_eq!(report.balances.len(), 2);
        assert!(report.balances.iter().all(|b| b.balance_cents == 0));
        assert!(report.transfers.is_empty());
    }

    #[test]
    fn test_member_absent_from_expenses_has_zero_balance() {
        let members = vec![member("a"), member("b"), member("c")];
        let expenses = vec![ExpenseRecord {
            participants: vec![participant("a", 1000, 2000), participant("b", 1000, 0)],
        }];

        let balances = engine::net_balances(&members, &expenses);
        assert_eq!(balance_of(&balances, "c"), 0);
    }

    #[test]
    fn test_expense_with_no_payer_contributes_nothing() {
        let members = vec![member("a"), member("b")];
        let expenses = vec![ExpenseRecord {
            participants: vec![participant("a", 2500, 0), participant("b", 2500, 0)],
        }];

        let report = engine::compute(&members, &expenses);
        assert!(report.balances.iter().all(|b| b.balance_cents == 0));
        assert!(report.transfers.is_empty());
    }

    #[test]
    fn test_multiple_payers_each_credited() {
        let members = vec![member("a"), member("b"), member("c")];
        let expenses = vec![ExpenseRecord {
            participants: vec![
                participant("a", 3000, 4500),
                participant("b", 3000, 4500),
                participant("c", 3000, 0),
            ],
        }];

        let balances = engine::net_balances(&members, &expenses);
        assert_eq!(balance_of(&balances, "a"), 1500);
        assert_eq!(balance_of(&balances, "b"), 1500);
        assert_eq!(balance_of(&balances, "c"), -3000);
    }

    #[test]
    fn test_settled_group_yields_no_transfers() {
        let balances = vec![
            MemberBalance {
                user_id: "a".to_string(),
                user_name: "a".to_string(),
                balance_cents: 0,
            },
            MemberBalance {
                user_id: "b".to_string(),
                user_name: "b".to_string(),
                balance_cents: 0,
            },
        ];
        assert!(engine::settle(&balances).is_empty());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let members = vec![member("a"), member("b"), member("c")];
        let expenses = vec![ExpenseRecord {
            participants: vec![
                participant("a", 3334, 10000),
                participant("b", 3333, 0),
                participant("c", 3333, 0),
            ],
        }];

        let first = engine::compute(&members, &expenses);
        let second = engine::compute(&members, &expenses);
        assert_eq!(first.balances, second.balances);
        assert_eq!(first.transfers, second.transfers);
    }

    #[test]
    fn test_greedy_pairs_largest_debtor_with_largest_creditor() {
        let balances = vec![
            MemberBalance {
                user_id: "a".to_string(),
                user_name: "a".to_string(),
                balance_cents: 7000,
            },
            MemberBalance {
                user_id: "b".to_string(),
                user_name: "b".to_string(),
                balance_cents: 1000,
            },
            MemberBalance {
                user_id: "c".to_string(),
                user_name: "c".to_string(),
                balance_cents: -5000,
            },
            MemberBalance {
                user_id: "d".to_string(),
                user_name: "d".to_string(),
                balance_cents: -3000,
            },
        ];

        let transfers = engine::settle(&balances);

        assert_eq!(transfers.len(), 3);
        // Largest debtor (c) pays the largest creditor (a) first
        assert_eq!(transfers[0].from_user, "c");
        assert_eq!(transfers[0].to_user, "a");
        assert_eq!(transfers[0].amount_cents, 5000);
        assert_eq!(transfers[1].from_user, "d");
        assert_eq!(transfers[1].to_user, "a");
        assert_eq!(transfers[1].amount_cents, 2000);
        assert_eq!(transfers[2].from_user, "d");
        assert_eq!(transfers[2].to_user, "b");
        assert_eq!(transfers[2].amount_cents, 1000);
    }
}
