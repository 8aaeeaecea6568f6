//! Net balance aggregation and greedy settlement
//!
//! Each participant of an expense contributes `paid - share` to their own
//! balance; the contributions of a single expense sum to zero whenever the
//! paid totals match the amount, so group balances always conserve. The
//! settlement step repeatedly matches the largest debtor with the largest
//! creditor. That greedy pairing is deterministic and cheap but not
//! guaranteed to hit the theoretical minimum number of transfers (optimal
//! matching is NP-hard in general); the approximation is intentional.

use std::collections::BTreeMap;

use super::models::{BalanceReport, ExpenseRecord, Member, MemberBalance, Transfer};

/// Compute each member's aggregate net balance across all expenses.
///
/// Every group member gets an entry, zero if they appear in no expense.
/// A participant who is no longer a member still influences sums through
/// the expenses they are recorded on, but only members are reported.
pub fn net_balances(members: &[Member], expenses: &[ExpenseRecord]) -> Vec<MemberBalance> {
    let mut totals: BTreeMap<&str, i64> = members
        .iter()
        .map(|m| (m.user_id.as_str(), 0i64))
        .collect();

    for expense in expenses {
        // An expense nobody paid for settles to nothing
        if expense.participants.iter().all(|p| p.paid_cents == 0) {
            continue;
        }
        for participant in &expense.participants {
            if let Some(total) = totals.get_mut(participant.user_id.as_str()) {
                *total += participant.paid_cents - participant.share_cents;
            }
        }
    }

    members
        .iter()
        .map(|m| MemberBalance {
            user_id: m.user_id.clone(),
            user_name: m.user_name.clone(),
            balance_cents: totals.get(m.user_id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Compute a settling transfer list from net balances.
///
/// Greedy largest-pair matching: take the most negative debtor and the most
/// positive creditor, move `min(|debtor|, creditor)` cents between them, and
/// drop either party once its residual falls below one cent. Ties on
/// magnitude break on user id so the output is stable for a given input.
pub fn settle(balances: &[MemberBalance]) -> Vec<Transfer> {
    let mut debtors: Vec<(String, i64)> = balances
        .iter()
        .filter(|b| b.balance_cents < 0)
        .map(|b| (b.user_id.clone(), -b.balance_cents))
        .collect();
    let mut creditors: Vec<(String, i64)> = balances
        .iter()
        .filter(|b| b.balance_cents > 0)
        .map(|b| (b.user_id.clone(), b.balance_cents))
        .collect();

    let mut transfers = Vec::new();

    while !debtors.is_empty() && !creditors.is_empty() {
        let di = largest(&debtors);
        let ci = largest(&creditors);

        let amount = debtors[di].1.min(creditors[ci].1);
        transfers.push(Transfer {
            from_user: debtors[di].0.clone(),
            to_user: creditors[ci].0.clone(),
            amount_cents: amount,
        });

        debtors[di].1 -= amount;
        creditors[ci].1 -= amount;

        // Residuals below one minor unit are settled
        if debtors[di].1 < 1 {
            debtors.swap_remove(di);
        }
        if creditors[ci].1 < 1 {
            creditors.swap_remove(ci);
        }
    }

    transfers
}

/// Index of the entry with the largest magnitude, smallest user id on ties
fn largest(parties: &[(String, i64)]) -> usize {
    let mut best = 0;
    for (i, party) in parties.iter().enumerate().skip(1) {
        let (best_id, best_amount) = (&parties[best].0, parties[best].1);
        if party.1 > best_amount || (party.1 == best_amount && party.0 < *best_id) {
            best = i;
        }
    }
    best
}

/// Full settlement report: balances plus transfers
pub fn compute(members: &[Member], expenses: &[ExpenseRecord]) -> BalanceReport {
    let balances = net_balances(members, expenses);
    let transfers = settle(&balances);
    BalanceReport {
        balances,
        transfers,
    }
}
