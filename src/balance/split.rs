//! Equal-split share computation with remainder reconciliation

/// Split an amount equally among `n` participants.
///
/// Each head gets the rounded-down per-head share; the leftover cents go
/// entirely to the first participant in caller-supplied order, so the shares
/// always sum exactly to the amount. 100.00 over three heads becomes
/// 33.34 / 33.33 / 33.33.
pub fn equal_shares(amount_cents: i64, n: usize) -> Vec<i64> {
    if n == 0 {
        return Vec::new();
    }
    let n_i64 = n as i64;
    let base = amount_cents / n_i64;
    let mut shares = vec![base; n];
    shares[0] += amount_cents - base * n_i64;
    reconcile(amount_cents, shares)
}

/// Force a share list to sum exactly to the amount.
///
/// The integer split above already satisfies this, but the check is kept as
/// the final authority: any residual discrepancy is applied as a corrective
/// delta to the first participant with a positive share (the first share
/// otherwise).
pub fn reconcile(amount_cents: i64, mut shares: Vec<i64>) -> Vec<i64> {
    let total: i64 = shares.iter().sum();
    let delta = amount_cents - total;
    if delta != 0 && !shares.is_empty() {
        let target = shares
            .iter()
            .position(|&s| s > 0)
            .unwrap_or(0);
        shares[target] += delta;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(equal_shares(9000, 3), vec![3000, 3000, 3000]);
    }

    #[test]
    fn test_remainder_goes_to_first_participant() {
        let shares = equal_shares(10000, 3);
        assert_eq!(shares, vec![3334, 3333, 3333]);
        assert_eq!(shares.iter().sum::<i64>(), 10000);
    }

    #[test]
    fn test_two_cent_remainder() {
        let shares = equal_shares(1001, 3);
        assert_eq!(shares, vec![335, 333, 333]);
        assert_eq!(shares.iter().sum::<i64>(), 1001);
    }

    #[test]
    fn test_single_participant_takes_everything() {
        assert_eq!(equal_shares(777, 1), vec![777]);
    }

    #[test]
    fn test_zero_participants() {
        assert!(equal_shares(1000, 0).is_empty());
    }

    #[test]
    fn test_amount_smaller_than_headcount() {
        let shares = equal_shares(2, 5);
        assert_eq!(shares, vec![2, 0, 0, 0, 0]);
        assert_eq!(shares.iter().sum::<i64>(), 2);
    }

    #[test]
    fn test_reconcile_targets_first_positive_share() {
        // A drifted list: totals 9999 against a 10000 amount
        let shares = reconcile(10000, vec![0, 3333, 3333, 3333]);
        assert_eq!(shares, vec![0, 3334, 3333, 3333]);
    }

    #[test]
    fn test_reconcile_exact_list_unchanged() {
        let shares = reconcile(9000, vec![3000, 3000, 3000]);
        assert_eq!(shares, vec![3000, 3000, 3000]);
    }
}
