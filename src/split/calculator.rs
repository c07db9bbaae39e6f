use crate::core::expense::{ExpenseSplit, SplitPolicy};
use crate::core::money::Money;
use crate::core::user::UserId;
use crate::error::ValidationError;
use rust_decimal::Decimal;

/// One participant's declared stake in an expense, as supplied by the caller.
///
/// Which field matters depends on the policy: equal splits ignore both,
/// exact splits read `amount`, percentage splits read `percentage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user: UserId,
    pub amount: Option<Money>,
    pub percentage: Option<Decimal>,
}

impl Participant {
    /// A participant with no declared stake (equal splits).
    pub fn even(user: UserId) -> Self {
        Self {
            user,
            amount: None,
            percentage: None,
        }
    }

    /// A participant owing an explicit amount (exact splits).
    pub fn owing(user: UserId, amount: Money) -> Self {
        Self {
            user,
            amount: Some(amount),
            percentage: None,
        }
    }

    /// A participant owing a percentage of the total (percentage splits).
    pub fn owing_percent(user: UserId, percentage: Decimal) -> Self {
        Self {
            user,
            amount: None,
            percentage: Some(percentage),
        }
    }
}

/// Pure share computation for a single expense.
///
/// No I/O, no side effects; the same inputs always yield the same splits.
/// Every policy produces shares that sum to the expense amount exactly:
/// equal and percentage splits hand the rounding remainder to the last
/// listed participant, exact splits are validated rather than adjusted.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Split `amount` among `participants` under `policy`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyParticipantSet`] for zero participants.
    /// - [`ValidationError::SplitSumMismatch`] when exact shares do not add
    ///   up to `amount`. A participant with no declared amount counts as
    ///   zero.
    /// - [`ValidationError::PercentageSumMismatch`] when percentages do not
    ///   add up to exactly 100.
    pub fn compute(
        amount: Money,
        policy: SplitPolicy,
        participants: &[Participant],
    ) -> Result<Vec<ExpenseSplit>, ValidationError> {
        if participants.is_empty() {
            return Err(ValidationError::EmptyParticipantSet);
        }
        match policy {
            SplitPolicy::Equal => Ok(Self::equal(amount, participants)),
            SplitPolicy::Exact => Self::exact(amount, participants),
            SplitPolicy::Percentage => Self::percentage(amount, participants),
        }
    }

    /// Evenly divided shares. Each of the first N-1 participants gets the
    /// truncated per-head amount; the last takes whatever remains, so the
    /// total is exact by construction.
    fn equal(amount: Money, participants: &[Participant]) -> Vec<ExpenseSplit> {
        let n = participants.len() as i64;
        let head = Money::from_minor(amount.minor() / n);

        let mut splits = Vec::with_capacity(participants.len());
        let mut allocated = Money::ZERO;
        for p in &participants[..participants.len() - 1] {
            splits.push(ExpenseSplit::new(p.user.clone(), head));
            allocated += head;
        }
        let last = participants.last().expect("non-empty participant set");
        splits.push(ExpenseSplit::new(last.user.clone(), amount - allocated));
        splits
    }

    /// Caller-declared shares, validated to sum to the expense amount.
    fn exact(
        amount: Money,
        participants: &[Participant],
    ) -> Result<Vec<ExpenseSplit>, ValidationError> {
        let splits: Vec<ExpenseSplit> = participants
            .iter()
            .map(|p| ExpenseSplit::new(p.user.clone(), p.amount.unwrap_or(Money::ZERO)))
            .collect();

        let total: Money = splits.iter().map(|s| s.amount).sum();
        if total != amount {
            return Err(ValidationError::SplitSumMismatch {
                expected: amount,
                actual: total,
            });
        }
        Ok(splits)
    }

    /// Percentage shares. Percentages must sum to exactly 100; the first
    /// N-1 shares are rounded to the cent and the last participant absorbs
    /// the rounding residual, mirroring the equal policy's exactness.
    fn percentage(
        amount: Money,
        participants: &[Participant],
    ) -> Result<Vec<ExpenseSplit>, ValidationError> {
        let total_pct: Decimal = participants
            .iter()
            .map(|p| p.percentage.unwrap_or(Decimal::ZERO))
            .sum();
        if total_pct != Decimal::ONE_HUNDRED {
            return Err(ValidationError::PercentageSumMismatch { actual: total_pct });
        }

        let mut splits = Vec::with_capacity(participants.len());
        let mut allocated = Money::ZERO;
        for p in &participants[..participants.len() - 1] {
            let pct = p.percentage.unwrap_or(Decimal::ZERO);
            let share = amount.percent(pct);
            splits.push(ExpenseSplit::with_percentage(p.user.clone(), share, pct));
            allocated += share;
        }
        let last = participants.last().expect("non-empty participant set");
        splits.push(ExpenseSplit::with_percentage(
            last.user.clone(),
            amount - allocated,
            last.percentage.unwrap_or(Decimal::ZERO),
        ));
        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn users(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|n| Participant::even(UserId::new(*n)))
            .collect()
    }

    #[test]
    fn test_equal_split_divides_evenly() {
        let splits = SplitCalculator::compute(
            Money::from_major(90),
            SplitPolicy::Equal,
            &users(&["alice", "bob", "carol"]),
        )
        .unwrap();
        assert!(splits.iter().all(|s| s.amount == Money::from_major(30)));
    }

    #[test]
    fn test_equal_split_last_absorbs_remainder() {
        // 100.00 / 3 = 33.33 truncated; last gets 33.34
        let splits = SplitCalculator::compute(
            Money::from_major(100),
            SplitPolicy::Equal,
            &users(&["alice", "bob", "carol"]),
        )
        .unwrap();
        assert_eq!(splits[0].amount, Money::from_minor(3333));
        assert_eq!(splits[1].amount, Money::from_minor(3333));
        assert_eq!(splits[2].amount, Money::from_minor(3334));
        let total: Money = splits.iter().map(|s| s.amount).sum();
        assert_eq!(total, Money::from_major(100));
    }

    #[test]
    fn test_equal_split_tiny_amount() {
        // 0.05 / 2 = 0.02 + 0.03
        let splits = SplitCalculator::compute(
            Money::from_minor(5),
            SplitPolicy::Equal,
            &users(&["alice", "bob"]),
        )
        .unwrap();
        assert_eq!(splits[0].amount, Money::from_minor(2));
        assert_eq!(splits[1].amount, Money::from_minor(3));
    }

    #[test]
    fn test_equal_split_single_participant() {
        let splits = SplitCalculator::compute(
            Money::from_major(42),
            SplitPolicy::Equal,
            &users(&["alice"]),
        )
        .unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].amount, Money::from_major(42));
    }

    #[test]
    fn test_exact_split_accepts_matching_sum() {
        let splits = SplitCalculator::compute(
            Money::from_major(100),
            SplitPolicy::Exact,
            &[
                Participant::owing(UserId::new("alice"), Money::from_major(40)),
                Participant::owing(UserId::new("bob"), Money::from_major(60)),
            ],
        )
        .unwrap();
        assert_eq!(splits[0].amount, Money::from_major(40));
        assert_eq!(splits[1].amount, Money::from_major(60));
    }

    #[test]
    fn test_exact_split_rejects_mismatch() {
        let err = SplitCalculator::compute(
            Money::from_major(100),
            SplitPolicy::Exact,
            &[
                Participant::owing(UserId::new("alice"), Money::from_major(40)),
                Participant::owing(UserId::new("bob"), Money::from_major(50)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::SplitSumMismatch {
                expected: Money::from_major(100),
                actual: Money::from_major(90),
            }
        );
    }

    #[test]
    fn test_exact_split_missing_amount_counts_as_zero() {
        let err = SplitCalculator::compute(
            Money::from_major(100),
            SplitPolicy::Exact,
            &[
                Participant::owing(UserId::new("alice"), Money::from_major(100)),
                Participant::even(UserId::new("bob")),
            ],
        );
        // alice alone covers the total, so the undeclared participant
        // legitimately owes zero
        assert!(err.is_ok());
    }

    #[test]
    fn test_percentage_split_scenario() {
        let splits = SplitCalculator::compute(
            Money::from_major(50),
            SplitPolicy::Percentage,
            &[
                Participant::owing_percent(UserId::new("alice"), dec!(50)),
                Participant::owing_percent(UserId::new("bob"), dec!(30)),
                Participant::owing_percent(UserId::new("carol"), dec!(20)),
            ],
        )
        .unwrap();
        assert_eq!(splits[0].amount, Money::from_major(25));
        assert_eq!(splits[1].amount, Money::from_major(15));
        assert_eq!(splits[2].amount, Money::from_major(10));
        assert_eq!(splits[0].percentage, Some(dec!(50)));
    }

    #[test]
    fn test_percentage_split_rejects_bad_sum() {
        let err = SplitCalculator::compute(
            Money::from_major(50),
            SplitPolicy::Percentage,
            &[
                Participant::owing_percent(UserId::new("alice"), dec!(50)),
                Participant::owing_percent(UserId::new("bob"), dec!(49)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::PercentageSumMismatch { actual: dec!(99) }
        );
    }

    #[test]
    fn test_percentage_split_last_absorbs_residual() {
        // Naive per-share rounding of 50/50 over 0.99 gives 0.50 + 0.50.
        // The last participant absorbs the residual instead: 0.50 + 0.49.
        let splits = SplitCalculator::compute(
            Money::from_minor(99),
            SplitPolicy::Percentage,
            &[
                Participant::owing_percent(UserId::new("alice"), dec!(50)),
                Participant::owing_percent(UserId::new("bob"), dec!(50)),
            ],
        )
        .unwrap();
        assert_eq!(splits[0].amount, Money::from_minor(50));
        assert_eq!(splits[1].amount, Money::from_minor(49));
    }

    #[test]
    fn test_percentage_split_fractional_percentages() {
        let splits = SplitCalculator::compute(
            Money::from_major(10),
            SplitPolicy::Percentage,
            &[
                Participant::owing_percent(UserId::new("alice"), dec!(33.33)),
                Participant::owing_percent(UserId::new("bob"), dec!(33.33)),
                Participant::owing_percent(UserId::new("carol"), dec!(33.34)),
            ],
        )
        .unwrap();
        let total: Money = splits.iter().map(|s| s.amount).sum();
        assert_eq!(total, Money::from_major(10));
        assert_eq!(splits[0].amount, Money::from_minor(333));
        assert_eq!(splits[1].amount, Money::from_minor(333));
        assert_eq!(splits[2].amount, Money::from_minor(334));
    }

    #[test]
    fn test_empty_participants_rejected() {
        for policy in [SplitPolicy::Equal, SplitPolicy::Exact, SplitPolicy::Percentage] {
            let err = SplitCalculator::compute(Money::from_major(10), policy, &[]).unwrap_err();
            assert_eq!(err, ValidationError::EmptyParticipantSet);
        }
    }
}
