use crate::core::balance::Balance;
use crate::core::money::Money;
use crate::core::user::UserId;
use crate::error::InvariantViolation;
use log::{error, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A suggested pairwise payment: `from` pays `to` the given amount.
///
/// Transfers are advisory output, never persisted. Amount is always
/// positive and `from` never equals `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}

impl Transfer {
    pub fn new(from: UserId, to: UserId, amount: Money) -> Self {
        Self { from, to, amount }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.from, self.to, self.amount)
    }
}

/// Greedy debt minimization over a zero-sum set of net balances.
///
/// Repeatedly matches the largest creditor with the deepest debtor and
/// settles the smaller of the two positions. The result is a bounded,
/// always-correct heuristic: at most N-1 transfers for N non-zero
/// balances, though not provably minimum-cardinality for every cyclic
/// multi-party arrangement. This is the single canonical pairing
/// algorithm; every call site goes through it.
///
/// Given a stable input ordering the output is fully deterministic —
/// ties are broken by first occurrence in the working set.
pub struct DebtMinimizer;

impl DebtMinimizer {
    /// Compute the transfer list that zeroes all balances.
    ///
    /// # Errors
    ///
    /// Both variants of [`InvariantViolation`] signal a defect in the
    /// caller, not bad user input: the balances were not zero-sum. The
    /// iteration bound additionally guards against the loop spinning on
    /// such input.
    pub fn minimize(balances: &[Balance]) -> Result<Vec<Transfer>, InvariantViolation> {
        // Integer cents make the rounding-noise floor exact: an entry is
        // either settled (zero) or it is not.
        let mut working: Vec<(UserId, Money)> = balances
            .iter()
            .filter(|b| !b.net.is_zero())
            .map(|b| (b.user.clone(), b.net))
            .collect();

        let bound = working.len();
        let mut transfers = Vec::new();
        let mut iterations = 0usize;

        while working.len() > 1 {
            iterations += 1;
            if iterations > bound {
                error!("debt minimization exceeded {} iterations; input was not zero-sum", bound);
                return Err(InvariantViolation::IterationLimit { bound });
            }

            // Largest creditor and deepest debtor; strict comparisons keep
            // the first occurrence on ties.
            let mut creditor_idx = 0;
            let mut debtor_idx = 0;
            for (i, (_, net)) in working.iter().enumerate() {
                if *net > working[creditor_idx].1 {
                    creditor_idx = i;
                }
                if *net < working[debtor_idx].1 {
                    debtor_idx = i;
                }
            }

            let credit = working[creditor_idx].1;
            let debit = working[debtor_idx].1;
            if !credit.is_positive() || !debit.is_negative() {
                // Everyone left is on the same side: the input could not
                // have summed to zero.
                let (user, amount) = working[0].clone();
                error!("same-signed working set during minimization; residual {} for '{}'", amount, user);
                return Err(InvariantViolation::ResidualBalance { user, amount });
            }

            let amount = Money::from_minor(credit.minor().min(debit.abs().minor()));
            trace!(
                "settling {} from '{}' to '{}'",
                amount, working[debtor_idx].0, working[creditor_idx].0
            );
            transfers.push(Transfer::new(
                working[debtor_idx].0.clone(),
                working[creditor_idx].0.clone(),
                amount,
            ));

            working[creditor_idx].1 -= amount;
            working[debtor_idx].1 += amount;
            working.retain(|(_, net)| !net.is_zero());
        }

        // Zero-sum input leaves nothing behind; a surviving entry is a
        // residual the caller must hear about.
        if let Some((user, amount)) = working.first() {
            error!("non-zero residual {} for '{}' after minimization", amount, user);
            return Err(InvariantViolation::ResidualBalance {
                user: user.clone(),
                amount: *amount,
            });
        }

        Ok(transfers)
    }
}
