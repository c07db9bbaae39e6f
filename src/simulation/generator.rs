//! Random group generation for stress testing.
//!
//! Produces synthetic expense histories to exercise aggregation and
//! minimization at sizes no real group reaches.

use crate::core::expense::{Expense, ExpenseSet, SplitPolicy};
use crate::core::money::Money;
use crate::core::user::{GroupId, UserId};
use crate::split::calculator::{Participant, SplitCalculator};
use rand::seq::SliceRandom;
use rand::Rng;

/// Configuration for generating a random expense history.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of users in the group.
    pub user_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Minimum expense amount in minor units.
    pub min_amount: i64,
    /// Maximum expense amount in minor units.
    pub max_amount: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            user_count: 8,
            expense_count: 40,
            min_amount: 100,
            max_amount: 50_000,
        }
    }
}

/// Generate a random expense history for one group.
///
/// Every expense uses equal splits over a random participant subset, so
/// the generated set always satisfies the split-sum invariant and the
/// aggregate is guaranteed zero-sum.
pub fn generate_random_group(config: &GroupConfig) -> ExpenseSet {
    let mut rng = rand::thread_rng();
    let group = GroupId::new("generated");

    let users: Vec<UserId> = (0..config.user_count)
        .map(|i| UserId::new(format!("user-{:03}", i)))
        .collect();

    let mut set = ExpenseSet::new();
    for _ in 0..config.expense_count {
        let payer = users.choose(&mut rng).cloned().unwrap_or_else(|| UserId::new("user-000"));

        let participant_count = rng.gen_range(1..=users.len());
        let mut pool = users.clone();
        pool.shuffle(&mut rng);
        pool.truncate(participant_count);
        let participants: Vec<Participant> =
            pool.into_iter().map(Participant::even).collect();

        let amount = Money::from_minor(rng.gen_range(config.min_amount..=config.max_amount));
        let splits = SplitCalculator::compute(amount, SplitPolicy::Equal, &participants)
            .expect("equal split over a non-empty subset cannot fail");

        let expense = Expense::new(
            group.clone(),
            payer,
            amount,
            "generated",
            SplitPolicy::Equal,
            splits,
        )
        .expect("computed splits satisfy the sum invariant");
        set.add(expense);
    }

    set
}
