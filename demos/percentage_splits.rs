//! Split-policy comparison over a single expense.
//!
//! Shows how the same amount divides under the equal, exact, and
//! percentage policies, including the rounding-remainder absorption by
//! the last listed participant.

use rust_decimal_macros::dec;
use splitledger::core::expense::SplitPolicy;
use splitledger::core::money::Money;
use splitledger::core::user::UserId;
use splitledger::split::calculator::{Participant, SplitCalculator};

fn print_splits(label: &str, amount: Money, policy: SplitPolicy, participants: &[Participant]) {
    println!("━━━ {} ━━━", label);
    match SplitCalculator::compute(amount, policy, participants) {
        Ok(splits) => {
            for split in &splits {
                println!("  {}: {}", split.user, split.amount);
            }
            let total: Money = splits.iter().map(|s| s.amount).sum();
            println!("  total: {} (expense: {})\n", total, amount);
        }
        Err(e) => println!("  rejected: {}\n", e),
    }
}

fn main() {
    let amount = Money::from_major(100);

    print_splits(
        "Equal over three",
        amount,
        SplitPolicy::Equal,
        &[
            Participant::even(UserId::new("alice")),
            Participant::even(UserId::new("bob")),
            Participant::even(UserId::new("carol")),
        ],
    );

    print_splits(
        "Exact 40 / 60",
        amount,
        SplitPolicy::Exact,
        &[
            Participant::owing(UserId::new("alice"), Money::from_major(40)),
            Participant::owing(UserId::new("bob"), Money::from_major(60)),
        ],
    );

    print_splits(
        "Percentage 33.33 / 33.33 / 33.34",
        amount,
        SplitPolicy::Percentage,
        &[
            Participant::owing_percent(UserId::new("alice"), dec!(33.33)),
            Participant::owing_percent(UserId::new("bob"), dec!(33.33)),
            Participant::owing_percent(UserId::new("carol"), dec!(33.34)),
        ],
    );

    // Validation failures are typed, not panics
    print_splits(
        "Percentage summing to 99 (rejected)",
        amount,
        SplitPolicy::Percentage,
        &[
            Participant::owing_percent(UserId::new("alice"), dec!(50)),
            Participant::owing_percent(UserId::new("bob"), dec!(49)),
        ],
    );
}
