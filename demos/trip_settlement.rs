//! End-to-end settlement walkthrough for a weekend trip.
//!
//! Demonstrates expense recording, balance aggregation, and the
//! suggested transfers that settle the group.

use splitledger::core::expense::{Expense, SplitPolicy};
use splitledger::core::money::Money;
use splitledger::core::user::{GroupId, UserId};
use splitledger::settlement::suggester::{InMemoryGroupStore, SettlementSuggester};
use splitledger::split::calculator::{Participant, SplitCalculator};

fn record(
    store: &mut InMemoryGroupStore,
    payer: &str,
    amount: Money,
    category: &str,
    participants: &[Participant],
) {
    let splits = SplitCalculator::compute(amount, SplitPolicy::Equal, participants)
        .expect("equal split");
    let expense = Expense::new(
        GroupId::new("weekend-trip"),
        UserId::new(payer),
        amount,
        category,
        SplitPolicy::Equal,
        splits,
    )
    .expect("valid expense");
    store.add_expense(expense);
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  splitledger: Trip Settlement Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let everyone: Vec<Participant> = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|u| Participant::even(UserId::new(*u)))
        .collect();

    let mut store = InMemoryGroupStore::new();
    record(&mut store, "alice", Money::from_major(200), "cabin", &everyone);
    record(&mut store, "bob", Money::from_minor(6275), "fuel", &everyone);
    record(&mut store, "carol", Money::from_minor(8450), "groceries", &everyone);
    record(&mut store, "alice", Money::from_major(90), "dinner", &everyone);

    println!("Recorded 4 expenses for weekend-trip.\n");

    let suggester = SettlementSuggester::new(&store, &store);
    let suggestion = suggester
        .suggest_for_group(&GroupId::new("weekend-trip"), &UserId::new("bob"))
        .expect("bob is a member");

    println!("{}", suggestion);

    // A non-member is refused
    let err = suggester
        .suggest_for_group(&GroupId::new("weekend-trip"), &UserId::new("mallory"))
        .unwrap_err();
    println!("Asking as an outsider: {}", err);
}
