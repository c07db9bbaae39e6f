//! # splitledger
//!
//! Group expense ledger and settlement engine.
//!
//! Given a group's recorded expenses, this engine splits each one into
//! per-participant shares, folds the history into one net balance per
//! user, and suggests a minimal set of pairwise transfers that settles
//! everyone. All arithmetic is exact integer cents — zero-sum invariants
//! hold exactly, not within a tolerance.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: money, users, expenses, balances
//! - **split** — Share computation under equal / exact / percentage policies
//! - **settlement** — Balance aggregation, debt minimization, suggestions
//! - **simulation** — Random group generation for stress testing
//!
//! The engine is synchronous and stateless: each call operates on a
//! snapshot of expenses supplied by the caller and performs no I/O.

pub mod core;
pub mod error;
pub mod settlement;
pub mod simulation;
pub mod split;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{Balance, BalanceSheet};
    pub use crate::core::expense::{Expense, ExpenseSet, ExpenseSplit, SplitPolicy};
    pub use crate::core::money::Money;
    pub use crate::core::user::{GroupId, UserId};
    pub use crate::error::{EngineError, InvariantViolation, ValidationError};
    pub use crate::settlement::aggregator::LedgerAggregator;
    pub use crate::settlement::minimizer::{DebtMinimizer, Transfer};
    pub use crate::settlement::suggester::{
        suggest_settlements, SettlementSuggester, SettlementSuggestion,
    };
    pub use crate::split::calculator::{Participant, SplitCalculator};
}
