use crate::core::money::Money;
use crate::core::user::{GroupId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Expected, recoverable input problems.
///
/// These map to client errors at whatever boundary sits in front of the
/// engine; callers branch on the kind rather than inspecting messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared exact split amounts do not add up to the expense amount.
    #[error("split amounts sum to {actual}, expected {expected}")]
    SplitSumMismatch { expected: Money, actual: Money },

    /// Declared split percentages do not add up to 100.
    #[error("split percentages sum to {actual}, expected 100")]
    PercentageSumMismatch { actual: Decimal },

    /// A split policy name outside EQUAL / EXACT / PERCENTAGE.
    #[error("unknown split policy '{given}'")]
    InvalidSplitType { given: String },

    /// A split was requested over zero participants.
    #[error("expense has no participants")]
    EmptyParticipantSet,

    /// The caller does not belong to the group being queried.
    #[error("user '{user}' is not a member of group '{group}'")]
    NotAMember { user: UserId, group: GroupId },
}

/// Internal invariant violations.
///
/// These indicate a defect in an upstream collaborator (for example a
/// non-zero-sum balance set fed to the minimizer), never a user input
/// problem. They must not be presented as validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Minimization finished with a balance that did not reach zero.
    #[error("non-zero residual balance {amount} for user '{user}' after minimization")]
    ResidualBalance { user: UserId, amount: Money },

    /// The greedy loop ran past its participant-count bound.
    #[error("debt minimization exceeded its iteration bound of {bound}")]
    IterationLimit { bound: usize },
}

/// Top-level engine error, separating the two failure classes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl EngineError {
    /// True for caller-input problems, false for internal defects.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}
