use crate::core::money::Money;
use crate::core::user::{GroupId, UserId};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How an expense amount is divided among its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Evenly divided; the last listed participant absorbs the rounding
    /// remainder.
    Equal,
    /// Each participant declares an explicit amount.
    Exact,
    /// Each participant declares a percentage of the total.
    Percentage,
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::Equal => write!(f, "equal"),
            SplitPolicy::Exact => write!(f, "exact"),
            SplitPolicy::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for SplitPolicy {
    type Err = ValidationError;

    /// Parse a policy name, case-insensitively.
    ///
    /// This is the only place `InvalidSplitType` can arise: once parsed,
    /// the enum makes out-of-range policies unrepresentable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitPolicy::Equal),
            "exact" => Ok(SplitPolicy::Exact),
            "percentage" => Ok(SplitPolicy::Percentage),
            _ => Err(ValidationError::InvalidSplitType {
                given: s.to_string(),
            }),
        }
    }
}

/// The portion of one expense attributed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub user: UserId,
    pub amount: Money,
    /// Only meaningful under the percentage policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl ExpenseSplit {
    pub fn new(user: UserId, amount: Money) -> Self {
        Self {
            user,
            amount,
            percentage: None,
        }
    }

    pub fn with_percentage(user: UserId, amount: Money, percentage: Decimal) -> Self {
        Self {
            user,
            amount,
            percentage: Some(percentage),
        }
    }
}

/// A pooled expense paid by one group member on behalf of several.
///
/// Expenses are created atomically with their splits and mutated only by
/// full replacement; splits are never patched incrementally. The split-sum
/// invariant is enforced at construction: the shares must add up to the
/// expense amount exactly.
///
/// # Examples
///
/// ```
/// use splitledger::core::expense::{Expense, ExpenseSplit, SplitPolicy};
/// use splitledger::core::money::Money;
/// use splitledger::core::user::{GroupId, UserId};
///
/// let expense = Expense::new(
///     GroupId::new("trip"),
///     UserId::new("alice"),
///     Money::from_major(90),
///     "dinner",
///     SplitPolicy::Equal,
///     vec![
///         ExpenseSplit::new(UserId::new("alice"), Money::from_major(30)),
///         ExpenseSplit::new(UserId::new("bob"), Money::from_major(30)),
///         ExpenseSplit::new(UserId::new("carol"), Money::from_major(30)),
///     ],
/// ).unwrap();
///
/// assert_eq!(expense.amount(), Money::from_major(90));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// The group this expense belongs to.
    group: GroupId,
    /// The member who fronted the money.
    payer: UserId,
    /// The full amount paid.
    amount: Money,
    /// Free-form category label ("dinner", "fuel", ...).
    category: String,
    /// The policy its splits were computed under.
    policy: SplitPolicy,
    /// Ordered per-participant shares. Sums to `amount` exactly.
    splits: Vec<ExpenseSplit>,
    /// When this expense was recorded.
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, validating the split-sum invariant.
    pub fn new(
        group: GroupId,
        payer: UserId,
        amount: Money,
        category: impl Into<String>,
        policy: SplitPolicy,
        splits: Vec<ExpenseSplit>,
    ) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), group, payer, amount, category, policy, splits)
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        group: GroupId,
        payer: UserId,
        amount: Money,
        category: impl Into<String>,
        policy: SplitPolicy,
        splits: Vec<ExpenseSplit>,
    ) -> Result<Self, ValidationError> {
        if splits.is_empty() {
            return Err(ValidationError::EmptyParticipantSet);
        }
        let total: Money = splits.iter().map(|s| s.amount).sum();
        if total != amount {
            return Err(ValidationError::SplitSumMismatch {
                expected: amount,
                actual: total,
            });
        }
        Ok(Self {
            id,
            group,
            payer,
            amount,
            category: category.into(),
            policy,
            splits,
            created_at: Utc::now(),
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    pub fn splits(&self) -> &[ExpenseSplit] {
        &self.splits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A collection of expenses for one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total gross value of all expenses.
    pub fn gross_total(&self) -> Money {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// All unique users referenced as payer or split participant.
    pub fn participants(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .expenses
            .iter()
            .flat_map(|e| {
                std::iter::once(e.payer().clone())
                    .chain(e.splits().iter().map(|s| s.user.clone()))
            })
            .collect();
        users.sort();
        users.dedup();
        users
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_expense() -> Expense {
        Expense::new(
            GroupId::new("trip"),
            UserId::new("alice"),
            Money::from_major(90),
            "dinner",
            SplitPolicy::Equal,
            vec![
                ExpenseSplit::new(UserId::new("alice"), Money::from_major(30)),
                ExpenseSplit::new(UserId::new("bob"), Money::from_major(30)),
                ExpenseSplit::new(UserId::new("carol"), Money::from_major(30)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_expense_creation() {
        let e = sample_expense();
        assert_eq!(e.payer().as_str(), "alice");
        assert_eq!(e.amount(), Money::from_major(90));
        assert_eq!(e.splits().len(), 3);
        assert_eq!(e.category(), "dinner");
    }

    #[test]
    fn test_split_sum_enforced() {
        let err = Expense::new(
            GroupId::new("trip"),
            UserId::new("alice"),
            Money::from_major(90),
            "dinner",
            SplitPolicy::Exact,
            vec![ExpenseSplit::new(UserId::new("bob"), Money::from_major(40))],
        );
        assert_eq!(
            err.unwrap_err(),
            ValidationError::SplitSumMismatch {
                expected: Money::from_major(90),
                actual: Money::from_major(40),
            }
        );
    }

    #[test]
    fn test_empty_splits_rejected() {
        let err = Expense::new(
            GroupId::new("trip"),
            UserId::new("alice"),
            Money::from_major(90),
            "dinner",
            SplitPolicy::Equal,
            vec![],
        );
        assert_eq!(err.unwrap_err(), ValidationError::EmptyParticipantSet);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("EQUAL".parse::<SplitPolicy>().unwrap(), SplitPolicy::Equal);
        assert_eq!("exact".parse::<SplitPolicy>().unwrap(), SplitPolicy::Exact);
        assert_eq!(
            "Percentage".parse::<SplitPolicy>().unwrap(),
            SplitPolicy::Percentage
        );
        assert_eq!(
            "thirds".parse::<SplitPolicy>().unwrap_err(),
            ValidationError::InvalidSplitType {
                given: "thirds".to_string()
            }
        );
    }

    #[test]
    fn test_expense_set_totals() {
        let mut set = ExpenseSet::new();
        set.add(sample_expense());
        set.add(sample_expense());
        assert_eq!(set.len(), 2);
        assert_eq!(set.gross_total(), Money::from_major(180));
        assert_eq!(set.participants().len(), 3);
    }
}
