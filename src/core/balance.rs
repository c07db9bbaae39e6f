use crate::core::expense::Expense;
use crate::core::money::Money;
use crate::core::user::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user's signed net position within a group.
///
/// Positive means the group owes the user; negative means the user owes
/// the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub user: UserId,
    pub net: Money,
}

impl Balance {
    pub fn new(user: UserId, net: Money) -> Self {
        Self { user, net }
    }
}

/// Net position of every user touched by a group's expenses.
///
/// Derived, transient state: recomputed on every query and never persisted.
/// Because amounts are integer cents, the sheet balances to exactly zero
/// whenever it was built from well-formed expenses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// UserId -> net amount. Positive = owed to the user.
    positions: HashMap<UserId, Money>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one expense: credit the payer the full amount, debit every
    /// split participant their share.
    ///
    /// A payer who also appears in the splits receives both the credit and
    /// the debit; the net effect is their own share.
    pub fn apply_expense(&mut self, expense: &Expense) {
        *self
            .positions
            .entry(expense.payer().clone())
            .or_insert(Money::ZERO) += expense.amount();
        for split in expense.splits() {
            *self
                .positions
                .entry(split.user.clone())
                .or_insert(Money::ZERO) -= split.amount;
        }
    }

    /// Net position of a single user (zero if never touched).
    pub fn net_of(&self, user: &UserId) -> Money {
        self.positions.get(user).copied().unwrap_or(Money::ZERO)
    }

    /// Number of users with an entry, including zeroed ones.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Verify the zero-sum invariant: all positions add up to zero.
    pub fn is_balanced(&self) -> bool {
        self.positions.values().copied().sum::<Money>() == Money::ZERO
    }

    /// Non-zero balances, sorted by user id.
    ///
    /// The sort gives downstream consumers (and the minimizer's tie-break
    /// rule) a stable, reproducible ordering.
    pub fn balances(&self) -> Vec<Balance> {
        let mut out: Vec<Balance> = self
            .positions
            .iter()
            .filter(|(_, net)| !net.is_zero())
            .map(|(user, &net)| Balance::new(user.clone(), net))
            .collect();
        out.sort_by(|a, b| a.user.cmp(&b.user));
        out
    }

    /// Total owed to creditors (= total owed by debtors when balanced).
    pub fn total_outstanding(&self) -> Money {
        self.positions
            .values()
            .filter(|net| net.is_positive())
            .copied()
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{ExpenseSplit, SplitPolicy};
    use crate::core::user::GroupId;

    fn equal_dinner() -> Expense {
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
    fn test_payer_credited_participants_debited() {
        let mut sheet = BalanceSheet::new();
        sheet.apply_expense(&equal_dinner());

        assert_eq!(sheet.net_of(&UserId::new("alice")), Money::from_major(60));
        assert_eq!(sheet.net_of(&UserId::new("bob")), Money::from_major(-30));
        assert_eq!(sheet.net_of(&UserId::new("carol")), Money::from_major(-30));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_untouched_user_is_zero() {
        let sheet = BalanceSheet::new();
        assert_eq!(sheet.net_of(&UserId::new("dave")), Money::ZERO);
    }

    #[test]
    fn test_balances_sorted_and_filtered() {
        let mut sheet = BalanceSheet::new();
        sheet.apply_expense(&equal_dinner());

        let balances = sheet.balances();
        let users: Vec<&str> = balances.iter().map(|b| b.user.as_str()).collect();
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_round_trip_cancels() {
        let mut sheet = BalanceSheet::new();
        sheet.apply_expense(&equal_dinner());
        // bob pays alice's and carol's shares back via a mirrored expense
        let refund = Expense::new(
            GroupId::new("trip"),
            UserId::new("bob"),
            Money::from_major(90),
            "refund",
            SplitPolicy::Exact,
            vec![
                ExpenseSplit::new(UserId::new("alice"), Money::from_major(90)),
            ],
        )
        .unwrap();
        sheet.apply_expense(&refund);

        assert!(sheet.is_balanced());
        assert_eq!(sheet.net_of(&UserId::new("bob")), Money::from_major(60));
        assert_eq!(sheet.net_of(&UserId::new("alice")), Money::from_major(-30));
    }

    #[test]
    fn test_total_outstanding() {
        let mut sheet = BalanceSheet::new();
        sheet.apply_expense(&equal_dinner());
        assert_eq!(sheet.total_outstanding(), Money::from_major(60));
    }
}
