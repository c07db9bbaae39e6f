use crate::core::balance::Balance;
use crate::core::expense::Expense;
use crate::core::money::Money;
use crate::core::user::{GroupId, UserId};
use crate::error::{EngineError, InvariantViolation, ValidationError};
use crate::settlement::aggregator::LedgerAggregator;
use crate::settlement::minimizer::{DebtMinimizer, Transfer};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Answers "is user X a member of group Y" for authorization.
///
/// Implemented by the surrounding system (database, service call, ...);
/// the engine only consumes the answer.
pub trait MembershipProvider {
    fn is_member(&self, group: &GroupId, user: &UserId) -> bool;
}

/// Supplies a group's expenses with splits already loaded.
pub trait ExpenseProvider {
    fn expenses_for(&self, group: &GroupId) -> Vec<Expense>;
}

/// Whether a displayed balance is money owed to the user or by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// The group owes this user.
    Owed,
    /// This user owes the group.
    Owes,
}

/// One user's line in the settlement report. `amount` is absolute; the
/// sign lives in `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub user: UserId,
    pub amount: Money,
    pub status: BalanceStatus,
}

impl BalanceEntry {
    fn from_balance(balance: &Balance) -> Self {
        Self {
            user: balance.user.clone(),
            amount: balance.net.abs(),
            status: if balance.net.is_positive() {
                BalanceStatus::Owed
            } else {
                BalanceStatus::Owes
            },
        }
    }
}

/// The advisory settlement result for one group: who stands where, and
/// which transfers would zero everyone out.
///
/// Nothing here is persisted — recording an actual payment is a separate
/// write path the caller invokes explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSuggestion {
    pub balances: Vec<BalanceEntry>,
    pub transfers: Vec<Transfer>,
}

impl SettlementSuggestion {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

impl fmt::Display for SettlementSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Suggestion ===")?;
        writeln!(f, "Balances:")?;
        for entry in &self.balances {
            let verb = match entry.status {
                BalanceStatus::Owed => "is owed",
                BalanceStatus::Owes => "owes",
            };
            writeln!(f, "  {} {} {}", entry.user, verb, entry.amount)?;
        }
        writeln!(f, "Suggested transfers:")?;
        if self.transfers.is_empty() {
            writeln!(f, "  (already settled)")?;
        }
        for transfer in &self.transfers {
            writeln!(f, "  {}", transfer)?;
        }
        Ok(())
    }
}

/// Run the full pipeline over an already-fetched expense list:
/// aggregate, list non-zero balances, minimize.
///
/// This is the pure orchestration every call site shares; membership
/// authorization lives in [`SettlementSuggester`].
pub fn suggest_settlements(
    expenses: &[Expense],
) -> Result<SettlementSuggestion, InvariantViolation> {
    let sheet = LedgerAggregator::aggregate(expenses);
    let balances = sheet.balances();
    let transfers = DebtMinimizer::minimize(&balances)?;

    info!(
        "suggested {} transfers across {} open balances",
        transfers.len(),
        balances.len()
    );
    Ok(SettlementSuggestion {
        balances: balances.iter().map(BalanceEntry::from_balance).collect(),
        transfers,
    })
}

/// Membership-gated settlement suggestions for a single group.
///
/// Consumes the two external collaborators and otherwise holds no state;
/// one instance can serve any number of concurrent queries.
pub struct SettlementSuggester<M, E> {
    membership: M,
    expenses: E,
}

impl<M: MembershipProvider, E: ExpenseProvider> SettlementSuggester<M, E> {
    pub fn new(membership: M, expenses: E) -> Self {
        Self {
            membership,
            expenses,
        }
    }

    /// Suggest settlements for `group`, on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotAMember`] when the caller does not belong to
    /// the group; an [`InvariantViolation`] passes through untranslated so
    /// the boundary can report it as an internal failure rather than a
    /// client error.
    pub fn suggest_for_group(
        &self,
        group: &GroupId,
        caller: &UserId,
    ) -> Result<SettlementSuggestion, EngineError> {
        if !self.membership.is_member(group, caller) {
            return Err(ValidationError::NotAMember {
                user: caller.clone(),
                group: group.clone(),
            }
            .into());
        }
        let expenses = self.expenses.expenses_for(group);
        Ok(suggest_settlements(&expenses)?)
    }
}

/// In-memory group store, usable as both providers.
///
/// Backs the CLI and tests; a real deployment implements the provider
/// traits over its own persistence instead.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupStore {
    members: HashMap<GroupId, Vec<UserId>>,
    expenses: HashMap<GroupId, Vec<Expense>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, group: GroupId, user: UserId) {
        let members = self.members.entry(group).or_default();
        if !members.contains(&user) {
            members.push(user);
        }
    }

    pub fn add_expense(&mut self, expense: Expense) {
        // Payer and participants are implicitly members.
        self.add_member(expense.group().clone(), expense.payer().clone());
        for split in expense.splits() {
            self.add_member(expense.group().clone(), split.user.clone());
        }
        self.expenses
            .entry(expense.group().clone())
            .or_default()
            .push(expense);
    }
}

impl MembershipProvider for InMemoryGroupStore {
    fn is_member(&self, group: &GroupId, user: &UserId) -> bool {
        self.members
            .get(group)
            .map(|m| m.contains(user))
            .unwrap_or(false)
    }
}

impl ExpenseProvider for InMemoryGroupStore {
    fn expenses_for(&self, group: &GroupId) -> Vec<Expense> {
        self.expenses.get(group).cloned().unwrap_or_default()
    }
}

impl MembershipProvider for &InMemoryGroupStore {
    fn is_member(&self, group: &GroupId, user: &UserId) -> bool {
        (**self).is_member(group, user)
    }
}

impl ExpenseProvider for &InMemoryGroupStore {
    fn expenses_for(&self, group: &GroupId) -> Vec<Expense> {
        (**self).expenses_for(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{ExpenseSplit, SplitPolicy};

    fn store_with_dinner() -> InMemoryGroupStore {
        let mut store = InMemoryGroupStore::new();
        store.add_expense(
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
            .unwrap(),
        );
        store
    }

    #[test]
    fn test_member_gets_suggestion() {
        let store = store_with_dinner();
        let suggester = SettlementSuggester::new(&store, &store);
        let result = suggester
            .suggest_for_group(&GroupId::new("trip"), &UserId::new("bob"))
            .unwrap();

        assert_eq!(result.balances.len(), 3);
        assert_eq!(result.transfers.len(), 2);
        let alice = result
            .balances
            .iter()
            .find(|b| b.user.as_str() == "alice")
            .unwrap();
        assert_eq!(alice.status, BalanceStatus::Owed);
        assert_eq!(alice.amount, Money::from_major(60));
    }

    #[test]
    fn test_non_member_rejected() {
        let store = store_with_dinner();
        let suggester = SettlementSuggester::new(&store, &store);
        let err = suggester
            .suggest_for_group(&GroupId::new("trip"), &UserId::new("mallory"))
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::Validation(ValidationError::NotAMember {
                user: UserId::new("mallory"),
                group: GroupId::new("trip"),
            })
        );
    }

    #[test]
    fn test_unknown_group_rejected() {
        let store = store_with_dinner();
        let suggester = SettlementSuggester::new(&store, &store);
        let err = suggester
            .suggest_for_group(&GroupId::new("nope"), &UserId::new("alice"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_group_is_settled() {
        let result = suggest_settlements(&[]).unwrap();
        assert!(result.is_settled());
        assert!(result.balances.is_empty());
    }

    #[test]
    fn test_zero_balances_filtered_from_report() {
        // bob repays his share exactly; only alice and carol remain open
        let mut store = store_with_dinner();
        store.add_expense(
            Expense::new(
                GroupId::new("trip"),
                UserId::new("bob"),
                Money::from_major(30),
                "repayment",
                SplitPolicy::Exact,
                vec![ExpenseSplit::new(UserId::new("alice"), Money::from_major(30))],
            )
            .unwrap(),
        );
        let suggester = SettlementSuggester::new(&store, &store);
        let result = suggester
            .suggest_for_group(&GroupId::new("trip"), &UserId::new("alice"))
            .unwrap();

        assert!(result.balances.iter().all(|b| b.user.as_str() != "bob"));
        assert_eq!(result.transfers.len(), 1);
        assert_eq!(result.transfers[0].from, UserId::new("carol"));
        assert_eq!(result.transfers[0].to, UserId::new("alice"));
        assert_eq!(result.transfers[0].amount, Money::from_major(30));
    }

    #[test]
    fn test_display_report() {
        let result = suggest_settlements(&store_with_dinner().expenses_for(&GroupId::new("trip")))
            .unwrap();
        let report = result.to_string();
        assert!(report.contains("alice is owed 60.00"));
        assert!(report.contains("bob owes 30.00"));
        assert!(report.contains("bob → alice: 30.00"));
    }
}
