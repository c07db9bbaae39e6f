use crate::core::balance::BalanceSheet;
use crate::core::expense::Expense;
use log::debug;

/// Folds a group's expenses into one net balance per user.
///
/// The fold is commutative: expense order never changes the result. An
/// empty expense list yields an empty sheet. The output always sums to
/// zero because every expense credits its payer exactly what it debits
/// its participants.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Aggregate expenses into a balance sheet.
    pub fn aggregate(expenses: &[Expense]) -> BalanceSheet {
        let mut sheet = BalanceSheet::new();
        for expense in expenses {
            sheet.apply_expense(expense);
        }
        debug!(
            "aggregated {} expenses into {} positions (balanced: {})",
            expenses.len(),
            sheet.len(),
            sheet.is_balanced()
        );
        sheet
    }
}
