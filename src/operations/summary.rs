use rust_decimal::Decimal;

use crate::models::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`, may be negative.
    pub balance: Decimal,
    pub count: usize,
}

pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();
    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => {
                summary.total_income = summary.total_income.saturating_add(transaction.amount)
            }
            TransactionType::Expense => {
                summary.total_expense = summary.total_expense.saturating_add(transaction.amount)
            }
        }
        summary.count += 1;
    }
    summary.balance = summary.total_income.saturating_sub(summary.total_expense);
    summary
}
