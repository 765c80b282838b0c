//! Category and time-bucket totals for the charts.

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::transaction::{Transaction, TransactionType};
use crate::models::window::TimeWindow;

pub const MONTH_LABELS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucket {
    /// Hour (0-23), day of month (1-31) or month (1-12), depending on the window.
    pub key: u32,
    pub label: String,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

impl TimeBucket {
    fn new(key: u32, label: String) -> Self {
        Self {
            key,
            label,
            income_total: Decimal::ZERO,
            expense_total: Decimal::ZERO,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        if transaction.is_income() {
            self.income_total = self.income_total.saturating_add(transaction.amount);
        } else {
            self.expense_total = self.expense_total.saturating_add(transaction.amount);
        }
    }

    fn is_empty(&self) -> bool {
        self.income_total.is_zero() && self.expense_total.is_zero()
    }
}

/// Sums amounts per category for one transaction type, largest total first.
/// Equal totals keep the order in which their categories first appeared.
pub fn aggregate_by_category<'a, I>(
    transactions: I,
    transaction_type: TransactionType,
) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions
        .into_iter()
        .filter(|t| t.transaction_type == transaction_type)
    {
        match totals.iter_mut().find(|t| t.category == transaction.category) {
            Some(entry) => entry.total = entry.total.saturating_add(transaction.amount),
            None => totals.push(CategoryTotal {
                category: transaction.category.clone(),
                total: transaction.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Totals for every configured category in configured order, including
/// categories without any transactions.
pub fn totals_for_categories<'a, I>(
    transactions: I,
    transaction_type: TransactionType,
    categories: &[String],
) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = categories
        .iter()
        .map(|category| CategoryTotal {
            category: category.clone(),
            total: Decimal::ZERO,
        })
        .collect();

    for transaction in transactions
        .into_iter()
        .filter(|t| t.transaction_type == transaction_type)
    {
        if let Some(entry) = totals.iter_mut().find(|t| t.category == transaction.category) {
            entry.total = entry.total.saturating_add(transaction.amount);
        }
    }
    totals
}

/// Buckets income and expense totals by hour, day of month or month, matching
/// the granularity of `window`.
///
/// Day and year buckets are zero-filled and then stripped of empty buckets;
/// month buckets only exist for days that actually have transactions.
pub fn aggregate_by_bucket<'a, I>(transactions: I, window: TimeWindow) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let buckets = match window {
        TimeWindow::Day => by_hour(transactions),
        TimeWindow::Month => by_day_of_month(transactions),
        TimeWindow::Year => by_month(transactions),
        TimeWindow::All => Vec::new(),
    };
    tracing::debug!(window = %window, buckets = buckets.len(), "aggregated time buckets");
    buckets
}

fn by_hour<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = (0..24)
        .map(|hour| TimeBucket::new(hour, format!("{}:00", hour)))
        .collect();
    for transaction in transactions {
        buckets[transaction.date.hour() as usize].add(transaction);
    }
    buckets.retain(|bucket| !bucket.is_empty());
    buckets
}

fn by_day_of_month<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<u32, TimeBucket> = BTreeMap::new();
    for transaction in transactions {
        let day = transaction.date.day();
        buckets
            .entry(day)
            .or_insert_with(|| TimeBucket::new(day, day.to_string()))
            .add(transaction);
    }
    buckets.into_values().collect()
}

fn by_month<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = MONTH_LABELS
        .iter()
        .zip(1..)
        .map(|(label, month)| TimeBucket::new(month, label.to_string()))
        .collect();
    for transaction in transactions {
        buckets[transaction.date.month0() as usize].add(transaction);
    }
    buckets.retain(|bucket| !bucket.is_empty());
    buckets
}
