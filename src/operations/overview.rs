//! Plain-text views printed by the command loop.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::category::CategoryConfig;
use crate::models::transaction::{Transaction, TransactionType};
use crate::models::window::TimeWindow;
use crate::operations::aggregate::{
    CategoryTotal, TimeBucket, aggregate_by_category, totals_for_categories,
};
use crate::operations::summary::Summary;

const SHORT_ID_LEN: usize = 8;
const BAR_WIDTH: usize = 30;

pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-{}{}", symbol, amount.abs().normalize())
    } else {
        format!("{}{}", symbol, amount.normalize())
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

pub fn format_summary(summary: &Summary, window: TimeWindow, symbol: &str) -> String {
    format!(
        "Income {title}:  {income}\nExpense {title}: {expense}\nBalance {title}: {balance}\nTransactions:     {count}",
        title = window.title(),
        income = format_amount(symbol, summary.total_income),
        expense = format_amount(symbol, summary.total_expense),
        balance = format_amount(symbol, summary.balance),
        count = summary.count,
    )
}

pub fn format_transaction_line(transaction: &Transaction, symbol: &str) -> String {
    let sign = match transaction.transaction_type {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    let description = if transaction.description.is_empty() {
        "(no description)"
    } else {
        transaction.description.as_str()
    };
    format!(
        "{}  {}  {}{}  [{}] {}",
        short_id(&transaction.id),
        transaction.date.format("%Y-%m-%d %H:%M"),
        sign,
        format_amount(symbol, transaction.amount),
        transaction.category,
        description
    )
}

pub fn format_transaction_list<'a, I>(transactions: I, window: TimeWindow, symbol: &str) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let lines: Vec<String> = transactions
        .into_iter()
        .map(|t| format_transaction_line(t, symbol))
        .collect();
    if lines.is_empty() {
        return format!("No transactions {}.", window.title());
    }
    let mut out = format!("Transactions {} ({}):", window.title(), lines.len());
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Renders one row per bucket with income and expense bars scaled to the
/// largest total.
pub fn format_bucket_chart(buckets: &[TimeBucket], window: TimeWindow, symbol: &str) -> String {
    if buckets.is_empty() {
        return format!("No chart data {}.", window.title());
    }
    let max_total = buckets
        .iter()
        .map(|b| b.income_total.max(b.expense_total))
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = buckets
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("Income vs expense {}:", window.title());
    for bucket in buckets {
        out.push_str(&format!(
            "\n{:>width$} | + {} {}\n{:>width$} | - {} {}",
            bucket.label,
            bar(bucket.income_total, max_total, '#'),
            format_amount(symbol, bucket.income_total),
            "",
            bar(bucket.expense_total, max_total, '='),
            format_amount(symbol, bucket.expense_total),
            width = label_width,
        ));
    }
    out
}

pub fn scaled_length(value: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }
    let scaled = (value / max * Decimal::from(width as u64)).ceil();
    scaled.to_usize().unwrap_or(width).min(width)
}

fn bar(value: Decimal, max: Decimal, fill: char) -> String {
    let len = scaled_length(value, max, BAR_WIDTH);
    format!("{}{}", fill.to_string().repeat(len), " ".repeat(BAR_WIDTH - len))
}

fn format_category_section(title: &str, totals: &[CategoryTotal], symbol: &str) -> String {
    let mut out = format!("{}:", title);
    if totals.is_empty() {
        out.push_str("\n  (none)");
    }
    for total in totals {
        out.push_str(&format!("\n  {}  {}", total.category, format_amount(symbol, total.total)));
    }
    out
}

/// The per-type breakdown sorted by total, followed by every configured
/// category including the empty ones.
pub fn format_category_report(
    transactions: &[&Transaction],
    categories: &CategoryConfig,
    window: TimeWindow,
    symbol: &str,
) -> String {
    let mut sections = vec![format!("Categories {}", window.title())];
    for (transaction_type, name) in [
        (TransactionType::Income, "Income"),
        (TransactionType::Expense, "Expense"),
    ] {
        let share = aggregate_by_category(transactions.iter().copied(), transaction_type);
        sections.push(format_category_section(
            &format!("{} by category", name),
            &share,
            symbol,
        ));
        let configured = totals_for_categories(
            transactions.iter().copied(),
            transaction_type,
            categories.for_type(transaction_type),
        );
        sections.push(format_category_section(
            &format!("{} categories", name),
            &configured,
            symbol,
        ));
    }
    sections.join("\n")
}
