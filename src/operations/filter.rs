use chrono::{Datelike, NaiveDateTime};

use crate::models::transaction::Transaction;
use crate::models::window::TimeWindow;

/// Keeps the transactions that fall inside `window` around `reference`,
/// preserving their order.
pub fn filter_by_window<'a>(
    transactions: &'a [Transaction],
    window: TimeWindow,
    reference: NaiveDateTime,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| in_window(transaction.date, window, reference))
        .collect()
}

fn in_window(date: NaiveDateTime, window: TimeWindow, reference: NaiveDateTime) -> bool {
    match window {
        TimeWindow::Day => date.date() == reference.date(),
        TimeWindow::Month => date.year() == reference.year() && date.month() == reference.month(),
        TimeWindow::Year => date.year() == reference.year(),
        TimeWindow::All => true,
    }
}
