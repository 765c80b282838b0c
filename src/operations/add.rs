use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::kv_store::KeyValueStore;
use crate::db::repository::TransactionRepository;
use crate::error::{Result, TrackerError};
use crate::models::category::CategoryConfig;
use crate::models::transaction::{
    NewTransaction, Transaction, TransactionType, is_valid_amount, parse_transaction_date,
};

/// Parses `type, amount, category[, description[, date]]`.
///
/// When the date is omitted `now` is used. Everything between the category and
/// a trailing date belongs to the description, so descriptions may contain commas.
pub fn parse_transaction_input(raw: &str, now: NaiveDateTime) -> Result<NewTransaction> {
    let parts: Vec<&str> = raw.splitn(4, ',').map(|s| s.trim()).collect();

    let transaction_type = TransactionType::from_str(parts[0])?;

    let amount_str = parts.get(1).copied().unwrap_or("");
    if amount_str.is_empty() {
        return Err(TrackerError::MissingAmount);
    }
    let amount = Decimal::from_str(amount_str)
        .map_err(|_| TrackerError::InvalidAmount(amount_str.to_string()))?;
    if amount < Decimal::ZERO {
        return Err(TrackerError::NegativeAmount(amount_str.to_string()));
    }
    if !is_valid_amount(amount) {
        return Err(TrackerError::InvalidAmount(amount_str.to_string()));
    }

    let category = parts.get(2).copied().unwrap_or("");
    if category.is_empty() {
        return Err(TrackerError::MissingCategory);
    }

    let (description, date) = match parts.get(3) {
        Some(rest) => split_description_and_date(rest, now)?,
        None => (String::new(), now),
    };

    Ok(NewTransaction::new(
        transaction_type,
        amount,
        category.to_string(),
        description,
        date,
    ))
}

fn split_description_and_date(rest: &str, now: NaiveDateTime) -> Result<(String, NaiveDateTime)> {
    match rest.rsplit_once(',') {
        Some((description, date)) => {
            let date = date.trim();
            if date.is_empty() {
                return Ok((description.trim().to_string(), now));
            }
            match parse_transaction_date(date) {
                Some(parsed) => Ok((description.trim().to_string(), parsed)),
                None if looks_like_date(date) => Err(TrackerError::InvalidDate(date.to_string())),
                None => Ok((rest.trim().to_string(), now)),
            }
        }
        None => Ok((rest.trim().to_string(), now)),
    }
}

/// A field made only of digits and date separators, with at least one `-` or `/`.
fn looks_like_date(field: &str) -> bool {
    field.contains(['-', '/'])
        && field
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '/' | ':' | '.' | ' ' | 'T'))
}

/// Validates `raw` and stores the resulting transaction. Invalid input leaves the
/// repository untouched.
pub fn add_transaction_to_store<S: KeyValueStore>(
    repository: &mut TransactionRepository<S>,
    categories: &CategoryConfig,
    raw: &str,
    now: NaiveDateTime,
) -> Result<Transaction> {
    let new_transaction = parse_transaction_input(raw, now)?;
    if !categories.contains(new_transaction.transaction_type, &new_transaction.category) {
        tracing::warn!(
            kind = %new_transaction.transaction_type,
            category = %new_transaction.category,
            "category is not configured for this transaction type"
        );
    }
    Ok(repository.add(new_transaction))
}
