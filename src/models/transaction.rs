use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(TrackerError::InvalidTransactionType(s.trim().to_string())),
        }
    }
}

/// A recorded income or expense event. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
}

/// A transaction that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDateTime,
}

impl NewTransaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: Decimal,
        category: String,
        description: String,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            category,
            description,
            date,
        }
    }

    pub fn with_id(self, id: String) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
        }
    }
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Largest amount a single transaction may carry, in whole currency units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Amounts are non-negative magnitudes no larger than [`MAX_AMOUNT_UNITS`].
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && amount <= Decimal::from(MAX_AMOUNT_UNITS)
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a stored or user-entered date. A bare date means midnight local time;
/// timestamps with an offset are converted to local time.
pub fn parse_transaction_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date_time);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|date_time| date_time.with_timezone(&Local).naive_local())
}

mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_transaction_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid transaction date '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_only_is_midnight() {
        let date = parse_transaction_date("2024-05-01").unwrap();
        assert_eq!(date.day(), 1);
        assert_eq!(date.month(), 5);
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_parse_date_with_time() {
        let date = parse_transaction_date("2024-05-01 14:30").unwrap();
        assert_eq!(date.hour(), 14);
        assert_eq!(date.minute(), 30);

        let date = parse_transaction_date("2024-05-01T08:15:42").unwrap();
        assert_eq!(date.hour(), 8);
        assert_eq!(date.second(), 42);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_transaction_date("01/05/2024").is_none());
        assert!(parse_transaction_date("").is_none());
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" expense ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!(matches!(
            "transfer".parse::<TransactionType>(),
            Err(TrackerError::InvalidTransactionType(t)) if t == "transfer"
        ));
    }

    #[test]
    fn test_deserialize_stored_record_with_numeric_amount() {
        let json = r#"{"id":"1714521600000","type":"income","amount":500,"category":"เงินเดือน","description":"","date":"2024-05-01"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.amount, Decimal::from(500));
        assert_eq!(transaction.date.month(), 5);
    }

    #[test]
    fn test_deserialize_missing_description_defaults_to_empty() {
        let json = r#"{"id":"a","type":"expense","amount":"12.50","category":"อาหาร","date":"2024-05-01T12:00:00"}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert!(transaction.description.is_empty());
        assert_eq!(transaction.amount, Decimal::new(1250, 2));
        assert_eq!(transaction.date.hour(), 12);
    }

    #[test]
    fn test_serialize_uses_type_key_and_lowercase_type() {
        let transaction = NewTransaction::new(
            TransactionType::Expense,
            Decimal::new(100, 0),
            "อาหาร".to_string(),
            String::new(),
            parse_transaction_date("2024-05-01 09:00").unwrap(),
        )
        .with_id("x".to_string());

        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-05-01T09:00:00");
    }
}
