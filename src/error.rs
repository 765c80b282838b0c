use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),

    /// The add request had no amount.
    #[error("amount is required")]
    MissingAmount,
    /// The add request had no category.
    #[error("category is required")]
    MissingCategory,
    #[error("invalid amount '{0}', please provide a valid decimal number")]
    InvalidAmount(String),
    /// Direction is carried by the transaction type, so amounts are magnitudes.
    #[error("amount cannot be negative: {0}")]
    NegativeAmount(String),
    #[error("invalid transaction type '{0}', use 'income' or 'expense'")]
    InvalidTransactionType(String),
    #[error("invalid date '{0}', use YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDate(String),
}
