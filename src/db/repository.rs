use uuid::Uuid;

use crate::db::kv_store::KeyValueStore;
use crate::error::Result;
use crate::models::transaction::{NewTransaction, Transaction, is_valid_amount};

pub const DEFAULT_STORAGE_KEY: &str = "transactions";

/// Owns the transaction collection, newest first, and mirrors it into a
/// key-value backend after every mutation.
///
/// Persistence is best effort: when a write fails the in-memory collection
/// stays authoritative for the rest of the session.
pub struct TransactionRepository<S: KeyValueStore> {
    backend: S,
    key: String,
    transactions: Vec<Transaction>,
}

impl<S: KeyValueStore> TransactionRepository<S> {
    pub fn open(backend: S, key: &str) -> Self {
        let mut repository = Self {
            backend,
            key: key.to_string(),
            transactions: Vec::new(),
        };
        repository.transactions = repository.load();
        repository
    }

    /// Reads the persisted collection. Missing or unreadable state yields an
    /// empty collection; individual records that fail to parse or carry an
    /// out-of-range amount are skipped.
    pub fn load(&self) -> Vec<Transaction> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted transactions");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(key = %self.key, "failed to read persisted transactions: {err}");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(key = %self.key, "ignoring unparsable transactions: {err}");
                return Vec::new();
            }
        };

        let stored = records.len();
        let transactions: Vec<Transaction> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Transaction>(record) {
                Ok(transaction) if is_valid_amount(transaction.amount) => Some(transaction),
                Ok(transaction) => {
                    tracing::warn!(
                        id = %transaction.id,
                        amount = %transaction.amount,
                        "skipping transaction with out-of-range amount"
                    );
                    None
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, "skipping unreadable transaction: {err}");
                    None
                }
            })
            .collect();
        tracing::debug!(count = transactions.len(), stored, "loaded transactions");
        transactions
    }

    /// Writes the whole collection, replacing whatever was stored before.
    pub fn persist(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.transactions)?;
        self.backend.set(&self.key, &payload)
    }

    pub fn add(&mut self, new_transaction: NewTransaction) -> Transaction {
        let transaction = new_transaction.with_id(Uuid::new_v4().to_string());
        self.transactions.insert(0, transaction.clone());
        tracing::info!(
            id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            "added transaction"
        );
        self.persist_or_log();
        transaction
    }

    /// Removes the transaction with `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "delete ignored, no such transaction");
            return false;
        };
        self.transactions.remove(pos);
        tracing::info!(id, "deleted transaction");
        self.persist_or_log();
        true
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    fn persist_or_log(&mut self) {
        if let Err(err) = self.persist() {
            tracing::error!(key = %self.key, "failed to persist transactions: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::db::kv_store::{MemoryKeyValueStore, SqliteKeyValueStore};
    use crate::models::transaction::{TransactionType, parse_transaction_date};
    use rust_decimal::Decimal;

    fn create_new_transaction(
        transaction_type: TransactionType,
        amount: i64,
        category: &str,
    ) -> NewTransaction {
        NewTransaction::new(
            transaction_type,
            Decimal::from(amount),
            category.to_string(),
            "Test Transaction".to_string(),
            parse_transaction_date("2024-05-01").unwrap(),
        )
    }

    fn empty_repository() -> TransactionRepository<MemoryKeyValueStore> {
        TransactionRepository::open(MemoryKeyValueStore::new(), DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn test_open_without_state_is_empty() {
        let repository = empty_repository();
        assert!(repository.transactions().is_empty());
    }

    #[test]
    fn test_open_with_unparsable_state_is_empty() {
        let backend = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, "{not json");
        let repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);
        assert!(repository.transactions().is_empty());
    }

    #[test]
    fn test_open_with_wrong_shape_is_empty() {
        let backend = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, r#"{"id":"1"}"#);
        let repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);
        assert!(repository.transactions().is_empty());
    }

    #[test]
    fn test_open_skips_only_the_bad_records() {
        let raw = r#"[
            {"id":"good","type":"expense","amount":"100","category":"อาหาร","date":"2024-05-01T00:00:00"},
            {"id":"bad-date","type":"expense","amount":"20","category":"อาหาร","date":"01/05/2024"},
            {"id":"bad-type","type":"transfer","amount":"20","category":"อาหาร","date":"2024-05-01"}
        ]"#;
        let backend = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, raw);
        let repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);

        assert_eq!(repository.transactions().len(), 1);
        assert_eq!(repository.transactions()[0].id, "good");
    }

    #[test]
    fn test_open_skips_out_of_range_amounts() {
        let raw = r#"[
            {"id":"negative","type":"income","amount":-50,"category":"อื่นๆ","date":"2024-05-01"},
            {"id":"huge","type":"income","amount":"79228162514264337593543950335","category":"อื่นๆ","date":"2024-05-01"},
            {"id":"numeric","type":"income","amount":50,"category":"อื่นๆ","date":"2024-05-01"}
        ]"#;
        let backend = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, raw);
        let repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);

        let ids: Vec<&str> = repository.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["numeric"]);
        assert_eq!(repository.transactions()[0].amount, Decimal::from(50));
    }

    #[test]
    fn test_add_after_partial_load_keeps_valid_records() {
        let raw = r#"[
            {"id":"good","type":"expense","amount":"100","category":"อาหาร","date":"2024-05-01"},
            {"id":"bad","type":"expense","amount":"20","category":"อาหาร","date":"not a date"}
        ]"#;
        let backend = MemoryKeyValueStore::with_value(DEFAULT_STORAGE_KEY, raw);
        let mut repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);

        repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));

        let reloaded = repository.load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[1].id, "good");
    }

    #[test]
    fn test_add_assigns_id_and_prepends() {
        let mut repository = empty_repository();

        let first = repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));
        let second = repository.add(create_new_transaction(TransactionType::Expense, 100, "อาหาร"));

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(repository.transactions().len(), 2);
        assert_eq!(repository.transactions()[0].id, second.id);
        assert_eq!(repository.transactions()[1].id, first.id);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut repository = empty_repository();
        for _ in 0..50 {
            repository.add(create_new_transaction(TransactionType::Expense, 1, "อาหาร"));
        }

        let mut ids: Vec<&str> = repository.transactions().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_add_then_delete_restores_collection() {
        let mut repository = empty_repository();
        repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));
        let before = repository.transactions().to_vec();

        let added = repository.add(create_new_transaction(TransactionType::Expense, 100, "อาหาร"));
        assert!(repository.delete(&added.id));

        assert_eq!(repository.transactions(), before.as_slice());
        assert_eq!(repository.load(), before);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut repository = empty_repository();
        repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));
        let before = repository.transactions().to_vec();

        assert!(!repository.delete("does-not-exist"));
        assert_eq!(repository.transactions(), before.as_slice());
    }

    #[test]
    fn test_state_survives_reopen() {
        let mut repository = TransactionRepository::open(
            SqliteKeyValueStore::new(establish_test_connection().unwrap()),
            DEFAULT_STORAGE_KEY,
        );
        let added = repository.add(create_new_transaction(TransactionType::Expense, 100, "อาหาร"));

        let reloaded = repository.load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0], added);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut backend = MemoryKeyValueStore::new();
        backend.fail_writes();
        let mut repository = TransactionRepository::open(backend, DEFAULT_STORAGE_KEY);

        let added = repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));

        assert_eq!(repository.transactions().len(), 1);
        assert_eq!(repository.find(&added.id), Some(&added));
        assert!(repository.persist().is_err());
        assert!(repository.load().is_empty());
    }

    #[test]
    fn test_find() {
        let mut repository = empty_repository();
        let added = repository.add(create_new_transaction(TransactionType::Income, 500, "เงินเดือน"));

        assert_eq!(repository.find(&added.id).map(|t| t.amount), Some(Decimal::from(500)));
        assert!(repository.find("missing").is_none());
    }
}
