use crate::db::kv_store::KeyValueStore;
use crate::db::repository::TransactionRepository;

/// Listings show shortened ids, so a prefix that matches exactly one
/// transaction is accepted as well as the full id.
pub fn resolve_transaction_id<S: KeyValueStore>(
    repository: &TransactionRepository<S>,
    input: &str,
) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(transaction) = repository.find(input) {
        return Some(transaction.id.clone());
    }

    let mut matches = repository
        .transactions()
        .iter()
        .filter(|t| t.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.id.clone()),
        _ => None,
    }
}

/// Deletes the transaction named by `input`. Returns `false` without touching
/// the repository when nothing matches.
pub fn remove_transaction_from_store<S: KeyValueStore>(
    repository: &mut TransactionRepository<S>,
    input: &str,
) -> bool {
    match resolve_transaction_id(repository, input) {
        Some(id) => repository.delete(&id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::kv_store::MemoryKeyValueStore;
    use crate::db::repository::DEFAULT_STORAGE_KEY;
    use crate::models::transaction::{NewTransaction, Transaction, TransactionType, parse_transaction_date};
    use rust_decimal::Decimal;

    fn repository_with(ids: &[&str]) -> TransactionRepository<MemoryKeyValueStore> {
        let transactions: Vec<Transaction> = ids
            .iter()
            .map(|id| {
                NewTransaction::new(
                    TransactionType::Expense,
                    Decimal::from(10),
                    "อาหาร".to_string(),
                    String::new(),
                    parse_transaction_date("2024-05-01").unwrap(),
                )
                .with_id(id.to_string())
            })
            .collect();
        let backend = MemoryKeyValueStore::with_value(
            DEFAULT_STORAGE_KEY,
            &serde_json::to_string(&transactions).unwrap(),
        );
        TransactionRepository::open(backend, DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn test_remove_by_full_id() {
        let mut repository = repository_with(&["abc123", "def456"]);

        assert!(remove_transaction_from_store(&mut repository, "abc123"));
        assert_eq!(repository.transactions().len(), 1);
        assert_eq!(repository.transactions()[0].id, "def456");
    }

    #[test]
    fn test_remove_by_unique_prefix() {
        let mut repository = repository_with(&["abc123", "def456"]);

        assert!(remove_transaction_from_store(&mut repository, " def "));
        assert_eq!(repository.transactions().len(), 1);
        assert_eq!(repository.transactions()[0].id, "abc123");
    }

    #[test]
    fn test_ambiguous_prefix_is_ignored() {
        let mut repository = repository_with(&["abc123", "abd456"]);

        assert!(!remove_transaction_from_store(&mut repository, "ab"));
        assert_eq!(repository.transactions().len(), 2);
    }

    #[test]
    fn test_full_id_wins_over_prefix() {
        let repository = repository_with(&["abc", "abcdef"]);
        assert_eq!(resolve_transaction_id(&repository, "abc").as_deref(), Some("abc"));
    }

    #[test]
    fn test_remove_unknown_or_empty_is_noop() {
        let mut repository = repository_with(&["abc123"]);
        let before = repository.transactions().to_vec();

        assert!(!remove_transaction_from_store(&mut repository, "zzz"));
        assert!(!remove_transaction_from_store(&mut repository, "   "));
        assert_eq!(repository.transactions(), before.as_slice());
    }
}
