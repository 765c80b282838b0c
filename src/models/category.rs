use serde::Deserialize;

use crate::models::transaction::TransactionType;

/// The ordered category names offered for each transaction type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            income: ["เงินเดือน", "ธุรกิจ", "การลงทุน", "อื่นๆ"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            expense: [
                "อาหาร",
                "ที่อยู่อาศัย",
                "การเดินทาง",
                "สุขภาพ",
                "ความบันเทิง",
                "การศึกษา",
                "อื่นๆ",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl CategoryConfig {
    pub fn for_type(&self, transaction_type: TransactionType) -> &[String] {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    pub fn contains(&self, transaction_type: TransactionType, category: &str) -> bool {
        self.for_type(transaction_type)
            .iter()
            .any(|configured| configured == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists() {
        let categories = CategoryConfig::default();
        assert_eq!(categories.income.len(), 4);
        assert_eq!(categories.expense.len(), 7);
        assert_eq!(categories.income[0], "เงินเดือน");
        assert_eq!(categories.expense[0], "อาหาร");
    }

    #[test]
    fn test_contains_is_per_type() {
        let categories = CategoryConfig::default();
        assert!(categories.contains(TransactionType::Expense, "อาหาร"));
        assert!(!categories.contains(TransactionType::Income, "อาหาร"));
        assert!(categories.contains(TransactionType::Income, "อื่นๆ"));
        assert!(categories.contains(TransactionType::Expense, "อื่นๆ"));
    }
}
