use serde::{Deserialize, Serialize};

use crate::domain::{category_by_id, CategoryId, CategoryTotal, Cents, TransactionKind, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub user_id: UserId,
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub balance: Cents,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// `None` for the "Unknown" group
    pub category_id: Option<CategoryId>,
    pub category: String,
    pub total: Cents,
    pub count: i64,
    /// Share of the report total, 0-100
    pub percentage: f64,
}

impl CategoryReport {
    /// Build a report from grouped totals, keeping their order.
    pub fn from_totals(user_id: UserId, kind: TransactionKind, totals: Vec<CategoryTotal>) -> Self {
        let total = totals
            .iter()
            .fold(0, |sum: Cents, t| sum.saturating_add(t.total));

        let categories = totals
            .into_iter()
            .map(|t| {
                let name = match t.category_id {
                    Some(id) => category_by_id(id).name(),
                    None => crate::domain::UNKNOWN_CATEGORY_NAME,
                };
                let percentage = if total > 0 {
                    (t.total as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                CategorySummary {
                    category_id: t.category_id,
                    category: name.to_string(),
                    total: t.total,
                    count: t.count,
                    percentage,
                }
            })
            .collect();

        Self {
            user_id,
            kind,
            categories,
            total,
        }
    }
}
