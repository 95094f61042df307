use std::collections::HashMap;

use super::{find_category, CategoryId, Cents, Transaction, TransactionKind};

/// Balance of a list of transactions: income counts up, expenses count down.
/// Saturates at the `i64` bounds instead of overflowing.
pub fn total_balance(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |sum: Cents, t| sum.saturating_add(t.signed_amount()))
}

/// Sum of amounts for one kind.
pub fn total_of_kind(transactions: &[Transaction], kind: TransactionKind) -> Cents {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .fold(0, |sum: Cents, t| sum.saturating_add(t.amount_cents))
}

pub fn total_income(transactions: &[Transaction]) -> Cents {
    total_of_kind(transactions, TransactionKind::Income)
}

pub fn total_expenses(transactions: &[Transaction]) -> Cents {
    total_of_kind(transactions, TransactionKind::Expense)
}

/// Transactions of one kind, most recent first.
/// Equal timestamps keep their insertion order (the sort is stable).
pub fn of_kind_newest_first(transactions: &[Transaction], kind: TransactionKind) -> Vec<Transaction> {
    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.kind == kind)
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    filtered
}

/// Spending or earnings grouped under one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// `None` groups transactions without a category or with an id that is not in the list
    pub category_id: Option<CategoryId>,
    pub total: Cents,
    pub count: i64,
}

/// Group one kind of transactions by category, largest total first.
/// Ties are broken by category id, with the unknown group last.
pub fn totals_by_category(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut groups: HashMap<Option<CategoryId>, (Cents, i64)> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        let key = transaction
            .category_id
            .and_then(find_category)
            .map(|c| c.id);
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(transaction.amount_cents);
        entry.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category_id, (total, count))| CategoryTotal {
            category_id,
            total,
            count,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| match (a.category_id, b.category_id) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
    });
    totals
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::NewTransaction;

    fn at(draft: NewTransaction, minutes: i64) -> Transaction {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        draft.record(1, base + Duration::minutes(minutes))
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(total_balance(&[]), 0);
        assert_eq!(total_income(&[]), 0);
        assert_eq!(total_expenses(&[]), 0);
    }

    #[test]
    fn test_totals_mixed() {
        let transactions = vec![
            at(NewTransaction::income(10000), 0),
            at(NewTransaction::expense(4000), 1),
            at(NewTransaction::expense(1500), 2),
            at(NewTransaction::income(250), 3),
        ];

        assert_eq!(total_income(&transactions), 10250);
        assert_eq!(total_expenses(&transactions), 5500);
        assert_eq!(total_balance(&transactions), 4750);
    }

    #[test]
    fn test_balance_is_income_minus_expenses() {
        let transactions: Vec<Transaction> = (0..20)
            .map(|i| {
                let draft = if i % 3 == 0 {
                    NewTransaction::income(i * 137)
                } else {
                    NewTransaction::expense(i * 59)
                };
                at(draft, i)
            })
            .collect();

        for end in 0..=transactions.len() {
            let slice = &transactions[..end];
            assert_eq!(
                total_balance(slice),
                total_income(slice) - total_expenses(slice)
            );
        }
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let transactions = vec![
            at(NewTransaction::income(Cents::MAX - 1), 0),
            at(NewTransaction::income(Cents::MAX - 1).with_category(4), 1),
            at(NewTransaction::expense(5).with_category(1), 2),
        ];

        assert_eq!(total_income(&transactions), Cents::MAX);
        assert_eq!(total_expenses(&transactions), 5);
        assert_eq!(total_balance(&transactions), Cents::MAX - 5);

        let totals = totals_by_category(&transactions, TransactionKind::Income);
        let sum = totals
            .iter()
            .fold(0, |sum: Cents, t| sum.saturating_add(t.total));
        assert_eq!(sum, Cents::MAX);
    }

    #[test]
    fn test_of_kind_newest_first() {
        let transactions = vec![
            at(NewTransaction::income(1), 5),
            at(NewTransaction::expense(2), 10),
            at(NewTransaction::income(3), 20),
            at(NewTransaction::income(4), 1),
        ];

        let income = of_kind_newest_first(&transactions, TransactionKind::Income);
        let amounts: Vec<Cents> = income.iter().map(|t| t.amount_cents).collect();
        assert_eq!(amounts, vec![3, 1, 4]);
        assert!(income.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_of_kind_ties_keep_insertion_order() {
        let transactions = vec![
            at(NewTransaction::expense(1), 0),
            at(NewTransaction::expense(2), 0),
            at(NewTransaction::expense(3), 0),
        ];

        let expenses = of_kind_newest_first(&transactions, TransactionKind::Expense);
        let amounts: Vec<Cents> = expenses.iter().map(|t| t.amount_cents).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
    }

    #[test]
    fn test_totals_by_category() {
        let transactions = vec![
            at(NewTransaction::expense(3000).with_category(1), 0),
            at(NewTransaction::expense(80000).with_category(2), 1),
            at(NewTransaction::expense(2000).with_category(1), 2),
            at(NewTransaction::expense(500), 3),
            at(NewTransaction::expense(700).with_category(42), 4),
            at(NewTransaction::income(90000).with_category(4), 5),
        ];

        let totals = totals_by_category(&transactions, TransactionKind::Expense);
        assert_eq!(
            totals,
            vec![
                CategoryTotal { category_id: Some(2), total: 80000, count: 1 },
                CategoryTotal { category_id: Some(1), total: 5000, count: 2 },
                CategoryTotal { category_id: None, total: 1200, count: 2 },
            ]
        );

        let sum: Cents = totals.iter().map(|t| t.total).sum();
        assert_eq!(sum, total_expenses(&transactions));
    }
}
