use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{
    category_by_id, of_kind_newest_first, total_balance, total_expenses, total_income,
    totals_by_category, CategoryId, CategoryLookup, Cents, NewTransaction, Transaction,
    TransactionId, TransactionKind, UserId, MAX_AMOUNT_CENTS,
};
use crate::storage::{Repository, Stored, CORRUPT_TRANSACTIONS_KEY, TRANSACTIONS_KEY};

use super::{AppError, CategoryReport, LedgerSummary, UserDirectory};

/// Per-user transaction lists, persisted as one JSON document.
///
/// Every mutation rewrites the whole document under [`TRANSACTIONS_KEY`]
/// before returning. If that write fails the in-memory change is undone, so
/// memory never runs ahead of storage. Read operations never touch storage.
pub struct TransactionLedger {
    repo: Repository,
    transactions: BTreeMap<UserId, Vec<Transaction>>,
    recovered_from_corrupt_state: bool,
}

impl TransactionLedger {
    /// Empty, uninitialized ledger. Call [`init`](Self::init) to restore state.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            transactions: BTreeMap::new(),
            recovered_from_corrupt_state: false,
        }
    }

    /// Restore the persisted ledger and make sure every user in the directory
    /// has a list. Persists once at the end.
    ///
    /// An unparseable document is replaced by an empty ledger. Its raw text is
    /// copied to [`CORRUPT_TRANSACTIONS_KEY`] first so nothing is lost.
    pub async fn init(&mut self, directory: &UserDirectory) -> Result<(), AppError> {
        info!("Initializing transaction ledger");

        self.transactions = match self.repo.load_json(TRANSACTIONS_KEY).await? {
            Stored::Value(transactions) => transactions,
            Stored::Missing => BTreeMap::new(),
            Stored::Corrupt { raw, reason } => {
                warn!(
                    error = %reason,
                    backup_key = CORRUPT_TRANSACTIONS_KEY,
                    "Stored ledger could not be parsed, starting from an empty ledger"
                );
                self.repo.set(CORRUPT_TRANSACTIONS_KEY, &raw).await?;
                self.recovered_from_corrupt_state = true;
                BTreeMap::new()
            }
        };

        for user in directory.users() {
            let list = self.transactions.entry(user.id).or_default();
            if list.is_empty() {
                debug!(user_id = user.id, user = %user.name, "Transaction list ready");
            } else {
                debug!(
                    user_id = user.id,
                    user = %user.name,
                    count = list.len(),
                    "Existing transactions restored"
                );
            }
        }

        self.persist().await?;
        info!(users = self.transactions.len(), "Transaction ledger initialized");
        Ok(())
    }

    /// Make sure `user_id` has a list. Persists only if one was created.
    pub async fn init_user_transactions(&mut self, user_id: UserId) -> Result<(), AppError> {
        if self.transactions.contains_key(&user_id) {
            return Ok(());
        }
        self.transactions.insert(user_id, Vec::new());
        if let Err(e) = self.persist().await {
            self.transactions.remove(&user_id);
            return Err(e);
        }
        Ok(())
    }

    /// The user's transactions in insertion order. Unknown users get an empty slice.
    pub fn transactions(&self, user_id: UserId) -> &[Transaction] {
        self.transactions
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ids of every user that has a list, ascending.
    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.transactions.keys().copied()
    }

    /// Whole ledger, keyed by user id.
    pub fn all(&self) -> &BTreeMap<UserId, Vec<Transaction>> {
        &self.transactions
    }

    /// Record a transaction for `user_id`, assigning its id and creation time.
    ///
    /// Ids are random UUIDs, so two additions in the same instant never collide.
    /// Amounts must lie in `0..=MAX_AMOUNT_CENTS`.
    pub async fn add_transaction(
        &mut self,
        user_id: UserId,
        draft: NewTransaction,
    ) -> Result<Transaction, AppError> {
        if !(0..=MAX_AMOUNT_CENTS).contains(&draft.amount_cents) {
            return Err(AppError::InvalidAmount(draft.amount_cents));
        }

        let transaction = draft.record(user_id, Utc::now());
        let created_list = !self.transactions.contains_key(&user_id);
        self.transactions
            .entry(user_id)
            .or_default()
            .push(transaction.clone());

        if let Err(e) = self.persist().await {
            if created_list {
                self.transactions.remove(&user_id);
            } else if let Some(list) = self.transactions.get_mut(&user_id) {
                list.pop();
            }
            return Err(e);
        }

        info!(
            user_id,
            id = %transaction.id,
            kind = %transaction.kind,
            amount_cents = transaction.amount_cents,
            "Transaction added"
        );
        Ok(transaction)
    }

    /// Remove a transaction. Returns whether anything was removed; an unknown
    /// user or id is a no-op, not an error.
    pub async fn delete_transaction(
        &mut self,
        user_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<bool, AppError> {
        let Some(list) = self.transactions.get_mut(&user_id) else {
            return Ok(false);
        };

        let removed = list
            .iter()
            .position(|t| t.id == transaction_id)
            .map(|index| (index, list.remove(index)));

        if let Err(e) = self.persist().await {
            if let (Some((index, transaction)), Some(list)) =
                (removed, self.transactions.get_mut(&user_id))
            {
                list.insert(index, transaction);
            }
            return Err(e);
        }

        if removed.is_some() {
            info!(user_id, id = %transaction_id, "Transaction deleted");
        }
        Ok(removed.is_some())
    }

    pub fn total_balance(&self, user_id: UserId) -> Cents {
        total_balance(self.transactions(user_id))
    }

    pub fn total_income(&self, user_id: UserId) -> Cents {
        total_income(self.transactions(user_id))
    }

    pub fn total_expenses(&self, user_id: UserId) -> Cents {
        total_expenses(self.transactions(user_id))
    }

    /// One kind of transactions, most recent first. Ties keep insertion order.
    pub fn transactions_by_kind(&self, user_id: UserId, kind: TransactionKind) -> Vec<Transaction> {
        of_kind_newest_first(self.transactions(user_id), kind)
    }

    /// Look a category up. A miss yields the "Unknown" sentinel.
    pub fn category_by_id(&self, category_id: CategoryId) -> CategoryLookup {
        category_by_id(category_id)
    }

    /// Income, expenses and balance for one user.
    pub fn summary(&self, user_id: UserId) -> LedgerSummary {
        let transactions = self.transactions(user_id);
        LedgerSummary {
            user_id,
            total_income: total_income(transactions),
            total_expenses: total_expenses(transactions),
            balance: total_balance(transactions),
            transaction_count: transactions.len(),
        }
    }

    /// Per-category totals for one kind of the user's transactions.
    pub fn category_breakdown(&self, user_id: UserId, kind: TransactionKind) -> CategoryReport {
        CategoryReport::from_totals(
            user_id,
            kind,
            totals_by_category(self.transactions(user_id), kind),
        )
    }

    /// True when init found a stored ledger it could not parse.
    pub fn recovered_from_corrupt_state(&self) -> bool {
        self.recovered_from_corrupt_state
    }

    async fn persist(&self) -> Result<(), AppError> {
        let json = serde_json::to_string(&self.transactions)?;
        self.repo.set(TRANSACTIONS_KEY, &json).await?;
        Ok(())
    }
}
