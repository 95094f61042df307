use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{TransactionLedger, UserDirectory};
use crate::domain::{format_cents, Transaction, User, UserId};

/// Format version written into snapshots
pub const SNAPSHOT_VERSION: &str = "1";

/// Everything the tracker knows, for backups or external tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub current_user_id: UserId,
    pub transactions: BTreeMap<UserId, Vec<Transaction>>,
}

/// Writes ledger data to CSV or JSON.
pub struct Exporter<'a> {
    directory: &'a UserDirectory,
    ledger: &'a TransactionLedger,
}

impl<'a> Exporter<'a> {
    pub fn new(directory: &'a UserDirectory, ledger: &'a TransactionLedger) -> Self {
        Self { directory, ledger }
    }

    /// Export one user's transactions as CSV, in insertion order.
    /// Returns the number of rows written.
    pub fn export_transactions_csv<W: Write>(&self, user_id: UserId, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "created_at",
            "kind",
            "amount",
            "category",
            "description",
        ])?;

        let transactions = self.ledger.transactions(user_id);
        for transaction in transactions {
            let category = transaction
                .category_id
                .map(|id| self.ledger.category_by_id(id).name())
                .unwrap_or_default();

            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.created_at.to_rfc3339(),
                transaction.kind.to_string(),
                format_cents(transaction.amount_cents),
                category.to_string(),
                transaction.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: Utc::now(),
            users: self.directory.users().to_vec(),
            current_user_id: self.directory.current_user_id(),
            transactions: self.ledger.all().clone(),
        }
    }

    /// Export the whole ledger as pretty-printed JSON.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
