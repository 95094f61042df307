use tracing::info;

use crate::storage::Repository;

use super::{AppError, TransactionLedger, UserDirectory};

/// Both stores, opened over one database and initialized in dependency order.
///
/// Front ends build one `Tracker` per process and borrow its stores.
pub struct Tracker {
    pub directory: UserDirectory,
    pub ledger: TransactionLedger,
}

impl Tracker {
    /// Open (or create) the database at `database_path` with the compiled-in roster.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::open(database_path).await?;
        info!(database = database_path, "Database opened");
        Self::init(UserDirectory::new(repo.clone()), TransactionLedger::new(repo)).await
    }

    /// Initialize the directory, then the ledger, which seeds lists from the roster.
    pub async fn init(
        mut directory: UserDirectory,
        mut ledger: TransactionLedger,
    ) -> Result<Self, AppError> {
        directory.init().await?;
        ledger.init(&directory).await?;
        Ok(Self { directory, ledger })
    }
}
