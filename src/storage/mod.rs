mod repository;

pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Key holding the JSON-serialized ledger (user id -> transactions)
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Key holding the raw text of a ledger that could not be parsed at init
pub const CORRUPT_TRANSACTIONS_KEY: &str = "transactions.corrupt";

/// Key holding the stringified id of the current user
pub const CURRENT_USER_KEY: &str = "currentUserId";
