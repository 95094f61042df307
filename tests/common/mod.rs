// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use pocketbook::application::{Tracker, TransactionLedger, UserDirectory};
use pocketbook::domain::User;
use pocketbook::storage::Repository;
use tempfile::TempDir;

/// Helper to open a repository over a temporary database
pub async fn test_repo() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let repo = Repository::open(&db_path(&temp_dir)).await?;
    Ok((repo, temp_dir))
}

/// Helper to open a fully initialized tracker over a temporary database
pub async fn test_tracker() -> Result<(Tracker, TempDir)> {
    let temp_dir = TempDir::new()?;
    let tracker = Tracker::open(&db_path(&temp_dir)).await?;
    Ok((tracker, temp_dir))
}

/// Reopen the tracker stored in `temp_dir`, as a new process would.
pub async fn reopen(temp_dir: &TempDir) -> Result<Tracker> {
    Ok(Tracker::open(&db_path(temp_dir)).await?)
}

/// Initialize both stores over `repo` with an explicit roster.
pub async fn tracker_with_roster(repo: &Repository, users: Vec<User>) -> Result<Tracker> {
    let directory = UserDirectory::with_roster(repo.clone(), users);
    let ledger = TransactionLedger::new(repo.clone());
    Ok(Tracker::init(directory, ledger).await?)
}

/// Two-user roster used across scenarios
pub fn roster_ab() -> Vec<User> {
    vec![User::new(1, "A", "#111111"), User::new(2, "B", "#222222")]
}

pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir
        .path()
        .join("test.db")
        .to_str()
        .expect("temp path is valid UTF-8")
        .to_string()
}
