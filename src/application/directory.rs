use tracing::{info, warn};

use crate::domain::{User, UserId};
use crate::storage::{Repository, CURRENT_USER_KEY};

use super::AppError;

/// Roster of local users plus the one currently selected.
///
/// The roster is fixed at construction. Only the current selection is
/// persisted, as a stringified integer under [`CURRENT_USER_KEY`].
pub struct UserDirectory {
    repo: Repository,
    users: Vec<User>,
    current_user_id: UserId,
    recovered_from_corrupt_state: bool,
}

impl UserDirectory {
    /// Directory over the compiled-in roster, with the first user selected.
    pub fn new(repo: Repository) -> Self {
        Self::with_roster(repo, User::seed_roster())
    }

    /// Directory over an explicit roster. The first user is the default selection.
    pub fn with_roster(repo: Repository, users: Vec<User>) -> Self {
        let current_user_id = users.first().map(|u| u.id).unwrap_or_default();
        Self {
            repo,
            users,
            current_user_id,
            recovered_from_corrupt_state: false,
        }
    }

    /// Restore the persisted current-user selection.
    ///
    /// A missing or blank value keeps the default. A value that is not an integer also
    /// keeps the default, with a warning, and is reported by
    /// [`recovered_from_corrupt_state`](Self::recovered_from_corrupt_state).
    pub async fn init(&mut self) -> Result<(), AppError> {
        info!(users = self.users.len(), "Initializing user directory");

        let stored = self.repo.get(CURRENT_USER_KEY).await?;
        if let Some(raw) = stored.filter(|raw| !raw.trim().is_empty()) {
            match raw.trim().parse::<UserId>() {
                Ok(id) => self.current_user_id = id,
                Err(e) => {
                    warn!(
                        value = %raw,
                        error = %e,
                        default = self.current_user_id,
                        "Stored current user id is not an integer, keeping default"
                    );
                    self.recovered_from_corrupt_state = true;
                }
            }
        }

        info!(current_user_id = self.current_user_id, "User directory initialized");
        Ok(())
    }

    /// Full roster, in insertion order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Raw selected id. May name a user outside the roster.
    pub fn current_user_id(&self) -> UserId {
        self.current_user_id
    }

    /// The selected user, falling back to the first user when the selected id
    /// is not in the roster. `None` only when the roster is empty.
    pub fn current_user(&self) -> Option<&User> {
        self.find_user(self.current_user_id)
            .or_else(|| self.users.first())
    }

    /// Select a user and persist the choice. A failed write keeps the previous
    /// selection.
    ///
    /// The id is not checked against the roster; reads resolve a dangling id
    /// through [`current_user`](Self::current_user).
    pub async fn set_current_user(&mut self, id: UserId) -> Result<(), AppError> {
        let previous = std::mem::replace(&mut self.current_user_id, id);
        if let Err(e) = self.repo.set(CURRENT_USER_KEY, &id.to_string()).await {
            self.current_user_id = previous;
            return Err(e.into());
        }
        info!(current_user_id = id, "Current user changed");
        Ok(())
    }

    /// True when init found a stored selection it could not parse.
    pub fn recovered_from_corrupt_state(&self) -> bool {
        self.recovered_from_corrupt_state
    }
}
