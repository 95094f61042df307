use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A local person whose transactions are tracked separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// CSS-style hex color used by front ends to tell users apart
    pub display_color: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, display_color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            display_color: display_color.into(),
        }
    }

    /// The roster compiled into the binary. There is no runtime user creation.
    pub fn seed_roster() -> Vec<User> {
        vec![
            User::new(1, "Cindy", "#4f46e5"),
            User::new(2, "Clémence", "#10b981"),
        ]
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
