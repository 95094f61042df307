use serde::Serialize;

use super::TransactionKind;

pub type CategoryId = i64;

/// Fixed classification tag for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
    pub kind: TransactionKind,
    /// Icon name from the front end's icon set
    pub icon: &'static str,
    pub display_color: &'static str,
}

/// Name reported for category ids that are not in [`CATEGORIES`].
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

pub static CATEGORIES: &[Category] = &[
    Category {
        id: 1,
        name: "Groceries",
        kind: TransactionKind::Expense,
        icon: "cart",
        display_color: "#f59e0b",
    },
    Category {
        id: 2,
        name: "Rent",
        kind: TransactionKind::Expense,
        icon: "house",
        display_color: "#ef4444",
    },
    Category {
        id: 3,
        name: "Leisure",
        kind: TransactionKind::Expense,
        icon: "controller",
        display_color: "#8b5cf6",
    },
    Category {
        id: 4,
        name: "Salary",
        kind: TransactionKind::Income,
        icon: "briefcase",
        display_color: "#10b981",
    },
    Category {
        id: 5,
        name: "Other income",
        kind: TransactionKind::Income,
        icon: "plus-circle",
        display_color: "#06b6d4",
    },
];

/// Result of looking a category up by id.
///
/// A miss is not an error: it yields [`CategoryLookup::Unknown`], which only
/// guarantees a name. Callers must not expect a kind, icon or color from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLookup {
    Known(&'static Category),
    Unknown,
}

impl CategoryLookup {
    pub fn name(&self) -> &'static str {
        match self {
            CategoryLookup::Known(category) => category.name,
            CategoryLookup::Unknown => UNKNOWN_CATEGORY_NAME,
        }
    }

    pub fn category(&self) -> Option<&'static Category> {
        match self {
            CategoryLookup::Known(category) => Some(category),
            CategoryLookup::Unknown => None,
        }
    }
}

pub fn find_category(id: CategoryId) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn category_by_id(id: CategoryId) -> CategoryLookup {
    find_category(id).map_or(CategoryLookup::Unknown, CategoryLookup::Known)
}

/// Categories usable for the given kind, in list order.
pub fn categories_of_kind(kind: TransactionKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |c| c.kind == kind)
}
