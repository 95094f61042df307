use thiserror::Error;

use crate::domain::{CategoryId, Cents, TransactionKind, UserId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("No users configured")]
    EmptyRoster,

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Category '{category}' is for {category_kind} transactions, not {requested}")]
    CategoryKindMismatch {
        category: String,
        category_kind: TransactionKind,
        requested: TransactionKind,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(Cents),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
