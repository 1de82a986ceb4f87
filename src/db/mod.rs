// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: the `UserStore` interface and its backends.

pub mod firestore;
pub mod json_file;
pub mod memory;

pub use firestore::FirestoreStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::UserRecord;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Keyed storage for user records.
///
/// Every failure is reported as `AppError::Database` and is never retried.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every stored record, in stable scan order.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Look up a single record by id.
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError>;

    /// Replace the record with the same id, or append it if the id is new.
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError>;
}
