// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process user store.

use super::UserStore;
use crate::error::AppError;
use crate::models::UserRecord;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// User records held in a `Vec`, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    fn users(&self) -> Result<MutexGuard<'_, Vec<UserRecord>>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::Database("user store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        Ok(self.users()?.clone())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users()?.iter().find(|user| user.id == id).cloned())
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        let mut users = self.users()?;
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserRecord {
        UserRecord::new(id.to_string(), None, None, None, "now".to_string())
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = MemoryStore::with_users(vec![user("a"), user("b")]);

        let mut updated = user("a");
        updated.wants_contact = true;
        store.upsert_user(&updated).await.unwrap();
        store.upsert_user(&user("c")).await.unwrap();

        let ids: Vec<String> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(store.get_user("a").await.unwrap().unwrap().wants_contact);
        assert!(store.get_user("zzz").await.unwrap().is_none());
    }
}
