// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON document store on local disk.
//!
//! The whole collection lives in one pretty-printed document of the form
//! `{"users": [...]}`. Each write reads the document, mutates it and writes
//! it back in full through a temporary file and a rename, so readers never
//! observe a partially written file.

use super::UserStore;
use crate::error::AppError;
use crate::models::UserRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// File-backed user store.
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes every read-modify-write of the file.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the database at `path`, creating an empty one if it does not exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|e| store.io_error("stat", e))?;
        if !exists {
            store.write_database(&Database::default()).await?;
            tracing::info!(path = %store.path.display(), "Database file created");
        }

        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, op: &str, err: std::io::Error) -> AppError {
        AppError::Database(format!(
            "Failed to {} {}: {}",
            op,
            self.path.display(),
            err
        ))
    }

    async fn read_database(&self) -> Result<Database, AppError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error("read", e))?;
        serde_json::from_str(&data).map_err(|e| {
            AppError::Database(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn write_database(&self, db: &Database) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(db)
            .map_err(|e| AppError::Database(format!("Failed to serialize users: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data)
            .await
            .map_err(|e| self.io_error("write", e))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(self.io_error("replace", e));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_database().await?.users)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_database()
            .await?
            .users
            .into_iter()
            .find(|user| user.id == id))
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut db = self.read_database().await?;

        match db.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => db.users.push(user.clone()),
        }

        self.write_database(&db).await
    }
}
