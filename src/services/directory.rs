// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory with proximity search.

use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::models::{Location, NearbyUser, UserRecord};
use crate::services::distance::distance_between;
use crate::time_utils::now_rfc3339;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Search radius used when the caller does not give one.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 5.0;

/// Per-user locks serializing read-modify-write sequences.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Registers users, records their state and answers nearby queries.
///
/// Every mutation holds the per-user lock for the whole
/// read-modify-write, so concurrent writers to one id are applied in turn
/// rather than overwriting each other. Reads take no lock.
#[derive(Clone)]
pub struct ProximityDirectory {
    store: Arc<dyn UserStore>,
    locks: UserLocks,
}

impl ProximityDirectory {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn user_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry for `id` unless another task still holds a handle.
    fn release_lock(&self, id: &str) {
        self.locks.remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Register a new user or overwrite an existing user's names.
    ///
    /// Names are replaced wholesale: a name left out of the call is cleared.
    /// Location, contact flag and `created_at` of an existing user are kept.
    pub async fn upsert_user(
        &self,
        id: &str,
        display_name: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<UserRecord> {
        let lock = self.user_lock(id);
        let guard = lock.lock().await;

        let now = now_rfc3339();
        let result = match self.store.get_user(id).await {
            Ok(Some(mut existing)) => {
                existing.display_name = display_name;
                existing.first_name = first_name;
                existing.last_name = last_name;
                existing.last_active_at = now;
                tracing::info!(user_id = id, "Updated user profile");
                self.store.upsert_user(&existing).await.map(|()| existing)
            }
            Ok(None) => {
                tracing::info!(user_id = id, "Registered new user");
                let user =
                    UserRecord::new(id.to_string(), display_name, first_name, last_name, now);
                self.store.upsert_user(&user).await.map(|()| user)
            }
            Err(err) => Err(err),
        };

        if result.is_err() {
            drop(guard);
            drop(lock);
            self.release_lock(id);
        }
        result
    }

    /// Overwrite a user's location.
    pub async fn update_location(&self, id: &str, latitude: f64, longitude: f64) -> Result<()> {
        self.modify_user(id, |user| {
            user.location = Location::new(latitude, longitude);
        })
        .await?;

        tracing::info!(user_id = id, "Updated user location");
        Ok(())
    }

    /// Flip the user's contact flag and return its new value.
    pub async fn toggle_contact(&self, id: &str) -> Result<bool> {
        let user = self
            .modify_user(id, |user| {
                user.wants_contact = !user.wants_contact;
            })
            .await?;

        tracing::info!(
            user_id = id,
            wants_contact = user.wants_contact,
            "Toggled contact flag"
        );
        Ok(user.wants_contact)
    }

    /// Available users within `max_distance_km` of `id`, nearest first.
    ///
    /// Uses [`DEFAULT_MAX_DISTANCE_KM`] when no radius is given.
    pub async fn find_nearby(
        &self,
        id: &str,
        max_distance_km: Option<f64>,
    ) -> Result<Vec<NearbyUser>> {
        let max_distance_km = max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
        let users = self.store.list_users().await?;

        let requester = users
            .iter()
            .find(|user| user.id == id)
            .ok_or_else(|| AppError::user_not_found(id))?;

        let nearby = rank_nearby(requester, &users, max_distance_km);
        tracing::debug!(
            user_id = id,
            max_distance_km,
            scanned = users.len(),
            found = nearby.len(),
            "Nearby search complete"
        );
        Ok(nearby)
    }

    /// Every stored user, unfiltered.
    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        self.store.list_users().await
    }

    /// Apply `f` to an existing user, refresh `last_active_at` and store it.
    async fn modify_user<F>(&self, id: &str, f: F) -> Result<UserRecord>
    where
        F: FnOnce(&mut UserRecord),
    {
        let lock = self.user_lock(id);
        let guard = lock.lock().await;

        let found = match self.store.get_user(id).await {
            Ok(found) => found,
            Err(err) => {
                drop(guard);
                drop(lock);
                self.release_lock(id);
                return Err(err);
            }
        };
        let Some(mut user) = found else {
            // Unknown ids must not leave entries behind in the lock map.
            drop(guard);
            drop(lock);
            self.release_lock(id);
            return Err(AppError::user_not_found(id));
        };

        f(&mut user);
        user.last_active_at = now_rfc3339();

        self.store.upsert_user(&user).await?;
        Ok(user)
    }
}

/// Candidates other than `requester` that want contact and lie within
/// `max_distance_km`, sorted by ascending distance.
///
/// The sort is stable: equal distances keep their scan order.
pub fn rank_nearby(
    requester: &UserRecord,
    candidates: &[UserRecord],
    max_distance_km: f64,
) -> Vec<NearbyUser> {
    let origin: geo::Point<f64> = requester.location.into();

    let mut nearby: Vec<NearbyUser> = candidates
        .iter()
        .filter(|candidate| candidate.id != requester.id && candidate.wants_contact)
        .filter_map(|candidate| {
            let distance_km = distance_between(origin, candidate.location.into());
            (distance_km <= max_distance_km).then(|| NearbyUser {
                id: candidate.id.clone(),
                display_name: candidate.display_name.clone(),
                first_name: candidate.first_name.clone(),
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby
}
