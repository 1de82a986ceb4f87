// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration, location, availability and nearby-search routes.

use crate::error::Result;
use crate::models::user::deserialize_user_id;
use crate::models::{NearbyUser, UserRecord};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(register_user).get(list_users))
        .route("/api/users/{id}/location", post(update_location))
        .route("/api/users/{id}/toggle-contact", post(toggle_contact))
        .route("/api/users/{id}/nearby", get(find_nearby))
}

// ─── Registration ────────────────────────────────────────────

/// Register-or-update request body.
///
/// Names that are left out are cleared on an existing user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(alias = "telegramId", deserialize_with = "deserialize_user_id")]
    pub id: String,
    #[serde(default, alias = "username")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Create a user on first sight, otherwise overwrite their names.
async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<Json<UserRecord>> {
    let user = state
        .directory
        .upsert_user(&req.id, req.display_name, req.first_name, req.last_name)
        .await?;
    Ok(Json(user))
}

/// Dump every stored user (debugging aid).
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserRecord>>> {
    Ok(Json(state.directory.list_all().await?))
}

// ─── Location ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<SuccessResponse>> {
    state
        .directory
        .update_location(&id, req.latitude, req.longitude)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ─── Contact Flag ────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleContactResponse {
    pub wants_contact: bool,
}

async fn toggle_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ToggleContactResponse>> {
    let wants_contact = state.directory.toggle_contact(&id).await?;
    Ok(Json(ToggleContactResponse { wants_contact }))
}

// ─── Nearby Search ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NearbyQuery {
    /// Search radius in kilometers
    distance: Option<f64>,
}

async fn find_nearby(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyUser>>> {
    let nearby = state.directory.find_nearby(&id, query.distance).await?;
    Ok(Json(nearby))
}
