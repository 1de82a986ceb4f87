// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile as persisted by every store backend.
///
/// Field aliases accept documents written by the legacy JSON database
/// (`telegramId`, `username`, `needsCigarette`, `lastActive`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserRecord {
    /// External identity key (also used as document ID)
    #[serde(alias = "telegramId", deserialize_with = "deserialize_user_id")]
    pub id: String,
    /// Public handle shown to other users
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "username")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Last reported position, `(0, 0)` until the first update
    #[serde(default)]
    pub location: Location,
    /// Whether the user currently wants to be found by nearby peers
    #[serde(default, alias = "needsCigarette")]
    pub wants_contact: bool,
    /// Refreshed on every mutating operation (ISO 8601)
    #[serde(alias = "lastActive")]
    pub last_active_at: String,
    /// When the user first registered (ISO 8601)
    pub created_at: String,
}

impl UserRecord {
    /// A freshly registered user: default location, not seeking contact.
    pub fn new(
        id: String,
        display_name: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        now: String,
    ) -> Self {
        Self {
            id,
            display_name,
            first_name,
            last_name,
            location: Location::default(),
            wants_contact: false,
            last_active_at: now.clone(),
            created_at: now,
        }
    }
}

/// GeoJSON geometry tag. Only points are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum GeometryType {
    #[default]
    Point,
}

/// A GeoJSON-style point: `{"type": "Point", "coordinates": [lon, lat]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    #[serde(rename = "type", default)]
    pub kind: GeometryType,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<Location> for geo::Point<f64> {
    fn from(location: Location) -> Self {
        geo::Point::new(location.longitude(), location.latitude())
    }
}

/// Public projection of a nearby candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NearbyUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Great-circle distance from the requester, rounded to 0.01 km
    pub distance_km: f64,
}

/// Accept a user id given either as a JSON string or as a JSON integer.
///
/// Messenger platforms hand out numeric ids; they are stored as strings.
pub fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}
