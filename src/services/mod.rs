// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod directory;
pub mod distance;

pub use directory::{rank_nearby, ProximityDirectory, DEFAULT_MAX_DISTANCE_KM};
pub use distance::haversine_km;
