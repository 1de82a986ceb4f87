// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance between two coordinates.

use geo::Point;

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers, rounded to two decimal places.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    // Clamp guards against rounding pushing `a` just outside [0, 1].
    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    round_to_hundredths(EARTH_RADIUS_KM * c)
}

/// Haversine distance between two `(x = longitude, y = latitude)` points.
pub fn distance_between(from: Point<f64>, to: Point<f64>) -> f64 {
    haversine_km(from.y(), from.x(), to.y(), to.x())
}

fn round_to_hundredths(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
