// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nearby-Connect: find people close by who want to meet right now
//!
//! This crate provides the backend API where users register, report their
//! location, flag themselves as available, and look up available peers
//! within a radius.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ProximityDirectory;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub directory: ProximityDirectory,
}
