// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Predictive search for storefronts: debounced suggest requests, typed
//! result rendering and a persisted list of recent searches.

pub mod models;
pub mod services;

/// Crate version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `STOREFRONT_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("STOREFRONT_VERSION");
