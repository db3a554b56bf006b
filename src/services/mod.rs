// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod controller;
pub mod debounce;
pub mod history;
pub mod logging;
pub mod markup;
pub mod render;
pub mod store;
pub mod suggest;
pub mod surface;

pub use controller::{PredictiveSearch, SearchOutcome, SearchPhase};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use suggest::{StorefrontSuggestClient, SuggestClient};
pub use surface::{MemorySurface, PanelView, SearchSurface};
