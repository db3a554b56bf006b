// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Predictive search controller.
//!
//! Turns keystrokes into debounced suggest requests and panel updates:
//!
//! * short queries show recent and popular searches instead of fetching
//! * a query equal to the one last dispatched is not fetched again
//! * a response is only drawn if its query is still the current one
//! * fetch failures collapse the panel and are otherwise only logged

use crate::models::settings::SearchSettings;
use crate::services::debounce::Debouncer;
use crate::services::history::{HistoryError, HistoryStore, SearchHistory};
use crate::services::logging::redact_query;
use crate::services::markup::Node;
use crate::services::render::{search_page_path, PanelRenderer};
use crate::services::store::KeyValueStore;
use crate::services::suggest::SuggestClient;
use crate::services::surface::{PanelView, SearchSurface};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use url::Url;

/// Where the controller's panel currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Suggesting,
    Loading,
    ShowingResults,
    ShowingNoResults,
}

/// What a single `handle_search` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query too short; suggestion panel shown, nothing fetched
    Suggested,
    /// Same as the current query; nothing fetched
    Duplicate,
    /// Results rendered
    Rendered { results: usize },
    /// Fetch succeeded with nothing in any category
    NoResults,
    /// Fetch failed; panel hidden
    Failed,
    /// Response arrived after a newer query took over and was dropped
    Stale,
    /// Response arrived after an outside click collapsed the panel; kept for `on_focus`
    Dismissed,
}

/// Last rendered result panel, kept for re-opening on focus
#[derive(Debug, Clone)]
struct RenderedPanel {
    query: String,
    node: Node,
    phase: SearchPhase,
}

#[derive(Debug)]
struct ControllerState {
    phase: SearchPhase,
    /// Trimmed value of the input as last seen by `on_input`
    input: String,
    /// Query of the last accepted dispatch
    current_query: Option<String>,
    rendered: Option<RenderedPanel>,
}

struct Shared<C, S, P> {
    settings: SearchSettings,
    client: C,
    surface: P,
    renderer: PanelRenderer,
    history_store: HistoryStore<S>,
    history: Mutex<SearchHistory>,
    state: Mutex<ControllerState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C, S, P> Shared<C, S, P>
where
    C: SuggestClient,
    S: KeyValueStore,
    P: SearchSurface,
{
    fn is_short(&self, query: &str) -> bool {
        query.chars().count() < self.settings.min_query_length.max(1)
    }

    async fn handle_search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();

        if self.is_short(query) {
            self.show_suggestions();
            return SearchOutcome::Suggested;
        }

        {
            let mut state = lock(&self.state);
            if state.current_query.as_deref() == Some(query) {
                debug!(query = %redact_query(query), "Skipping duplicate query");
                return SearchOutcome::Duplicate;
            }
            state.current_query = Some(query.to_string());
            state.phase = SearchPhase::Loading;
            self.surface
                .present(PanelView::Loading(self.renderer.loading(query)));
        }

        let result = self.client.suggest(query).await;

        let mut state = lock(&self.state);
        if state.current_query.as_deref() != Some(query) {
            debug!(query = %redact_query(query), "Dropping stale suggest response");
            return SearchOutcome::Stale;
        }

        // An outside click while loading leaves the marker but collapses the panel
        let dismissed = state.phase != SearchPhase::Loading;

        match result {
            Ok(results) => {
                let node = self.renderer.results(&results, query);
                let (phase, outcome) = if results.is_empty() {
                    (SearchPhase::ShowingNoResults, SearchOutcome::NoResults)
                } else {
                    (
                        SearchPhase::ShowingResults,
                        SearchOutcome::Rendered {
                            results: results.len(),
                        },
                    )
                };
                state.rendered = Some(RenderedPanel {
                    query: query.to_string(),
                    node: node.clone(),
                    phase,
                });
                if dismissed {
                    debug!(query = %redact_query(query), "Panel dismissed while loading, results kept");
                    return SearchOutcome::Dismissed;
                }
                state.phase = phase;
                self.surface.present(PanelView::Results(node));
                info!(query = %redact_query(query), results = results.len(), "Predictive search rendered");
                outcome
            }
            Err(e) => {
                warn!(query = %redact_query(query), error = %e, "Predictive search failed");
                state.phase = SearchPhase::Idle;
                if !dismissed {
                    self.surface.present(PanelView::Hidden);
                }
                SearchOutcome::Failed
            }
        }
    }

    fn show_suggestions(&self) {
        let mut state = lock(&self.state);
        state.current_query = None;
        state.rendered = None;
        state.phase = SearchPhase::Suggesting;

        let node = {
            let history = lock(&self.history);
            self.renderer
                .suggestions(history.entries(), &self.settings.popular_searches)
        };
        self.surface.present(PanelView::Suggestions(node));
    }
}

/// Predictive search over a storefront suggest endpoint.
///
/// Wire the page's events to `on_input`, `on_submit`, `on_escape`,
/// `on_outside_click` and `on_focus`; the controller draws into the
/// [`SearchSurface`] it was constructed with. Event methods must be called
/// from within a Tokio runtime.
pub struct PredictiveSearch<C, S, P> {
    shared: Arc<Shared<C, S, P>>,
    debouncer: Debouncer,
}

impl<C, S, P> PredictiveSearch<C, S, P>
where
    C: SuggestClient + 'static,
    S: KeyValueStore + 'static,
    P: SearchSurface + 'static,
{
    /// Create a controller, loading recent searches from `store`
    pub fn new(settings: SearchSettings, client: C, store: S, surface: P) -> Result<Self, HistoryError> {
        let history_store = HistoryStore::new(store, settings.history_key.clone());
        let history = history_store.load(settings.history_limit)?;
        debug!(entries = history.len(), "Loaded search history");

        let shared = Shared {
            renderer: PanelRenderer::from_settings(&settings),
            client,
            surface,
            history_store,
            history: Mutex::new(history),
            state: Mutex::new(ControllerState {
                phase: SearchPhase::Idle,
                input: String::new(),
                current_query: None,
                rendered: None,
            }),
            settings,
        };
        let debouncer = Debouncer::new(shared.settings.debounce);

        Ok(Self {
            shared: Arc::new(shared),
            debouncer,
        })
    }

    /// Input changed: restart the debounce timer for the trimmed value
    pub fn on_input(&self, text: &str) {
        let query = text.trim().to_string();
        lock(&self.shared.state).input = query.clone();

        let shared = self.shared.clone();
        self.debouncer.schedule(move || {
            tokio::spawn(async move {
                shared.handle_search(&query).await;
            });
        });
    }

    /// Run a search immediately, bypassing the debounce timer
    pub async fn handle_search(&self, query: &str) -> SearchOutcome {
        self.shared.handle_search(query).await
    }

    /// Search form submitted: record the query and return the full search page URL.
    ///
    /// Blank queries are not recorded and yield `None`.
    pub fn on_submit(&self, query: &str) -> Result<Option<Url>, HistoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        self.debouncer.cancel();
        self.add_to_history(query)?;

        Ok(self
            .shared
            .settings
            .storefront_path(&search_page_path(query))
            .ok())
    }

    /// Move `query` to the front of recent searches and persist immediately
    pub fn add_to_history(&self, query: &str) -> Result<(), HistoryError> {
        let mut history = lock(&self.shared.history);
        history.add(query);
        self.shared.history_store.save(&history)?;
        debug!(query = %redact_query(query), entries = history.len(), "Recorded search");
        Ok(())
    }

    /// Escape pressed: hide the panel and forget the current query
    pub fn on_escape(&self) {
        self.debouncer.cancel();
        let mut state = lock(&self.shared.state);
        state.current_query = None;
        state.phase = SearchPhase::Idle;
        self.shared.surface.present(PanelView::Hidden);
    }

    /// Pointer interaction outside the search container: collapse the panel only
    pub fn on_outside_click(&self) {
        let mut state = lock(&self.shared.state);
        if state.phase == SearchPhase::Idle {
            return;
        }
        state.phase = SearchPhase::Idle;
        self.shared.surface.present(PanelView::Hidden);
    }

    /// Input focused: reopen suggestions for a short input, or the last
    /// result panel if it still matches the input
    pub fn on_focus(&self) {
        let mut state = lock(&self.shared.state);
        if self.shared.is_short(&state.input) {
            drop(state);
            self.shared.show_suggestions();
            return;
        }

        let cached = state
            .rendered
            .as_ref()
            .filter(|r| r.query == state.input && state.current_query.as_deref() == Some(&r.query))
            .map(|r| (r.node.clone(), r.phase));
        if let Some((node, phase)) = cached {
            state.phase = phase;
            self.shared.surface.present(PanelView::Results(node));
        }
    }

    /// Empty recent searches and remove them from the store
    pub fn clear_history(&self) -> Result<(), HistoryError> {
        let mut history = lock(&self.shared.history);
        self.shared.history_store.clear()?;
        history.clear();
        Ok(())
    }

    /// Snapshot of recent searches, most recent first
    pub fn recent_searches(&self) -> Vec<String> {
        lock(&self.shared.history).entries().to_vec()
    }

    pub fn phase(&self) -> SearchPhase {
        lock(&self.shared.state).phase
    }

    pub fn current_query(&self) -> Option<String> {
        lock(&self.shared.state).current_query.clone()
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.shared.settings
    }
}
