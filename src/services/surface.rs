// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::markup::Node;
use std::sync::{Mutex, PoisonError};

/// What the results container should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Container collapsed
    Hidden,
    /// Recent and popular searches
    Suggestions(Node),
    /// Fetch in flight
    Loading(Node),
    /// Rendered results, or the no-results placeholder
    Results(Node),
}

impl PanelView {
    pub fn is_hidden(&self) -> bool {
        matches!(self, PanelView::Hidden)
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            PanelView::Hidden => None,
            PanelView::Suggestions(node) | PanelView::Loading(node) | PanelView::Results(node) => {
                Some(node)
            }
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PanelView::Hidden => "hidden",
            PanelView::Suggestions(_) => "suggestions",
            PanelView::Loading(_) => "loading",
            PanelView::Results(_) => "results",
        }
    }
}

/// The page region the controller draws into
pub trait SearchSurface: Send + Sync {
    /// Replace the container's contents with `view`
    fn present(&self, view: PanelView);
}

/// Surface that keeps every view it was given, newest last
#[derive(Debug, Default)]
pub struct MemorySurface {
    views: Mutex<Vec<PanelView>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view currently on display (`Hidden` before anything was presented)
    pub fn current(&self) -> PanelView {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or(PanelView::Hidden)
    }

    /// HTML of the current view, empty when hidden
    pub fn current_html(&self) -> String {
        self.current().node().map(Node::to_html).unwrap_or_default()
    }

    pub fn history(&self) -> Vec<PanelView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SearchSurface for MemorySurface {
    fn present(&self, view: PanelView) {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view);
    }
}

impl<T: SearchSurface + ?Sized> SearchSurface for std::sync::Arc<T> {
    fn present(&self, view: PanelView) {
        (**self).present(view)
    }
}
