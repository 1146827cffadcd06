//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.
//! The selections live for the whole session and survive page switches.

use crate::selection::MapSelection;
use ortb_core::filter::FilterSpec;
use ortb_core::scale::Scale;
use ortb_db::models::DatasetSummary;
use ortb_db::Database;
use ortb_geo::index::GeometryIndex;
use dioxus::prelude::*;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Dashboard pages, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Maps,
    RawData,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Maps, Page::RawData, Page::About];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "🏠 Accueil",
            Page::Maps => "🗺️ Cartes",
            Page::RawData => "📊 Données brutes",
            Page::About => "ℹ️ À propos",
        }
    }
}

/// Geometry collections fetched so far, one per scale.
///
/// Entries are never evicted; a scale is fetched at most once per session.
#[derive(Clone, Default)]
pub struct GeometryCache {
    loaded: HashMap<Scale, Rc<GeometryIndex>>,
    pending: HashSet<Scale>,
    failed: HashMap<Scale, String>,
}

impl GeometryCache {
    pub fn get(&self, scale: Scale) -> Option<Rc<GeometryIndex>> {
        self.loaded.get(&scale).cloned()
    }

    pub fn error(&self, scale: Scale) -> Option<&str> {
        self.failed.get(&scale).map(String::as_str)
    }

    /// True when the scale has neither been fetched nor requested.
    pub fn needs_fetch(&self, scale: Scale) -> bool {
        !self.loaded.contains_key(&scale)
            && !self.pending.contains(&scale)
            && !self.failed.contains_key(&scale)
    }

    pub fn mark_pending(&mut self, scale: Scale) {
        self.pending.insert(scale);
    }

    pub fn insert(&mut self, scale: Scale, index: GeometryIndex) {
        self.pending.remove(&scale);
        self.loaded.insert(scale, Rc::new(index));
    }

    pub fn fail(&mut self, scale: Scale, message: String) {
        self.pending.remove(&scale);
        self.failed.insert(scale, message);
    }
}

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    /// Dataset overview for the sidebar and the home page
    pub summary: Signal<Option<DatasetSummary>>,
    /// Active page
    pub page: Signal<Page>,
    /// Map page selections
    pub map: Signal<MapSelection>,
    /// Raw-data page facet selections
    pub raw_filter: Signal<FilterSpec>,
    /// Territory geometries fetched so far
    pub geometries: Signal<GeometryCache>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            db: Signal::new(None),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            summary: Signal::new(None),
            page: Signal::new(Page::default()),
            map: Signal::new(MapSelection::default()),
            raw_filter: Signal::new(FilterSpec::new(Some(Scale::Commune))),
            geometries: Signal::new(GeometryCache::default()),
        }
    }
}
