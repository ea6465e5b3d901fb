//! Reactive state read by the page templates.
//!
//! Every field is a `zoon` cell. Route handlers reset the slots their route
//! will fill, the [`Loader`](crate::loader::Loader) writes fetched values,
//! and templates plus the panel selector only read.

use crate::routing::NavigationContext;
use shared::{
    DisciplineEvents, DisciplineUpgrades, EventResults, PersonResults, RankDiscipline,
    RecentEvent, SearchResult, UpgradeEntry,
};
use zoon::{Mutable, MutableVec};

/// UI section identity, derived from the first path segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateKind {
    #[default]
    Index,
    Search,
    Events,
    Event,
    Ranks,
    Notifications,
    Person,
    Upgrades,
    Other(String),
}

impl TemplateKind {
    pub fn from_pathname(pathname: &str) -> Self {
        let first_segment = pathname.split('/').nth(1).unwrap_or_default();
        match first_segment {
            "" => TemplateKind::Index,
            "search" => TemplateKind::Search,
            "events" => TemplateKind::Events,
            "event" => TemplateKind::Event,
            "ranks" => TemplateKind::Ranks,
            "notifications" => TemplateKind::Notifications,
            "person" => TemplateKind::Person,
            "upgrades" => TemplateKind::Upgrades,
            other => TemplateKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TemplateKind::Index => "index",
            TemplateKind::Search => "search",
            TemplateKind::Events => "events",
            TemplateKind::Event => "event",
            TemplateKind::Ranks => "ranks",
            TemplateKind::Notifications => "notifications",
            TemplateKind::Person => "person",
            TemplateKind::Upgrades => "upgrades",
            TemplateKind::Other(segment) => segment,
        }
    }

    /// Templates that show tabbed panels and therefore have an active panel.
    pub fn has_panels(&self) -> bool {
        matches!(
            self,
            TemplateKind::Person | TemplateKind::Upgrades | TemplateKind::Events | TemplateKind::Ranks
        )
    }
}

/// A store cell the loader can reset and then fill with one fetched value.
///
/// Writes replace the whole value; readers never see a half-written slot.
pub trait Slot<T>: Clone + 'static {
    fn write(&self, value: T);
    fn reset(&self);
}

impl<T: Clone + 'static> Slot<T> for Mutable<Option<T>> {
    fn write(&self, value: T) {
        self.set(Some(value));
    }

    fn reset(&self) {
        self.set(None);
    }
}

impl<T: Clone + 'static> Slot<Vec<T>> for MutableVec<T> {
    fn write(&self, value: Vec<T>) {
        self.lock_mut().replace_cloned(value);
    }

    fn reset(&self) {
        self.lock_mut().clear();
    }
}

#[derive(Clone, Default)]
pub struct Store {
    // === ROUTING STATE (written by the router's catch-all) ===
    pub page_location: Mutable<Option<String>>,
    pub page_template: Mutable<TemplateKind>,
    pub page_context: Mutable<Option<NavigationContext>>,
    pub active_panel: Mutable<Option<String>>,
    /// Bumped each time the catch-all completes a navigation.
    pub navigation_generation: Mutable<u64>,
    /// Bumped at the start of every dispatch, halted or not.
    pub navigation_count: Mutable<u64>,

    // === ROUTE DATA (reset by the route that shows it) ===
    pub upgrades_pending_results: Mutable<Option<Vec<DisciplineUpgrades>>>,
    pub upgrades_recent_results: Mutable<Option<Vec<DisciplineUpgrades>>>,
    pub upgrades_all_results: Mutable<Option<Vec<DisciplineUpgrades>>>,
    pub search_results: MutableVec<SearchResult>,
    pub person_results: Mutable<Option<PersonResults>>,
    pub event_results: Mutable<Option<EventResults>>,
    pub ranks_results: MutableVec<RankDiscipline>,
    pub year_events: Mutable<Option<Vec<DisciplineEvents>>>,

    // === HOME PAGE AND NAVIGATION DATA (kept across routes) ===
    pub upgrades_pending: MutableVec<UpgradeEntry>,
    pub upgrades_recent: MutableVec<UpgradeEntry>,
    pub events_recent: MutableVec<RecentEvent>,
    pub events_years: MutableVec<i32>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upgrade results slot for an `/upgrades/:type` value.
    pub fn upgrades_results_for(
        &self,
        upgrade_type: &str,
    ) -> Option<&Mutable<Option<Vec<DisciplineUpgrades>>>> {
        match upgrade_type {
            "pending" => Some(&self.upgrades_pending_results),
            "recent" => Some(&self.upgrades_recent_results),
            "all" => Some(&self.upgrades_all_results),
            _ => None,
        }
    }

    pub fn reset_upgrades_results(&self) {
        self.upgrades_pending_results.reset();
        self.upgrades_recent_results.reset();
        self.upgrades_all_results.reset();
    }
}
