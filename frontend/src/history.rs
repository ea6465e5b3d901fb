//! Back/forward handling.
//!
//! The browser fires the same event for a fragment change and for a real
//! page change. Only the latter goes through the router again.

use crate::logging::log_navigation;
use crate::navigation::Navigator;
use crate::routing::UrlParts;
use crate::store::Store;

/// Target of a native back/forward step, as read from `window.location`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeNavigation {
    pub location: UrlParts,
    pub state: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Same page, different tab. The router was not involved.
    HashOnly { active_panel: Option<String> },
    /// Different page, re-dispatched in place of the current entry.
    Rerouted { url: String },
}

#[derive(Clone)]
pub struct HistoryReconciler {
    store: Store,
    navigator: Navigator,
}

impl HistoryReconciler {
    pub fn new(store: Store, navigator: Navigator) -> Self {
        Self { store, navigator }
    }

    pub fn on_native_history_navigation(&self, event: NativeNavigation) -> Reconciliation {
        let NativeNavigation { location, state } = event;
        let same_page = self
            .store
            .page_location
            .lock_ref()
            .as_deref()
            .is_some_and(|current| current == location.pathname);

        if same_page {
            let active_panel = (!location.hash.is_empty()).then(|| location.hash.clone());
            log_navigation(&format!("popstate {}: panel {active_panel:?}", location.pathname));
            self.store.active_panel.set(active_panel.clone());
            return Reconciliation::HashOnly { active_panel };
        }

        let url = location.to_url();
        log_navigation(&format!("popstate {url}: rerouting"));
        self.navigator.reroute(url.clone(), state);
        Reconciliation::Rerouted { url }
    }
}
