//! ObraApp - wires store, router, loader and listeners together

use crate::dataflow::relay;
use crate::history::{HistoryReconciler, NativeNavigation, Reconciliation};
use crate::loader::Loader;
use crate::logging::log_navigation;
use crate::navigation::{Navigation, Navigator};
use crate::panels::{change_active_panel, start_panel_activation};
use crate::platform::Platform;
use crate::routes::{RouteEnv, Titles, build_router};
use crate::routing::{DispatchReport, RouteError};
use crate::store::Store;
use futures::FutureExt;
use shared::ClientConfig;
use std::rc::Rc;

/// Navigation controller for the whole page.
pub struct ObraApp {
    /// Reactive state the page templates render from
    pub store: Store,

    pub config: ClientConfig,

    platform: Rc<dyn Platform>,
    navigation: Navigation,
    navigator: Navigator,
    reconciler: HistoryReconciler,
}

impl ObraApp {
    /// Build the router and start the request loop and the panel rule.
    ///
    /// The base title is taken from the document as it is at this moment.
    pub fn new(platform: Rc<dyn Platform>, config: ClientConfig) -> Result<Self, RouteError> {
        let store = Store::new();
        let (navigation_requested_relay, navigation_requested_stream) = relay();
        let navigator = Navigator::new(navigation_requested_relay);
        let titles = Titles::from_document(&platform.document_title(), &config.ui.fallback_title);

        let router = build_router(RouteEnv {
            store: store.clone(),
            loader: Loader::new(platform.clone(), config.api.base_url.clone(), navigator.clone()),
            navigator: navigator.clone(),
            platform: platform.clone(),
            titles,
        })?;
        let navigation = Navigation::new(router, platform.clone(), store.clone());

        platform.spawn_local(
            navigation
                .clone()
                .run(navigation_requested_stream)
                .boxed_local(),
        );
        start_panel_activation(store.clone(), platform.clone());

        Ok(ObraApp {
            reconciler: HistoryReconciler::new(store.clone(), navigator.clone()),
            store,
            config,
            platform,
            navigation,
            navigator,
        })
    }

    /// Route the page the browser opened, without adding a history entry.
    pub fn start(&self) -> Option<DispatchReport> {
        let location = self.platform.location();
        log_navigation(&format!("starting at {}", location.to_url()));
        let report = self.navigation.replace(&location.to_url(), None, true);

        let service_worker = &self.config.service_worker;
        if service_worker.enabled {
            self.platform.register_service_worker(&service_worker.script_url);
        }
        report
    }

    pub fn navigate(&self, url: impl Into<String>) {
        self.navigator.navigate(url);
    }

    /// Search form submission with its already-encoded fields.
    pub fn submit_search(&self, query_string: &str) {
        self.navigator.navigate(format!("/search?{query_string}"));
    }

    pub fn change_active_panel(&self, name: &str) {
        change_active_panel(&self.store, self.platform.as_ref(), name);
    }

    pub fn on_native_history_navigation(&self, event: NativeNavigation) -> Reconciliation {
        self.reconciler.on_native_history_navigation(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::platform::testing::{HistoryEntry, TestPlatform};
    use crate::routing::split_url;
    use crate::store::TemplateKind;
    use serde_json::json;

    fn app_at(url: &str) -> (ObraApp, Rc<TestPlatform>) {
        let platform = Rc::new(TestPlatform::new(url));
        let app = ObraApp::new(platform.clone(), ClientConfig::default()).unwrap();
        (app, platform)
    }

    fn pushes(platform: &TestPlatform) -> Vec<String> {
        platform
            .history()
            .into_iter()
            .filter_map(|entry| match entry {
                HistoryEntry::Push(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn back_to(url: &str) -> NativeNavigation {
        NativeNavigation {
            location: split_url(url),
            state: None,
        }
    }

    /// Open `url`, answer its page data and let the panel rule settle.
    fn open_with_data(url: &str, endpoint: &str, body: serde_json::Value) -> (ObraApp, Rc<TestPlatform>) {
        let (app, platform) = app_at(url);
        app.start();
        platform.serve_json(endpoint, body);
        platform.run_until_stalled();
        (app, platform)
    }

    fn hash_replaces(platform: &TestPlatform) -> Vec<String> {
        platform
            .history()
            .into_iter()
            .filter_map(|entry| match entry {
                HistoryEntry::Replace(url) if url.contains('#') => Some(url),
                _ => None,
            })
            .collect()
    }

    fn person_body() -> serde_json::Value {
        json!({"id": 7, "name": "Ann", "disciplines": [
            {"name": "road", "display": "Road", "results": [{"id": 1, "race": {"id": 2, "name": "Crit", "event": {"id": 3, "name": "Series", "year": 2023}}}]},
            {"name": "cross", "display": "Cross", "results": []}
        ]})
    }

    fn year_events_body() -> serde_json::Value {
        json!([
            {"name": "road", "display": "Road", "events": []},
            {"name": "cross", "display": "Cross", "events": [{"id": 1, "name": "Cross Crusade"}]}
        ])
    }

    fn ranks_body() -> serde_json::Value {
        json!([
            {"name": "road", "display": "Road", "ranks": [{}]},
            {"name": "track", "display": "Track", "ranks": []}
        ])
    }

    fn upgrades_body() -> serde_json::Value {
        json!([
            {"name": "road", "results": [{}]},
            {"name": "cross", "results": []}
        ])
    }

    #[test]
    fn upgrades_page_activates_first_populated_panel() {
        let (app, platform) = app_at("/");
        app.start();

        app.navigate("/upgrades/pending");
        platform.run_until_stalled();
        platform.serve_json("/api/v1/upgrades/pending/", upgrades_body());
        platform.run_until_stalled();

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("road"));
        assert_eq!(hash_replaces(&platform), vec!["/upgrades/pending#road"]);
    }

    #[test]
    fn upgrades_page_honours_hash() {
        let (app, platform) = open_with_data("/upgrades/all#cross", "/api/v1/upgrades/all/", upgrades_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("cross"));
        assert_eq!(platform.history(), vec![HistoryEntry::Replace("/upgrades/all#cross".into())]);
    }

    #[test]
    fn person_page_activates_first_populated_panel() {
        let (app, platform) = open_with_data("/person/7", "/api/v1/results/person/7", person_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("road"));
        assert_eq!(hash_replaces(&platform), vec!["/person/7#road"]);
    }

    #[test]
    fn person_page_honours_hash() {
        let (app, platform) = open_with_data("/person/7#cross", "/api/v1/results/person/7", person_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("cross"));
        assert_eq!(hash_replaces(&platform), vec!["/person/7#cross"]);
        assert_eq!(platform.history().len(), 1);
    }

    #[test]
    fn year_events_page_activates_first_populated_panel() {
        let (app, platform) =
            open_with_data("/events/2022", "/api/v1/events/years/2022/", year_events_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("cross"));
        assert_eq!(hash_replaces(&platform), vec!["/events/2022#cross"]);
    }

    #[test]
    fn year_events_page_honours_hash() {
        let (app, platform) =
            open_with_data("/events/2022#road", "/api/v1/events/years/2022/", year_events_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("road"));
        assert_eq!(platform.history().len(), 1);
    }

    #[test]
    fn ranks_page_activates_first_populated_panel() {
        let (app, platform) = open_with_data("/ranks", "/api/v1/ranks/", ranks_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("road"));
        assert_eq!(hash_replaces(&platform), vec!["/ranks#road"]);
    }

    #[test]
    fn ranks_page_honours_hash() {
        let (app, platform) = open_with_data("/ranks#track", "/api/v1/ranks/", ranks_body());

        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("track"));
        assert_eq!(platform.history().len(), 1);
    }

    #[test]
    fn start_routes_current_location_in_place() {
        let (app, platform) = app_at("/ranks");

        let report = app.start().unwrap();

        assert_eq!(report.executed, vec!["/ranks", "*"]);
        assert_eq!(platform.history(), vec![HistoryEntry::Replace("/ranks".into())]);
        assert_eq!(platform.service_workers(), vec!["/js/serviceworker.js"]);
        assert_eq!(app.store.page_template.get_cloned(), TemplateKind::Ranks);
    }

    #[test]
    fn disabled_service_worker_is_not_registered() {
        let platform = Rc::new(TestPlatform::new("/"));
        let mut config = ClientConfig::default();
        config.service_worker.enabled = false;
        let app = ObraApp::new(platform.clone(), config).unwrap();

        app.start();

        assert!(platform.service_workers().is_empty());
    }

    #[test]
    fn events_page_moves_on_to_newest_year() {
        let (app, platform) = app_at("/");
        app.start();
        platform.run_until_stalled();

        app.navigate("/events");
        platform.run_until_stalled();
        assert_eq!(pushes(&platform), vec!["/events"]);

        platform.serve_json("/api/v1/events/years/", json!([2023, 2022]));
        platform.run_until_stalled();

        assert_eq!(pushes(&platform), vec!["/events", "/events/2023"]);
        assert_eq!(app.store.page_location.get_cloned().as_deref(), Some("/events/2023"));
        assert_eq!(platform.title(), "OBRA Hacks: Events: 2023");
    }

    #[test]
    fn failed_event_falls_back_to_events_without_event_title() {
        let (app, platform) = app_at("/");
        app.start();

        app.navigate("/event/999");
        platform.run_until_stalled();
        platform.serve("/api/v1/results/event/999", Err(FetchError::Status(404)));
        platform.run_until_stalled();

        assert_eq!(pushes(&platform), vec!["/event/999", "/events"]);
        assert_eq!(app.store.event_results.get_cloned(), None);
        assert!(!platform.title().contains("Results"), "{}", platform.title());
    }

    #[test]
    fn failing_fallbacks_do_not_loop() {
        let (app, platform) = app_at("/");
        app.start();
        platform.serve("/api/v1/events/years/", Ok(json!([2023])));
        platform.serve("/api/v1/events/years/2023/", Err(FetchError::Status(500)));
        platform.run_until_stalled();

        app.navigate("/events");
        platform.run_until_stalled();

        assert_eq!(pushes(&platform), vec!["/events", "/events/2023"]);
    }

    #[test]
    fn upgrade_lists_never_leak_between_types() {
        let (app, platform) = app_at("/");
        app.start();

        app.navigate("/upgrades/pending");
        platform.run_until_stalled();
        platform.serve_json(
            "/api/v1/upgrades/pending/",
            json!([{"name": "road", "results": [{"id": 1}]}]),
        );
        platform.run_until_stalled();
        assert!(app.store.upgrades_pending_results.get_cloned().is_some());

        app.navigate("/upgrades/recent");
        platform.run_until_stalled();

        assert_eq!(app.store.upgrades_pending_results.get_cloned(), None);
        assert_eq!(app.store.upgrades_recent_results.get_cloned(), None);
        assert_eq!(app.store.upgrades_all_results.get_cloned(), None);
    }

    #[test]
    fn back_to_other_tab_fetches_nothing() {
        let (app, platform) = app_at("/person/7");
        app.start();
        platform.serve_json(
            "/api/v1/results/person/7",
            json!({"id": 7, "name": "Ann", "disciplines": [
                {"name": "road", "display": "Road", "results": [{"id": 1, "race": {"id": 2, "name": "Crit", "event": {"id": 3, "name": "Series", "year": 2023}}}]},
                {"name": "cross", "display": "Cross", "results": []}
            ]}),
        );
        platform.run_until_stalled();
        assert_eq!(app.store.active_panel.get_cloned().as_deref(), Some("road"));

        app.change_active_panel("cross");
        platform.clear_fetches();
        platform.set_location("/person/7#road");

        let outcome = app.on_native_history_navigation(back_to("/person/7#road"));
        platform.run_until_stalled();

        assert_eq!(outcome, Reconciliation::HashOnly { active_panel: Some("road".into()) });
        assert!(platform.fetches().is_empty());
        assert_eq!(app.store.navigation_count.get(), 1);
    }

    #[test]
    fn back_to_other_page_dispatches_once() {
        let (app, platform) = app_at("/ranks");
        app.start();
        app.navigate("/notifications");
        platform.run_until_stalled();
        assert_eq!(app.store.navigation_count.get(), 2);
        platform.clear_fetches();
        platform.clear_history();

        platform.set_location("/ranks");
        app.on_native_history_navigation(back_to("/ranks"));
        platform.run_until_stalled();

        assert_eq!(app.store.navigation_count.get(), 3);
        assert_eq!(platform.fetches(), vec!["/api/v1/ranks/"]);
        assert_eq!(platform.history(), vec![HistoryEntry::Replace("/ranks".into())]);
        assert_eq!(app.store.page_location.get_cloned().as_deref(), Some("/ranks"));
    }

    #[test]
    fn search_submission_pushes_search_page() {
        let (app, platform) = app_at("/");
        app.start();
        platform.clear_fetches();

        app.submit_search("name=ann+b");
        platform.run_until_stalled();

        assert_eq!(pushes(&platform), vec!["/search?name=ann+b"]);
        assert_eq!(platform.fetches(), vec!["/api/v1/people/?name=ann+b"]);
        assert_eq!(app.store.page_template.get_cloned(), TemplateKind::Search);
    }

    #[test]
    fn late_response_from_abandoned_page_still_lands() {
        let (app, platform) = app_at("/");
        app.start();

        app.navigate("/person/1");
        platform.run_until_stalled();
        app.navigate("/ranks");
        platform.run_until_stalled();

        platform.serve_json("/api/v1/results/person/1", json!({"id": 1, "name": "Old"}));
        platform.run_until_stalled();

        assert_eq!(app.store.page_template.get_cloned(), TemplateKind::Ranks);
        assert!(app.store.person_results.get_cloned().is_some());
    }
}
