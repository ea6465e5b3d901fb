//! Page routes: what each path loads, how it titles the page, where it
//! falls back to, and the catch-all bookkeeping shared by every page.

use crate::api::Endpoint;
use crate::loader::{Loader, OnFailure};
use crate::logging::log_navigation;
use crate::navigation::Navigator;
use crate::platform::Platform;
use crate::routing::{CATCH_ALL, NavigationContext, Next, RouteError, Router};
use crate::store::{Slot, Store, TemplateKind};
use futures::{FutureExt, StreamExt};
use shared::{EventResults, PersonResults, RankDiscipline};
use std::rc::Rc;
use zoon::{SignalExt, SignalVecExt, map_ref};

/// Builds `"{base}: {section}: ..."` document titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Titles {
    base: String,
}

impl Titles {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Title captured from the page, or `fallback` when the page has none.
    pub fn from_document(document_title: &str, fallback: &str) -> Self {
        let trimmed = document_title.trim();
        Self::new(if trimmed.is_empty() { fallback } else { trimmed })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn page(&self, sections: &[&str]) -> String {
        sections.iter().fold(self.base.clone(), |mut title, section| {
            title.push_str(": ");
            title.push_str(section);
            title
        })
    }
}

/// Everything a route handler touches.
#[derive(Clone)]
pub struct RouteEnv {
    pub store: Store,
    pub loader: Loader,
    pub navigator: Navigator,
    pub platform: Rc<dyn Platform>,
    pub titles: Titles,
}

impl RouteEnv {
    fn set_title(&self, sections: &[&str]) {
        self.platform.set_document_title(&self.titles.page(sections));
    }
}

/// Closure that titles the page once a loaded record arrives.
fn title_on_arrival<T, F>(env: &RouteEnv, sections: F) -> impl FnOnce(&T) + 'static + use<T, F>
where
    T: 'static,
    F: Fn(&T) -> Vec<String> + 'static,
{
    let platform = env.platform.clone();
    let titles = env.titles.clone();
    move |record: &T| {
        let sections = sections(record);
        let sections: Vec<&str> = sections.iter().map(String::as_str).collect();
        platform.set_document_title(&titles.page(&sections));
    }
}

type RouteFn = fn(&RouteEnv, &mut NavigationContext) -> Next;

fn bind(env: &Rc<RouteEnv>, route: RouteFn) -> impl Fn(&mut NavigationContext) -> Next + use<> {
    let env = env.clone();
    move |context| route(&env, context)
}

/// The application's route table, in matching order.
pub fn build_router(env: RouteEnv) -> Result<Router, RouteError> {
    let env = Rc::new(env);
    Router::builder()
        .route("/", bind(&env, show_index))
        .route("/search*", bind(&env, show_search))
        .route("/events", bind(&env, show_events))
        .route("/events/:year", bind(&env, show_events_year))
        .route("/event/:id", bind(&env, show_event))
        .route("/ranks", bind(&env, show_ranks))
        .route("/notifications", bind(&env, show_notifications))
        .route("/person/:id", bind(&env, show_person))
        .route("/upgrades/:type", bind(&env, show_upgrades))
        .route(CATCH_ALL, bind(&env, switch_page))
        .build()
}

fn show_index(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let store = &env.store;
    env.loader
        .load(context, &store.events_recent, Endpoint::EventsRecent, OnFailure::Ignore);
    env.loader
        .load(context, &store.upgrades_pending, Endpoint::UpgradesPendingTop, OnFailure::Ignore);
    env.loader
        .load(context, &store.upgrades_recent, Endpoint::UpgradesRecentTop, OnFailure::Ignore);
    env.platform.set_document_title(env.titles.base());
    Next::Continue
}

fn show_search(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    env.store.search_results.reset();
    let endpoint = Endpoint::People(context.querystring.clone());
    env.loader
        .load(context, &env.store.search_results, endpoint, OnFailure::Ignore);
    env.set_title(&["Search"]);
    Next::Continue
}

/// The bare events page has no content of its own: it waits for the year
/// list and moves on to the newest year.
fn show_events(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    env.loader.load(
        context,
        &env.store.events_years,
        Endpoint::EventYears,
        OnFailure::redirect("/"),
    );
    env.set_title(&["Events"]);
    redirect_to_first_year(env, context);
    Next::Halt
}

/// One-shot observer: redirect once the years list is non-empty, unless a
/// newer dispatch started first.
fn redirect_to_first_year(env: &RouteEnv, context: &NavigationContext) {
    let dispatch_id = context.dispatch_id;
    let redirect_origin = context.redirect_origin();
    let navigator = env.navigator.clone();
    let mut updates = map_ref! {
        let first_year = env.store.events_years.signal_vec_cloned().to_signal_map(|years| years.first().copied()),
        let navigation_count = env.store.navigation_count.signal() => (*first_year, *navigation_count)
    }
    .to_stream()
    .boxed_local();

    env.platform.spawn_local(
        async move {
            while let Some((first_year, navigation_count)) = updates.next().await {
                if navigation_count != dispatch_id {
                    log_navigation(&format!("first-year redirect of dispatch #{dispatch_id} dropped"));
                    return;
                }
                if let Some(year) = first_year {
                    navigator.redirect(redirect_origin, format!("/events/{year}"));
                    return;
                }
            }
        }
        .boxed_local(),
    );
}

fn show_events_year(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let year = context.param("year").unwrap_or_default().to_string();
    env.store.year_events.reset();
    env.loader.load(
        context,
        &env.store.year_events,
        Endpoint::EventsForYear(year.clone()),
        OnFailure::redirect("/events"),
    );
    env.loader
        .load(context, &env.store.events_years, Endpoint::EventYears, OnFailure::Ignore);
    env.set_title(&["Events", &year]);
    Next::Continue
}

fn show_event(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let id = context.param("id").unwrap_or_default().to_string();
    env.store.event_results.reset();
    env.loader.load_then(
        context,
        &env.store.event_results,
        Endpoint::EventResults(id),
        OnFailure::redirect("/events"),
        title_on_arrival(env, |event: &EventResults| {
            vec!["Results".to_string(), event.year.to_string(), event.name.clone()]
        }),
    );
    Next::Continue
}

fn show_ranks(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    env.store.ranks_results.reset();
    env.loader.load_then(
        context,
        &env.store.ranks_results,
        Endpoint::Ranks,
        OnFailure::redirect("/"),
        title_on_arrival(env, |_: &Vec<RankDiscipline>| vec!["Ranks".to_string()]),
    );
    Next::Continue
}

fn show_notifications(env: &RouteEnv, _context: &mut NavigationContext) -> Next {
    env.set_title(&["Notifications"]);
    Next::Continue
}

fn show_person(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let id = context.param("id").unwrap_or_default().to_string();
    env.store.person_results.reset();
    env.loader.load_then(
        context,
        &env.store.person_results,
        Endpoint::PersonResults(id),
        OnFailure::redirect("/"),
        title_on_arrival(env, |person: &PersonResults| vec!["Results".to_string(), person.name.clone()]),
    );
    Next::Continue
}

fn show_upgrades(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let upgrade_type = context.param("type").unwrap_or_default().to_string();
    env.store.reset_upgrades_results();
    let endpoint = Endpoint::for_upgrade_type(&upgrade_type);
    match (endpoint, env.store.upgrades_results_for(&upgrade_type)) {
        (Some(endpoint), Some(slot)) => env.loader.load(context, slot, endpoint, OnFailure::Ignore),
        _ => log_navigation(&format!("no upgrade list named {upgrade_type:?}")),
    }
    env.set_title(&["Upgrades"]);
    Next::Continue
}

/// Runs last for every dispatched path.
fn switch_page(env: &RouteEnv, context: &mut NavigationContext) -> Next {
    let store = &env.store;
    env.platform.collapse_navigation_menu();

    let pathname = context.pathname.clone();
    let new_page = store.page_location.lock_ref().as_deref() != Some(pathname.as_str());
    if new_page {
        store.active_panel.set(None);
    }
    store.page_context.set(Some(context.clone()));
    store.page_template.set_neq(TemplateKind::from_pathname(&pathname));
    store.page_location.set(Some(pathname));
    store.navigation_generation.replace_with(|generation| *generation + 1);
    Next::Continue
}
