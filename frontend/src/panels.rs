//! Active panel selection for tabbed templates.
//!
//! Panels are named after the disciplines in the loaded data, so the
//! selection has to wait for data. It runs reactively and settles once
//! per navigation.

use crate::logging::log_navigation;
use crate::platform::Platform;
use crate::store::{Store, TemplateKind};
use futures::FutureExt;
use shared::{DisciplineEvents, DisciplineUpgrades, PersonResults, RankDiscipline};
use std::rc::Rc;
use zoon::{Signal, SignalExt, SignalVecExt, map_ref};

/// A tab: its name and how many items its collection holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDescriptor {
    pub name: String,
    pub item_count: usize,
}

impl PanelDescriptor {
    pub fn new(name: impl Into<String>, item_count: usize) -> Self {
        Self {
            name: name.into(),
            item_count,
        }
    }

    pub fn has_items(&self) -> bool {
        self.item_count > 0
    }
}

/// Why a panel became active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelChoice {
    /// The URL fragment named it.
    FromHash(String),
    /// First panel with data; the fragment must be written back.
    Populated(String),
}

impl PanelChoice {
    pub fn name(&self) -> &str {
        match self {
            PanelChoice::FromHash(name) | PanelChoice::Populated(name) => name,
        }
    }
}

/// Pick the initially active panel.
///
/// A non-empty hash only ever selects the panel of that name. An empty hash
/// selects the first panel with items. `None` leaves the page without an
/// active panel.
pub fn select_initial_panel(
    template: &TemplateKind,
    panels: &[PanelDescriptor],
    url_hash: &str,
) -> Option<PanelChoice> {
    if !template.has_panels() {
        return None;
    }
    if !url_hash.is_empty() {
        return panels
            .iter()
            .find(|panel| panel.name == url_hash)
            .map(|panel| PanelChoice::FromHash(panel.name.clone()));
    }
    panels
        .iter()
        .find(|panel| panel.has_items())
        .map(|panel| PanelChoice::Populated(panel.name.clone()))
}

fn person_panels(person: &Option<PersonResults>) -> Vec<PanelDescriptor> {
    person
        .iter()
        .flat_map(|person| &person.disciplines)
        .map(|discipline| PanelDescriptor::new(&discipline.name, discipline.results.len()))
        .collect()
}

fn year_event_panels(year_events: &Option<Vec<DisciplineEvents>>) -> Vec<PanelDescriptor> {
    year_events
        .iter()
        .flatten()
        .map(|discipline| PanelDescriptor::new(&discipline.name, discipline.events.len()))
        .collect()
}

fn upgrade_panels(upgrades: &Option<Vec<DisciplineUpgrades>>) -> Vec<PanelDescriptor> {
    upgrades
        .iter()
        .flatten()
        .map(|discipline| PanelDescriptor::new(&discipline.name, discipline.results.len()))
        .collect()
}

fn rank_panels(ranks: &[RankDiscipline]) -> Vec<PanelDescriptor> {
    ranks
        .iter()
        .map(|discipline| PanelDescriptor::new(&discipline.name, discipline.ranks.len()))
        .collect()
}

/// Panels of the current template, in display order, as data arrives.
pub fn panels_signal(store: &Store) -> impl Signal<Item = (TemplateKind, Vec<PanelDescriptor>)> + use<> {
    map_ref! {
        let template = store.page_template.signal_cloned(),
        let upgrade_type = store.page_context.signal_ref(|context| {
            context
                .as_ref()
                .and_then(|context| context.param("type"))
                .map(str::to_string)
        }),
        let person = store.person_results.signal_ref(person_panels),
        let year_events = store.year_events.signal_ref(year_event_panels),
        let ranks = store.ranks_results.signal_vec_cloned().to_signal_map(rank_panels),
        let pending = store.upgrades_pending_results.signal_ref(upgrade_panels),
        let recent = store.upgrades_recent_results.signal_ref(upgrade_panels),
        let all = store.upgrades_all_results.signal_ref(upgrade_panels) => {
            let panels = match template {
                TemplateKind::Person => person.clone(),
                TemplateKind::Events => year_events.clone(),
                TemplateKind::Ranks => ranks.clone(),
                TemplateKind::Upgrades => match upgrade_type.as_deref() {
                    Some("pending") => pending.clone(),
                    Some("recent") => recent.clone(),
                    Some("all") => all.clone(),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };
            (template.clone(), panels)
        }
    }
}

/// Keep choosing the initial panel until one is chosen for the current
/// navigation. Runs for the lifetime of the app.
pub fn start_panel_activation(store: Store, platform: Rc<dyn Platform>) {
    let mut chosen_for = None;
    let activation = map_ref! {
        let generation = store.navigation_generation.signal(),
        let panels = panels_signal(&store) => (*generation, panels.clone())
    }
    .for_each({
        let platform = platform.clone();
        move |(generation, (template, panels))| {
            if chosen_for != Some(generation) {
                let location = platform.location();
                if let Some(choice) = select_initial_panel(&template, &panels, &location.hash) {
                    log_navigation(&format!("{} panel: {choice:?}", template.as_str()));
                    store.active_panel.set(Some(choice.name().to_string()));
                    if let PanelChoice::Populated(name) = &choice {
                        platform.replace_url(&format!("{}#{name}", location.path()), None);
                    }
                    chosen_for = Some(generation);
                }
            }
            async {}
        }
    });
    platform.spawn_local(activation.boxed_local());
}

/// User clicked a tab: a fragment navigation with its own history entry.
pub fn change_active_panel(store: &Store, platform: &dyn Platform, name: &str) {
    store.active_panel.set(Some(name.to_string()));
    platform.assign_hash(name);
}
