//! REST endpoints consumed by the frontend.

/// Any reason a load produced no value. All variants are handled the same
/// way by the loader: the route's failure policy decides what happens next.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    EventsRecent,
    UpgradesPendingTop,
    UpgradesRecentTop,
    UpgradesPending,
    UpgradesRecent,
    UpgradesAll,
    EventResults(String),
    EventYears,
    EventsForYear(String),
    PersonResults(String),
    /// Query string forwarded verbatim from the search form.
    People(String),
    Ranks,
}

impl Endpoint {
    /// Path relative to the API base. Trailing slashes match the server routes.
    pub fn path(&self) -> String {
        match self {
            Endpoint::EventsRecent => "events/recent/".to_string(),
            Endpoint::UpgradesPendingTop => "upgrades/pending/top/".to_string(),
            Endpoint::UpgradesRecentTop => "upgrades/recent/top/".to_string(),
            Endpoint::UpgradesPending => "upgrades/pending/".to_string(),
            Endpoint::UpgradesRecent => "upgrades/recent/".to_string(),
            Endpoint::UpgradesAll => "upgrades/all/".to_string(),
            Endpoint::EventResults(id) => format!("results/event/{id}"),
            Endpoint::EventYears => "events/years/".to_string(),
            Endpoint::EventsForYear(year) => format!("events/years/{year}/"),
            Endpoint::PersonResults(id) => format!("results/person/{id}"),
            Endpoint::People(query) => format!("people/?{query}"),
            Endpoint::Ranks => "ranks/".to_string(),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Endpoint backing an `/upgrades/:type` page, if the type is known.
    pub fn for_upgrade_type(upgrade_type: &str) -> Option<Self> {
        match upgrade_type {
            "pending" => Some(Endpoint::UpgradesPending),
            "recent" => Some(Endpoint::UpgradesRecent),
            "all" => Some(Endpoint::UpgradesAll),
            _ => None,
        }
    }
}
