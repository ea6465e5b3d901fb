use serde::{Deserialize, Deserializer, Serialize};

/// The API marshals absent values as `null`; read those as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== EVENT TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Series {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Discipline {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
}

/// Event listed on the home page, newest race date first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecentEvent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub series: Option<Series>,
    pub discipline: Discipline,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearEvent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub series: Option<Series>,
}

/// One tab of the events-for-year page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisciplineEvents {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<YearEvent>,
}

// ===== PEOPLE TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
}

/// A result's rider. Results without a rider arrive as an object of nulls.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Person {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_name: Option<String>,
    pub name: Option<String>,
}

// ===== RESULT TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub id: i64,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub series: Option<Series>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Race {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub starters: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<i32>,
    #[serde(default)]
    pub quality: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceWithEvent {
    #[serde(flatten)]
    pub race: Race,
    pub event: EventSummary,
}

/// Fields every result carries, whichever side of the person/race join it comes from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResultFields {
    pub id: i64,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub laps: Option<i32>,
    #[serde(default)]
    pub value: Option<i32>,
    #[serde(default)]
    pub sum_value: Option<i32>,
    #[serde(default)]
    pub sum_categories: Option<Vec<i32>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub needs_upgrade: Option<bool>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub pending_date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultWithPerson {
    #[serde(flatten)]
    pub result: ResultFields,
    #[serde(default)]
    pub person: Option<Person>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultWithRace {
    #[serde(flatten)]
    pub result: ResultFields,
    pub race: RaceWithEvent,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceResults {
    #[serde(flatten)]
    pub race: Race,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ResultWithPerson>,
}

/// Payload of `results/event/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventResults {
    pub id: i64,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub series: Option<Series>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub races: Vec<RaceResults>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisciplineResults {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ResultWithRace>,
}

/// Payload of `results/person/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonResults {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disciplines: Vec<DisciplineResults>,
}

// ===== UPGRADE AND RANK TYPES =====

// Individual upgrade and rank entries are only rendered by the templates,
// so they stay as raw JSON here.
pub type UpgradeEntry = serde_json::Value;
pub type RankEntry = serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisciplineUpgrades {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<UpgradeEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RankDiscipline {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ranks: Vec<RankEntry>,
}

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub app: AppSection,
    pub api: ApiSection,
    pub ui: UiSection,
    pub service_worker: ServiceWorkerSection,
    pub logging: LoggingSection,
}

impl ClientConfig {
    pub fn from_toml(source: &str) -> Result<Self, String> {
        let config: ClientConfig =
            toml::from_str(source).map_err(|error| format!("Invalid client config: {error}"))?;
        if !config.app.is_supported_version() {
            return Err(format!(
                "Unsupported client config version '{}' (expected {})",
                config.app.version,
                AppSection::CURRENT_VERSION
            ));
        }
        Ok(config)
    }
}

// The version field lets old embedded configs be rejected instead of half-parsed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    /// Current configuration format version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn is_supported_version(&self) -> bool {
        matches!(self.version.as_str(), "1.0.0")
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "/api/v1".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiSection {
    /// Used when the page is served without a `<title>`.
    pub fallback_title: String,
    pub navigation_menu_selector: String,
    pub navigation_menu_open_class: String,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            fallback_title: "OBRA Hacks".to_string(),
            navigation_menu_selector: ".navbar-collapse".to_string(),
            navigation_menu_open_class: "show".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceWorkerSection {
    pub enabled: bool,
    pub script_url: String,
}

impl Default for ServiceWorkerSection {
    fn default() -> Self {
        Self {
            enabled: true,
            script_url: "/js/serviceworker.js".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    pub navigation: bool,
}
