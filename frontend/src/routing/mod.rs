//! Path-pattern routing with ordered middleware handlers.
//!
//! Patterns are tried in registration order against the pathname of every
//! navigation. Each matching handler returns [`Next`] to let the chain go on
//! or to stop it. The catch-all `*` is always registered last, so its handler
//! sees every navigation that nobody halted.

pub mod context;
pub mod pattern;
pub mod router;

pub use context::{NavigationContext, UrlParts, split_url};
pub use pattern::{CATCH_ALL, RoutePattern};
pub use router::{DispatchReport, Next, Router};

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("route pattern '{pattern}' has a parameter without a name")]
    UnnamedParameter { pattern: String },
    #[error("catch-all route must be registered last, found '{pattern}' after it")]
    CatchAllNotLast { pattern: String },
    #[error("no catch-all route registered")]
    MissingCatchAll,
}
