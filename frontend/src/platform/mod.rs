//! Platform abstraction layer
//!
//! Every browser side effect the navigation core needs goes through
//! [`Platform`], so the router, loader, panel selector and history
//! reconciler can run against a recording fake in native tests.

use crate::api::FetchError;
use crate::routing::UrlParts;
use futures::future::LocalBoxFuture;

pub mod web;
pub use web::WebPlatform;

#[cfg(test)]
pub mod testing;

pub trait Platform {
    /// Current address split into pathname, query string and fragment.
    fn location(&self) -> UrlParts;

    /// Add a history entry for `url` without dispatching anything.
    fn push_url(&self, url: &str, state: Option<&serde_json::Value>);

    /// Rewrite the current history entry. Never fires popstate.
    fn replace_url(&self, url: &str, state: Option<&serde_json::Value>);

    /// Fragment navigation (`location.hash = ...`): new entry plus popstate.
    fn assign_hash(&self, hash: &str);

    fn document_title(&self) -> String;
    fn set_document_title(&self, title: &str);

    /// Close the collapsible navigation menu if it is open.
    fn collapse_navigation_menu(&self);

    /// GET `url` and parse the body as JSON. Non-2xx counts as failure.
    fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, Result<serde_json::Value, FetchError>>;

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);

    /// Fire-and-forget registration of the asset caching worker.
    fn register_service_worker(&self, script_url: &str);
}
