//! Which anchor clicks become in-app navigations.

use crate::routing::UrlParts;

/// The parts of a click on an `<a>` that decide who handles it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkClick {
    pub destination: UrlParts,
    pub same_origin: bool,
    pub primary_button: bool,
    pub modifier_key: bool,
    /// `target` attribute, if any.
    pub target: Option<String>,
    pub download: bool,
    pub already_handled: bool,
}

/// URL to push for `click`, or `None` to leave the click to the browser.
///
/// Links that only change the fragment of the current page stay with the
/// browser; the resulting popstate reaches the history reconciler.
pub fn link_navigation(current: &UrlParts, click: &LinkClick) -> Option<String> {
    let opens_elsewhere = click
        .target
        .as_deref()
        .is_some_and(|target| !target.is_empty() && !target.eq_ignore_ascii_case("_self"));
    if click.already_handled
        || !click.primary_button
        || click.modifier_key
        || click.download
        || opens_elsewhere
        || !click.same_origin
    {
        return None;
    }
    let destination = &click.destination;
    if destination.path() == current.path() && !destination.hash.is_empty() {
        return None;
    }
    Some(destination.to_url())
}
