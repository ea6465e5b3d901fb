//! Fire-and-forget fetches that fill store slots.
//!
//! A load starts its request immediately and returns; the response is
//! decoded and written on a spawned task. Completions are unordered and
//! never cancelled, so the last write to a slot wins.

use crate::api::{Endpoint, FetchError};
use crate::logging::{log_error, log_navigation};
use crate::navigation::Navigator;
use crate::platform::Platform;
use crate::routing::NavigationContext;
use crate::store::Slot;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// What a route does when its load fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnFailure {
    /// Leave the slot in its reset state.
    Ignore,
    /// Leave the page for a fallback path.
    Redirect(String),
}

impl OnFailure {
    pub fn redirect(path: impl Into<String>) -> Self {
        OnFailure::Redirect(path.into())
    }
}

#[derive(Clone)]
pub struct Loader {
    platform: Rc<dyn Platform>,
    api_base_url: String,
    navigator: Navigator,
}

impl Loader {
    pub fn new(platform: Rc<dyn Platform>, api_base_url: impl Into<String>, navigator: Navigator) -> Self {
        Self {
            platform,
            api_base_url: api_base_url.into(),
            navigator,
        }
    }

    pub fn load<T, S>(&self, context: &NavigationContext, slot: &S, endpoint: Endpoint, on_failure: OnFailure)
    where
        T: DeserializeOwned + 'static,
        S: Slot<T>,
    {
        self.load_then(context, slot, endpoint, on_failure, |_: &T| {});
    }

    /// Like [`load`](Self::load), running `on_success` just before the slot is written.
    pub fn load_then<T, S, F>(
        &self,
        context: &NavigationContext,
        slot: &S,
        endpoint: Endpoint,
        on_failure: OnFailure,
        on_success: F,
    ) where
        T: DeserializeOwned + 'static,
        S: Slot<T>,
        F: FnOnce(&T) + 'static,
    {
        let url = endpoint.url(&self.api_base_url);
        let request = self.platform.fetch_json(&url);
        let slot = slot.clone();
        let navigator = self.navigator.clone();
        let redirect_origin = context.redirect_origin();

        self.platform.spawn_local(
            async move {
                let decoded = request.await.and_then(|json| {
                    serde_json::from_value::<T>(json).map_err(|error| FetchError::Decode(error.to_string()))
                });
                match decoded {
                    Ok(value) => {
                        on_success(&value);
                        slot.write(value);
                    }
                    Err(error) => match on_failure {
                        OnFailure::Ignore => log_navigation(&format!("GET {url} failed: {error}")),
                        OnFailure::Redirect(fallback) => {
                            log_error(&format!("GET {url} failed: {error}; redirecting to {fallback}"));
                            navigator.redirect(redirect_origin, fallback);
                        }
                    },
                }
            }
            .boxed_local(),
        );
    }
}
