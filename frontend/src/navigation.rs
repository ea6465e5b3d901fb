//! Navigation requests and the loop that turns them into dispatches.

use crate::dataflow::Relay;
use crate::logging::{log_error, log_navigation};
use crate::platform::Platform;
use crate::routing::{DispatchReport, NavigationContext, Router, split_url};
use crate::store::Store;
use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use std::rc::Rc;

/// Longest redirect chain followed before giving up.
pub const MAX_REDIRECT_CHAIN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationRequest {
    /// New history entry, then dispatch.
    Push {
        url: String,
        redirected_from: Vec<String>,
    },
    /// Rewrite the current history entry, dispatching only if asked.
    Replace {
        url: String,
        state: Option<serde_json::Value>,
        dispatch: bool,
    },
}

impl NavigationRequest {
    pub fn push(url: impl Into<String>) -> Self {
        NavigationRequest::Push {
            url: url.into(),
            redirected_from: Vec::new(),
        }
    }
}

/// Cheap handle for asking the navigation loop to go somewhere.
#[derive(Clone)]
pub struct Navigator {
    navigation_requested_relay: Relay<NavigationRequest>,
}

impl Navigator {
    pub fn new(navigation_requested_relay: Relay<NavigationRequest>) -> Self {
        Self {
            navigation_requested_relay,
        }
    }

    fn request(&self, request: NavigationRequest) {
        if let Err(error) = self.navigation_requested_relay.try_send(request.clone()) {
            log_error(&format!("navigation request {request:?} lost: {error}"));
        }
    }

    /// User-initiated navigation: link click or search submission.
    pub fn navigate(&self, url: impl Into<String>) {
        self.request(NavigationRequest::push(url));
    }

    /// Leave the navigation described by `redirected_from` for a fallback page.
    pub fn redirect(&self, redirected_from: Vec<String>, url: impl Into<String>) {
        self.request(NavigationRequest::Push {
            url: url.into(),
            redirected_from,
        });
    }

    /// Re-dispatch `url` in place of the current history entry.
    pub fn reroute(&self, url: impl Into<String>, state: Option<serde_json::Value>) {
        self.request(NavigationRequest::Replace {
            url: url.into(),
            state,
            dispatch: true,
        });
    }
}

/// Owns the router and performs every dispatch.
#[derive(Clone)]
pub struct Navigation {
    router: Rc<Router>,
    platform: Rc<dyn Platform>,
    store: Store,
}

impl Navigation {
    pub fn new(router: Router, platform: Rc<dyn Platform>, store: Store) -> Self {
        Self {
            router: Rc::new(router),
            platform,
            store,
        }
    }

    /// Push `url` and dispatch it. Refused when it would close a redirect loop.
    pub fn navigate(&self, url: &str, redirected_from: Vec<String>) -> Option<DispatchReport> {
        let target = split_url(url).pathname;
        if redirected_from.iter().any(|pathname| pathname.eq_ignore_ascii_case(&target)) {
            log_error(&format!(
                "redirect to {url} refused: already visited via {redirected_from:?}"
            ));
            return None;
        }
        if redirected_from.len() > MAX_REDIRECT_CHAIN {
            log_error(&format!("redirect to {url} refused: chain too long ({redirected_from:?})"));
            return None;
        }
        if !redirected_from.is_empty() {
            log_navigation(&format!("redirect {redirected_from:?} -> {url}"));
        }

        self.platform.push_url(url, None);
        Some(self.dispatch(url, None, redirected_from))
    }

    /// History-transparent replace of the current entry, optionally dispatched.
    pub fn replace(
        &self,
        url: &str,
        state: Option<serde_json::Value>,
        dispatch: bool,
    ) -> Option<DispatchReport> {
        self.platform.replace_url(url, state.as_ref());
        dispatch.then(|| self.dispatch(url, state, Vec::new()))
    }

    pub fn process(&self, request: NavigationRequest) -> Option<DispatchReport> {
        match request {
            NavigationRequest::Push {
                url,
                redirected_from,
            } => self.navigate(&url, redirected_from),
            NavigationRequest::Replace {
                url,
                state,
                dispatch,
            } => self.replace(&url, state, dispatch),
        }
    }

    /// Serve navigation requests until every relay sender is gone.
    pub async fn run(self, mut requests: UnboundedReceiver<NavigationRequest>) {
        while let Some(request) = requests.next().await {
            self.process(request);
        }
    }

    fn dispatch(
        &self,
        url: &str,
        state: Option<serde_json::Value>,
        redirected_from: Vec<String>,
    ) -> DispatchReport {
        let dispatch_id = self.store.navigation_count.get() + 1;
        self.store.navigation_count.set(dispatch_id);
        let context = NavigationContext::new(url, state, dispatch_id, redirected_from);
        self.router.dispatch(context)
    }
}
