//! Browser platform implementation using web-sys
//!
//! History goes through `window.history`, requests through `window.fetch`.

use crate::api::FetchError;
use crate::history::NativeNavigation;
use crate::links::{LinkClick, link_navigation};
use crate::logging::{log_error, log_navigation};
use crate::platform::Platform;
use crate::routing::{UrlParts, split_url};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::Serialize;
use shared::UiSection;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use zoon::Task;

pub struct WebPlatform {
    navigation_menu_selector: String,
    navigation_menu_open_class: String,
}

impl WebPlatform {
    pub fn new(ui: &UiSection) -> Self {
        Self {
            navigation_menu_selector: ui.navigation_menu_selector.clone(),
            navigation_menu_open_class: ui.navigation_menu_open_class.clone(),
        }
    }
}

fn js_error(error: JsValue) -> String {
    error
        .as_string()
        .unwrap_or_else(|| format!("{:?}", error))
}

fn state_to_js(state: Option<&serde_json::Value>) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    state
        .and_then(|state| state.serialize(&serializer).ok())
        .unwrap_or(JsValue::NULL)
}

/// Location of the window, read straight from `window.location`.
pub fn window_location() -> UrlParts {
    let Some(location) = web_sys::window().map(|window| window.location()) else {
        return UrlParts {
            pathname: "/".to_string(),
            ..UrlParts::default()
        };
    };
    let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let mut parts = split_url(&pathname);
    parts.querystring = search.trim_start_matches('?').to_string();
    parts.hash = hash.trim_start_matches('#').to_string();
    parts
}

/// Forward every back/forward step to `on_popstate`. The listener lives as
/// long as the page.
pub fn listen_for_history_navigation(on_popstate: impl Fn(NativeNavigation) + 'static) -> Result<(), String> {
    let window = web_sys::window().ok_or("window not available")?;
    let popstate_closure = Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
        let state = serde_wasm_bindgen::from_value::<serde_json::Value>(event.state())
            .ok()
            .filter(|state| !state.is_null());
        on_popstate(NativeNavigation {
            location: window_location(),
            state,
        });
    }) as Box<dyn FnMut(web_sys::PopStateEvent)>);

    window
        .add_event_listener_with_callback("popstate", popstate_closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    popstate_closure.forget();
    Ok(())
}

/// Turn in-app anchor clicks into `on_navigate(url)` calls instead of page loads.
pub fn intercept_link_clicks(on_navigate: impl Fn(String) + 'static) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("document not available")?;
    let click_closure = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        let Some(anchor) = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| element.closest("a[href]").ok().flatten())
            .and_then(|element| element.dyn_into::<web_sys::HtmlAnchorElement>().ok())
        else {
            return;
        };
        let page_origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        let target = anchor.target();
        let click = LinkClick {
            destination: UrlParts {
                pathname: anchor.pathname(),
                querystring: anchor.search().trim_start_matches('?').to_string(),
                hash: anchor.hash().trim_start_matches('#').to_string(),
            },
            same_origin: anchor.origin() == page_origin,
            primary_button: event.button() == 0,
            modifier_key: event.meta_key() || event.ctrl_key() || event.shift_key() || event.alt_key(),
            target: (!target.is_empty()).then_some(target),
            download: anchor.has_attribute("download"),
            already_handled: event.default_prevented(),
        };
        if let Some(url) = link_navigation(&window_location(), &click) {
            event.prevent_default();
            on_navigate(url);
        }
    }) as Box<dyn FnMut(web_sys::MouseEvent)>);

    document
        .add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    click_closure.forget();
    Ok(())
}

impl Platform for WebPlatform {
    fn location(&self) -> UrlParts {
        window_location()
    }

    fn push_url(&self, url: &str, state: Option<&serde_json::Value>) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        if let Err(error) = history.push_state_with_url(&state_to_js(state), "", Some(url)) {
            log_error(&format!("pushState {url} failed: {}", js_error(error)));
        }
    }

    fn replace_url(&self, url: &str, state: Option<&serde_json::Value>) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        if let Err(error) = history.replace_state_with_url(&state_to_js(state), "", Some(url)) {
            log_error(&format!("replaceState {url} failed: {}", js_error(error)));
        }
    }

    fn assign_hash(&self, hash: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(error) = window.location().set_hash(&format!("#{hash}")) {
                log_error(&format!("setting hash #{hash} failed: {}", js_error(error)));
            }
        }
    }

    fn document_title(&self) -> String {
        web_sys::window()
            .and_then(|window| window.document())
            .map(|document| document.title())
            .unwrap_or_default()
    }

    fn set_document_title(&self, title: &str) {
        if let Some(document) = web_sys::window().and_then(|window| window.document()) {
            document.set_title(title);
        }
    }

    fn collapse_navigation_menu(&self) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        if let Ok(Some(menu)) = document.query_selector(&self.navigation_menu_selector) {
            if let Err(error) = menu.class_list().remove_1(&self.navigation_menu_open_class) {
                log_error(&format!("collapsing navigation menu failed: {}", js_error(error)));
            }
        }
    }

    fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, Result<serde_json::Value, FetchError>> {
        let url = url.to_string();
        async move {
            let window =
                web_sys::window().ok_or_else(|| FetchError::Network("window not available".to_string()))?;
            let response = JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|error| FetchError::Network(js_error(error)))?;
            let response: web_sys::Response = response
                .dyn_into()
                .map_err(|error| FetchError::Network(js_error(error)))?;
            if !response.ok() {
                return Err(FetchError::Status(response.status()));
            }
            let body = response
                .json()
                .map_err(|error| FetchError::Decode(js_error(error)))?;
            let json = JsFuture::from(body)
                .await
                .map_err(|error| FetchError::Decode(js_error(error)))?;
            serde_wasm_bindgen::from_value(json).map_err(|error| FetchError::Decode(error.to_string()))
        }
        .boxed_local()
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        Task::start(future);
    }

    fn register_service_worker(&self, script_url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false);
        if !supported {
            log_navigation("service workers unsupported; skipping registration");
            return;
        }
        let registration = navigator.service_worker().register(script_url);
        let script_url = script_url.to_string();
        Task::start(async move {
            match JsFuture::from(registration).await {
                Ok(_) => log_navigation(&format!("service worker {script_url} registered")),
                Err(error) => log_error(&format!(
                    "service worker {script_url} registration failed: {}",
                    js_error(error)
                )),
            }
        });
    }
}
