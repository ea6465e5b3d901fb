//! `window.obraHacks`: the hooks page markup calls into.

use crate::app::ObraApp;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static PAGE_API_APP: RefCell<Option<Rc<ObraApp>>> = const { RefCell::new(None) };
}

pub fn store_page_api_app(app: Rc<ObraApp>) {
    PAGE_API_APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
}

fn with_app<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&ObraApp) -> R,
{
    PAGE_API_APP.with(|cell| cell.borrow().as_deref().map(f))
}

pub fn expose_page_api() {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let api = js_sys::Object::new();

    let submit_search_closure =
        Closure::wrap(Box::new(submit_search_impl) as Box<dyn Fn(String)>);
    js_sys::Reflect::set(
        &api,
        &"submitSearch".into(),
        submit_search_closure.as_ref().unchecked_ref(),
    )
    .ok();
    submit_search_closure.forget();

    let change_active_panel_closure =
        Closure::wrap(Box::new(change_active_panel_impl) as Box<dyn Fn(String)>);
    js_sys::Reflect::set(
        &api,
        &"changeActivePanel".into(),
        change_active_panel_closure.as_ref().unchecked_ref(),
    )
    .ok();
    change_active_panel_closure.forget();

    let get_page_state_closure =
        Closure::wrap(Box::new(get_page_state_impl) as Box<dyn Fn() -> JsValue>);
    js_sys::Reflect::set(
        &api,
        &"getPageState".into(),
        get_page_state_closure.as_ref().unchecked_ref(),
    )
    .ok();
    get_page_state_closure.forget();

    js_sys::Reflect::set(&window, &"obraHacks".into(), &api).ok();
}

/// `query_string` is the serialized search form.
fn submit_search_impl(query_string: String) {
    with_app(|app| app.submit_search(&query_string));
}

fn change_active_panel_impl(name: String) {
    with_app(|app| app.change_active_panel(&name));
}

fn get_page_state_impl() -> JsValue {
    with_app(|app| {
        let store = &app.store;
        let obj = js_sys::Object::new();
        let location = store.page_location.get_cloned();
        let active_panel = store.active_panel.get_cloned();

        js_sys::Reflect::set(
            &obj,
            &"pageLocation".into(),
            &location.map(JsValue::from).unwrap_or(JsValue::NULL),
        )
        .ok();
        js_sys::Reflect::set(
            &obj,
            &"pageTemplate".into(),
            &store.page_template.lock_ref().as_str().into(),
        )
        .ok();
        js_sys::Reflect::set(
            &obj,
            &"activePanel".into(),
            &active_panel.map(JsValue::from).unwrap_or(JsValue::NULL),
        )
        .ok();

        obj.into()
    })
    .unwrap_or(JsValue::NULL)
}
