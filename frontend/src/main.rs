//! OBRA Hacks frontend entry point

use std::rc::Rc;

mod api;
mod app;
mod config;
mod dataflow;
mod history;
mod links;
mod loader;
mod logging;
mod navigation;
mod page_api;
mod panels;
mod platform;
mod routes;
mod routing;
mod store;

use app::ObraApp;
use logging::log_error;
use platform::WebPlatform;
use platform::web::{intercept_link_clicks, listen_for_history_navigation};

pub fn main() {
    let config = config::load_client_config();
    logging::set_navigation_tracing(config.logging.navigation);

    let platform = Rc::new(WebPlatform::new(&config.ui));
    let app = match ObraApp::new(platform, config) {
        Ok(app) => Rc::new(app),
        Err(error) => {
            log_error(&format!("route table rejected: {error}"));
            return;
        }
    };

    if let Err(error) = listen_for_history_navigation({
        let app = app.clone();
        move |event| {
            app.on_native_history_navigation(event);
        }
    }) {
        log_error(&format!("back/forward handling unavailable: {error}"));
    }
    if let Err(error) = intercept_link_clicks({
        let app = app.clone();
        move |url| app.navigate(url)
    }) {
        log_error(&format!("link interception unavailable: {error}"));
    }

    app.start();

    page_api::store_page_api_app(app);
    page_api::expose_page_api();
}
