//! Recording platform for native tests.
//!
//! Tasks run on a `LocalPool` the test drives with `run_until_stalled`.
//! Fetches stay in flight until the test serves or completes them.

use crate::api::FetchError;
use crate::platform::Platform;
use crate::routing::{UrlParts, split_url};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use futures::FutureExt;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

type FetchResult = Result<Value, FetchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Push(String),
    Replace(String),
    Hash(String),
}

pub struct TestPlatform {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    location: RefCell<UrlParts>,
    history: RefCell<Vec<HistoryEntry>>,
    title: RefCell<String>,
    fetches: RefCell<Vec<String>>,
    served: RefCell<HashMap<String, FetchResult>>,
    in_flight: RefCell<HashMap<String, Vec<oneshot::Sender<FetchResult>>>>,
    menu_collapses: Cell<usize>,
    service_workers: RefCell<Vec<String>>,
}

impl TestPlatform {
    pub fn new(initial_url: &str) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            location: RefCell::new(split_url(initial_url)),
            history: RefCell::new(Vec::new()),
            title: RefCell::new("OBRA Hacks".to_string()),
            fetches: RefCell::new(Vec::new()),
            served: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(HashMap::new()),
            menu_collapses: Cell::new(0),
            service_workers: RefCell::new(Vec::new()),
        }
    }

    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Answer current and future fetches of `url` with `result`.
    pub fn serve(&self, url: &str, result: FetchResult) {
        self.served.borrow_mut().insert(url.to_string(), result.clone());
        self.complete(url, result);
    }

    pub fn serve_json(&self, url: &str, body: Value) {
        self.serve(url, Ok(body));
    }

    /// Answer only the fetches of `url` already in flight.
    pub fn complete(&self, url: &str, result: FetchResult) {
        let senders = self.in_flight.borrow_mut().remove(url).unwrap_or_default();
        for sender in senders {
            let _ = sender.send(result.clone());
        }
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }

    pub fn clear_fetches(&self) {
        self.fetches.borrow_mut().clear();
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.borrow().clone()
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn menu_collapses(&self) -> usize {
        self.menu_collapses.get()
    }

    pub fn service_workers(&self) -> Vec<String> {
        self.service_workers.borrow().clone()
    }

    /// Move the address bar as the browser would on back/forward.
    pub fn set_location(&self, url: &str) {
        *self.location.borrow_mut() = split_url(url);
    }
}

impl Platform for TestPlatform {
    fn location(&self) -> UrlParts {
        self.location.borrow().clone()
    }

    fn push_url(&self, url: &str, _state: Option<&Value>) {
        self.set_location(url);
        self.history.borrow_mut().push(HistoryEntry::Push(url.to_string()));
    }

    fn replace_url(&self, url: &str, _state: Option<&Value>) {
        self.set_location(url);
        self.history.borrow_mut().push(HistoryEntry::Replace(url.to_string()));
    }

    fn assign_hash(&self, hash: &str) {
        self.location.borrow_mut().hash = hash.to_string();
        self.history.borrow_mut().push(HistoryEntry::Hash(hash.to_string()));
    }

    fn document_title(&self) -> String {
        self.title()
    }

    fn set_document_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn collapse_navigation_menu(&self) {
        self.menu_collapses.set(self.menu_collapses.get() + 1);
    }

    fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, FetchResult> {
        self.fetches.borrow_mut().push(url.to_string());
        if let Some(result) = self.served.borrow().get(url) {
            return future::ready(result.clone()).boxed_local();
        }
        let (sender, receiver) = oneshot::channel();
        self.in_flight
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push(sender);
        receiver
            .map(|result| result.unwrap_or_else(|_| Err(FetchError::Network("request dropped".to_string()))))
            .boxed_local()
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(future)
            .expect("test pool accepts tasks");
    }

    fn register_service_worker(&self, script_url: &str) {
        self.service_workers.borrow_mut().push(script_url.to_string());
    }
}
