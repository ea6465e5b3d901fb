use super::pattern::RoutePattern;
use super::{NavigationContext, RouteError};
use crate::logging::log_navigation;
use std::rc::Rc;

/// Outcome of one route handler.
#[must_use = "the router needs to know whether later routes run"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Continue,
    /// Stop the chain here. Used when a handler redirects or owns the page alone.
    Halt,
}

pub type RouteHandler = Rc<dyn Fn(&mut NavigationContext) -> Next>;

struct Route {
    pattern: RoutePattern,
    handler: RouteHandler,
}

/// Ordered list of patterns bound to handlers, catch-all last.
pub struct Router {
    routes: Vec<Route>,
}

#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<(String, RouteHandler)>,
}

impl RouterBuilder {
    pub fn route(
        mut self,
        pattern: &str,
        handler: impl Fn(&mut NavigationContext) -> Next + 'static,
    ) -> Self {
        self.routes.push((pattern.to_string(), Rc::new(handler)));
        self
    }

    pub fn build(self) -> Result<Router, RouteError> {
        let mut routes = Vec::with_capacity(self.routes.len());
        for (source, handler) in self.routes {
            let pattern = RoutePattern::parse(&source)?;
            if let Some(previous) = routes.last().map(|route: &Route| &route.pattern) {
                if previous.is_catch_all() {
                    return Err(RouteError::CatchAllNotLast { pattern: source });
                }
            }
            routes.push(Route { pattern, handler });
        }

        match routes.last() {
            Some(route) if route.pattern.is_catch_all() => Ok(Router { routes }),
            _ => Err(RouteError::MissingCatchAll),
        }
    }
}

/// Which patterns ran for one dispatch, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub executed: Vec<String>,
    pub halted_by: Option<String>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.pattern.source())
    }

    /// Run every matching handler in registration order until one halts.
    ///
    /// Parameters accumulate along the chain, so the catch-all still sees
    /// what earlier patterns bound.
    ///
    /// Never suspends: handlers only start asynchronous work.
    pub fn dispatch(&self, mut context: NavigationContext) -> DispatchReport {
        let mut report = DispatchReport::default();

        for route in &self.routes {
            let Some(params) = route.pattern.captures(&context.pathname) else {
                continue;
            };
            context.params.extend(params);
            report.executed.push(route.pattern.source().to_string());

            if (route.handler)(&mut context) == Next::Halt {
                report.halted_by = Some(route.pattern.source().to_string());
                break;
            }
        }

        log_navigation(&format!(
            "dispatch #{} {} -> {:?}{}",
            context.dispatch_id,
            context.path,
            report.executed,
            report
                .halted_by
                .as_deref()
                .map(|pattern| format!(" (halted by {pattern})"))
                .unwrap_or_default()
        ));
        report
    }
}
