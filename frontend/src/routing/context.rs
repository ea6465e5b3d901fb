use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlParts {
    pub pathname: String,
    /// Query string without the leading `?`.
    pub querystring: String,
    /// Fragment without the leading `#`.
    pub hash: String,
}

impl UrlParts {
    /// Pathname plus query string, the part the router dispatches on.
    pub fn path(&self) -> String {
        if self.querystring.is_empty() {
            self.pathname.clone()
        } else {
            format!("{}?{}", self.pathname, self.querystring)
        }
    }

    pub fn to_url(&self) -> String {
        if self.hash.is_empty() {
            self.path()
        } else {
            format!("{}#{}", self.path(), self.hash)
        }
    }
}

/// Split an app-relative URL into pathname, query string and fragment.
pub fn split_url(url: &str) -> UrlParts {
    let (before_hash, hash) = url.split_once('#').unwrap_or((url, ""));
    let (pathname, querystring) = before_hash.split_once('?').unwrap_or((before_hash, ""));
    let pathname = if pathname.is_empty() {
        "/".to_string()
    } else if pathname.starts_with('/') {
        pathname.to_string()
    } else {
        format!("/{pathname}")
    };
    UrlParts {
        pathname,
        querystring: querystring.to_string(),
        hash: hash.to_string(),
    }
}

/// Per-dispatch value handed to every matching route handler.
///
/// Built fresh by each dispatch and dropped once the chain ends; the
/// catch-all keeps a copy in the store for templates.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationContext {
    pub path: String,
    pub pathname: String,
    pub querystring: String,
    pub hash: String,
    pub params: IndexMap<String, String>,
    pub state: Option<serde_json::Value>,
    pub dispatch_id: u64,
    /// Pathnames that redirected, in order, to reach this navigation.
    pub redirect_chain: Vec<String>,
}

impl NavigationContext {
    pub fn new(
        url: &str,
        state: Option<serde_json::Value>,
        dispatch_id: u64,
        redirect_chain: Vec<String>,
    ) -> Self {
        let parts = split_url(url);
        Self {
            path: parts.path(),
            pathname: parts.pathname,
            querystring: parts.querystring,
            hash: parts.hash,
            params: IndexMap::new(),
            state,
            dispatch_id,
            redirect_chain,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Chain to attach to a redirect issued from this navigation.
    pub fn redirect_origin(&self) -> Vec<String> {
        let mut chain = self.redirect_chain.clone();
        chain.push(self.pathname.clone());
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_url_separates_query_and_hash() {
        let parts = split_url("/search?name=ann&team=x#road");
        assert_eq!(parts.pathname, "/search");
        assert_eq!(parts.querystring, "name=ann&team=x");
        assert_eq!(parts.hash, "road");
        assert_eq!(parts.path(), "/search?name=ann&team=x");
        assert_eq!(parts.to_url(), "/search?name=ann&team=x#road");
    }

    #[test]
    fn split_url_normalizes_empty_pathname() {
        assert_eq!(split_url("").pathname, "/");
        assert_eq!(split_url("#top").pathname, "/");
        assert_eq!(split_url("ranks").pathname, "/ranks");
    }

    #[test]
    fn redirect_origin_appends_current_pathname() {
        let context = NavigationContext::new("/event/9", None, 3, vec!["/events/1999".to_string()]);
        assert_eq!(context.redirect_origin(), vec!["/events/1999", "/event/9"]);
    }
}
