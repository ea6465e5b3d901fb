use super::RouteError;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

pub const CATCH_ALL: &str = "*";

#[derive(Debug, Clone)]
enum ParamKey {
    Named(String),
    /// Wildcards are keyed by position, `"0"`, `"1"`, ...
    Wildcard(usize),
}

impl ParamKey {
    fn as_key(&self) -> String {
        match self {
            ParamKey::Named(name) => name.clone(),
            ParamKey::Wildcard(index) => index.to_string(),
        }
    }
}

/// Compiled path template such as `/events/:year` or `/search*`.
///
/// Matching is case-insensitive and tolerates one trailing slash.
/// `:name` captures a single non-empty segment and `*` captures any
/// remainder, including nothing.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    keys: Vec<ParamKey>,
}

impl RoutePattern {
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        let template = source.strip_suffix('/').unwrap_or(source);

        let mut expression = String::from("^");
        let mut keys = Vec::new();
        let mut literal = String::new();
        let mut wildcards = 0;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ':' => {
                    expression.push_str(&regex::escape(&literal));
                    literal.clear();

                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            name.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return Err(RouteError::UnnamedParameter {
                            pattern: source.to_string(),
                        });
                    }
                    expression.push_str("([^/]+?)");
                    keys.push(ParamKey::Named(name));
                }
                '*' => {
                    expression.push_str(&regex::escape(&literal));
                    literal.clear();
                    expression.push_str("(.*)");
                    keys.push(ParamKey::Wildcard(wildcards));
                    wildcards += 1;
                }
                other => literal.push(other),
            }
        }
        expression.push_str(&regex::escape(&literal));
        expression.push_str("/?$");

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(true)
            .build()
            .map_err(|source_error| RouteError::InvalidPattern {
                pattern: source.to_string(),
                source: source_error,
            })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            keys,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_catch_all(&self) -> bool {
        self.source == CATCH_ALL
    }

    /// Match `pathname` and return the bound parameters, percent-decoded.
    pub fn captures(&self, pathname: &str) -> Option<IndexMap<String, String>> {
        let captures = self.regex.captures(pathname)?;
        let params = self
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let raw = captures.get(index + 1).map_or("", |m| m.as_str());
                let value = urlencoding::decode(raw)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                (key.as_key(), value)
            })
            .collect();
        Some(params)
    }
}
