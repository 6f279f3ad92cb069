//! Navigation targets and the navigator collaborator

use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// A navigation target: path plus query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Split a full path such as `/login?redirect=%2Fusers` into its parts
    pub fn parse(full_path: &str) -> Self {
        match full_path.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect(),
            },
            None => Self::new(full_path),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Login page carrying the page to return to
    pub fn login(login_path: &str, redirect_param: &str, return_to: &str) -> Self {
        Self::new(login_path).with_query(redirect_param, return_to)
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Path with the encoded query string
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<&str> for Location {
    fn from(full_path: &str) -> Self {
        Self::parse(full_path)
    }
}

/// Browser-history side of the router
pub trait Navigator: Send + Sync {
    /// Full path of the page currently shown
    fn current_path(&self) -> String;

    /// Replace the current history entry with `location`
    fn replace(&self, location: Location);
}
