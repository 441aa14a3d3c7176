//! Route parameter parsing and canonical encoding.
//!
//! [`RouteParams`] holds the `key=value` pairs carried by the query portion
//! of a hash fragment (e.g. `#/quizReview?id=t1&repIndex=2`). Unlike a
//! general-purpose query map it is:
//!
//! - **single-valued** — a duplicate key overwrites the earlier value
//!   (last wins), because the fragment grammar carries identifiers and
//!   discriminators, never value lists;
//! - **ordered** — backed by a `BTreeMap` so that
//!   [`to_query_string`](RouteParams::to_query_string) is deterministic.
//!   `navigate_to` and the canonicalizer both rely on this: the same
//!   `{view, params}` pair must always encode to the same fragment.
//!
//! # Example
//!
//! ```
//! use hashnav::RouteParams;
//!
//! let params = RouteParams::from_query_string("repIndex=2&id=t1");
//! assert_eq!(params.get("id"), Some(&"t1".to_string()));
//! assert_eq!(params.get_as::<usize>("repIndex"), Some(2));
//! // Deterministic: keys serialize in sorted order.
//! assert_eq!(params.to_query_string(), "id=t1&repIndex=2");
//! ```

use std::collections::BTreeMap;

/// Parameters parsed from the query portion of a fragment.
///
/// # Example
///
/// ```
/// use hashnav::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.set("id", "t1");
/// params.set("repIndex", "2");
///
/// assert_eq!(params.get("id"), Some(&"t1".to_string()));
/// assert_eq!(params.get_as::<u32>("repIndex"), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: BTreeMap<String, String>,
}

impl RouteParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a raw query string (`key=value&key=value`).
    ///
    /// Duplicate keys: last wins. Pairs without `=` are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use hashnav::RouteParams;
    ///
    /// let params = RouteParams::from_query_string("type=due&type=history");
    /// assert_eq!(params.get("type"), Some(&"history".to_string()));
    /// ```
    pub fn from_query_string(query: &str) -> Self {
        let mut params = BTreeMap::new();

        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                let key = decode_uri_component(key);
                let value = decode_uri_component(value);
                params.insert(key, value);
            }
        }

        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type.
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Set a parameter, overwriting any earlier value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Remove a parameter, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge two parameter sets; `overriding` wins on key collision.
    ///
    /// The deep-link reconciler uses this to merge an inbound URL's query
    /// parameters with its fragment parameters (fragment takes precedence).
    ///
    /// # Example
    ///
    /// ```
    /// use hashnav::RouteParams;
    ///
    /// let query = RouteParams::from_query_string("code=abc&state=xyz");
    /// let fragment = RouteParams::from_query_string("code=def");
    ///
    /// let merged = RouteParams::merge(&query, &fragment);
    /// assert_eq!(merged.get("code"), Some(&"def".to_string()));
    /// assert_eq!(merged.get("state"), Some(&"xyz".to_string()));
    /// ```
    pub fn merge(base: &RouteParams, overriding: &RouteParams) -> RouteParams {
        let mut merged = base.clone();
        for (key, value) in overriding.iter() {
            merged.set(key.clone(), value.clone());
        }
        merged
    }

    /// Serialize into a canonical query string.
    ///
    /// Keys appear in sorted order, so equal parameter sets always produce
    /// equal strings.
    ///
    /// # Example
    ///
    /// ```
    /// use hashnav::RouteParams;
    ///
    /// let mut params = RouteParams::new();
    /// params.set("repIndex", "2");
    /// params.set("id", "t1");
    /// assert_eq!(params.to_query_string(), "id=t1&repIndex=2");
    /// ```
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_uri_component(key),
                    encode_uri_component(value)
                )
            })
            .collect();

        pairs.join("&")
    }
}

/// Simple URI component encoding (encode special characters)
pub(crate) fn encode_uri_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => c.to_string(),
            ' ' => "%20".to_string(),
            _ => format!("%{:02X}", c as u8),
        })
        .collect()
}

/// Simple URI component decoding
pub(crate) fn decode_uri_component(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            // Try to decode hex pair
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
