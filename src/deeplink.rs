//! Deep-link reconciliation.
//!
//! Authentication callbacks arrive in three different shapes that must all
//! resolve to the same canonical internal route (`#/auth/callback` plus
//! carried parameters):
//!
//! 1. a web redirect whose **query** carries `code=` or `error=`
//!    (standard PKCE flow);
//! 2. a redirect whose **fragment** carries `access_token=`,
//!    `refresh_token=`, `type=magiclink`, `type=recovery`, or
//!    `error_description=` (implicit / magic-link flow);
//! 3. a native-shell "app opened via URL" event whose path contains
//!    `auth/callback`, whose host equals the reserved custom-scheme
//!    marker, or whose query/fragment contains the token markers above.
//!
//! [`classify`] merges query and fragment parameters (fragment wins on
//! collision), discards everything else from the inbound URL, and emits
//! the canonical fragment. Deep-link payloads are untrusted external
//! input: a URL that fails to parse is logged and treated as *no auth
//! signal* — boot proceeds normally, nothing panics.

use url::Url;

use crate::params::RouteParams;
use crate::warn_log;

/// Reserved host marker for custom-scheme callbacks
/// (e.g. `studyapp://auth-callback?code=...`).
pub const CUSTOM_SCHEME_HOST: &str = "auth-callback";

/// Path marker identifying an auth callback in web URLs.
const CALLBACK_PATH_MARKER: &str = "auth/callback";

/// Fragment keys that signal a token-carrying callback.
const TOKEN_KEYS: &[&str] = &["access_token", "refresh_token", "error_description"];

/// `type` values that signal a magic-link or recovery callback.
const CALLBACK_TYPES: &[&str] = &["magiclink", "recovery"];

/// A classified auth callback, reduced to its canonical internal route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCallback {
    /// The canonical fragment, e.g. `#/auth/callback?code=abc123`.
    pub fragment: String,
    /// The merged parameters carried by the callback.
    pub params: RouteParams,
}

impl AuthCallback {
    /// Whether this callback belongs to the password-recovery flow.
    pub fn is_recovery(&self) -> bool {
        self.params.get("type").map(String::as_str) == Some("recovery")
    }
}

/// Classify a raw inbound URL as an auth callback, or `None`.
///
/// # Examples
///
/// ```
/// use hashnav::deeplink::classify;
///
/// // PKCE query shape and implicit fragment shape classify identically.
/// let a = classify("https://app.example.com/?code=abc123").unwrap();
/// let b = classify("https://app.example.com/#access_token=abc123").unwrap();
/// assert!(a.fragment.starts_with("#/auth/callback"));
/// assert!(b.fragment.starts_with("#/auth/callback"));
///
/// // Ordinary URLs carry no signal.
/// assert!(classify("https://app.example.com/#/list/due").is_none());
///
/// // Malformed input is absence of signal, never a panic.
/// assert!(classify("not a url").is_none());
/// ```
pub fn classify(raw: &str) -> Option<AuthCallback> {
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn_log!("Deep link failed to parse, ignoring: {}", err);
            return None;
        }
    };

    let query_params = query_pairs(&parsed);
    let fragment_params = fragment_pairs(parsed.fragment().unwrap_or(""));

    let query_signal = query_params.contains("code") || query_params.contains("error");
    let fragment_signal = TOKEN_KEYS.iter().any(|key| fragment_params.contains(key))
        || fragment_params
            .get("type")
            .is_some_and(|ty| CALLBACK_TYPES.contains(&ty.as_str()));
    let native_signal = parsed.path().contains(CALLBACK_PATH_MARKER)
        || parsed.host_str() == Some(CUSTOM_SCHEME_HOST);

    if !query_signal && !fragment_signal && !native_signal {
        return None;
    }

    // Fragment parameters take precedence on key collision.
    let params = RouteParams::merge(&query_params, &fragment_params);

    let fragment = if params.is_empty() {
        "#/auth/callback".to_string()
    } else {
        format!("#/auth/callback?{}", params.to_query_string())
    };

    Some(AuthCallback { fragment, params })
}

/// Collect the URL's query into parameters (duplicate keys: last wins).
fn query_pairs(url: &Url) -> RouteParams {
    let mut params = RouteParams::new();
    for (key, value) in url.query_pairs() {
        params.set(key.to_string(), value.to_string());
    }
    params
}

/// Collect `key=value` pairs from a raw fragment.
///
/// The fragment of a malformed redirect can itself contain the app's route
/// path and further `#` separators (`/auth/callback#access_token=...`), so
/// each `#`-separated chunk is inspected: its query portion if it has one,
/// otherwise the chunk itself. Later chunks win on key collision.
fn fragment_pairs(fragment: &str) -> RouteParams {
    let mut params = RouteParams::new();
    for chunk in fragment.split('#') {
        let pairs = match chunk.split_once('?') {
            Some((_, query)) => query,
            None => chunk,
        };
        if pairs.contains('=') {
            params = RouteParams::merge(&params, &RouteParams::from_query_string(pairs));
        }
    }
    params
}
