//! Double-hash URL detection and repair.
//!
//! Some OAuth providers append their own `#access_token=...` fragment to a
//! redirect URL that already ends in the application's `#/auth/callback`
//! fragment, producing two `#` characters in one URL. The fragment
//! convention drops the second `#` and everything after it, so the token
//! payload would be lost — and naive re-processing can recurse.
//!
//! Repair rewrites the trailing token pairs into the `?query` portion of
//! the first segment:
//!
//! `#/auth/callback#access_token=x` → `#/auth/callback?access_token=x`
//!
//! The pure core is [`clean_fragment`]; [`run`] applies it to the ambient
//! fragment through [`FragmentIO`], preferring a history-replace and
//! falling back to direct assignment. Both are idempotent, and the router
//! invokes [`run`] unconditionally at boot and at the start of every
//! route-change pass — a second malformed redirect can arrive at any time
//! (e.g. the password-recovery flow).

use crate::host::FragmentIO;
use crate::{debug_log, info_log};

/// Literal route marker of the auth callback, as it appears in a raw hash.
pub const AUTH_CALLBACK_MARKER: &str = "#/auth/callback";

/// Detect the malformed double-hash shape.
///
/// Matches when the hash contains the auth-callback route marker and either
/// a second `#` occurs after the marker or the hash carries two or more `#`
/// characters in total.
pub fn is_double_hash(hash: &str) -> bool {
    let Some(marker_pos) = hash.find(AUTH_CALLBACK_MARKER) else {
        return false;
    };

    if hash.matches('#').count() >= 2 {
        return true;
    }
    hash[marker_pos + AUTH_CALLBACK_MARKER.len()..].contains('#')
}

/// Repair a double-hash fragment, or return `None` if it is already clean.
///
/// Everything after the second `#` is treated as raw `key=value` pairs and
/// re-encoded as query parameters on the first segment. Any further `#`
/// characters in the trailing portion are treated as additional pair
/// separators, so the result never contains a `#` after the first one —
/// which is what makes the repair idempotent.
///
/// # Examples
///
/// ```
/// use hashnav::sanitize::clean_fragment;
///
/// let cleaned = clean_fragment("#/auth/callback#access_token=x&type=recovery");
/// assert_eq!(cleaned.as_deref(), Some("#/auth/callback?access_token=x&type=recovery"));
///
/// // Already clean: no-op.
/// assert_eq!(clean_fragment("#/auth/callback?code=abc"), None);
///
/// // Idempotent.
/// let once = clean_fragment("#/auth/callback#a=1").unwrap();
/// assert_eq!(clean_fragment(&once), None);
/// ```
pub fn clean_fragment(hash: &str) -> Option<String> {
    if !is_double_hash(hash) {
        return None;
    }

    let first = hash.find('#')?;
    let second = hash[first + 1..].find('#')? + first + 1;

    let head = &hash[..second];
    let trailing = hash[second + 1..].replace('#', "&");

    if trailing.is_empty() {
        return Some(head.to_string());
    }

    let separator = if head.contains('?') { '&' } else { '?' };
    Some(format!("{}{}{}", head, separator, trailing))
}

/// Sanitize the ambient fragment in place.
///
/// Reads the live fragment, and if it is malformed rewrites it via
/// history-replace — falling back to direct assignment when the host
/// rejects history writes. Returns `true` if a rewrite happened.
pub fn run<H: FragmentIO>(io: &mut H) -> bool {
    let hash = io.read();
    let Some(cleaned) = clean_fragment(&hash) else {
        return false;
    };

    info_log!("Repairing double-hash fragment ({} chars)", hash.len());
    if let Err(err) = io.write(&cleaned, true) {
        debug_log!("History replace unavailable, assigning directly: {}", err);
        io.assign(&cleaned);
    }
    true
}
