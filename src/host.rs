//! The seam between the navigation core and its hosting environment.
//!
//! The fragment is the one shared, mutable resource in the system; it can be
//! rewritten by the application, by browser back/forward, by an OAuth
//! redirect, or by a native deep link. Wrapping the raw channel behind
//! [`FragmentIO`] keeps the rest of the core pure and testable without a
//! real host.
//!
//! Two traits split the seam by concern:
//!
//! - [`FragmentIO`] — read the live fragment, write it through the history
//!   API (fallible in sandboxed hosts), or assign it directly (infallible,
//!   always raises the host's change notification).
//! - [`HostProbe`] — expose [`HostInfo`] so the environment guard can
//!   classify the hosting context and the boot sequence can inspect the
//!   full inbound URL for deep-link signals.
//!
//! [`MemoryHost`] implements both in memory, for tests and headless use.

use crate::error::RouterError;

/// Snapshot of the hosting context, taken by [`HostProbe::host_info`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    /// Full current URL, including any fragment.
    pub href: String,
    /// URL scheme with trailing colon (`"https:"`, `"blob:"`).
    pub protocol: String,
    /// Hostname portion (`"app.example.com"`, `"localhost"`).
    pub hostname: String,
    /// Serialized origin; sandboxed frames commonly report `"null"`.
    pub origin: String,
    /// Whether the application runs inside an embedding frame.
    pub embedded: bool,
}

/// Read/write access to the ambient URL fragment.
///
/// `read` must return the live value, not a cached one: the router re-reads
/// it at the start of every pass because the fragment may have been mutated
/// again since the triggering event fired.
pub trait FragmentIO {
    /// Read the current fragment, including the leading `#` when non-empty.
    fn read(&self) -> String;

    /// Write the fragment through the history API.
    ///
    /// `replace` swaps the current history entry instead of pushing a new
    /// one. May fail in sandboxed hosts; callers fall back to
    /// [`assign`](Self::assign).
    fn write(&mut self, fragment: &str, replace: bool) -> Result<(), RouterError>;

    /// Assign the fragment directly.
    ///
    /// Always succeeds and always raises the host's native change
    /// notification.
    fn assign(&mut self, fragment: &str);
}

/// Access to host-context information for environment classification.
pub trait HostProbe {
    /// Probe the current hosting context.
    fn host_info(&self) -> HostInfo;
}

// ============================================================================
// MemoryHost
// ============================================================================

/// In-memory host double implementing [`FragmentIO`] + [`HostProbe`].
///
/// Used by the integration tests and usable by headless embeddings. History
/// writes can be made to fail to exercise the sandbox fallback path.
///
/// # Example
///
/// ```
/// use hashnav::{FragmentIO, MemoryHost};
///
/// let mut host = MemoryHost::new("https://study.example.com/");
/// host.assign("#/list/due");
/// assert_eq!(host.read(), "#/list/due");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHost {
    base: String,
    fragment: String,
    info: HostInfo,
    history_len: usize,
    reject_history_writes: bool,
    assign_count: usize,
}

impl MemoryHost {
    /// Create a host at the given base URL with an empty fragment.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let info = host_info_for(&base);
        Self {
            base,
            fragment: String::new(),
            info,
            history_len: 1,
            reject_history_writes: false,
            assign_count: 0,
        }
    }

    /// Create a host whose URL already carries a fragment (deep link, OAuth
    /// redirect, reload).
    pub fn with_fragment(base: impl Into<String>, fragment: impl Into<String>) -> Self {
        let mut host = Self::new(base);
        host.fragment = fragment.into();
        host
    }

    /// Make subsequent history writes fail, as a sandboxed host would.
    pub fn reject_history_writes(&mut self, reject: bool) {
        self.reject_history_writes = reject;
    }

    /// Mark the host as running inside an embedding frame.
    pub fn set_embedded(&mut self, embedded: bool) {
        self.info.embedded = embedded;
    }

    /// Number of history entries created so far.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Number of direct fragment assignments performed.
    pub fn assign_count(&self) -> usize {
        self.assign_count
    }
}

impl FragmentIO for MemoryHost {
    fn read(&self) -> String {
        self.fragment.clone()
    }

    fn write(&mut self, fragment: &str, replace: bool) -> Result<(), RouterError> {
        if self.reject_history_writes {
            return Err(RouterError::HistoryWrite {
                message: "history API unavailable in this host".to_string(),
            });
        }
        self.fragment = fragment.to_string();
        if !replace {
            self.history_len += 1;
        }
        Ok(())
    }

    fn assign(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
        self.history_len += 1;
        self.assign_count += 1;
    }
}

impl HostProbe for MemoryHost {
    fn host_info(&self) -> HostInfo {
        let mut info = self.info.clone();
        info.href = format!("{}{}", self.base, self.fragment);
        info
    }
}

/// Derive protocol / hostname / origin fields from a base URL string.
fn host_info_for(base: &str) -> HostInfo {
    match url::Url::parse(base) {
        Ok(parsed) => HostInfo {
            href: base.to_string(),
            protocol: format!("{}:", parsed.scheme()),
            hostname: parsed.host_str().unwrap_or_default().to_string(),
            origin: parsed.origin().ascii_serialization(),
            embedded: false,
        },
        Err(_) => HostInfo {
            href: base.to_string(),
            origin: "null".to_string(),
            ..HostInfo::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_host_read_write() {
        let mut host = MemoryHost::new("https://study.example.com/");
        assert_eq!(host.read(), "");

        host.write("#/list/due", false).unwrap();
        assert_eq!(host.read(), "#/list/due");
        assert_eq!(host.history_len(), 2);

        host.write("#/list/active", true).unwrap();
        assert_eq!(host.read(), "#/list/active");
        assert_eq!(host.history_len(), 2);
    }

    #[test]
    fn test_memory_host_rejects_when_sandboxed() {
        let mut host = MemoryHost::new("https://study.example.com/");
        host.reject_history_writes(true);

        let err = host.write("#/settings", false).unwrap_err();
        assert!(matches!(err, RouterError::HistoryWrite { .. }));
        assert_eq!(host.read(), "");

        // Direct assignment still works.
        host.assign("#/settings");
        assert_eq!(host.read(), "#/settings");
        assert_eq!(host.assign_count(), 1);
    }

    #[test]
    fn test_host_info_fields() {
        let host = MemoryHost::with_fragment("https://study.example.com/", "#/quiz?id=t1");
        let info = host.host_info();
        assert_eq!(info.protocol, "https:");
        assert_eq!(info.hostname, "study.example.com");
        assert_eq!(info.origin, "https://study.example.com");
        assert_eq!(info.href, "https://study.example.com/#/quiz?id=t1");
        assert!(!info.embedded);
    }
}
