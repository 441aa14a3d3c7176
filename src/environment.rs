//! Hosting-context classification.
//!
//! Write access to history APIs and the reliability of fragment-change
//! notifications differ per host, so the router probes the context before
//! relying on either. Classification runs once per boot and once per
//! hardware-back request — the context can change if the app is reloaded
//! into a different host.
//!
//! Two binary decisions come out of the classification:
//!
//! - [`trust_history_api`](Environment::trust_history_api) — whether
//!   history push/replace can be attempted at all, or every write must go
//!   through direct fragment assignment;
//! - [`should_poll`](Environment::should_poll) — whether to run the
//!   low-frequency fragment-polling fallback. Only ever enabled on
//!   localhost; production hosts are assumed to reliably emit the native
//!   change notification.

use crate::host::HostInfo;

/// Protocols under which history mutation is known to be blocked.
const SANDBOX_PROTOCOLS: &[&str] = &["blob:", "about:", "data:"];

/// Hostnames that identify a local development server.
const LOCAL_HOSTNAMES: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "[::1]"];

/// The classified hosting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// A production browser host with working history APIs.
    Normal,
    /// A local development server; change notifications may be flaky.
    Localhost,
    /// A sandboxed iframe / blob preview; history mutation is blocked.
    Sandboxed,
}

impl Environment {
    /// Classify the host from a probed [`HostInfo`].
    pub fn classify(info: &HostInfo) -> Self {
        if SANDBOX_PROTOCOLS.contains(&info.protocol.as_str())
            || info.origin == "null"
            || info.embedded
        {
            return Environment::Sandboxed;
        }

        if LOCAL_HOSTNAMES.contains(&info.hostname.as_str())
            || info.hostname.ends_with(".localhost")
        {
            return Environment::Localhost;
        }

        Environment::Normal
    }

    /// Whether history push/replace may be attempted.
    ///
    /// Sandboxed hosts throw on history mutation; everything there goes
    /// through direct fragment assignment instead.
    pub fn trust_history_api(self) -> bool {
        !matches!(self, Environment::Sandboxed)
    }

    /// Whether to run the fragment-polling fallback.
    pub fn should_poll(self) -> bool {
        matches!(self, Environment::Localhost)
    }
}
