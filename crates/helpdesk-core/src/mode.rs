//! One-way live/mock switch shared by the external-service wrappers.
//!
//! Each wrapper owns its own `BackendMode`. It starts live only when the
//! wrapper was configured with real credentials and flips to mock on the
//! first unhandled failure of the live backend. There is no way back.

use std::sync::atomic::{AtomicBool, Ordering};

/// Backend mode flag owned by a single service wrapper.
#[derive(Debug)]
pub struct BackendMode {
    mock: AtomicBool,
}

impl BackendMode {
    /// Start in live mode.
    pub fn live() -> Self {
        Self {
            mock: AtomicBool::new(false),
        }
    }

    /// Start in mock mode.
    pub fn mock() -> Self {
        Self {
            mock: AtomicBool::new(true),
        }
    }

    /// Whether the wrapper must use its mock code path.
    pub fn is_mock(&self) -> bool {
        self.mock.load(Ordering::Acquire)
    }

    /// Switch to mock mode permanently.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// callers can log the trip once even under concurrent failures.
    pub fn trip(&self) -> bool {
        !self.mock.swap(true, Ordering::AcqRel)
    }
}

impl Default for BackendMode {
    fn default() -> Self {
        Self::mock()
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_mock() { "mock" } else { "live" })
    }
}
