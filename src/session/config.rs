//! Session Config

use std::time::Duration;

/// Default bound on a single gateway call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Cart session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on every gateway call; expiry is a failure, never a not-found.
    pub call_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}
