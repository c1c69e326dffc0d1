//! Wall-clock port

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of the timestamps written into a `ScenarioReport`.
///
/// Step durations are measured on the tokio clock instead, so paused-time
/// tests stay deterministic no matter what this returns.
pub trait Clock: Send + Sync {
    /// Current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

impl<K: Clock + ?Sized> Clock for Arc<K> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
