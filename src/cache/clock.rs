use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// The cache takes its notion of "now" from here so TTL behavior can be
/// exercised with a fixed clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
