use std::sync::Arc;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Source of "now" for everything that compares against the current date.
pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> PrimitiveDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }
}

pub(crate) type SharedClock = Arc<dyn Clock>;

/// Reads the local wall clock, falling back to UTC
/// when the local offset can't be determined.
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

#[cfg(test)]
#[derive(Debug, Copy, Clone)]
pub(crate) struct FixedClock(pub(crate) PrimitiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}
