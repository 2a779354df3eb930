//! Wall-clock abstraction
//!
//! Signed headers and unauthorized notifications carry epoch-millisecond
//! timestamps. Reading the clock through [`Clock`] lets tests pin them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for wall-clock reads
pub trait Clock: Send + Sync {
    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get milliseconds since UNIX epoch
    fn millis_since_epoch(&self) -> i64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }
}
