//! Time source used by the caches and refresh services.

use chrono::{DateTime, Utc};

/// Supplies the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Manually advanced clock for expiry tests.

    use super::Clock;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use std::sync::Mutex;

    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub const fn at(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Advance the clock by `delta`.
        pub fn advance(&self, delta: TimeDelta) {
            let mut now = self
                .now
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *now += delta;
        }

        pub fn set(&self, at: DateTime<Utc>) {
            *self
                .now
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner) = at;
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::at(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            )
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self
                .now
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}
