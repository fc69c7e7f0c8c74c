//! Test data factories for reducing test setup boilerplate.
//!
//! # Usage
//!
//! ```rust
//! use common::factories::{PersonFactory, raw_legislator};
//!
//! let senator = PersonFactory::senator("CA").with_name("Alex", "Padilla").build();
//! let raw = raw_legislator("P000145", "sen", "CA");
//! ```

mod person;
mod raw;

pub use person::PersonFactory;
pub use raw::{raw_committee, raw_governor, raw_legislator, sponsorship_csv};

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique test data.
/// Each call to `next_id()` returns a unique value across all tests.
static FACTORY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Returns a unique ID for generating test data.
/// Thread-safe and guaranteed unique within a test run.
pub fn next_id() -> u64 {
    FACTORY_COUNTER.fetch_add(1, Ordering::SeqCst)
}
