//! Congress.gov API client module.
//!
//! Provides an HTTP client abstraction for a member's sponsored and
//! cosponsored legislation lists.
//!
//! # Architecture
//!
//! The module uses a trait-based design for testability:
//!
//! - [`CongressApiClient`] - Trait defining API operations
//! - [`HttpCongressClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockCongressClient`] - Queued-response mock (behind `test-utils` feature)
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! ```ignore
//! use civicdata_api::congress::mock::MockCongressClient;
//!
//! let mock = MockCongressClient::new();
//! mock.push_sponsored(Ok(LegislationPage { .. }));
//! mock.push_cosponsored(Err(CongressApiError::RateLimited));
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! ```ignore
//! let server = MockHttpServer::start().await;
//! server
//!     .expect_get("/member/P000145/sponsored-legislation")
//!     .with_header("X-API-Key", "test-key")
//!     .respond_with_json(json!({"pagination": {"count": 0}, "sponsoredLegislation": []}))
//!     .mount()
//!     .await;
//!
//! let client = HttpCongressClient::new(server.url(), "test-key");
//! ```

mod client;
mod types;

pub use client::{CongressApiClient, CongressApiError, HttpCongressClient};
pub use types::{Bill, LegislationKind, LegislationPage, Pagination};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
