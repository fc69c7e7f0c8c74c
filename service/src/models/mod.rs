//! Domain documents and API response types.
//!
//! Everything here is a plain serde type with a `ToSchema` derive so the same
//! structs back the store documents, the REST responses and the `OpenAPI` document.

pub mod committee;
pub mod legislation;
pub mod media;
pub mod person;

pub use committee::{
    Committee, CommitteeAssignment, CommitteeMember, CommitteeMembership, PersonCommittees,
    Subcommittee,
};
pub use legislation::{
    Bill, LatestAction, LegislationCacheEntry, LegislationListing, LegislationSummary, Pagination,
    PolicyArea, RefreshReport,
};
pub use media::{
    FindRepResponse, Headline, NewsCacheEntry, NewsSummary, Video, VideoCacheEntry, VideoList,
    ZipLookupResult,
};
pub use person::{Chamber, ExternalIds, Person, PersonFilter, Stats};
