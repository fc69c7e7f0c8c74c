//! Data types for Congress.gov responses.

use serde::{Deserialize, Serialize};

pub use crate::models::{Bill, Pagination};

/// Which of a member's legislation lists to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegislationKind {
    Sponsored,
    Cosponsored,
}

impl LegislationKind {
    /// Path segment under `/member/{bioguide_id}/`.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Sponsored => "sponsored-legislation",
            Self::Cosponsored => "cosponsored-legislation",
        }
    }
}

/// One page of `sponsoredLegislation` or `cosponsoredLegislation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationPage {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(
        default,
        alias = "sponsoredLegislation",
        alias = "cosponsoredLegislation"
    )]
    pub bills: Vec<Bill>,
}

impl LegislationPage {
    /// The empty page reported for members Congress.gov does not know.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
