//! Record extraction.
//!
//! Pure functions that turn one raw provider record into a store document.
//! Raw records arrive as `serde_json::Value`; each extractor decodes into a
//! lenient raw shape (every field optional) and either returns the document
//! or a [`SkipReason`]. Missing optional fields never fail extraction.

pub mod committees;
pub mod governors;
pub mod ideology;
pub mod legislators;

use std::fmt;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

pub use committees::{build_memberships, extract_committee, RawSeat};
pub use governors::extract_governor;
pub use ideology::{parse_sponsorship_csv, SponsorshipScore};
pub use legislators::extract_legislator;

/// Result of extracting one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Document(T),
    Skip(SkipReason),
}

impl<T> Extracted<T> {
    pub fn document(self) -> Option<T> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record did not have the expected shape
    Malformed(String),
    NoTerms,
    UnsupportedTermType(Option<String>),
    MissingId,
    MissingState,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed record: {err}"),
            Self::NoTerms => f.write_str("no terms"),
            Self::UnsupportedTermType(Some(kind)) => write!(f, "unsupported term type '{kind}'"),
            Self::UnsupportedTermType(None) => f.write_str("missing term type"),
            Self::MissingId => f.write_str("missing identifier"),
            Self::MissingState => f.write_str("missing state"),
        }
    }
}

/// Decode a raw record into its lenient shape.
fn decode_raw<T: DeserializeOwned>(raw: &Value) -> Result<T, SkipReason> {
    T::deserialize(raw).map_err(|err| SkipReason::Malformed(err.to_string()))
}

/// Optional field that falls back to `None` when the value has the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawName {
    first: Option<String>,
    middle: Option<String>,
    last: Option<String>,
    official_full: Option<String>,
    nickname: Option<String>,
}

impl RawName {
    /// Official full name, else `first middle last` with gaps collapsed.
    fn full_name(&self) -> Option<String> {
        if let Some(full) = self.official_full.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(full.to_string());
        }
        let joined = [&self.first, &self.middle, &self.last]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBio {
    #[serde(deserialize_with = "lenient")]
    birthday: Option<NaiveDate>,
    gender: Option<String>,
}

/// One term of office in the `@unitedstates` datasets.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTerm {
    #[serde(rename = "type")]
    term_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    start: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient")]
    end: Option<NaiveDate>,
    state: Option<String>,
    party: Option<String>,
    caucus: Option<String>,
    phone: Option<String>,
    office: Option<String>,
    url: Option<String>,
    contact_form: Option<String>,
    state_rank: Option<String>,
    #[serde(deserialize_with = "lenient")]
    class: Option<u8>,
    #[serde(deserialize_with = "lenient")]
    district: Option<i32>,
}
