//! Legislators and governors.

use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::media::Headline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Chamber {
    Senate,
    House,
    Governor,
}

impl Chamber {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Senate => "Senate",
            Self::House => "House",
            Self::Governor => "Governor",
        }
    }

    /// Position in the by-state listing: senators, then representatives, then the governor.
    #[must_use]
    pub const fn state_listing_rank(self) -> u8 {
        match self {
            Self::Senate => 0,
            Self::House => 1,
            Self::Governor => 2,
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown chamber '{0}'")]
pub struct UnknownChamber(String);

impl FromStr for Chamber {
    type Err = UnknownChamber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "senate" => Ok(Self::Senate),
            "house" => Ok(Self::House),
            "governor" => Ok(Self::Governor),
            _ => Err(UnknownChamber(s.to_string())),
        }
    }
}

/// Third-party identifiers and social handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExternalIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thomas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub govtrack: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opensecrets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votesmart: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballotpedia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// A legislator or governor document.
///
/// The base fields are written by the importers. The derived fields
/// (scores, legislation counts, news mentions) are merged in later by the
/// ideology import and the refresh services and are omitted until set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    /// Bioguide id, or `GOV-<state>` for governors
    pub bioguide_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caucus: Option<String>,
    pub state: Option<String>,
    pub chamber: Chamber,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub office: Option<String>,
    pub website: Option<String>,
    pub contact_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senate_class: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<i32>,

    #[serde(default)]
    pub external_ids: ExternalIds,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideology_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leadership_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsored_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosponsored_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enacted_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legislation_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_mentions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_sample_headlines: Option<Vec<Headline>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_updated_at: Option<DateTime<Utc>>,
}

impl Person {
    /// A person with only the identifying fields set.
    #[must_use]
    pub fn new(bioguide_id: impl Into<String>, chamber: Chamber) -> Self {
        Self {
            bioguide_id: bioguide_id.into(),
            first_name: None,
            last_name: None,
            full_name: None,
            nickname: None,
            party: None,
            caucus: None,
            state: None,
            chamber,
            term_start: None,
            term_end: None,
            birthday: None,
            gender: None,
            phone: None,
            office: None,
            website: None,
            contact_form: None,
            photo_url: None,
            state_rank: None,
            senate_class: None,
            district: None,
            external_ids: ExternalIds::default(),
            ideology_score: None,
            leadership_score: None,
            sponsored_count: None,
            cosponsored_count: None,
            enacted_count: None,
            legislation_updated_at: None,
            news_mentions: None,
            news_sample_headlines: None,
            news_updated_at: None,
        }
    }

    #[must_use]
    pub fn state_code(&self) -> &str {
        self.state.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn surname(&self) -> &str {
        self.last_name.as_deref().unwrap_or_default()
    }

    /// Name used for provider searches: official full name, else first + last.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(full) if !full.trim().is_empty() => full.clone(),
            _ => [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    #[must_use]
    pub const fn is_congressional(&self) -> bool {
        matches!(self.chamber, Chamber::Senate | Chamber::House)
    }
}

/// Roster order: state, chamber name, last name.
#[must_use]
pub fn roster_order(a: &Person, b: &Person) -> Ordering {
    a.state_code()
        .cmp(b.state_code())
        .then_with(|| a.chamber.as_str().cmp(b.chamber.as_str()))
        .then_with(|| a.surname().cmp(b.surname()))
}

/// Order within a single state: senators, representatives, governor, then last name.
#[must_use]
pub fn state_listing_order(a: &Person, b: &Person) -> Ordering {
    a.chamber
        .state_listing_rank()
        .cmp(&b.chamber.state_listing_rank())
        .then_with(|| a.surname().cmp(b.surname()))
}

/// Equality filters applied to the cached roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    state: Option<String>,
    party: Option<String>,
    chamber: Option<Chamber>,
}

impl PersonFilter {
    #[must_use]
    pub fn new(state: Option<&str>, party: Option<&str>, chamber: Option<Chamber>) -> Self {
        Self {
            state: state
                .filter(|s| !s.is_empty())
                .map(str::to_ascii_uppercase),
            party: party.filter(|p| !p.is_empty()).map(str::to_string),
            chamber,
        }
    }

    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        self.state
            .as_deref()
            .is_none_or(|state| person.state.as_deref() == Some(state))
            && self
                .party
                .as_deref()
                .is_none_or(|party| person.party.as_deref() == Some(party))
            && self.chamber.is_none_or(|chamber| person.chamber == chamber)
    }
}

/// Roster counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Stats {
    pub total: usize,
    pub by_chamber: BTreeMap<String, usize>,
    pub by_party: BTreeMap<String, usize>,
    pub by_gender: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
}

impl Stats {
    #[must_use]
    pub fn from_roster(people: &[Person]) -> Self {
        const UNKNOWN: &str = "Unknown";
        let mut stats = Self {
            total: people.len(),
            ..Self::default()
        };
        for person in people {
            *stats
                .by_chamber
                .entry(person.chamber.as_str().to_string())
                .or_default() += 1;
            *stats
                .by_party
                .entry(person.party.clone().unwrap_or_else(|| UNKNOWN.to_string()))
                .or_default() += 1;
            let gender = match person.gender.as_deref() {
                Some("M") => "Male",
                Some("F") => "Female",
                _ => UNKNOWN,
            };
            *stats.by_gender.entry(gender.to_string()).or_default() += 1;
            *stats
                .by_state
                .entry(person.state.clone().unwrap_or_else(|| UNKNOWN.to_string()))
                .or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, state: &str, chamber: Chamber, last: &str) -> Person {
        let mut p = Person::new(id, chamber);
        p.state = Some(state.into());
        p.last_name = Some(last.into());
        p
    }

    #[test]
    fn chamber_parses_case_insensitively() {
        assert_eq!("senate".parse::<Chamber>().ok(), Some(Chamber::Senate));
        assert_eq!("HOUSE".parse::<Chamber>().ok(), Some(Chamber::House));
        assert!("mayor".parse::<Chamber>().is_err());
    }

    #[test]
    fn roster_order_sorts_by_state_chamber_then_surname() {
        let mut people = vec![
            person("C", "CA", Chamber::Senate, "Padilla"),
            person("B", "AK", Chamber::House, "Peltola"),
            person("A", "CA", Chamber::House, "Aguilar"),
            person("D", "AK", Chamber::Senate, "Murkowski"),
        ];
        people.sort_by(roster_order);
        let ids: Vec<_> = people.iter().map(|p| p.bioguide_id.as_str()).collect();
        assert_eq!(ids, ["B", "D", "A", "C"]);
    }

    #[test]
    fn state_listing_puts_senators_first_and_governor_last() {
        let mut people = vec![
            person("GOV-CA", "CA", Chamber::Governor, "Alpha"),
            person("H1", "CA", Chamber::House, "Aguilar"),
            person("S2", "CA", Chamber::Senate, "Schiff"),
            person("S1", "CA", Chamber::Senate, "Padilla"),
        ];
        people.sort_by(state_listing_order);
        let ids: Vec<_> = people.iter().map(|p| p.bioguide_id.as_str()).collect();
        assert_eq!(ids, ["S1", "S2", "H1", "GOV-CA"]);
    }

    #[test]
    fn filter_upper_cases_state() {
        let filter = PersonFilter::new(Some("ca"), None, Some(Chamber::House));
        assert!(filter.matches(&person("A", "CA", Chamber::House, "Aguilar")));
        assert!(!filter.matches(&person("B", "CA", Chamber::Senate, "Padilla")));
        assert!(!filter.matches(&person("C", "NV", Chamber::House, "Titus")));
    }

    #[test]
    fn stats_map_gender_codes() {
        let mut a = person("A", "CA", Chamber::House, "A");
        a.gender = Some("F".into());
        let mut b = person("B", "CA", Chamber::Senate, "B");
        b.gender = Some("M".into());
        let c = person("C", "NV", Chamber::Governor, "C");

        let stats = Stats::from_roster(&[a, b, c]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_gender.get("Female"), Some(&1));
        assert_eq!(stats.by_gender.get("Male"), Some(&1));
        assert_eq!(stats.by_gender.get("Unknown"), Some(&1));
        assert_eq!(stats.by_state.get("CA"), Some(&2));
        assert_eq!(stats.by_party.get("Unknown"), Some(&3));
    }

    #[test]
    fn derived_fields_omitted_until_set() {
        let json = serde_json::to_value(Person::new("A000001", Chamber::House)).unwrap();
        assert!(json.get("sponsored_count").is_none());
        assert_eq!(json["chamber"], "House");
        assert!(json.get("last_name").is_some());
    }
}
