//! `committees-current.json` and `committee-membership-current.json`.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use super::{decode_raw, Extracted, SkipReason};
use crate::models::{
    committee::FULL_COMMITTEE_ID_LEN, Committee, CommitteeAssignment, CommitteeMembership,
    Subcommittee,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommittee {
    thomas_id: Option<String>,
    name: String,
    #[serde(rename = "type")]
    committee_type: String,
    url: String,
    jurisdiction: String,
    rss_url: String,
    minority_rss_url: String,
    subcommittees: Vec<RawSubcommittee>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubcommittee {
    thomas_id: String,
    name: String,
    phone: String,
}

/// One entry of the membership map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSeat {
    pub bioguide: Option<String>,
    #[serde(deserialize_with = "super::lenient")]
    pub rank: Option<u32>,
    pub title: Option<String>,
    pub party: Option<String>,
}

#[must_use]
pub fn extract_committee(raw: &Value) -> Extracted<Committee> {
    let raw: RawCommittee = match decode_raw(raw) {
        Ok(raw) => raw,
        Err(reason) => return Extracted::Skip(reason),
    };
    let Some(thomas_id) = raw.thomas_id.filter(|id| !id.is_empty()) else {
        return Extracted::Skip(SkipReason::MissingId);
    };

    Extracted::Document(Committee {
        thomas_id,
        name: raw.name,
        committee_type: raw.committee_type,
        url: raw.url,
        jurisdiction: raw.jurisdiction,
        rss_url: raw.rss_url,
        minority_url: raw.minority_rss_url,
        subcommittees: raw
            .subcommittees
            .into_iter()
            .map(|sub| Subcommittee {
                thomas_id: sub.thomas_id,
                name: sub.name,
                phone: sub.phone,
            })
            .collect(),
    })
}

/// Names for every committee and subcommittee id (`parent id + suffix`).
fn committee_names(committees: &[Committee]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for committee in committees {
        names.insert(committee.thomas_id.clone(), committee.name.clone());
        for sub in &committee.subcommittees {
            names.insert(
                format!("{}{}", committee.thomas_id, sub.thomas_id),
                sub.name.clone(),
            );
        }
    }
    names
}

/// Regroup the committee → seats map into one membership document per person.
///
/// Seats without a bioguide id are dropped. Unknown committee ids keep the id
/// as their name. Output is ordered by bioguide id and each person's seats are
/// sorted full committees first, titled seats first, then by rank.
#[must_use]
pub fn build_memberships(
    committees: &[Committee],
    seats_by_committee: &BTreeMap<String, Vec<RawSeat>>,
) -> Vec<CommitteeMembership> {
    let names = committee_names(committees);
    let mut by_person: BTreeMap<String, Vec<CommitteeAssignment>> = BTreeMap::new();

    for (committee_id, seats) in seats_by_committee {
        let parent_id = (committee_id.len() > FULL_COMMITTEE_ID_LEN)
            .then(|| committee_id.get(..FULL_COMMITTEE_ID_LEN))
            .flatten();
        let is_subcommittee = parent_id.is_some();
        let parent_name = parent_id.and_then(|id| names.get(id).cloned());
        let committee_name = names
            .get(committee_id)
            .cloned()
            .unwrap_or_else(|| committee_id.clone());

        for seat in seats {
            let Some(bioguide) = seat.bioguide.as_deref().filter(|b| !b.is_empty()) else {
                continue;
            };
            by_person
                .entry(bioguide.to_string())
                .or_default()
                .push(CommitteeAssignment {
                    committee_id: committee_id.clone(),
                    committee_name: committee_name.clone(),
                    is_subcommittee,
                    parent_committee_id: parent_id.map(str::to_string),
                    parent_committee_name: parent_name.clone(),
                    rank: seat.rank,
                    title: seat.title.clone(),
                    party: seat.party.clone(),
                });
        }
    }

    by_person
        .into_iter()
        .map(|(bioguide_id, mut assignments)| {
            assignments.sort_by(CommitteeAssignment::seat_order);
            CommitteeMembership {
                bioguide_id,
                committees: assignments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agriculture() -> Committee {
        extract_committee(&json!({
            "thomas_id": "HSAG",
            "name": "House Committee on Agriculture",
            "type": "house",
            "minority_rss_url": "https://example.org/minority.xml",
            "subcommittees": [{"thomas_id": "03", "name": "Conservation and Forestry", "phone": "(202) 225-2171"}]
        }))
        .document()
        .unwrap()
    }

    fn seat(bioguide: Option<&str>, rank: Option<u32>, title: Option<&str>) -> RawSeat {
        RawSeat {
            bioguide: bioguide.map(str::to_string),
            rank,
            title: title.map(str::to_string),
            party: Some("majority".into()),
        }
    }

    #[test]
    fn committee_fields_are_mapped() {
        let committee = agriculture();
        assert_eq!(committee.thomas_id, "HSAG");
        assert_eq!(committee.committee_type, "house");
        assert_eq!(committee.minority_url, "https://example.org/minority.xml");
        assert_eq!(committee.subcommittees[0].thomas_id, "03");
        assert_eq!(committee.url, "");
    }

    #[test]
    fn committee_without_id_is_skipped() {
        assert_eq!(
            extract_committee(&json!({"name": "Orphan"})),
            Extracted::Skip(SkipReason::MissingId)
        );
    }

    #[test]
    fn memberships_resolve_names_and_parents() {
        let seats = BTreeMap::from([
            ("HSAG".to_string(), vec![seat(Some("A000001"), Some(3), None)]),
            (
                "HSAG03".to_string(),
                vec![seat(Some("A000001"), Some(1), Some("Chair")), seat(None, Some(2), None)],
            ),
            ("JSXX".to_string(), vec![seat(Some("B000002"), None, None)]),
        ]);

        let memberships = build_memberships(&[agriculture()], &seats);
        assert_eq!(memberships.len(), 2);

        let first = &memberships[0];
        assert_eq!(first.bioguide_id, "A000001");
        assert_eq!(first.committees[0].committee_id, "HSAG");
        let sub = &first.committees[1];
        assert!(sub.is_subcommittee);
        assert_eq!(sub.committee_name, "Conservation and Forestry");
        assert_eq!(sub.parent_committee_id.as_deref(), Some("HSAG"));
        assert_eq!(
            sub.parent_committee_name.as_deref(),
            Some("House Committee on Agriculture")
        );

        let unknown = &memberships[1].committees[0];
        assert_eq!(unknown.committee_name, "JSXX");
        assert!(!unknown.is_subcommittee);
        assert_eq!(unknown.parent_committee_id, None);
    }
}
