//! `legislators-current.json` records.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_raw, Extracted, RawBio, RawName, RawTerm, SkipReason};
use crate::models::{Chamber, ExternalIds, Person};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLegislator {
    id: RawIds,
    name: RawName,
    bio: RawBio,
    terms: Vec<RawTerm>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIds {
    bioguide: Option<String>,
    thomas: Option<String>,
    #[serde(deserialize_with = "super::lenient")]
    govtrack: Option<i64>,
    opensecrets: Option<String>,
    #[serde(deserialize_with = "super::lenient")]
    votesmart: Option<i64>,
    wikipedia: Option<String>,
    ballotpedia: Option<String>,
}

/// Extract a member of Congress from their most recent term.
#[must_use]
pub fn extract_legislator(raw: &Value) -> Extracted<Person> {
    match build(raw) {
        Ok(person) => Extracted::Document(person),
        Err(reason) => Extracted::Skip(reason),
    }
}

fn build(raw: &Value) -> Result<Person, SkipReason> {
    let raw: RawLegislator = decode_raw(raw)?;
    let term = raw.terms.last().ok_or(SkipReason::NoTerms)?;

    let chamber = match term.term_type.as_deref() {
        Some("sen") => Chamber::Senate,
        Some("rep") => Chamber::House,
        other => return Err(SkipReason::UnsupportedTermType(other.map(str::to_string))),
    };

    let bioguide_id = raw
        .id
        .bioguide
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(SkipReason::MissingId)?;

    let mut person = Person::new(bioguide_id, chamber);
    person.first_name.clone_from(&raw.name.first);
    person.last_name.clone_from(&raw.name.last);
    person.full_name = raw.name.official_full.clone();
    person.nickname.clone_from(&raw.name.nickname);
    person.party.clone_from(&term.party);
    person.caucus.clone_from(&term.caucus);
    person.state.clone_from(&term.state);
    person.term_start = term.start;
    person.term_end = term.end;
    person.birthday = raw.bio.birthday;
    person.gender.clone_from(&raw.bio.gender);
    person.phone.clone_from(&term.phone);
    person.office.clone_from(&term.office);
    person.website.clone_from(&term.url);
    person.contact_form.clone_from(&term.contact_form);
    person.external_ids = ExternalIds {
        thomas: raw.id.thomas,
        govtrack: raw.id.govtrack,
        opensecrets: raw.id.opensecrets,
        votesmart: raw.id.votesmart,
        wikipedia: raw.id.wikipedia,
        ballotpedia: raw.id.ballotpedia,
        ..ExternalIds::default()
    };

    match chamber {
        Chamber::Senate => {
            person.state_rank.clone_from(&term.state_rank);
            person.senate_class = term.class;
        }
        Chamber::House => person.district = term.district,
        Chamber::Governor => {}
    }

    Ok(person)
}
