//! `governors-current.json` records.
//!
//! Governors share the Person collection with members of Congress. Their
//! identifier is synthesized from the state of the most recent term.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_raw, Extracted, RawBio, RawName, RawTerm, SkipReason};
use crate::models::{Chamber, ExternalIds, Person};

/// Placeholder the governors dataset uses for handles of former office holders.
const PRIOR_MARKER: &str = "prior";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGovernor {
    name: RawName,
    bio: RawBio,
    terms: Vec<RawTerm>,
    id_external: RawExternal,
    photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExternal {
    wikipedia: Option<String>,
    ballotpedia: Option<String>,
    twitter: Option<String>,
    youtube: Option<String>,
    facebook: Option<String>,
}

/// Identifier used for a state's governor.
#[must_use]
pub fn governor_id(state: &str) -> String {
    format!("GOV-{state}")
}

fn social_handle(handle: Option<String>) -> Option<String> {
    handle.filter(|h| !h.to_lowercase().contains(PRIOR_MARKER))
}

#[must_use]
pub fn extract_governor(raw: &Value) -> Extracted<Person> {
    match build(raw) {
        Ok(person) => Extracted::Document(person),
        Err(reason) => Extracted::Skip(reason),
    }
}

fn build(raw: &Value) -> Result<Person, SkipReason> {
    let raw: RawGovernor = decode_raw(raw)?;
    let term = raw.terms.last().ok_or(SkipReason::NoTerms)?;
    let state = term
        .state
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or(SkipReason::MissingState)?;

    let mut person = Person::new(governor_id(&state), Chamber::Governor);
    person.first_name.clone_from(&raw.name.first);
    person.last_name.clone_from(&raw.name.last);
    person.full_name = raw.name.full_name();
    person.party.clone_from(&term.party);
    person.state = Some(state);
    person.term_start = term.start;
    person.term_end = term.end;
    person.birthday = raw.bio.birthday;
    person.gender.clone_from(&raw.bio.gender);
    person.phone.clone_from(&term.phone);
    person.office.clone_from(&term.office);
    person.website.clone_from(&term.url);
    person.contact_form.clone_from(&term.contact_form);
    person.photo_url = raw.photo_url;
    person.external_ids = ExternalIds {
        wikipedia: raw.id_external.wikipedia,
        ballotpedia: raw.id_external.ballotpedia,
        twitter: social_handle(raw.id_external.twitter),
        youtube: social_handle(raw.id_external.youtube),
        facebook: social_handle(raw.id_external.facebook),
        ..ExternalIds::default()
    };

    Ok(person)
}
