//! Postal-code lookup matched against stored people.
//!
//! The lookup provider only returns display names and states, so each entry
//! is reduced to a surname and matched by name within its state. Matching is
//! heuristic: an entry that matches nobody is dropped from `representatives`
//! but still appears in `raw_results`.

use std::{collections::HashSet, sync::Arc};

use super::{ServiceError, ZIP_PROVIDER};
use crate::{
    cache::PersonCache,
    models::{FindRepResponse, Person, ZipLookupResult},
    providers::ZipLookupClient,
};

const PREFIXES: &[&str] = &[
    "rep",
    "sen",
    "senator",
    "representative",
    "hon",
    "dr",
    "mr",
    "mrs",
    "ms",
];

const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

fn normalized(token: &str) -> String {
    token
        .trim_end_matches(['.', ','])
        .to_lowercase()
}

/// Last name left after stripping honorifics and generational suffixes.
///
/// `"Rep. Jane Q. Doe Jr."` gives `"Doe"`. Returns `None` when nothing is left.
#[must_use]
pub fn extract_surname(display_name: &str) -> Option<String> {
    let mut tokens: Vec<&str> = display_name.split_whitespace().collect();

    while tokens
        .first()
        .is_some_and(|t| PREFIXES.contains(&normalized(t).as_str()))
    {
        tokens.remove(0);
    }
    while tokens
        .last()
        .is_some_and(|t| SUFFIXES.contains(&normalized(t).as_str()))
    {
        tokens.pop();
    }

    tokens
        .last()
        .map(|t| t.trim_end_matches(['.', ',']).to_string())
        .filter(|t| !t.is_empty())
}

fn matches_entry(person: &Person, surname: &str) -> bool {
    let surname = surname.to_lowercase();
    let full_name = person.display_name().to_lowercase();
    person.surname().to_lowercase() == surname || full_name.contains(&surname)
}

pub struct RepresentativeFinder {
    zip: Arc<dyn ZipLookupClient>,
    cache: Arc<PersonCache>,
}

impl RepresentativeFinder {
    pub fn new(zip: Arc<dyn ZipLookupClient>, cache: Arc<PersonCache>) -> Self {
        Self { zip, cache }
    }

    /// Representatives for a five-digit postal code.
    ///
    /// # Errors
    /// Provider failures, or the roster cannot be loaded.
    pub async fn find(&self, zip: &str) -> Result<FindRepResponse, ServiceError> {
        let raw_results = self.zip.lookup(zip).await.map_err(|err| {
            tracing::warn!(zip, error = %err, "Postal-code lookup failed");
            ServiceError::from_provider(ZIP_PROVIDER, err)
        })?;

        let roster = self.cache.all().await?;
        let representatives = match_results(&roster, &raw_results);

        tracing::debug!(
            zip,
            provider_results = raw_results.len(),
            matched = representatives.len(),
            "Postal-code lookup matched"
        );
        Ok(FindRepResponse {
            zip: zip.to_string(),
            representatives,
            raw_results,
        })
    }
}

/// First same-state match per provider entry, duplicates collapsed.
fn match_results(roster: &[Person], results: &[ZipLookupResult]) -> Vec<Person> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for entry in results {
        let Some(surname) = extract_surname(&entry.name) else {
            continue;
        };
        let state = entry.state.trim();
        let found = roster.iter().find(|person| {
            person.state_code().eq_ignore_ascii_case(state) && matches_entry(person, &surname)
        });
        if let Some(person) = found {
            if seen.insert(person.bioguide_id.clone()) {
                matched.push(person.clone());
            }
        }
    }
    matched
}
