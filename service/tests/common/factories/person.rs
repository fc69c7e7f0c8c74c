//! `Person` factory for seeding stores.

#![allow(dead_code)]

use civicdata_api::{
    models::{Chamber, Person},
    store::{collections, put_as, DocumentStore},
};

use super::next_id;

/// Builder for people with sensible defaults.
///
/// # Examples
///
/// ```rust
/// // A senator with a generated id and name
/// let person = PersonFactory::senator("CA").build();
///
/// // A named representative stored directly
/// PersonFactory::representative("NC", 12)
///     .with_id("A000370")
///     .with_name("Alma", "Adams")
///     .create(store.as_ref())
///     .await;
/// ```
pub struct PersonFactory {
    person: Person,
}

impl PersonFactory {
    fn base(id: String, chamber: Chamber, state: &str) -> Self {
        let n = next_id();
        let mut person = Person::new(id, chamber);
        person.first_name = Some(format!("First{n}"));
        person.last_name = Some(format!("Last{n}"));
        person.full_name = Some(format!("First{n} Last{n}"));
        person.state = Some(state.to_string());
        person.party = Some("Democrat".to_string());
        person.gender = Some("F".to_string());
        Self { person }
    }

    #[must_use]
    pub fn senator(state: &str) -> Self {
        Self::base(format!("S{:06}", next_id()), Chamber::Senate, state)
    }

    #[must_use]
    pub fn representative(state: &str, district: i32) -> Self {
        let mut factory = Self::base(format!("H{:06}", next_id()), Chamber::House, state);
        factory.person.district = Some(district);
        factory
    }

    #[must_use]
    pub fn governor(state: &str) -> Self {
        Self::base(format!("GOV-{state}"), Chamber::Governor, state)
    }

    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.person.bioguide_id = id.to_string();
        self
    }

    /// Set first and last name; the full name follows.
    #[must_use]
    pub fn with_name(mut self, first: &str, last: &str) -> Self {
        self.person.first_name = Some(first.to_string());
        self.person.last_name = Some(last.to_string());
        self.person.full_name = Some(format!("{first} {last}"));
        self
    }

    #[must_use]
    pub fn with_party(mut self, party: &str) -> Self {
        self.person.party = Some(party.to_string());
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.person.gender = Some(gender.to_string());
        self
    }

    #[must_use]
    pub fn with_govtrack(mut self, govtrack: i64) -> Self {
        self.person.external_ids.govtrack = Some(govtrack);
        self
    }

    #[must_use]
    pub fn build(self) -> Person {
        self.person
    }

    /// Write the person to the store and return it.
    ///
    /// # Panics
    ///
    /// Panics if the store write fails.
    pub async fn create(self, store: &dyn DocumentStore) -> Person {
        let person = self.person;
        put_as(store, collections::PERSONS, &person.bioguide_id, &person)
            .await
            .expect("PersonFactory: failed to store person");
        person
    }
}
