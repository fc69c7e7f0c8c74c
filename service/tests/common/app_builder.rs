//! Test app builder that mirrors main.rs wiring with injectable mocks.
//!
//! [`TestAppBuilder`] produces the same router as `main.rs` through
//! [`build_router`], but backed by an [`InMemoryStore`], a [`ManualClock`]
//! and queued-response provider mocks. The returned [`TestApp`] keeps handles
//! to all of them so tests can seed data, queue responses and inspect calls.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let app = TestAppBuilder::new()
//!         .with_person(PersonFactory::senator("CA").build())
//!         .with_cors(&["http://localhost:3000"])
//!         .build()
//!         .await;
//!
//!     // Use app.router.clone().oneshot(...) to send requests
//! }
//! ```

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::Router;
use chrono::TimeDelta;
use civicdata_api::{
    cache::PersonCache,
    clock::{mock::ManualClock, Clock},
    congress::mock::MockCongressClient,
    http::{build_router, ApiContext, RouterOptions},
    models::{Committee, CommitteeMembership, Person},
    providers::{
        news::mock::MockNewsClient, video::mock::MockVideoClient, zip::mock::MockZipLookupClient,
    },
    services::{
        LegislationService, LegislationSettings, MediaService, MediaSettings,
        RepresentativeFinder,
    },
    store::{collections, memory::InMemoryStore, put_as, DocumentStore},
};

/// Page size used by test apps, small enough to exercise paging.
pub const TEST_PAGE_SIZE: u32 = 2;

/// A built app plus handles to every injected dependency.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub cache: Arc<PersonCache>,
    pub congress: Arc<MockCongressClient>,
    pub videos: Arc<MockVideoClient>,
    pub news: Arc<MockNewsClient>,
    pub zip: Arc<MockZipLookupClient>,
}

/// Builder for test applications with configurable seed data.
#[derive(Default)]
pub struct TestAppBuilder {
    people: Vec<Person>,
    committees: Vec<Committee>,
    memberships: Vec<CommitteeMembership>,
    cors_origins: Vec<String>,
    swagger: bool,
}

impl TestAppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    #[must_use]
    pub fn with_people(mut self, people: impl IntoIterator<Item = Person>) -> Self {
        self.people.extend(people);
        self
    }

    #[must_use]
    pub fn with_committee(mut self, committee: Committee) -> Self {
        self.committees.push(committee);
        self
    }

    #[must_use]
    pub fn with_membership(mut self, membership: CommitteeMembership) -> Self {
        self.memberships.push(membership);
        self
    }

    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors_origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub const fn with_swagger(mut self) -> Self {
        self.swagger = true;
        self
    }

    /// Seed the store and wire the router.
    ///
    /// # Panics
    ///
    /// Panics if seeding the in-memory store fails.
    pub async fn build(self) -> TestApp {
        let store = Arc::new(InMemoryStore::new());
        for person in &self.people {
            put_as(store.as_ref(), collections::PERSONS, &person.bioguide_id, person)
                .await
                .expect("seed person");
        }
        for committee in &self.committees {
            put_as(store.as_ref(), collections::COMMITTEES, &committee.thomas_id, committee)
                .await
                .expect("seed committee");
        }
        for membership in &self.memberships {
            put_as(
                store.as_ref(),
                collections::MEMBERSHIPS,
                &membership.bioguide_id,
                membership,
            )
            .await
            .expect("seed membership");
        }

        let clock = Arc::new(ManualClock::default());
        let congress = Arc::new(MockCongressClient::new());
        let videos = Arc::new(MockVideoClient::new());
        let news = Arc::new(MockNewsClient::new());
        let zip = Arc::new(MockZipLookupClient::new());

        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let ttl = TimeDelta::hours(24);

        let cache = Arc::new(PersonCache::new(
            Arc::clone(&dyn_store),
            Arc::clone(&dyn_clock),
            ttl,
        ));
        let legislation = LegislationService::new(
            Arc::clone(&dyn_store),
            congress.clone(),
            Arc::clone(&dyn_clock),
            LegislationSettings {
                ttl,
                page_size: TEST_PAGE_SIZE,
                request_delay: Duration::ZERO,
                rate_limit_pause: Duration::ZERO,
            },
        );
        let media = MediaService::new(
            Arc::clone(&dyn_store),
            videos.clone(),
            news.clone(),
            dyn_clock,
            MediaSettings {
                ttl,
                video_max_results: 10,
                default_news_days: 30,
                video_rate_limit_pause: Duration::ZERO,
                news_rate_limit_pause: Duration::ZERO,
            },
        );
        let representatives = RepresentativeFinder::new(zip.clone(), Arc::clone(&cache));

        let context = ApiContext {
            store: dyn_store,
            cache: Arc::clone(&cache),
            legislation: Arc::new(legislation),
            media: Arc::new(media),
            representatives: Arc::new(representatives),
        };
        let router = build_router(
            context,
            &RouterOptions {
                cors_origins: self.cors_origins,
                swagger: self.swagger,
            },
        );

        TestApp {
            router,
            store,
            clock,
            cache,
            congress,
            videos,
            news,
            zip,
        }
    }
}
