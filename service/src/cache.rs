//! Read-through cache for Person documents.
//!
//! Two kinds of slot: one holding the whole roster and one per identifier.
//! Each slot carries its own expiry and is checked on every read
//! (`now > expires_at` means expired). A roster miss fetches every Person
//! from the store, sorts it, swaps in the new snapshot and fans the same
//! expiry out to the per-identifier slots.
//!
//! Snapshots are `Arc`s replaced under a lock, so readers see either the old
//! or the new roster in full. Locks are never held across an `.await`.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    clock::Clock,
    models::{person::roster_order, Person, PersonFilter},
    store::{self, collections, DocumentStore, StoreError},
};

/// Whether a document cached at `cached_at` is still inside its window.
#[must_use]
pub fn is_fresh(cached_at: DateTime<Utc>, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
    now.signed_duration_since(cached_at) < ttl
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

impl<T> Slot<T> {
    fn live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

/// Snapshot of the cache for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CacheStatus {
    /// A live roster snapshot is held
    pub legislators_cached: bool,
    /// People in the live roster snapshot (0 when none)
    pub legislators_count: usize,
    /// Live per-identifier slots
    pub individual_cached: usize,
    /// Expiry of the roster snapshot
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct PersonCache {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    roster: RwLock<Option<Slot<Arc<Vec<Person>>>>>,
    people: RwLock<HashMap<String, Slot<Arc<Person>>>>,
}

impl PersonCache {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            store,
            clock,
            ttl,
            roster: RwLock::new(None),
            people: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Every Person, sorted by state, chamber and last name.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read on a miss.
    pub async fn all(&self) -> Result<Arc<Vec<Person>>, StoreError> {
        let now = self.clock.now();
        if let Some(slot) = self.read_roster().as_ref().filter(|slot| slot.live(now)) {
            return Ok(Arc::clone(&slot.value));
        }

        let docs = self.store.query(collections::PERSONS, &[]).await?;
        let mut people: Vec<Person> = docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                store::decode(doc)
                    .inspect_err(|err| {
                        tracing::warn!(id = %id, error = %err, "Skipping undecodable person");
                    })
                    .ok()
            })
            .collect();
        people.sort_by(roster_order);

        let roster = Arc::new(people);
        let expires_at = self.clock.now() + self.ttl;
        self.install(&roster, expires_at);
        tracing::debug!(count = roster.len(), %expires_at, "Roster cache populated");
        Ok(roster)
    }

    /// One Person by identifier.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read on a miss.
    pub async fn get(&self, id: &str) -> Result<Option<Arc<Person>>, StoreError> {
        let now = self.clock.now();
        if let Some(person) = self
            .read_people()
            .get(id)
            .filter(|slot| slot.live(now))
            .map(|slot| Arc::clone(&slot.value))
        {
            return Ok(Some(person));
        }

        let Some(person) =
            store::get_as::<Person>(self.store.as_ref(), collections::PERSONS, id).await?
        else {
            return Ok(None);
        };

        let person = Arc::new(person);
        let expires_at = self.clock.now() + self.ttl;
        self.write_people().insert(
            id.to_string(),
            Slot {
                value: Arc::clone(&person),
                expires_at,
            },
        );
        Ok(Some(person))
    }

    /// Roster entries matching `filter`, in roster order.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read on a miss.
    pub async fn filtered(&self, filter: &PersonFilter) -> Result<Vec<Person>, StoreError> {
        Ok(self
            .all()
            .await?
            .iter()
            .filter(|person| filter.matches(person))
            .cloned()
            .collect())
    }

    /// Drop every slot. The next read goes to the store.
    pub fn clear(&self) {
        *self.write_roster() = None;
        self.write_people().clear();
        tracing::info!("Person cache cleared");
    }

    #[must_use]
    pub fn status(&self) -> CacheStatus {
        let now = self.clock.now();
        let roster = self.read_roster();
        let live_roster = roster.as_ref().filter(|slot| slot.live(now));
        let individual_cached = self
            .read_people()
            .values()
            .filter(|slot| slot.live(now))
            .count();

        CacheStatus {
            legislators_cached: live_roster.is_some(),
            legislators_count: live_roster.map_or(0, |slot| slot.value.len()),
            individual_cached,
            expires_at: live_roster.map(|slot| slot.expires_at),
        }
    }

    /// Replace the roster and every per-id slot, so people missing from the
    /// fresh roster stop being served.
    fn install(&self, roster: &Arc<Vec<Person>>, expires_at: DateTime<Utc>) {
        let fan_out: HashMap<String, Slot<Arc<Person>>> = roster
            .iter()
            .map(|person| {
                (
                    person.bioguide_id.clone(),
                    Slot {
                        value: Arc::new(person.clone()),
                        expires_at,
                    },
                )
            })
            .collect();

        *self.write_roster() = Some(Slot {
            value: Arc::clone(roster),
            expires_at,
        });
        *self.write_people() = fan_out;
    }

    fn read_roster(&self) -> std::sync::RwLockReadGuard<'_, Option<Slot<Arc<Vec<Person>>>>> {
        self.roster.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_roster(&self) -> std::sync::RwLockWriteGuard<'_, Option<Slot<Arc<Vec<Person>>>>> {
        self.roster.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_people(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Slot<Arc<Person>>>> {
        self.people.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_people(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Slot<Arc<Person>>>> {
        self.people.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::mock::ManualClock, models::Chamber, store::memory::InMemoryStore};

    async fn seeded() -> (Arc<InMemoryStore>, Arc<ManualClock>, PersonCache) {
        let store = Arc::new(InMemoryStore::new());
        for (id, state, chamber, last) in [
            ("B000001", "CA", Chamber::Senate, "Beta"),
            ("A000001", "AK", Chamber::House, "Alpha"),
        ] {
            let mut person = Person::new(id, chamber);
            person.state = Some(state.into());
            person.last_name = Some(last.into());
            store::put_as(store.as_ref(), collections::PERSONS, id, &person)
                .await
                .unwrap();
        }
        let clock = Arc::new(ManualClock::default());
        let cache = PersonCache::new(store.clone(), clock.clone(), TimeDelta::hours(24));
        (store, clock, cache)
    }

    #[test]
    fn freshness_window_is_exclusive() {
        let now = Utc::now();
        let ttl = TimeDelta::hours(24);
        assert!(is_fresh(now - TimeDelta::hours(23), now, ttl));
        assert!(!is_fresh(now - ttl, now, ttl));
    }

    #[tokio::test]
    async fn roster_hit_does_not_touch_store() {
        let (store, clock, cache) = seeded().await;
        let first = cache.all().await.unwrap();
        clock.advance(TimeDelta::hours(23));
        let second = cache.all().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.query_calls(), 1);
        assert_eq!(first[0].bioguide_id, "A000001");
    }

    #[tokio::test]
    async fn expired_roster_refetches_once() {
        let (store, clock, cache) = seeded().await;
        cache.all().await.unwrap();
        clock.advance(TimeDelta::hours(24) + TimeDelta::seconds(1));
        cache.all().await.unwrap();
        cache.all().await.unwrap();
        assert_eq!(store.query_calls(), 2);
    }

    #[tokio::test]
    async fn roster_fill_fans_out_to_individual_slots() {
        let (store, _clock, cache) = seeded().await;
        cache.all().await.unwrap();
        let person = cache.get("B000001").await.unwrap().unwrap();
        assert_eq!(person.last_name.as_deref(), Some("Beta"));
        assert_eq!(store.get_calls(), 0);
        assert_eq!(cache.status().individual_cached, 2);
    }

    #[tokio::test]
    async fn roster_refill_drops_slots_for_removed_people() {
        let (store, clock, cache) = seeded().await;
        assert!(cache.get("A000001").await.unwrap().is_some());

        clock.advance(TimeDelta::hours(1));
        assert!(store.delete(collections::PERSONS, "A000001").await.unwrap());
        let roster = cache.all().await.unwrap();
        assert_eq!(roster.len(), 1);

        assert!(cache.get("A000001").await.unwrap().is_none());
        assert_eq!(cache.status().individual_cached, 1);
    }

    #[tokio::test]
    async fn missing_person_is_not_cached() {
        let (store, _clock, cache) = seeded().await;
        assert!(cache.get("Z999999").await.unwrap().is_none());
        assert!(cache.get("Z999999").await.unwrap().is_none());
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn clear_resets_status_and_forces_fetch() {
        let (store, _clock, cache) = seeded().await;
        cache.all().await.unwrap();
        assert!(cache.status().legislators_cached);

        cache.clear();
        let status = cache.status();
        assert!(!status.legislators_cached);
        assert_eq!(status.legislators_count, 0);
        assert_eq!(status.individual_cached, 0);
        assert_eq!(status.expires_at, None);

        cache.all().await.unwrap();
        assert_eq!(store.query_calls(), 2);
    }

    #[tokio::test]
    async fn filters_apply_to_cached_roster() {
        let (store, _clock, cache) = seeded().await;
        let senators = cache
            .filtered(&PersonFilter::new(None, None, Some(Chamber::Senate)))
            .await
            .unwrap();
        let alaska = cache
            .filtered(&PersonFilter::new(Some("ak"), None, None))
            .await
            .unwrap();

        assert_eq!(senators.len(), 1);
        assert_eq!(alaska[0].bioguide_id, "A000001");
        assert_eq!(store.query_calls(), 1);
    }
}
