use crate::profile::{Coordinates, NewProfile, Profile, ProfilePatch};
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Latency the mock store adds to every call, mimicking a network round trip.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No profile with id {0:?}")]
    NotFound(String),
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Profile>, StoreError>;
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError>;
    async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Profile, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store. Nothing is persisted; every call sleeps for `latency`
/// and then applies its effect under a short-lived lock.
#[derive(Debug)]
pub struct MockProfileStore {
    profiles: RwLock<Vec<Profile>>,
    latency: Duration,
}

impl MockProfileStore {
    /// Store preloaded with the two demo profiles.
    pub fn new() -> Self {
        Self::with_profiles(seed_profiles())
    }

    pub fn empty() -> Self {
        Self::with_profiles(Vec::new())
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for MockProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        self.simulate_latency().await;
        let profiles = self.profiles.read().unwrap_or_else(PoisonError::into_inner);
        debug!(count = profiles.len(), "Listing profiles");
        Ok(profiles.clone())
    }

    #[instrument(skip(self, profile), fields(name = %profile.name))]
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        self.simulate_latency().await;
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);

        // v4 ids collide with negligible probability; redraw anyway so ids
        // stay unique for the lifetime of the store.
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !profiles.iter().any(|p| p.id == candidate) {
                break candidate;
            }
        };

        let created = profile.with_id(id);
        profiles.push(created.clone());
        debug!(id = %created.id, "Created profile");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Profile, StoreError> {
        self.simulate_latency().await;
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);

        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(profile);

        debug!("Updated profile");
        Ok(profile.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);

        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        debug!(removed = before - profiles.len(), "Deleted profile");
        Ok(())
    }
}

/// The demo directory every fresh store starts from.
pub fn seed_profiles() -> Vec<Profile> {
    vec![
        Profile {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            photo: "https://randomuser.me/api/portraits/men/1.jpg".to_string(),
            description: "Software Developer".to_string(),
            address: "1600 Amphitheatre Parkway, Mountain View, CA".to_string(),
            coordinates: Coordinates::new(37.422, -122.084),
            contact: Some("john.doe@example.com".to_string()),
            interests: Some(vec![
                "Programming".to_string(),
                "Hiking".to_string(),
                "Photography".to_string(),
            ]),
        },
        Profile {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            photo: "https://randomuser.me/api/portraits/women/1.jpg".to_string(),
            description: "UX Designer".to_string(),
            address: "1 Infinite Loop, Cupertino, CA".to_string(),
            coordinates: Coordinates::new(37.3318, -122.0311),
            contact: Some("jane.smith@example.com".to_string()),
            interests: Some(vec![
                "Design".to_string(),
                "Art".to_string(),
                "Travel".to_string(),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MockProfileStore {
        MockProfileStore::new().with_latency(Duration::ZERO)
    }

    fn amy() -> NewProfile {
        NewProfile {
            name: "Amy".to_string(),
            address: "X".to_string(),
            interests: Some(vec!["Chess".to_string(), "Chess".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_returns_seed_in_insertion_order() {
        let ids: Vec<_> = store().list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn create_then_list_contains_record_with_fresh_id() {
        let store = store();
        let created = store.create(amy()).await.unwrap();

        assert!(!created.id.is_empty());
        assert_ne!(created.id, "1");
        assert_ne!(created.id, "2");

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed.last(), Some(&amy().with_id(created.id.clone())));
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let store = MockProfileStore::empty().with_latency(Duration::ZERO);
        let a = store.create(amy()).await.unwrap();
        let b = store.create(amy()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_merges_and_keeps_position() {
        let store = store();
        let before = store.list().await.unwrap();

        let updated = store.update("1", ProfilePatch::name("X")).await.unwrap();
        assert_eq!(updated.name, "X");

        let after = store.list().await.unwrap();
        assert_eq!(after[0], updated);
        assert_eq!(after[0].address, before[0].address);
        assert_eq!(after[0].contact, before[0].contact);
        assert_eq!(after[1], before[1]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = store();
        let err = store.update("999", ProfilePatch::name("X")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "999"));
        assert_eq!(store.list().await.unwrap(), seed_profiles());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = store();
        store.delete("1").await.unwrap();
        let once = store.list().await.unwrap();
        store.delete("1").await.unwrap();
        assert_eq!(store.list().await.unwrap(), once);
        assert_eq!(once.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_for_latency() {
        let store = MockProfileStore::new();
        let started = tokio::time::Instant::now();
        store.list().await.unwrap();
        assert!(started.elapsed() >= DEFAULT_LATENCY);
    }
}
