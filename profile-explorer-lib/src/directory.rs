//! Session-wide profile directory.
//!
//! [`ProfileDirectory`] is the single source of truth every view reads from.
//! It caches the full list fetched from the store plus the currently searched
//! subset, and funnels all mutations through its own methods. Store failures
//! never escape: they are turned into a fixed message in the `error` slot,
//! which keeps its value until something overwrites or clears it.

use crate::map::Geocoder;
use crate::profile::{NewProfile, Profile, ProfilePatch};
use crate::search::filter_profiles;
use crate::store::ProfileStore;
use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::OnceCell;
use tracing::{event, instrument, Level};

pub const LOAD_FAILED: &str = "Failed to load profiles";
pub const ADD_FAILED: &str = "Failed to add profile";
pub const UPDATE_FAILED: &str = "Failed to update profile";
pub const DELETE_FAILED: &str = "Failed to delete profile";
pub const GEOCODE_FAILED: &str = "Failed to geocode profile";

/// Everything a view renders from.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryState {
    pub profiles: Vec<Profile>,
    pub filtered_profiles: Vec<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            filtered_profiles: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct ProfileDirectory<S: ProfileStore> {
    store: S,
    state: RwLock<DirectoryState>,
    loaded: OnceCell<()>,
}

impl<S: ProfileStore> ProfileDirectory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RwLock::new(DirectoryState::default()),
            loaded: OnceCell::new(),
        }
    }

    /// Builds a directory and performs its initial fetch.
    pub async fn mount(store: S) -> Self {
        let directory = Self::new(store);
        directory.load().await;
        directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Initial fetch. Only the first call reaches the store; concurrent
    /// callers wait for it and later calls return immediately.
    pub async fn load(&self) {
        self.loaded
            .get_or_init(|| async {
                let result = self.store.list().await;
                let mut state = self.write();
                match result {
                    Ok(profiles) => {
                        event!(Level::INFO, count = profiles.len(), "Loaded profiles");
                        state.filtered_profiles = profiles.clone();
                        state.profiles = profiles;
                    }
                    Err(e) => {
                        event!(Level::WARN, error = %e, "Loading profiles failed");
                        state.error = Some(LOAD_FAILED.to_string());
                    }
                }
                state.loading = false;
            })
            .await;
    }

    /// Appends the created profile to both lists. The filtered view gets it
    /// whether or not it matches the last search.
    #[instrument(skip(self, profile), fields(name = %profile.name))]
    pub async fn add_profile(&self, profile: NewProfile) -> Option<Profile> {
        match self.store.create(profile).await {
            Ok(created) => {
                let mut state = self.write();
                state.profiles.push(created.clone());
                state.filtered_profiles.push(created.clone());
                event!(Level::INFO, id = %created.id, "Added profile");
                Some(created)
            }
            Err(e) => {
                self.fail(ADD_FAILED, &e);
                None
            }
        }
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Option<Profile> {
        match self.store.update(id, patch).await {
            Ok(updated) => {
                let mut state = self.write();
                let DirectoryState {
                    profiles,
                    filtered_profiles,
                    ..
                } = &mut *state;
                for profile in profiles.iter_mut().chain(filtered_profiles.iter_mut()) {
                    if profile.id == id {
                        *profile = updated.clone();
                    }
                }
                event!(Level::INFO, "Updated profile");
                Some(updated)
            }
            Err(e) => {
                self.fail(UPDATE_FAILED, &e);
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_profile(&self, id: &str) {
        match self.store.delete(id).await {
            Ok(()) => {
                let mut state = self.write();
                state.profiles.retain(|p| p.id != id);
                state.filtered_profiles.retain(|p| p.id != id);
                event!(Level::INFO, "Deleted profile");
            }
            Err(e) => self.fail(DELETE_FAILED, &e),
        }
    }

    /// Recomputes the filtered view from the cached list. Never touches the
    /// store, `loading` or `error`.
    pub fn search_profiles(&self, query: &str) {
        let mut state = self.write();
        state.filtered_profiles = filter_profiles(&state.profiles, query);
        event!(
            Level::DEBUG,
            query,
            matches = state.filtered_profiles.len(),
            "Searched profiles"
        );
    }

    /// Looks `id` up in the cached list.
    pub fn find_profile(&self, id: &str) -> Option<Profile> {
        self.read().profiles.iter().find(|p| p.id == id).cloned()
    }

    /// Resolves the cached profile's address and stores the coordinates.
    /// Only ever runs when asked to.
    #[instrument(skip(self, geocoder))]
    pub async fn geocode_profile(&self, id: &str, geocoder: &dyn Geocoder) -> Option<Profile> {
        let Some(profile) = self.find_profile(id) else {
            event!(Level::WARN, "No cached profile to geocode");
            self.write().error = Some(GEOCODE_FAILED.to_string());
            return None;
        };

        match geocoder.geocode(&profile.address).await {
            Ok(coordinates) => {
                self.update_profile(id, ProfilePatch::coordinates(coordinates))
                    .await
            }
            Err(e) => {
                self.fail(GEOCODE_FAILED, &e);
                None
            }
        }
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.read().profiles.clone()
    }

    pub fn filtered_profiles(&self) -> Vec<Profile> {
        self.read().filtered_profiles.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn snapshot(&self) -> DirectoryState {
        self.read().clone()
    }

    fn fail(&self, message: &str, cause: &dyn std::error::Error) {
        event!(Level::WARN, error = %cause, "{}", message);
        self.write().error = Some(message.to_string());
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
