//! Profile List Controller
//!
//! Owns the canonical in-memory collection. Every mutation here is applied
//! only after the matching remote write has been confirmed, so the local
//! collection never runs ahead of the store.

use serde::{Deserialize, Serialize};

use crate::models::profile::Profile;

/// Loading state of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ListState {
    /// Fetch in flight; the collection is unknown
    Loading,
    /// Collection mirrored from the store
    Ready(Vec<Profile>),
    /// Fetch failed; the collection is unknown, not empty
    Failed(String),
}

/// What the caller must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEffect {
    None,
    /// The collection became empty; fire the navigation hook
    NoProfiles,
}

/// Profile list state machine
#[derive(Debug, Clone)]
pub struct ProfileListController {
    state: ListState,
}

impl Default for ProfileListController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileListController {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Collection when `Ready`, otherwise an empty slice
    pub fn profiles(&self) -> &[Profile] {
        match &self.state {
            ListState::Ready(profiles) => profiles,
            _ => &[],
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ListState::Ready(_))
    }

    pub fn find(&self, id: &str) -> Option<&Profile> {
        self.profiles().iter().find(|p| p.id == id)
    }

    /// Enter `Loading` ahead of a fetch
    pub fn begin_load(&mut self) {
        self.state = ListState::Loading;
    }

    /// Fetch succeeded
    pub fn finish_load(&mut self, profiles: Vec<Profile>) -> ListEffect {
        tracing::info!("Loaded {} profiles", profiles.len());
        let empty = profiles.is_empty();
        self.state = ListState::Ready(profiles);
        if empty {
            ListEffect::NoProfiles
        } else {
            ListEffect::None
        }
    }

    /// Fetch failed
    pub fn fail_load(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::error!("Profile list failed to load: {}", reason);
        self.state = ListState::Failed(reason);
    }

    /// Append a confirmed created profile at the end.
    ///
    /// Returns `false` when the list is not `Ready`.
    pub fn apply_create(&mut self, profile: Profile) -> bool {
        match &mut self.state {
            ListState::Ready(profiles) => {
                tracing::info!("Profile {} created", profile.id);
                profiles.push(profile);
                true
            }
            _ => {
                tracing::warn!(
                    "Dropping created profile {} because the list is not loaded",
                    profile.id
                );
                false
            }
        }
    }

    /// Replace the entry with the same id in place.
    ///
    /// An unknown id is an inconsistency: it is logged and nothing changes.
    pub fn apply_update(&mut self, profile: Profile) -> bool {
        let ListState::Ready(profiles) = &mut self.state else {
            tracing::warn!(
                "Dropping updated profile {} because the list is not loaded",
                profile.id
            );
            return false;
        };

        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(slot) => {
                tracing::info!("Profile {} updated", profile.id);
                *slot = profile;
                true
            }
            None => {
                tracing::warn!(
                    "Inconsistent list: updated profile {} is not in the collection",
                    profile.id
                );
                false
            }
        }
    }

    /// Remove the entry with the given id
    pub fn apply_delete(&mut self, id: &str) -> ListEffect {
        let ListState::Ready(profiles) = &mut self.state else {
            tracing::warn!("Dropping delete of {} because the list is not loaded", id);
            return ListEffect::None;
        };

        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        if profiles.len() == before {
            tracing::warn!("Inconsistent list: deleted profile {} was not in the collection", id);
            return ListEffect::None;
        }

        tracing::info!("Profile {} deleted", id);
        if profiles.is_empty() {
            ListEffect::NoProfiles
        } else {
            ListEffect::None
        }
    }
}
