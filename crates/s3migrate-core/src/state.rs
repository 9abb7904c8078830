//! Per-profile state management.
//!
//! Provides [`ProfileStore`], a thread-safe map that holds one value per
//! credential profile for the lifetime of a process run. Values are created
//! lazily by the caller and never mutated after insertion.

use dashmap::DashMap;

use crate::types::ProfileName;

/// Thread-safe store keyed by profile name.
///
/// The first value inserted for a profile wins; later inserts for the same
/// profile return the existing value. Values are handed out by clone, so `T`
/// is expected to be a cheap handle (an SDK client, an `Arc`).
///
/// # Examples
///
/// ```
/// use s3migrate_core::{ProfileName, ProfileStore};
///
/// let store = ProfileStore::<u32>::new();
/// let profile = ProfileName::from("source");
/// assert!(store.get(&profile).is_none());
/// assert_eq!(store.insert(&profile, 1), 1);
/// assert_eq!(store.insert(&profile, 2), 1);
/// assert_eq!(store.get(&profile), Some(1));
/// ```
#[derive(Debug)]
pub struct ProfileStore<T: Clone + Send + Sync> {
    inner: DashMap<ProfileName, T>,
}

impl<T: Clone + Send + Sync> ProfileStore<T> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Get the value for the given profile, if it exists.
    #[must_use]
    pub fn get(&self, profile: &ProfileName) -> Option<T> {
        self.inner.get(profile).map(|v| v.clone())
    }

    /// Insert a value for the profile unless one is already present.
    ///
    /// Returns the value that is stored after the call.
    pub fn insert(&self, profile: &ProfileName, value: T) -> T {
        self.inner
            .entry(profile.clone())
            .or_insert(value)
            .clone()
    }

    /// Number of profiles with a stored value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: Clone + Send + Sync> Default for ProfileStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
