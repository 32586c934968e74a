//! Per-user gardening preferences and their on-disk store.
//!
//! One profile per user, created lazily with defaults and replaced wholesale
//! on every preference submission. The store keeps the full map in memory and
//! rewrites one JSON file on change; a single mutex makes each write atomic
//! with respect to other requests.

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Longest city string we store.
const CITY_MAX_CHARS: usize = 120;

const DEFAULT_POT_VOLUME_L: f64 = 40.0;
const DEFAULT_WATTS: f64 = 200.0;

/// A user's stored preferences. Field names double as the JSON wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "pot")]
    pub pot_volume: f64,
    pub watts: f64,
    pub city: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            pot_volume: DEFAULT_POT_VOLUME_L,
            watts: DEFAULT_WATTS,
            city: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("pot must be positive number")]
    InvalidPot,

    #[error("watts must be positive number")]
    InvalidWatts,

    #[error("failed to persist profiles: {0}")]
    Persist(#[source] anyhow::Error),
}

/// File-backed map of username to [`UserProfile`].
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl PreferenceStore {
    /// Open a store at `path`, loading existing profiles if the file exists.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let profiles = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read profile store: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse profile store: {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self { path, profiles: Mutex::new(profiles) })
    }

    /// Return the user's profile, creating and persisting a default one on
    /// first access.
    pub fn get_or_create(&self, user: &str) -> Result<UserProfile, ProfileError> {
        let mut profiles = self.profiles.lock();
        if let Some(profile) = profiles.get(user) {
            return Ok(profile.clone());
        }

        let profile = UserProfile::default();
        profiles.insert(user.to_string(), profile.clone());
        self.write(&profiles)?;
        Ok(profile)
    }

    /// Replace the user's profile. Rejects non-positive (or non-finite) pot
    /// volume and wattage without touching the stored record; silently
    /// truncates the city to 120 characters.
    pub fn update(
        &self,
        user: &str,
        pot_volume: f64,
        watts: f64,
        city: &str,
    ) -> Result<UserProfile, ProfileError> {
        if !(pot_volume.is_finite() && pot_volume > 0.0) {
            return Err(ProfileError::InvalidPot);
        }
        if !(watts.is_finite() && watts > 0.0) {
            return Err(ProfileError::InvalidWatts);
        }

        let profile = UserProfile {
            pot_volume,
            watts,
            city: city.chars().take(CITY_MAX_CHARS).collect(),
        };

        let mut profiles = self.profiles.lock();
        profiles.insert(user.to_string(), profile.clone());
        self.write(&profiles)?;
        Ok(profile)
    }

    fn write(&self, profiles: &HashMap<String, UserProfile>) -> Result<(), ProfileError> {
        let persist = || -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create profile directory: {}", parent.display())
                })?;
            }
            let json = serde_json::to_string_pretty(profiles)
                .context("Failed to serialize profiles")?;
            fs::write(&self.path, json)
                .with_context(|| format!("Failed to write profile store: {}", self.path.display()))?;
            Ok(())
        };

        persist().map_err(ProfileError::Persist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PreferenceStore {
        PreferenceStore::open(dir.path().join("profiles.json")).expect("open store")
    }

    #[test]
    fn first_access_creates_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let profile = store.get_or_create("anna").expect("get_or_create");
        assert_eq!(profile.pot_volume, 40.0);
        assert_eq!(profile.watts, 200.0);
        assert_eq!(profile.city, "");
    }

    #[test]
    fn update_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.update("anna", 25.0, 150.0, "Berlin").expect("update");
        drop(store);

        let reopened = store_in(&dir);
        let profile = reopened.get_or_create("anna").expect("get_or_create");
        assert_eq!(profile.pot_volume, 25.0);
        assert_eq!(profile.watts, 150.0);
        assert_eq!(profile.city, "Berlin");
    }

    #[test]
    fn rejects_non_positive_pot_and_watts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert!(matches!(store.update("a", 0.0, 100.0, ""), Err(ProfileError::InvalidPot)));
        assert!(matches!(store.update("a", -1.0, 100.0, ""), Err(ProfileError::InvalidPot)));
        assert!(matches!(store.update("a", f64::NAN, 100.0, ""), Err(ProfileError::InvalidPot)));
        assert!(matches!(store.update("a", 10.0, 0.0, ""), Err(ProfileError::InvalidWatts)));
        assert!(matches!(store.update("a", 10.0, -5.0, ""), Err(ProfileError::InvalidWatts)));
    }

    #[test]
    fn rejected_update_leaves_stored_profile_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.update("anna", 25.0, 150.0, "Berlin").expect("update");
        store.update("anna", -2.0, 999.0, "Hamburg").unwrap_err();

        let profile = store.get_or_create("anna").expect("get_or_create");
        assert_eq!(profile.pot_volume, 25.0);
        assert_eq!(profile.city, "Berlin");
    }

    #[test]
    fn city_is_truncated_to_120_chars() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let long = "x".repeat(200);
        let profile = store.update("anna", 10.0, 100.0, &long).expect("update");
        assert_eq!(profile.city.chars().count(), 120);
    }

    #[test]
    fn wire_shape_uses_short_names() {
        let profile = UserProfile { pot_volume: 12.0, watts: 90.0, city: "Köln".to_string() };
        let json = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(json, serde_json::json!({ "pot": 12.0, "watts": 90.0, "city": "Köln" }));
    }
}
