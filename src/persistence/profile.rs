//! Player profile: lifetime stats across runs

use serde::{Deserialize, Serialize};

use crate::platform::storage::{self, KeyValueStore};

/// Schema version written by this build
pub const PROFILE_VERSION: u32 = 1;

/// Lifetime stats. Stored fields are merged over the defaults, so older
/// saves with missing fields still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub high_score: u64,
    pub total_games_played: u64,
    pub total_kills: u64,
    pub version: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            high_score: 0,
            total_games_played: 0,
            total_kills: 0,
            version: PROFILE_VERSION,
        }
    }
}

impl Profile {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "NEON_CORE_PROFILE_V1";

    /// Load the profile. Missing or unreadable data yields the default
    /// profile; nothing is raised.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match storage::load_json::<Profile>(store, Self::STORAGE_KEY) {
            Ok(Some(mut profile)) => {
                if profile.migrate() {
                    log::info!("Profile migrated to version {}", profile.version);
                }
                profile
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Failed to load profile, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save the profile. Failures are logged and swallowed.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Err(e) = storage::save_json(store, Self::STORAGE_KEY, self) {
            log::warn!("Failed to save profile: {e}");
        }
    }

    /// Bring an older record up to [`PROFILE_VERSION`]. Returns true when
    /// anything changed.
    pub fn migrate(&mut self) -> bool {
        if self.version >= PROFILE_VERSION {
            if self.version > PROFILE_VERSION {
                log::warn!("Profile version {} is newer than this build", self.version);
            }
            return false;
        }
        // Pre-versioned saves (version 0) share the v1 field layout
        self.version = PROFILE_VERSION;
        true
    }

    /// Raise the stored high score if `score` beats it. Returns whether it did.
    pub fn update_high_score(store: &mut dyn KeyValueStore, score: u64) -> bool {
        let mut profile = Self::load(store);
        if score > profile.high_score {
            profile.high_score = score;
            profile.save(store);
            log::info!("New high score: {score}");
            true
        } else {
            false
        }
    }

    /// Count one finished run and its kills
    pub fn record_game(store: &mut dyn KeyValueStore, kills: u64) {
        let mut profile = Self::load(store);
        profile.total_games_played += 1;
        profile.total_kills += kills;
        profile.save(store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_missing_profile_is_default() {
        let store = MemoryStore::new();
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_corrupt_profile_is_default() {
        let mut store = MemoryStore::new();
        store.set(Profile::STORAGE_KEY, "][").unwrap();
        assert_eq!(Profile::load(&store), Profile::default());
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store.set(Profile::STORAGE_KEY, r#"{"highScore":900}"#).unwrap();
        let p = Profile::load(&store);
        assert_eq!(p.high_score, 900);
        assert_eq!(p.total_games_played, 0);
        assert_eq!(p.version, PROFILE_VERSION);
    }

    #[test]
    fn test_old_version_is_migrated() {
        let mut store = MemoryStore::new();
        store
            .set(Profile::STORAGE_KEY, r#"{"highScore":5,"totalKills":3,"version":0}"#)
            .unwrap();
        let p = Profile::load(&store);
        assert_eq!(p.version, PROFILE_VERSION);
        assert_eq!(p.total_kills, 3);
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut store = MemoryStore::new();
        assert!(Profile::update_high_score(&mut store, 100));
        assert!(!Profile::update_high_score(&mut store, 100));
        assert!(!Profile::update_high_score(&mut store, 40));
        assert!(Profile::update_high_score(&mut store, 101));
        assert_eq!(Profile::load(&store).high_score, 101);
    }

    #[test]
    fn test_record_game_accumulates() {
        let mut store = MemoryStore::new();
        Profile::record_game(&mut store, 12);
        Profile::record_game(&mut store, 0);
        let p = Profile::load(&store);
        assert_eq!(p.total_games_played, 2);
        assert_eq!(p.total_kills, 12);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&Profile::default()).unwrap();
        assert!(json.contains("\"highScore\""));
        assert!(json.contains("\"totalGamesPlayed\""));
    }
}
