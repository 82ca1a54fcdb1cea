//! Player profile persistence
//!
//! Best distance, coin bank and skin unlocks survive across runs in a small
//! JSON file. Loading is infallible: a missing or corrupt file falls back to
//! defaults with a warning, never an error. Saving writes to a temp file and
//! renames it over the old one so a crash mid-write cannot truncate the
//! profile.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Coin price of each skin past the free default
pub const SKIN_PRICE: u64 = 20;

/// Persistent player profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Best distance over all runs
    pub best_distance: u64,
    /// Coin bank accumulated across runs
    pub coins: u64,
    /// Unlocked skin indices; always contains 0
    pub unlocked_skins: Vec<usize>,
    /// Skin used for the next run
    pub selected_skin: usize,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_distance: 0,
            coins: 0,
            unlocked_skins: vec![0],
            selected_skin: 0,
        }
    }
}

impl Profile {
    /// Profile location: `LANE_HOPPER_PROFILE` if set, else next to the
    /// executable's working directory
    pub fn default_path() -> PathBuf {
        std::env::var_os("LANE_HOPPER_PROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lane-hopper-profile.json"))
    }

    /// Load from disk, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Profile>(&json) {
                Ok(profile) => {
                    log::info!(
                        "profile loaded: best {}, {} coins",
                        profile.best_distance,
                        profile.coins
                    );
                    profile.sanitized()
                }
                Err(err) => {
                    log::warn!("profile file corrupt ({err}), starting fresh");
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                log::warn!("profile unreadable ({err}), starting fresh");
                Self::default()
            }
        }
    }

    /// Write atomically: temp file in the same directory, then rename
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        log::debug!("profile saved to {}", path.display());
        Ok(())
    }

    /// Fold a finished run into the profile. Returns true on a new best.
    pub fn apply_run(&mut self, distance: u64, coins: u64) -> bool {
        self.coins += coins;
        if distance > self.best_distance {
            self.best_distance = distance;
            log::info!("new best distance: {distance}");
            return true;
        }
        false
    }

    /// Spend coins to unlock a skin. Returns false if already owned or
    /// unaffordable.
    pub fn unlock_skin(&mut self, skin: usize) -> bool {
        if self.unlocked_skins.contains(&skin) || self.coins < SKIN_PRICE {
            return false;
        }
        self.coins -= SKIN_PRICE;
        self.unlocked_skins.push(skin);
        true
    }

    /// Select a skin for the next run; ignored unless unlocked
    pub fn select_skin(&mut self, skin: usize) {
        if self.unlocked_skins.contains(&skin) {
            self.selected_skin = skin;
        }
    }

    /// Repair invariants a hand-edited file may have broken
    fn sanitized(mut self) -> Self {
        if !self.unlocked_skins.contains(&0) {
            self.unlocked_skins.insert(0, 0);
        }
        if !self.unlocked_skins.contains(&self.selected_skin) {
            self.selected_skin = 0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lane-hopper-test-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let path = temp_path("roundtrip");
        let mut profile = Profile::default();
        profile.apply_run(42, 7);
        profile.save(&path).unwrap();

        let loaded = Profile::load(&path);
        assert_eq!(loaded, profile);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let profile = Profile::load(Path::new("/nonexistent/lane-hopper.json"));
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();
        let profile = Profile::load(&path);
        assert_eq!(profile, Profile::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_apply_run_tracks_best_and_banks_coins() {
        let mut profile = Profile::default();
        assert!(profile.apply_run(10, 3));
        assert!(!profile.apply_run(5, 2));
        assert_eq!(profile.best_distance, 10);
        assert_eq!(profile.coins, 5);
    }

    #[test]
    fn test_skin_unlock_spends_coins() {
        let mut profile = Profile::default();
        profile.coins = SKIN_PRICE + 5;

        assert!(profile.unlock_skin(2));
        assert_eq!(profile.coins, 5);
        assert!(!profile.unlock_skin(2), "already owned");
        assert!(!profile.unlock_skin(3), "unaffordable");

        profile.select_skin(2);
        assert_eq!(profile.selected_skin, 2);
        profile.select_skin(9); // locked, ignored
        assert_eq!(profile.selected_skin, 2);
    }

    #[test]
    fn test_load_repairs_broken_invariants() {
        let path = temp_path("repair");
        std::fs::write(
            &path,
            r#"{"best_distance":1,"coins":0,"unlocked_skins":[3],"selected_skin":7}"#,
        )
        .unwrap();
        let profile = Profile::load(&path);
        assert!(profile.unlocked_skins.contains(&0));
        assert_eq!(profile.selected_skin, 0);
        std::fs::remove_file(&path).unwrap();
    }
}
