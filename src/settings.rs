//! Game settings and preferences
//!
//! Persisted separately from the player profile, through the same storage
//! backends.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;
use crate::platform::storage::{self, KeyValueStore};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => MAX_PARTICLES,
            QualityPreset::High => 400,
        }
    }

    /// Fraction of each bullet trail that gets drawn (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.34,
            QualityPreset::Medium => 0.67,
            QualityPreset::High => 1.0,
        }
    }

    /// Extra glow halos on particles and bullets
    pub fn glow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,
    /// Bullet trails
    pub trails: bool,
    /// Particle effects (explosions, sparks, etc.)
    pub particles: bool,

    // === HUD ===
    /// Floating damage numbers
    pub damage_numbers: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0), forwarded to the presentation layer
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no shake offsets, no invincibility flicker)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            trails: true,
            particles: true,
            damage_numbers: true,
            master_volume: 0.8,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Number of trail points drawn for a trail of `len`
    pub fn trail_points(&self, len: usize) -> usize {
        if !self.trails {
            return 0;
        }
        ((len as f32 * self.quality.trail_quality()).ceil() as usize).min(len)
    }

    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_core_settings";

    /// Load settings, falling back to defaults on missing or bad data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match storage::load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
                log::info!("Loaded settings ({} quality)", settings.quality.as_str());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings. Failures are logged, never raised.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match storage::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_preset_particle_caps() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 60);
        assert_eq!(Settings::default().max_particles(), MAX_PARTICLES);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 400);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!s.effective_screen_shake());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_trail_points() {
        let mut s = Settings::from_preset(QualityPreset::High);
        assert_eq!(s.trail_points(6), 6);
        s.quality = QualityPreset::Low;
        assert_eq!(s.trail_points(6), 3);
        s.trails = false;
        assert_eq!(s.trail_points(6), 0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let s = Settings {
            quality: QualityPreset::High,
            reduced_motion: true,
            ..Settings::default()
        };
        s.save(&mut store);
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_corrupt_or_partial_data() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        // Missing fields take their defaults
        store.set(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#).unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.quality, QualityPreset::Low);
        assert!(s.trails);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_name("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_name("ultra"), None);
    }
}
