//! Player preferences
//!
//! Persisted in LocalStorage on the web; native builds always start from the
//! defaults.

use serde::{Deserialize, Serialize};

/// Audio and display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Crowd ambience volume (0.0 - 1.0)
    pub crowd_volume: f32,
    /// Speak umpire calls aloud
    pub voice_enabled: bool,
    pub muted: bool,
    /// Mute when the tab loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show the key bindings overlay
    pub show_controls_help: bool,
    /// Show the quarter clock
    pub show_clock: bool,

    // === Match ===
    /// Roster index of the home club
    pub home_team: usize,
    /// Roster index of the away club
    pub away_team: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            crowd_volume: 0.3,
            voice_enabled: true,
            muted: false,
            mute_on_blur: true,

            show_controls_help: true,
            show_clock: true,

            // Crows v Blues
            home_team: 0,
            away_team: 2,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "oval_footy_settings";

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Home and away roster indices, forced apart and into range
    pub fn team_indices(&self, roster_len: usize) -> (usize, usize) {
        if roster_len < 2 {
            return (0, 0);
        }
        let home = self.home_team % roster_len;
        let mut away = self.away_team % roster_len;
        if away == home {
            away = (home + 1) % roster_len;
        }
        (home, away)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings store for {}", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "muted": true, "away_team": 5 }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.away_team, 5);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_roundtrip() {
        let settings = Settings {
            crowd_volume: 0.1,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_team_indices_never_collide() {
        let settings = Settings {
            home_team: 4,
            away_team: 22,
            ..Default::default()
        };
        assert_eq!(settings.team_indices(18), (4, 5));
        let same = Settings {
            home_team: 17,
            away_team: 17,
            ..Default::default()
        };
        assert_eq!(same.team_indices(18), (17, 0));
    }
}
