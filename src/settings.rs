//! Game settings
//!
//! Optional overrides persisted in LocalStorage, plus the `snowflakeImage`
//! URL query parameter for a custom ornament image.

use serde::{Deserialize, Serialize};

/// Where the player is sent after a win
pub const DEFAULT_WIN_DESTINATION: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
/// Where the player is sent after a loss
pub const DEFAULT_LOSS_DESTINATION: &str = "https://nixos.org/download/#download-nix";

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Time scale applied to wall-clock deltas
    pub speed: f64,
    /// Catch-up cap per frame after a stall (`None` = replay everything)
    pub max_ticks_per_frame: Option<u32>,
    /// Placeholder colour while no ornament image has loaded
    pub fallback_color: String,
    /// Image tried before every built-in source
    pub custom_image: Option<String>,
    pub win_destination: String,
    pub loss_destination: String,
    /// LocalStorage key holding the score ceiling
    pub ceiling_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_ticks_per_frame: None,
            fallback_color: "#000".to_string(),
            custom_image: None,
            win_destination: DEFAULT_WIN_DESTINATION.to_string(),
            loss_destination: DEFAULT_LOSS_DESTINATION.to_string(),
            ceiling_key: "maxScore".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snowfall_settings";

    /// Query parameter naming a custom ornament image
    pub const IMAGE_PARAM: &'static str = "snowflakeImage";

    /// Fastest accepted time scale
    pub const MAX_SPEED: f64 = 10.0;

    /// Decode settings JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Replace values that would stall or hang the frame loop with defaults
    pub fn sanitized(mut self) -> Self {
        if !(self.speed.is_finite() && self.speed > 0.0 && self.speed <= Self::MAX_SPEED) {
            log::warn!("Invalid speed {}, using 1.0", self.speed);
            self.speed = 1.0;
        }
        if self.max_ticks_per_frame == Some(0) {
            log::warn!("Catch-up cap of 0 ticks would freeze the round, removing it");
            self.max_ticks_per_frame = None;
        }
        self
    }

    /// Override the custom image. Empty values are ignored.
    pub fn with_custom_image(mut self, image: Option<String>) -> Self {
        if let Some(image) = image.filter(|s| !s.trim().is_empty()) {
            self.custom_image = Some(image);
        }
        self
    }

    /// Load settings from LocalStorage and the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let storage = window.as_ref().and_then(|w| w.local_storage().ok()).flatten();

        let mut settings = Self::default();
        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(loaded) => {
                        log::info!("Loaded settings from LocalStorage");
                        settings = loaded;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e:#}"),
                }
            }
        }

        let image = window
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get(Self::IMAGE_PARAM));
        settings.with_custom_image(image)
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
