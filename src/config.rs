use crate::overlay::OverlayOptions;
use crate::spinner::SpinnerStyle;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User-configurable overlay appearance.
/// Stored in the platform config directory (`$XDG_CONFIG_HOME/activity-loader/` or `%APPDATA%\activity-loader\`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stroke colour of the overlay spinner.
    pub activity_color: Color32,
    /// Colour of the panel drawn behind the spinner.
    pub background_color: Color32,
    /// Opacity of the background panel (0.0–1.0).
    pub background_alpha: f32,
    /// Style preset of the overlay spinner.
    pub overlay_style: SpinnerStyle,
    /// Whether preview spinners hide their stroke once stopped.
    pub hides_when_stopped: bool,
    /// How long the demo keeps the overlay up, in seconds.
    pub demo_overlay_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        let overlay = OverlayOptions::default();
        Self {
            activity_color: overlay.activity_color,
            background_color: overlay.background_color,
            background_alpha: overlay.alpha,
            overlay_style: overlay.style,
            hides_when_stopped: true,
            demo_overlay_secs: 3.0,
        }
    }
}

impl Config {
    /// Load config from `config.json` in the platform config directory, or return defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents, &path),
            Err(_) => {
                log::info!(
                    "No config file at {}, using defaults. Creating default config.",
                    path.display()
                );
                let config = Self::default();
                config.save();
                config
            }
        }
    }

    fn parse(contents: &str, path: &Path) -> Self {
        match serde_json::from_str::<Self>(contents) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config.sanitized()
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.background_alpha = self.background_alpha.clamp(0.0, 1.0);
        if self.demo_overlay_secs.is_nan() || self.demo_overlay_secs <= 0.0 {
            self.demo_overlay_secs = Self::default().demo_overlay_secs;
        }
        self
    }

    /// Save current config to `config.json`.
    pub fn save(&self) {
        let path = config_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::warn!("Failed to write config to {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
            }
        }
    }

    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            activity_color: self.activity_color,
            background_color: self.background_color,
            alpha: self.background_alpha,
            style: self.overlay_style,
        }
    }
}

fn config_path() -> PathBuf {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("activity-loader");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok();
    }
    dir.join("config.json")
}
