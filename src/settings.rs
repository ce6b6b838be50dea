use crate::errors::Result;
use crate::grayscale::GrayscaleMode;
use crate::render::{RenderSpec, DEFAULT_FILL, TRANSPARENT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_HORIZONTAL_SCALE: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Rendering
    pub horizontal_scale: u32,
    pub fill_color: [u8; 4],
    pub background_color: [u8; 4],
    pub grayscale_mode: GrayscaleMode,

    // Panels
    pub show_source_image: bool,

    // Session
    pub last_folder: Option<PathBuf>,

    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizontal_scale: 1,
            fill_color: DEFAULT_FILL,
            background_color: TRANSPARENT,
            grayscale_mode: GrayscaleMode::RedChannel,

            show_source_image: true,

            last_folder: None,

            debug_logging: false,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "histoview", "HistoView")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Loads from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring unreadable settings: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                e.log();
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Render settings with the scale clamped to `1..=MAX_HORIZONTAL_SCALE`.
    pub fn render_spec(&self) -> RenderSpec {
        let scale = self.horizontal_scale.clamp(1, MAX_HORIZONTAL_SCALE);
        RenderSpec::new(scale, self.fill_color)
            .unwrap_or_default()
            .with_background(self.background_color)
    }
}
