//! Viewer settings, persisted as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NvError, Result};

/// Settings the viewer reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Visibility state file, one `"<0|1> <namespace>"` line per namespace
    pub visibility_file: PathBuf,
    /// Window that collects image slots without a `window:` prefix
    pub default_window: String,
    /// Zoom/pan behavior
    pub zoom: ZoomSettings,
    /// Pixel inspector overlay
    pub inspector: InspectorSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            visibility_file: PathBuf::from("nv.txt"),
            default_window: "image viewer".to_string(),
            zoom: ZoomSettings::default(),
            inspector: InspectorSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Zoom limits and wheel response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Zoom multiplier per wheel notch
    pub step: f32,
    pub min: f32,
    pub max: f32,
    /// Scroll points counted as one notch for point-based wheels (touchpads).
    /// Line-based wheel events are used as notches directly.
    pub wheel_points_per_step: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: 1.1,
            min: 0.1,
            max: 100.0,
            wheel_points_per_step: 40.0,
        }
    }
}

impl ZoomSettings {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    /// Distance of the readout from the right edge of the viewport
    pub width: f32,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self { width: 210.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: LogLevel,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

/// Log level enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl ViewerSettings {
    /// `<config dir>/nv-viewer/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nv-viewer").join("settings.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(NvError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let zoom = &self.zoom;
        if zoom.min <= 0.0 {
            return Err(NvError::InvalidSettings(format!(
                "zoom.min must be positive, got {}",
                zoom.min
            )));
        }
        if zoom.min >= zoom.max {
            return Err(NvError::InvalidSettings(format!(
                "zoom.min ({}) must be below zoom.max ({})",
                zoom.min, zoom.max
            )));
        }
        if zoom.step <= 1.0 {
            return Err(NvError::InvalidSettings(format!(
                "zoom.step must be greater than 1, got {}",
                zoom.step
            )));
        }
        if zoom.wheel_points_per_step <= 0.0 {
            return Err(NvError::InvalidSettings(format!(
                "zoom.wheel_points_per_step must be positive, got {}",
                zoom.wheel_points_per_step
            )));
        }
        Ok(())
    }
}
