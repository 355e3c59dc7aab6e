//! Error type for the viewer engine.
//!
//! Most engine failures are recovered locally (unknown names are no-ops, a
//! missing visibility file is an empty state). `NvError` covers the cases that
//! must reach the caller: I/O on state files, malformed rasters that cannot be
//! uploaded, and invalid settings.

use thiserror::Error;

use crate::image::PixelDepth;

#[derive(Error, Debug)]
pub enum NvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Raster buffer holds {actual} samples, expected {expected}")]
    RasterShape { expected: usize, actual: usize },

    #[error("Raster has zero area ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("Unsupported raster format: {channels} channel(s) of {depth:?}")]
    UnsupportedFormat { channels: u8, depth: PixelDepth },

    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, NvError>;
