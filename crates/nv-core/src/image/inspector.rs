//! Pixel inspector readout
//!
//! Formats the raw sample values under the cursor. Widths are fixed per
//! depth so the overlay does not jitter while the pointer moves.

use std::fmt;

use egui::{Color32, Pos2};

use super::{PixelDepth, Raster};

/// Tints for three-channel readouts, in display order R, G, B
const RGB_TINTS: [Color32; 3] = [
    Color32::from_rgb(255, 80, 0),
    Color32::from_rgb(0, 255, 0),
    Color32::from_rgb(100, 100, 255),
];

/// One formatted channel value
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelValue {
    pub text: String,
    pub tint: Option<Color32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelReadout {
    pub x: u32,
    pub y: u32,
    pub channels: Vec<ChannelValue>,
}

impl PixelReadout {
    /// Read the pixel containing content position `pos`.
    ///
    /// Returns `None` when `pos` lies outside the raster.
    pub fn at(raster: &Raster, pos: Pos2) -> Option<Self> {
        if !(pos.x >= 0.0 && pos.y >= 0.0) {
            return None;
        }
        let x = pos.x.floor() as u32;
        let y = pos.y.floor() as u32;
        let base = raster.sample_index(x, y)?;
        let depth = raster.depth();

        let channels = if raster.channels() == 3 {
            // stored B,G,R; shown R,G,B
            [2usize, 1, 0]
                .iter()
                .zip(RGB_TINTS)
                .map(|(&offset, tint)| ChannelValue {
                    text: format_sample(depth, raster.data().get(base + offset).unwrap_or(0.0)),
                    tint: Some(tint),
                })
                .collect()
        } else {
            (0..usize::from(raster.channels()))
                .map(|c| ChannelValue {
                    text: format_sample(depth, raster.data().get(base + c).unwrap_or(0.0)),
                    tint: None,
                })
                .collect()
        };

        Some(Self { x, y, channels })
    }

    pub fn position_label(&self) -> String {
        format!("x: {:4} y: {:4}", self.x, self.y)
    }
}

impl fmt::Display for PixelReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.position_label())?;
        for channel in &self.channels {
            write!(f, " {}", channel.text)?;
        }
        Ok(())
    }
}

fn format_sample(depth: PixelDepth, value: f64) -> String {
    match depth {
        PixelDepth::U8 => format!("{:3}", value as i64),
        PixelDepth::I8 => format!("{:4}", value as i64),
        PixelDepth::U16 | PixelDepth::I16 => format!("{:6}", value as i64),
        PixelDepth::I32 => format!("{:10}", value as i64),
        PixelDepth::F32 | PixelDepth::F64 => format!("{value:10.2}"),
    }
}
