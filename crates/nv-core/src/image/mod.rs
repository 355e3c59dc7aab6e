//! Raster frames and the image cache
//!
//! A [`Raster`] is a row-major, channel-interleaved 2D buffer with a typed
//! sample depth. Three-channel rasters are in B,G,R order (the order camera
//! and decoder pipelines hand us); four-channel rasters are uploaded as-is.

mod cache;
mod colormap;
mod inspector;

pub use cache::{normalize, ImageCache, ImageSlot, ShowOptions, TextureBackend};
pub use colormap::Colormap;
pub use inspector::{ChannelValue, PixelReadout};

use egui::{vec2, Vec2};

use crate::error::{NvError, Result};

/// Sample type of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelDepth {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl PixelDepth {
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Typed sample storage
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl PixelData {
    pub fn depth(&self) -> PixelDepth {
        match self {
            Self::U8(_) => PixelDepth::U8,
            Self::I8(_) => PixelDepth::I8,
            Self::U16(_) => PixelDepth::U16,
            Self::I16(_) => PixelDepth::I16,
            Self::I32(_) => PixelDepth::I32,
            Self::F32(_) => PixelDepth::F32,
            Self::F64(_) => PixelDepth::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at flat index `i`, widened to f64
    pub fn get(&self, i: usize) -> Option<f64> {
        match self {
            Self::U8(v) => v.get(i).map(|&x| f64::from(x)),
            Self::I8(v) => v.get(i).map(|&x| f64::from(x)),
            Self::U16(v) => v.get(i).map(|&x| f64::from(x)),
            Self::I16(v) => v.get(i).map(|&x| f64::from(x)),
            Self::I32(v) => v.get(i).map(|&x| f64::from(x)),
            Self::F32(v) => v.get(i).map(|&x| f64::from(x)),
            Self::F64(v) => v.get(i).copied(),
        }
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for PixelData {
                fn from(v: Vec<$ty>) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec!(u8 => U8, i8 => I8, u16 => U16, i16 => I16, i32 => I32, f32 => F32, f64 => F64);

/// An interleaved image buffer: `height` rows of `width` pixels, `channels` samples each.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u8,
    data: PixelData,
}

impl Raster {
    /// Wrap a sample buffer, checking it holds `width * height * channels` samples.
    pub fn new(width: u32, height: u32, channels: u8, data: impl Into<PixelData>) -> Result<Self> {
        let data = data.into();
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(usize::from(channels));
        if data.len() != expected {
            return Err(NvError::RasterShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn depth(&self) -> PixelDepth {
        self.data.depth()
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Size in content-space units
    pub fn size(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat index of the first sample of pixel `(x, y)`
    pub fn sample_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * usize::from(self.channels))
    }
}
