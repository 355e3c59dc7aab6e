//! Image cache: display slots holding the latest raster and its texture
//!
//! Every `show` call stores the raw raster (for the inspector) and re-uploads
//! the normalized RGBA pixels; the texture itself is allocated once per slot.
//!
//! ## Upload normalization
//!
//! 1. Non-8-bit samples are rescaled with `(v - min) * 255 / (max - min)`,
//!    rounded and saturated to 0..=255.
//! 2. Single-channel data is colormapped when a map is given, otherwise
//!    replicated to grey.
//! 3. Three-channel data is swapped from B,G,R to R,G,B.
//! 4. Everything is uploaded as opaque-by-default 4-channel 8-bit RGBA.

use std::borrow::Cow;
use std::collections::BTreeMap;

use egui::{ColorImage, Pos2, TextureHandle, TextureOptions};

use super::colormap::Colormap;
use super::inspector::PixelReadout;
use super::{PixelData, Raster};
use crate::error::{NvError, Result};

/// Display parameters for [`ImageCache::show`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowOptions {
    /// Sample value mapped to 255 (non-8-bit rasters only)
    pub max_val: f64,
    /// Sample value mapped to 0 (non-8-bit rasters only)
    pub min_val: f64,
    /// Colormap for single-channel rasters
    pub colormap: Option<Colormap>,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            max_val: 1.0,
            min_val: 0.0,
            colormap: None,
        }
    }
}

impl ShowOptions {
    pub fn range(min_val: f64, max_val: f64) -> Self {
        Self {
            max_val,
            min_val,
            ..Self::default()
        }
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = Some(colormap);
        self
    }

    /// Select a colormap by OpenCV id; negative ids mean none.
    ///
    /// Ids without a built-in map fall back to greyscale.
    pub fn with_colormap_id(mut self, id: i32) -> Self {
        self.colormap = if id < 0 {
            None
        } else {
            let map = Colormap::from_id(id);
            if map.is_none() {
                tracing::warn!(id, "Unknown colormap id, falling back to greyscale");
            }
            map
        };
        self
    }
}

/// GPU texture allocation and upload
pub trait TextureBackend {
    type Handle;

    /// Create a texture for a new slot with nearest-neighbor sampling
    fn allocate(&mut self, name: &str, image: ColorImage) -> Self::Handle;

    /// Replace the pixels of an existing texture
    fn upload(&mut self, handle: &mut Self::Handle, image: ColorImage);
}

impl TextureBackend for egui::Context {
    type Handle = TextureHandle;

    fn allocate(&mut self, name: &str, image: ColorImage) -> TextureHandle {
        self.load_texture(name, image, TextureOptions::NEAREST)
    }

    fn upload(&mut self, handle: &mut TextureHandle, image: ColorImage) {
        handle.set(image, TextureOptions::NEAREST);
    }
}

/// Build the RGBA upload buffer for a raster.
///
/// Rejects zero-area rasters and channel counts other than 1, 3 or 4.
pub fn normalize(raster: &Raster, options: &ShowOptions) -> Result<ColorImage> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(NvError::EmptyRaster {
            width: raster.width(),
            height: raster.height(),
        });
    }
    let channels = raster.channels();
    if !matches!(channels, 1 | 3 | 4) {
        return Err(NvError::UnsupportedFormat {
            channels,
            depth: raster.depth(),
        });
    }

    let samples: Cow<'_, [u8]> = match raster.data() {
        PixelData::U8(v) => Cow::Borrowed(v),
        other => Cow::Owned(rescale_to_u8(other, options.min_val, options.max_val)),
    };

    let mut rgba = Vec::with_capacity(raster.pixel_count() * 4);
    match channels {
        1 => match options.colormap {
            Some(map) => {
                for &v in samples.iter() {
                    let [r, g, b] = map.apply(v);
                    rgba.extend_from_slice(&[r, g, b, 255]);
                }
            }
            None => {
                for &v in samples.iter() {
                    rgba.extend_from_slice(&[v, v, v, 255]);
                }
            }
        },
        3 => {
            for bgr in samples.chunks_exact(3) {
                rgba.extend_from_slice(&[bgr[2], bgr[1], bgr[0], 255]);
            }
        }
        _ => rgba.extend_from_slice(&samples),
    }

    Ok(ColorImage::from_rgba_unmultiplied(
        [raster.width() as usize, raster.height() as usize],
        &rgba,
    ))
}

fn rescale_to_u8(data: &PixelData, min_val: f64, max_val: f64) -> Vec<u8> {
    let mut range = max_val - min_val;
    if range.abs() < f64::EPSILON {
        range = f64::EPSILON;
    }
    let scale = 255.0 / range;
    (0..data.len())
        .map(|i| {
            let v = data.get(i).unwrap_or(0.0);
            ((v - min_val) * scale).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// A display slot: latest raw raster plus its texture
#[derive(Debug)]
pub struct ImageSlot<H> {
    raster: Raster,
    texture: H,
}

impl<H> ImageSlot<H> {
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn texture(&self) -> &H {
        &self.texture
    }
}

/// Named display slots, ordered by name
#[derive(Debug)]
pub struct ImageCache<H = TextureHandle> {
    slots: BTreeMap<String, ImageSlot<H>>,
}

impl<H> Default for ImageCache<H> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<H> ImageCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `raster` in slot `name` and upload it.
    ///
    /// Nothing is stored or uploaded if the raster cannot be normalized.
    pub fn show<B>(&mut self, backend: &mut B, name: &str, raster: Raster, options: &ShowOptions) -> Result<()>
    where
        B: TextureBackend<Handle = H>,
    {
        let image = match normalize(&raster, options) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(slot = name, error = %e, "Rejected image upload");
                return Err(e);
            }
        };

        if let Some(slot) = self.slots.get_mut(name) {
            backend.upload(&mut slot.texture, image);
            slot.raster = raster;
        } else {
            tracing::debug!(
                slot = name,
                width = raster.width(),
                height = raster.height(),
                "Allocating texture for new image slot"
            );
            let texture = backend.allocate(name, image);
            self.slots.insert(name.to_owned(), ImageSlot { raster, texture });
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ImageSlot<H>> {
        self.slots.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageSlot<H>)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Inspector readout for content position `pos` in slot `name`.
    ///
    /// Unknown slots and positions outside the raster yield `None`.
    pub fn inspect(&self, name: &str, pos: Pos2) -> Option<PixelReadout> {
        let slot = self.slots.get(name)?;
        PixelReadout::at(&slot.raster, pos)
    }
}
