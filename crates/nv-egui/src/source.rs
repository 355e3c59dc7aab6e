//! Frame sources feeding the demo viewer.

use std::path::Path;

use anyhow::Context as _;
use nv_core::Raster;

/// Produces one raster per rendered frame.
pub trait FrameSource {
    fn name(&self) -> &str;

    /// Next frame, or `None` when the source has nothing to show.
    fn next_frame(&mut self) -> Option<Raster>;
}

/// Moving color bars with a bright spot, 3-channel B,G,R.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    tick: u32,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }

    /// Position of the bright spot for the current tick
    pub fn spot(&self) -> (u32, u32) {
        let w = self.width.max(1);
        let h = self.height.max(1);
        (self.tick.wrapping_mul(3) % w, (h / 2 + (self.tick % h) / 4) % h)
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn next_frame(&mut self) -> Option<Raster> {
        self.tick = self.tick.wrapping_add(1);
        let (sx, sy) = self.spot();
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x.abs_diff(sx);
                let dy = y.abs_diff(sy);
                if dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) <= 25 {
                    data.extend_from_slice(&[255, 255, 255]);
                    continue;
                }
                let bar = (x.wrapping_add(self.tick) / 16 % 3) as usize;
                let shade = (y * 255 / self.height.max(1)) as u8;
                let mut bgr = [shade / 4; 3];
                bgr[bar] = 64 + shade / 2;
                data.extend_from_slice(&bgr);
            }
        }
        Raster::new(self.width, self.height, 3, data).ok()
    }
}

/// A still image replayed on every frame.
pub struct ImageFileSource {
    name: String,
    frame: Raster,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        let bgr: Vec<u8> = decoded
            .pixels()
            .flat_map(|p| [p.0[2], p.0[1], p.0[0]])
            .collect();
        let frame = Raster::new(width, height, 3, bgr)?;
        tracing::info!(path = %path.display(), width, height, "Loaded image source");
        Ok(Self {
            name: path.display().to_string(),
            frame,
        })
    }

    pub fn frame(&self) -> &Raster {
        &self.frame
    }
}

impl FrameSource for ImageFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> Option<Raster> {
        Some(self.frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_synthetic_frames_are_bgr() {
        let mut source = SyntheticSource::new(32, 16);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 16);
        assert_eq!(frame.channels(), 3);
        let (x, y) = source.spot();
        let i = frame.sample_index(x, y).unwrap();
        assert_eq!(frame.data().get(i), Some(255.0));
    }

    #[test]
    fn test_synthetic_tick_wraps() {
        let mut source = SyntheticSource {
            width: 32,
            height: 16,
            tick: u32::MAX - 1,
        };
        for _ in 0..4 {
            let frame = source.next_frame().unwrap();
            assert_eq!(frame.data().len(), 32 * 16 * 3);
            let (x, y) = source.spot();
            assert!(x < 32 && y < 16);
        }
        assert_eq!(source.tick, 2);
    }

    #[test]
    fn test_image_file_swaps_to_bgr() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let mut source = ImageFileSource::open(&path).unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (2, 1));
        assert_eq!(frame.data().get(0), Some(30.0));
        assert_eq!(frame.data().get(2), Some(10.0));
    }

    #[test]
    fn test_missing_image_file() {
        let dir = tempdir().unwrap();
        let err = ImageFileSource::open(&dir.path().join("absent.png")).err().unwrap();
        assert!(err.to_string().contains("Failed to decode image"));
    }
}
