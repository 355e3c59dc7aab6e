//! nv-core - annotation and viewport engine
//!
//! Everything the viewer needs that is independent of the windowing shell:
//! - Drawable annotations (lines, text, marker and arrow generators)
//! - Namespaced annotation registry with persistent visibility state
//! - Image cache with upload normalization and a pixel inspector
//! - Per-window zoom/pan controller
//! - Scope profiler and viewer settings
//!
//! The engine is single-threaded: producers and the render pass run inside the
//! same per-frame callback, so none of these types carry locks.

pub mod annotation;
pub mod canvas;
pub mod error;
pub mod image;
pub mod profiler;
pub mod registry;
pub mod settings;
pub mod zoom;

pub use annotation::{Drawable, MarkerKind};
pub use canvas::{Canvas, CommandRecorder, DrawCommand};
pub use error::{NvError, Result};
pub use image::{Colormap, ImageCache, PixelData, PixelDepth, Raster, ShowOptions, TextureBackend};
pub use profiler::Profiler;
pub use registry::AnnotationRegistry;
pub use settings::ViewerSettings;
pub use zoom::{ZoomController, ZoomFrame, ZoomInput};
