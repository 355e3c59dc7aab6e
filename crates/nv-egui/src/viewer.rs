//! The viewer context: everything a frame producer and the render pass share.

use std::path::{Path, PathBuf};

use egui::TextureHandle;
use nv_core::{AnnotationRegistry, ImageCache, Profiler, Raster, ShowOptions, ViewerSettings};

use crate::panels;
use crate::viewport::{ViewportClick, ViewportCompositor};

/// Owns the annotation registry, image cache, compositor and profiler.
///
/// Producers fill `annotations` and call [`Viewer::show_image`] during a
/// frame, then the host calls [`Viewer::render_viewports`] once.
pub struct Viewer {
    pub annotations: AnnotationRegistry,
    pub images: ImageCache<TextureHandle>,
    pub profiler: Profiler,
    compositor: ViewportCompositor,
    visibility_file: PathBuf,
}

impl Viewer {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            annotations: AnnotationRegistry::new(),
            images: ImageCache::new(),
            profiler: Profiler::new(),
            compositor: ViewportCompositor::new(settings),
            visibility_file: settings.visibility_file.clone(),
        }
    }

    pub fn visibility_file(&self) -> &Path {
        &self.visibility_file
    }

    pub fn compositor(&self) -> &ViewportCompositor {
        &self.compositor
    }

    /// Upload `raster` into slot `name`.
    ///
    /// A rejected raster leaves the slot untouched and returns the cache error.
    pub fn show_image(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        raster: Raster,
        options: &ShowOptions,
    ) -> nv_core::Result<()> {
        let mut backend = ctx.clone();
        let _scope = self.profiler.scope_accumulate("upload");
        self.images.show(&mut backend, name, raster, options)
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear_all();
    }

    pub fn render_viewports(&mut self, ctx: &egui::Context, reset_zoom: bool) -> Option<ViewportClick> {
        let _scope = self.profiler.scope("render");
        self.compositor
            .show(ctx, &self.images, &self.annotations, reset_zoom)
    }

    pub fn render_visibility_panel(&mut self, ui: &mut egui::Ui) {
        panels::visibility_panel(ui, &mut self.annotations);
    }

    pub fn render_profiler_panel(&self, ui: &mut egui::Ui) {
        panels::profiler_panel(ui, &self.profiler);
    }

    pub fn load_visibility(&mut self) -> nv_core::Result<usize> {
        self.annotations.load_visibility(&self.visibility_file)
    }

    pub fn save_visibility(&self) -> nv_core::Result<()> {
        self.annotations.save_visibility(&self.visibility_file)
    }
}
