//! Demo application: a frame source, derived layers and live annotations.

use std::time::Instant;

use egui::{pos2, Color32, Pos2};
use nv_core::annotation::MarkerKind;
use nv_core::{Colormap, Raster, ShowOptions, ViewerSettings};

use crate::source::FrameSource;
use crate::viewer::Viewer;
use crate::viewport::ViewportClick;

pub const INPUT_SLOT: &str = "camera:input";
pub const GRADIENT_SLOT: &str = "camera:gradient";
pub const OVERVIEW_SLOT: &str = "overview";

pub struct DemoApp {
    viewer: Viewer,
    source: Box<dyn FrameSource>,
    colormap: Option<Colormap>,
    marker_kind: MarkerKind,
    last_click: Option<ViewportClick>,
    /// Most recent rejected upload, cleared by the next frame that uploads cleanly
    last_upload_error: Option<String>,
    frame_count: u64,
}

impl DemoApp {
    pub fn new(settings: &ViewerSettings, source: Box<dyn FrameSource>) -> Self {
        let mut viewer = Viewer::new(settings);
        match viewer.load_visibility() {
            Ok(applied) => tracing::debug!(applied, "Visibility state applied"),
            Err(e) => tracing::warn!(error = %e, "Failed to load visibility state"),
        }
        tracing::info!(source = source.name(), "Starting viewer");
        Self {
            viewer,
            source,
            colormap: Some(Colormap::Jet),
            marker_kind: MarkerKind::Cross,
            last_click: None,
            last_upload_error: None,
            frame_count: 0,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Pull one frame, upload its layers and rebuild the annotations.
    pub fn produce(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.source.next_frame() else {
            return;
        };
        self.frame_count += 1;
        self.viewer.profiler.reset("upload");

        let gradient = {
            let _scope = self.viewer.profiler.scope("gradient");
            gradient_magnitude(&frame)
        };
        let peak = brightest_pixel(&frame);

        self.viewer.clear_annotations();
        self.annotate(&frame, peak);

        let options = ShowOptions::default();
        let mut uploads = vec![
            (OVERVIEW_SLOT, frame.clone(), options),
            (INPUT_SLOT, frame, options),
        ];
        if let Some((gradient, max)) = gradient {
            let mut options = ShowOptions::range(0.0, max.max(f64::EPSILON));
            options.colormap = self.colormap;
            uploads.push((GRADIENT_SLOT, gradient, options));
        }

        self.last_upload_error = None;
        for (slot, raster, options) in uploads {
            if let Err(e) = self.viewer.show_image(ctx, slot, raster, &options) {
                tracing::warn!(slot, error = %e, "Frame layer rejected");
                self.last_upload_error = Some(format!("{slot}: {e}"));
            }
        }
    }

    pub fn last_upload_error(&self) -> Option<&str> {
        self.last_upload_error.as_deref()
    }

    fn annotate(&mut self, frame: &Raster, peak: Option<Pos2>) {
        let annotations = &mut self.viewer.annotations;
        let size = frame.size();
        let corners = [
            pos2(0.0, 0.0),
            pos2(size.x - 1.0, 0.0),
            pos2(size.x - 1.0, size.y - 1.0),
            pos2(0.0, size.y - 1.0),
        ];
        for i in 0..corners.len() {
            annotations.line(
                "overlay.border",
                corners[i],
                corners[(i + 1) % corners.len()],
                Color32::from_rgb(80, 80, 80),
                1.0,
            );
        }
        annotations.put_text(
            "overlay.label",
            format!("frame {}", self.frame_count),
            pos2(2.0, 2.0),
            Color32::WHITE,
            Some(Color32::from_black_alpha(160)),
        );

        if let Some(peak) = peak {
            let center = (size / 2.0).to_pos2();
            annotations.marker("camera.peak", peak, Color32::YELLOW, self.marker_kind, 6.0, 1.0);
            annotations.arrow("camera.direction", center, peak, Color32::LIGHT_BLUE, 1.0, 8.0);
        }
        if let Some(click) = &self.last_click {
            annotations.marker(
                "overlay.click",
                click.position,
                Color32::RED,
                MarkerKind::TiltedCross,
                4.0,
                1.0,
            );
        }
    }

    fn config_panel(&mut self, ui: &mut egui::Ui) -> bool {
        let reset = ui.button("Reset zoom").clicked();

        egui::ComboBox::from_label("Colormap")
            .selected_text(self.colormap.map_or("Grey", |map| map.label()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.colormap, None, "Grey");
                for map in Colormap::ALL {
                    ui.selectable_value(&mut self.colormap, Some(map), map.label());
                }
            });
        egui::ComboBox::from_label("Peak marker")
            .selected_text(self.marker_kind.label())
            .show_ui(ui, |ui| {
                for kind in MarkerKind::ALL {
                    ui.selectable_value(&mut self.marker_kind, kind, kind.label());
                }
            });

        if let Some(click) = &self.last_click {
            ui.label(format!(
                "Last click: {} ({:.1}, {:.1})",
                click.slot, click.position.x, click.position.y
            ));
        }
        if let Some(error) = &self.last_upload_error {
            ui.colored_label(Color32::LIGHT_RED, format!("Upload failed: {error}"));
        }
        reset
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let start = Instant::now();
        self.produce(ctx);
        self.viewer
            .profiler
            .record("produce", start.elapsed(), false);

        let mut reset_zoom = false;
        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Config");
                    reset_zoom = self.config_panel(ui);
                    ui.separator();
                    egui::CollapsingHeader::new("Annotations")
                        .default_open(true)
                        .show(ui, |ui| self.viewer.render_visibility_panel(ui));
                    egui::CollapsingHeader::new("Profiler")
                        .default_open(false)
                        .show(ui, |ui| self.viewer.render_profiler_panel(ui));
                });
            });

        if let Some(click) = self.viewer.render_viewports(ctx, reset_zoom) {
            self.last_click = Some(click);
        }

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.viewer.save_visibility() {
            tracing::error!(error = %e, "Failed to save visibility state");
        }
    }
}

/// Horizontal gradient magnitude of the frame's luma, with its maximum.
pub fn gradient_magnitude(frame: &Raster) -> Option<(Raster, f64)> {
    let (w, h) = (frame.width(), frame.height());
    let mut out = Vec::with_capacity(w as usize * h as usize);
    let mut max = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            let right = luma(frame, (x + 1).min(w.saturating_sub(1)), y);
            let left = luma(frame, x.saturating_sub(1), y);
            let g = (right - left).abs();
            max = max.max(g);
            out.push(g as f32);
        }
    }
    Raster::new(w, h, 1, out).ok().map(|r| (r, max))
}

/// Content coordinate of the first brightest pixel
pub fn brightest_pixel(frame: &Raster) -> Option<Pos2> {
    let mut best: Option<(f64, u32, u32)> = None;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let v = luma(frame, x, y);
            if best.map_or(true, |(b, _, _)| v > b) {
                best = Some((v, x, y));
            }
        }
    }
    best.map(|(_, x, y)| pos2(x as f32, y as f32))
}

fn luma(frame: &Raster, x: u32, y: u32) -> f64 {
    let Some(i) = frame.sample_index(x, y) else {
        return 0.0;
    };
    let sample = |c: usize| frame.data().get(i + c).unwrap_or(0.0);
    if frame.channels() >= 3 {
        // B,G,R
        0.114 * sample(0) + 0.587 * sample(1) + 0.299 * sample(2)
    } else {
        sample(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightest_pixel() {
        let frame = Raster::new(3, 2, 1, vec![0u8, 5, 1, 9, 9, 2]).unwrap();
        assert_eq!(brightest_pixel(&frame), Some(pos2(0.0, 1.0)));
        let empty = Raster::new(0, 0, 1, Vec::<u8>::new()).unwrap();
        assert_eq!(brightest_pixel(&empty), None);
    }

    #[test]
    fn test_gradient_magnitude() {
        let frame = Raster::new(3, 1, 1, vec![0u8, 10, 30]).unwrap();
        let (gradient, max) = gradient_magnitude(&frame).unwrap();
        assert_eq!(gradient.channels(), 1);
        // centered differences, clamped at the borders
        assert_eq!(gradient.data().get(0), Some(10.0));
        assert_eq!(gradient.data().get(1), Some(30.0));
        assert_eq!(gradient.data().get(2), Some(20.0));
        assert_eq!(max, 30.0);
    }

    struct TwoChannelSource;

    impl FrameSource for TwoChannelSource {
        fn name(&self) -> &str {
            "two-channel"
        }

        fn next_frame(&mut self) -> Option<Raster> {
            Raster::new(2, 2, 2, vec![1u8; 8]).ok()
        }
    }

    #[test]
    fn test_rejected_layers_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ViewerSettings {
            visibility_file: dir.path().join("nv.txt"),
            ..ViewerSettings::default()
        };
        let mut app = DemoApp::new(&settings, Box::new(TwoChannelSource));
        let ctx = egui::Context::default();
        app.produce(&ctx);

        // the single-channel gradient still uploads
        assert!(app.viewer().images.get(GRADIENT_SLOT).is_some());
        assert!(app.viewer().images.get(INPUT_SLOT).is_none());
        let error = app.last_upload_error().unwrap();
        assert!(error.starts_with(INPUT_SLOT), "{error}");
    }

    #[test]
    fn test_luma_reads_bgr() {
        let frame = Raster::new(1, 1, 3, vec![0u8, 0, 100]).unwrap();
        assert!((luma(&frame, 0, 0) - 29.9).abs() < 1e-9);
    }
}
