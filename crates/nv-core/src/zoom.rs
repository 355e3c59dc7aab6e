//! Per-window zoom/pan controller
//!
//! The viewport is a scroll area whose content is the zoomed raster padded
//! on every side by one viewport size. The padding lets the image be panned
//! past its edges and gives the fit-to-window offsets room to center it:
//!
//! ```text
//! scroll region = floor(content * zoom) + 2 * viewport
//! image origin  = scroll area origin + viewport
//! ```
//!
//! ## Per-frame update
//!
//! 1. Fit to window when uninitialized or reset (never on the first frame,
//!    the viewport size is unknown until something has been laid out).
//! 2. Resolve the content point under the pointer at the current zoom.
//! 3. Apply the wheel: new zoom is `zoom * step^notches`, clamped, and the
//!    scroll offset is solved so the point under the pointer stays put.
//! 4. Pan by the pointer delta while the primary button is held.
//! 5. On release, report a click if the pointer did not move at all since
//!    the press.

use egui::{vec2, Pos2, Vec2};

use crate::settings::ZoomSettings;

/// Pointer and layout state for one frame of one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomInput {
    /// Visible size of the scroll area
    pub viewport: Vec2,
    /// Native raster size
    pub content: Vec2,
    /// Scroll offset the scroll area currently shows
    pub scroll: Vec2,
    /// Pointer position relative to the viewport's top-left corner
    pub pointer: Vec2,
    /// Pointer is over the viewport background
    pub hovered: bool,
    /// Wheel notches this frame, positive zooms in
    pub wheel_steps: f32,
    /// Primary button held on the viewport background
    pub held: bool,
    /// Pointer movement this frame
    pub pointer_delta: Vec2,
    /// Force a fit-to-window this frame
    pub reset: bool,
}

/// Controller output for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFrame {
    /// Zoom to draw with, 0.0 while uninitialized
    pub zoom: f32,
    /// Content coordinate under the pointer
    pub mouse_on_content: Pos2,
    /// Button released without any movement since the press
    pub click: bool,
    /// Scroll offset to apply
    pub scroll: Vec2,
    /// Total scrollable content size at `zoom`
    pub scroll_region: Vec2,
}

/// What the controller did in its most recent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPhase {
    /// No fit yet, zoom is 0.0
    Uninitialized,
    Idle,
    /// Wheel zoom applied this frame
    Zooming,
    /// Primary button held since a press on the viewport
    Dragging,
}

/// Zoom, pan and click state for one viewport window.
#[derive(Debug, Clone)]
pub struct ZoomController {
    settings: ZoomSettings,
    /// 0.0 until the first fit
    zoom: f32,
    zoom_changed: bool,
    frame_counter: u64,
    was_dragging: bool,
    drag_anchor: Option<Vec2>,
}

impl ZoomController {
    /// Uninitialized controller; the first fit happens on its second update.
    pub fn new(settings: ZoomSettings) -> Self {
        Self {
            settings,
            zoom: 0.0,
            zoom_changed: false,
            frame_counter: 0,
            was_dragging: false,
            drag_anchor: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    pub fn phase(&self) -> ZoomPhase {
        if self.zoom <= 0.0 {
            ZoomPhase::Uninitialized
        } else if self.was_dragging {
            ZoomPhase::Dragging
        } else if self.zoom_changed {
            ZoomPhase::Zooming
        } else {
            ZoomPhase::Idle
        }
    }

    /// Advance one frame (steps in the module docs) and return what to draw with.
    pub fn update(&mut self, input: &ZoomInput) -> ZoomFrame {
        self.frame_counter += 1;
        self.zoom_changed = false;
        let padding = input.viewport;
        let mut scroll = input.scroll;

        if (self.zoom <= 0.0 || input.reset) && self.frame_counter > 1 {
            let (zoom, fit_scroll) = fit_to_window(input.viewport, input.content, &self.settings);
            tracing::debug!(zoom, "Fit content to window");
            self.zoom = zoom;
            scroll = fit_scroll;
        }

        let mouse_on_content = if self.zoom > 0.0 {
            content_under_pointer(scroll, padding, input.pointer, self.zoom)
        } else {
            Pos2::ZERO
        };

        if self.zoom > 0.0 && input.hovered && input.wheel_steps != 0.0 {
            let zoom = self
                .settings
                .clamp(self.zoom * self.settings.step.powf(input.wheel_steps));
            if zoom != self.zoom {
                scroll = anchor_scroll(mouse_on_content, zoom, input.pointer, padding);
                self.zoom = zoom;
                self.zoom_changed = true;
            }
        }

        let mut click = false;
        if input.held {
            if self.was_dragging {
                scroll -= input.pointer_delta;
            } else {
                self.was_dragging = true;
                self.drag_anchor = Some(input.pointer);
            }
        } else if self.was_dragging {
            self.was_dragging = false;
            // strict: any movement at all makes it a drag
            click = self.drag_anchor.take() == Some(input.pointer);
        }

        ZoomFrame {
            zoom: self.zoom,
            mouse_on_content,
            click,
            scroll,
            scroll_region: scroll_region(input.content, self.zoom.max(0.0), padding),
        }
    }
}

/// Zoom and scroll offset that fit `content` into `viewport`.
///
/// Content that is relatively wider than the box matches the box width and
/// is centered vertically; otherwise it matches the height and is centered
/// horizontally. Zero dimensions are treated as 1.
pub fn fit_to_window(viewport: Vec2, content: Vec2, settings: &ZoomSettings) -> (f32, Vec2) {
    let viewport = viewport.max(Vec2::splat(1.0));
    let content = content.max(Vec2::splat(1.0));
    let box_ratio = viewport.y / viewport.x;
    let content_ratio = content.y / content.x;

    if content_ratio < box_ratio {
        let zoom = settings.clamp(viewport.x / content.x);
        let scaled = content.y * zoom;
        (zoom, vec2(viewport.x, viewport.y - (viewport.y - scaled) / 2.0))
    } else {
        let zoom = settings.clamp(viewport.y / content.y);
        let scaled = content.x * zoom;
        (zoom, vec2(viewport.x - (viewport.x - scaled) / 2.0, viewport.y))
    }
}

/// Content coordinate shown at `pointer` (viewport-relative).
#[inline]
pub fn content_under_pointer(scroll: Vec2, padding: Vec2, pointer: Vec2, zoom: f32) -> Pos2 {
    ((scroll - padding + pointer) / zoom).to_pos2()
}

/// Scroll offset that shows `content_point` at `pointer` when zoomed to `zoom`.
#[inline]
pub fn anchor_scroll(content_point: Pos2, zoom: f32, pointer: Vec2, padding: Vec2) -> Vec2 {
    content_point.to_vec2() * zoom - pointer + padding
}

/// Scrollable size: the zoomed content padded by `padding` on every side.
pub fn scroll_region(content: Vec2, zoom: f32, padding: Vec2) -> Vec2 {
    (content * zoom).floor() + padding * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::splat(400.0);

    fn input(content: Vec2) -> ZoomInput {
        ZoomInput {
            viewport: VIEWPORT,
            content,
            ..Default::default()
        }
    }

    /// Controller past its first frame and fitted to `content`
    fn fitted(content: Vec2) -> (ZoomController, ZoomFrame) {
        let mut controller = ZoomController::new(ZoomSettings::default());
        controller.update(&input(content));
        let frame = controller.update(&input(content));
        (controller, frame)
    }

    #[test]
    fn test_fit_wide_content_matches_width() {
        let (zoom, scroll) =
            fit_to_window(VIEWPORT, vec2(800.0, 400.0), &ZoomSettings::default());
        assert_eq!(zoom, 0.5);
        // scaled height 200, centered in 400
        assert_eq!(scroll, vec2(400.0, 300.0));
    }

    #[test]
    fn test_fit_tall_content_matches_height() {
        let (zoom, scroll) =
            fit_to_window(VIEWPORT, vec2(400.0, 800.0), &ZoomSettings::default());
        assert_eq!(zoom, 0.5);
        assert_eq!(scroll, vec2(300.0, 400.0));
    }

    #[test]
    fn test_fit_centers_image_in_view() {
        let content = vec2(800.0, 400.0);
        let (zoom, scroll) = fit_to_window(VIEWPORT, content, &ZoomSettings::default());
        // image occupies [padding, padding + scaled] in scroll-region space
        let image_min = VIEWPORT;
        let image_max = VIEWPORT + content * zoom;
        let above = image_min.y - scroll.y;
        let below = scroll.y + VIEWPORT.y - image_max.y;
        assert_eq!(above, below);
        assert_eq!(image_min.x, scroll.x);
    }

    #[test]
    fn test_fit_degenerate_sizes() {
        let settings = ZoomSettings::default();
        let (zoom, _) = fit_to_window(Vec2::ZERO, Vec2::ZERO, &settings);
        assert_eq!(zoom, 1.0);
        let (zoom, _) = fit_to_window(VIEWPORT, vec2(1.0, 1.0), &settings);
        assert_eq!(zoom, 100.0);
    }

    #[test]
    fn test_first_frame_skips_fit() {
        let mut controller = ZoomController::new(ZoomSettings::default());
        let frame = controller.update(&input(vec2(800.0, 400.0)));
        assert_eq!(frame.zoom, 0.0);
        assert_eq!(controller.phase(), ZoomPhase::Uninitialized);

        let frame = controller.update(&input(vec2(800.0, 400.0)));
        assert_eq!(frame.zoom, 0.5);
        assert_eq!(frame.scroll, vec2(400.0, 300.0));
        assert_eq!(frame.scroll_region, vec2(1200.0, 1000.0));
        assert_eq!(controller.phase(), ZoomPhase::Idle);
    }

    #[test]
    fn test_reset_refits() {
        let content = vec2(800.0, 400.0);
        let (mut controller, _) = fitted(content);
        let zoomed = controller.update(&ZoomInput {
            hovered: true,
            wheel_steps: 3.0,
            ..input(content)
        });
        assert!(zoomed.zoom > 0.5);

        let frame = controller.update(&ZoomInput {
            reset: true,
            scroll: zoomed.scroll,
            ..input(content)
        });
        assert_eq!(frame.zoom, 0.5);
        assert_eq!(frame.scroll, vec2(400.0, 300.0));
    }

    #[test]
    fn test_wheel_keeps_point_under_pointer() {
        let content = vec2(800.0, 400.0);
        let (mut controller, fit) = fitted(content);
        let pointer = vec2(123.0, 77.0);
        let before = content_under_pointer(fit.scroll, VIEWPORT, pointer, fit.zoom);

        let frame = controller.update(&ZoomInput {
            scroll: fit.scroll,
            pointer,
            hovered: true,
            wheel_steps: 1.0,
            ..input(content)
        });
        assert!((frame.zoom - 0.55).abs() < 1e-6);
        assert_eq!(controller.phase(), ZoomPhase::Zooming);
        assert_eq!(frame.mouse_on_content, before);

        let after = content_under_pointer(frame.scroll, VIEWPORT, pointer, frame.zoom);
        assert!((after - before).length() < 1e-4);
    }

    #[test]
    fn test_wheel_ignored_when_not_hovered() {
        let content = vec2(800.0, 400.0);
        let (mut controller, fit) = fitted(content);
        let frame = controller.update(&ZoomInput {
            scroll: fit.scroll,
            wheel_steps: 2.0,
            ..input(content)
        });
        assert_eq!(frame.zoom, fit.zoom);
        assert_eq!(frame.scroll, fit.scroll);
    }

    #[test]
    fn test_zoom_clamped_at_limits() {
        let content = vec2(800.0, 400.0);
        let (mut controller, _) = fitted(content);
        let frame = controller.update(&ZoomInput {
            hovered: true,
            wheel_steps: 500.0,
            ..input(content)
        });
        assert_eq!(frame.zoom, 100.0);
        let frame = controller.update(&ZoomInput {
            hovered: true,
            wheel_steps: -500.0,
            ..input(content)
        });
        assert_eq!(frame.zoom, 0.1);
    }

    #[test]
    fn test_click_without_movement() {
        let content = vec2(100.0, 100.0);
        let (mut controller, fit) = fitted(content);
        let pointer = vec2(200.0, 200.0);
        let press = ZoomInput {
            scroll: fit.scroll,
            pointer,
            hovered: true,
            held: true,
            ..input(content)
        };
        assert!(!controller.update(&press).click);
        assert!(!controller.update(&press).click);
        assert_eq!(controller.phase(), ZoomPhase::Dragging);

        let release = ZoomInput { held: false, ..press };
        let frame = controller.update(&release);
        assert!(frame.click);
        assert_eq!(controller.phase(), ZoomPhase::Idle);

        // no second click on the following frame
        assert!(!controller.update(&release).click);
    }

    #[test]
    fn test_any_movement_is_a_drag() {
        let content = vec2(100.0, 100.0);
        let (mut controller, fit) = fitted(content);
        let press = ZoomInput {
            scroll: fit.scroll,
            pointer: vec2(200.0, 200.0),
            hovered: true,
            held: true,
            ..input(content)
        };
        controller.update(&press);

        let release = ZoomInput {
            held: false,
            pointer: vec2(200.0, 200.001),
            ..press
        };
        assert!(!controller.update(&release).click);
    }

    #[test]
    fn test_drag_pans_against_pointer() {
        let content = vec2(100.0, 100.0);
        let (mut controller, fit) = fitted(content);
        let press = ZoomInput {
            scroll: fit.scroll,
            pointer: vec2(200.0, 200.0),
            hovered: true,
            held: true,
            ..input(content)
        };
        let frame = controller.update(&press);
        assert_eq!(frame.scroll, fit.scroll);

        let frame = controller.update(&ZoomInput {
            pointer: vec2(210.0, 195.0),
            pointer_delta: vec2(10.0, -5.0),
            ..press
        });
        assert_eq!(frame.scroll, fit.scroll - vec2(10.0, -5.0));
        assert_eq!(frame.zoom, fit.zoom);
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_in_bounds(steps in prop::collection::vec(-40.0f32..40.0, 1..30)) {
            let content = vec2(640.0, 480.0);
            let (mut controller, mut frame) = fitted(content);
            for wheel_steps in steps {
                frame = controller.update(&ZoomInput {
                    scroll: frame.scroll,
                    pointer: vec2(150.0, 250.0),
                    hovered: true,
                    wheel_steps,
                    ..input(content)
                });
                prop_assert!((0.1..=100.0).contains(&frame.zoom));
            }
        }

        #[test]
        fn prop_anchor_invariance(
            zoom in 0.1f32..100.0,
            scroll_x in 0.0f32..2000.0,
            scroll_y in 0.0f32..2000.0,
            pointer_x in 0.0f32..400.0,
            pointer_y in 0.0f32..400.0,
            notches in -5.0f32..5.0,
        ) {
            let settings = ZoomSettings::default();
            let scroll = vec2(scroll_x, scroll_y);
            let pointer = vec2(pointer_x, pointer_y);
            let before = content_under_pointer(scroll, VIEWPORT, pointer, zoom);

            let new_zoom = settings.clamp(zoom * settings.step.powf(notches));
            let new_scroll = anchor_scroll(before, new_zoom, pointer, VIEWPORT);
            let after = content_under_pointer(new_scroll, VIEWPORT, pointer, new_zoom);

            // the recovered point is only as exact as the f32 scroll offset
            let offsets = new_scroll.length() + VIEWPORT.length() + pointer.length();
            let tolerance = 1e-4 * before.to_vec2().length().max(1.0)
                + 8.0 * f32::EPSILON * offsets / new_zoom;
            prop_assert!((after - before).length() <= tolerance);
        }
    }
}
