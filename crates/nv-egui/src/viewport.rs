//! Tabbed image windows with zoom/pan, annotations and a pixel inspector.
//!
//! Image slots named `window:tab` are grouped into one egui window per
//! `window`; slots without a colon land in the default window. Each window
//! shows one selected tab at a time and owns its own [`ZoomController`].

use std::collections::BTreeMap;

use egui::scroll_area::ScrollSource;
use egui::{pos2, vec2, Color32, Event, MouseWheelUnit, Pos2, Rect, Sense, TextureHandle};
use nv_core::canvas::Canvas;
use nv_core::image::PixelReadout;
use nv_core::settings::ZoomSettings;
use nv_core::zoom::ZoomInput;
use nv_core::{AnnotationRegistry, ImageCache, ViewerSettings, ZoomController};

const DEFAULT_WINDOW_SIZE: [f32; 2] = [400.0, 400.0];
/// Initial window placement: side by side, left to right in window order
const WINDOW_ORIGIN: Pos2 = pos2(20.0, 40.0);
const WINDOW_SPACING: f32 = 420.0;
const INSPECTOR_BG_SIZE: [f32; 2] = [196.0, 13.0];
const INSPECTOR_BG_ROUNDING: f32 = 4.0;
/// Monospace advance used to lay out the inspector segments
const INSPECTOR_CHAR_WIDTH: f32 = 7.0;

/// Split a slot name into `(window, tab)` at the first `:`.
pub fn split_slot_name<'a>(name: &'a str, default_window: &'a str) -> (&'a str, &'a str) {
    name.split_once(':').unwrap_or((default_window, name))
}

/// Wheel notches in this frame's events, positive zooms in.
///
/// Line-based wheels count one notch per line. Point-based deltas (touchpads)
/// are divided by `points_per_step`; page deltas by `page_height` first.
pub fn wheel_notches(events: &[Event], points_per_step: f32, page_height: f32) -> f32 {
    events
        .iter()
        .filter_map(|event| match event {
            Event::MouseWheel { unit, delta, .. } => Some(match unit {
                MouseWheelUnit::Line => delta.y,
                MouseWheelUnit::Point => delta.y / points_per_step,
                MouseWheelUnit::Page => delta.y * page_height / points_per_step,
            }),
            _ => None,
        })
        .sum()
}

/// A click (press and release without movement) on a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportClick {
    pub window: String,
    pub slot: String,
    /// Content coordinate under the pointer
    pub position: Pos2,
}

#[derive(Debug)]
struct WindowState {
    /// Selected slot (full `window:tab` name)
    selected: Option<String>,
    controller: ZoomController,
    scroll: egui::Vec2,
}

impl WindowState {
    fn new(settings: ZoomSettings) -> Self {
        Self {
            selected: None,
            controller: ZoomController::new(settings),
            scroll: egui::Vec2::ZERO,
        }
    }
}

pub struct ViewportCompositor {
    default_window: String,
    zoom_settings: ZoomSettings,
    inspector_width: f32,
    windows: BTreeMap<String, WindowState>,
}

impl ViewportCompositor {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            default_window: settings.default_window.clone(),
            zoom_settings: settings.zoom,
            inspector_width: settings.inspector.width,
            windows: BTreeMap::new(),
        }
    }

    pub fn default_window(&self) -> &str {
        &self.default_window
    }

    /// Slots grouped by window, as `(tab label, slot name)` in slot order
    pub fn group_slots<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> BTreeMap<String, Vec<(String, String)>> {
        let mut groups: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for name in names {
            let (window, tab) = split_slot_name(name, &self.default_window);
            groups
                .entry(window.to_owned())
                .or_default()
                .push((tab.to_owned(), name.to_owned()));
        }
        groups
    }

    /// Currently selected slot of `window`, once it has been shown
    pub fn selected(&self, window: &str) -> Option<&str> {
        self.windows.get(window)?.selected.as_deref()
    }

    pub fn select(&mut self, window: &str, slot: &str) {
        let settings = self.zoom_settings;
        self.windows
            .entry(window.to_owned())
            .or_insert_with(|| WindowState::new(settings))
            .selected = Some(slot.to_owned());
    }

    pub fn zoom(&self, window: &str) -> Option<f32> {
        self.windows.get(window).map(|w| w.controller.zoom())
    }

    /// Draw one window per slot group.
    ///
    /// `reset` refits every window this frame. When several windows report a
    /// click in the same frame the last one (in window order) is returned.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        images: &ImageCache<TextureHandle>,
        annotations: &AnnotationRegistry,
        reset: bool,
    ) -> Option<ViewportClick> {
        let groups = self.group_slots(images.names());
        let mut click = None;

        for (index, (window, tabs)) in groups.into_iter().enumerate() {
            let settings = self.zoom_settings;
            let state = self
                .windows
                .entry(window.clone())
                .or_insert_with(|| WindowState::new(settings));

            let prefix = if window == self.default_window {
                ""
            } else {
                window.as_str()
            };
            let inspector_width = self.inspector_width;

            let shown = egui::Window::new(window.as_str())
                .default_size(DEFAULT_WINDOW_SIZE)
                .default_pos(WINDOW_ORIGIN + vec2(WINDOW_SPACING * index as f32, 0.0))
                .show(ctx, |ui| {
                    show_window(ui, state, &tabs, images, annotations, prefix, inspector_width, reset)
                });

            if let Some((slot, position)) = shown.and_then(|r| r.inner).flatten() {
                tracing::info!(window = %window, slot = %slot, x = position.x, y = position.y, "Viewport click");
                click = Some(ViewportClick {
                    window,
                    slot,
                    position,
                });
            }
        }
        click
    }
}

#[allow(clippy::too_many_arguments)]
fn show_window(
    ui: &mut egui::Ui,
    state: &mut WindowState,
    tabs: &[(String, String)],
    images: &ImageCache<TextureHandle>,
    annotations: &AnnotationRegistry,
    prefix: &str,
    inspector_width: f32,
    reset: bool,
) -> Option<(String, Pos2)> {
    if !tabs.iter().any(|(_, slot)| Some(slot) == state.selected.as_ref()) {
        state.selected = tabs.first().map(|(_, slot)| slot.clone());
    }

    ui.horizontal(|ui| {
        for (label, slot) in tabs {
            ui.selectable_value(&mut state.selected, Some(slot.clone()), label.as_str());
        }
    });

    let slot_name = state.selected.clone()?;
    let slot = images.get(&slot_name)?;
    let raster = slot.raster();

    let viewport = Rect::from_min_size(ui.cursor().min, ui.available_size());
    let response = ui.interact(viewport, ui.id().with("viewport"), Sense::click_and_drag());

    let input = ui.input(|i| {
        let pointer = i
            .pointer
            .latest_pos()
            .map(|p| p - viewport.min)
            .unwrap_or_default();
        let hovered = response.hovered();
        ZoomInput {
            viewport: viewport.size(),
            content: raster.size(),
            scroll: state.scroll,
            pointer,
            hovered,
            wheel_steps: if hovered {
                wheel_notches(
                    &i.events,
                    state.controller.settings().wheel_points_per_step,
                    viewport.height(),
                )
            } else {
                0.0
            },
            held: i.pointer.primary_down() && response.is_pointer_button_down_on(),
            pointer_delta: i.pointer.delta(),
            reset,
        }
    });
    let frame = state.controller.update(&input);

    let output = egui::ScrollArea::both()
        .id_salt("viewport_scroll")
        .auto_shrink(false)
        .scroll_source(ScrollSource::SCROLL_BAR)
        .scroll_offset(frame.scroll)
        .show(ui, |ui| {
            let (rect, _) = ui.allocate_exact_size(frame.scroll_region, Sense::hover());
            if frame.zoom <= 0.0 {
                return;
            }
            let origin = rect.min + input.viewport;
            let image_rect = Rect::from_min_size(origin, raster.size() * frame.zoom);
            let painter = ui.painter();
            painter.image(
                slot.texture().id(),
                image_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
            let mut overlay = painter.clone();
            annotations.draw(&mut overlay, origin, frame.zoom, prefix);
        });
    state.scroll = output.state.offset;

    if response.hovered() && frame.zoom > 0.0 {
        if let Some(readout) = images.inspect(&slot_name, frame.mouse_on_content) {
            let mut painter = ui.painter_at(viewport);
            let pos = viewport.min + vec2(viewport.width() - inspector_width, 0.0);
            draw_inspector(&mut painter, pos, &readout);
        }
    }

    frame.click.then(|| (slot_name, frame.mouse_on_content))
}

/// Inspector line over a translucent background at `pos`.
pub fn draw_inspector(canvas: &mut dyn Canvas, pos: Pos2, readout: &PixelReadout) {
    canvas.rect_filled(
        Rect::from_min_size(pos, INSPECTOR_BG_SIZE.into()),
        INSPECTOR_BG_ROUNDING,
        Color32::from_black_alpha(100),
    );

    let label = readout.position_label();
    canvas.text(pos, Color32::WHITE, &label);
    let mut x = pos.x + (label.chars().count() + 1) as f32 * INSPECTOR_CHAR_WIDTH;
    for channel in &readout.channels {
        let color = channel.tint.unwrap_or(Color32::WHITE);
        canvas.text(pos2(x, pos.y), color, &channel.text);
        x += (channel.text.chars().count() + 1) as f32 * INSPECTOR_CHAR_WIDTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::canvas::{CommandRecorder, DrawCommand};
    use nv_core::image::ChannelValue;

    #[test]
    fn test_split_slot_name() {
        assert_eq!(split_slot_name("camera:input", "image viewer"), ("camera", "input"));
        assert_eq!(split_slot_name("a:b:c", "image viewer"), ("a", "b:c"));
        assert_eq!(split_slot_name("overview", "image viewer"), ("image viewer", "overview"));
    }

    #[test]
    fn test_wheel_notches_by_unit() {
        let wheel = |unit, y| Event::MouseWheel {
            unit,
            delta: vec2(0.0, y),
            modifiers: egui::Modifiers::NONE,
        };
        let events = vec![wheel(MouseWheelUnit::Line, 1.0)];
        assert_eq!(wheel_notches(&events, 40.0, 300.0), 1.0);

        let events = vec![wheel(MouseWheelUnit::Point, 80.0), Event::PointerGone];
        assert_eq!(wheel_notches(&events, 40.0, 300.0), 2.0);

        let events = vec![
            wheel(MouseWheelUnit::Line, -1.0),
            wheel(MouseWheelUnit::Page, 0.5),
        ];
        // half a page of 80 points is one notch
        assert_eq!(wheel_notches(&events, 40.0, 80.0), 0.0);
        assert_eq!(wheel_notches(&[], 40.0, 80.0), 0.0);
    }

    #[test]
    fn test_group_slots() {
        let compositor = ViewportCompositor::new(&ViewerSettings::default());
        let groups = compositor.group_slots(["camera:gradient", "camera:input", "overview"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups["camera"],
            vec![
                ("gradient".to_string(), "camera:gradient".to_string()),
                ("input".to_string(), "camera:input".to_string()),
            ]
        );
        assert_eq!(
            groups["image viewer"],
            vec![("overview".to_string(), "overview".to_string())]
        );
    }

    #[test]
    fn test_inspector_layout() {
        let readout = PixelReadout {
            x: 3,
            y: 4,
            channels: vec![
                ChannelValue {
                    text: "  1".into(),
                    tint: Some(Color32::RED),
                },
                ChannelValue {
                    text: "  2".into(),
                    tint: None,
                },
            ],
        };
        let mut canvas = CommandRecorder::new();
        draw_inspector(&mut canvas, pos2(10.0, 0.0), &readout);

        assert_eq!(canvas.commands.len(), 4);
        match &canvas.commands[0] {
            DrawCommand::RectFilled { rect, color, .. } => {
                assert_eq!(rect.size(), vec2(196.0, 13.0));
                assert_eq!(*color, Color32::from_black_alpha(100));
            }
            other => panic!("expected background, got {other:?}"),
        }
        match &canvas.commands[2] {
            DrawCommand::Text { pos, color, text } => {
                // "x:    3 y:    4" is 15 chars, plus one space
                assert_eq!(pos.x, 10.0 + 16.0 * 7.0);
                assert_eq!(*color, Color32::RED);
                assert_eq!(text, "  1");
            }
            other => panic!("expected channel text, got {other:?}"),
        }
    }
}
