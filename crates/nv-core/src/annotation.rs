//! Drawable annotation objects
//!
//! Two closed variants, [`Drawable::Line`] and [`Drawable::Text`], both stored
//! in content (image pixel) coordinates. Composite shapes like markers and
//! arrows are not stored types: [`marker_lines`] and [`arrow_lines`] expand
//! them into plain lines at insertion time.
//!
//! ## Coordinate transform
//!
//! Content coordinates address pixel centers, so every point is rendered at
//! `origin + (p + 0.5) * zoom`.

use egui::{vec2, Color32, Pos2, Rect, Vec2};

use crate::canvas::Canvas;

/// Offset from a pixel's corner to its center
pub const HALF_PIXEL: Vec2 = Vec2::splat(0.5);

/// Estimated advance of one annotation text character in screen points
const TEXT_CHAR_WIDTH: f32 = 7.0;
const TEXT_PADDING: f32 = 4.0;
const TEXT_HEIGHT: f32 = 13.0;
const TEXT_BG_ROUNDING: f32 = 4.0;

/// Map a content-space point to screen space.
#[inline]
pub fn to_screen(origin: Pos2, zoom: f32, p: Pos2) -> Pos2 {
    origin + (p.to_vec2() + HALF_PIXEL) * zoom
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Pos2,
    pub end: Pos2,
    pub color: Color32,
    /// Thickness in content pixels (scales with zoom)
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Top-left corner of the label
    pub anchor: Pos2,
    pub text: String,
    pub color: Color32,
    pub background: Option<Color32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Line(Line),
    Text(Text),
}

impl Drawable {
    pub fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, zoom: f32) {
        match self {
            Self::Line(line) => canvas.line(
                to_screen(origin, zoom, line.start),
                to_screen(origin, zoom, line.end),
                line.color,
                zoom * line.thickness,
            ),
            Self::Text(text) => {
                let pos = to_screen(origin, zoom, text.anchor);
                if let Some(bg) = text.background.filter(|c| c.a() > 0) {
                    let chars = text.text.chars().count() as f32;
                    let size = vec2(TEXT_CHAR_WIDTH * chars + TEXT_PADDING, TEXT_HEIGHT);
                    canvas.rect_filled(Rect::from_min_size(pos, size), TEXT_BG_ROUNDING, bg);
                }
                canvas.text(pos + vec2(TEXT_PADDING / 2.0, 0.0), text.color, &text.text);
            }
        }
    }
}

/// Marker shapes, numbered like OpenCV's `MARKER_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerKind {
    #[default]
    Cross,
    TiltedCross,
    Star,
    Diamond,
    Square,
    TriangleUp,
    TriangleDown,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 7] = [
        Self::Cross,
        Self::TiltedCross,
        Self::Star,
        Self::Diamond,
        Self::Square,
        Self::TriangleUp,
        Self::TriangleDown,
    ];

    /// Unknown indices fall back to a cross.
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cross => "Cross",
            Self::TiltedCross => "Tilted cross",
            Self::Star => "Star",
            Self::Diamond => "Diamond",
            Self::Square => "Square",
            Self::TriangleUp => "Triangle up",
            Self::TriangleDown => "Triangle down",
        }
    }
}

/// Expand a marker into its line segments.
pub fn marker_lines(pos: Pos2, size: f32, kind: MarkerKind) -> Vec<(Pos2, Pos2)> {
    let off_x = vec2(size, 0.0);
    let off_y = vec2(0.0, size);
    let cross = [(pos - off_x, pos + off_x), (pos - off_y, pos + off_y)];
    let tilted = [
        (pos - off_x - off_y, pos + off_x + off_y),
        (pos + off_x - off_y, pos - off_x + off_y),
    ];

    match kind {
        MarkerKind::Cross => cross.to_vec(),
        MarkerKind::TiltedCross => tilted.to_vec(),
        MarkerKind::Star => cross.into_iter().chain(tilted).collect(),
        MarkerKind::Diamond => vec![
            (pos - off_x, pos + off_y),
            (pos + off_y, pos + off_x),
            (pos + off_x, pos - off_y),
            (pos - off_y, pos - off_x),
        ],
        MarkerKind::Square => vec![
            (pos - off_x - off_y, pos - off_x + off_y),
            (pos - off_x + off_y, pos + off_x + off_y),
            (pos + off_x + off_y, pos + off_x - off_y),
            (pos + off_x - off_y, pos - off_x - off_y),
        ],
        MarkerKind::TriangleUp => vec![
            (pos - off_y, pos - off_x + off_y),
            (pos - off_y, pos + off_x + off_y),
            (pos - off_x + off_y, pos + off_x + off_y),
        ],
        MarkerKind::TriangleDown => vec![
            (pos + off_y, pos - off_x - off_y),
            (pos + off_y, pos + off_x - off_y),
            (pos - off_x - off_y, pos + off_x - off_y),
        ],
    }
}

/// Expand an arrow into its shaft followed by the two head strokes.
///
/// A zero-length arrow has no direction, so only the shaft is returned.
pub fn arrow_lines(start: Pos2, end: Pos2, head_length: f32) -> Vec<(Pos2, Pos2)> {
    let shaft = end - start;
    let length = shaft.length();
    if length <= f32::EPSILON {
        return vec![(start, end)];
    }
    let dir = shaft / length;
    let normal = vec2(dir.y, -dir.x);
    vec![
        (start, end),
        (end - (dir - normal / 2.0) * head_length, end),
        (end - (dir + normal / 2.0) * head_length, end),
    ]
}
