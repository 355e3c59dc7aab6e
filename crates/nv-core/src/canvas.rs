//! Drawing seam between annotations and the host painter.
//!
//! Annotations only ever need three primitives in screen space: a line, a
//! filled rectangle and a run of text. [`Canvas`] is implemented for
//! [`egui::Painter`] for on-screen rendering and for [`CommandRecorder`], which
//! keeps the calls as data (headless consumers and tests).

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

/// Font size used for annotation text and the pixel inspector.
pub const TEXT_FONT_SIZE: f32 = 13.0;

pub trait Canvas {
    fn line(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32);
    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32);
    fn text(&mut self, pos: Pos2, color: Color32, text: &str);
}

impl Canvas for Painter {
    fn line(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32) {
        self.line_segment([from, to], Stroke::new(width, color));
    }

    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32) {
        Painter::rect_filled(self, rect, rounding, color);
    }

    fn text(&mut self, pos: Pos2, color: Color32, text: &str) {
        Painter::text(
            self,
            pos,
            Align2::LEFT_TOP,
            text,
            FontId::monospace(TEXT_FONT_SIZE),
            color,
        );
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
    },
    RectFilled {
        rect: Rect,
        rounding: f32,
        color: Color32,
    },
    Text {
        pos: Pos2,
        color: Color32,
        text: String,
    },
}

/// Canvas that records draw calls instead of painting them
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for CommandRecorder {
    fn line(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn rect_filled(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.commands.push(DrawCommand::RectFilled {
            rect,
            rounding,
            color,
        });
    }

    fn text(&mut self, pos: Pos2, color: Color32, text: &str) {
        self.commands.push(DrawCommand::Text {
            pos,
            color,
            text: text.to_owned(),
        });
    }
}
