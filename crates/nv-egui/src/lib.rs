//! nv-egui - egui shell for the nv-viewer engine
//!
//! Hosts the [`viewer::Viewer`] context inside eframe: one tabbed window per
//! image slot group, plus side panels for annotation visibility and profiler
//! timings.

pub mod app;
pub mod panels;
pub mod source;
pub mod viewer;
pub mod viewport;

pub use viewer::Viewer;
pub use viewport::{ViewportClick, ViewportCompositor};
