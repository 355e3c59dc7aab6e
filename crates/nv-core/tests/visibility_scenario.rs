//! Visibility state round-trip through a file, end to end.

use egui::{pos2, Color32, Pos2};
use nv_core::annotation::MarkerKind;
use nv_core::{AnnotationRegistry, CommandRecorder};
use tempfile::tempdir;

fn populate(registry: &mut AnnotationRegistry) {
    registry.marker(
        "markers.cross",
        pos2(10.0, 10.0),
        Color32::GREEN,
        MarkerKind::Cross,
        5.0,
        1.0,
    );
    registry.line("overlay.path", pos2(0.0, 0.0), pos2(4.0, 4.0), Color32::RED, 1.0);
}

#[test]
fn test_disabled_namespace_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nv.txt");

    let mut registry = AnnotationRegistry::new();
    populate(&mut registry);
    registry.save_visibility(&path).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.lines().any(|l| l == "1 markers.cross"));

    let mut fresh = AnnotationRegistry::new();
    assert_eq!(fresh.load_visibility(&path).unwrap(), 2);
    fresh.set_enabled("markers.cross", false);
    fresh.save_visibility(&path).unwrap();

    // next session: state file first, then producers
    let mut session = AnnotationRegistry::new();
    session.load_visibility(&path).unwrap();
    populate(&mut session);

    let mut canvas = CommandRecorder::new();
    session.draw(&mut canvas, Pos2::ZERO, 1.0, "markers");
    assert!(canvas.commands.is_empty());

    session.draw(&mut canvas, Pos2::ZERO, 1.0, "overlay");
    assert_eq!(canvas.lines().count(), 1);

    canvas.clear();
    session.draw(&mut canvas, Pos2::ZERO, 1.0, "");
    assert_eq!(canvas.lines().count(), 1);
}

#[test]
fn test_clear_keeps_visibility() {
    let mut registry = AnnotationRegistry::new();
    populate(&mut registry);
    registry.set_enabled("overlay.path", false);
    registry.clear_all();

    assert_eq!(registry.is_enabled("overlay.path"), Some(false));
    assert_eq!(registry.is_enabled("markers.cross"), Some(true));
    assert!(registry.group("markers.cross").unwrap().objects().is_empty());
    assert_eq!(registry.visibility_state(), "1 markers.cross\n0 overlay.path\n");
}
