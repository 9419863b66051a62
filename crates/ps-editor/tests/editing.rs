//! Editing sessions driven through the document

use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use ps_camera::Direction;
use ps_core::Map;
use ps_editor::{Button, Click, Document, EditorConfig, EditorState, Key, Modifiers};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

fn open(map: Map) -> Document {
    let mut document = Document::new(map, &EditorConfig::default());
    document.set_viewport(VIEWPORT);
    settle(&mut document);
    document
}

fn settle(document: &mut Document) {
    while document.editor().plane().phase().is_some() {
        document.process(16);
    }
}

fn hotspot(document: &Document, index: usize) -> Vec2 {
    document.editor().hotspots()[index].expect("vertex faces the camera")
}

#[test]
fn test_insert_between_vertices() {
    let mut document = open(Map::default());
    let first = hotspot(&document, 0);
    let second = hotspot(&document, 1);

    document.down(Click::Press(Button::Primary), first);
    document.up(first, Button::Primary);
    document.down(Click::Double, first);

    let between = (first + second) * 0.5;
    document.move_to(between);
    assert_eq!(document.frame().vertices.len(), 5);
    // the map itself is untouched until the edit is committed
    assert_eq!(document.map().points().len(), 4);

    document.down(Click::Press(Button::Primary), between);
    assert_eq!(document.map().points().len(), 5);
    assert_eq!(*document.editor().state(), EditorState::Selected(1));
    assert!(document.is_modified());

    let added = document.map().points()[1];
    assert_abs_diff_eq!(added.length(), 1.0, epsilon = 1e-5);
    // lies between its neighbours
    let neighbours = document.map().points()[0] + document.map().points()[2];
    assert!(added.dot(neighbours.normalize()) > 0.95);
}

#[test]
fn test_move_then_save_and_reopen() {
    let mut document = open(Map::default());
    let start = hotspot(&document, 3);
    let drop = VIEWPORT * 0.5;

    document.down(Click::Press(Button::Secondary), start);
    document.move_to(drop);
    document.down(Click::Press(Button::Primary), drop);

    // the globe center faces the eye
    let moved = document.map().points()[3];
    assert!(moved.abs_diff_eq(Vec3::Z, 1e-4), "{moved}");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.json");
    document.save(Some(path.as_path())).unwrap();
    assert!(!document.is_modified());

    let reopened = Document::open(&path, &EditorConfig::default()).unwrap();
    assert_eq!(reopened.map().points().len(), 4);
    assert!(reopened.map().points()[3].abs_diff_eq(moved, 1e-6));
}

#[test]
fn test_collapse_onto_neighbour_removes_vertex() {
    let mut document = open(Map::default());
    let start = hotspot(&document, 0);
    let neighbour = hotspot(&document, 1);

    document.down(Click::Press(Button::Secondary), start);
    document.move_to(neighbour);
    document.down(Click::Press(Button::Primary), neighbour);

    assert_eq!(document.map().points().len(), 3);
    // the neighbour slid into the removed slot
    assert_eq!(*document.editor().state(), EditorState::Selected(0));
    assert_eq!(document.editor().hotspots().len(), 3);
}

#[test]
fn test_escape_discards_pending_move() {
    let mut document = open(Map::default());
    let before = document.map().points().to_vec();
    let start = hotspot(&document, 2);

    document.down(Click::Press(Button::Secondary), start);
    document.move_to(VIEWPORT * 0.5);
    document.keypress(Key::Escape, Modifiers::default());

    assert_eq!(*document.editor().state(), EditorState::Selected(2));
    assert_eq!(document.map().points(), before.as_slice());
    assert!(!document.is_modified());
}

#[test]
fn test_camera_keys_move_hotspots() {
    let mut document = open(Map::default());
    let before = hotspot(&document, 0);

    document.scroll(Direction::Up);
    settle(&mut document);
    assert!(document.pop().is_some());
    let zoomed = hotspot(&document, 0);
    // vertex 0 is above the center and spreads away from it when zooming in
    assert!(zoomed.y > before.y);

    document.keypress(Key::Left, Modifiers::default());
    settle(&mut document);
    assert!(hotspot(&document, 0).x > zoomed.x);
}
