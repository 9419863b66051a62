//! Vertex editing gestures
//!
//! [`MapEditor`] sits between raw input and the camera controller. Presses
//! near a vertex hotspot select, move or extend the border polygon; anything
//! else is forwarded to the [`ControlPlane`]. Committed edits come back as
//! [`EditorEvent`]s for the document to apply.

use glam::{Vec2, Vec3};

use ps_camera::{Action, Button, Camera, ControlPlane, Direction};
use ps_core::{Operation, Ray, Sphere};

use crate::config::EditorConfig;
use crate::input::{Click, Key, Modifiers};

/// Committed edit of the border polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    /// Vertex `index` now sits at the given point
    PointMoved(usize, Vec3),
    /// A vertex was inserted at `index`
    PointAdded(usize, Vec3),
    /// Vertex `index` was removed
    PointRemoved(usize),
}

/// Editing state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    /// Nothing selected
    #[default]
    None,
    /// Vertex selected
    Selected(usize),
    /// Vertex being dragged to a new location
    Moving {
        /// Vertex index
        index: usize,
        /// Preview of the drop under the pointer
        operation: Operation,
    },
    /// New vertex being placed
    Adding {
        /// Insertion index
        index: usize,
        /// Preview of the insertion under the pointer
        operation: Operation,
    },
}

impl EditorState {
    /// Vertex the state refers to, if any
    pub fn index(&self) -> Option<usize> {
        match *self {
            EditorState::None => None,
            EditorState::Selected(index)
            | EditorState::Moving { index, .. }
            | EditorState::Adding { index, .. } => Some(index),
        }
    }
}

/// Globe editing controller
#[derive(Debug, Clone)]
pub struct MapEditor {
    state: EditorState,
    preselection: Option<usize>,
    plane: ControlPlane,
    /// Viewport pixel of every vertex, `None` for vertices facing away
    hotspots: Vec<Option<Vec2>>,
    hotspot_radius: f32,
}

impl Default for MapEditor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl MapEditor {
    /// Editor with nothing selected and the configured camera
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: EditorState::None,
            preselection: None,
            plane: ControlPlane::from_config(&config.camera),
            hotspots: Vec::new(),
            hotspot_radius: config.hotspot_radius,
        }
    }

    /// Current selection or edit
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Vertex under the pointer while hovering
    pub fn preselection(&self) -> Option<usize> {
        self.preselection
    }

    /// Camera controller
    pub fn plane(&self) -> &ControlPlane {
        &self.plane
    }

    /// Viewport pixel per vertex, `None` where it faces away
    pub fn hotspots(&self) -> &[Option<Vec2>] {
        &self.hotspots
    }

    /// Resize the viewport the camera renders into
    pub fn set_viewport(&mut self, size: Vec2) {
        self.plane.set_viewport(size);
    }

    /// Advance the camera; hotspots follow when it moved
    pub fn process(&mut self, delta: u32, sphere: &Sphere) -> bool {
        let changed = self.plane.process(delta);
        if changed {
            self.sync(sphere);
        }
        changed
    }

    /// Camera derived since the last call, if any
    pub fn pop(&mut self) -> Option<Camera> {
        self.plane.pop()
    }

    /// Rebuild hotspots after the camera or the vertex list changed
    pub fn sync(&mut self, sphere: &Sphere) {
        let center = sphere.center();
        self.hotspots = sphere
            .apply()
            .into_iter()
            .map(|point| self.trace(point, center))
            .collect();

        let len = self.hotspots.len();
        if self.preselection.is_some_and(|i| i >= len) {
            self.preselection = None;
        }
        let stale = match self.state {
            EditorState::Adding { index, .. } => index > len || len == 0,
            state => state.index().is_some_and(|i| i >= len),
        };
        if stale {
            tracing::debug!("Dropping stale editor state {:?}", self.state);
            self.state = EditorState::None;
        }
    }

    // front-facing vertices only
    fn trace(&self, point: Vec3, center: Vec3) -> Option<Vec2> {
        let camera = self.plane.camera();
        if (point - camera.position).dot(point - center) >= 0.0 {
            return None;
        }
        camera.to_viewport(point)
    }

    /// Closest hotspot within the pick radius
    pub fn find_hotspot(&self, position: Vec2) -> Option<usize> {
        self.hotspots
            .iter()
            .enumerate()
            .filter_map(|(i, hotspot)| hotspot.map(|h| (i, h.distance(position))))
            .filter(|(_, r)| *r < self.hotspot_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn ray(&self, position: Vec2) -> Ray {
        self.plane.rayfilm().cast(position)
    }

    /// Handle a key press; deleting the selection reports the removal
    pub fn keypress(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        sphere: &Sphere,
    ) -> Option<EditorEvent> {
        match key {
            Key::Up => self.track(Direction::Up),
            Key::Down => self.track(Direction::Down),
            Key::Left => self.track(Direction::Left),
            Key::Right => self.track(Direction::Right),
            Key::Period => {
                self.plane.jump(sphere.center());
            }
            Key::Backspace | Key::Delete => match self.state {
                EditorState::None => {}
                EditorState::Selected(index) => {
                    self.state = EditorState::None;
                    self.remove_hotspot(index);
                    return Some(EditorEvent::PointRemoved(index));
                }
                EditorState::Moving { .. } | EditorState::Adding { .. } => {
                    self.state = EditorState::None;
                }
            },
            Key::Escape => self.cancel(),
            Key::Tab => {
                if let EditorState::Selected(index) = self.state {
                    let n = sphere.len().max(1);
                    let next = if modifiers.shift {
                        (index + n - 1) % n
                    } else {
                        (index + 1) % n
                    };
                    self.state = EditorState::Selected(next);
                }
            }
        }
        None
    }

    fn track(&mut self, direction: Direction) {
        self.plane.bump(direction, Action::Track);
    }

    /// Zoom one step
    pub fn scroll(&mut self, direction: Direction) {
        self.plane.bump(direction, Action::Zoom);
    }

    /// Select, start or commit an edit, or start a camera gesture
    pub fn down(&mut self, click: Click, position: Vec2, sphere: &Sphere) -> Option<EditorEvent> {
        self.move_to(position, sphere);

        match click {
            Click::Double => {
                if let EditorState::Selected(index) = self.state {
                    let index = index + 1;
                    let operation = sphere.preview_add(index, &self.ray(position));
                    self.state = EditorState::Adding { index, operation };
                    tracing::debug!("Placing new vertex at {}", index);
                }
                None
            }
            Click::Press(Button::Primary) => match self.state {
                EditorState::None | EditorState::Selected(_) => {
                    match self.find_hotspot(position) {
                        Some(index) => self.state = EditorState::Selected(index),
                        None => {
                            self.state = EditorState::None;
                            self.plane.down(position, Button::Primary);
                        }
                    }
                    None
                }
                EditorState::Moving { index, operation } => {
                    self.commit_move(index, operation, sphere)
                }
                EditorState::Adding { index, operation } => {
                    self.commit_add(index, operation, sphere)
                }
            },
            Click::Press(Button::Secondary) => {
                match self.state {
                    EditorState::None | EditorState::Selected(_) => {
                        match self.find_hotspot(position) {
                            Some(index) => {
                                let operation = Operation::Unconstrained(sphere.points()[index]);
                                self.state = EditorState::Moving { index, operation };
                                tracing::debug!("Moving vertex {}", index);
                            }
                            None => {
                                self.state = EditorState::None;
                                self.plane.down(position, Button::Secondary);
                            }
                        }
                    }
                    EditorState::Moving { .. } | EditorState::Adding { .. } => self.cancel(),
                }
                None
            }
            Click::Press(Button::Middle) => {
                self.plane.down(position, Button::Middle);
                None
            }
        }
    }

    /// Hover, preview the pending edit or drive the camera gesture
    pub fn move_to(&mut self, position: Vec2, sphere: &Sphere) {
        self.preselection = None;
        match self.state {
            EditorState::None | EditorState::Selected(_) => {
                self.preselection = self.find_hotspot(position);
                self.plane.move_to(position);
            }
            EditorState::Moving { index, .. } => {
                if index < sphere.len() {
                    let operation = sphere.preview_move(index, &self.ray(position));
                    self.state = EditorState::Moving { index, operation };
                }
            }
            EditorState::Adding { index, .. } => {
                if !sphere.is_empty() && index <= sphere.len() {
                    let operation = sphere.preview_add(index, &self.ray(position));
                    self.state = EditorState::Adding { index, operation };
                }
            }
        }
    }

    /// End a camera gesture
    pub fn up(&mut self, position: Vec2, button: Button) {
        if *self.plane.state() != ps_camera::State::None {
            self.plane.up(position, button);
        }
    }

    /// Vertices to draw, including the pending edit
    pub fn vertices(&self, sphere: &Sphere) -> Vec<Vec3> {
        match self.state {
            EditorState::Moving { index, operation } if index < sphere.len() => {
                sphere.apply_moving(operation, index)
            }
            EditorState::Adding { index, operation } if index <= sphere.len() => {
                sphere.apply_adding(operation, index)
            }
            _ => sphere.apply(),
        }
    }

    // abandon a pending edit, keeping the vertex it started from selected
    fn cancel(&mut self) {
        self.state = match self.state {
            EditorState::Moving { index, .. } => EditorState::Selected(index),
            EditorState::Adding { index, .. } => EditorState::Selected(index.saturating_sub(1)),
            _ => EditorState::None,
        };
    }

    fn commit_move(
        &mut self,
        index: usize,
        operation: Operation,
        sphere: &Sphere,
    ) -> Option<EditorEvent> {
        match operation {
            Operation::Unconstrained(point) | Operation::Snapped(point) => {
                self.state = EditorState::Selected(index);
                let traced = self.trace(point + sphere.center(), sphere.center());
                if let Some(hotspot) = self.hotspots.get_mut(index) {
                    *hotspot = traced;
                }
                Some(EditorEvent::PointMoved(index, point))
            }
            Operation::Deleted(neighbour) => {
                self.state = EditorState::Selected(neighbour);
                self.remove_hotspot(index);
                Some(EditorEvent::PointRemoved(index))
            }
        }
    }

    fn commit_add(
        &mut self,
        index: usize,
        operation: Operation,
        sphere: &Sphere,
    ) -> Option<EditorEvent> {
        match operation {
            Operation::Unconstrained(point) | Operation::Snapped(point) => {
                self.state = EditorState::Selected(index);
                let traced = self.trace(point + sphere.center(), sphere.center());
                self.insert_hotspot(index, traced);
                Some(EditorEvent::PointAdded(index, point))
            }
            Operation::Deleted(neighbour) => {
                self.state = EditorState::Selected(neighbour);
                None
            }
        }
    }

    fn insert_hotspot(&mut self, index: usize, hotspot: Option<Vec2>) {
        if index <= self.hotspots.len() {
            self.hotspots.insert(index, hotspot);
        }
        self.preselection = match self.preselection {
            Some(p) if p >= index => Some(p + 1),
            other => other,
        };
    }

    fn remove_hotspot(&mut self, index: usize) {
        if index < self.hotspots.len() {
            self.hotspots.remove(index);
        }
        self.preselection = match self.preselection {
            Some(p) if p > index => Some(p - 1),
            Some(p) if p == index => None,
            other => other,
        };
    }
}
