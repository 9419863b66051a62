//! Open map document
//!
//! Owns the map, its editing model and the editor, routes input to the editor
//! and applies the edits it reports back to the map.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};

use ps_camera::{Camera, CameraUniform, Direction};
use ps_core::{Map, MapError, Sphere};

use crate::config::EditorConfig;
use crate::editor::{EditorEvent, MapEditor};
use crate::input::{Button, Click, Key, Modifiers};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Camera uniform buffer data
    pub uniform: CameraUniform,
    /// Border vertices in world space, including the pending edit
    pub vertices: Vec<Vec3>,
    /// Selected or edited vertex
    pub selection: Option<usize>,
    /// Vertex under the pointer
    pub preselection: Option<usize>,
}

/// Map document with its editor
#[derive(Debug, Clone)]
pub struct Document {
    map: Map,
    sphere: Sphere,
    editor: MapEditor,
    snap_threshold: f32,
    /// File the map was loaded from or last saved to
    path: Option<PathBuf>,
    /// Has unsaved changes
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Map::default(), &EditorConfig::default())
    }
}

impl Document {
    pub fn new(map: Map, config: &EditorConfig) -> Self {
        let sphere = map.sphere(config.snap_threshold);
        let mut editor = MapEditor::new(config);
        editor.sync(&sphere);
        Self {
            map,
            sphere,
            editor,
            snap_threshold: config.snap_threshold,
            path: None,
            modified: false,
        }
    }

    /// Open a map file
    pub fn open(path: impl AsRef<Path>, config: &EditorConfig) -> Result<Self, MapError> {
        let path = path.as_ref();
        let map = Map::load(path)?;
        let mut document = Self::new(map, config);
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Save to `path`, or to the file the map came from
    pub fn save(&mut self, path: Option<&Path>) -> Result<(), DocumentError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.path.clone().ok_or(DocumentError::NoPath)?,
        };
        self.map.save(&path)?;
        self.path = Some(path);
        self.modified = false;
        Ok(())
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn editor(&self) -> &MapEditor {
        &self.editor
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.editor.set_viewport(size);
    }

    pub fn keypress(&mut self, key: Key, modifiers: Modifiers) {
        let event = self.editor.keypress(key, modifiers, &self.sphere);
        self.handle(event);
    }

    pub fn scroll(&mut self, direction: Direction) {
        self.editor.scroll(direction);
    }

    pub fn down(&mut self, click: Click, position: Vec2) {
        let event = self.editor.down(click, position, &self.sphere);
        self.handle(event);
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.editor.move_to(position, &self.sphere);
    }

    pub fn up(&mut self, position: Vec2, button: Button) {
        self.editor.up(position, button);
    }

    /// Advance the camera by `delta` milliseconds
    pub fn process(&mut self, delta: u32) -> bool {
        self.editor.process(delta, &self.sphere)
    }

    /// Camera derived since the last call, if any
    pub fn pop(&mut self) -> Option<Camera> {
        self.editor.pop()
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> Frame {
        Frame {
            uniform: self.editor.plane().camera().uniform(),
            vertices: self.editor.vertices(&self.sphere),
            selection: self.editor.state().index(),
            preselection: self.editor.preselection(),
        }
    }

    fn handle(&mut self, event: Option<EditorEvent>) {
        let Some(event) = event else {
            return;
        };

        let result = match event {
            EditorEvent::PointMoved(index, point) => self.map.set_point(index, point),
            EditorEvent::PointAdded(index, point) => self.map.insert_point(index, point),
            EditorEvent::PointRemoved(index) => self.map.remove_point(index).map(|_| ()),
        };

        match result {
            Ok(()) => {
                tracing::debug!("Applied {:?} ({} points)", event, self.map.points().len());
                self.modified = true;
            }
            Err(e) => tracing::warn!("Edit {:?} rejected: {e}", event),
        }

        self.sphere = self.map.sphere(self.snap_threshold);
        self.editor.sync(&self.sphere);
    }
}

/// Document-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("No file to save to")]
    NoPath,
}
