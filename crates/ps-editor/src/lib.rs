//! Polysphere editor
//!
//! Vertex editing on top of the camera controller, the open document and the
//! headless front end.
//!
//! # Module Structure
//!
//! ```text
//! ps-editor/
//! ├── input.rs       # Buttons, clicks, keys, modifiers
//! ├── editor.rs      # MapEditor gesture state machine and hotspots
//! ├── document.rs    # Map + sphere + editor coordination
//! ├── config.rs      # Editor configuration
//! ├── cli.rs         # Argument parsing and JSON snapshot
//! └── main.rs        # polysphere binary
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod editor;
pub mod input;

pub use config::EditorConfig;
pub use document::{Document, DocumentError, Frame};
pub use editor::{EditorEvent, EditorState, MapEditor};
pub use input::{Button, Click, Key, Modifiers};
