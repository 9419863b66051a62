//! Input events consumed by the editor

pub use ps_camera::{Button, Direction};

/// Pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// Single press of a button
    Press(Button),
    /// Second primary press in quick succession
    Double,
}

impl Click {
    /// Button the press was made with
    pub fn button(&self) -> Button {
        match *self {
            Click::Press(button) => button,
            Click::Double => Button::Primary,
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Track the camera up
    Up,
    /// Track the camera down
    Down,
    /// Track the camera left
    Left,
    /// Track the camera right
    Right,
    /// Recenter on the globe
    Period,
    /// Delete the selection
    Backspace,
    /// Delete the selection
    Delete,
    /// Cycle the selection
    Tab,
    /// Cancel the pending edit
    Escape,
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift held; reverses tab cycling
    pub shift: bool,
    /// Control held
    pub control: bool,
    /// Alt held
    pub alt: bool,
}

impl Modifiers {
    /// Only shift held
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };
}
