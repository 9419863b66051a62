//! Single-slot change notification

/// Holds the latest value and remembers whether it has been consumed.
#[derive(Debug, Clone, Default)]
pub struct Latch<T> {
    value: T,
    dirty: bool,
}

impl<T: Clone> Latch<T> {
    /// Create a latch holding `value`, not yet marked as changed
    pub fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Store a new value and mark it as changed
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.dirty = true;
    }

    /// Latest value, whether or not it has been popped
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Whether a value is waiting to be popped
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Take the value if it changed since the last pop
    pub fn pop(&mut self) -> Option<T> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.value.clone())
    }
}
