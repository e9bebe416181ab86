//! Keyboard state snapshot
//!
//! The registry receives one read-only [`KeyState`] per frame and fans it out
//! to active entities. Event queues and edge detection live upstream.

use std::collections::HashSet;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Enter key
    Enter,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
}

/// Keys held down at the moment the snapshot was taken
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    pressed: HashSet<KeyCode>,
}

impl KeyState {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot with the given keys held
    pub fn with_pressed(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            pressed: keys.into_iter().collect(),
        }
    }

    /// Mark a key as held
    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    /// Mark a key as released
    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Whether `key` is held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Iterate over held keys in no particular order
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }
}
