use std::collections::HashSet;

/// Keys the game logic polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    /// Zoom the camera in.
    ZoomIn,
    /// Zoom the camera out.
    ZoomOut,
    /// Any other printable key.
    Char(char),
}

impl Key {
    /// Parse a key name such as `"left"`, `"space"` or `"w"`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.to_ascii_lowercase().as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "space" => Key::Space,
            "zoom-in" | "zoomin" => Key::ZoomIn,
            "zoom-out" | "zoomout" => Key::ZoomOut,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Source of "is this key held down right now" answers.
pub trait KeyInput {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Input source with every key released.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl KeyInput for NoInput {
    fn is_key_down(&self, _key: Key) -> bool {
        false
    }
}

/// Set of currently held keys, updated by whoever owns the event loop.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            tracing::trace!(?key, "key down");
        }
    }

    pub fn release(&mut self, key: Key) {
        if self.held.remove(&key) {
            tracing::trace!(?key, "key up");
        }
    }

    /// Release every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.held.iter().copied()
    }
}

impl KeyInput for KeyState {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

impl FromIterator<Key> for KeyState {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
