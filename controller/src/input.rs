/// A key the character responds to.
///
/// The three shift identifiers collapse into [`InputKey::Sprint`] for both press and release, so
/// releasing either shift key always ends a sprint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    Sprint,
    Punch,
}

impl InputKey {
    /// Maps a DOM-style key identifier (`KeyboardEvent.key` or `.code`) to a key.
    ///
    /// Returns `None` for anything else; unknown keys are ignored, not errors.
    pub fn from_identifier(id: &str) -> Option<Self> {
        match id {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "Shift" | "ShiftLeft" | "ShiftRight" => Some(Self::Sprint),
            "p" | "P" | "KeyP" => Some(Self::Punch),
            _ => None,
        }
    }
}

/// Keys currently held down. Written by press/release events, read once per frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub punch: bool,
}

impl InputState {
    pub fn press(&mut self, key: InputKey) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: InputKey) {
        self.set(key, false);
    }

    /// Key-down handler for raw identifiers.
    pub fn press_identifier(&mut self, id: &str) {
        if let Some(key) = InputKey::from_identifier(id) {
            self.press(key);
        }
    }

    /// Key-up handler for raw identifiers.
    pub fn release_identifier(&mut self, id: &str) {
        if let Some(key) = InputKey::from_identifier(id) {
            self.release(key);
        }
    }

    pub fn is_held(&self, key: InputKey) -> bool {
        match key {
            InputKey::Up => self.up,
            InputKey::Down => self.down,
            InputKey::Left => self.left,
            InputKey::Right => self.right,
            InputKey::Sprint => self.sprint,
            InputKey::Punch => self.punch,
        }
    }

    /// Forward or strafing input. Backpedalling is deliberately not part of this.
    pub fn is_advancing(&self) -> bool {
        self.up || self.left || self.right
    }

    fn set(&mut self, key: InputKey, held: bool) {
        let flag = match key {
            InputKey::Up => &mut self.up,
            InputKey::Down => &mut self.down,
            InputKey::Left => &mut self.left,
            InputKey::Right => &mut self.right,
            InputKey::Sprint => &mut self.sprint,
            InputKey::Punch => &mut self.punch,
        };
        *flag = held;
    }
}
