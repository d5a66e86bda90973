//! Input routing
//!
//! Raw host events (DOM key strings, pointer positions in canvas space) are
//! translated into [`Intent`]s and queued until the next tick drains them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Direction;

/// Logical keys every game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Key {
    /// Map a DOM `key` or `code` string; arrows and WASD are equivalent
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "ArrowUp" | "Up" | "w" | "W" | "KeyW" => Key::Up,
            "ArrowDown" | "Down" | "s" | "S" | "KeyS" => Key::Down,
            "ArrowLeft" | "Left" | "a" | "A" | "KeyA" => Key::Left,
            "ArrowRight" | "Right" | "d" | "D" | "KeyD" => Key::Right,
            " " | "Space" | "Spacebar" => Key::Fire,
            _ => return None,
        };
        Some(key)
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Fire => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Raw event as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove(Vec2),
    Click(Vec2),
}

/// What a game acts on during its next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    Fire,
    /// Pointer hover position (aim, paddle follow)
    Point(Vec2),
    Click(Vec2),
}

/// Set of currently held keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// -1, 0 or 1 along x from Left/Right
    pub fn axis_x(&self) -> f32 {
        (self.is_held(Key::Right) as i8 - self.is_held(Key::Left) as i8) as f32
    }

    /// -1, 0 or 1 along y from Up/Down (screen space)
    pub fn axis_y(&self) -> f32 {
        (self.is_held(Key::Down) as i8 - self.is_held(Key::Up) as i8) as f32
    }
}

/// Input gathered for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Discrete intents in arrival order
    pub intents: Vec<Intent>,
    /// Keys held at drain time
    pub held: HeldKeys,
}

impl TickInput {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self {
            intents,
            held: HeldKeys::default(),
        }
    }

    pub fn with_held(mut self, keys: &[Key]) -> Self {
        for &key in keys {
            self.held.press(key);
        }
        self
    }

    /// Last pointer position of the batch, if any
    pub fn last_point(&self) -> Option<Vec2> {
        self.intents.iter().rev().find_map(|intent| match intent {
            Intent::Point(p) => Some(*p),
            _ => None,
        })
    }
}

/// Queues intents between ticks
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    queue: Vec<Intent>,
    held: HeldKeys,
    pointer: Option<Vec2>,
    accepting: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate input on the session being in play; closing also drops the queue
    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
        if !accepting {
            self.queue.clear();
            self.held.clear();
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Last known pointer position in canvas space
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Route one raw event. Returns true if the event should trigger a redraw.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if let InputEvent::PointerMove(p) = event {
            self.pointer = Some(p);
        }
        if !self.accepting {
            log::trace!("Dropping {event:?} outside play");
            return matches!(event, InputEvent::PointerMove(_));
        }

        match event {
            InputEvent::KeyDown(key) => {
                self.held.press(key);
                self.queue.push(match key.direction() {
                    Some(dir) => Intent::Move(dir),
                    None => Intent::Fire,
                });
                false
            }
            InputEvent::KeyUp(key) => {
                self.held.release(key);
                false
            }
            InputEvent::PointerMove(p) => {
                // Only the latest hover position matters
                if let Some(Intent::Point(last)) = self.queue.last_mut() {
                    *last = p;
                } else {
                    self.queue.push(Intent::Point(p));
                }
                true
            }
            InputEvent::Click(p) => {
                self.queue.push(Intent::Click(p));
                false
            }
        }
    }

    /// Take everything queued since the last tick
    pub fn drain(&mut self) -> TickInput {
        TickInput {
            intents: std::mem::take(&mut self.queue),
            held: self.held,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_aliases() {
        for code in ["ArrowUp", "w", "W", "KeyW"] {
            assert_eq!(Key::from_code(code), Some(Key::Up));
        }
        for code in [" ", "Space", "Spacebar"] {
            assert_eq!(Key::from_code(code), Some(Key::Fire));
        }
        assert_eq!(Key::from_code("KeyD"), Some(Key::Right));
        assert_eq!(Key::from_code("Escape"), None);
    }

    #[test]
    fn test_input_dropped_when_not_accepting() {
        let mut router = InputRouter::new();
        assert!(!router.push(InputEvent::KeyDown(Key::Left)));
        assert!(router.push(InputEvent::PointerMove(Vec2::new(3.0, 4.0))));
        assert_eq!(router.pending(), 0);
        // Pointer is still tracked for the overlay
        assert_eq!(router.pointer(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_drain_preserves_order_and_coalesces_pointer() {
        let mut router = InputRouter::new();
        router.set_accepting(true);
        router.push(InputEvent::KeyDown(Key::Up));
        router.push(InputEvent::PointerMove(Vec2::new(1.0, 1.0)));
        router.push(InputEvent::PointerMove(Vec2::new(2.0, 2.0)));
        router.push(InputEvent::KeyDown(Key::Fire));
        router.push(InputEvent::Click(Vec2::new(5.0, 5.0)));

        let input = router.drain();
        assert_eq!(
            input.intents,
            vec![
                Intent::Move(Direction::Up),
                Intent::Point(Vec2::new(2.0, 2.0)),
                Intent::Fire,
                Intent::Click(Vec2::new(5.0, 5.0)),
            ]
        );
        assert!(input.held.is_held(Key::Up));
        assert!(input.held.is_held(Key::Fire));
        assert_eq!(router.pending(), 0);
    }

    #[test]
    fn test_held_axes() {
        let mut held = HeldKeys::default();
        held.press(Key::Left);
        held.press(Key::Down);
        assert_eq!((held.axis_x(), held.axis_y()), (-1.0, 1.0));
        held.press(Key::Right);
        assert_eq!(held.axis_x(), 0.0);
        held.release(Key::Left);
        assert_eq!(held.axis_x(), 1.0);
    }
}
