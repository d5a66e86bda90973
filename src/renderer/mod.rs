//! Rendering module
//!
//! Games project their state into a [`DrawList`]; the list is then replayed
//! onto a 2D [`Surface`] (canvas) or tessellated into vertices for a GPU host.

pub mod draw;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawCommand, DrawList, Surface};
pub use shapes::{VertexSurface, tessellate};
pub use vertex::Vertex;

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS colour string for canvas fill/stroke styles
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    /// Normalized components for vertex buffers
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Colors for game elements
pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);

    pub const PONG_BG: Color = Color::rgb(127, 127, 0);
    pub const BREAKOUT_BG: Color = Color::rgb(26, 26, 26);
    pub const SNAKE_BG: Color = Color::rgb(0, 0, 51);
    pub const SNAKE_BODY: Color = Color::rgb(51, 153, 51);
    pub const TETRIS_BG: Color = Color::rgb(127, 0, 127);
    pub const SHOOTER_BG: Color = Color::rgb(6, 6, 19);
    pub const CHAIN_BG: Color = Color::rgb(153, 128, 0);

    pub const MAZE_WALL: Color = Color::rgb(220, 38, 38);
    pub const MAZE_FLOOR: Color = Color::rgb(30, 58, 138);
    pub const MAZE_PLAYER: Color = Color::rgb(250, 204, 21);
    pub const MAZE_GOAL: Color = Color::rgb(34, 197, 94);

    pub const CARD_HIDDEN: Color = Color::rgb(239, 68, 68);
    pub const CARD_FACE: Color = Color::rgb(250, 204, 21);
    pub const CARD_MATCHED: Color = Color::rgb(34, 197, 94);
    pub const MEMORY_BG: Color = Color::rgb(24, 24, 27);

    pub const HUD_TEXT: Color = Color::rgb(255, 255, 255);
    pub const POINTER: Color = Color::rgba(255, 255, 255, 160);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_strings() {
        assert_eq!(palette::RED.to_css(), "rgb(255, 0, 0)");
        assert_eq!(Color::rgba(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0.000)");
    }

    #[test]
    fn test_to_f32() {
        assert_eq!(palette::WHITE.to_f32(), [1.0; 4]);
        assert_eq!(palette::BLUE.to_f32(), [0.0, 0.0, 1.0, 1.0]);
    }
}
