//! Entity records shared by every game
//!
//! Continuous entities carry a [`Body`] in pixel space, grid entities carry a
//! [`Cell`] in board space. Each game owns its entities directly and exposes
//! a read-only [`Entity`] snapshot for invariant checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chain::Bead;
use super::collision::Aabb;
use super::tetromino::Tetromino;
use crate::renderer::Color;

/// Cardinal direction on a grid (rows grow downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row/column delta for one step
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True when the two directions lie on different axes
    pub fn is_orthogonal_to(self, other: Direction) -> bool {
        self.is_vertical() != other.is_vertical()
    }

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        let (dr, dc) = self.delta();
        Vec2::new(dc as f32, dr as f32)
    }
}

/// Discrete board coordinate
///
/// Signed so that neighbours of edge cells can be formed and then rejected by
/// the board's range check instead of underflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    pub fn offset(self, drow: i32, dcol: i32) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }

    /// Wrap into a `rows` x `cols` torus
    pub fn wrapped(self, rows: i32, cols: i32) -> Self {
        Self::new(self.row.rem_euclid(rows), self.col.rem_euclid(cols))
    }

    /// Unit square this cell covers, in cell units
    pub fn aabb(self) -> Aabb {
        Aabb::new(self.col as f32, self.row as f32, 1.0, 1.0)
    }
}

/// Position, velocity and extents of a continuous entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_min_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move so the center sits at `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
    }
}

/// Ball (pong, breakout) or in-flight projectile (chain)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub body: Body,
    pub color: Color,
}

/// Player or AI paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Body,
    pub color: Color,
}

/// Shooter projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
}

/// Falling shooter enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub color: Color,
}

/// Breakout wall brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub body: Body,
    pub color: Color,
    /// Cleared bricks stay in the wall but stop colliding
    pub visible: bool,
}

/// A card of the memory grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryCard {
    /// Index into the deck's symbol table
    pub symbol: u8,
    pub flipped: bool,
    pub matched: bool,
}

impl MemoryCard {
    pub fn new(symbol: u8) -> Self {
        Self {
            symbol,
            flipped: false,
            matched: false,
        }
    }

    /// Face is showing (flipped or already matched)
    pub fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

/// Snapshot of one game object
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Ball(Ball),
    Paddle(Paddle),
    Piece(Tetromino),
    Bullet(Bullet),
    Enemy(Enemy),
    Brick(Brick),
    SnakeSegment(Cell),
    MazeActor(Cell),
    /// Bead with its resolved track position
    ChainBead { bead: Bead, pos: Vec2, size: f32 },
    MemoryCard { cell: Cell, card: MemoryCard },
}

impl Entity {
    /// Extents in the owning game's unit (pixels or cells)
    pub fn extent(&self) -> Aabb {
        match self {
            Entity::Ball(b) => b.body.aabb(),
            Entity::Paddle(p) => p.body.aabb(),
            Entity::Bullet(b) => b.body.aabb(),
            Entity::Enemy(e) => e.body.aabb(),
            Entity::Brick(b) => b.body.aabb(),
            Entity::Piece(piece) => piece.extent(),
            Entity::SnakeSegment(cell) | Entity::MazeActor(cell) => cell.aabb(),
            Entity::ChainBead { pos, size, .. } => {
                Aabb::from_min_size(*pos - Vec2::splat(size * 0.5), Vec2::splat(*size))
            }
            Entity::MemoryCard { cell, .. } => cell.aabb(),
        }
    }

    /// Velocity if the entity moves continuously
    pub fn velocity(&self) -> Option<Vec2> {
        match self {
            Entity::Ball(b) => Some(b.body.vel),
            Entity::Paddle(p) => Some(p.body.vel),
            Entity::Bullet(b) => Some(b.body.vel),
            Entity::Enemy(e) => Some(e.body.vel),
            _ => None,
        }
    }
}
