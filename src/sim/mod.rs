//! Deterministic simulation module
//!
//! All gameplay building blocks live here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies beyond colour values

pub mod board;
pub mod chain;
pub mod collision;
pub mod entity;
pub mod input;
pub mod motion;
pub mod scheduler;
pub mod session;
pub mod tetromino;

pub use board::{Board, Occupancy};
pub use chain::{Bead, Chain};
pub use collision::{Aabb, bounce, contact_normal, is_blocked, overlaps, pursue, reflect_velocity};
pub use entity::{
    Ball, Body, Brick, Bullet, Cell, Direction, Enemy, Entity, MemoryCard, Paddle,
};
pub use input::{HeldKeys, InputEvent, InputRouter, Intent, Key, TickInput};
pub use motion::{Axis, BoundsPolicy, advance, apply_bounds, constrain_axis};
pub use scheduler::{Delay, FixedStep};
pub use session::{Session, Status};
pub use tetromino::{Tetromino, TetrominoKind};
