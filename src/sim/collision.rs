//! Collision detection and response
//!
//! Everything here is axis-aligned: rectangle overlap for the continuous
//! games, occupancy lookups for the grid games, and the velocity responses
//! that follow a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::{Board, Occupancy};

/// Axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// `other` lies entirely inside `self` (edges may touch)
    pub fn contains(&self, other: &Aabb) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }
}

/// Strict rectangle overlap; touching edges do not count
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// A cell is blocked when it is outside the board or occupied
#[inline]
pub fn is_blocked<T: Occupancy>(board: &Board<T>, row: i32, col: i32) -> bool {
    board.get(row, col).is_none_or(Occupancy::is_occupied)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect only when moving into the surface
///
/// Prevents a body still overlapping a paddle on the next tick from being
/// flipped back into it.
pub fn bounce(velocity: Vec2, normal: Vec2) -> Vec2 {
    if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        velocity
    }
}

/// Vertical displacement that moves `current` toward `target`
///
/// Returns zero inside the dead zone, otherwise `step` in the direction of
/// the target.
pub fn pursue(current: f32, target: f32, step: f32, dead_zone: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= dead_zone {
        0.0
    } else {
        step.copysign(diff)
    }
}

/// Outward normal of the `obstacle` face that `body` hit
///
/// Picks the axis of least penetration so a ball clipping the side of a
/// paddle bounces sideways rather than vertically.
pub fn contact_normal(body: &Aabb, obstacle: &Aabb) -> Vec2 {
    let delta = body.center() - obstacle.center();
    let overlap_x = (body.w + obstacle.w) * 0.5 - delta.x.abs();
    let overlap_y = (body.h + obstacle.h) * 0.5 - delta.y.abs();
    if overlap_x < overlap_y {
        Vec2::new(1.0_f32.copysign(delta.x), 0.0)
    } else {
        Vec2::new(0.0, 1.0_f32.copysign(delta.y))
    }
}
