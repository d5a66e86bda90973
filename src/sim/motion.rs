//! Integration and playfield bounds

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entity::Body;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What happens when a body leaves its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsPolicy {
    /// Pull back inside and flip the velocity component on that axis
    Reflect,
    /// Pull back inside and keep velocity
    Clamp,
}

/// Apply one tick of velocity, scaled by `speed`
#[inline]
pub fn advance(body: &mut Body, speed: f32) {
    body.pos += body.vel * speed;
}

fn component(v: &mut Vec2, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
    }
}

/// Keep the body's extent on `axis` within `[min, max]`
///
/// Returns true if the body was outside and got corrected.
pub fn constrain_axis(
    body: &mut Body,
    axis: Axis,
    min: f32,
    max: f32,
    policy: BoundsPolicy,
) -> bool {
    let size = *component(&mut body.size, axis);
    let pos = component(&mut body.pos, axis);
    let low = *pos < min;
    let high = *pos + size > max;
    if low {
        *pos = min;
    } else if high {
        *pos = max - size;
    } else {
        return false;
    }

    if policy == BoundsPolicy::Reflect {
        let vel = component(&mut body.vel, axis);
        // Point back into the field regardless of incoming sign
        *vel = if low { vel.abs() } else { -vel.abs() };
    }
    true
}

/// Constrain both axes to `bounds`
pub fn apply_bounds(body: &mut Body, bounds: &Aabb, policy: BoundsPolicy) -> bool {
    let x = constrain_axis(body, Axis::X, bounds.x, bounds.x + bounds.w, policy);
    let y = constrain_axis(body, Axis::Y, bounds.y, bounds.y + bounds.h, policy);
    x || y
}
