//! Collision detection and response for axis-aligned play fields
//!
//! Pure functions: given a ball (centre, radius, velocity) and a target (field
//! walls, paddle rectangle, block rectangle), report whether they collided and
//! the corrected position and velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle, anchored at its top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Inclusive point test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Strict overlap test between two rectangles
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Result of resolving a ball against one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Whether a collision occurred
    pub hit: bool,
    /// Corrected ball centre
    pub pos: Vec2,
    /// Outgoing velocity
    pub vel: Vec2,
}

impl Collision {
    /// No contact: position and velocity pass through untouched
    pub fn miss(pos: Vec2, vel: Vec2) -> Self {
        Self { hit: false, pos, vel }
    }

    fn hit(pos: Vec2, vel: Vec2) -> Self {
        Self { hit: true, pos, vel }
    }
}

/// Which face of a block the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactAxis {
    /// Left or right face: horizontal velocity flips
    Horizontal,
    /// Top or bottom face: vertical velocity flips
    Vertical,
}

/// Check the ball against the side and top walls of a field `width` wide
///
/// Position is clamped back inside before the velocity component is
/// reflected. The bottom edge is a loss condition and never clamps.
pub fn resolve_walls(pos: Vec2, radius: f32, vel: Vec2, width: f32) -> Collision {
    let mut pos = pos;
    let mut vel = vel;
    let mut hit = false;

    if pos.x + radius > width {
        pos.x = width - radius;
        vel.x = -vel.x.abs();
        hit = true;
    }
    if pos.x - radius < 0.0 {
        pos.x = radius;
        vel.x = vel.x.abs();
        hit = true;
    }
    if pos.y - radius < 0.0 {
        pos.y = radius;
        vel.y = vel.y.abs();
        hit = true;
    }

    Collision { hit, pos, vel }
}

/// Check the ball against the paddle rectangle
///
/// Only a descending ball can hit. The ball always leaves strictly upward,
/// with a horizontal speed set by where it struck across the paddle width.
pub fn resolve_paddle(pos: Vec2, radius: f32, vel: Vec2, max_speed: f32, paddle: &Rect) -> Collision {
    if vel.y <= 0.0 {
        return Collision::miss(pos, vel);
    }
    if pos.x < paddle.x || pos.x > paddle.right() {
        return Collision::miss(pos, vel);
    }
    let ball_bottom = pos.y + radius;
    if ball_bottom < paddle.y || ball_bottom > paddle.bottom() + PADDLE_HIT_SLACK {
        return Collision::miss(pos, vel);
    }

    // 0 = left edge, 1 = right edge
    let hit_pos = (pos.x - paddle.x) / paddle.width;
    let speed_x = ((hit_pos - 0.5) * PADDLE_ANGLE_FACTOR).clamp(-max_speed, max_speed);

    Collision::hit(
        Vec2::new(pos.x, paddle.y - radius),
        Vec2::new(speed_x, -vel.y.abs()),
    )
}

/// Decide the impact face from the normalized centre offset
///
/// The axis with the larger offset relative to the block's extent wins; ties
/// go to the vertical axis.
pub fn impact_axis(ball: Vec2, block: &Rect) -> ImpactAxis {
    let delta = ball - block.center();
    if (delta.x / block.width).abs() > (delta.y / block.height).abs() {
        ImpactAxis::Horizontal
    } else {
        ImpactAxis::Vertical
    }
}

/// Check the ball against one block
///
/// A penetrating ball reports the hit but keeps its position and velocity.
/// Otherwise the impact-axis component is reflected, the ball is pushed just
/// outside that face, and the whole velocity gains `BLOCK_BOUNCE_GAIN`.
pub fn resolve_block(pos: Vec2, radius: f32, vel: Vec2, block: &Rect, penetrating: bool) -> Collision {
    if !block.expanded(radius).contains(pos) {
        return Collision::miss(pos, vel);
    }
    if penetrating {
        return Collision::hit(pos, vel);
    }

    let mut pos = pos;
    let mut vel = vel;
    let delta = pos - block.center();
    match impact_axis(pos, block) {
        ImpactAxis::Horizontal => {
            vel.x = -vel.x;
            pos.x = if delta.x > 0.0 {
                block.right() + radius
            } else {
                block.x - radius
            };
        }
        ImpactAxis::Vertical => {
            vel.y = -vel.y;
            pos.y = if delta.y > 0.0 {
                block.bottom() + radius
            } else {
                block.y - radius
            };
        }
    }

    Collision::hit(pos, vel * BLOCK_BOUNCE_GAIN)
}
