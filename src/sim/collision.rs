//! Collision detection for axis-aligned boxes
//!
//! Everything in the runner is a rectangle, so the only geometry needed is a
//! strict AABB overlap test plus the rule that tells a stomp from a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Strict AABB overlap. Rectangles that only share an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// How an overlap between player and obstacle resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player landed on top: obstacle destroyed, player bounces
    Stomp,
    /// Anything else: player loses a life
    Hit,
}

/// Classify an overlap.
///
/// A stomp needs the player to be falling and its bottom edge, before this
/// tick's vertical move, to have been at or above the obstacle top (give or
/// take `tolerance`).
pub fn classify_contact(
    descending: bool,
    previous_bottom: f32,
    obstacle_top: f32,
    tolerance: f32,
) -> Contact {
    if descending && previous_bottom <= obstacle_top + tolerance {
        Contact::Stomp
    } else {
        Contact::Hit
    }
}
