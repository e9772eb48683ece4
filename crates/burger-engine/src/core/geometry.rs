//! Value types for positions and overlap tests.
//!
//! Coordinates are pixels with y growing downwards. A bounding box is anchored
//! at its entity's top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid spacing used for level authoring, run contiguity and limit offsets.
pub const TILE_SIZE: f32 = 16.0;

/// Distance from a floor tile's top edge down to the surface characters stand on.
pub const FOOT_OFFSET: f32 = 0.5625 * TILE_SIZE;

/// Size of a collidable area, anchored at an entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The rectangle this box covers when anchored at `pos`.
    pub fn at(self, pos: Vec2) -> Rect {
        Rect::new(pos, pos + Vec2::new(self.width, self.height))
    }
}

/// Closed axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Closed-interval overlap: rectangles that only touch along an edge intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
