//! Collision gating against level geometry.
//!
//! Each gate is a plain overlap test between the entity's box (or a probe cut
//! from it) and one geometry set. Character state machines read the gates and
//! never touch the geometry themselves.

use glam::Vec2;

use crate::api::game::FrameContext;
use crate::components::entity::{Component, Entity};
use crate::core::geometry::Rect;
use crate::level::{Level, Limit};

/// How far the feet may be from a walking surface and still count as standing on it.
pub const FOOT_TOLERANCE: f32 = 2.0;

/// Movement gates for one entity, recomputed every step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gates {
    pub on_floor: bool,
    pub left_blocked: bool,
    pub right_blocked: bool,
    pub on_stairs: bool,
    pub up_blocked: bool,
    pub down_blocked: bool,
    /// Surface y of the floor under the feet, when `on_floor`.
    pub floor_y: Option<f32>,
    /// Column x of the stair under the entity's centre, when `on_stairs`.
    pub stair_x: Option<f32>,
}

impl Gates {
    /// Run every gate test for an entity occupying `rect`.
    pub fn probe(rect: Rect, level: &Level) -> Self {
        let feet = Rect::new(
            Vec2::new(rect.min.x, rect.max.y - FOOT_TOLERANCE),
            Vec2::new(rect.max.x, rect.max.y + FOOT_TOLERANCE),
        );
        let floor_y = level
            .floor_surfaces()
            .filter(|s| s.intersects(&feet))
            .map(|s| s.min.y)
            .min_by(|a, b| (a - rect.max.y).abs().total_cmp(&(b - rect.max.y).abs()));

        let cx = rect.center().x;
        let column = Rect::new(Vec2::new(cx, rect.min.y), Vec2::new(cx, rect.max.y));
        let stair_x = level
            .stair_rects()
            .find(|s| s.intersects(&column))
            .map(|s| s.min.x);

        let hits = |limits: &[Limit]| limits.iter().any(|l| l.rect().intersects(&rect));

        Self {
            on_floor: floor_y.is_some(),
            left_blocked: hits(&level.limits.left_floor),
            right_blocked: hits(&level.limits.right_floor),
            on_stairs: stair_x.is_some(),
            up_blocked: hits(&level.limits.up_stair),
            down_blocked: hits(&level.limits.down_stair),
            floor_y,
            stair_x,
        }
    }

    pub fn can_walk_left(&self) -> bool {
        self.on_floor && !self.left_blocked
    }

    pub fn can_walk_right(&self) -> bool {
        self.on_floor && !self.right_blocked
    }

    pub fn can_climb_up(&self) -> bool {
        self.on_stairs && !self.up_blocked
    }

    pub fn can_climb_down(&self) -> bool {
        self.on_stairs && !self.down_blocked
    }
}

/// Stores fresh [`Gates`] on its entity. Must come before the component that reads them.
#[derive(Debug, Default)]
pub struct CollisionComponent;

impl Component for CollisionComponent {
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, _dt: f32) {
        entity.gates = entity.rect().map(|rect| Gates::probe(rect, ctx.level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::{standing_position, CHARACTER_BOX};
    use crate::level::{FloorVariant, LevelBuilder};

    /// Floors at rows 32 and 96 (x 0..=80), stairs at column 48 joining them.
    fn level() -> Level {
        let mut b = LevelBuilder::new("gates");
        for row in [32.0, 96.0] {
            for i in 0..6 {
                b.add_floor(Vec2::new(i as f32 * 16.0, row), FloorVariant::default());
            }
        }
        for row in [32.0, 48.0, 64.0, 80.0, 96.0] {
            b.add_stair(Vec2::new(48.0, row));
        }
        b.finish()
    }

    fn gates_at(tile: Vec2) -> Gates {
        Gates::probe(CHARACTER_BOX.at(standing_position(tile)), &level())
    }

    #[test]
    fn standing_in_the_middle_of_a_floor() {
        let g = gates_at(Vec2::new(16.0, 96.0));
        assert!(g.on_floor);
        assert_eq!(g.floor_y, Some(105.0));
        assert!(!g.left_blocked && !g.right_blocked);
        assert!(!g.on_stairs);
    }

    #[test]
    fn run_ends_block_horizontal_movement() {
        assert!(gates_at(Vec2::new(0.0, 96.0)).left_blocked);
        assert!(gates_at(Vec2::new(80.0, 96.0)).right_blocked);
        assert!(!gates_at(Vec2::new(64.0, 96.0)).right_blocked);
    }

    #[test]
    fn right_gate_follows_overlap_exactly() {
        let level = level();
        // right limit of the lower run occupies x 96..112
        let touching = CHARACTER_BOX.at(Vec2::new(80.0, 73.0));
        let clear = CHARACTER_BOX.at(Vec2::new(79.5, 73.0));
        assert!(Gates::probe(touching, &level).right_blocked);
        assert!(!Gates::probe(clear, &level).right_blocked);
    }

    #[test]
    fn bottom_of_stairs_blocks_down_only() {
        let g = gates_at(Vec2::new(48.0, 96.0));
        assert!(g.on_stairs);
        assert_eq!(g.stair_x, Some(48.0));
        assert!(g.can_climb_up());
        assert!(!g.can_climb_down());
    }

    #[test]
    fn top_of_stairs_blocks_up_only() {
        let g = gates_at(Vec2::new(48.0, 32.0));
        assert!(g.on_stairs);
        assert!(!g.can_climb_up());
        assert!(g.can_climb_down());
    }

    #[test]
    fn mid_stairs_is_not_on_floor() {
        let g = Gates::probe(CHARACTER_BOX.at(Vec2::new(48.0, 50.0)), &level());
        assert!(g.on_stairs);
        assert!(!g.on_floor);
        assert!(g.can_climb_up() && g.can_climb_down());
    }
}
