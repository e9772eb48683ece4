//! Shared character vocabulary: actions, the character box, gated stepping,
//! and the closed [`Character`] variant that the scene stores.

use glam::Vec2;

use crate::api::game::FrameContext;
use crate::components::collision::Gates;
use crate::components::enemy::Enemy;
use crate::components::entity::{Component, Entity};
use crate::components::player::Player;
use crate::components::snapshot::Snapshot;
use crate::core::geometry::{BoundingBox, FOOT_OFFSET, TILE_SIZE};

/// Box shared by the player and every enemy: one tile wide, two tall.
pub const CHARACTER_BOX: BoundingBox = BoundingBox::new(TILE_SIZE, 2.0 * TILE_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterAction {
    #[default]
    Idle,
    WalkingLeft,
    WalkingRight,
    ClimbingUp,
    ClimbingDown,
    Dead,
    Frozen,
    Celebrating,
}

impl CharacterAction {
    pub fn is_walking(self) -> bool {
        matches!(self, CharacterAction::WalkingLeft | CharacterAction::WalkingRight)
    }

    pub fn is_climbing(self) -> bool {
        matches!(self, CharacterAction::ClimbingUp | CharacterAction::ClimbingDown)
    }

    /// The walking direction facing the other way; other actions map to themselves.
    pub fn reversed(self) -> Self {
        match self {
            CharacterAction::WalkingLeft => CharacterAction::WalkingRight,
            CharacterAction::WalkingRight => CharacterAction::WalkingLeft,
            other => other,
        }
    }
}

/// Position that puts a character's feet on the walking surface of the floor tile at `tile`.
pub fn standing_position(tile: Vec2) -> Vec2 {
    Vec2::new(tile.x, tile.y + FOOT_OFFSET - CHARACTER_BOX.height)
}

/// Move `entity` by `distance` in the direction of `action`, if the gates allow it.
///
/// Climbing centres the entity on the stair column; walking puts its feet on
/// the floor surface. Returns false, leaving the entity untouched, when vetoed.
pub fn step(entity: &mut Entity, action: CharacterAction, gates: &Gates, distance: f32) -> bool {
    let allowed = match action {
        CharacterAction::ClimbingUp => gates.can_climb_up(),
        CharacterAction::ClimbingDown => gates.can_climb_down(),
        CharacterAction::WalkingLeft => gates.can_walk_left(),
        CharacterAction::WalkingRight => gates.can_walk_right(),
        _ => false,
    };
    if !allowed {
        return false;
    }

    if action.is_climbing() {
        if let Some(x) = gates.stair_x {
            entity.pos.x = x;
        }
    } else if let (Some(y), Some(bbox)) = (gates.floor_y, entity.bbox) {
        entity.pos.y = y - bbox.height;
    }

    match action {
        CharacterAction::ClimbingUp => entity.pos.y -= distance,
        CharacterAction::ClimbingDown => entity.pos.y += distance,
        CharacterAction::WalkingLeft => entity.pos.x -= distance,
        CharacterAction::WalkingRight => entity.pos.x += distance,
        _ => {}
    }
    true
}

/// A player or an enemy. Chosen at construction; never re-cast.
#[derive(Debug)]
pub enum Character {
    Player(Player),
    Enemy(Enemy),
}

impl Character {
    pub fn current_action(&self) -> CharacterAction {
        match self {
            Character::Player(p) => p.current_action(),
            Character::Enemy(e) => e.current_action(),
        }
    }
}

impl Component for Character {
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        match self {
            Character::Player(p) => p.update(entity, ctx, dt),
            Character::Enemy(e) => e.update(entity, ctx, dt),
        }
        entity.action = self.current_action();
    }

    fn publish(&self, entity: &Entity, snapshot: &mut Snapshot) {
        match self {
            Character::Player(p) => p.publish(entity, snapshot),
            Character::Enemy(e) => e.publish(entity, snapshot),
        }
    }
}
