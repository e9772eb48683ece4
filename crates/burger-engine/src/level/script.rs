//! JSON form of the level loader call sequence.
//!
//! Authoring mistakes are caught here, before anything reaches the limit
//! builder, which trusts its input.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EnemyKind, FloorVariant, IngredientKind, Level, LevelBuilder};
use crate::core::geometry::TILE_SIZE;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level '{0}' has no player spawn")]
    MissingPlayer(String),
    #[error("level '{0}' has more than one player spawn")]
    DuplicatePlayer(String),
    #[error("{kind} at ({x}, {y}) is not on the tile grid")]
    OffGrid { kind: &'static str, x: f32, y: f32 },
    #[error("{kind} has a non-finite coordinate")]
    NonFinite { kind: &'static str },
    #[error("enemy at ({x}, {y}) has a negative idle time")]
    NegativeIdleTime { x: f32, y: f32 },
    #[error("no levels to play")]
    NoLevels,
}

/// One loader call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Floor {
        x: f32,
        y: f32,
        #[serde(default)]
        variant: FloorVariant,
    },
    Stair { x: f32, y: f32 },
    Ingredient { x: f32, y: f32, ingredient: IngredientKind },
    Enemy {
        x: f32,
        y: f32,
        enemy: EnemyKind,
        #[serde(default)]
        idle_time: f32,
    },
    Player { x: f32, y: f32 },
    Dish { x: f32, y: f32 },
}

impl Placement {
    fn label(&self) -> &'static str {
        match self {
            Placement::Floor { .. } => "floor",
            Placement::Stair { .. } => "stair",
            Placement::Ingredient { .. } => "ingredient",
            Placement::Enemy { .. } => "enemy",
            Placement::Player { .. } => "player",
            Placement::Dish { .. } => "dish",
        }
    }

    fn pos(&self) -> Vec2 {
        match *self {
            Placement::Floor { x, y, .. }
            | Placement::Stair { x, y }
            | Placement::Ingredient { x, y, .. }
            | Placement::Enemy { x, y, .. }
            | Placement::Player { x, y }
            | Placement::Dish { x, y } => Vec2::new(x, y),
        }
    }
}

/// A named, ordered list of placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelScript {
    pub name: String,
    pub placements: Vec<Placement>,
}

impl LevelScript {
    /// Parse a script from a JSON string. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check for authoring errors the limit builder would silently accept.
    pub fn validate(&self) -> Result<(), LevelError> {
        let mut players = 0;
        for placement in &self.placements {
            let kind = placement.label();
            let pos = placement.pos();
            if !pos.is_finite() {
                return Err(LevelError::NonFinite { kind });
            }
            let on_grid = |v: f32| (v / TILE_SIZE).fract() == 0.0;
            if !on_grid(pos.x) || !on_grid(pos.y) {
                return Err(LevelError::OffGrid { kind, x: pos.x, y: pos.y });
            }
            match placement {
                Placement::Player { .. } => players += 1,
                Placement::Enemy { idle_time, .. } if *idle_time < 0.0 => {
                    return Err(LevelError::NegativeIdleTime { x: pos.x, y: pos.y });
                }
                _ => {}
            }
        }
        match players {
            0 => Err(LevelError::MissingPlayer(self.name.clone())),
            1 => Ok(()),
            _ => Err(LevelError::DuplicatePlayer(self.name.clone())),
        }
    }

    /// Validate, then replay every placement into a [`LevelBuilder`] in order.
    pub fn build(&self) -> Result<Level, LevelError> {
        self.validate()?;
        let mut builder = LevelBuilder::new(self.name.clone());
        for placement in &self.placements {
            let pos = placement.pos();
            match *placement {
                Placement::Floor { variant, .. } => builder.add_floor(pos, variant),
                Placement::Stair { .. } => builder.add_stair(pos),
                Placement::Ingredient { ingredient, .. } => builder.add_ingredient(pos, ingredient),
                Placement::Enemy { enemy, idle_time, .. } => builder.add_enemy(pos, enemy, idle_time),
                Placement::Player { .. } => builder.add_player(pos),
                Placement::Dish { .. } => builder.add_dish(pos),
            };
        }
        let level = builder.finish();
        if level.spawns.ingredients.is_empty() {
            log::warn!("level '{}' has no ingredients and can never be won", level.name);
        }
        Ok(level)
    }
}
