//! Level geometry and spawn lists.
//!
//! [`LevelBuilder`] is the contract the level loader drives. Floor and stair
//! calls go straight into the [`LimitBuilder`], so their order matters.

pub mod limits;
pub mod script;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::{BoundingBox, Rect, FOOT_OFFSET, TILE_SIZE};
pub use limits::{FieldKind, Limit, LimitBuilder, LimitSets};
pub use script::{LevelError, LevelScript, Placement};

/// Box of one floor, stair or dish tile.
pub const TILE_BOX: BoundingBox = BoundingBox::new(TILE_SIZE, TILE_SIZE);

/// Sprite variant of a floor tile. Opaque to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorVariant(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    TopBun,
    Lettuce,
    Cheese,
    Tomato,
    Patty,
    BottomBun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Sausage,
    Egg,
    Pickle,
}

impl EnemyKind {
    /// Multiplier applied to the base enemy speed.
    pub fn speed_factor(self) -> f32 {
        match self {
            EnemyKind::Sausage => 1.0,
            EnemyKind::Egg => 0.8,
            EnemyKind::Pickle => 1.2,
        }
    }
}

/// A static floor tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    pub pos: Vec2,
    pub variant: FloorVariant,
}

impl Floor {
    pub fn rect(&self) -> Rect {
        TILE_BOX.at(self.pos)
    }

    /// The line characters stand on.
    pub fn surface(&self) -> Rect {
        let y = self.pos.y + FOOT_OFFSET;
        Rect::new(Vec2::new(self.pos.x, y), Vec2::new(self.pos.x + TILE_SIZE, y))
    }
}

/// A dish: where ingredients are served. Spans four tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dish {
    pub pos: Vec2,
}

impl Dish {
    pub fn surface(&self) -> Rect {
        let y = self.pos.y + FOOT_OFFSET;
        Rect::new(Vec2::new(self.pos.x, y), Vec2::new(self.pos.x + 4.0 * TILE_SIZE, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Seconds the enemy waits before it starts moving.
    pub idle_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientSpawn {
    pub pos: Vec2,
    pub kind: IngredientKind,
}

/// Character and ingredient placements, in tile coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spawns {
    pub player: Option<Vec2>,
    pub enemies: Vec<EnemySpawn>,
    pub ingredients: Vec<IngredientSpawn>,
}

/// A compiled level: static geometry, derived limits and spawn lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Level {
    pub name: String,
    pub floors: Vec<Floor>,
    pub stairs: Vec<Vec2>,
    pub dishes: Vec<Dish>,
    pub limits: LimitSets,
    pub spawns: Spawns,
}

impl Level {
    pub fn stair_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.stairs.iter().map(|&pos| TILE_BOX.at(pos))
    }

    pub fn floor_surfaces(&self) -> impl Iterator<Item = Rect> + '_ {
        self.floors.iter().map(Floor::surface)
    }
}

/// Receives loader calls in level-source order and produces a [`Level`].
#[derive(Debug, Default)]
pub struct LevelBuilder {
    level: Level,
    limits: LimitBuilder,
}

impl LevelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            level: Level {
                name: name.into(),
                ..Level::default()
            },
            limits: LimitBuilder::new(),
        }
    }

    pub fn add_floor(&mut self, pos: Vec2, variant: FloorVariant) -> &mut Self {
        self.level.floors.push(Floor { pos, variant });
        self.limits.add_floor(pos);
        self
    }

    pub fn add_stair(&mut self, pos: Vec2) -> &mut Self {
        self.level.stairs.push(pos);
        self.limits.add_stair(pos);
        self
    }

    pub fn add_ingredient(&mut self, pos: Vec2, kind: IngredientKind) -> &mut Self {
        self.level.spawns.ingredients.push(IngredientSpawn { pos, kind });
        self
    }

    pub fn add_enemy(&mut self, pos: Vec2, kind: EnemyKind, idle_time: f32) -> &mut Self {
        self.level.spawns.enemies.push(EnemySpawn { pos, kind, idle_time });
        self
    }

    /// Set the player spawn. A later call replaces an earlier one.
    pub fn add_player(&mut self, pos: Vec2) -> &mut Self {
        self.level.spawns.player = Some(pos);
        self
    }

    pub fn add_dish(&mut self, pos: Vec2) -> &mut Self {
        self.level.dishes.push(Dish { pos });
        self
    }

    /// Close the last open run and return the compiled level.
    pub fn finish(self) -> Level {
        let mut level = self.level;
        level.limits = self.limits.finish();
        log::debug!(
            "level '{}': {} floor tile(s), {} stair tile(s), {} ingredient(s), {} enemy spawn(s)",
            level.name,
            level.floors.len(),
            level.stairs.len(),
            level.spawns.ingredients.len(),
            level.spawns.enemies.len()
        );
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_floors_one_stair() -> LevelBuilder {
        let mut b = LevelBuilder::new("test");
        for i in 0..6 {
            b.add_floor(Vec2::new(i as f32 * 16.0, 32.0), FloorVariant::default());
        }
        for i in 0..6 {
            b.add_floor(Vec2::new(i as f32 * 16.0, 96.0), FloorVariant::default());
        }
        for row in [32.0, 48.0, 64.0, 80.0, 96.0] {
            b.add_stair(Vec2::new(48.0, row));
        }
        b.add_player(Vec2::new(0.0, 96.0));
        b
    }

    #[test]
    fn builder_feeds_limits_in_order() {
        let level = two_floors_one_stair().finish();
        assert_eq!(level.limits.left_floor.len(), 2);
        assert_eq!(level.limits.right_floor.len(), 2);
        assert_eq!(level.limits.up_stair.len(), 1);
        assert_eq!(level.limits.down_stair.len(), 1);
        assert_eq!(level.limits.up_stair[0].pos, Vec2::new(48.0, 8.0));
        assert_eq!(level.limits.down_stair[0].pos, Vec2::new(48.0, 105.0));
    }

    #[test]
    fn builder_records_spawns_and_geometry() {
        let mut b = two_floors_one_stair();
        b.add_enemy(Vec2::new(80.0, 32.0), EnemyKind::Egg, 2.0)
            .add_ingredient(Vec2::new(0.0, 32.0), IngredientKind::TopBun)
            .add_dish(Vec2::new(0.0, 160.0));
        let level = b.finish();
        assert_eq!(level.floors.len(), 12);
        assert_eq!(level.stairs.len(), 5);
        assert_eq!(level.dishes.len(), 1);
        assert_eq!(level.spawns.player, Some(Vec2::new(0.0, 96.0)));
        assert_eq!(level.spawns.enemies[0].kind, EnemyKind::Egg);
        assert_eq!(level.spawns.ingredients[0].kind, IngredientKind::TopBun);
    }

    #[test]
    fn same_stream_twice_gives_identical_level() {
        assert_eq!(two_floors_one_stair().finish(), two_floors_one_stair().finish());
    }

    #[test]
    fn floor_surface_sits_nine_units_down() {
        let floor = Floor { pos: Vec2::new(32.0, 64.0), variant: FloorVariant(1) };
        let s = floor.surface();
        assert_eq!(s.min, Vec2::new(32.0, 73.0));
        assert_eq!(s.max, Vec2::new(48.0, 73.0));
    }
}
