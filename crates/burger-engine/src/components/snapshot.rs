use crate::api::types::EntityId;
use crate::components::ingredient::IngredientPhase;
use crate::core::geometry::Rect;

/// Read-only view of the moving actors, taken before the scene updates.
///
/// Components read other entities only through this view, so update order
/// within a step never changes what an entity sees.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub player: Option<Rect>,
    pub enemies: Vec<EnemyPresence>,
    pub ingredients: Vec<IngredientPresence>,
    /// Pepper shakes the player has left.
    pub pepper: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyPresence {
    pub id: EntityId,
    pub rect: Rect,
    /// False while the enemy is dead or frozen.
    pub lethal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientPresence {
    pub id: EntityId,
    pub rect: Rect,
    pub phase: IngredientPhase,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous step, keeping allocations.
    pub fn clear(&mut self) {
        self.player = None;
        self.enemies.clear();
        self.ingredients.clear();
        self.pepper = 0;
    }

    pub fn touches_lethal_enemy(&self, rect: &Rect) -> bool {
        self.enemies.iter().any(|e| e.lethal && e.rect.intersects(rect))
    }

    /// Every ingredient has reached a dish. False when there are none.
    pub fn all_served(&self) -> bool {
        !self.ingredients.is_empty()
            && self.ingredients.iter().all(|i| i.phase == IngredientPhase::Served)
    }
}
