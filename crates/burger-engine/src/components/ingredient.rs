//! Burger ingredients: stepped on by the player, dropped floor by floor,
//! served on dishes.

use glam::Vec2;

use crate::api::game::FrameContext;
use crate::api::types::Message;
use crate::components::entity::{Component, Entity};
use crate::components::snapshot::{IngredientPresence, Snapshot};
use crate::core::geometry::{BoundingBox, Rect, FOOT_OFFSET, TILE_SIZE};
use crate::level::IngredientKind;

/// Number of segments the player has to walk over before an ingredient drops.
pub const SEGMENTS: usize = 4;

pub const INGREDIENT_BOX: BoundingBox = BoundingBox::new(SEGMENTS as f32 * TILE_SIZE, 0.5 * TILE_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngredientPhase {
    #[default]
    Resting,
    Falling,
    Served,
}

/// Position that rests an ingredient on the floor tile at `tile`.
pub fn resting_position(tile: Vec2) -> Vec2 {
    Vec2::new(tile.x, tile.y + FOOT_OFFSET - INGREDIENT_BOX.height)
}

#[derive(Debug)]
pub struct Ingredient {
    kind: IngredientKind,
    phase: IngredientPhase,
    stepped: [bool; SEGMENTS],
    /// Surface the current fall started from; only floors below it can stop the fall.
    start_surface: f32,
}

impl Ingredient {
    /// An ingredient resting at `pos` (see [`resting_position`]).
    pub fn new(kind: IngredientKind, pos: Vec2) -> Self {
        Self {
            kind,
            phase: IngredientPhase::Resting,
            stepped: [false; SEGMENTS],
            start_surface: pos.y + INGREDIENT_BOX.height,
        }
    }

    pub fn kind(&self) -> IngredientKind {
        self.kind
    }

    pub fn phase(&self) -> IngredientPhase {
        self.phase
    }

    fn start_falling(&mut self, rect: Rect, cause: Message, ctx: &mut FrameContext<'_>) {
        log::debug!("{:?} falls from y={} ({:?})", self.kind, rect.max.y, cause);
        self.phase = IngredientPhase::Falling;
        self.start_surface = rect.max.y;
        ctx.dispatcher.send(cause);
    }

    fn rest(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, rect: Rect) {
        let hit = ctx.snapshot.ingredients.iter().any(|other| {
            other.id != entity.id
                && other.phase == IngredientPhase::Falling
                && strictly_overlaps_x(&other.rect, &rect)
                && other.rect.min.y < rect.min.y
                && other.rect.intersects(&rect)
        });
        if hit {
            self.start_falling(rect, Message::IngredientHit, ctx);
            return;
        }

        let Some(player) = ctx.snapshot.player else {
            return;
        };
        if !player.intersects(&rect) {
            return;
        }
        let offset = (player.center().x - rect.min.x) / TILE_SIZE;
        if offset < 0.0 {
            return;
        }
        let segment = offset as usize;
        if segment < SEGMENTS && !self.stepped[segment] {
            self.stepped[segment] = true;
            ctx.dispatcher.send(Message::OnIngredient);
            if self.stepped.iter().all(|&s| s) {
                self.start_falling(rect, Message::IngredientFell, ctx);
            }
        }
    }

    fn fall(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, rect: Rect, dt: f32) {
        let bottom = rect.max.y;
        let reach = bottom + ctx.config.ingredient_fall_speed * dt;
        let crossed = |y: f32| y > bottom && y <= reach;

        let floor = ctx
            .level
            .floor_surfaces()
            .filter(|s| s.min.y > self.start_surface && crossed(s.min.y) && strictly_overlaps_x(s, &rect))
            .map(|s| s.min.y)
            .min_by(f32::total_cmp);
        let dish = ctx
            .level
            .dishes
            .iter()
            .map(|d| d.surface())
            .chain(
                ctx.snapshot
                    .ingredients
                    .iter()
                    .filter(|o| o.id != entity.id && o.phase == IngredientPhase::Served)
                    .map(|o| o.rect),
            )
            .filter(|s| crossed(s.min.y) && strictly_overlaps_x(s, &rect))
            .map(|s| s.min.y)
            .min_by(f32::total_cmp);

        match (floor, dish) {
            (Some(f), Some(d)) if d < f => self.serve(entity, ctx, d),
            (Some(f), _) => {
                entity.pos.y = f - INGREDIENT_BOX.height;
                self.phase = IngredientPhase::Resting;
                self.stepped = [false; SEGMENTS];
                self.start_surface = f;
                log::debug!("{:?} landed on floor y={}", self.kind, f);
            }
            (None, Some(d)) => self.serve(entity, ctx, d),
            (None, None) => entity.pos.y = reach - INGREDIENT_BOX.height,
        }
    }

    fn serve(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, surface: f32) {
        entity.pos.y = surface - INGREDIENT_BOX.height;
        self.phase = IngredientPhase::Served;
        log::debug!("{:?} served at y={}", self.kind, surface);
        ctx.dispatcher.send(Message::IngredientServed);
    }
}

impl Component for Ingredient {
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        let Some(rect) = entity.rect() else {
            return;
        };
        match self.phase {
            IngredientPhase::Resting => self.rest(entity, ctx, rect),
            IngredientPhase::Falling => self.fall(entity, ctx, rect, dt),
            IngredientPhase::Served => {}
        }
    }

    fn publish(&self, entity: &Entity, snapshot: &mut Snapshot) {
        if let Some(rect) = entity.rect() {
            snapshot.ingredients.push(IngredientPresence { id: entity.id, rect, phase: self.phase });
        }
    }
}

/// Horizontal overlap of positive width; touching edges do not count.
fn strictly_overlaps_x(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x
}
