use glam::Vec2;

use crate::api::game::FrameContext;
use crate::api::types::Message;
use crate::components::character::{step, CharacterAction};
use crate::components::collision::Gates;
use crate::components::entity::Entity;
use crate::components::ingredient::IngredientPhase;
use crate::components::snapshot::{EnemyPresence, Snapshot};
use crate::core::dispatcher::{MessageDispatcher, ReceiverId};
use crate::core::geometry::Rect;
use crate::core::time::Countdown;
use crate::level::EnemyKind;

/// Messages every enemy listens to.
pub const ENEMY_MESSAGES: [Message; 4] =
    [Message::IngredientFell, Message::PepperThrown, Message::Reset, Message::Victory];

/// Vertical distance under which the player counts as on the enemy's row.
const ROW_SLACK: f32 = 8.0;

/// A chasing enemy.
///
/// Waits at its spawn for `idle_time`, then walks floors and climbs stairs
/// towards the player. Route choices are made only at floor/stair
/// intersections, once per intersection visited. Eggs stay put until an
/// ingredient has dropped in the level.
#[derive(Debug)]
pub struct Enemy {
    receiver: ReceiverId,
    kind: EnemyKind,
    spawn: Vec2,
    idle_time: f32,
    idle: Countdown,
    hatched: bool,
    mobile: bool,
    halted: bool,
    action: CharacterAction,
    /// Action to go back to when a freeze wears off.
    resume: CharacterAction,
    dead: Countdown,
    frozen: Countdown,
    last_intersection: Option<(i32, i32)>,
}

impl Enemy {
    pub fn new(dispatcher: &mut MessageDispatcher, kind: EnemyKind, spawn: Vec2, idle_time: f32) -> Self {
        let receiver = dispatcher.register();
        dispatcher.subscribe_all(&ENEMY_MESSAGES, receiver);
        Self {
            receiver,
            kind,
            spawn,
            idle_time,
            idle: Countdown::new(idle_time * 1000.0),
            hatched: kind != EnemyKind::Egg,
            mobile: false,
            halted: false,
            action: CharacterAction::Idle,
            resume: CharacterAction::Idle,
            dead: Countdown::expired(),
            frozen: Countdown::expired(),
            last_intersection: None,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn current_action(&self) -> CharacterAction {
        self.action
    }

    /// Whether the spawn wait is over and, for an egg, it has hatched.
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub(crate) fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        let inbox = ctx.dispatcher.inbox(self.receiver);
        ctx.dispatcher.clear_inbox(self.receiver);

        if inbox.contains(Message::IngredientFell) {
            self.hatched = true;
        }
        if inbox.contains(Message::Reset) {
            self.respawn(entity);
            return;
        }
        if inbox.contains(Message::Victory) {
            self.halted = true;
        }

        if self.action != CharacterAction::Dead {
            if self.squashed(entity, ctx) {
                log::debug!("enemy {:?} squashed at {}", entity.id, entity.pos);
                self.action = CharacterAction::Dead;
                self.dead.restart(ctx.config.dead_millis);
                ctx.dispatcher.send(Message::EnemySquashed);
                return;
            }
            if inbox.contains(Message::PepperThrown) {
                if self.action != CharacterAction::Frozen {
                    self.resume = self.action;
                }
                self.action = CharacterAction::Frozen;
                self.frozen.restart(ctx.config.freeze_millis);
                return;
            }
        }

        match self.action {
            CharacterAction::Dead => {
                if self.dead.tick(dt) {
                    self.respawn(entity);
                }
            }
            CharacterAction::Frozen => {
                if self.frozen.tick(dt) {
                    self.action = self.resume;
                }
            }
            _ if self.halted => self.action = CharacterAction::Idle,
            _ if !self.mobile => {
                self.idle.tick(dt);
                self.mobile = self.idle.is_expired() && self.hatched;
            }
            _ => self.chase(entity, ctx, dt),
        }
    }

    fn squashed(&self, entity: &Entity, ctx: &FrameContext<'_>) -> bool {
        let Some(rect) = entity.rect() else {
            return false;
        };
        ctx.snapshot
            .ingredients
            .iter()
            .any(|i| i.phase == IngredientPhase::Falling && i.rect.intersects(&rect))
    }

    fn chase(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        let Some(rect) = entity.rect() else {
            return;
        };
        let gates = entity.gates.unwrap_or_default();
        let target = ctx.snapshot.player.map(|r| r.center());
        let distance = ctx.config.enemy_speed * self.kind.speed_factor() * dt;

        let climb_over = match self.action {
            CharacterAction::ClimbingUp => !gates.can_climb_up(),
            CharacterAction::ClimbingDown => !gates.can_climb_down(),
            _ => false,
        };
        if climb_over {
            self.action = self.walk_towards(target, rect, &gates);
        }

        match intersection(&gates, rect, distance) {
            Some(key) if self.last_intersection != Some(key) => {
                self.last_intersection = Some(key);
                self.action = self.decide(target, rect, &gates);
                log::trace!("enemy {:?} chose {:?} at {:?}", entity.id, self.action, key);
            }
            Some(_) => {}
            None => self.last_intersection = None,
        }

        if !(self.action.is_walking() || self.action.is_climbing()) {
            self.action = self.walk_towards(target, rect, &gates);
        }

        if !step(entity, self.action, &gates, distance) {
            self.action = if self.action.is_walking() {
                self.action.reversed()
            } else {
                self.walk_towards(target, rect, &gates)
            };
            step(entity, self.action, &gates, distance);
        }
    }

    /// Route choice at an intersection: climb towards the player's row if the
    /// stair allows it, otherwise walk towards the player's column.
    fn decide(&self, target: Option<Vec2>, rect: Rect, gates: &Gates) -> CharacterAction {
        if let Some(target) = target {
            let dy = target.y - rect.center().y;
            if dy < -ROW_SLACK && gates.can_climb_up() {
                return CharacterAction::ClimbingUp;
            }
            if dy > ROW_SLACK && gates.can_climb_down() {
                return CharacterAction::ClimbingDown;
            }
        }
        self.walk_towards(target, rect, gates)
    }

    fn walk_towards(&self, target: Option<Vec2>, rect: Rect, gates: &Gates) -> CharacterAction {
        let prefer_left = match target {
            Some(t) => t.x < rect.center().x,
            None => self.action != CharacterAction::WalkingRight,
        };
        let (first, second) = if prefer_left {
            (CharacterAction::WalkingLeft, CharacterAction::WalkingRight)
        } else {
            (CharacterAction::WalkingRight, CharacterAction::WalkingLeft)
        };
        let allowed = |a: CharacterAction| match a {
            CharacterAction::WalkingLeft => gates.can_walk_left(),
            _ => gates.can_walk_right(),
        };
        if allowed(first) {
            first
        } else if allowed(second) {
            second
        } else {
            self.action
        }
    }

    fn respawn(&mut self, entity: &mut Entity) {
        log::debug!("enemy {:?} respawns at {}", entity.id, self.spawn);
        entity.set_pos(self.spawn);
        self.idle.restart(self.idle_time * 1000.0);
        self.mobile = false;
        self.halted = false;
        self.action = CharacterAction::Idle;
        self.resume = CharacterAction::Idle;
        self.dead = Countdown::expired();
        self.frozen = Countdown::expired();
        self.last_intersection = None;
    }

    pub(crate) fn publish(&self, entity: &Entity, snapshot: &mut Snapshot) {
        if let Some(rect) = entity.rect() {
            let lethal = !matches!(self.action, CharacterAction::Dead | CharacterAction::Frozen);
            snapshot.enemies.push(EnemyPresence { id: entity.id, rect, lethal });
        }
    }
}

/// The floor/stair crossing the entity stands on, if it is lined up with the
/// stair column to within one step.
fn intersection(gates: &Gates, rect: Rect, distance: f32) -> Option<(i32, i32)> {
    let (x, y) = (gates.stair_x?, gates.floor_y?);
    ((rect.min.x - x).abs() <= distance.max(f32::EPSILON)).then(|| (x as i32, y as i32))
}
