use glam::Vec2;

use crate::api::game::FrameContext;
use crate::api::types::Message;
use crate::components::character::{step, CharacterAction};
use crate::components::entity::Entity;
use crate::components::sound::sounds;
use crate::components::snapshot::Snapshot;
use crate::core::dispatcher::{Inbox, MessageDispatcher, ReceiverId};
use crate::core::time::Countdown;

/// Messages the player listens to.
pub const PLAYER_MESSAGES: [Message; 7] = [
    Message::MoveLeft,
    Message::MoveRight,
    Message::MoveUp,
    Message::MoveDown,
    Message::MainAction,
    Message::Reset,
    Message::Victory,
];

/// Movement intents in priority order: vertical beats horizontal.
const MOVES: [(Message, CharacterAction); 4] = [
    (Message::MoveUp, CharacterAction::ClimbingUp),
    (Message::MoveDown, CharacterAction::ClimbingDown),
    (Message::MoveLeft, CharacterAction::WalkingLeft),
    (Message::MoveRight, CharacterAction::WalkingRight),
];

/// The chef. Driven by intent messages, vetoed by collision gates.
#[derive(Debug)]
pub struct Player {
    receiver: ReceiverId,
    spawn: Vec2,
    action: CharacterAction,
    dead: Countdown,
    pepper_cooldown: Countdown,
}

impl Player {
    /// Register a receiver for the player and subscribe it. `spawn` is the
    /// position the player returns to on `Reset`.
    pub fn new(dispatcher: &mut MessageDispatcher, spawn: Vec2) -> Self {
        let receiver = dispatcher.register();
        dispatcher.subscribe_all(&PLAYER_MESSAGES, receiver);
        Self {
            receiver,
            spawn,
            action: CharacterAction::Idle,
            dead: Countdown::expired(),
            pepper_cooldown: Countdown::expired(),
        }
    }

    pub fn current_action(&self) -> CharacterAction {
        self.action
    }

    pub(crate) fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        let inbox = ctx.dispatcher.inbox(self.receiver);
        self.pepper_cooldown.tick(dt);

        if inbox.contains(Message::Reset) {
            self.respawn(entity);
        } else {
            match self.action {
                CharacterAction::Dead => {
                    if self.dead.tick(dt) {
                        log::debug!("player {:?} is out", entity.id);
                        ctx.dispatcher.send(Message::PlayerDied);
                    }
                }
                CharacterAction::Celebrating => {}
                _ => self.act(&inbox, entity, ctx, dt),
            }
        }

        ctx.dispatcher.clear_inbox(self.receiver);
    }

    fn act(&mut self, inbox: &Inbox, entity: &mut Entity, ctx: &mut FrameContext<'_>, dt: f32) {
        if inbox.contains(Message::Victory) {
            self.action = CharacterAction::Celebrating;
            return;
        }

        let touched = entity
            .rect()
            .map_or(false, |rect| ctx.snapshot.touches_lethal_enemy(&rect));
        if touched {
            log::debug!("player {:?} caught at {}", entity.id, entity.pos);
            self.action = CharacterAction::Dead;
            self.dead.restart(ctx.config.dead_millis);
            ctx.emit_sound(sounds::DEATH);
            return;
        }

        if inbox.contains(Message::MainAction)
            && ctx.snapshot.pepper > 0
            && self.pepper_cooldown.is_expired()
        {
            ctx.dispatcher.send(Message::PepperThrown);
            self.pepper_cooldown.restart(ctx.config.pepper_cooldown_millis);
        }

        let gates = entity.gates.unwrap_or_default();
        let distance = ctx.config.player_speed * dt;
        self.action = MOVES
            .iter()
            .filter(|(intent, _)| inbox.contains(*intent))
            .map(|&(_, action)| action)
            .find(|&action| step(entity, action, &gates, distance))
            .unwrap_or(CharacterAction::Idle);
    }

    fn respawn(&mut self, entity: &mut Entity) {
        entity.set_pos(self.spawn);
        self.action = CharacterAction::Idle;
        self.dead = Countdown::expired();
        self.pepper_cooldown = Countdown::expired();
    }

    pub(crate) fn publish(&self, entity: &Entity, snapshot: &mut Snapshot) {
        snapshot.player = entity.rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::api::types::{EntityId, SoundEvent};
    use crate::components::character::{standing_position, Character, CHARACTER_BOX};
    use crate::components::collision::CollisionComponent;
    use crate::components::snapshot::EnemyPresence;
    use crate::level::{FloorVariant, Level, LevelBuilder};

    /// Floors at rows 32 and 96 (x 0..=80), stairs at column 48 joining them.
    fn level() -> Level {
        let mut b = LevelBuilder::new("player");
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

    struct Rig {
        dispatcher: MessageDispatcher,
        level: Level,
        snapshot: Snapshot,
        config: GameConfig,
        sounds: Vec<SoundEvent>,
        entity: Entity,
    }

    impl Rig {
        fn at(tile: Vec2) -> Self {
            let mut dispatcher = MessageDispatcher::new();
            let spawn = standing_position(tile);
            let player = Player::new(&mut dispatcher, spawn);
            let entity = Entity::new(EntityId(1))
                .with_pos(spawn)
                .with_bbox(CHARACTER_BOX)
                .with_component(CollisionComponent)
                .with_component(Character::Player(player));
            Self {
                dispatcher,
                level: level(),
                snapshot: Snapshot::new(),
                config: GameConfig::default(),
                sounds: Vec::new(),
                entity,
            }
        }

        fn step(&mut self, intents: &[Message]) {
            for &intent in intents {
                self.dispatcher.send(intent);
            }
            let mut ctx = FrameContext::new(
                &mut self.dispatcher,
                &self.level,
                &self.snapshot,
                &self.config,
                &mut self.sounds,
            );
            self.entity.update(&mut ctx, 0.1);
        }
    }

    #[test]
    fn walks_right_on_a_floor() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        rig.step(&[Message::MoveRight]);
        assert_eq!(rig.entity.action, CharacterAction::WalkingRight);
        assert_eq!(rig.entity.pos.x, 22.0);
        rig.step(&[]);
        assert_eq!(rig.entity.action, CharacterAction::Idle);
        assert_eq!(rig.entity.pos.x, 22.0);
    }

    #[test]
    fn vertical_intent_wins_at_stairs() {
        let mut rig = Rig::at(Vec2::new(48.0, 96.0));
        rig.step(&[Message::MoveRight, Message::MoveUp]);
        assert_eq!(rig.entity.action, CharacterAction::ClimbingUp);
        assert_eq!(rig.entity.pos.x, 48.0);
    }

    #[test]
    fn vetoed_vertical_falls_back_to_walking() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        rig.step(&[Message::MoveUp, Message::MoveLeft]);
        assert_eq!(rig.entity.action, CharacterAction::WalkingLeft);
    }

    #[test]
    fn blocked_at_run_end() {
        let mut rig = Rig::at(Vec2::new(0.0, 96.0));
        rig.step(&[Message::MoveLeft]);
        assert_eq!(rig.entity.action, CharacterAction::Idle);
        assert_eq!(rig.entity.pos.x, 0.0);
    }

    #[test]
    fn climbing_snaps_to_column() {
        let mut rig = Rig::at(Vec2::new(48.0, 96.0));
        rig.entity.pos.x = 45.0;
        rig.step(&[Message::MoveUp]);
        assert_eq!(rig.entity.pos.x, 48.0);
        assert!(rig.entity.pos.y < standing_position(Vec2::new(48.0, 96.0)).y);
    }

    #[test]
    fn dies_once_then_waits_for_reset() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        let rect = rig.entity.rect().unwrap();
        rig.snapshot.enemies.push(EnemyPresence { id: EntityId(9), rect, lethal: true });
        rig.step(&[]);
        assert_eq!(rig.entity.action, CharacterAction::Dead);
        assert_eq!(rig.sounds, vec![sounds::DEATH]);

        // well past dead_millis: still down, still in place
        for _ in 0..40 {
            rig.step(&[Message::MoveRight]);
        }
        assert_eq!(rig.entity.action, CharacterAction::Dead);
        assert_eq!(rig.entity.pos, standing_position(Vec2::new(16.0, 96.0)));
        assert_eq!(rig.sounds.len(), 1);

        rig.snapshot.enemies.clear();
        rig.step(&[Message::Reset]);
        assert_eq!(rig.entity.action, CharacterAction::Idle);
        assert_eq!(rig.entity.pos, standing_position(Vec2::new(16.0, 96.0)));
    }

    #[test]
    fn sends_player_died_exactly_once() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        let listener = rig.dispatcher.register();
        rig.dispatcher.subscribe(Message::PlayerDied, listener);
        let rect = rig.entity.rect().unwrap();
        rig.snapshot.enemies.push(EnemyPresence { id: EntityId(9), rect, lethal: true });

        for _ in 0..60 {
            rig.step(&[]);
        }
        assert_eq!(rig.dispatcher.inbox(listener).count(Message::PlayerDied), 1);
    }

    #[test]
    fn frozen_enemy_is_harmless() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        let rect = rig.entity.rect().unwrap();
        rig.snapshot.enemies.push(EnemyPresence { id: EntityId(9), rect, lethal: false });
        rig.step(&[]);
        assert_eq!(rig.entity.action, CharacterAction::Idle);
    }

    #[test]
    fn pepper_needs_stock_and_cooldown() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        let listener = rig.dispatcher.register();
        rig.dispatcher.subscribe(Message::PepperThrown, listener);

        rig.step(&[Message::MainAction]);
        assert_eq!(rig.dispatcher.inbox(listener).count(Message::PepperThrown), 0);

        rig.snapshot.pepper = 2;
        rig.step(&[Message::MainAction]);
        rig.step(&[Message::MainAction]);
        // cooldown is 500ms: the second throw comes five steps after the first
        for _ in 0..5 {
            rig.step(&[Message::MainAction]);
        }
        assert_eq!(rig.dispatcher.inbox(listener).count(Message::PepperThrown), 2);
    }

    #[test]
    fn victory_means_celebrating() {
        let mut rig = Rig::at(Vec2::new(16.0, 96.0));
        rig.step(&[Message::Victory]);
        assert_eq!(rig.entity.action, CharacterAction::Celebrating);
        rig.step(&[Message::MoveRight]);
        assert_eq!(rig.entity.action, CharacterAction::Celebrating);
        assert_eq!(rig.entity.pos, standing_position(Vec2::new(16.0, 96.0)));
    }
}
