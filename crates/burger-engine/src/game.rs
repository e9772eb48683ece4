//! The orchestrator: owns the level list, the scene and the bus, and turns
//! gameplay messages into score, lives, pepper and phase changes.

use glam::Vec2;
use thiserror::Error;

use crate::api::game::{ConfigError, FrameContext, GameConfig};
use crate::api::types::{EntityId, Message, SoundEvent};
use crate::components::character::{standing_position, Character, CHARACTER_BOX};
use crate::components::collision::{CollisionComponent, Gates};
use crate::components::enemy::Enemy;
use crate::components::entity::Entity;
use crate::components::ingredient::{resting_position, Ingredient, INGREDIENT_BOX};
use crate::components::player::Player;
use crate::components::snapshot::Snapshot;
use crate::components::sound::SoundEffects;
use crate::core::counter::Counter;
use crate::core::dispatcher::{MessageDispatcher, ReceiverId};
use crate::core::scene::Scene;
use crate::core::time::{Countdown, FixedTimestep};
use crate::input::queue::InputQueue;
use crate::level::{Level, LevelError};

pub const TAG_PLAYER: &str = "player";
pub const TAG_ENEMY: &str = "enemy";
pub const TAG_INGREDIENT: &str = "ingredient";
pub const TAG_SOUND: &str = "sound";

/// Messages the orchestrator listens to.
pub const ORCHESTRATOR_MESSAGES: [Message; 9] = [
    Message::Exit,
    Message::SwitchNightMode,
    Message::ResetGame,
    Message::LoadNewLevel,
    Message::PlayerDied,
    Message::PepperThrown,
    Message::EnemySquashed,
    Message::IngredientFell,
    Message::IngredientServed,
];

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Jingle playing; only meta commands get through and actors are disabled.
    Intro,
    Playing,
    Victory,
    GameOver,
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Victory | Phase::GameOver)
    }
}

/// A level load requested during a step, applied once the step is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingLoad {
    Restart,
    Next,
}

pub struct BurgerTime {
    config: GameConfig,
    levels: Vec<Level>,
    current: usize,
    scene: Scene,
    dispatcher: MessageDispatcher,
    receiver: ReceiverId,
    snapshot: Snapshot,
    input: InputQueue,
    timestep: FixedTimestep,
    phase: Phase,
    intro: Countdown,
    score: Counter,
    lives: Counter,
    pepper: Counter,
    night_mode: bool,
    exit: bool,
    pending_load: Option<PendingLoad>,
    pending_reset: bool,
    sounds: Vec<SoundEvent>,
    steps: u64,
}

impl BurgerTime {
    /// Validate `config` and load the first of `levels`.
    pub fn new(config: GameConfig, levels: Vec<Level>) -> Result<Self, GameError> {
        config.validate()?;
        if levels.is_empty() {
            return Err(LevelError::NoLevels.into());
        }

        let mut dispatcher = MessageDispatcher::new();
        let receiver = dispatcher.register();
        let mut game = Self {
            timestep: FixedTimestep::new(config.fixed_dt, config.max_steps_per_frame),
            score: Counter::new(0, 0, config.max_score),
            lives: Counter::new(config.initial_lives, 0, config.max_lives),
            pepper: Counter::new(config.initial_pepper, 0, config.max_pepper),
            intro: Countdown::new(config.intro_millis),
            config,
            levels,
            current: 0,
            scene: Scene::new(),
            dispatcher,
            receiver,
            snapshot: Snapshot::new(),
            input: InputQueue::new(),
            phase: Phase::Intro,
            night_mode: false,
            exit: false,
            pending_load: None,
            pending_reset: false,
            sounds: Vec::new(),
            steps: 0,
        };
        game.load(0);
        Ok(game)
    }

    /// Advance by one rendered frame of `frame_dt` seconds. Returns the number
    /// of fixed steps run. Sound events from the frame are left in [`Self::sounds`].
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        self.sounds.clear();
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            if self.exit {
                break;
            }
            self.step();
        }
        steps
    }

    /// Run exactly one fixed step.
    pub fn step(&mut self) {
        let dt = self.timestep.dt();

        for intent in self.input.frame_intents() {
            if self.phase == Phase::Playing || intent.is_meta() {
                self.dispatcher.send(intent);
            }
        }

        self.publish_snapshot();

        {
            let mut ctx = FrameContext::new(
                &mut self.dispatcher,
                &self.levels[self.current],
                &self.snapshot,
                &self.config,
                &mut self.sounds,
            );
            self.scene.update(&mut ctx, dt);
        }

        self.publish_snapshot();
        self.handle_messages(dt);
        self.apply_pending();
        self.steps += 1;
    }

    fn publish_snapshot(&mut self) {
        self.scene.publish(&mut self.snapshot);
        self.snapshot.pepper = self.pepper.value();
    }

    fn handle_messages(&mut self, dt: f32) {
        let inbox = self.dispatcher.inbox(self.receiver);
        self.dispatcher.clear_inbox(self.receiver);

        if inbox.contains(Message::Exit) {
            log::info!("exit requested");
            self.exit = true;
        }
        for _ in 0..inbox.count(Message::SwitchNightMode) {
            self.night_mode = !self.night_mode;
        }
        if inbox.contains(Message::ResetGame) {
            self.pending_load = Some(PendingLoad::Restart);
        } else if inbox.contains(Message::LoadNewLevel) && self.pending_load.is_none() {
            self.pending_load = Some(PendingLoad::Next);
        }

        let drops = inbox.count(Message::IngredientFell).saturating_mul(self.config.drop_score);
        let squashes = inbox.count(Message::EnemySquashed).saturating_mul(self.config.squash_score);
        let awarded = drops.saturating_add(squashes);
        if awarded > 0 {
            self.score.increment_by(awarded);
        }
        for _ in 0..inbox.count(Message::PepperThrown) {
            self.pepper.decrement();
        }
        if inbox.contains(Message::IngredientServed) {
            log::debug!("{} ingredient(s) served", inbox.count(Message::IngredientServed));
        }

        if inbox.contains(Message::PlayerDied) && self.phase != Phase::GameOver {
            self.lives.decrement();
            if self.lives.is_at_min() {
                log::info!("game over with score {}", self.score.value());
                self.phase = Phase::GameOver;
                self.dispatcher.send(Message::GameOver);
            } else {
                log::debug!("player died, {} lives left", self.lives.value());
                self.pending_reset = true;
            }
        }

        match self.phase {
            Phase::Intro => {
                self.intro.tick(dt);
                if self.intro.is_expired() {
                    self.start_playing();
                }
            }
            Phase::Playing if self.snapshot.all_served() => {
                log::info!("level '{}' cleared with score {}", self.level().name, self.score.value());
                self.phase = Phase::Victory;
                self.dispatcher.send(Message::Victory);
            }
            _ => {}
        }
    }

    fn start_playing(&mut self) {
        for entity in self.scene.iter_mut() {
            entity.enable();
        }
        self.phase = Phase::Playing;
        self.dispatcher.send(Message::GameStarted);
    }

    fn apply_pending(&mut self) {
        match self.pending_load.take() {
            Some(PendingLoad::Restart) => {
                self.score.reset();
                self.lives.reset();
                self.pepper.reset();
                self.pending_reset = false;
                self.load(0);
            }
            Some(PendingLoad::Next) => {
                self.pending_reset = false;
                self.load((self.current + 1) % self.levels.len());
            }
            None if self.pending_reset => {
                self.pending_reset = false;
                self.dispatcher.send(Message::Reset);
            }
            None => {}
        }
    }

    /// Tear down the scene and the bus, then spawn the actors of level `index`.
    fn load(&mut self, index: usize) {
        self.scene.clear();
        self.dispatcher.clear();
        self.snapshot.clear();
        self.receiver = self.dispatcher.register();
        self.dispatcher.subscribe_all(&ORCHESTRATOR_MESSAGES, self.receiver);
        self.current = index;

        let level = &self.levels[index];
        let id = self.scene.next_id();
        let sounds = SoundEffects::new(&mut self.dispatcher);
        self.scene.spawn(Entity::new(id).with_tag(TAG_SOUND).with_component(sounds));

        for spawn in &level.spawns.ingredients {
            let pos = resting_position(spawn.pos);
            let id = self.scene.next_id();
            self.scene.spawn(
                Entity::new(id)
                    .with_tag(TAG_INGREDIENT)
                    .with_pos(pos)
                    .with_bbox(INGREDIENT_BOX)
                    .with_component(Ingredient::new(spawn.kind, pos)),
            );
        }

        for spawn in &level.spawns.enemies {
            let pos = standing_position(spawn.pos);
            let enemy = Enemy::new(&mut self.dispatcher, spawn.kind, pos, spawn.idle_time);
            let id = self.scene.next_id();
            self.scene.spawn(character(id, TAG_ENEMY, pos, Character::Enemy(enemy)));
        }

        if let Some(tile) = level.spawns.player {
            let pos = standing_position(tile);
            let player = Player::new(&mut self.dispatcher, pos);
            let id = self.scene.next_id();
            self.scene.spawn(character(id, TAG_PLAYER, pos, Character::Player(player)));
        }

        for entity in self.scene.iter_mut() {
            if entity.tag != TAG_SOUND {
                entity.disable();
            }
        }
        self.phase = Phase::Intro;
        self.intro.restart(self.config.intro_millis);
        self.dispatcher.send(Message::LoadLevel);

        log::info!(
            "loaded level {} '{}': {} floors, {} stairs, {} enemies, {} ingredients",
            index,
            level.name,
            level.floors.len(),
            level.stairs.len(),
            level.spawns.enemies.len(),
            level.spawns.ingredients.len()
        );
    }

    // -- Input --

    pub fn input(&mut self) -> &mut InputQueue {
        &mut self.input
    }

    // -- Observers --

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn level_index(&self) -> usize {
        self.current
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Actors as they stood at the end of the last step.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    pub fn lives(&self) -> u32 {
        self.lives.value()
    }

    pub fn pepper(&self) -> u32 {
        self.pepper.value()
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    /// Sound events emitted during the last [`Self::tick`].
    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    /// Fixed steps run since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

fn character(id: EntityId, tag: &str, pos: Vec2, character: Character) -> Entity {
    Entity::new(id)
        .with_tag(tag)
        .with_pos(pos)
        .with_bbox(CHARACTER_BOX)
        .with_gates(Gates::default())
        .with_component(CollisionComponent)
        .with_component(character)
}
