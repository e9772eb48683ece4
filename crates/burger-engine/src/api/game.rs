use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::SoundEvent;
use crate::components::snapshot::Snapshot;
use crate::core::dispatcher::MessageDispatcher;
use crate::level::Level;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    Invalid { field: &'static str, value: f32 },
    #[error("`fixed_dt` must be positive (got {0})")]
    NonPositiveTimestep(f32),
}

/// Gameplay tuning. Every field has a default, so a config file only lists overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Most simulation steps run for one rendered frame.
    pub max_steps_per_frame: u32,
    /// Player walk and climb speed, px/s.
    pub player_speed: f32,
    /// Base enemy speed, px/s, scaled per enemy kind.
    pub enemy_speed: f32,
    /// Speed of a falling ingredient, px/s.
    pub ingredient_fall_speed: f32,
    /// How long a dead character stays down.
    pub dead_millis: f32,
    /// How long pepper freezes enemies.
    pub freeze_millis: f32,
    /// Intro jingle length; only meta commands are honoured meanwhile.
    pub intro_millis: f32,
    /// Minimum time between two pepper throws.
    pub pepper_cooldown_millis: f32,
    pub initial_lives: u32,
    pub max_lives: u32,
    pub initial_pepper: u32,
    pub max_pepper: u32,
    pub max_score: u32,
    /// Awarded each time an ingredient drops a floor.
    pub drop_score: u32,
    /// Awarded for every enemy squashed under an ingredient.
    pub squash_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            player_speed: 60.0,
            enemy_speed: 45.0,
            ingredient_fall_speed: 90.0,
            dead_millis: 2000.0,
            freeze_millis: 3000.0,
            intro_millis: 3000.0,
            pepper_cooldown_millis: 500.0,
            initial_lives: 3,
            max_lives: 9,
            initial_pepper: 5,
            max_pepper: 9,
            max_score: 999_999,
            drop_score: 50,
            squash_score: 500,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::NonPositiveTimestep(self.fixed_dt));
        }
        let fields = [
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("ingredient_fall_speed", self.ingredient_fall_speed),
            ("dead_millis", self.dead_millis),
            ("freeze_millis", self.freeze_millis),
            ("intro_millis", self.intro_millis),
            ("pepper_cooldown_millis", self.pepper_cooldown_millis),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }
}

/// Everything a component may touch while it updates.
pub struct FrameContext<'a> {
    pub dispatcher: &'a mut MessageDispatcher,
    pub level: &'a Level,
    /// Characters and ingredients as they stood at the start of the step.
    pub snapshot: &'a Snapshot,
    pub config: &'a GameConfig,
    sounds: &'a mut Vec<SoundEvent>,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        dispatcher: &'a mut MessageDispatcher,
        level: &'a Level,
        snapshot: &'a Snapshot,
        config: &'a GameConfig,
        sounds: &'a mut Vec<SoundEvent>,
    ) -> Self {
        Self { dispatcher, level, snapshot, config, sounds }
    }

    /// Queue a sound event for the audio collaborator.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }
}
