use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A sound event emitted by the simulation.
/// The numeric value maps to a sound owned by the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// Every tag that can travel over the message bus.
///
/// Messages carry no payload. Dispatch is by exact tag match, so adding a tag
/// here is the only way to introduce a new event.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Message {
    Exit,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MainAction,
    SwitchNightMode,
    ResetGame,
    LoadNewLevel,
    GameStarted,
    PepperThrown,
    OnIngredient,
    IngredientHit,
    IngredientFell,
    IngredientServed,
    EnemySquashed,
    PlayerDied,
    Reset,
    LoadLevel,
    Victory,
    GameOver,
}

impl Message {
    pub const COUNT: usize = 21;

    pub const ALL: [Message; Self::COUNT] = [
        Message::Exit,
        Message::MoveLeft,
        Message::MoveRight,
        Message::MoveUp,
        Message::MoveDown,
        Message::MainAction,
        Message::SwitchNightMode,
        Message::ResetGame,
        Message::LoadNewLevel,
        Message::GameStarted,
        Message::PepperThrown,
        Message::OnIngredient,
        Message::IngredientHit,
        Message::IngredientFell,
        Message::IngredientServed,
        Message::EnemySquashed,
        Message::PlayerDied,
        Message::Reset,
        Message::LoadLevel,
        Message::Victory,
        Message::GameOver,
    ];

    /// Dense index of the tag, in `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the tag is something the input layer may produce.
    pub fn is_intent(self) -> bool {
        self.is_movement() || self.is_meta()
    }

    /// Gameplay intents: movement and the main action.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Message::MoveLeft
                | Message::MoveRight
                | Message::MoveUp
                | Message::MoveDown
                | Message::MainAction
        )
    }

    /// Meta commands, honoured in every game phase.
    pub fn is_meta(self) -> bool {
        matches!(
            self,
            Message::Exit | Message::SwitchNightMode | Message::ResetGame | Message::LoadNewLevel
        )
    }
}
