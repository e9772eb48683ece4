pub mod api;
pub mod core;
pub mod components;
pub mod input;
pub mod level;
pub mod game;

// Re-export key types at crate root for convenience
pub use api::game::{ConfigError, FrameContext, GameConfig};
pub use api::types::{EntityId, Message, SoundEvent};
pub use components::character::{standing_position, Character, CharacterAction, CHARACTER_BOX};
pub use components::collision::{CollisionComponent, Gates};
pub use components::enemy::Enemy;
pub use components::entity::{Component, Entity};
pub use components::ingredient::{Ingredient, IngredientPhase, INGREDIENT_BOX};
pub use components::player::Player;
pub use components::snapshot::Snapshot;
pub use components::sound::SoundEffects;
pub use core::counter::Counter;
pub use core::dispatcher::{Inbox, MessageDispatcher, ReceiverId};
pub use core::geometry::{BoundingBox, Rect, FOOT_OFFSET, TILE_SIZE};
pub use core::scene::Scene;
pub use core::time::{Countdown, FixedTimestep};
pub use game::{BurgerTime, GameError, Phase};
pub use input::queue::InputQueue;
pub use level::{Level, LevelBuilder, LevelError, LevelScript, LimitBuilder, LimitSets};
