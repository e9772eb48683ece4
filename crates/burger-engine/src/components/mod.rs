pub mod character;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod ingredient;
pub mod player;
pub mod snapshot;
pub mod sound;
