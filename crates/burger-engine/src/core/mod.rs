pub mod counter;
pub mod dispatcher;
pub mod geometry;
pub mod scene;
pub mod time;
