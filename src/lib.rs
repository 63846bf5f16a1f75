// Sprite kinematics, animation and pixel-perfect collision

pub mod core;
pub mod engine;
pub mod game;

pub use engine::assets::{ImageEvent, ImageHandle, ImageLookup, ImageStore};
pub use engine::config::EngineConfig;
pub use engine::game_loop::TickScheduler;
pub use engine::physics::{
    are_colliding, Collidable, CollisionDetector, KinematicBody, PhysicsError,
};
pub use game::sprites::{ClipDefinition, Sprite};
