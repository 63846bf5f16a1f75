// Engine modules: assets, configuration, tick scheduling, physics

pub mod assets;
pub mod config;
pub mod game_loop;
pub mod physics;
