// Game-facing entities built on the engine

pub mod sprites;
