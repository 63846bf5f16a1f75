// Sprite system
//
// Animated sprites built on the engine's kinematics and collision:
// - Named animation clips over layered sprite sheets
// - The sprite entity tying body, clips and bounds together

pub mod animation;
pub mod sprite;

// Re-export commonly used types
pub use animation::{AnimationClip, AnimationSet, ClipDefinition, ClipId};
pub use sprite::Sprite;
