// Sprite physics: kinematic integration, bounds and pixel collision

pub mod body;
pub mod bounds;
mod collision;
mod mask;

pub use body::{BodyBuilder, KinematicBody};
pub use bounds::{compute_bounds, orientation_extents, Aabb, Bounds};
pub use collision::{
    are_colliding, scan_overlap, Collidable, CollisionDetector, Overlap, ScanPath,
};
pub use mask::{ColliderFrame, CollisionMask};

/// Physics contract violations
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// A force was applied to a body whose mass is not a positive finite number
    #[error("Invalid mass {0}: force needs a positive, finite mass")]
    InvalidMass(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_error_display() {
        let err = PhysicsError::InvalidMass(0.0);
        assert_eq!(
            err.to_string(),
            "Invalid mass 0: force needs a positive, finite mass"
        );
    }
}
