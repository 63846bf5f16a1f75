// Oriented rectangle and axis-aligned bounds of a kinematic body

use super::KinematicBody;
use crate::core::math::{deg_to_rad, rotate_about};
use glam::Vec2;

/// Axis-aligned box in a Y-down frame (`down` is the largest y)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    pub top: f32,
    pub right: f32,
    pub down: f32,
    pub left: f32,
}

impl Aabb {
    /// Smallest box enclosing `points`
    pub fn enclosing(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        points.iter().skip(1).fold(
            Self {
                top: first.y,
                right: first.x,
                down: first.y,
                left: first.x,
            },
            |acc, p| Self {
                top: acc.top.min(p.y),
                right: acc.right.max(p.x),
                down: acc.down.max(p.y),
                left: acc.left.min(p.x),
            },
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.down - self.top
    }

    /// Shift the box by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            top: self.top + offset.y,
            right: self.right + offset.x,
            down: self.down + offset.y,
            left: self.left + offset.x,
        }
    }

    /// Whether the interiors overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.down
            && other.top < self.down
    }
}

/// Corners of the rotated local rectangle plus their AABB
///
/// Vertices are relative to the body's position, in the order
/// top-left, top-right, bottom-right, bottom-left before rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub vertices: [Vec2; 4],
    pub aabb: Aabb,
}

/// Rotate the body's local rectangle about its origin and measure it
///
/// Rotation is applied as `-rotation` degrees so positive angles turn
/// clockwise on a Y-down screen. The result is a snapshot: it goes stale
/// as soon as scale, origin or rotation change.
pub fn compute_bounds(body: &KinematicBody) -> Bounds {
    let (w, h) = (body.scale.x, body.scale.y);
    let radians = deg_to_rad(-body.rotation);

    let vertices = [
        Vec2::new(0.0, 0.0),
        Vec2::new(w, 0.0),
        Vec2::new(w, h),
        Vec2::new(0.0, h),
    ]
    .map(|corner| rotate_about(corner, body.origin, radians));

    Bounds {
        aabb: Aabb::enclosing(&vertices),
        vertices,
    }
}

/// Width and height of the box enclosing a `size` rectangle rotated by `degrees`
pub fn orientation_extents(size: Vec2, degrees: f32) -> Vec2 {
    let radians = deg_to_rad(degrees);
    let c = radians.cos().abs();
    let s = radians.sin().abs();
    Vec2::new(size.y * s + size.x * c, size.y * c + size.x * s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::BodyBuilder;
    use approx::assert_abs_diff_eq;

    fn assert_vertices_eq(actual: &[Vec2; 4], expected: &[Vec2; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(a.x, e.x, epsilon = 1e-4);
            assert_abs_diff_eq!(a.y, e.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_zero_rotation_is_local_rectangle() {
        let body = BodyBuilder::new().scale(10.0, 4.0).origin(5.0, 2.0).build();
        let bounds = compute_bounds(&body);

        assert_vertices_eq(
            &bounds.vertices,
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 4.0),
                Vec2::new(0.0, 4.0),
            ],
        );
        assert_eq!(
            bounds.aabb,
            Aabb {
                top: 0.0,
                right: 10.0,
                down: 4.0,
                left: 0.0
            }
        );
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let base = BodyBuilder::new().scale(7.0, 3.0).origin(2.0, 1.0).build();
        let mut turned = base.clone();
        turned.rotation = 360.0;

        assert_vertices_eq(
            &compute_bounds(&turned).vertices,
            &compute_bounds(&base).vertices,
        );
    }

    #[test]
    fn test_quarter_turn_about_origin() {
        let body = BodyBuilder::new().scale(10.0, 4.0).rotation(90.0).build();
        let bounds = compute_bounds(&body);

        // Rotating by -90deg maps (x, y) to (y, -x)
        assert_vertices_eq(
            &bounds.vertices,
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, -10.0),
                Vec2::new(4.0, -10.0),
                Vec2::new(4.0, 0.0),
            ],
        );
        assert_abs_diff_eq!(bounds.aabb.top, -10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bounds.aabb.down, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bounds.aabb.left, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bounds.aabb.right, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_diagonal_rotation_inflates_aabb() {
        let body = BodyBuilder::new()
            .scale(10.0, 10.0)
            .origin(5.0, 5.0)
            .rotation(45.0)
            .build();
        let aabb = compute_bounds(&body).aabb;
        let diagonal = 10.0 * std::f32::consts::SQRT_2;

        assert_abs_diff_eq!(aabb.width(), diagonal, epsilon = 1e-3);
        assert_abs_diff_eq!(aabb.height(), diagonal, epsilon = 1e-3);
        assert_abs_diff_eq!((aabb.left + aabb.right) / 2.0, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_orientation_extents() {
        let size = Vec2::new(10.0, 4.0);
        let upright = orientation_extents(size, 0.0);
        assert_abs_diff_eq!(upright.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(upright.y, 4.0, epsilon = 1e-4);

        let sideways = orientation_extents(size, 90.0);
        assert_abs_diff_eq!(sideways.x, 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(sideways.y, 10.0, epsilon = 1e-4);

        // Matches the AABB of the rotated rectangle
        let body = BodyBuilder::new().scale(10.0, 4.0).rotation(30.0).build();
        let aabb = compute_bounds(&body).aabb;
        let tilted = orientation_extents(size, 30.0);
        assert_abs_diff_eq!(tilted.x, aabb.width(), epsilon = 1e-3);
        assert_abs_diff_eq!(tilted.y, aabb.height(), epsilon = 1e-3);
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb {
            top: 0.0,
            right: 10.0,
            down: 10.0,
            left: 0.0,
        };
        assert!(a.intersects(&a.translated(Vec2::new(5.0, 5.0))));
        assert!(!a.intersects(&a.translated(Vec2::new(10.0, 0.0))));
        assert!(!a.intersects(&a.translated(Vec2::new(20.0, 20.0))));
    }

    #[test]
    fn test_enclosing_empty() {
        assert_eq!(Aabb::enclosing(&[]), Aabb::default());
    }
}
