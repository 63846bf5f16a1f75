// Sprite entity: kinematics, animation clips and cached bounds

use super::animation::{AnimationClip, AnimationSet, ClipDefinition, ClipId};
use crate::core::math::approx_equal;
use crate::engine::assets::{ClipRect, ImageEvent, ImageLookup, ImageStore};
use crate::engine::physics::{
    compute_bounds, BodyBuilder, Bounds, Collidable, ColliderFrame, CollisionDetector,
    KinematicBody, PhysicsError,
};
use glam::Vec2;
use log::debug;

/// A movable, animated, pixel-collidable sprite
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Name for logs and lookups
    pub id: String,
    body: KinematicBody,
    animation: AnimationSet,
    /// Last computed bounds; stale until `compute_bounds` runs again
    bounds: Bounds,
}

impl Sprite {
    /// Create a sprite at (x, y) with the given size
    ///
    /// A zero size is replaced by the base layer's pixel size once the
    /// first clip finishes loading.
    pub fn new(id: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_body(
            id,
            BodyBuilder::new().position(x, y).scale(width, height).build(),
        )
    }

    pub fn from_body(id: &str, body: KinematicBody) -> Self {
        let bounds = compute_bounds(&body);
        Self {
            id: id.to_string(),
            body,
            animation: AnimationSet::new(),
            bounds,
        }
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    pub fn animation(&self) -> &AnimationSet {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationSet {
        &mut self.animation
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.body.position = Vec2::new(x, y);
    }

    // Physics

    /// One integration tick
    pub fn integrate(&mut self) {
        self.body.integrate();
    }

    pub fn apply_force(&mut self, fx: f32, fy: f32) -> Result<(), PhysicsError> {
        self.body.apply_force(fx, fy)
    }

    pub fn apply_acceleration(&mut self, ax: f32, ay: f32) {
        self.body.apply_acceleration(ax, ay);
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.body.set_velocity(vx, vy);
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.body.set_mass(mass);
    }

    pub fn reset_acceleration(&mut self) {
        self.body.reset_acceleration();
    }

    /// Set width and height; bounds are not recomputed
    pub fn transform(&mut self, width: f32, height: f32) {
        self.body.set_scale(width, height);
    }

    /// Set rotation in degrees; bounds are not recomputed
    pub fn set_rotation(&mut self, degrees: f32) {
        self.body.rotation = degrees;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.body.rotate(degrees);
    }

    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.body.origin = Vec2::new(x, y);
    }

    // Animation

    /// Register a clip, request its layers and make it active
    ///
    /// If the base layer is already decoded the grid is derived right away,
    /// otherwise when its [`ImageEvent::Loaded`] arrives.
    pub fn define_clip(&mut self, images: &mut ImageStore, definition: &ClipDefinition) -> ClipId {
        let layers = definition
            .layers
            .iter()
            .map(|source| images.request(source))
            .collect();
        let clip = AnimationClip::new(definition, layers);
        let base = clip.base_layer();
        let id = self.animation.push(clip);
        debug!("Sprite '{}' defined clip '{}'", self.id, definition.name);

        let decoded = base.and_then(|handle| images.dimensions(handle).map(|size| (handle, size)));
        if let Some((handle, (width, height))) = decoded {
            self.on_image_loaded(&ImageEvent::Loaded {
                handle,
                width,
                height,
            });
        }
        id
    }

    /// Single static frame from layered images, as the `"default"` clip
    pub fn source<S: AsRef<str>>(&mut self, images: &mut ImageStore, layers: &[S]) -> ClipId {
        self.define_clip(images, &ClipDefinition::still(layers))
    }

    pub fn goto_clip(&mut self, name: &str) -> bool {
        self.animation.goto(name)
    }

    pub fn set_playback_speed(&mut self, frames_per_tick: f32) {
        self.animation.set_playback_speed(frames_per_tick);
    }

    pub fn play(&mut self, frames_per_tick: f32) {
        self.animation.play(frames_per_tick);
    }

    pub fn stop(&mut self) {
        self.animation.stop();
    }

    /// Advance the active clip by one tick
    pub fn advance_frame(&mut self) -> bool {
        self.animation.advance()
    }

    pub fn rewind_to(&mut self, frame: f32) {
        self.animation.rewind_to(frame);
    }

    pub fn rewind(&mut self) {
        self.animation.rewind();
    }

    /// Use `source` as the collision mask of `clip` (the active clip if `None`)
    pub fn set_collision_mask(
        &mut self,
        images: &mut ImageStore,
        source: &str,
        clip: Option<ClipId>,
    ) -> bool {
        let handle = images.request(source);
        self.animation.set_collider(handle, clip)
    }

    /// Source rectangle of the active frame, for the renderer
    pub fn active_clip_rect(&self) -> ClipRect {
        self.animation.active_clip_rect()
    }

    /// Feed a decode completion to the clips
    ///
    /// Returns whether any clip derived its grid. When one did, bounds are
    /// refreshed, and a sprite still without a size takes the base layer's
    /// pixel size.
    pub fn on_image_loaded(&mut self, event: &ImageEvent) -> bool {
        let ImageEvent::Loaded {
            handle,
            width,
            height,
        } = *event
        else {
            debug!("Sprite '{}' ignoring {:?}", self.id, event);
            return false;
        };

        if self.animation.on_image_loaded(handle, width, height) == 0 {
            return false;
        }

        if self.body.scale == Vec2::ZERO {
            self.transform(width as f32, height as f32);
        }
        self.compute_bounds();
        true
    }

    // Geometry

    /// Recompute and cache the oriented bounds
    pub fn compute_bounds(&mut self) -> Bounds {
        self.bounds = compute_bounds(&self.body);
        self.bounds
    }

    /// Cached bounds from the last `compute_bounds`
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Cheap proximity check
    ///
    /// Only separates unrotated pairs whose rectangles are apart; touching
    /// counts as within, and any rotation is treated as possibly within.
    pub fn within(&self, other: &Sprite) -> bool {
        let (a, b) = (&self.body, &other.body);
        let unrotated = |body: &KinematicBody| approx_equal(body.rotation, 0.0, f32::EPSILON);
        if !unrotated(a) || !unrotated(b) {
            return true;
        }

        let apart_x = a.position.x > b.position.x + b.scale.x
            || b.position.x > a.position.x + a.scale.x;
        let apart_y = a.position.y > b.position.y + b.scale.y
            || b.position.y > a.position.y + a.scale.y;
        !(apart_x || apart_y)
    }

    /// Pixel collision with the default detector
    pub fn colliding<L: ImageLookup + ?Sized>(&self, other: &Sprite, images: &L) -> bool {
        CollisionDetector::default().are_colliding(self, other, images)
    }

    /// One tick: integrate, then advance the active clip
    pub fn update(&mut self) {
        self.integrate();
        self.advance_frame();
    }
}

impl Collidable for Sprite {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn collider_frame(&self) -> Option<ColliderFrame> {
        let clip = self.animation.active_clip()?;
        Some(ColliderFrame {
            image: clip.collider()?,
            rows: clip.rows(),
            columns: clip.columns(),
            cell: clip.cell_index(),
        })
    }
}
