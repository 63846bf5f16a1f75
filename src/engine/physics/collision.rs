use super::bounds::orientation_extents;
use super::mask::{ColliderFrame, CollisionMask};
use super::KinematicBody;
use crate::core::math::{ceil_div, round_half_up};
use crate::engine::assets::ImageLookup;
use crate::engine::config::{BroadPhaseExtents, CollisionConfig};
use log::debug;

/// Anything that can take part in a pixel-perfect collision test
pub trait Collidable {
    /// Geometric state: position, rotation and scale
    fn body(&self) -> &KinematicBody;

    /// Collider image and cell for the active animation frame, if any
    fn collider_frame(&self) -> Option<ColliderFrame>;
}

/// Intersection of two integer rectangles, half-open on the max side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Overlap {
    /// Intersect `[x, x + w) x [y, y + h)` rectangles; `None` when they do not overlap
    pub fn between(a: (i32, i32, i32, i32), b: (i32, i32, i32, i32)) -> Option<Self> {
        let (x, y, w, h) = a;
        let (x2, y2, w2, h2) = b;
        let overlap = Self {
            x_min: x.max(x2),
            y_min: y.max(y2),
            x_max: x.saturating_add(w).min(x2.saturating_add(w2)),
            y_max: y.saturating_add(h).min(y2.saturating_add(h2)),
        };

        if overlap.x_min >= overlap.x_max || overlap.y_min >= overlap.y_max {
            None
        } else {
            Some(overlap)
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> i32 {
        self.y_max.saturating_sub(self.y_min)
    }
}

/// How the narrow phase walked the overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPath {
    Exhaustive,
    Sampled { inc_x: i32, inc_y: i32 },
}

/// Broad + narrow phase pixel collision between sprite pairs
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    config: CollisionConfig,
}

impl CollisionDetector {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Whether any pixel is solid in both sprites' active masks
    ///
    /// Masks are only materialized when the broad phase finds an overlap.
    pub fn are_colliding<A, B, L>(&self, a: &A, b: &B, images: &L) -> bool
    where
        A: Collidable + ?Sized,
        B: Collidable + ?Sized,
        L: ImageLookup + ?Sized,
    {
        let (body_a, body_b) = (a.body(), b.body());
        let (x, y) = body_a.pixel_position();
        let (x2, y2) = body_b.pixel_position();

        let (w, h) = self.broad_extents(body_a);
        let (w2, h2) = self.broad_extents(body_b);

        let Some(overlap) = Overlap::between((x, y, w, h), (x2, y2, w2, h2)) else {
            debug!("Broad phase rejected pair at ({}, {}) / ({}, {})", x, y, x2, y2);
            return false;
        };

        let (mw, mh) = body_a.pixel_size();
        let (mw2, mh2) = body_b.pixel_size();
        let mask_a = CollisionMask::materialize(
            a.collider_frame(),
            images,
            mw.max(0) as u32,
            mh.max(0) as u32,
        );
        let mask_b = CollisionMask::materialize(
            b.collider_frame(),
            images,
            mw2.max(0) as u32,
            mh2.max(0) as u32,
        );

        let path = self.scan_path(&overlap);
        debug!("Narrow phase {:?} over {:?}", path, overlap);

        scan_overlap(&overlap, path, |px, py| {
            mask_a.is_solid(px.saturating_sub(x), py.saturating_sub(y))
                && mask_b.is_solid(px.saturating_sub(x2), py.saturating_sub(y2))
        })
    }

    /// Pick exhaustive scanning for small overlaps, strided sampling otherwise
    pub fn scan_path(&self, overlap: &Overlap) -> ScanPath {
        let (diff_x, diff_y) = (overlap.width(), overlap.height());
        let threshold = self.config.exhaustive_threshold;

        if diff_x < threshold && diff_y < threshold {
            ScanPath::Exhaustive
        } else {
            let divisor = self.config.sampling_divisor.max(1);
            ScanPath::Sampled {
                inc_x: ceil_div(diff_x, divisor).max(1),
                inc_y: ceil_div(diff_y, divisor).max(1),
            }
        }
    }

    fn broad_extents(&self, body: &KinematicBody) -> (i32, i32) {
        match self.config.broad_phase {
            BroadPhaseExtents::Unrotated => body.pixel_size(),
            BroadPhaseExtents::Oriented => {
                let extents = orientation_extents(body.scale, body.rotation);
                (round_half_up(extents.x), round_half_up(extents.y))
            }
        }
    }
}

/// Call `hit` on pixels of `overlap` until it returns true
///
/// The sampled path strides by `(inc_x, inc_y)` from every phase offset in
/// `[0, inc_x) x [0, inc_y)`, so each pixel is still visited exactly once,
/// just not in raster order.
pub fn scan_overlap<F>(overlap: &Overlap, path: ScanPath, mut hit: F) -> bool
where
    F: FnMut(i32, i32) -> bool,
{
    match path {
        ScanPath::Exhaustive => {
            for px in overlap.x_min..overlap.x_max {
                for py in overlap.y_min..overlap.y_max {
                    if hit(px, py) {
                        return true;
                    }
                }
            }
        }
        ScanPath::Sampled { inc_x, inc_y } => {
            for offset_y in 0..inc_y {
                for offset_x in 0..inc_x {
                    let rows = (overlap.y_min + offset_y..overlap.y_max).step_by(inc_y as usize);
                    for py in rows {
                        let cols =
                            (overlap.x_min + offset_x..overlap.x_max).step_by(inc_x as usize);
                        for px in cols {
                            if hit(px, py) {
                                return true;
                            }
                        }
                    }
                }
            }
        }
    }
    false
}

/// Pixel collision test with the default configuration
pub fn are_colliding<A, B, L>(a: &A, b: &B, images: &L) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
    L: ImageLookup + ?Sized,
{
    CollisionDetector::default().are_colliding(a, b, images)
}
