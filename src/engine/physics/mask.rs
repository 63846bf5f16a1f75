// Alpha masks sampled by the narrow phase

use crate::engine::assets::{blit_clip, ClipRect, ImageHandle, ImageLookup, SheetGrid};

/// Which image and cell a sprite currently collides with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderFrame {
    pub image: ImageHandle,
    /// Grid shape of the clip the collider belongs to
    pub rows: u32,
    pub columns: u32,
    /// Active cell, `None` when the frame index is negative
    pub cell: Option<usize>,
}

impl ColliderFrame {
    /// Cell of the collider image for this frame, using the image's own size
    pub fn clip_rect(&self, image_width: u32, image_height: u32) -> ClipRect {
        SheetGrid::from_image_size(image_width, image_height, self.rows, self.columns)
            .cell_rect(self.cell)
    }
}

/// Alpha channel of a collider, sized to the sprite's on-screen scale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl CollisionMask {
    /// A mask with no solid pixels
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Draw the collider's active cell stretched to `width` x `height` and keep its alpha
    ///
    /// A missing collider, or one that has not finished decoding, yields a
    /// transparent mask.
    pub fn materialize<L: ImageLookup + ?Sized>(
        frame: Option<ColliderFrame>,
        images: &L,
        width: u32,
        height: u32,
    ) -> Self {
        let Some(frame) = frame else {
            return Self::transparent(width, height);
        };
        let Some(source) = images.image(frame.image) else {
            return Self::transparent(width, height);
        };

        let clip = frame.clip_rect(source.width(), source.height());
        let buffer = blit_clip(source, clip, width, height);
        let pixels: &[[u8; 4]] = bytemuck::cast_slice(buffer.as_raw().as_slice());

        Self {
            width,
            height,
            alpha: pixels.iter().map(|p| p[3]).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at local pixel (x, y); anything outside the mask is transparent
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.alpha[x as usize + y as usize * self.width as usize]
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.alpha_at(x, y) != 0
    }

    /// Number of pixels with nonzero alpha
    pub fn solid_count(&self) -> usize {
        self.alpha.iter().filter(|&&a| a != 0).count()
    }
}
