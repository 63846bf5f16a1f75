// Sprite sheet grids and clip rectangles

use glam::UVec2;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// A rectangular region of a source image, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Uniform grid laid over a sprite sheet
///
/// Cells are enumerated row-major: cell `i` sits at column `i % columns`,
/// row `i / columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGrid {
    rows: u32,
    columns: u32,
    cell_width: u32,
    cell_height: u32,
    clip_points: Vec<UVec2>,
}

impl SheetGrid {
    /// Derive the grid from a sheet's pixel size
    ///
    /// Zero rows or columns are treated as one.
    pub fn from_image_size(width: u32, height: u32, rows: u32, columns: u32) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        let cell_width = width / columns;
        let cell_height = height / rows;

        let mut clip_points = Vec::with_capacity((rows * columns) as usize);
        for r in 0..rows {
            for c in 0..columns {
                clip_points.push(UVec2::new(c * cell_width, r * cell_height));
            }
        }

        Self {
            rows,
            columns,
            cell_width,
            cell_height,
            clip_points,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn cell_size(&self) -> UVec2 {
        UVec2::new(self.cell_width, self.cell_height)
    }

    /// Top-left pixel of every cell, row-major
    pub fn clip_points(&self) -> &[UVec2] {
        &self.clip_points
    }

    /// Region of cell `index`; indices past the table fall back to the origin
    pub fn cell_rect(&self, index: Option<usize>) -> ClipRect {
        let point = index
            .and_then(|i| self.clip_points.get(i))
            .copied()
            .unwrap_or(UVec2::ZERO);
        ClipRect::new(point.x, point.y, self.cell_width, self.cell_height)
    }
}

/// Draw the `clip` region of `source` stretched into a `width` x `height` buffer
///
/// Parts of `clip` outside `source` are dropped. Nearest-neighbour sampling
/// keeps alpha values binary for masks built from binary sheets.
pub fn blit_clip(source: &RgbaImage, clip: ClipRect, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let region = imageops::crop_imm(source, clip.x, clip.y, clip.width, clip.height).to_image();
    if region.width() == 0 || region.height() == 0 {
        return RgbaImage::new(width, height);
    }

    if region.dimensions() == (width, height) {
        return region;
    }

    imageops::resize(&region, width, height, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_grid_cells_row_major() {
        let grid = SheetGrid::from_image_size(64, 32, 2, 4);

        assert_eq!(grid.cell_size(), UVec2::new(16, 16));
        assert_eq!(grid.clip_points().len(), 8);
        assert_eq!(grid.clip_points()[1], UVec2::new(16, 0));
        assert_eq!(grid.clip_points()[4], UVec2::new(0, 16));
        assert_eq!(grid.clip_points()[7], UVec2::new(48, 16));
    }

    #[test]
    fn test_grid_zero_shape_is_single_cell() {
        let grid = SheetGrid::from_image_size(10, 6, 0, 0);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.cell_rect(Some(0)), ClipRect::new(0, 0, 10, 6));
    }

    #[test]
    fn test_cell_rect_fallback() {
        let grid = SheetGrid::from_image_size(20, 10, 1, 2);
        assert_eq!(grid.cell_rect(Some(1)), ClipRect::new(10, 0, 10, 10));
        assert_eq!(grid.cell_rect(Some(9)), ClipRect::new(0, 0, 10, 10));
        assert_eq!(grid.cell_rect(None), ClipRect::new(0, 0, 10, 10));
    }

    #[test]
    fn test_blit_selects_cell() {
        // Left half opaque red, right half transparent
        let mut sheet = RgbaImage::new(4, 2);
        for y in 0..2 {
            for x in 0..2 {
                sheet.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }

        let left = blit_clip(&sheet, ClipRect::new(0, 0, 2, 2), 2, 2);
        let right = blit_clip(&sheet, ClipRect::new(2, 0, 2, 2), 2, 2);

        assert!(left.pixels().all(|p| p[3] == 255));
        assert!(right.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_blit_scales_to_destination() {
        let mut sheet = RgbaImage::new(2, 2);
        sheet.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

        let scaled = blit_clip(&sheet, ClipRect::new(0, 0, 2, 2), 8, 8);
        assert_eq!(scaled.dimensions(), (8, 8));
        assert_eq!(scaled.get_pixel(0, 0)[3], 255);
        assert_eq!(scaled.get_pixel(7, 7)[3], 0);
    }

    #[test]
    fn test_blit_empty_clip_is_transparent() {
        let sheet = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let out = blit_clip(&sheet, ClipRect::default(), 3, 3);

        assert_eq!(out.dimensions(), (3, 3));
        assert!(out.pixels().all(|p| p[3] == 0));
    }
}
