//! Binary morphology over boolean tile masks.
//!
//! Erosion treats tiles outside the raster as set and dilation treats them as
//! unset, so neither operation invents or removes foreground at the raster
//! edge by itself. A fully set mask survives any opening unchanged.

use crate::error::RegionError;
use crate::tile_map::{TileMap, TileXY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelShape {
    Rect,
    Ellipse,
    Cross,
}

/// A structuring element anchored at its centre tile `(width / 2, height / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuringElement {
    shape: KernelShape,
    width: usize,
    height: usize,
}

impl StructuringElement {
    pub const fn new(shape: KernelShape, width: usize, height: usize) -> Self {
        Self { shape, width, height }
    }

    pub const fn rect(width: usize, height: usize) -> Self {
        Self::new(KernelShape::Rect, width, height)
    }

    /// The ellipse inscribed in the `width` x `height` box. Usually less pretty
    /// than a rectangle on axis-aligned walls, but more robust on skewed ones.
    pub const fn ellipse(width: usize, height: usize) -> Self {
        Self::new(KernelShape::Ellipse, width, height)
    }

    pub const fn cross(width: usize, height: usize) -> Self {
        Self::new(KernelShape::Cross, width, height)
    }

    /// The 3x3 square, i.e. the full 8-neighborhood.
    pub const fn square3() -> Self {
        Self::rect(3, 3)
    }

    pub fn shape(&self) -> KernelShape {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Offsets of the set tiles relative to the anchor, as `(dx, dy)`.
    pub fn offsets(&self) -> Result<Vec<(isize, isize)>, RegionError> {
        self.validate()?;

        let anchor_x = (self.width / 2) as isize;
        let anchor_y = (self.height / 2) as isize;
        let mut offsets = Vec::with_capacity(self.width * self.height);

        for row in 0..self.height {
            let (start, end) = self.row_span(row);
            for col in start..end {
                offsets.push((col as isize - anchor_x, row as isize - anchor_y));
            }
        }

        Ok(offsets)
    }

    fn validate(&self) -> Result<(), RegionError> {
        if self.width == 0 || self.height == 0 {
            return Err(RegionError::InvalidStructuringElement {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Half-open column span of the set tiles on `row`.
    fn row_span(&self, row: usize) -> (usize, usize) {
        match self.shape {
            KernelShape::Rect => (0, self.width),
            KernelShape::Cross => {
                if row == self.height / 2 {
                    (0, self.width)
                } else {
                    let c = self.width / 2;
                    (c, c + 1)
                }
            }
            KernelShape::Ellipse => {
                let r = (self.height / 2) as f64;
                let c = (self.width / 2) as f64;
                let dy = row as f64 - r;
                if dy.abs() > r {
                    return (0, 0);
                }
                let dx = if r > 0.0 {
                    (c * ((r * r - dy * dy) / (r * r)).sqrt()).round()
                } else {
                    c
                };
                let start = (c - dx).max(0.0) as usize;
                let end = ((c + dx + 1.0) as usize).min(self.width);
                (start, end)
            }
        }
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::square3()
    }
}

pub fn erode(
    mask: &TileMap<bool>,
    element: &StructuringElement,
    iterations: usize,
) -> Result<TileMap<bool>, RegionError> {
    morph(mask, element, iterations, Op::Erode)
}

pub fn dilate(
    mask: &TileMap<bool>,
    element: &StructuringElement,
    iterations: usize,
) -> Result<TileMap<bool>, RegionError> {
    morph(mask, element, iterations, Op::Dilate)
}

/// Erodes `iterations` times, then dilates `iterations` times with the same element.
pub fn open(
    mask: &TileMap<bool>,
    element: &StructuringElement,
    iterations: usize,
) -> Result<TileMap<bool>, RegionError> {
    let eroded = erode(mask, element, iterations)?;
    dilate(&eroded, element, iterations)
}

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Column,
}

fn morph(
    mask: &TileMap<bool>,
    element: &StructuringElement,
    iterations: usize,
    op: Op,
) -> Result<TileMap<bool>, RegionError> {
    if element.shape() == KernelShape::Rect {
        element.validate()?;
        let (width, height) = (element.width(), element.height());
        return Ok(repeat(mask, iterations, |src| apply_rect(src, width, height, op)));
    }

    let offsets = element.offsets()?;
    Ok(repeat(mask, iterations, |src| apply(src, &offsets, op)))
}

fn repeat<F>(mask: &TileMap<bool>, iterations: usize, mut step: F) -> TileMap<bool>
where
    F: FnMut(&TileMap<bool>) -> TileMap<bool>,
{
    let mut current = mask.clone();
    for _ in 0..iterations {
        current = step(&current);
    }
    current
}

fn apply(src: &TileMap<bool>, offsets: &[(isize, isize)], op: Op) -> TileMap<bool> {
    let mut out = TileMap::filled_like(src, false);

    for (idx, xy) in (0..src.len()).map(|idx| (idx, src.xy_of(idx))) {
        let mut samples = offsets.iter().map(|&(dx, dy)| shifted(src, xy, dx, dy));
        out[idx] = match op {
            // out-of-bounds tiles never break an erosion
            Op::Erode => samples.all(|v| v.unwrap_or(true)),
            Op::Dilate => samples.any(|v| v.unwrap_or(false)),
        };
    }

    out
}

/// A rectangle is a row segment followed by a column segment, so it runs as
/// two 1-D sweeps instead of visiting every kernel tile.
fn apply_rect(src: &TileMap<bool>, width: usize, height: usize, op: Op) -> TileMap<bool> {
    let rows = sweep(src, width, Axis::Row, op);
    sweep(&rows, height, Axis::Column, op)
}

/// Applies a 1-D segment of `len` tiles anchored at `len / 2` along `axis`.
/// Out-of-bounds tiles are the identity of both ops, so the segment is just
/// clipped to the raster.
fn sweep(src: &TileMap<bool>, len: usize, axis: Axis, op: Op) -> TileMap<bool> {
    let before = len / 2;
    let after = len - 1 - before;
    let mut out = TileMap::filled_like(src, false);

    for idx in 0..src.len() {
        let xy = src.xy_of(idx);
        let (pos, limit) = match axis {
            Axis::Row => (xy.x, src.width()),
            Axis::Column => (xy.y, src.height()),
        };
        let start = pos.saturating_sub(before);
        let end = (pos + after).min(limit - 1);

        let mut samples = (start..=end).map(|p| match axis {
            Axis::Row => src[TileXY::new(p, xy.y)],
            Axis::Column => src[TileXY::new(xy.x, p)],
        });
        out[idx] = match op {
            Op::Erode => samples.all(|v| v),
            Op::Dilate => samples.any(|v| v),
        };
    }

    out
}

#[inline]
fn shifted(src: &TileMap<bool>, xy: TileXY, dx: isize, dy: isize) -> Option<bool> {
    let x = xy.x.checked_add_signed(dx)?;
    let y = xy.y.checked_add_signed(dy)?;
    src.get(TileXY::new(x, y)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(text: &str) -> TileMap<bool> {
        TileMap::from_ascii(text).unwrap()
    }

    #[test]
    fn open_removes_single_pixel_speck() {
        let m = mask(
            "#####
             #####
             ##.##
             #####
             #####",
        );
        let out = open(&m, &StructuringElement::square3(), 1).unwrap();
        assert_eq!(out.count_set(), 0);
    }

    #[test]
    fn full_mask_survives_any_opening() {
        let m = TileMap::new(5, 5, true).unwrap();
        for element in [
            StructuringElement::rect(7, 9),
            StructuringElement::ellipse(5, 5),
            StructuringElement::cross(3, 3),
        ] {
            assert_eq!(open(&m, &element, 3).unwrap(), m);
        }
    }

    #[test]
    fn open_strips_thin_bridge_between_blocks() {
        let m = mask(
            "#########
             #...#...#
             #.......#
             #...#...#
             #########",
        );
        let out = open(&m, &StructuringElement::square3(), 1).unwrap();
        let expected = mask(
            "#########
             #...#...#
             #...#...#
             #...#...#
             #########",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn kernel_shapes() {
        assert_eq!(StructuringElement::rect(3, 2).offsets().unwrap().len(), 6);

        let cross = StructuringElement::cross(3, 3).offsets().unwrap();
        assert_eq!(cross, vec![(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)]);

        let ellipse = StructuringElement::ellipse(5, 5).offsets().unwrap();
        assert!(ellipse.contains(&(0, -2)));
        assert!(ellipse.contains(&(2, 0)));
        assert!(!ellipse.contains(&(-2, -2)));
    }

    #[test]
    fn empty_kernel_is_rejected() {
        let m = TileMap::new(2, 2, true).unwrap();
        assert_eq!(
            open(&m, &StructuringElement::rect(0, 3), 1).unwrap_err(),
            RegionError::InvalidStructuringElement { width: 0, height: 3 }
        );
    }

    #[test]
    fn zero_iterations_is_identity() {
        let m = mask(".#.\n...");
        assert_eq!(open(&m, &StructuringElement::rect(7, 9), 0).unwrap(), m);
    }

    #[test]
    fn rect_sweeps_match_the_general_kernel() {
        let m = mask(
            "..#.....#
             ....#....
             #........
             ...##..#.
             .........
             .#.......",
        );

        for width in 1..=5 {
            for height in 1..=5 {
                let element = StructuringElement::rect(width, height);
                let offsets = element.offsets().unwrap();
                for op in [Op::Erode, Op::Dilate] {
                    assert_eq!(
                        apply_rect(&m, width, height, op),
                        apply(&m, &offsets, op),
                        "{width}x{height} rect"
                    );
                }
            }
        }
    }
}
