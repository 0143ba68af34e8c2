// Original under MIT license from: https://github.com/einargs/rust-screeps-code/blob/main/src/rooms/tile_slice.rs

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::RegionError;

/// A tile position in a raster: `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileXY {
    pub x: usize,
    pub y: usize,
}

impl TileXY {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for TileXY {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileXY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The 8 compass directions around a tile. `Top` is towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
    ];

    pub const TAXICAB: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row delta of a single step in this direction.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Top => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, -1),
        }
    }
}

/// A row-major raster of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> TileMap<T>
where
    T: Clone,
{
    pub fn new(width: usize, height: usize, default: T) -> Result<TileMap<T>, RegionError> {
        let len = area(width, height, 0)?;
        Ok(TileMap {
            width,
            height,
            data: vec![default; len],
        })
    }

    /// A map with the same dimensions as `other`, filled with `default`.
    pub fn filled_like<U>(other: &TileMap<U>, default: T) -> TileMap<T> {
        TileMap {
            width: other.width,
            height: other.height,
            data: vec![default; other.data.len()],
        }
    }
}

impl<T> TileMap<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<TileMap<T>, RegionError> {
        let expected = area(width, height, data.len())?;
        if data.len() != expected {
            return Err(RegionError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(TileMap { width, height, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn in_bounds(&self, xy: TileXY) -> bool {
        xy.x < self.width && xy.y < self.height
    }

    #[inline]
    pub fn index_of(&self, xy: TileXY) -> usize {
        xy.y * self.width + xy.x
    }

    #[inline]
    pub fn xy_of(&self, idx: usize) -> TileXY {
        TileXY::new(idx % self.width, idx / self.width)
    }

    pub fn get(&self, xy: TileXY) -> Option<&T> {
        if self.in_bounds(xy) {
            Some(&self.data[self.index_of(xy)])
        } else {
            None
        }
    }

    /// Steps once from `xy` in `dir`, or `None` if that leaves the raster.
    #[inline]
    pub fn checked_add_direction(&self, xy: TileXY, dir: Direction) -> Option<TileXY> {
        let (dx, dy) = dir.offset();
        let x = xy.x.checked_add_signed(dx)?;
        let y = xy.y.checked_add_signed(dy)?;
        let next = TileXY::new(x, y);
        self.in_bounds(next).then_some(next)
    }

    /// The in-bounds tiles of the 8-neighborhood of `xy`.
    #[inline]
    pub fn neighbors(&self, xy: TileXY) -> impl Iterator<Item = TileXY> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.checked_add_direction(xy, dir))
    }

    /// The in-bounds tiles of the 4-neighborhood of `xy`.
    #[inline]
    pub fn taxicab_neighbors(&self, xy: TileXY) -> impl Iterator<Item = TileXY> + '_ {
        Direction::TAXICAB
            .into_iter()
            .filter_map(move |dir| self.checked_add_direction(xy, dir))
    }

    /// Iterates every tile in row-major order along with its value.
    pub fn iter_xy(&self) -> impl Iterator<Item = (TileXY, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(idx, val)| (self.xy_of(idx), val))
    }


    pub fn ensure_same_dims<U>(&self, other: &TileMap<U>) -> Result<(), RegionError> {
        if self.width == other.width && self.height == other.height {
            Ok(())
        } else {
            Err(RegionError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            })
        }
    }
}

impl TileMap<bool> {
    /// Thresholds a grayscale buffer: every non-zero sample is traversable.
    pub fn from_luma(width: usize, height: usize, luma: &[u8]) -> Result<TileMap<bool>, RegionError> {
        TileMap::from_vec(width, height, luma.iter().map(|v| *v > 0).collect())
    }

    /// Parses a mask drawn with `.` for traversable tiles and `#` for walls.
    /// Blank lines are skipped and every row must have the same width.
    pub fn from_ascii(text: &str) -> Result<TileMap<bool>, RegionError> {
        let mut data = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut row_width = 0;
            for (column, ch) in line.chars().enumerate() {
                let open = match ch {
                    '.' => true,
                    '#' => false,
                    _ => {
                        return Err(RegionError::InvalidMaskChar {
                            ch,
                            line: line_idx + 1,
                            column: column + 1,
                        })
                    }
                };
                data.push(open);
                row_width += 1;
            }

            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(RegionError::SizeMismatch {
                        expected: w * (height + 1),
                        actual: data.len(),
                    })
                }
                Some(_) => (),
            }
            height += 1;
        }

        TileMap::from_vec(width.unwrap_or(0), height, data)
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }
}

impl fmt::Display for TileMap<bool> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.width.max(1)) {
            for open in row {
                write!(f, "{}", if *open { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T> Index<usize> for TileMap<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for TileMap<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T> Index<TileXY> for TileMap<T> {
    type Output = T;
    fn index(&self, index: TileXY) -> &T {
        &self.data[self.index_of(index)]
    }
}

impl<T> IndexMut<TileXY> for TileMap<T> {
    fn index_mut(&mut self, index: TileXY) -> &mut T {
        let idx = self.index_of(index);
        &mut self.data[idx]
    }
}

fn area(width: usize, height: usize, actual: usize) -> Result<usize, RegionError> {
    width
        .checked_mul(height)
        .ok_or(RegionError::SizeMismatch {
            expected: usize::MAX,
            actual,
        })
}
