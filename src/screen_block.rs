use std::iter::FusedIterator;
use std::num::NonZeroU32;

use itertools::Itertools as _;

use crate::geometry::{ScreenPoint, ScreenSize};

/// Rectangular block of pixels, `max` is exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenBlock {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenBlock {
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        ScreenBlock { min, max }
    }

    pub fn from_size(size: ScreenSize) -> Self {
        ScreenBlock::new(ScreenPoint::origin(), ScreenPoint::from(size))
    }

    pub fn width(&self) -> u32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> u32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Iterator over pixels inside the block, row by row.
    pub fn internal_points(&self) -> InternalPoints {
        InternalPoints {
            block: *self,
            cursor: if self.is_empty() { self.max } else { self.min },
        }
    }

    /// Splits the block into tiles of at most `tile_size` x `tile_size` pixels,
    /// ordered by distance of the tile from the center of the block (closest first).
    /// Tiles on the right and bottom edge are clipped.
    pub fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock> {
        let tile_size = tile_size.get();
        let columns = self.width().div_ceil(tile_size);
        let rows = self.height().div_ceil(tile_size);

        let center_x = self.min.x as i64 * 2 + self.width() as i64;
        let center_y = self.min.y as i64 * 2 + self.height() as i64;

        itertools::iproduct!(0..rows, 0..columns)
            .map(|(row, column)| {
                let min = ScreenPoint::new(
                    self.min.x + column * tile_size,
                    self.min.y + row * tile_size,
                );
                let max = ScreenPoint::new(
                    min.x.saturating_add(tile_size).min(self.max.x),
                    min.y.saturating_add(tile_size).min(self.max.y),
                );
                ScreenBlock::new(min, max)
            })
            .sorted_by_key(|tile| {
                // Chebyshev distance of tile center from the block center, in half pixels
                let dx = (tile.min.x as i64 + tile.max.x as i64 - center_x).abs();
                let dy = (tile.min.y as i64 + tile.max.y as i64 - center_y).abs();
                dx.max(dy)
            })
            .collect()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    block: ScreenBlock,
    cursor: ScreenPoint,
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.block.max.y {
            return None;
        }

        let ret = self.cursor;

        self.cursor.x += 1;
        if self.cursor.x >= self.block.max.x {
            self.cursor.x = self.block.min.x;
            self.cursor.y += 1;
        }

        Some(ret)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.block.max.y {
            0
        } else {
            let whole_rows = (self.block.max.y - self.cursor.y - 1) as usize;
            let current_row = (self.block.max.x - self.cursor.x) as usize;
            whole_rows * self.block.width() as usize + current_row
        }
    }
}

impl FusedIterator for InternalPoints {}
