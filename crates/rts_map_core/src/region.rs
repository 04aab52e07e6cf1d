//! Rectangular regions in grid-cell coordinates

use serde::{Deserialize, Serialize};

/// A rectangle of grid cells
///
/// Coordinates may be negative or extend past the grid while a region is being
/// grown; call [`Region::clamped`] before indexing with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A single cell
    pub const fn cell(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Grow by `n` cells on every side. Saturates at the `i32` range.
    pub const fn grown(&self, n: i32) -> Self {
        let n2 = n.saturating_mul(2);
        Self::new(
            self.x.saturating_sub(n),
            self.y.saturating_sub(n),
            self.width.saturating_add(n2),
            self.height.saturating_add(n2),
        )
    }

    /// Intersect with `[0, width) x [0, height)`.
    ///
    /// A region entirely outside the bounds collapses to a zero-sized region.
    pub fn clamped(&self, width: usize, height: usize) -> Self {
        let max_x = width.min(i32::MAX as usize) as i32;
        let max_y = height.min(i32::MAX as usize) as i32;
        let x0 = self.x.clamp(0, max_x);
        let y0 = self.y.clamp(0, max_y);
        let x1 = self.right().clamp(0, max_x);
        let y1 = self.bottom().clamp(0, max_y);
        Self::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    /// Visible tiles whose corner samples touch this corner-cell region.
    ///
    /// Tile `(tx, ty)` samples corners `tx..=tx+1` and `ty..=ty+1`, so the
    /// footprint reaches one tile up and one tile left.
    pub const fn blend_footprint(&self) -> Self {
        Self::new(
            self.x.saturating_sub(1),
            self.y.saturating_sub(1),
            self.width.saturating_add(1),
            self.height.saturating_add(1),
        )
    }

    /// Smallest region covering both. An empty side is ignored.
    pub fn union(&self, other: &Region) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Iterate all cells row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Region {
            x,
            y,
            width,
            height,
        } = *self;
        let x1 = x.saturating_add(width.max(0));
        let y1 = y.saturating_add(height.max(0));
        (y..y1).flat_map(move |cy| (x..x1).map(move |cx| (cx, cy)))
    }

    /// Number of cells covered
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }
}
