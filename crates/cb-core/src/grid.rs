//! Grid geometry: cells, the eight step directions, and distance helpers.
//!
//! The world is a set of square regions, each `REGION_SIZE` cells wide.  A
//! [`GridCell`] names one tile by `(region, x, y)`.  Movement is one step per
//! tick in any of the eight compass directions, so the natural distance is
//! Chebyshev distance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RegionId;

/// Width and height of every region, in cells.
pub const REGION_SIZE: u8 = 50;

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the eight single-step directions.  `y` grows downwards.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
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
    /// All directions in clockwise order starting at `Top`.
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

    /// `(dx, dy)` offset of one step in this direction.
    #[inline]
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Top         => (0, -1),
            Direction::TopRight    => (1, -1),
            Direction::Right       => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom      => (0, 1),
            Direction::BottomLeft  => (-1, 1),
            Direction::Left        => (-1, 0),
            Direction::TopLeft     => (-1, -1),
        }
    }

    /// The direction pointing back the way this one came.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Top         => Direction::Bottom,
            Direction::TopRight    => Direction::BottomLeft,
            Direction::Right       => Direction::Left,
            Direction::BottomRight => Direction::TopLeft,
            Direction::Bottom      => Direction::Top,
            Direction::BottomLeft  => Direction::TopRight,
            Direction::Left        => Direction::Right,
            Direction::TopLeft     => Direction::BottomRight,
        }
    }

    /// The direction whose offset is `(dx, dy)`, if it is a single step.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| {
                let (ox, oy) = d.offset();
                ox as i32 == dx && oy as i32 == dy
            })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── GridCell ──────────────────────────────────────────────────────────────────

/// One tile of the world grid.
///
/// Passability is not stored here; it belongs to the terrain collaborator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct GridCell {
    pub region: RegionId,
    pub x:      u8,
    pub y:      u8,
}

impl GridCell {
    #[inline]
    pub fn new(region: RegionId, x: u8, y: u8) -> Self {
        Self { region, x, y }
    }

    /// `true` if `(x, y)` lies inside the region bounds.
    #[inline]
    pub fn in_bounds(self) -> bool {
        self.x < REGION_SIZE && self.y < REGION_SIZE
    }

    /// The neighbouring cell one step in `dir`, or `None` at a region edge.
    pub fn step(self, dir: Direction) -> Option<GridCell> {
        let (dx, dy) = dir.offset();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        let size = REGION_SIZE as i16;
        if !(0..size).contains(&x) || !(0..size).contains(&y) {
            return None;
        }
        Some(GridCell { region: self.region, x: x as u8, y: y as u8 })
    }

    /// All in-bounds neighbours, paired with the direction that reaches them.
    pub fn neighbours(self) -> impl Iterator<Item = (Direction, GridCell)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.step(d).map(|c| (d, c)))
    }

    /// Chebyshev distance in steps.  `None` across regions.
    pub fn distance(self, other: GridCell) -> Option<u32> {
        if self.region != other.region {
            return None;
        }
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        Some(dx.max(dy))
    }

    /// `true` if `other` is exactly one step away.
    #[inline]
    pub fn is_adjacent(self, other: GridCell) -> bool {
        self.distance(other) == Some(1)
    }

    /// The direction of a single step from `self` to an adjacent `other`.
    pub fn direction_to(self, other: GridCell) -> Option<Direction> {
        if !self.is_adjacent(other) {
            return None;
        }
        Direction::from_offset(
            other.x as i32 - self.x as i32,
            other.y as i32 - self.y as i32,
        )
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {},{}]", self.region.0, self.x, self.y)
    }
}
