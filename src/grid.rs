//! Tile grid - coordinates, sides and the tile existence collaborator

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tile position in the grid. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `None` when the result leaves the `i32` coordinate range
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The grid-adjacent position across `side`, if it is representable.
    /// A position past the coordinate range behaves like a missing tile.
    pub fn step(self, side: Side) -> Option<Self> {
        let (dx, dy) = side.offset();
        self.offset(dx, dy)
    }

    /// Manhattan distance between two positions
    pub fn distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four edges of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::Top => (0, 1),
            Side::Bottom => (0, -1),
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Side of `from` that faces `to`, if the two tiles are grid-adjacent
    pub fn between(from: TileCoord, to: TileCoord) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| from.step(*side) == Some(to))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        };
        f.write_str(name)
    }
}

/// Read-only view of the host tile grid.
///
/// The pasture engine never mutates tiles; the host owns existence and
/// structures and tells the farm when a structure changes.
pub trait TileMap {
    fn has_tile(&self, coord: TileCoord) -> bool;

    /// Whether the tile carries a structure that multiplies pasture capacity
    fn has_boost_structure(&self, coord: TileCoord) -> bool;

    /// Every existing tile, in ascending coordinate order
    fn tiles(&self) -> Vec<TileCoord>;
}

/// Sparse set-backed tile grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: BTreeSet<TileCoord>,
    structures: BTreeSet<TileCoord>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full `width` x `height` block anchored at the origin. Dimensions
    /// beyond the positive `i32` range are clamped to it.
    pub fn rectangle(width: u32, height: u32) -> Self {
        let mut grid = Self::new();
        for y in 0..clamp_extent(height) {
            for x in 0..clamp_extent(width) {
                grid.tiles.insert(TileCoord::new(x, y));
            }
        }
        grid
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = TileCoord>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
            structures: BTreeSet::new(),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn insert_tile(&mut self, coord: TileCoord) -> bool {
        self.tiles.insert(coord)
    }

    /// Removes the tile together with any structure on it
    pub fn remove_tile(&mut self, coord: TileCoord) -> bool {
        self.structures.remove(&coord);
        self.tiles.remove(&coord)
    }

    /// Returns false when the tile is missing or already has a structure
    pub fn insert_structure(&mut self, coord: TileCoord) -> bool {
        self.tiles.contains(&coord) && self.structures.insert(coord)
    }

    pub fn remove_structure(&mut self, coord: TileCoord) -> bool {
        self.structures.remove(&coord)
    }

    pub fn structures(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.structures.iter().copied()
    }
}

fn clamp_extent(len: u32) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl TileMap for TileGrid {
    fn has_tile(&self, coord: TileCoord) -> bool {
        self.tiles.contains(&coord)
    }

    fn has_boost_structure(&self, coord: TileCoord) -> bool {
        self.structures.contains(&coord)
    }

    fn tiles(&self) -> Vec<TileCoord> {
        self.tiles.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_grid() {
        let grid = TileGrid::rectangle(10, 5);

        assert_eq!(grid.tile_count(), 50);
        assert!(grid.has_tile(TileCoord::new(9, 4)));
        assert!(!grid.has_tile(TileCoord::new(10, 4)));
        assert!(!grid.has_tile(TileCoord::new(-1, 0)));
    }

    #[test]
    fn test_side_between() {
        let origin = TileCoord::new(3, 3);

        assert_eq!(Side::between(origin, TileCoord::new(4, 3)), Some(Side::Right));
        assert_eq!(Side::between(origin, TileCoord::new(3, 4)), Some(Side::Top));
        assert_eq!(Side::between(origin, TileCoord::new(4, 4)), None);
        assert_eq!(Side::between(origin, origin), None);
    }

    #[test]
    fn test_opposite_round_trips() {
        let origin = TileCoord::new(0, 0);
        for side in Side::ALL {
            let there = origin.step(side).unwrap();
            assert_eq!(there.step(side.opposite()), Some(origin));
        }
    }

    #[test]
    fn test_steps_past_coordinate_range_are_none() {
        let east_edge = TileCoord::new(i32::MAX, 0);
        let south_west = TileCoord::new(i32::MIN, i32::MIN);

        assert_eq!(east_edge.step(Side::Right), None);
        assert_eq!(east_edge.step(Side::Left), Some(TileCoord::new(i32::MAX - 1, 0)));
        assert_eq!(south_west.step(Side::Left), None);
        assert_eq!(south_west.step(Side::Bottom), None);
        assert_eq!(south_west.offset(1, 1), Some(TileCoord::new(i32::MIN + 1, i32::MIN + 1)));
        // no wrap-around adjacency between the two ends of the axis
        assert_eq!(Side::between(east_edge, TileCoord::new(i32::MIN, 0)), None);
    }

    #[test]
    fn test_oversized_extent_is_clamped() {
        assert_eq!(clamp_extent(7), 7);
        assert_eq!(clamp_extent(u32::MAX), i32::MAX);
        assert_eq!(clamp_extent(i32::MAX as u32 + 1), i32::MAX);
    }

    #[test]
    fn test_structures_need_a_tile() {
        let mut grid = TileGrid::rectangle(2, 2);

        assert!(grid.insert_structure(TileCoord::new(1, 1)));
        assert!(!grid.insert_structure(TileCoord::new(1, 1)));
        assert!(!grid.insert_structure(TileCoord::new(5, 5)));

        grid.remove_tile(TileCoord::new(1, 1));
        assert!(!grid.has_boost_structure(TileCoord::new(1, 1)));
    }

    #[test]
    fn test_distance() {
        let a = TileCoord::new(0, 0);
        let b = TileCoord::new(3, -4);

        assert_eq!(a.distance(b), 7);
    }
}
