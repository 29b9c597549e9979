//! Fence storage with canonical edge keys.
//!
//! A physical edge between two tiles can be described four ways: from either
//! tile, and by the side facing the other. Every description is folded into a
//! single [`FenceKey`] before it touches the store, so `(T, Right)` and
//! `(T + (1, 0), Left)` always name the same fence.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FarmError, FarmResult};
use crate::grid::{Side, TileCoord, TileMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceOrientation {
    Horizontal,
    Vertical,
}

/// Canonical fence position.
///
/// Horizontal fences are keyed by the tile directly above the edge, vertical
/// fences by the tile directly to its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FenceKey {
    pub position: TileCoord,
    pub orientation: FenceOrientation,
}

impl FenceKey {
    /// `None` when the tile across `side` lies outside the coordinate range,
    /// so no edge exists there
    pub fn from_side(tile: TileCoord, side: Side) -> Option<Self> {
        let neighbor = tile.step(side)?;
        let (position, orientation) = match side {
            Side::Top => (neighbor, FenceOrientation::Horizontal),
            Side::Bottom => (tile, FenceOrientation::Horizontal),
            Side::Right => (neighbor, FenceOrientation::Vertical),
            Side::Left => (tile, FenceOrientation::Vertical),
        };
        Some(Self {
            position,
            orientation,
        })
    }

    /// Key of the edge between two grid-adjacent tiles
    pub fn between(a: TileCoord, b: TileCoord) -> Option<Self> {
        Side::between(a, b).and_then(|side| Self::from_side(a, side))
    }

    /// The two tiles this edge separates: (below, above) or (left, right).
    /// `None` for a hand-built key on the low end of the coordinate range.
    pub fn adjacent_tiles(&self) -> Option<(TileCoord, TileCoord)> {
        let below_or_left = match self.orientation {
            FenceOrientation::Horizontal => self.position.step(Side::Bottom)?,
            FenceOrientation::Vertical => self.position.step(Side::Left)?,
        };
        Some((below_or_left, self.position))
    }
}

impl fmt::Display for FenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let orientation = match self.orientation {
            FenceOrientation::Horizontal => "h",
            FenceOrientation::Vertical => "v",
        };
        write!(f, "{}{}", orientation, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FenceId(u64);

impl FenceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fence {
    pub id: FenceId,
    pub key: FenceKey,
    /// Inactive fences keep their slot but do not block movement
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FenceStore {
    next_id: u64,
    fences: BTreeMap<FenceKey, Fence>,
}

impl FenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: TileMap + ?Sized>(
        &mut self,
        tiles: &M,
        tile: TileCoord,
        side: Side,
    ) -> FarmResult<&Fence> {
        let key = edge_key(tile, side)?;
        if self.fences.contains_key(&key) {
            return Err(FarmError::DuplicateFence(key));
        }
        let (a, b) = key
            .adjacent_tiles()
            .ok_or(FarmError::EdgeOutOfRange { tile, side })?;
        if let Some(missing) = [a, b].into_iter().find(|coord| !tiles.has_tile(*coord)) {
            return Err(FarmError::MissingAdjacency { key, missing });
        }

        let id = FenceId(self.next_id);
        self.next_id += 1;
        let fence = self.fences.entry(key).or_insert(Fence {
            id,
            key,
            active: true,
        });
        Ok(fence)
    }

    pub fn remove(&mut self, tile: TileCoord, side: Side) -> FarmResult<Fence> {
        let key = edge_key(tile, side)?;
        self.fences
            .remove(&key)
            .ok_or(FarmError::UnknownFence(key))
    }

    /// Returns whether the flag changed
    pub fn set_active(&mut self, tile: TileCoord, side: Side, active: bool) -> FarmResult<bool> {
        let key = edge_key(tile, side)?;
        let fence = self
            .fences
            .get_mut(&key)
            .ok_or(FarmError::UnknownFence(key))?;
        let changed = fence.active != active;
        fence.active = active;
        Ok(changed)
    }

    pub fn has_fence(&self, tile: TileCoord, side: Side) -> bool {
        self.get(tile, side).is_some()
    }

    /// False for tiles that are not grid-adjacent
    pub fn has_fence_between(&self, a: TileCoord, b: TileCoord) -> bool {
        match Side::between(a, b) {
            Some(side) => self.has_fence(a, side),
            None => false,
        }
    }

    /// Whether an active fence stops movement from `a` to the adjacent `b`
    pub fn blocks(&self, a: TileCoord, b: TileCoord) -> bool {
        FenceKey::between(a, b)
            .and_then(|key| self.fences.get(&key))
            .map(|fence| fence.active)
            .unwrap_or(false)
    }

    pub fn get(&self, tile: TileCoord, side: Side) -> Option<&Fence> {
        FenceKey::from_side(tile, side).and_then(|key| self.fences.get(&key))
    }

    pub fn get_key(&self, key: &FenceKey) -> Option<&Fence> {
        self.fences.get(key)
    }

    /// Fences in key order
    pub fn iter(&self) -> impl Iterator<Item = &Fence> {
        self.fences.values()
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }
}

fn edge_key(tile: TileCoord, side: Side) -> FarmResult<FenceKey> {
    FenceKey::from_side(tile, side).ok_or(FarmError::EdgeOutOfRange { tile, side })
}

/// Tile sides that fence in the block spanning `min..=max`
pub fn rectangle_perimeter(min: TileCoord, max: TileCoord) -> Vec<(TileCoord, Side)> {
    let (x0, x1) = (min.x.min(max.x), min.x.max(max.x));
    let (y0, y1) = (min.y.min(max.y), min.y.max(max.y));
    let mut sides = Vec::new();
    for x in x0..=x1 {
        sides.push((TileCoord::new(x, y0), Side::Bottom));
        sides.push((TileCoord::new(x, y1), Side::Top));
    }
    for y in y0..=y1 {
        sides.push((TileCoord::new(x0, y), Side::Left));
        sides.push((TileCoord::new(x1, y), Side::Right));
    }
    sides
}
