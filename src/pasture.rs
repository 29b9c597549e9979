use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FarmError, FarmResult};
use crate::fence::FenceKey;
use crate::grid::TileCoord;
use crate::stock::{AnimalKind, AnimalStock, StockError};

/// Pasture identifier. Fresh on every structural recompute and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PastureId(pub(crate) u64);

impl PastureId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PastureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fenced-in region together with its capacity and animals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pasture {
    pub(crate) id: PastureId,
    pub(crate) tiles: BTreeSet<TileCoord>,
    pub(crate) boundary_fences: BTreeSet<FenceKey>,
    pub(crate) boost_structures: u32,
    pub(crate) capacity: u32,
    pub(crate) stock: AnimalStock,
}

impl Pasture {
    pub fn id(&self) -> PastureId {
        self.id
    }

    pub fn tiles(&self) -> &BTreeSet<TileCoord> {
        &self.tiles
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    /// Lowest tile coordinate; stable across recomputes while the tile set is
    pub fn anchor(&self) -> Option<TileCoord> {
        self.tiles.first().copied()
    }

    pub fn boundary_fences(&self) -> &BTreeSet<FenceKey> {
        &self.boundary_fences
    }

    pub fn boost_structures(&self) -> u32 {
        self.boost_structures
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn stock(&self) -> &AnimalStock {
        &self.stock
    }

    pub fn animal_count(&self, kind: AnimalKind) -> u32 {
        self.stock.count(kind)
    }

    pub fn total_animals(&self) -> u32 {
        self.stock.total()
    }

    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.stock.total())
    }

    pub fn can_add(&self, count: u32) -> bool {
        self.stock.can_add(count, self.capacity)
    }

    pub(crate) fn add_animals(&mut self, kind: AnimalKind, count: u32) -> FarmResult<()> {
        self.stock
            .add(kind, count, self.capacity)
            .map_err(|err| self.stock_error(kind, count, err))
    }

    pub(crate) fn remove_animals(&mut self, kind: AnimalKind, count: u32) -> FarmResult<()> {
        self.stock
            .remove(kind, count)
            .map_err(|err| self.stock_error(kind, count, err))
    }

    fn stock_error(&self, kind: AnimalKind, requested: u32, err: StockError) -> FarmError {
        match err {
            StockError::OverCapacity { held, capacity } => FarmError::CapacityExceeded {
                pasture: self.id,
                requested,
                held,
                capacity,
            },
            StockError::Insufficient { held } => FarmError::InsufficientStock {
                pasture: self.id,
                kind,
                requested,
                held,
            },
        }
    }
}
