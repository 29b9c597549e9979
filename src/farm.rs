//! The farm facade: fences, pastures and animals over an injected tile map.

use tracing::debug;

use crate::config::FarmConfig;
use crate::error::{FarmError, FarmResult};
use crate::events::FarmEvent;
use crate::fence::{Fence, FenceId, FenceStore};
use crate::grid::{Side, TileCoord, TileGrid, TileMap};
use crate::pasture::{Pasture, PastureId};
use crate::registry::{CapacityChange, PastureRegistry, RecomputeDiff};
use crate::stock::AnimalKind;

#[derive(Debug)]
pub struct Farm<M: TileMap> {
    tiles: M,
    config: FarmConfig,
    fences: FenceStore,
    pastures: PastureRegistry,
    events: Vec<FarmEvent>,
}

impl<M: TileMap> Farm<M> {
    pub fn new(tiles: M, config: FarmConfig) -> Self {
        let mut farm = Self {
            tiles,
            config,
            fences: FenceStore::new(),
            pastures: PastureRegistry::new(),
            events: Vec::new(),
        };
        farm.recompute();
        farm
    }

    pub fn config(&self) -> &FarmConfig {
        &self.config
    }

    pub fn tiles(&self) -> &M {
        &self.tiles
    }

    /// Direct access to the host grid. Call [`Farm::recompute`] after
    /// changing tile existence, or [`Farm::structure_changed`] after changing
    /// structures.
    pub fn tiles_mut(&mut self) -> &mut M {
        &mut self.tiles
    }

    pub fn fences(&self) -> &FenceStore {
        &self.fences
    }

    pub fn add_fence(&mut self, tile: TileCoord, side: Side) -> FarmResult<FenceId> {
        let fence = self.fences.add(&self.tiles, tile, side)?;
        let (id, key) = (fence.id, fence.key);
        debug!(fence = %id, %key, "fence added");
        self.events.push(FarmEvent::FenceAdded { id, key });
        self.recompute();
        Ok(id)
    }

    pub fn remove_fence(&mut self, tile: TileCoord, side: Side) -> FarmResult<Fence> {
        let fence = self.fences.remove(tile, side)?;
        debug!(fence = %fence.id, key = %fence.key, "fence removed");
        self.events.push(FarmEvent::FenceRemoved {
            id: fence.id,
            key: fence.key,
        });
        self.recompute();
        Ok(fence)
    }

    /// Soft-disables or re-enables a fence. Inactive fences keep their slot
    /// but let animals through.
    pub fn set_fence_active(&mut self, tile: TileCoord, side: Side, active: bool) -> FarmResult<()> {
        if self.fences.set_active(tile, side, active)? {
            debug!(%tile, %side, active, "fence toggled");
            self.recompute();
        }
        Ok(())
    }

    pub fn has_fence(&self, tile: TileCoord, side: Side) -> bool {
        self.fences.has_fence(tile, side)
    }

    pub fn has_fence_between(&self, a: TileCoord, b: TileCoord) -> bool {
        self.fences.has_fence_between(a, b)
    }

    /// Rebuilds every pasture from the current tiles and fences
    pub fn recompute(&mut self) -> RecomputeDiff {
        let diff = self
            .pastures
            .recompute(&self.tiles, &self.fences, &self.config);
        for id in &diff.destroyed {
            self.events.push(FarmEvent::PastureDestroyed { id: *id });
        }
        for pasture in diff.new_pastures() {
            self.events.push(FarmEvent::PastureCreated {
                id: pasture.id(),
                pasture: pasture.clone(),
            });
        }
        diff
    }

    /// Capacity-only refresh for the pasture covering `tile`, used when a
    /// boosting structure was added or removed there
    pub fn structure_changed(&mut self, tile: TileCoord) -> Option<CapacityChange> {
        let change = self
            .pastures
            .refresh_capacity(&self.tiles, &self.config.capacity, tile)?;
        self.push_updated(change.pasture);
        Some(change)
    }

    pub fn refresh_capacities(&mut self) -> Vec<CapacityChange> {
        let changes = self
            .pastures
            .refresh_all_capacities(&self.tiles, &self.config.capacity);
        for change in &changes {
            self.push_updated(change.pasture);
        }
        changes
    }

    /// Pastures in id order
    pub fn pastures(&self) -> impl Iterator<Item = &Pasture> {
        self.pastures.iter()
    }

    pub fn all_pastures(&self) -> Vec<&Pasture> {
        self.pastures.iter().collect()
    }

    pub fn pasture_count(&self) -> usize {
        self.pastures.len()
    }

    pub fn pasture(&self, id: PastureId) -> Option<&Pasture> {
        self.pastures.get(id)
    }

    pub fn pasture_at(&self, tile: TileCoord) -> Option<&Pasture> {
        self.pastures.pasture_at(tile)
    }

    pub fn can_add_animals(&self, id: PastureId, count: u32) -> FarmResult<bool> {
        let pasture = self.pastures.get(id).ok_or(FarmError::UnknownPasture(id))?;
        Ok(pasture.can_add(count))
    }

    pub fn add_animals(&mut self, id: PastureId, kind: AnimalKind, count: u32) -> FarmResult<()> {
        let pasture = self
            .pastures
            .get_mut(id)
            .ok_or(FarmError::UnknownPasture(id))?;
        pasture.add_animals(kind, count)?;
        if count > 0 {
            debug!(pasture = %id, %kind, count, "animals added");
            self.push_updated(id);
        }
        Ok(())
    }

    pub fn remove_animals(&mut self, id: PastureId, kind: AnimalKind, count: u32) -> FarmResult<()> {
        let pasture = self
            .pastures
            .get_mut(id)
            .ok_or(FarmError::UnknownPasture(id))?;
        pasture.remove_animals(kind, count)?;
        if count > 0 {
            debug!(pasture = %id, %kind, count, "animals removed");
            self.push_updated(id);
        }
        Ok(())
    }

    /// Moves animals between two pastures; nothing changes unless both
    /// sides accept the move
    pub fn move_animals(
        &mut self,
        from: PastureId,
        to: PastureId,
        kind: AnimalKind,
        count: u32,
    ) -> FarmResult<()> {
        if from == to {
            // still validate the pasture and the stock on hand
            let pasture = self.pastures.get(from).ok_or(FarmError::UnknownPasture(from))?;
            let held = pasture.animal_count(kind);
            if held < count {
                return Err(FarmError::InsufficientStock {
                    pasture: from,
                    kind,
                    requested: count,
                    held,
                });
            }
            return Ok(());
        }

        let source = self.pastures.get(from).ok_or(FarmError::UnknownPasture(from))?;
        let target = self.pastures.get(to).ok_or(FarmError::UnknownPasture(to))?;
        let held = source.animal_count(kind);
        if held < count {
            return Err(FarmError::InsufficientStock {
                pasture: from,
                kind,
                requested: count,
                held,
            });
        }
        if !target.can_add(count) {
            return Err(FarmError::CapacityExceeded {
                pasture: to,
                requested: count,
                held: target.total_animals(),
                capacity: target.capacity(),
            });
        }

        self.remove_animals(from, kind, count)?;
        self.add_animals(to, kind, count)
    }

    pub fn events(&self) -> &[FarmEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<FarmEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_updated(&mut self, id: PastureId) {
        if let Some(pasture) = self.pastures.get(id) {
            self.events.push(FarmEvent::PastureUpdated {
                id,
                pasture: pasture.clone(),
            });
        }
    }
}

impl Farm<TileGrid> {
    pub fn add_structure(&mut self, tile: TileCoord) -> FarmResult<Option<CapacityChange>> {
        if !self.tiles.has_tile(tile) {
            return Err(FarmError::MissingTile(tile));
        }
        if !self.tiles.insert_structure(tile) {
            return Err(FarmError::DuplicateStructure(tile));
        }
        Ok(self.structure_changed(tile))
    }

    pub fn remove_structure(&mut self, tile: TileCoord) -> FarmResult<Option<CapacityChange>> {
        if !self.tiles.remove_structure(tile) {
            return Err(FarmError::UnknownStructure(tile));
        }
        Ok(self.structure_changed(tile))
    }
}
