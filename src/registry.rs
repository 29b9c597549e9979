//! Pasture lifecycle.
//!
//! Pastures are rebuilt from scratch on every structural recompute. Ids are
//! never matched across recomputes, so a pasture whose tiles did not change
//! still comes back under a new id. Hosts that need a durable handle should
//! key on [`Pasture::anchor`] instead.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::capacity::{capacity, count_boost_structures};
use crate::config::{CapacityRules, FarmConfig, StockPolicy};
use crate::enclosure::enclosed_regions;
use crate::fence::{FenceKey, FenceStore};
use crate::grid::{Side, TileCoord, TileMap};
use crate::pasture::{Pasture, PastureId};
use crate::stock::{AnimalKind, AnimalStock};

/// Outcome of a structural recompute.
///
/// Every previous id is destroyed. Each new pasture is either `created`
/// (its tile set did not exist before) or `retained` (same tiles as a
/// destroyed pasture, fresh id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeDiff {
    pub created: Vec<Pasture>,
    pub destroyed: Vec<PastureId>,
    pub retained: Vec<Pasture>,
}

impl RecomputeDiff {
    /// All pastures produced by the recompute, in id order
    pub fn new_pastures(&self) -> Vec<&Pasture> {
        let mut all: Vec<&Pasture> = self.created.iter().chain(&self.retained).collect();
        all.sort_by_key(|pasture| pasture.id());
        all
    }
}

/// Capacity refresh applied without touching region membership. The
/// capacity may be unchanged when only the structure count moved.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityChange {
    pub pasture: PastureId,
    pub previous: u32,
    pub current: u32,
    pub boost_structures: u32,
    pub released: Vec<(AnimalKind, u32)>,
}

#[derive(Debug, Default)]
pub struct PastureRegistry {
    next_id: u64,
    pastures: BTreeMap<PastureId, Pasture>,
    tile_index: HashMap<TileCoord, PastureId>,
}

impl PastureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute<M: TileMap + ?Sized>(
        &mut self,
        tiles: &M,
        fences: &FenceStore,
        config: &FarmConfig,
    ) -> RecomputeDiff {
        let regions = enclosed_regions(tiles, fences, config.boundary);
        let previous = std::mem::take(&mut self.pastures);
        self.tile_index.clear();

        let mut previous_by_tiles: HashMap<&BTreeSet<TileCoord>, &Pasture> =
            previous.values().map(|p| (&p.tiles, p)).collect();

        let mut diff = RecomputeDiff {
            destroyed: previous.keys().copied().collect(),
            ..RecomputeDiff::default()
        };

        for region in regions {
            let id = self.allocate_id();
            let mut pasture = build_pasture(id, region, tiles, fences, &config.capacity);
            let matched = previous_by_tiles.remove(&pasture.tiles);

            if let Some(old) = matched {
                match config.stock_on_recompute {
                    StockPolicy::CarryOverUnchanged if old.stock.total() <= pasture.capacity => {
                        pasture.stock = old.stock.clone();
                    }
                    _ => log_discarded(old),
                }
            }

            for tile in &pasture.tiles {
                self.tile_index.insert(*tile, id);
            }
            self.pastures.insert(id, pasture.clone());
            if matched.is_some() {
                diff.retained.push(pasture);
            } else {
                diff.created.push(pasture);
            }
        }

        for old in previous_by_tiles.values() {
            log_discarded(old);
        }

        debug!(
            created = diff.created.len(),
            retained = diff.retained.len(),
            destroyed = diff.destroyed.len(),
            "recomputed pastures"
        );
        diff
    }

    /// Re-derives the capacity of the pasture covering `tile` after a
    /// boosting structure changed there. Returns `None` when the tile is in
    /// no pasture or neither the capacity nor the structure count moved.
    pub fn refresh_capacity<M: TileMap + ?Sized>(
        &mut self,
        tiles: &M,
        rules: &CapacityRules,
        tile: TileCoord,
    ) -> Option<CapacityChange> {
        let id = *self.tile_index.get(&tile)?;
        let pasture = self.pastures.get_mut(&id)?;
        refresh_pasture(pasture, tiles, rules)
    }

    pub fn refresh_all_capacities<M: TileMap + ?Sized>(
        &mut self,
        tiles: &M,
        rules: &CapacityRules,
    ) -> Vec<CapacityChange> {
        self.pastures
            .values_mut()
            .filter_map(|pasture| refresh_pasture(pasture, tiles, rules))
            .collect()
    }

    pub fn get(&self, id: PastureId) -> Option<&Pasture> {
        self.pastures.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PastureId) -> Option<&mut Pasture> {
        self.pastures.get_mut(&id)
    }

    pub fn pasture_at(&self, tile: TileCoord) -> Option<&Pasture> {
        self.tile_index
            .get(&tile)
            .and_then(|id| self.pastures.get(id))
    }

    /// Pastures in id order
    pub fn iter(&self) -> impl Iterator<Item = &Pasture> {
        self.pastures.values()
    }

    pub fn len(&self) -> usize {
        self.pastures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pastures.is_empty()
    }

    fn allocate_id(&mut self) -> PastureId {
        let id = PastureId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn build_pasture<M: TileMap + ?Sized>(
    id: PastureId,
    tiles_in_region: BTreeSet<TileCoord>,
    tiles: &M,
    fences: &FenceStore,
    rules: &CapacityRules,
) -> Pasture {
    let boundary_fences = boundary_fences(&tiles_in_region, fences);
    let boost_structures = count_boost_structures(tiles, &tiles_in_region);
    let capacity = capacity(tiles_in_region.len() as u32, boost_structures, rules);
    Pasture {
        id,
        tiles: tiles_in_region,
        boundary_fences,
        boost_structures,
        capacity,
        stock: AnimalStock::new(),
    }
}

/// Fences on region tile sides whose neighbour lies outside the region
fn boundary_fences(region: &BTreeSet<TileCoord>, fences: &FenceStore) -> BTreeSet<FenceKey> {
    let mut boundary = BTreeSet::new();
    for tile in region {
        for side in Side::ALL {
            if tile.step(side).is_some_and(|next| region.contains(&next)) {
                continue;
            }
            if let Some(fence) = fences.get(*tile, side) {
                boundary.insert(fence.key);
            }
        }
    }
    boundary
}

fn refresh_pasture<M: TileMap + ?Sized>(
    pasture: &mut Pasture,
    tiles: &M,
    rules: &CapacityRules,
) -> Option<CapacityChange> {
    let boost_structures = count_boost_structures(tiles, &pasture.tiles);
    let current = capacity(pasture.tile_count(), boost_structures, rules);
    let previous = pasture.capacity;
    if current == previous && boost_structures == pasture.boost_structures {
        return None;
    }
    pasture.boost_structures = boost_structures;
    pasture.capacity = current;
    let released = pasture.stock.shrink_to(current);
    for (kind, count) in &released {
        warn!(pasture = %pasture.id, %kind, count, capacity = current, "released animals over capacity");
    }
    Some(CapacityChange {
        pasture: pasture.id,
        previous,
        current,
        boost_structures,
        released,
    })
}

fn log_discarded(old: &Pasture) {
    if !old.stock.is_empty() {
        warn!(
            pasture = %old.id,
            animals = old.stock.total(),
            "pasture rebuilt, animals discarded"
        );
    }
}
