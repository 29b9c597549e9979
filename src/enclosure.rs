//! Region detection by fence-aware flood fill.
//!
//! Every existing tile lands in exactly one region. Movement between two
//! grid-adjacent tiles is allowed when both exist and no active fence sits on
//! the shared edge. A whole pass is O(T) in the number of tiles and is rerun
//! from scratch after each fence edit.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::config::BoundaryPolicy;
use crate::fence::FenceStore;
use crate::grid::{Side, TileCoord, TileMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub tiles: BTreeSet<TileCoord>,
    /// Whether the region is closed under the boundary policy in use
    pub enclosed: bool,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Partitions all existing tiles into maximal fence-free connected regions,
/// ordered by their lowest tile.
pub fn detect_regions<M: TileMap + ?Sized>(
    tiles: &M,
    fences: &FenceStore,
    policy: BoundaryPolicy,
) -> Vec<Region> {
    let mut visited: HashSet<TileCoord> = HashSet::new();
    let mut regions = Vec::new();

    for seed in tiles.tiles() {
        if !visited.insert(seed) {
            continue;
        }
        let mut region = BTreeSet::from([seed]);
        let mut touches_void = false;
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            for side in Side::ALL {
                let Some(neighbor) = current.step(side).filter(|next| tiles.has_tile(*next))
                else {
                    touches_void = true;
                    continue;
                };
                if fences.blocks(current, neighbor) || !visited.insert(neighbor) {
                    continue;
                }
                region.insert(neighbor);
                queue.push_back(neighbor);
            }
        }

        let enclosed = match policy {
            BoundaryPolicy::GridEdgeIsWall => true,
            BoundaryPolicy::RequireFences => !touches_void,
        };
        regions.push(Region {
            tiles: region,
            enclosed,
        });
    }

    regions
}

/// Only the regions that qualify as pastures
pub fn enclosed_regions<M: TileMap + ?Sized>(
    tiles: &M,
    fences: &FenceStore,
    policy: BoundaryPolicy,
) -> Vec<BTreeSet<TileCoord>> {
    detect_regions(tiles, fences, policy)
        .into_iter()
        .filter(|region| region.enclosed)
        .map(|region| region.tiles)
        .collect()
}
