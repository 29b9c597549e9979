use serde::Serialize;

use crate::fence::FenceKey;
use crate::farm::Farm;
use crate::grid::{TileCoord, TileMap};
use crate::stock::AnimalKind;

#[derive(Debug, Serialize)]
pub struct PastureSnapshot {
    pub id: u64,
    pub anchor: Option<TileCoord>,
    pub tiles: usize,
    pub boost_structures: u32,
    pub capacity: u32,
    pub animals: Vec<(AnimalKind, u32)>,
    pub boundary_fences: Vec<FenceKey>,
}

#[derive(Debug, Serialize)]
pub struct FarmSnapshot {
    pub scenario: String,
    pub tiles: usize,
    pub fences: Vec<FenceKey>,
    pub enclosed_tiles: usize,
    pub total_capacity: u64,
    pub total_animals: u64,
    pub pastures: Vec<PastureSnapshot>,
}

impl FarmSnapshot {
    pub fn capture<M: TileMap>(scenario: &str, farm: &Farm<M>) -> Self {
        let pastures: Vec<PastureSnapshot> = farm
            .pastures()
            .map(|pasture| PastureSnapshot {
                id: pasture.id().raw(),
                anchor: pasture.anchor(),
                tiles: pasture.tiles().len(),
                boost_structures: pasture.boost_structures(),
                capacity: pasture.capacity(),
                animals: pasture.stock().iter().collect(),
                boundary_fences: pasture.boundary_fences().iter().copied().collect(),
            })
            .collect();

        Self {
            scenario: scenario.to_string(),
            tiles: farm.tiles().tiles().len(),
            fences: farm.fences().iter().map(|fence| fence.key).collect(),
            enclosed_tiles: pastures.iter().map(|p| p.tiles).sum(),
            total_capacity: pastures.iter().map(|p| u64::from(p.capacity)).sum(),
            total_animals: pastures
                .iter()
                .flat_map(|p| p.animals.iter())
                .map(|(_, count)| u64::from(*count))
                .sum(),
            pastures,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
