use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::{
    config::FarmConfig,
    error::FarmError,
    farm::Farm,
    fence::rectangle_perimeter,
    grid::{Side, TileCoord, TileGrid},
    stock::AnimalKind,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub config: FarmConfig,
    pub grid: GridSpec,
    #[serde(default)]
    pub structures: Vec<TileCoord>,
    #[serde(default)]
    pub enclosures: Vec<EnclosureSpec>,
    #[serde(default)]
    pub fences: Vec<FenceSpec>,
    #[serde(default)]
    pub animals: Vec<AnimalSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub holes: Vec<TileCoord>,
}

/// Rectangle fenced along its perimeter. Edges shared with another
/// enclosure are only placed once.
#[derive(Debug, Clone, Deserialize)]
pub struct EnclosureSpec {
    pub min: TileCoord,
    pub max: TileCoord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FenceSpec {
    pub tile: TileCoord,
    pub side: Side,
}

/// Animals placed into whichever pasture covers `at`
#[derive(Debug, Clone, Deserialize)]
pub struct AnimalSpec {
    pub at: TileCoord,
    pub kind: AnimalKind,
    pub count: u32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .config
            .validate()
            .with_context(|| format!("scenario '{}' in {}", scenario.name, path.display()))?;
        info!(scenario = %scenario.name, path = %path.display(), "scenario loaded");
        Ok(scenario)
    }
}

impl Scenario {
    pub fn build_grid(&self) -> TileGrid {
        let mut grid = TileGrid::rectangle(self.grid.width, self.grid.height);
        for hole in &self.grid.holes {
            grid.remove_tile(*hole);
        }
        grid
    }

    pub fn build_farm(&self) -> Result<Farm<TileGrid>> {
        let mut farm = Farm::new(self.build_grid(), self.config.clone());

        for tile in &self.structures {
            farm.add_structure(*tile)
                .with_context(|| format!("scenario '{}': structure at {tile}", self.name))?;
        }

        for enclosure in &self.enclosures {
            for (tile, side) in rectangle_perimeter(enclosure.min, enclosure.max) {
                match farm.add_fence(tile, side) {
                    Ok(_) | Err(FarmError::DuplicateFence(_)) => {}
                    Err(err) => {
                        return Err(err).with_context(|| {
                            format!(
                                "scenario '{}': enclosure {} to {}",
                                self.name, enclosure.min, enclosure.max
                            )
                        })
                    }
                }
            }
        }

        for fence in &self.fences {
            farm.add_fence(fence.tile, fence.side).with_context(|| {
                format!(
                    "scenario '{}': fence on {} side of {}",
                    self.name, fence.side, fence.tile
                )
            })?;
        }

        for animals in &self.animals {
            let id = farm
                .pasture_at(animals.at)
                .map(|pasture| pasture.id())
                .ok_or_else(|| {
                    anyhow!(
                        "scenario '{}': no pasture at {} for {} {}",
                        self.name,
                        animals.at,
                        animals.count,
                        animals.kind
                    )
                })?;
            farm.add_animals(id, animals.kind, animals.count)
                .with_context(|| format!("scenario '{}': animals at {}", self.name, animals.at))?;
        }

        Ok(farm)
    }
}
