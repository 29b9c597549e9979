pub mod capacity;
pub mod config;
pub mod enclosure;
pub mod error;
pub mod events;
pub mod farm;
pub mod fence;
pub mod grid;
pub mod pasture;
pub mod registry;
pub mod scenario;
pub mod snapshot;
pub mod stock;

pub use config::{BoundaryPolicy, CapacityRules, FarmConfig, StockPolicy};
pub use error::{FarmError, FarmResult};
pub use events::FarmEvent;
pub use farm::Farm;
pub use fence::{Fence, FenceId, FenceKey, FenceOrientation, FenceStore};
pub use grid::{Side, TileCoord, TileGrid, TileMap};
pub use pasture::{Pasture, PastureId};
pub use registry::{CapacityChange, PastureRegistry, RecomputeDiff};
pub use stock::{AnimalKind, AnimalStock};
