use thiserror::Error;

use crate::fence::FenceKey;
use crate::grid::{Side, TileCoord};
use crate::pasture::PastureId;
use crate::stock::AnimalKind;

pub type FarmResult<T> = Result<T, FarmError>;

/// Recoverable failures of farm operations. A failed call never leaves
/// partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmError {
    #[error("fence already exists at {0}")]
    DuplicateFence(FenceKey),

    #[error("fence at {key} needs tiles on both sides, {missing} does not exist")]
    MissingAdjacency { key: FenceKey, missing: TileCoord },

    #[error("no fence at {0}")]
    UnknownFence(FenceKey),

    #[error("no edge on the {side} side of {tile}, the neighbour is outside the coordinate range")]
    EdgeOutOfRange { tile: TileCoord, side: Side },

    #[error("unknown pasture {0}")]
    UnknownPasture(PastureId),

    #[error("pasture {pasture} cannot take {requested} more animals ({held}/{capacity} held)")]
    CapacityExceeded {
        pasture: PastureId,
        requested: u32,
        held: u32,
        capacity: u32,
    },

    #[error("pasture {pasture} holds {held} {kind}, cannot remove {requested}")]
    InsufficientStock {
        pasture: PastureId,
        kind: AnimalKind,
        requested: u32,
        held: u32,
    },

    #[error("no tile at {0}")]
    MissingTile(TileCoord),

    #[error("tile {0} already has a structure")]
    DuplicateStructure(TileCoord),

    #[error("tile {0} has no structure")]
    UnknownStructure(TileCoord),
}
