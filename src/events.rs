use serde::Serialize;

use crate::fence::{FenceId, FenceKey};
use crate::pasture::{Pasture, PastureId};

/// Notifications queued by the farm for the host to drain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FarmEvent {
    FenceAdded { id: FenceId, key: FenceKey },
    FenceRemoved { id: FenceId, key: FenceKey },
    PastureCreated { id: PastureId, pasture: Pasture },
    PastureDestroyed { id: PastureId },
    /// Capacity or animal counts changed outside a structural recompute
    PastureUpdated { id: PastureId, pasture: Pasture },
}

impl FarmEvent {
    pub fn pasture_id(&self) -> Option<PastureId> {
        match self {
            FarmEvent::PastureCreated { id, .. }
            | FarmEvent::PastureDestroyed { id }
            | FarmEvent::PastureUpdated { id, .. } => Some(*id),
            FarmEvent::FenceAdded { .. } | FarmEvent::FenceRemoved { .. } => None,
        }
    }
}
