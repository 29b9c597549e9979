//! Per-pasture animal inventory

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    Sheep,
    Boar,
    Cattle,
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimalKind::Sheep => "sheep",
            AnimalKind::Boar => "boar",
            AnimalKind::Cattle => "cattle",
        };
        f.write_str(name)
    }
}

/// Why a stock mutation was refused. The owning pasture turns this into a
/// [`crate::FarmError`] carrying its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    OverCapacity { held: u32, capacity: u32 },
    Insufficient { held: u32 },
}

/// Animal counts by kind. Kinds with a zero count have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalStock {
    counts: BTreeMap<AnimalKind, u32>,
}

impl AnimalStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn count(&self, kind: AnimalKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn can_add(&self, count: u32, capacity: u32) -> bool {
        self.total()
            .checked_add(count)
            .is_some_and(|total| total <= capacity)
    }

    pub fn add(&mut self, kind: AnimalKind, count: u32, capacity: u32) -> Result<(), StockError> {
        if !self.can_add(count, capacity) {
            return Err(StockError::OverCapacity {
                held: self.total(),
                capacity,
            });
        }
        if count > 0 {
            *self.counts.entry(kind).or_insert(0) += count;
        }
        Ok(())
    }

    pub fn remove(&mut self, kind: AnimalKind, count: u32) -> Result<(), StockError> {
        let held = self.count(kind);
        if held < count {
            return Err(StockError::Insufficient { held });
        }
        if held == count {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, held - count);
        }
        Ok(())
    }

    /// Drops animals until the total fits `capacity`, always taking from the
    /// largest herd (earlier kind on ties). Returns what was released.
    ///
    /// Herds above a common water level are cut down to it; the remainder
    /// comes one animal each from the herds left at that level, in kind order.
    pub fn shrink_to(&mut self, capacity: u32) -> Vec<(AnimalKind, u32)> {
        let excess = u64::from(self.total().saturating_sub(capacity));
        if excess == 0 {
            return Vec::new();
        }
        let level = self.water_level(excess);
        let mut remainder = excess - self.count_above(level);

        let mut released = Vec::new();
        for (&kind, count) in self.counts.iter_mut() {
            let mut taken = count.saturating_sub(level);
            if remainder > 0 && *count >= level {
                taken += 1;
                remainder -= 1;
            }
            if taken > 0 {
                *count -= taken;
                released.push((kind, taken));
            }
        }
        self.counts.retain(|_, count| *count > 0);
        released
    }

    /// Lowest level whose cut removes no more than `excess` animals
    fn water_level(&self, excess: u64) -> u32 {
        let (mut low, mut high) = (0, self.counts.values().copied().max().unwrap_or(0));
        while low < high {
            let mid = low + (high - low) / 2;
            if self.count_above(mid) <= excess {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }

    fn count_above(&self, level: u32) -> u64 {
        self.counts
            .values()
            .map(|count| u64::from(count.saturating_sub(level)))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimalKind, u32)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}
