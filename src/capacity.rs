use crate::config::CapacityRules;
use crate::grid::{TileCoord, TileMap};

/// Animal capacity of a pasture.
///
/// Each boosting structure multiplies the base once more; the product is
/// rounded half away from zero and saturates at `u32::MAX`.
pub fn capacity(tile_count: u32, boost_count: u32, rules: &CapacityRules) -> u32 {
    let base = u64::from(tile_count) * u64::from(rules.per_tile_base);
    if !rules.bonus_enabled || boost_count == 0 {
        return u32::try_from(base).unwrap_or(u32::MAX);
    }
    let exponent = i32::try_from(boost_count).unwrap_or(i32::MAX);
    let boosted = base as f64 * rules.multiplier.powi(exponent);
    // float-to-int `as` saturates and maps NaN to 0
    boosted.round() as u32
}

pub fn count_boost_structures<'a, M: TileMap + ?Sized>(
    tiles: &M,
    region: impl IntoIterator<Item = &'a TileCoord>,
) -> u32 {
    region
        .into_iter()
        .filter(|coord| tiles.has_boost_structure(**coord))
        .count() as u32
}
