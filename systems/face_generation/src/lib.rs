#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic face generation from a seed and per-slot asset pools.
//!
//! Generation never touches the caller's random stream: [`generate_face`]
//! seeds a private generator from the provided [`Seed`], so two calls with the
//! same seed and the same [`FeatureTables`] always select identical assets.
//! [`randomize_feature`] is the counterpart used for decoy mutation and draws
//! from whatever stream the caller hands in.

use lineup_core::{AssetHandle, FaceConfiguration, FeatureSlot, Seed, SLOT_COUNT};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Ordered asset pools for every feature slot plus the body sprites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureTables {
    pools: [Vec<AssetHandle>; SLOT_COUNT],
    bodies: Vec<AssetHandle>,
}

impl FeatureTables {
    /// Creates tables with every pool empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates tables where every slot holds `per_slot` handles and the body
    /// pool holds `bodies` handles, numbered consecutively across pools.
    #[must_use]
    pub fn numbered(per_slot: u32, bodies: u32) -> Self {
        let mut tables = Self::new();
        let mut next = 0;
        for slot in FeatureSlot::ALL {
            let pool = (next..next + per_slot).map(AssetHandle::new).collect();
            tables.set_pool(slot, pool);
            next += per_slot;
        }
        tables.bodies = (next..next + bodies).map(AssetHandle::new).collect();
        tables
    }

    /// Replaces the pool associated with `slot`, returning the updated tables.
    #[must_use]
    pub fn with_pool(mut self, slot: FeatureSlot, pool: Vec<AssetHandle>) -> Self {
        self.set_pool(slot, pool);
        self
    }

    /// Replaces the body sprite pool, returning the updated tables.
    #[must_use]
    pub fn with_bodies(mut self, bodies: Vec<AssetHandle>) -> Self {
        self.bodies = bodies;
        self
    }

    /// Replaces the pool associated with `slot`.
    pub fn set_pool(&mut self, slot: FeatureSlot, pool: Vec<AssetHandle>) {
        self.pools[slot.index()] = pool;
    }

    /// Ordered pool for the provided slot.
    #[must_use]
    pub fn pool(&self, slot: FeatureSlot) -> &[AssetHandle] {
        &self.pools[slot.index()]
    }

    /// Ordered body sprite pool.
    #[must_use]
    pub fn bodies(&self) -> &[AssetHandle] {
        &self.bodies
    }
}

/// Generates the face associated with `seed`.
///
/// Slots are visited in [`FeatureSlot::ALL`] order and each consumes its
/// draws from a generator seeded solely by `seed`.
#[must_use]
pub fn generate_face(tables: &FeatureTables, seed: Seed) -> FaceConfiguration {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.to_rng_state());
    let mut face = FaceConfiguration::blank();
    for slot in FeatureSlot::ALL {
        face.set(slot, select_feature(tables.pool(slot), slot, &mut rng));
    }
    face
}

/// Reselects a single slot in place using the caller's random stream.
///
/// The blank-probability policy matches [`generate_face`]; the new selection
/// may coincide with the previous one.
pub fn randomize_feature<R>(
    tables: &FeatureTables,
    face: &mut FaceConfiguration,
    slot: FeatureSlot,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    face.set(slot, select_feature(tables.pool(slot), slot, rng));
}

/// Picks a uniformly random body sprite, or `None` when the pool is empty.
pub fn random_body<R>(tables: &FeatureTables, rng: &mut R) -> Option<AssetHandle>
where
    R: Rng + ?Sized,
{
    pick(tables.bodies(), rng)
}

fn select_feature<R>(pool: &[AssetHandle], slot: FeatureSlot, rng: &mut R) -> Option<AssetHandle>
where
    R: Rng + ?Sized,
{
    if let Some(blank_probability) = slot.blank_probability() {
        let roll: f32 = rng.gen();
        if roll < blank_probability {
            return None;
        }
    }
    pick(pool, rng)
}

fn pick<R>(pool: &[AssetHandle], rng: &mut R) -> Option<AssetHandle>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_resolves_to_blank_without_drawing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut reference = rng.clone();

        assert_eq!(select_feature(&[], FeatureSlot::Eyes, &mut rng), None);
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn numbered_tables_do_not_share_handles() {
        let tables = FeatureTables::numbered(3, 2);
        let mut seen = Vec::new();
        for slot in FeatureSlot::ALL {
            seen.extend_from_slice(tables.pool(slot));
        }
        seen.extend_from_slice(tables.bodies());
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(total, 3 * SLOT_COUNT + 2);
    }
}
