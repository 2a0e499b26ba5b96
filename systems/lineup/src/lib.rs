#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lineup construction: one true match and a set of mutated decoys.
//!
//! Every candidate starts from the face derived from the round seed. Decoys
//! then reselect a number of distinct slots drawn from the builder's session
//! stream, so fewer mutations leave them closer to the target portrait. A
//! mutation may reselect the asset a slot already had, which makes decoy
//! distinguishability best-effort rather than guaranteed.

use lineup_core::{
    Candidate, CandidateId, Command, Event, FaceConfiguration, FeatureSlot, Lineup, Seed,
    SLOT_COUNT,
};
use lineup_system_face_generation::{generate_face, random_body, randomize_feature, FeatureTables};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Output of a single lineup build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltLineup {
    /// Seed of the target portrait and the true match.
    pub seed: Seed,
    /// Generated candidates.
    pub lineup: Lineup,
    /// Portrait the drawing player sketches from.
    pub target: FaceConfiguration,
}

/// Stateful system that owns the asset tables and the session random stream.
#[derive(Debug)]
pub struct LineupBuilder {
    tables: FeatureTables,
    rng: ChaCha8Rng,
}

impl LineupBuilder {
    /// Creates a builder drawing from a stream seeded with `session_seed`.
    #[must_use]
    pub fn new(tables: FeatureTables, session_seed: u64) -> Self {
        Self {
            tables,
            rng: ChaCha8Rng::seed_from_u64(session_seed),
        }
    }

    /// Asset tables the builder selects from.
    #[must_use]
    pub fn tables(&self) -> &FeatureTables {
        &self.tables
    }

    /// Answers every [`Event::LineupRequested`] with an [`Command::InstallLineup`].
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::LineupRequested {
                round,
                size,
                decoy_budget,
            } = event
            {
                let built = self.build(*size, *decoy_budget);
                log::debug!(
                    "round {round}: lineup of {} built from seed {}, true match at {}",
                    built.lineup.len(),
                    built.seed.get(),
                    built.lineup.correct().get()
                );
                out.push(Command::InstallLineup {
                    seed: built.seed,
                    lineup: built.lineup,
                    target: built.target,
                });
            }
        }
    }

    /// Builds a lineup of `size` candidates (at least one) whose decoys mutate
    /// up to `decoy_budget` distinct slots.
    pub fn build(&mut self, size: usize, decoy_budget: u32) -> BuiltLineup {
        let size = size.max(1);
        let seed = Seed::new(self.rng.gen());
        let target = generate_face(&self.tables, seed);
        let correct = CandidateId::new(self.rng.gen_range(0..size));

        let mut candidates = Vec::with_capacity(size);
        for index in 0..size {
            let id = CandidateId::new(index);
            let body = random_body(&self.tables, &mut self.rng);
            let mut face = generate_face(&self.tables, seed);
            if id != correct {
                self.mutate_decoy(&mut face, decoy_budget);
            }
            candidates.push(Candidate::new(id, body, face));
        }

        BuiltLineup {
            seed,
            lineup: Lineup::new(candidates, correct),
            target,
        }
    }

    fn mutate_decoy(&mut self, face: &mut FaceConfiguration, decoy_budget: u32) {
        let mutations = usize::try_from(decoy_budget)
            .map_or(SLOT_COUNT, |budget| budget.min(SLOT_COUNT));
        let mut remaining = FeatureSlot::ALL.to_vec();
        for _ in 0..mutations {
            let slot = remaining.swap_remove(self.rng.gen_range(0..remaining.len()));
            randomize_feature(&self.tables, face, slot, &mut self.rng);
        }
    }
}
