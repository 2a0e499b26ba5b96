//! Designer-facing timing and difficulty knobs.

use std::time::Duration;

use lineup_core::RevealBeat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of beats in the reveal sequence.
pub const REVEAL_STEPS: usize = RevealBeat::ALL.len();

/// Longest duration, in seconds, any knob may describe.
pub const MAX_DURATION_SECS: f32 = 86_400.0;

/// Every adjustable aspect of a session, in seconds where a time is involved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Drawing time granted in the first round.
    pub base_draw_time: f32,
    /// Drawing time removed for every completed round.
    pub draw_time_decrease_per_round: f32,
    /// Drawing time never drops below this value.
    pub min_draw_time: f32,
    /// Remaining time at which the hurry cue plays.
    pub hurry_threshold: f32,
    /// Length of the time's-up chime; the switch to the lineup waits for it.
    pub chime_duration: f32,
    /// Pause between the end of the intro and the title card.
    pub intro_grace: f32,
    /// Delay between the curtain opening on the lineup and selection unlocking.
    pub order_activation_delay: f32,
    /// How long the crusher impact shakes the screen.
    pub shake_duration: f32,
    /// Number of candidates in the lineup.
    pub lineup_size: usize,
    /// Slots each decoy mutates in the first round.
    pub initial_decoy_budget: u32,
    /// Mutation budget removed for every completed round.
    pub decoy_budget_step: u32,
    /// Mutation budget never drops below this value.
    pub decoy_budget_floor: u32,
    /// Misses that end the game.
    pub game_over_misses: u32,
    /// Minimum dwell before each reveal beat plays.
    pub reveal_dwell: [f32; REVEAL_STEPS],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_draw_time: 60.0,
            draw_time_decrease_per_round: 5.0,
            min_draw_time: 15.0,
            hurry_threshold: 5.0,
            chime_duration: 2.0,
            intro_grace: 1.0,
            order_activation_delay: 1.0,
            shake_duration: 0.5,
            lineup_size: 5,
            initial_decoy_budget: 8,
            decoy_budget_step: 2,
            decoy_budget_floor: 2,
            game_over_misses: 3,
            reveal_dwell: [2.0, 2.0, 1.5, 2.0, 2.0],
        }
    }
}

/// Reasons a [`Tuning`] cannot drive a session.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// A drawing time is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveDrawTime {
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// A duration is negative or not a number.
    #[error("{field} must be a non-negative number of seconds, got {value}")]
    InvalidDuration {
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// A duration is longer than [`MAX_DURATION_SECS`].
    #[error("{field} must not exceed 86400 seconds, got {value}")]
    DurationTooLong {
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// The minimum drawing time exceeds the first-round drawing time.
    #[error("min_draw_time ({min}) exceeds base_draw_time ({base})")]
    MinimumExceedsBase {
        /// Configured minimum.
        min: f32,
        /// Configured base.
        base: f32,
    },
    /// The lineup would hold no candidates.
    #[error("lineup_size must be at least 1")]
    EmptyLineup,
    /// The game would be over before it starts.
    #[error("game_over_misses must be at least 1")]
    ZeroGameOverThreshold,
    /// The decoy floor is above the starting budget.
    #[error("decoy_budget_floor ({floor}) exceeds initial_decoy_budget ({initial})")]
    DecoyFloorAboveInitial {
        /// Configured floor.
        floor: u32,
        /// Configured starting budget.
        initial: u32,
    },
}

impl Tuning {
    /// Checks that the knobs describe a playable session.
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("base_draw_time", self.base_draw_time),
            ("min_draw_time", self.min_draw_time),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::NonPositiveDrawTime { field, value });
            }
        }

        let durations = [
            ("base_draw_time", self.base_draw_time),
            ("min_draw_time", self.min_draw_time),
            ("draw_time_decrease_per_round", self.draw_time_decrease_per_round),
            ("hurry_threshold", self.hurry_threshold),
            ("chime_duration", self.chime_duration),
            ("intro_grace", self.intro_grace),
            ("order_activation_delay", self.order_activation_delay),
            ("shake_duration", self.shake_duration),
        ];
        for (field, value) in durations
            .into_iter()
            .chain(self.reveal_dwell.iter().map(|dwell| ("reveal_dwell", *dwell)))
        {
            if !(value >= 0.0) {
                return Err(TuningError::InvalidDuration { field, value });
            }
            if value > MAX_DURATION_SECS {
                return Err(TuningError::DurationTooLong { field, value });
            }
        }

        if self.min_draw_time > self.base_draw_time {
            return Err(TuningError::MinimumExceedsBase {
                min: self.min_draw_time,
                base: self.base_draw_time,
            });
        }
        if self.lineup_size == 0 {
            return Err(TuningError::EmptyLineup);
        }
        if self.game_over_misses == 0 {
            return Err(TuningError::ZeroGameOverThreshold);
        }
        if self.decoy_budget_floor > self.initial_decoy_budget {
            return Err(TuningError::DecoyFloorAboveInitial {
                floor: self.decoy_budget_floor,
                initial: self.initial_decoy_budget,
            });
        }
        Ok(())
    }

    /// Drawing time granted in `round` (one-based).
    #[must_use]
    pub fn draw_time_for_round(&self, round: u32) -> Duration {
        let completed = round.saturating_sub(1) as f32;
        let seconds = (self.base_draw_time - self.draw_time_decrease_per_round * completed)
            .max(self.min_draw_time);
        seconds_to_duration(seconds)
    }

    /// Number of slots each decoy mutates in `round` (one-based).
    #[must_use]
    pub fn decoy_budget_for_round(&self, round: u32) -> u32 {
        let completed = round.saturating_sub(1);
        self.initial_decoy_budget
            .saturating_sub(self.decoy_budget_step.saturating_mul(completed))
            .max(self.decoy_budget_floor)
    }

    /// Reveal dwell times converted to durations.
    #[must_use]
    pub fn reveal_dwell(&self) -> [Duration; REVEAL_STEPS] {
        self.reveal_dwell.map(seconds_to_duration)
    }

    pub(crate) fn hurry_threshold(&self) -> Duration {
        seconds_to_duration(self.hurry_threshold)
    }

    pub(crate) fn chime_duration(&self) -> Duration {
        seconds_to_duration(self.chime_duration)
    }

    pub(crate) fn intro_grace(&self) -> Duration {
        seconds_to_duration(self.intro_grace)
    }

    pub(crate) fn order_activation_delay(&self) -> Duration {
        seconds_to_duration(self.order_activation_delay)
    }

    pub(crate) fn shake_duration(&self) -> Duration {
        seconds_to_duration(self.shake_duration)
    }
}

fn seconds_to_duration(seconds: f32) -> Duration {
    if !(seconds > 0.0) {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
}
