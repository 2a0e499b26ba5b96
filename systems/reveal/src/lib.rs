#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step-indexed reveal sequence played after the crusher lands.
//!
//! The system accumulates simulated time from `TimeAdvanced` events and emits
//! one `RevealBeat` command per step once that step's dwell elapsed. Leftover
//! time carries into the next step so variable frame lengths do not drift the
//! sequence.

use std::time::Duration;

use lineup_core::{CandidateId, Command, Event, RevealBeat};

/// Minimum dwell before each beat plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    dwell: [Duration; RevealBeat::ALL.len()],
}

impl Config {
    /// Creates a configuration with one dwell per beat, in playback order.
    #[must_use]
    pub const fn new(dwell: [Duration; RevealBeat::ALL.len()]) -> Self {
        Self { dwell }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new([
            Duration::from_secs(2),
            Duration::from_secs(2),
            Duration::from_millis(1_500),
            Duration::from_secs(2),
            Duration::from_secs(2),
        ])
    }
}

#[derive(Clone, Copy, Debug)]
struct Progress {
    step: usize,
    elapsed: Duration,
    correct: bool,
}

/// Pure system sequencing the reveal beats.
#[derive(Debug)]
pub struct Reveal {
    config: Config,
    progress: Option<Progress>,
}

impl Reveal {
    /// Creates an idle reveal sequence.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Reports whether a sequence is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.progress.is_some()
    }

    /// Consumes world events and emits the beats that became due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RevealStarted { chosen, true_match } => self.start(*chosen, *true_match),
                Event::PhaseChanged { .. } => {
                    if self.progress.take().is_some() {
                        log::debug!("reveal abandoned by phase change");
                    }
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
    }

    fn start(&mut self, chosen: CandidateId, true_match: CandidateId) {
        if self.progress.is_some() {
            log::warn!("reveal already running, ignoring restart");
            return;
        }
        let correct = chosen == true_match;
        log::debug!("reveal started, correct pick: {correct}");
        self.progress = Some(Progress {
            step: 0,
            elapsed: Duration::ZERO,
            correct,
        });
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        progress.elapsed = progress.elapsed.saturating_add(dt);

        while let Some(beat) = RevealBeat::ALL.get(progress.step).copied() {
            if beat == RevealBeat::SpotlightTrueMatch && progress.correct {
                progress.step += 1;
                continue;
            }

            let dwell = self.config.dwell[progress.step];
            if progress.elapsed < dwell {
                return;
            }
            progress.elapsed -= dwell;
            progress.step += 1;
            out.push(Command::RevealBeat { beat });
        }

        self.progress = None;
    }
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
