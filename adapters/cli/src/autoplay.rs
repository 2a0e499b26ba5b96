//! Scripted pair of players driving a headless session.

use std::time::Duration;

use lineup_core::{CandidateId, Event, Phase};
use lineup_session::FrameInput;
use lineup_system_selection::HitBox;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Intent {
    IntroEnded,
    AnyInput,
    DrawDone,
    Continue,
    Pick,
}

/// Two players who react to the show after human-ish delays.
#[derive(Debug)]
pub(crate) struct Autoplayer {
    rng: ChaCha8Rng,
    accuracy: f64,
    intro_length: Duration,
    pending: Vec<(Duration, Intent)>,
    true_match: Option<CandidateId>,
}

impl Autoplayer {
    /// `accuracy` is the probability that the guesser picks the true match.
    pub(crate) fn new(seed: u64, accuracy: f64, intro_length: Duration) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            intro_length,
            pending: Vec::new(),
            true_match: None,
        }
    }

    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PhaseChanged {
                    phase: Phase::Intro,
                } => self.plan(self.intro_length, Intent::IntroEnded),
                Event::PhaseChanged {
                    phase: Phase::Title,
                } => self.plan(Duration::from_millis(500), Intent::AnyInput),
                Event::DrawingInputChanged { enabled: true } => {
                    let sketching = self.rng.gen_range(8.0_f32..75.0);
                    self.plan(Duration::from_secs_f32(sketching), Intent::DrawDone);
                }
                Event::ContinueControlChanged { visible: true } => {
                    self.plan(Duration::from_millis(600), Intent::Continue);
                }
                Event::LineupInstalled { lineup, .. } => self.true_match = Some(lineup.correct()),
                Event::SelectionChanged { enabled: true } => {
                    let pondering = self.rng.gen_range(0.5_f32..3.0);
                    self.plan(Duration::from_secs_f32(pondering), Intent::Pick);
                }
                Event::GameOver { .. } => self.plan(Duration::from_secs(1), Intent::AnyInput),
                _ => {}
            }
        }
    }

    pub(crate) fn next_input(&mut self, dt: Duration, hit_boxes: &[HitBox]) -> FrameInput {
        let mut due = Vec::new();
        self.pending.retain_mut(|(remaining, intent)| {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                due.push(*intent);
                false
            } else {
                true
            }
        });

        let mut input = FrameInput::default();
        for intent in due {
            match intent {
                Intent::IntroEnded => input.intro_audio_ended = true,
                Intent::AnyInput => input.any_input = true,
                Intent::DrawDone => input.draw_done = true,
                Intent::Continue => input.continue_pressed = true,
                Intent::Pick => {
                    input.pointer = self.aim(hit_boxes);
                    input.primary_pressed = input.pointer.is_some();
                }
            }
        }
        input
    }

    fn plan(&mut self, delay: Duration, intent: Intent) {
        self.pending.push((delay, intent));
    }

    fn aim(&mut self, hit_boxes: &[HitBox]) -> Option<glam::Vec2> {
        let true_match = self.true_match?;
        let target = if hit_boxes.len() < 2 || self.rng.gen_bool(self.accuracy) {
            true_match
        } else {
            let decoys: Vec<_> = hit_boxes
                .iter()
                .map(HitBox::candidate)
                .filter(|candidate| *candidate != true_match)
                .collect();
            decoys[self.rng.gen_range(0..decoys.len())]
        };
        log::debug!(
            "guesser points at suspect #{} (true match #{})",
            target.get() + 1,
            true_match.get() + 1
        );
        hit_boxes
            .iter()
            .find(|hit_box| hit_box.candidate() == target)
            .map(HitBox::center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn stage() -> Vec<HitBox> {
        HitBox::row(3, Vec2::ZERO, Vec2::new(10.0, 10.0), 5.0)
    }

    #[test]
    fn intents_fire_after_their_delay() {
        let mut player = Autoplayer::new(1, 1.0, Duration::from_secs(2));
        player.observe(&[Event::PhaseChanged {
            phase: Phase::Intro,
        }]);

        assert_eq!(
            player.next_input(Duration::from_secs(1), &[]),
            FrameInput::default()
        );
        assert!(
            player
                .next_input(Duration::from_secs(1), &[])
                .intro_audio_ended
        );
    }

    #[test]
    fn perfect_guesser_aims_at_the_true_match() {
        let mut player = Autoplayer::new(9, 1.0, Duration::ZERO);
        player.true_match = Some(CandidateId::new(2));
        player.observe(&[Event::SelectionChanged { enabled: true }]);

        let input = player.next_input(Duration::from_secs(5), &stage());
        assert!(input.primary_pressed);
        assert_eq!(input.pointer, Some(stage()[2].center()));
    }

    #[test]
    fn hopeless_guesser_never_hits_the_true_match() {
        let mut player = Autoplayer::new(4, 0.0, Duration::ZERO);
        player.true_match = Some(CandidateId::new(1));
        for _ in 0..20 {
            let pointer = player.aim(&stage()).expect("lineup known");
            assert!(!stage()[1].contains(pointer));
        }
    }
}
