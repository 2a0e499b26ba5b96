use std::time::Duration;

use lineup_core::{
    Animation, Candidate, CandidateId, Command, Cue, Event, FaceConfiguration, Lineup, MusicMood,
    Phase, Player, RevealBeat, Seed,
};
use lineup_world::{self as world, query, DeferredTask, GateState, Tuning, World};

const TRUE_MATCH: usize = 2;
const DECOY: usize = 4;

struct Harness {
    world: World,
}

impl Harness {
    fn new(tuning: Tuning) -> Self {
        Self {
            world: World::new(tuning),
        }
    }

    fn send(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn tick(&mut self, millis: u64) -> Vec<Event> {
        self.send(Command::Tick {
            dt: Duration::from_millis(millis),
        })
    }

    fn finish(&mut self, animation: Animation) -> Vec<Event> {
        self.send(Command::AnimationFinished { animation })
    }

    fn install(&mut self) -> Vec<Event> {
        let candidates = (0..5)
            .map(|index| Candidate::new(CandidateId::new(index), None, FaceConfiguration::blank()))
            .collect();
        self.send(Command::InstallLineup {
            seed: Seed::new(7),
            lineup: Lineup::new(candidates, CandidateId::new(TRUE_MATCH)),
            target: FaceConfiguration::blank(),
        })
    }

    fn reach_title(&mut self) {
        let _ = self.send(Command::BeginSession);
        let _ = self.send(Command::SkipIntro);
        let _ = self.tick(1_000);
        assert_eq!(query::phase(&self.world), Phase::Title);
    }

    /// Drives the curtain through a full close and open, installing a lineup
    /// when the new phase is the drawing phase.
    fn cycle_curtain(&mut self) -> Vec<Event> {
        let mut events = self.finish(Animation::CurtainClose);
        if query::phase(&self.world) == Phase::Draw {
            events.extend(self.install());
        }
        events.extend(self.send(Command::ContinuePressed));
        events.extend(self.finish(Animation::CurtainOpen));
        events
    }

    fn reach_first_draw(&mut self) {
        self.reach_title();
        let _ = self.send(Command::AnyInput);
        let _ = self.cycle_curtain();
        assert_eq!(query::phase(&self.world), Phase::Draw);
        assert!(query::drawing_active(&self.world));
    }

    fn reach_order(&mut self) -> Vec<Event> {
        let _ = self.send(Command::DrawDone);
        let _ = self.tick(2_000);
        assert_eq!(query::phase(&self.world), Phase::Transition);
        let events = self.cycle_curtain();
        assert_eq!(query::phase(&self.world), Phase::Order);
        let _ = self.tick(1_000);
        assert!(query::selection_enabled(&self.world));
        events
    }

    fn play_pick(&mut self, candidate: usize) -> Vec<Event> {
        let mut events = self.send(Command::ChooseCandidate {
            candidate: CandidateId::new(candidate),
        });
        events.extend(self.send(Command::CrusherImpact));
        events.extend(self.finish(Animation::Crush));
        for beat in [
            RevealBeat::AnnounceChoice,
            RevealBeat::SpotlightTrueMatch,
            RevealBeat::Verdict,
            RevealBeat::Reaction,
            RevealBeat::Conclude,
        ] {
            events.extend(self.send(Command::RevealBeat { beat }));
        }
        events
    }
}

fn quick_tuning() -> Tuning {
    Tuning {
        base_draw_time: 10.0,
        min_draw_time: 5.0,
        ..Tuning::default()
    }
}

fn cues(events: &[Event]) -> Vec<Cue> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::CuePlayed { cue } => Some(*cue),
            _ => None,
        })
        .collect()
}

#[test]
fn intro_skip_waits_for_grace_period() {
    let mut harness = Harness::new(Tuning::default());
    let events = harness.send(Command::BeginSession);
    assert!(cues(&events).contains(&Cue::IntroTheme));

    let _ = harness.send(Command::SkipIntro);
    let _ = harness.tick(500);
    assert_eq!(query::phase(&harness.world), Phase::Intro);

    let _ = harness.send(Command::IntroAudioEnded);
    let events = harness.tick(500);
    assert!(events.contains(&Event::PhaseChanged { phase: Phase::Title }));
}

#[test]
fn curtain_gates_the_swap_into_drawing() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_title();

    let events = harness.send(Command::AnyInput);
    assert!(events.contains(&Event::AnimationRequested {
        animation: Animation::CurtainClose
    }));
    assert_eq!(query::phase(&harness.world), Phase::Transition);
    assert_eq!(
        query::round_state(&harness.world).pending_phase(),
        Some(Phase::Draw)
    );
    assert!(query::input_locked(&harness.world));

    let events = harness.finish(Animation::CurtainClose);
    assert!(events.contains(&Event::PhaseChanged { phase: Phase::Draw }));
    assert!(events.contains(&Event::LineupRequested {
        round: 1,
        size: 5,
        decoy_budget: 8,
    }));
    assert!(events.contains(&Event::DrawTimerChanged { seconds: 60 }));
    assert!(events.contains(&Event::BannerShown {
        player: Player::One,
        phase: Phase::Draw,
    }));
    assert_eq!(query::gate_state(&harness.world), GateState::Closed);

    assert!(harness.finish(Animation::CurtainClose).is_empty());
}

#[test]
fn requests_are_ignored_while_the_curtain_moves() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_title();
    let _ = harness.send(Command::AnyInput);

    assert!(harness.send(Command::AnyInput).is_empty());
    assert!(harness.send(Command::DrawDone).is_empty());
    assert_eq!(query::gate_state(&harness.world), GateState::Closing);
}

#[test]
fn continue_is_held_until_the_lineup_arrives() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_title();
    let _ = harness.send(Command::AnyInput);
    let _ = harness.finish(Animation::CurtainClose);

    assert!(harness.send(Command::ContinuePressed).is_empty());

    let events = harness.install();
    assert!(matches!(events[..], [Event::LineupInstalled { .. }]));
    let events = harness.send(Command::ContinuePressed);
    assert!(events.contains(&Event::AnimationRequested {
        animation: Animation::CurtainOpen
    }));

    let events = harness.finish(Animation::CurtainOpen);
    assert!(events.contains(&Event::DrawingInputChanged { enabled: true }));
    assert!(events.contains(&Event::MusicStarted {
        mood: MusicMood::Draw
    }));
    assert!(!query::input_locked(&harness.world));
}

#[test]
fn lineup_outside_drawing_is_discarded() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_title();
    assert!(harness.install().is_empty());
    assert!(query::lineup(&harness.world).is_none());
}

#[test]
fn timer_chime_defers_the_lineup() {
    let mut harness = Harness::new(quick_tuning());
    harness.reach_first_draw();

    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(harness.tick(1_000));
    }
    assert!(cues(&events).contains(&Cue::Hurry));
    assert!(events.contains(&Event::DrawTimerChanged { seconds: 5 }));

    let mut events = Vec::new();
    for _ in 0..3 {
        events.extend(harness.tick(1_000));
    }
    assert!(cues(&events).contains(&Cue::TimesUp));
    assert!(events.contains(&Event::TimerRingingChanged { ringing: true }));
    assert_eq!(query::phase(&harness.world), Phase::Draw);
    assert!(query::drawing_active(&harness.world));
    assert!(query::is_scheduled(&harness.world, DeferredTask::EndDrawPhase));

    let events = harness.tick(1_000);
    assert!(!cues(&events).contains(&Cue::TimesUp));
    assert_eq!(query::phase(&harness.world), Phase::Draw);

    let events = harness.tick(1_000);
    assert!(events.contains(&Event::DrawingInputChanged { enabled: false }));
    assert!(events.contains(&Event::PhaseChanged {
        phase: Phase::Transition
    }));
    assert_eq!(
        query::round_state(&harness.world).pending_phase(),
        Some(Phase::Order)
    );
    assert_eq!(query::round_state(&harness.world).player(), Player::Two);
}

#[test]
fn done_plays_the_chime_once() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();

    let events = harness.send(Command::DrawDone);
    assert_eq!(cues(&events), vec![Cue::TimesUp]);
    assert!(events.contains(&Event::MusicStopped));
    assert!(!query::drawing_active(&harness.world));
    assert!(harness.send(Command::DrawDone).is_empty());

    let _ = harness.tick(1_000);
    assert_eq!(query::phase(&harness.world), Phase::Draw);
    let _ = harness.tick(1_000);
    assert_eq!(query::phase(&harness.world), Phase::Transition);
}

#[test]
fn done_after_the_chime_keeps_the_original_deadline() {
    let mut harness = Harness::new(quick_tuning());
    harness.reach_first_draw();
    for _ in 0..8 {
        let _ = harness.tick(1_000);
    }

    let events = harness.send(Command::DrawDone);
    assert!(cues(&events).is_empty());
    assert!(events.contains(&Event::DrawingInputChanged { enabled: false }));

    let _ = harness.tick(1_000);
    assert_eq!(query::phase(&harness.world), Phase::Draw);
    let _ = harness.tick(1_000);
    assert_eq!(query::phase(&harness.world), Phase::Transition);
}

#[test]
fn selection_unlocks_after_the_activation_delay() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.send(Command::DrawDone);
    let _ = harness.tick(2_000);
    let events = harness.cycle_curtain();
    assert!(events.contains(&Event::BannerShown {
        player: Player::Two,
        phase: Phase::Order,
    }));
    assert!(events.contains(&Event::MusicStarted {
        mood: MusicMood::Order
    }));

    let _ = harness.tick(500);
    assert!(!query::selection_enabled(&harness.world));
    let pick = Command::ChooseCandidate {
        candidate: CandidateId::new(0),
    };
    assert!(harness.send(pick.clone()).is_empty());

    let events = harness.tick(500);
    assert!(events.contains(&Event::SelectionChanged { enabled: true }));
    assert!(!harness.send(pick).is_empty());
}

#[test]
fn hover_tracks_known_candidates_only() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();

    let events = harness.send(Command::HoverCandidate {
        candidate: Some(CandidateId::new(1)),
    });
    assert_eq!(
        events,
        vec![Event::HoverChanged {
            candidate: Some(CandidateId::new(1))
        }]
    );
    assert!(harness
        .send(Command::HoverCandidate {
            candidate: Some(CandidateId::new(1)),
        })
        .is_empty());
    assert!(harness
        .send(Command::HoverCandidate {
            candidate: Some(CandidateId::new(9)),
        })
        .is_empty());
    assert_eq!(query::hovered(&harness.world), Some(CandidateId::new(1)));
}

#[test]
fn correct_pick_skips_spotlight_and_keeps_misses() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();

    let events = harness.play_pick(TRUE_MATCH);
    assert!(events.contains(&Event::CandidateChosen {
        candidate: CandidateId::new(TRUE_MATCH),
        correct: true,
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::SpotlightMoved { .. })));
    assert!(events.contains(&Event::VerdictRevealed { correct: true }));
    assert!(cues(&events).contains(&Cue::Cheer));
    assert!(events.contains(&Event::RevealConcluded));
    assert_eq!(query::round_state(&harness.world).misses(), 0);
    assert!(query::reveal_concluded(&harness.world));
}

#[test]
fn wrong_pick_spotlights_the_true_match_and_records_one_miss() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();

    let mut events = harness.send(Command::ChooseCandidate {
        candidate: CandidateId::new(DECOY),
    });
    events.extend(harness.send(Command::CrusherImpact));
    assert!(cues(&events).contains(&Cue::CrusherBonk));
    assert!(events.contains(&Event::ScreenShake {
        duration: Duration::from_millis(500)
    }));
    assert!(events.contains(&Event::DrawingSurfaceChanged { visible: false }));

    let events = harness.finish(Animation::Crush);
    assert_eq!(
        events,
        vec![Event::RevealStarted {
            chosen: CandidateId::new(DECOY),
            true_match: CandidateId::new(TRUE_MATCH),
        }]
    );
    assert!(harness.finish(Animation::Crush).is_empty());

    let _ = harness.send(Command::RevealBeat {
        beat: RevealBeat::AnnounceChoice,
    });
    let events = harness.send(Command::RevealBeat {
        beat: RevealBeat::SpotlightTrueMatch,
    });
    assert!(events.contains(&Event::SpotlightMoved {
        candidate: CandidateId::new(TRUE_MATCH)
    }));

    let verdict = Command::RevealBeat {
        beat: RevealBeat::Verdict,
    };
    let events = harness.send(verdict.clone());
    assert!(events.contains(&Event::MissRecorded { misses: 1 }));
    assert!(harness.send(verdict).is_empty());
    assert_eq!(query::round_state(&harness.world).misses(), 1);
}

#[test]
fn reveal_beats_only_play_in_sequence() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();

    let _ = harness.send(Command::ChooseCandidate {
        candidate: CandidateId::new(DECOY),
    });
    let _ = harness.finish(Animation::Crush);

    let play = |beat| Command::RevealBeat { beat };
    assert!(harness.send(play(RevealBeat::Conclude)).is_empty());
    assert!(!query::reveal_concluded(&harness.world));
    assert!(harness.send(Command::ContinuePressed).is_empty());
    assert_eq!(query::phase(&harness.world), Phase::Order);

    assert!(!harness.send(play(RevealBeat::AnnounceChoice)).is_empty());
    assert!(harness.send(play(RevealBeat::AnnounceChoice)).is_empty());
    assert!(harness.send(play(RevealBeat::Verdict)).is_empty());
    assert_eq!(query::round_state(&harness.world).misses(), 0);

    let _ = harness.send(play(RevealBeat::SpotlightTrueMatch));
    let events = harness.send(play(RevealBeat::Verdict));
    assert!(events.contains(&Event::MissRecorded { misses: 1 }));
}

#[test]
fn correct_pick_may_pass_over_the_spotlight() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();

    let _ = harness.send(Command::ChooseCandidate {
        candidate: CandidateId::new(TRUE_MATCH),
    });
    let _ = harness.finish(Animation::Crush);

    let mut events = Vec::new();
    for beat in [
        RevealBeat::AnnounceChoice,
        RevealBeat::Verdict,
        RevealBeat::Reaction,
        RevealBeat::Conclude,
    ] {
        events.extend(harness.send(Command::RevealBeat { beat }));
    }
    assert!(events.contains(&Event::VerdictRevealed { correct: true }));
    assert!(events.contains(&Event::RevealConcluded));
    assert!(query::reveal_concluded(&harness.world));
}

#[test]
fn continuing_after_the_reveal_advances_the_round() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();
    let _ = harness.reach_order();
    let _ = harness.play_pick(TRUE_MATCH);

    let events = harness.send(Command::ContinuePressed);
    assert!(events.contains(&Event::RoundAdvanced {
        round: 2,
        decoy_budget: 6,
    }));
    assert_eq!(
        query::round_state(&harness.world).pending_phase(),
        Some(Phase::Draw)
    );

    let events = harness.finish(Animation::CurtainClose);
    assert!(events.contains(&Event::DrawingCleared));
    assert!(events.contains(&Event::DrawTimerChanged { seconds: 55 }));
    assert!(events.contains(&Event::LineupRequested {
        round: 2,
        size: 5,
        decoy_budget: 6,
    }));
    assert!(events.contains(&Event::BannerShown {
        player: Player::Two,
        phase: Phase::Draw,
    }));
    assert!(query::lineup(&harness.world).is_none());
    assert!(query::chosen(&harness.world).is_none());
}

#[test]
fn game_over_follows_the_third_miss_at_the_next_curtain() {
    let mut harness = Harness::new(Tuning::default());
    harness.reach_first_draw();

    for round in 1..=3 {
        let _ = harness.reach_order();
        let events = harness.play_pick(DECOY);
        assert!(events.contains(&Event::MissRecorded { misses: round }));
        assert_eq!(query::phase(&harness.world), Phase::Order);

        let events = harness.send(Command::ContinuePressed);
        let advanced = events
            .iter()
            .any(|event| matches!(event, Event::RoundAdvanced { .. }));
        assert_eq!(advanced, round < 3);
        if round < 3 {
            let _ = harness.cycle_curtain();
            assert_eq!(query::phase(&harness.world), Phase::Draw);
        }
    }
    assert_eq!(query::round_state(&harness.world).round(), 3);

    let events = harness.finish(Animation::CurtainClose);
    assert!(events.contains(&Event::PhaseChanged {
        phase: Phase::GameOver
    }));
    assert!(events.contains(&Event::GameOver { misses: 3 }));

    assert!(harness.send(Command::ContinuePressed).is_empty());
    assert_eq!(harness.send(Command::AnyInput), vec![Event::ExitRequested]);
}
