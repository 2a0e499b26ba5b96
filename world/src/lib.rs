#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state for Suspect Lineup.
//!
//! The world owns every piece of session bookkeeping: the current and pending
//! phase, whose turn it is, the round counter, the draw timer, the miss
//! counter and the decoy budget. Phase swaps are gated by the curtain: a
//! change first closes the curtain, the swap happens once the close animation
//! reports back, and the new phase only becomes interactive after the open
//! animation reports back. Work that must wait is expressed as deferred tasks
//! that are invalidated whenever a newer phase change supersedes them.

mod draw_timer;
mod schedule;
mod transition;
mod tuning;

use std::time::Duration;

use lineup_core::{
    Animation, CandidateId, Command, Cue, Event, FaceConfiguration, Lineup, MusicMood, Phase,
    Player, RevealBeat, Seed,
};

use self::draw_timer::{DrawTimer, TimerSignal};
use self::schedule::Scheduler;
use self::transition::{GateSignal, TransitionGate};

pub use self::schedule::DeferredTask;
pub use self::transition::GateState;
pub use self::tuning::{Tuning, TuningError, MAX_DURATION_SECS, REVEAL_STEPS};

/// Round bookkeeping readable by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundState {
    phase: Phase,
    pending_phase: Option<Phase>,
    player: Player,
    round: u32,
    remaining_draw_time: Duration,
    misses: u32,
    decoy_budget: u32,
}

impl RoundState {
    fn new(tuning: &Tuning) -> Self {
        Self {
            phase: Phase::Intro,
            pending_phase: None,
            player: Player::One,
            round: 1,
            remaining_draw_time: tuning.draw_time_for_round(1),
            misses: 0,
            decoy_budget: tuning.decoy_budget_for_round(1),
        }
    }

    /// Phase currently active.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase waiting for the curtain to close, if a transition is in flight.
    #[must_use]
    pub const fn pending_phase(&self) -> Option<Phase> {
        self.pending_phase
    }

    /// Player addressed by the current phase.
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    /// One-based round number.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Drawing time left in the current round.
    #[must_use]
    pub const fn remaining_draw_time(&self) -> Duration {
        self.remaining_draw_time
    }

    /// Rounds missed so far in the session.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }

    /// Slots each decoy mutates in the current round.
    #[must_use]
    pub const fn decoy_budget(&self) -> u32 {
        self.decoy_budget
    }
}

/// Lineup installed for the current round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundLineup {
    seed: Seed,
    lineup: Lineup,
    target: FaceConfiguration,
}

impl RoundLineup {
    /// Seed of the target portrait.
    #[must_use]
    pub const fn seed(&self) -> Seed {
        self.seed
    }

    /// Candidates on stage.
    #[must_use]
    pub const fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    /// Portrait the drawing player sketches from.
    #[must_use]
    pub const fn target(&self) -> &FaceConfiguration {
        &self.target
    }
}

#[derive(Clone, Copy, Debug)]
struct RevealProgress {
    chosen: CandidateId,
    true_match: CandidateId,
    next_step: usize,
}

impl RevealProgress {
    fn correct(&self) -> bool {
        self.chosen == self.true_match
    }

    fn concluded(&self) -> bool {
        self.next_step >= RevealBeat::ALL.len()
    }

    /// Accepts `beat` only when it is the next step of the sequence. After a
    /// correct pick the spotlight step may be passed over.
    fn advance(&mut self, beat: RevealBeat) -> bool {
        let expected = RevealBeat::ALL.get(self.next_step).copied();
        let step = if self.correct()
            && expected == Some(RevealBeat::SpotlightTrueMatch)
            && beat != RevealBeat::SpotlightTrueMatch
        {
            self.next_step + 1
        } else {
            self.next_step
        };
        if RevealBeat::ALL.get(step) != Some(&beat) {
            return false;
        }
        self.next_step = step + 1;
        true
    }
}

/// Represents the authoritative Suspect Lineup session.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    state: RoundState,
    started: bool,
    input_locked: bool,
    gate: TransitionGate,
    scheduler: Scheduler,
    draw_timer: DrawTimer,
    drawing_active: bool,
    drawing_finished: bool,
    lineup: Option<RoundLineup>,
    selection_enabled: bool,
    hovered: Option<CandidateId>,
    chosen: Option<CandidateId>,
    reveal: Option<RevealProgress>,
    continue_visible: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl World {
    /// Creates a session waiting at the intro.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: RoundState::new(&tuning),
            tuning,
            started: false,
            input_locked: false,
            gate: TransitionGate::default(),
            scheduler: Scheduler::default(),
            draw_timer: DrawTimer::default(),
            drawing_active: false,
            drawing_finished: false,
            lineup: None,
            selection_enabled: false,
            hovered: None,
            chosen: None,
            reveal: None,
            continue_visible: false,
        }
    }

    fn begin_session(&mut self, out: &mut Vec<Event>) {
        if self.started {
            return;
        }
        self.started = true;
        out.push(Event::PhaseChanged { phase: Phase::Intro });
        out.push(Event::CuePlayed {
            cue: Cue::IntroTheme,
        });
    }

    fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        out.push(Event::TimeAdvanced { dt });

        for token in self.scheduler.advance(dt) {
            if self.scheduler.is_current(token) {
                self.run_task(token.task(), out);
            } else {
                log::trace!("dropping superseded {:?}", token.task());
            }
        }

        self.advance_draw_timer(dt, out);
    }

    fn run_task(&mut self, task: DeferredTask, out: &mut Vec<Event>) {
        log::debug!("running deferred {task:?} in {:?}", self.state.phase);
        match task {
            DeferredTask::EnterTitle => {
                if self.state.phase == Phase::Intro {
                    self.set_phase(Phase::Title, out);
                }
            }
            DeferredTask::EndDrawPhase => {
                if self.state.phase == Phase::Draw {
                    self.finish_drawing(out);
                    self.request_phase_change(Phase::Order, out);
                }
            }
            DeferredTask::ActivateSelection => {
                if self.state.phase == Phase::Order
                    && self.chosen.is_none()
                    && self.lineup.is_some()
                    && !self.selection_enabled
                {
                    self.selection_enabled = true;
                    out.push(Event::SelectionChanged { enabled: true });
                }
            }
        }
    }

    /// Skipping and the intro audio ending share one grace period; whichever
    /// arrives first schedules the title card.
    fn finish_intro(&mut self) {
        if !self.started
            || self.state.phase != Phase::Intro
            || self.scheduler.is_scheduled(DeferredTask::EnterTitle)
        {
            return;
        }
        self.scheduler
            .schedule(DeferredTask::EnterTitle, self.tuning.intro_grace());
    }

    fn any_input(&mut self, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Title || self.input_locked {
            return;
        }
        out.push(Event::DrawingSurfaceChanged { visible: true });
        self.request_phase_change(Phase::Draw, out);
    }

    fn advance_draw_timer(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Draw || !self.drawing_active || self.drawing_finished {
            return;
        }

        let mut signals = Vec::new();
        self.draw_timer.advance(
            dt,
            self.tuning.hurry_threshold(),
            self.tuning.chime_duration(),
            &mut signals,
        );
        self.state.remaining_draw_time = self.draw_timer.remaining();

        for signal in signals {
            match signal {
                TimerSignal::Display(seconds) => out.push(Event::DrawTimerChanged { seconds }),
                TimerSignal::Hurry => out.push(Event::CuePlayed { cue: Cue::Hurry }),
                TimerSignal::Chime => self.start_chime(out),
            }
        }
    }

    /// Plays the time's-up chime once per round and defers the phase switch
    /// until the chime has finished.
    fn start_chime(&mut self, out: &mut Vec<Event>) {
        if !self.draw_timer.claim_chime() {
            return;
        }
        out.push(Event::CuePlayed { cue: Cue::TimesUp });
        out.push(Event::TimerRingingChanged { ringing: true });
        let chime = self.tuning.chime_duration();
        log::debug!("time's up chime started, leaving draw phase in {chime:?}");
        self.scheduler.schedule(DeferredTask::EndDrawPhase, chime);
    }

    fn draw_done(&mut self, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Draw
            || !self.drawing_active
            || self.drawing_finished
            || self.input_locked
        {
            log::debug!("ignoring draw done in {:?}", self.state.phase);
            return;
        }
        self.finish_drawing(out);
        self.start_chime(out);
    }

    fn finish_drawing(&mut self, out: &mut Vec<Event>) {
        if self.drawing_finished {
            return;
        }
        self.drawing_finished = true;
        self.drawing_active = false;
        out.push(Event::DrawingInputChanged { enabled: false });
        out.push(Event::MusicStopped);
        self.state.player = self.state.player.other();
    }

    fn request_phase_change(&mut self, next: Phase, out: &mut Vec<Event>) {
        if !self.gate.request_close() {
            log::warn!(
                "phase change to {next:?} rejected while curtain is {:?}",
                self.gate.state()
            );
            return;
        }

        self.scheduler.invalidate();
        self.state.pending_phase = Some(next);
        if self.selection_enabled {
            self.selection_enabled = false;
            out.push(Event::SelectionChanged { enabled: false });
        }
        self.set_phase(Phase::Transition, out);
        self.set_input_locked(true, out);
        out.push(Event::TransitionOverlayChanged { visible: true });
        out.push(Event::AnimationRequested {
            animation: Animation::CurtainClose,
        });
        out.push(Event::CuePlayed {
            cue: Cue::CurtainClose,
        });
    }

    fn animation_finished(&mut self, animation: Animation, out: &mut Vec<Event>) {
        if animation == Animation::Crush {
            self.crush_finished(out);
            return;
        }

        match self.gate.notify(animation) {
            Some(GateSignal::Closed) => self.on_closed(out),
            Some(GateSignal::Opened) => self.on_opened(out),
            None => log::debug!("ignoring {animation:?} while curtain is {:?}", self.gate.state()),
        }
    }

    fn on_closed(&mut self, out: &mut Vec<Event>) {
        if self.state.misses >= self.tuning.game_over_misses {
            log::info!("game over after {} misses", self.state.misses);
            self.state.pending_phase = None;
            self.set_phase(Phase::GameOver, out);
            out.push(Event::GameOver {
                misses: self.state.misses,
            });
            return;
        }

        let Some(next) = self.state.pending_phase.take() else {
            log::warn!("curtain closed without a pending phase");
            return;
        };
        self.set_phase(next, out);
        if next == Phase::Draw {
            self.enter_draw(out);
        }

        self.continue_visible = true;
        out.push(Event::ContinueControlChanged { visible: true });
        out.push(Event::BannerShown {
            player: self.state.player,
            phase: next,
        });
    }

    fn enter_draw(&mut self, out: &mut Vec<Event>) {
        self.lineup = None;
        self.chosen = None;
        self.reveal = None;
        self.hovered = None;
        self.drawing_active = false;
        self.drawing_finished = false;

        out.push(Event::DrawingCleared);
        out.push(Event::DrawingSurfaceChanged { visible: true });

        let duration = self.tuning.draw_time_for_round(self.state.round);
        let seconds = self.draw_timer.reset(duration);
        self.state.remaining_draw_time = duration;
        out.push(Event::DrawTimerChanged { seconds });
        out.push(Event::TimerRingingChanged { ringing: false });

        out.push(Event::LineupRequested {
            round: self.state.round,
            size: self.tuning.lineup_size,
            decoy_budget: self.state.decoy_budget,
        });
    }

    fn continue_pressed(&mut self, out: &mut Vec<Event>) {
        if self.gate.state() == GateState::Closed {
            if self.state.phase == Phase::Draw && self.lineup.is_none() {
                log::warn!("holding the curtain until the lineup is installed");
                return;
            }
            self.continue_visible = false;
            out.push(Event::ContinueControlChanged { visible: false });
            out.push(Event::BannerHidden);
            if self.gate.request_open() {
                out.push(Event::AnimationRequested {
                    animation: Animation::CurtainOpen,
                });
                out.push(Event::CuePlayed {
                    cue: Cue::CurtainOpen,
                });
            }
            return;
        }

        let concluded = self.reveal.is_some_and(|progress| progress.concluded());
        if self.state.phase == Phase::Order
            && concluded
            && self.continue_visible
            && !self.input_locked
        {
            self.continue_visible = false;
            out.push(Event::ContinueControlChanged { visible: false });
            self.complete_round(out);
        }
    }

    fn complete_round(&mut self, out: &mut Vec<Event>) {
        // The closing curtain ends the session once the threshold is reached,
        // so the last round is never counted as completed.
        if self.state.misses < self.tuning.game_over_misses {
            self.state.round = self.state.round.saturating_add(1);
            self.state.decoy_budget = self.tuning.decoy_budget_for_round(self.state.round);
            out.push(Event::RoundAdvanced {
                round: self.state.round,
                decoy_budget: self.state.decoy_budget,
            });
        }
        self.request_phase_change(Phase::Draw, out);
    }

    fn on_opened(&mut self, out: &mut Vec<Event>) {
        self.set_input_locked(false, out);
        out.push(Event::TransitionOverlayChanged { visible: false });

        match self.state.phase {
            Phase::Draw => {
                self.drawing_active = true;
                out.push(Event::DrawingInputChanged { enabled: true });
                out.push(Event::MusicStarted {
                    mood: MusicMood::Draw,
                });
            }
            Phase::Order => {
                self.scheduler.schedule(
                    DeferredTask::ActivateSelection,
                    self.tuning.order_activation_delay(),
                );
                out.push(Event::MusicStarted {
                    mood: MusicMood::Order,
                });
            }
            _ => {}
        }
    }

    fn hover(&mut self, candidate: Option<CandidateId>, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Order || !self.selection_enabled {
            return;
        }
        let known = match (candidate, &self.lineup) {
            (None, _) => true,
            (Some(id), Some(installed)) => installed.lineup.candidate(id).is_some(),
            (Some(_), None) => false,
        };
        if !known || self.hovered == candidate {
            return;
        }
        self.hovered = candidate;
        out.push(Event::HoverChanged { candidate });
    }

    fn choose(&mut self, candidate: CandidateId, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Order
            || !self.selection_enabled
            || self.input_locked
            || self.chosen.is_some()
        {
            return;
        }
        let Some(installed) = &self.lineup else {
            return;
        };
        if installed.lineup.candidate(candidate).is_none() {
            log::warn!("ignoring pick of unknown candidate {}", candidate.get());
            return;
        }
        let correct = installed.lineup.is_true_match(candidate);

        self.chosen = Some(candidate);
        self.selection_enabled = false;
        out.push(Event::SelectionChanged { enabled: false });
        if self.hovered.take().is_some() {
            out.push(Event::HoverChanged { candidate: None });
        }
        out.push(Event::CandidateChosen { candidate, correct });
        out.push(Event::DrawingSurfaceChanged { visible: false });
        out.push(Event::AnimationRequested {
            animation: Animation::Crush,
        });
        out.push(Event::CuePlayed {
            cue: Cue::CrusherEnter,
        });
    }

    fn crusher_impact(&mut self, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Order || self.chosen.is_none() || self.reveal.is_some() {
            return;
        }
        out.push(Event::CuePlayed {
            cue: Cue::CrusherBonk,
        });
        out.push(Event::ScreenShake {
            duration: self.tuning.shake_duration(),
        });
    }

    fn crush_finished(&mut self, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Order || self.reveal.is_some() {
            return;
        }
        let (Some(chosen), Some(installed)) = (self.chosen, &self.lineup) else {
            return;
        };
        let true_match = installed.lineup.correct();
        self.reveal = Some(RevealProgress {
            chosen,
            true_match,
            next_step: 0,
        });
        out.push(Event::RevealStarted { chosen, true_match });
    }

    fn play_reveal_beat(&mut self, beat: RevealBeat, out: &mut Vec<Event>) {
        if self.state.phase != Phase::Order {
            return;
        }
        let Some(mut progress) = self.reveal else {
            return;
        };
        if !progress.advance(beat) {
            log::warn!("ignoring out-of-order reveal beat {beat:?}");
            return;
        }

        let correct = progress.correct();
        match beat {
            RevealBeat::AnnounceChoice => {
                out.push(Event::CuePlayed { cue: Cue::YouChose });
                out.push(Event::ChoiceAnnounced {
                    candidate: progress.chosen,
                });
            }
            RevealBeat::SpotlightTrueMatch => {
                if !correct {
                    out.push(Event::SpotlightMoved {
                        candidate: progress.true_match,
                    });
                    out.push(Event::CuePlayed { cue: Cue::Spotlight });
                }
            }
            RevealBeat::Verdict => {
                out.push(Event::VerdictRevealed { correct });
                out.push(Event::CuePlayed {
                    cue: if correct { Cue::Correct } else { Cue::Incorrect },
                });
                if !correct {
                    self.record_miss(out);
                }
            }
            RevealBeat::Reaction => {
                out.push(Event::CuePlayed {
                    cue: if correct { Cue::Cheer } else { Cue::Boo },
                });
                if !correct {
                    out.push(Event::CandidateCelebrating {
                        candidate: progress.true_match,
                    });
                }
                out.push(Event::DrawingSurfaceChanged { visible: true });
            }
            RevealBeat::Conclude => {
                if !correct {
                    out.push(Event::StrikesShown {
                        count: self.state.misses,
                    });
                }
                self.continue_visible = true;
                out.push(Event::ContinueControlChanged { visible: true });
                out.push(Event::RevealConcluded);
            }
        }
        self.reveal = Some(progress);
    }

    fn record_miss(&mut self, out: &mut Vec<Event>) {
        self.state.misses = self
            .state
            .misses
            .saturating_add(1)
            .min(self.tuning.game_over_misses);
        log::info!("miss recorded, {} so far", self.state.misses);
        out.push(Event::MissRecorded {
            misses: self.state.misses,
        });
    }

    fn install_lineup(
        &mut self,
        seed: Seed,
        lineup: Lineup,
        target: FaceConfiguration,
        out: &mut Vec<Event>,
    ) {
        if self.state.phase != Phase::Draw || self.lineup.is_some() || lineup.is_empty() {
            log::debug!("discarding lineup built from seed {}", seed.get());
            return;
        }
        out.push(Event::LineupInstalled {
            seed,
            lineup: lineup.clone(),
            target,
        });
        self.lineup = Some(RoundLineup {
            seed,
            lineup,
            target,
        });
    }

    fn set_phase(&mut self, phase: Phase, out: &mut Vec<Event>) {
        if self.state.phase == phase {
            return;
        }
        log::debug!("phase {:?} -> {phase:?}", self.state.phase);
        self.state.phase = phase;
        out.push(Event::PhaseChanged { phase });
    }

    fn set_input_locked(&mut self, locked: bool, out: &mut Vec<Event>) {
        if self.input_locked == locked {
            return;
        }
        self.input_locked = locked;
        out.push(Event::InputLockChanged { locked });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state.phase == Phase::GameOver {
        match command {
            Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
            Command::AnyInput => out_events.push(Event::ExitRequested),
            _ => {}
        }
        return;
    }

    match command {
        Command::BeginSession => world.begin_session(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SkipIntro | Command::IntroAudioEnded => world.finish_intro(),
        Command::AnyInput => world.any_input(out_events),
        Command::DrawDone => world.draw_done(out_events),
        Command::ContinuePressed => world.continue_pressed(out_events),
        Command::HoverCandidate { candidate } => world.hover(candidate, out_events),
        Command::ChooseCandidate { candidate } => world.choose(candidate, out_events),
        Command::AnimationFinished { animation } => world.animation_finished(animation, out_events),
        Command::CrusherImpact => world.crusher_impact(out_events),
        Command::InstallLineup {
            seed,
            lineup,
            target,
        } => world.install_lineup(seed, lineup, target, out_events),
        Command::RevealBeat { beat } => world.play_reveal_beat(beat, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lineup_core::{CandidateId, Phase};

    use super::{DeferredTask, GateState, RoundLineup, RoundState, Tuning, World};

    /// Round bookkeeping snapshot.
    #[must_use]
    pub fn round_state(world: &World) -> &RoundState {
        &world.state
    }

    /// Phase currently active.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.state.phase
    }

    /// Tuning the session was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Whether gameplay input is ignored while the curtain runs.
    #[must_use]
    pub fn input_locked(world: &World) -> bool {
        world.input_locked
    }

    /// Current curtain state.
    #[must_use]
    pub fn gate_state(world: &World) -> GateState {
        world.gate.state()
    }

    /// Lineup installed for the current round, if any.
    #[must_use]
    pub fn lineup(world: &World) -> Option<&RoundLineup> {
        world.lineup.as_ref()
    }

    /// Whether the guesser may currently pick a candidate.
    #[must_use]
    pub fn selection_enabled(world: &World) -> bool {
        world.selection_enabled
    }

    /// Candidate under the pointer, if any.
    #[must_use]
    pub fn hovered(world: &World) -> Option<CandidateId> {
        world.hovered
    }

    /// Candidate picked this round, if any.
    #[must_use]
    pub fn chosen(world: &World) -> Option<CandidateId> {
        world.chosen
    }

    /// Whether strokes are currently recorded.
    #[must_use]
    pub fn drawing_active(world: &World) -> bool {
        world.drawing_active
    }

    /// Whether the continue control is shown.
    #[must_use]
    pub fn continue_visible(world: &World) -> bool {
        world.continue_visible
    }

    /// Whether the reveal sequence of the current round has finished.
    #[must_use]
    pub fn reveal_concluded(world: &World) -> bool {
        world.reveal.is_some_and(|progress| progress.concluded())
    }

    /// Whether a deferred task is waiting to run.
    #[must_use]
    pub fn is_scheduled(world: &World, task: DeferredTask) -> bool {
        world.scheduler.is_scheduled(task)
    }
}
