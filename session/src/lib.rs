#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame pump wiring the world to the pure systems.
//!
//! Every frame turns the polled input into commands, applies them to the world
//! followed by a clock tick, and then feeds the resulting events to the lineup
//! builder and the reveal sequence until no system has anything left to say.
//! Pointer selection runs once per frame after that, against every event it has
//! not seen yet.

use std::time::Duration;

use glam::Vec2;
use lineup_core::{Animation, Command, Event};
use lineup_system_face_generation::FeatureTables;
use lineup_system_lineup::LineupBuilder;
use lineup_system_reveal::{Config as RevealConfig, Reveal};
use lineup_system_selection::{HitBox, Selection, SelectionInput};
use lineup_world::{self as world, Tuning, TuningError, World};

/// Intents polled from the input devices and presentation layer for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Player asked to skip the intro.
    pub skip_intro: bool,
    /// Intro jingle finished playing.
    pub intro_audio_ended: bool,
    /// Any key or button was pressed.
    pub any_input: bool,
    /// The drawing player pressed "done".
    pub draw_done: bool,
    /// The continue control was activated.
    pub continue_pressed: bool,
    /// Primary action pressed on this frame.
    pub primary_pressed: bool,
    /// Pointer position in stage space.
    pub pointer: Option<Vec2>,
    /// Animations that finished since the previous frame, in completion order.
    pub finished_animations: Vec<Animation>,
    /// The crusher reached its impact frame.
    pub crusher_impact: bool,
}

impl FrameInput {
    fn commands(&self, dt: Duration) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.intro_audio_ended {
            commands.push(Command::IntroAudioEnded);
        }
        if self.skip_intro {
            commands.push(Command::SkipIntro);
        }
        if self.any_input {
            commands.push(Command::AnyInput);
        }
        if self.draw_done {
            commands.push(Command::DrawDone);
        }
        if self.continue_pressed {
            commands.push(Command::ContinuePressed);
        }
        if self.crusher_impact {
            commands.push(Command::CrusherImpact);
        }
        commands.extend(
            self.finished_animations
                .iter()
                .map(|animation| Command::AnimationFinished {
                    animation: *animation,
                }),
        );
        commands.push(Command::Tick { dt });
        commands
    }

    fn selection(&self) -> SelectionInput {
        SelectionInput::new(self.primary_pressed, self.pointer)
    }
}

/// One playthrough from the intro to game over.
#[derive(Debug)]
pub struct Session {
    world: World,
    lineup: LineupBuilder,
    reveal: Reveal,
    selection: Selection,
    hit_boxes: Vec<HitBox>,
    selection_backlog: Vec<Event>,
}

impl Session {
    /// Creates a session from validated tuning, the feature tables and the
    /// seed driving every lineup of the session.
    pub fn new(
        tuning: Tuning,
        tables: FeatureTables,
        session_seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let reveal = Reveal::new(RevealConfig::new(tuning.reveal_dwell()));
        Ok(Self {
            world: World::new(tuning),
            lineup: LineupBuilder::new(tables, session_seed),
            reveal,
            selection: Selection::new(),
            hit_boxes: Vec::new(),
            selection_backlog: Vec::new(),
        })
    }

    /// Authoritative world, for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Replaces the stage rectangles used for pointer hit-testing.
    pub fn set_hit_boxes(&mut self, hit_boxes: Vec<HitBox>) {
        self.hit_boxes = hit_boxes;
    }

    /// Stage rectangles currently used for hit-testing.
    #[must_use]
    pub fn hit_boxes(&self) -> &[HitBox] {
        &self.hit_boxes
    }

    /// Starts the session at the intro.
    pub fn begin(&mut self, out_events: &mut Vec<Event>) {
        let produced = self.pump(vec![Command::BeginSession], out_events);
        self.selection_backlog.extend(produced);
    }

    /// Advances the session by one frame.
    pub fn step(&mut self, input: &FrameInput, dt: Duration, out_events: &mut Vec<Event>) {
        let produced = self.pump(input.commands(dt), out_events);

        let mut seen = std::mem::take(&mut self.selection_backlog);
        seen.extend(produced);
        let mut commands = Vec::new();
        self.selection
            .handle(&seen, &self.hit_boxes, input.selection(), &mut commands);

        if !commands.is_empty() {
            log::trace!("selection issued {} commands", commands.len());
        }
        self.selection_backlog = self.pump(commands, out_events);
    }

    fn pump(&mut self, mut commands: Vec<Command>, out_events: &mut Vec<Event>) -> Vec<Event> {
        let mut produced = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.lineup.handle(&events, &mut commands);
            self.reveal.handle(&events, &mut commands);
            produced.extend(events);
        }
        out_events.extend(produced.iter().cloned());
        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_commands_precede_the_tick() {
        let input = FrameInput {
            any_input: true,
            finished_animations: vec![Animation::CurtainClose],
            ..FrameInput::default()
        };
        let commands = input.commands(Duration::from_millis(16));
        assert_eq!(
            commands,
            vec![
                Command::AnyInput,
                Command::AnimationFinished {
                    animation: Animation::CurtainClose,
                },
                Command::Tick {
                    dt: Duration::from_millis(16),
                },
            ]
        );
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = Tuning {
            lineup_size: 0,
            ..Tuning::default()
        };
        let session = Session::new(tuning, FeatureTables::numbered(4, 2), 1);
        assert!(matches!(session, Err(TuningError::EmptyLineup)));
    }
}
