#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Suspect Lineup headlessly.
//!
//! Two scripted players sit in front of console collaborators: sound and
//! widget changes are narrated through the logger and animations finish
//! after simulated lengths. The clock is simulated, so a whole session runs
//! as fast as the machine allows and replays identically for a given seed.

mod autoplay;
mod console;
mod manifest;

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use lineup_core::{Cue, Event};
use lineup_presentation::Presenter;
use lineup_session::{FrameInput, Session};
use lineup_system_selection::HitBox;
use lineup_world::{query, Tuning};

use crate::{
    autoplay::Autoplayer,
    console::{ConsoleAudio, ConsoleUi, Stage, StageChannel},
    manifest::Catalogue,
};

const SUSPECT_SIZE: Vec2 = Vec2::new(160.0, 320.0);
const SUSPECT_SPACING: f32 = 24.0;
const STAGE_ORIGIN: Vec2 = Vec2::new(64.0, 200.0);
const MAX_SIMULATED_TIME: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Debug, Parser)]
#[command(name = "suspect-lineup", about = "Plays Suspect Lineup with two scripted players")]
struct Args {
    /// Seed for lineups, music choice and the scripted players; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding tuning knobs.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// TOML asset manifest; the built-in catalogue is used when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Stop after this many completed rounds.
    #[arg(long)]
    max_rounds: Option<u32>,
    /// Probability that the guesser picks the true match.
    #[arg(long, default_value_t = 0.6, value_parser = parse_accuracy)]
    accuracy: f64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Log verbosity; `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn parse_accuracy(value: &str) -> Result<f64, String> {
    let accuracy: f64 = value
        .parse()
        .map_err(|error| format!("`{value}` is not a number: {error}"))?;
    if (0.0..=1.0).contains(&accuracy) {
        Ok(accuracy)
    } else {
        Err(format!("accuracy must lie within 0..=1, got {accuracy}"))
    }
}

/// Entry point for the Suspect Lineup command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let _ = env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .try_init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("session seed {seed}");

    let catalogue = match &args.assets {
        Some(path) => manifest::load_catalogue(path)?,
        None => manifest::parse_catalogue(manifest::BUILTIN_ASSETS)
            .context("built-in asset manifest is invalid")?,
    };
    let mut tuning = match &args.tuning {
        Some(path) => manifest::load_tuning(path)?,
        None => Tuning::default(),
    };
    if let Some(chime) = catalogue.clips.chime_duration() {
        tuning.chime_duration = chime.as_secs_f32();
    }

    let summary = play(&args, seed, tuning, Rc::new(catalogue))?;
    println!(
        "Played {} round(s), {} miss(es){}",
        summary.rounds_completed,
        summary.misses,
        if summary.game_over { ", game over" } else { "" }
    );
    Ok(())
}

struct Summary {
    rounds_completed: u32,
    misses: u32,
    game_over: bool,
}

fn play(args: &Args, seed: u64, tuning: Tuning, catalogue: Rc<Catalogue>) -> Result<Summary> {
    let lineup_size = tuning.lineup_size;
    let mut session = Session::new(tuning, catalogue.tables.clone(), seed)
        .context("tuning does not describe a playable session")?;

    let stage = Rc::new(RefCell::new(Stage::default()));
    let mut presenter = (0..lineup_size).fold(
        Presenter::new(catalogue.clips.clone(), seed)
            .with_audio(Box::new(ConsoleAudio))
            .with_animations(Box::new(StageChannel(Rc::clone(&stage))))
            .with_ui(Box::new(ConsoleUi))
            .with_portrait(console::portrait_rig(&catalogue)),
        |presenter, index| presenter.with_candidate(console::candidate_rig(index, &catalogue)),
    );

    let intro_length = catalogue
        .clips
        .cue(Cue::IntroTheme)
        .map_or(Duration::ZERO, |clip| clip.duration());
    let mut players = Autoplayer::new(seed.wrapping_add(1), args.accuracy, intro_length);

    let dt = Duration::from_secs(1) / args.fps;
    let mut elapsed = Duration::ZERO;
    let mut events = Vec::new();
    session.begin(&mut events);

    let mut game_over = false;
    loop {
        presenter.handle(&events);
        players.observe(&events);
        for event in &events {
            match event {
                Event::LineupInstalled { lineup, .. } => session.set_hit_boxes(HitBox::row(
                    lineup.len(),
                    STAGE_ORIGIN,
                    SUSPECT_SIZE,
                    SUSPECT_SPACING,
                )),
                Event::GameOver { .. } => game_over = true,
                _ => {}
            }
        }
        if events.contains(&Event::ExitRequested) {
            break;
        }

        let completed = query::round_state(session.world()).round() - 1;
        if args.max_rounds.is_some_and(|max| completed >= max) {
            log::info!("stopping after {completed} rounds");
            break;
        }
        if elapsed >= MAX_SIMULATED_TIME {
            log::warn!("session still running after {elapsed:?}, giving up");
            break;
        }

        let report = stage.borrow_mut().advance(dt);
        let input = FrameInput {
            finished_animations: report.finished,
            crusher_impact: report.crusher_impact,
            ..players.next_input(dt, session.hit_boxes())
        };

        events.clear();
        session.step(&input, dt, &mut events);
        presenter.update(dt);
        elapsed += dt;
    }

    let state = query::round_state(session.world());
    Ok(Summary {
        rounds_completed: state.round() - 1,
        misses: state.misses(),
        game_over,
    })
}
