//! Headless collaborators that narrate the show through the logger.
//!
//! Animations are simulated: each request finishes after a fixed length and
//! the crusher reports its impact frame part-way through, exactly as a real
//! presentation layer would report back.

use std::{cell::RefCell, rc::Rc, time::Duration};

use lineup_core::{Animation, AssetHandle, FeatureSlot};
use lineup_presentation::{
    AnimationChannel, AudioChannel, AudioClip, CandidateRig, FaceRig, PresentationSlot, UiChange,
    UiSurface,
};

use crate::manifest::Catalogue;

const CURTAIN_LENGTH: Duration = Duration::from_millis(900);
const CRUSH_LENGTH: Duration = Duration::from_millis(1_400);
const CRUSH_IMPACT: Duration = Duration::from_millis(800);

pub(crate) struct ConsoleAudio;

impl AudioChannel for ConsoleAudio {
    fn play_one_shot(&mut self, clip: &AudioClip) {
        log::info!("sfx: {} ({:.1}s)", clip.name(), clip.duration().as_secs_f32());
    }

    fn play_music(&mut self, clip: &AudioClip) {
        log::info!("music: {}", clip.name());
    }

    fn stop_music(&mut self) {
        log::info!("music stopped");
    }
}

pub(crate) struct ConsoleUi;

impl UiSurface for ConsoleUi {
    fn apply(&mut self, change: UiChange) {
        match change {
            UiChange::Banner(Some(text)) => log::info!("=== {text} ==="),
            UiChange::Timer(seconds) if seconds % 10 == 0 || seconds <= 5 => {
                log::info!("timer: {seconds}s");
            }
            UiChange::ChoiceAnnounced(candidate) => {
                log::info!("you chose suspect #{}", candidate.get() + 1);
            }
            UiChange::Spotlight(candidate) => {
                log::info!("the culprit was suspect #{}", candidate.get() + 1);
            }
            UiChange::Verdict { correct } => {
                log::info!("{}", if correct { "CORRECT!" } else { "WRONG!" });
            }
            UiChange::Strikes(count) => log::info!("strikes: {}", "X".repeat(count as usize)),
            UiChange::GameOver { misses } => log::info!("GAME OVER after {misses} misses"),
            other => log::trace!("ui: {other:?}"),
        }
    }
}

/// Sprite slot that logs the asset it shows.
struct ConsoleSlot {
    label: String,
    catalogue: Rc<Catalogue>,
}

impl PresentationSlot for ConsoleSlot {
    fn set_asset(&mut self, asset: Option<AssetHandle>) {
        let name = asset.map_or("blank", |handle| self.catalogue.name(handle));
        log::debug!("{}: {name}", self.label);
    }
}

fn face_rig(owner: &str, catalogue: &Rc<Catalogue>) -> FaceRig {
    FeatureSlot::ALL.into_iter().fold(FaceRig::new(), |rig, slot| {
        rig.with_slot(
            slot,
            Box::new(ConsoleSlot {
                label: format!("{owner} {}", slot.label()),
                catalogue: Rc::clone(catalogue),
            }),
        )
    })
}

pub(crate) fn portrait_rig(catalogue: &Rc<Catalogue>) -> FaceRig {
    face_rig("portrait", catalogue)
}

pub(crate) fn candidate_rig(index: usize, catalogue: &Rc<Catalogue>) -> CandidateRig {
    let owner = format!("suspect #{}", index + 1);
    CandidateRig::new()
        .with_body(Box::new(ConsoleSlot {
            label: format!("{owner} body"),
            catalogue: Rc::clone(catalogue),
        }))
        .with_face(face_rig(&owner, catalogue))
}

#[derive(Debug)]
struct Running {
    animation: Animation,
    elapsed: Duration,
    impact_reported: bool,
}

/// Animation playback simulated against the frame clock.
#[derive(Debug, Default)]
pub(crate) struct Stage {
    running: Vec<Running>,
}

/// Milestones reached by the simulated animations during one frame.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StageReport {
    pub(crate) finished: Vec<Animation>,
    pub(crate) crusher_impact: bool,
}

impl Stage {
    pub(crate) fn advance(&mut self, dt: Duration) -> StageReport {
        let mut report = StageReport::default();
        self.running.retain_mut(|running| {
            running.elapsed = running.elapsed.saturating_add(dt);
            if running.animation == Animation::Crush
                && !running.impact_reported
                && running.elapsed >= CRUSH_IMPACT
            {
                running.impact_reported = true;
                report.crusher_impact = true;
            }
            if running.elapsed >= length(running.animation) {
                report.finished.push(running.animation);
                false
            } else {
                true
            }
        });
        report
    }
}

fn length(animation: Animation) -> Duration {
    match animation {
        Animation::CurtainClose | Animation::CurtainOpen => CURTAIN_LENGTH,
        Animation::Crush => CRUSH_LENGTH,
    }
}

/// Animation channel feeding the shared [`Stage`].
pub(crate) struct StageChannel(pub(crate) Rc<RefCell<Stage>>);

impl AnimationChannel for StageChannel {
    fn trigger(&mut self, animation: Animation) {
        log::debug!("animation: {animation:?}");
        self.0.borrow_mut().running.push(Running {
            animation,
            elapsed: Duration::ZERO,
            impact_reported: false,
        });
    }
}
