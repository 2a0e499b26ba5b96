#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collaborator contracts and the event router for Suspect Lineup adapters.
//!
//! The core never touches sprites, sound or widgets directly. Adapters plug
//! implementations of the traits below into a [`Presenter`], which turns
//! world events into calls on whichever collaborators are present. Missing
//! collaborators are skipped silently so partial scenes keep working.

mod clips;
mod presenter;
mod rig;
mod timer;

use std::time::Duration;

use lineup_core::{Animation, AssetHandle, CandidateId, Phase, Player};

pub use self::clips::{AudioClip, ClipLibrary};
pub use self::presenter::Presenter;
pub use self::rig::{CandidateRig, FaceRig};
pub use self::timer::{TimerSprite, TimerWidget, FLIP_INTERVAL};

/// Visual slot that displays a single asset, or nothing.
pub trait PresentationSlot {
    /// Assigns the asset shown by the slot; `None` clears it.
    fn set_asset(&mut self, asset: Option<AssetHandle>);
}

/// Fire-and-forget audio playback.
pub trait AudioChannel {
    /// Plays a clip once.
    fn play_one_shot(&mut self, clip: &AudioClip);

    /// Starts looping a music track, replacing the current one.
    fn play_music(&mut self, clip: &AudioClip);

    /// Stops the music track, if any.
    fn stop_music(&mut self);
}

/// Requests animations from the presentation layer.
///
/// Completion is reported back through `Command::AnimationFinished`.
pub trait AnimationChannel {
    /// Starts playing the animation.
    fn trigger(&mut self, animation: Animation);
}

/// Change to the on-screen widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiChange {
    /// Shows the banner with the provided text, or hides it.
    Banner(Option<String>),
    /// Shows or hides the continue control.
    ContinueVisible(bool),
    /// Whole seconds shown on the draw timer.
    Timer(u32),
    /// Sprite shown by the draw timer.
    TimerSprite(TimerSprite),
    /// Shows or hides the curtain overlay that blocks input.
    Overlay(bool),
    /// Shows or hides the drawing surface.
    DrawingSurface(bool),
    /// Wipes every stroke from the drawing surface.
    DrawingCleared,
    /// Enables or disables stroke capture on the drawing surface.
    DrawingInput(bool),
    /// Points the hover arrow at a candidate, or hides it.
    HoverArrow(Option<CandidateId>),
    /// Announces the chosen candidate.
    ChoiceAnnounced(CandidateId),
    /// Moves the spotlight onto a candidate.
    Spotlight(CandidateId),
    /// Shows the verdict stamp.
    Verdict {
        /// Whether the pick was correct.
        correct: bool,
    },
    /// Plays a candidate's celebration idle.
    Celebrating(CandidateId),
    /// Shows one strike per accumulated miss.
    Strikes(u32),
    /// Shakes the screen.
    Shake(Duration),
    /// Shows the game-over screen.
    GameOver {
        /// Misses accumulated over the session.
        misses: u32,
    },
}

/// Widget layer receiving [`UiChange`]s.
pub trait UiSurface {
    /// Applies one change to the widgets.
    fn apply(&mut self, change: UiChange);
}

/// Text of the banner shown while the curtain is closed.
#[must_use]
pub fn banner_text(player: Player, phase: Phase) -> String {
    let action = match phase {
        Phase::Order => "Chooses",
        _ => "Draws",
    };
    format!("Player {} {action}!", player.number())
}
