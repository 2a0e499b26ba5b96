//! Routes world events to the attached collaborators.

use std::time::Duration;

use lineup_core::{Event, FaceConfiguration, Lineup};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    banner_text, AnimationChannel, AudioChannel, CandidateRig, ClipLibrary, FaceRig, TimerWidget,
    UiChange, UiSurface,
};

/// Event router owning the optional collaborators of a scene.
pub struct Presenter {
    clips: ClipLibrary,
    audio: Option<Box<dyn AudioChannel>>,
    animations: Option<Box<dyn AnimationChannel>>,
    ui: Option<Box<dyn UiSurface>>,
    portrait: FaceRig,
    candidates: Vec<CandidateRig>,
    timer: TimerWidget,
    rng: ChaCha8Rng,
}

impl Presenter {
    /// Creates a presenter with no collaborators; `music_seed` drives track choice.
    #[must_use]
    pub fn new(clips: ClipLibrary, music_seed: u64) -> Self {
        Self {
            clips,
            audio: None,
            animations: None,
            ui: None,
            portrait: FaceRig::new(),
            candidates: Vec::new(),
            timer: TimerWidget::default(),
            rng: ChaCha8Rng::seed_from_u64(music_seed),
        }
    }

    /// Attaches the audio channel.
    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioChannel>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Attaches the animation channel.
    #[must_use]
    pub fn with_animations(mut self, animations: Box<dyn AnimationChannel>) -> Self {
        self.animations = Some(animations);
        self
    }

    /// Attaches the widget layer.
    #[must_use]
    pub fn with_ui(mut self, ui: Box<dyn UiSurface>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Attaches the rig showing the portrait the drawing player sketches from.
    #[must_use]
    pub fn with_portrait(mut self, portrait: FaceRig) -> Self {
        self.portrait = portrait;
        self
    }

    /// Appends the rig of the next lineup position.
    #[must_use]
    pub fn with_candidate(mut self, rig: CandidateRig) -> Self {
        self.candidates.push(rig);
        self
    }

    /// Clip library used for cues and music.
    #[must_use]
    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }

    /// Timer widget state.
    #[must_use]
    pub fn timer(&self) -> &TimerWidget {
        &self.timer
    }

    /// Applies the presentation side of every event.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.present(event);
        }
    }

    /// Advances presentation-only animations.
    pub fn update(&mut self, dt: Duration) {
        if let Some(sprite) = self.timer.advance(dt) {
            self.ui(UiChange::TimerSprite(sprite));
        }
    }

    fn present(&mut self, event: &Event) {
        match event {
            Event::CuePlayed { cue } => match (self.clips.cue(*cue), self.audio.as_mut()) {
                (Some(clip), Some(audio)) => audio.play_one_shot(clip),
                (None, _) => log::debug!("no clip registered for {cue:?}"),
                (Some(_), None) => {}
            },
            Event::MusicStarted { mood } => {
                let track = self.clips.pick_track(*mood, &mut self.rng);
                match (track, self.audio.as_mut()) {
                    (Some(track), Some(audio)) => audio.play_music(track),
                    (None, _) => log::debug!("no {mood:?} music registered"),
                    (Some(_), None) => {}
                }
            }
            Event::MusicStopped => {
                if let Some(audio) = self.audio.as_mut() {
                    audio.stop_music();
                }
            }
            Event::AnimationRequested { animation } => {
                if let Some(animations) = self.animations.as_mut() {
                    animations.trigger(*animation);
                }
            }
            Event::LineupInstalled { lineup, target, .. } => self.dress(lineup, target),
            Event::TimerRingingChanged { ringing } => {
                let sprite = self.timer.set_ringing(*ringing);
                self.ui(UiChange::TimerSprite(sprite));
            }
            Event::DrawTimerChanged { seconds } => self.ui(UiChange::Timer(*seconds)),
            Event::TransitionOverlayChanged { visible } => self.ui(UiChange::Overlay(*visible)),
            Event::DrawingSurfaceChanged { visible } => {
                self.ui(UiChange::DrawingSurface(*visible));
            }
            Event::DrawingCleared => self.ui(UiChange::DrawingCleared),
            Event::DrawingInputChanged { enabled } => self.ui(UiChange::DrawingInput(*enabled)),
            Event::BannerShown { player, phase } => {
                self.ui(UiChange::Banner(Some(banner_text(*player, *phase))));
            }
            Event::BannerHidden => self.ui(UiChange::Banner(None)),
            Event::ContinueControlChanged { visible } => {
                self.ui(UiChange::ContinueVisible(*visible));
            }
            Event::HoverChanged { candidate } => self.ui(UiChange::HoverArrow(*candidate)),
            Event::ScreenShake { duration } => self.ui(UiChange::Shake(*duration)),
            Event::ChoiceAnnounced { candidate } => self.ui(UiChange::ChoiceAnnounced(*candidate)),
            Event::SpotlightMoved { candidate } => self.ui(UiChange::Spotlight(*candidate)),
            Event::VerdictRevealed { correct } => {
                self.ui(UiChange::Verdict { correct: *correct });
            }
            Event::CandidateCelebrating { candidate } => {
                self.ui(UiChange::Celebrating(*candidate));
            }
            Event::StrikesShown { count } => self.ui(UiChange::Strikes(*count)),
            Event::GameOver { misses } => self.ui(UiChange::GameOver { misses: *misses }),
            _ => {}
        }
    }

    fn dress(&mut self, lineup: &Lineup, target: &FaceConfiguration) {
        self.portrait.apply(target);
        if self.candidates.len() < lineup.len() {
            log::warn!(
                "{} candidates but only {} rigs attached",
                lineup.len(),
                self.candidates.len()
            );
        }
        for (rig, candidate) in self.candidates.iter_mut().zip(lineup.candidates()) {
            rig.apply(candidate);
        }
    }

    fn ui(&mut self, change: UiChange) {
        if let Some(ui) = self.ui.as_mut() {
            ui.apply(change);
        }
    }
}
