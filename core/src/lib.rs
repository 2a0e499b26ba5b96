#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Suspect Lineup engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and presentation layers react to. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of feature slots composing a face.
pub const SLOT_COUNT: usize = 9;

/// Seed driving a reproducible sequence of pseudo-random draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seed(i32);

impl Seed {
    /// Wraps the provided signed value into a seed.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying signed value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Expands the seed into the 64-bit state expected by seedable generators.
    ///
    /// The signed value is reinterpreted bit-for-bit so negative seeds map to
    /// distinct, stable states.
    #[must_use]
    pub const fn to_rng_state(&self) -> u64 {
        self.0 as u32 as u64
    }
}

/// Facial feature categories, in the fixed order used for seeded generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSlot {
    /// Eyes; always drawn from the pool.
    Eyes,
    /// Mouth; always drawn from the pool.
    Mouth,
    /// Ears; always drawn from the pool.
    Ears,
    /// Hair; blank with probability 0.24.
    Hair,
    /// Accessory such as glasses or a hat; blank with probability 0.50.
    Accessory,
    /// Beard; blank with probability 0.45.
    Beard,
    /// Moustache; blank with probability 0.42.
    Moustache,
    /// Eyebrows; always drawn from the pool.
    Eyebrows,
    /// Nose; always drawn from the pool.
    Nose,
}

impl FeatureSlot {
    /// Every slot in generation order. Reordering changes which asset a seed produces.
    pub const ALL: [FeatureSlot; SLOT_COUNT] = [
        FeatureSlot::Eyes,
        FeatureSlot::Mouth,
        FeatureSlot::Ears,
        FeatureSlot::Hair,
        FeatureSlot::Accessory,
        FeatureSlot::Beard,
        FeatureSlot::Moustache,
        FeatureSlot::Eyebrows,
        FeatureSlot::Nose,
    ];

    /// Zero-based position of the slot within [`FeatureSlot::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            FeatureSlot::Eyes => 0,
            FeatureSlot::Mouth => 1,
            FeatureSlot::Ears => 2,
            FeatureSlot::Hair => 3,
            FeatureSlot::Accessory => 4,
            FeatureSlot::Beard => 5,
            FeatureSlot::Moustache => 6,
            FeatureSlot::Eyebrows => 7,
            FeatureSlot::Nose => 8,
        }
    }

    /// Resolves a slot from its zero-based index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Probability that the slot resolves to blank, or `None` for mandatory features.
    #[must_use]
    pub const fn blank_probability(self) -> Option<f32> {
        match self {
            FeatureSlot::Hair => Some(0.24),
            FeatureSlot::Accessory => Some(0.50),
            FeatureSlot::Beard => Some(0.45),
            FeatureSlot::Moustache => Some(0.42),
            FeatureSlot::Eyes
            | FeatureSlot::Mouth
            | FeatureSlot::Ears
            | FeatureSlot::Eyebrows
            | FeatureSlot::Nose => None,
        }
    }

    /// Human readable label of the slot.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FeatureSlot::Eyes => "eyes",
            FeatureSlot::Mouth => "mouth",
            FeatureSlot::Ears => "ears",
            FeatureSlot::Hair => "hair",
            FeatureSlot::Accessory => "accessory",
            FeatureSlot::Beard => "beard",
            FeatureSlot::Moustache => "moustache",
            FeatureSlot::Eyebrows => "eyebrows",
            FeatureSlot::Nose => "nose",
        }
    }
}

/// Opaque reference to a sprite or other visual asset owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetHandle(u32);

impl AssetHandle {
    /// Creates a handle from its numeric identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric identifier of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Selected asset per feature slot. Every slot holds exactly one handle or blank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceConfiguration {
    assets: [Option<AssetHandle>; SLOT_COUNT],
}

impl FaceConfiguration {
    /// Face with every slot blank.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            assets: [None; SLOT_COUNT],
        }
    }

    /// Asset assigned to the provided slot, or `None` when blank.
    #[must_use]
    pub const fn get(&self, slot: FeatureSlot) -> Option<AssetHandle> {
        self.assets[slot.index()]
    }

    /// Replaces the asset assigned to the provided slot.
    pub fn set(&mut self, slot: FeatureSlot, asset: Option<AssetHandle>) {
        self.assets[slot.index()] = asset;
    }

    /// Iterates over every slot paired with its assignment, in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureSlot, Option<AssetHandle>)> + '_ {
        FeatureSlot::ALL
            .iter()
            .map(move |slot| (*slot, self.assets[slot.index()]))
    }

    /// Slots whose assignment differs from `other`.
    #[must_use]
    pub fn differing_slots(&self, other: &FaceConfiguration) -> Vec<FeatureSlot> {
        FeatureSlot::ALL
            .iter()
            .copied()
            .filter(|slot| self.get(*slot) != other.get(*slot))
            .collect()
    }
}

/// Position of a candidate within the lineup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(usize);

impl CandidateId {
    /// Creates an identifier referencing the provided lineup position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based lineup position.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// A single suspect shown in the lineup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    id: CandidateId,
    body: Option<AssetHandle>,
    face: FaceConfiguration,
}

impl Candidate {
    /// Creates a candidate with the provided body sprite and face.
    #[must_use]
    pub const fn new(id: CandidateId, body: Option<AssetHandle>, face: FaceConfiguration) -> Self {
        Self { id, body, face }
    }

    /// Lineup position of the candidate.
    #[must_use]
    pub const fn id(&self) -> CandidateId {
        self.id
    }

    /// Body sprite, chosen independently of the seeded face.
    #[must_use]
    pub const fn body(&self) -> Option<AssetHandle> {
        self.body
    }

    /// Face configuration of the candidate.
    #[must_use]
    pub const fn face(&self) -> &FaceConfiguration {
        &self.face
    }
}

/// Ordered candidates together with the position of the true match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lineup {
    candidates: Vec<Candidate>,
    correct: CandidateId,
}

impl Lineup {
    /// Assembles a lineup. `correct` must reference one of the candidates.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>, correct: CandidateId) -> Self {
        debug_assert!(
            correct.get() < candidates.len(),
            "correct index must reference a candidate"
        );
        Self {
            candidates,
            correct,
        }
    }

    /// Candidates in lineup order.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of candidates in the lineup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Reports whether the lineup holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Position of the candidate matching the target portrait.
    #[must_use]
    pub const fn correct(&self) -> CandidateId {
        self.correct
    }

    /// Looks up a candidate by position.
    #[must_use]
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id.get())
    }

    /// Candidate matching the target portrait.
    #[must_use]
    pub fn true_match(&self) -> Option<&Candidate> {
        self.candidate(self.correct)
    }

    /// Whether the provided candidate is the true match.
    #[must_use]
    pub fn is_true_match(&self, id: CandidateId) -> bool {
        id == self.correct
    }
}

/// Top-level phases of the round state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Intro jingle playing before the title card.
    Intro,
    /// Title card waiting for any input.
    Title,
    /// A player sketches the suspect portrait against the clock.
    Draw,
    /// The other player picks the suspect from the lineup.
    Order,
    /// The curtain is running between two phases.
    Transition,
    /// Terminal state reached once too many rounds were missed.
    GameOver,
}

/// Participants alternating between drawing and choosing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// First player.
    One,
    /// Second player.
    Two,
}

impl Player {
    /// The opposing player.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// One-based player number shown in banners.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// One-shot audio cues requested by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Jingle played during the intro.
    IntroTheme,
    /// Curtain closing.
    CurtainClose,
    /// Curtain opening.
    CurtainOpen,
    /// Warning that little drawing time remains.
    Hurry,
    /// Chime announcing the end of the drawing time.
    TimesUp,
    /// Crusher entering the stage.
    CrusherEnter,
    /// Crusher hitting the chosen candidate.
    CrusherBonk,
    /// Announcer presenting the chosen candidate.
    YouChose,
    /// Spotlight switching on.
    Spotlight,
    /// Verdict sting for a correct pick.
    Correct,
    /// Verdict sting for a wrong pick.
    Incorrect,
    /// Crowd cheering.
    Cheer,
    /// Crowd booing.
    Boo,
}

/// Music moods that select the track pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicMood {
    /// Music looping while a portrait is being sketched.
    Draw,
    /// Music looping while the lineup is on stage.
    Order,
}

/// Animations the core asks the presentation layer to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Curtain sweeping shut.
    CurtainClose,
    /// Curtain sweeping open.
    CurtainOpen,
    /// Crusher descending on the chosen candidate.
    Crush,
}

/// Beats of the reveal sequence, in the order they play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealBeat {
    /// Announces the chosen candidate.
    AnnounceChoice,
    /// Points the spotlight at the true match; only played after a wrong pick.
    SpotlightTrueMatch,
    /// Reveals whether the pick was correct.
    Verdict,
    /// Crowd reaction and, after a wrong pick, the true match celebrating.
    Reaction,
    /// Shows the strikes and the continue control.
    Conclude,
}

impl RevealBeat {
    /// Every beat in playback order.
    pub const ALL: [RevealBeat; 5] = [
        RevealBeat::AnnounceChoice,
        RevealBeat::SpotlightTrueMatch,
        RevealBeat::Verdict,
        RevealBeat::Reaction,
        RevealBeat::Conclude,
    ];
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts the session at the intro.
    BeginSession,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Player asked to skip the intro jingle.
    SkipIntro,
    /// The presentation layer finished playing the intro jingle.
    IntroAudioEnded,
    /// Any key or button was pressed.
    AnyInput,
    /// The drawing player declared the sketch finished.
    DrawDone,
    /// The continue control was activated.
    ContinuePressed,
    /// The pointer now hovers the provided candidate, or none.
    HoverCandidate {
        /// Hovered candidate.
        candidate: Option<CandidateId>,
    },
    /// The guesser picked a candidate.
    ChooseCandidate {
        /// Picked candidate.
        candidate: CandidateId,
    },
    /// The presentation layer finished playing an animation.
    AnimationFinished {
        /// Animation that completed.
        animation: Animation,
    },
    /// The crusher animation reached its impact frame.
    CrusherImpact,
    /// Installs a freshly generated lineup for the current round.
    InstallLineup {
        /// Seed used for the target portrait and the true match.
        seed: Seed,
        /// Generated candidates.
        lineup: Lineup,
        /// Face the drawing player sketches from.
        target: FaceConfiguration,
    },
    /// Plays the next beat of the reveal sequence.
    RevealBeat {
        /// Beat to play.
        beat: RevealBeat,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// The logical phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// A one-shot audio cue should play.
    CuePlayed {
        /// Cue to play.
        cue: Cue,
    },
    /// Background music for the provided mood should start.
    MusicStarted {
        /// Mood selecting the track pool.
        mood: MusicMood,
    },
    /// Background music should stop.
    MusicStopped,
    /// An animation should start playing.
    AnimationRequested {
        /// Animation to play.
        animation: Animation,
    },
    /// The transition overlay became visible or hidden.
    TransitionOverlayChanged {
        /// Whether the overlay is shown.
        visible: bool,
    },
    /// Global input lock toggled.
    InputLockChanged {
        /// Whether gameplay input is ignored.
        locked: bool,
    },
    /// A new lineup is needed for the round.
    LineupRequested {
        /// Round the lineup belongs to.
        round: u32,
        /// Number of candidates to generate.
        size: usize,
        /// Number of distinct slots each decoy mutates.
        decoy_budget: u32,
    },
    /// A lineup was installed and should be presented.
    LineupInstalled {
        /// Seed of the target portrait.
        seed: Seed,
        /// Installed candidates.
        lineup: Lineup,
        /// Target portrait shown to the drawing player.
        target: FaceConfiguration,
    },
    /// The displayed draw timer changed.
    DrawTimerChanged {
        /// Remaining whole seconds, rounded up.
        seconds: u32,
    },
    /// The draw timer started or stopped ringing.
    TimerRingingChanged {
        /// Whether the ringing sprite is shown.
        ringing: bool,
    },
    /// Drawing input was enabled or disabled.
    DrawingInputChanged {
        /// Whether strokes are recorded.
        enabled: bool,
    },
    /// The drawing surface was shown or hidden.
    DrawingSurfaceChanged {
        /// Whether the surface is visible.
        visible: bool,
    },
    /// Previously recorded strokes should be discarded.
    DrawingCleared,
    /// The between-phase banner is shown.
    BannerShown {
        /// Player the banner addresses.
        player: Player,
        /// Phase that is about to open.
        phase: Phase,
    },
    /// The between-phase banner is hidden.
    BannerHidden,
    /// The continue control was shown or hidden.
    ContinueControlChanged {
        /// Whether the control is shown.
        visible: bool,
    },
    /// Candidate selection was enabled or disabled.
    SelectionChanged {
        /// Whether the guesser may pick a candidate.
        enabled: bool,
    },
    /// The hovered candidate changed.
    HoverChanged {
        /// Hovered candidate, if any.
        candidate: Option<CandidateId>,
    },
    /// A candidate was picked.
    CandidateChosen {
        /// Picked candidate.
        candidate: CandidateId,
        /// Whether the pick is the true match.
        correct: bool,
    },
    /// The screen should shake briefly.
    ScreenShake {
        /// How long the shake lasts.
        duration: Duration,
    },
    /// The reveal sequence started.
    RevealStarted {
        /// Candidate the guesser picked.
        chosen: CandidateId,
        /// Candidate matching the portrait.
        true_match: CandidateId,
    },
    /// The chosen candidate was announced.
    ChoiceAnnounced {
        /// Announced candidate.
        candidate: CandidateId,
    },
    /// The spotlight moved to a candidate.
    SpotlightMoved {
        /// Lit candidate.
        candidate: CandidateId,
    },
    /// The verdict was revealed.
    VerdictRevealed {
        /// Whether the pick was correct.
        correct: bool,
    },
    /// The miss counter increased.
    MissRecorded {
        /// Accumulated misses.
        misses: u32,
    },
    /// A candidate started its celebratory idle animation.
    CandidateCelebrating {
        /// Celebrating candidate.
        candidate: CandidateId,
    },
    /// Strike indicators are shown.
    StrikesShown {
        /// Number of strikes displayed.
        count: u32,
    },
    /// The reveal sequence finished and waits for the continue control.
    RevealConcluded,
    /// A round completed and the next one was prepared.
    RoundAdvanced {
        /// New round number.
        round: u32,
        /// Decoy mutation budget for the new round.
        decoy_budget: u32,
    },
    /// The game ended.
    GameOver {
        /// Misses accumulated over the session.
        misses: u32,
    },
    /// The player asked to leave after the game ended.
    ExitRequested,
}
