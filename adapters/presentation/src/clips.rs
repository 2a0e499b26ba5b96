//! Audio clips keyed by cue and music mood.

use std::{collections::HashMap, time::Duration};

use lineup_core::{Cue, MusicMood};
use rand::Rng;

/// Named audio clip with a known length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    name: String,
    duration: Duration,
}

impl AudioClip {
    /// Creates a clip descriptor.
    #[must_use]
    pub fn new<T>(name: T, duration: Duration) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            duration,
        }
    }

    /// Clip identifier understood by the audio backend.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Clips available to the presenter.
#[derive(Clone, Debug, Default)]
pub struct ClipLibrary {
    cues: HashMap<Cue, AudioClip>,
    music: HashMap<MusicMood, Vec<AudioClip>>,
}

impl ClipLibrary {
    /// Creates an empty library; every cue is silent until registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the clip played for `cue`, replacing an earlier one.
    #[must_use]
    pub fn with_cue(mut self, cue: Cue, clip: AudioClip) -> Self {
        let _ = self.cues.insert(cue, clip);
        self
    }

    /// Adds a track to the pool of `mood`.
    #[must_use]
    pub fn with_track(mut self, mood: MusicMood, clip: AudioClip) -> Self {
        self.music.entry(mood).or_default().push(clip);
        self
    }

    /// Clip registered for `cue`.
    #[must_use]
    pub fn cue(&self, cue: Cue) -> Option<&AudioClip> {
        self.cues.get(&cue)
    }

    /// Length of the time's-up chime, which decides when drawing ends.
    #[must_use]
    pub fn chime_duration(&self) -> Option<Duration> {
        self.cue(Cue::TimesUp).map(AudioClip::duration)
    }

    /// Tracks registered for `mood`.
    #[must_use]
    pub fn tracks(&self, mood: MusicMood) -> &[AudioClip] {
        self.music.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Picks a random track of `mood`.
    pub fn pick_track<R>(&self, mood: MusicMood, rng: &mut R) -> Option<&AudioClip>
    where
        R: Rng + ?Sized,
    {
        let tracks = self.tracks(mood);
        if tracks.is_empty() {
            return None;
        }
        tracks.get(rng.gen_range(0..tracks.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn chime_duration_follows_the_times_up_clip() {
        let library = ClipLibrary::new();
        assert_eq!(library.chime_duration(), None);

        let library = library.with_cue(
            Cue::TimesUp,
            AudioClip::new("times_up", Duration::from_millis(2_400)),
        );
        assert_eq!(library.chime_duration(), Some(Duration::from_millis(2_400)));
    }

    #[test]
    fn picks_only_from_the_requested_mood() {
        let library = ClipLibrary::new()
            .with_track(MusicMood::Draw, AudioClip::new("sketchy", Duration::from_secs(90)))
            .with_track(MusicMood::Draw, AudioClip::new("doodle", Duration::from_secs(80)));
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let track = library
                .pick_track(MusicMood::Draw, &mut rng)
                .expect("draw pool is populated");
            assert!(["sketchy", "doodle"].contains(&track.name()));
        }
        assert!(library.pick_track(MusicMood::Order, &mut rng).is_none());
    }
}
