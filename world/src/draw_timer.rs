//! Countdown for the drawing phase.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerSignal {
    /// Whole seconds shown to the players changed.
    Display(u32),
    /// Remaining time crossed the hurry threshold.
    Hurry,
    /// Remaining time crossed the chime length.
    Chime,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DrawTimer {
    remaining: Duration,
    displayed: u32,
    hurry_played: bool,
    chime_played: bool,
}

impl DrawTimer {
    pub(crate) fn reset(&mut self, duration: Duration) -> u32 {
        *self = Self {
            remaining: duration,
            displayed: whole_seconds(duration),
            hurry_played: false,
            chime_played: false,
        };
        self.displayed
    }

    pub(crate) fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Marks the chime as played, reporting whether this call was the first.
    pub(crate) fn claim_chime(&mut self) -> bool {
        !std::mem::replace(&mut self.chime_played, true)
    }

    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        hurry_threshold: Duration,
        chime_duration: Duration,
        out: &mut Vec<TimerSignal>,
    ) {
        self.remaining = self.remaining.saturating_sub(dt);

        let displayed = whole_seconds(self.remaining);
        if displayed != self.displayed {
            self.displayed = displayed;
            out.push(TimerSignal::Display(displayed));
        }
        if !self.hurry_played && self.remaining <= hurry_threshold {
            self.hurry_played = true;
            out.push(TimerSignal::Hurry);
        }
        if !self.chime_played && self.remaining <= chime_duration {
            out.push(TimerSignal::Chime);
        }
    }
}

/// Remaining seconds rounded up, as shown on the timer.
fn whole_seconds(duration: Duration) -> u32 {
    let seconds = duration.as_secs();
    let rounded = if duration.subsec_nanos() > 0 {
        seconds.saturating_add(1)
    } else {
        seconds
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
