//! Draw-timer widget that rattles while the time's-up chime rings.

use std::time::Duration;

/// Interval between two horizontal flips of the ringing sprite.
pub const FLIP_INTERVAL: Duration = Duration::from_millis(50);

/// Sprite shown by the timer widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerSprite {
    /// Plain clock face.
    #[default]
    Idle,
    /// Ringing clock, mirrored horizontally when `flipped`.
    Ringing {
        /// Whether the sprite is mirrored.
        flipped: bool,
    },
}

/// Timer widget state.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerWidget {
    sprite: TimerSprite,
    elapsed: Duration,
}

impl TimerWidget {
    /// Sprite currently shown.
    #[must_use]
    pub const fn sprite(&self) -> TimerSprite {
        self.sprite
    }

    /// Switches between the idle and ringing sprites.
    pub fn set_ringing(&mut self, ringing: bool) -> TimerSprite {
        self.elapsed = Duration::ZERO;
        self.sprite = if ringing {
            TimerSprite::Ringing { flipped: false }
        } else {
            TimerSprite::Idle
        };
        self.sprite
    }

    /// Advances the flip animation, returning the new sprite when it changed.
    pub fn advance(&mut self, dt: Duration) -> Option<TimerSprite> {
        let TimerSprite::Ringing { flipped } = self.sprite else {
            return None;
        };

        self.elapsed = self.elapsed.saturating_add(dt);
        let mut flips = 0_u32;
        while self.elapsed >= FLIP_INTERVAL {
            self.elapsed -= FLIP_INTERVAL;
            flips += 1;
        }
        if flips % 2 == 0 {
            return None;
        }
        self.sprite = TimerSprite::Ringing { flipped: !flipped };
        Some(self.sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_never_flips() {
        let mut widget = TimerWidget::default();
        assert_eq!(widget.advance(Duration::from_secs(1)), None);
        assert_eq!(widget.sprite(), TimerSprite::Idle);
    }

    #[test]
    fn ringing_timer_flips_every_interval() {
        let mut widget = TimerWidget::default();
        let _ = widget.set_ringing(true);

        assert_eq!(widget.advance(Duration::from_millis(30)), None);
        assert_eq!(
            widget.advance(Duration::from_millis(20)),
            Some(TimerSprite::Ringing { flipped: true })
        );
        assert_eq!(
            widget.advance(Duration::from_millis(50)),
            Some(TimerSprite::Ringing { flipped: false })
        );
        assert_eq!(widget.advance(Duration::from_millis(100)), None);
        assert_eq!(widget.sprite(), TimerSprite::Ringing { flipped: false });
    }

    #[test]
    fn stopping_returns_to_idle() {
        let mut widget = TimerWidget::default();
        let _ = widget.set_ringing(true);
        let _ = widget.advance(FLIP_INTERVAL);
        assert_eq!(widget.set_ringing(false), TimerSprite::Idle);
    }
}
