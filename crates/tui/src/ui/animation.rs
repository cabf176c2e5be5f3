//! Panel reveal animation.
//!
//! A newly opened panel grows over a few frames driven by a polled timer.
//! With reduced motion the panel appears fully revealed and no timer is armed.

use std::time::{Duration, Instant};

use meganav_engine::Timer;

pub const REVEAL_FRAMES: u8 = 3;
pub const REVEAL_FRAME_DURATION: Duration = Duration::from_millis(40);

#[derive(Debug, Clone)]
pub struct Reveal {
    timer: Timer,
    frame: u8,
    reduced_motion: bool,
}

impl Reveal {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            timer: Timer::idle(),
            frame: REVEAL_FRAMES,
            reduced_motion,
        }
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.reduced_motion = reduced_motion;
        if reduced_motion {
            self.finish();
        }
    }

    /// Restarts the animation for a surface that just opened.
    pub fn start(&mut self, now: Instant) {
        if self.reduced_motion {
            self.finish();
            return;
        }
        self.frame = 1;
        self.timer.arm(now, REVEAL_FRAME_DURATION);
    }

    /// Advances one frame when due. Returns whether the frame changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) {
            return false;
        }
        self.frame = (self.frame + 1).min(REVEAL_FRAMES);
        if self.frame < REVEAL_FRAMES {
            self.timer.arm(now, REVEAL_FRAME_DURATION);
        }
        true
    }

    pub fn finish(&mut self) {
        self.timer.cancel();
        self.frame = REVEAL_FRAMES;
    }

    pub fn is_animating(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Rows of `height` visible at the current frame.
    pub fn visible_rows(&self, height: u16) -> u16 {
        let rows = u32::from(height) * u32::from(self.frame) / u32::from(REVEAL_FRAMES);
        (rows as u16).max(height.min(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_over_three_frames() {
        let t0 = Instant::now();
        let mut reveal = Reveal::new(false);
        reveal.start(t0);
        assert_eq!(reveal.visible_rows(9), 3);
        assert!(reveal.poll(t0 + REVEAL_FRAME_DURATION));
        assert_eq!(reveal.visible_rows(9), 6);
        assert!(reveal.poll(t0 + REVEAL_FRAME_DURATION * 2));
        assert_eq!(reveal.visible_rows(9), 9);
        assert!(!reveal.is_animating());
    }

    #[test]
    fn reduced_motion_never_arms_a_timer() {
        let mut reveal = Reveal::new(true);
        reveal.start(Instant::now());
        assert_eq!(reveal.next_deadline(), None);
        assert_eq!(reveal.visible_rows(7), 7);
    }

    #[test]
    fn enabling_reduced_motion_mid_animation_finishes() {
        let mut reveal = Reveal::new(false);
        reveal.start(Instant::now());
        reveal.set_reduced_motion(true);
        assert!(!reveal.is_animating());
        assert_eq!(reveal.visible_rows(4), 4);
    }
}
