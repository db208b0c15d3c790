//! Blink Animation - Cursor opacity oscillation
//!
//! The cursor fades from fully opaque to transparent and back, forever, with
//! an ease-in-out curve. One half-cycle (1 → 0 or 0 → 1) lasts
//! `duration_ms`.
//!
//! The blinker holds no timer. It remembers when it started and computes the
//! opacity for any time the renderer samples, so it never interacts with the
//! typing timers and never touches text state.
//!
//! # Example
//!
//! ```
//! use spark_typewriter::state::animate::CursorBlinker;
//!
//! let mut blink = CursorBlinker::new(500);
//! blink.start(0);
//!
//! assert_eq!(blink.opacity_at(0), 1.0);
//! assert_eq!(blink.opacity_at(250), 0.5);
//! assert_eq!(blink.opacity_at(500), 0.0);
//! assert_eq!(blink.opacity_at(1000), 1.0);
//! ```

/// Quadratic ease-in-out on `t` in 0.0..=1.0.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Opacity oscillator for a cursor glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBlinker {
    duration_ms: u64,
    started_at: Option<u64>,
}

impl CursorBlinker {
    /// Blinker with the given half-cycle length. Zero disables blinking.
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms, started_at: None }
    }

    /// Start oscillating at `now` (ms). Starting twice keeps the first start.
    pub fn start(&mut self, now: u64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop oscillating; the cursor returns to fully opaque.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Whether the oscillation is running.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.duration_ms > 0
    }

    /// Half-cycle length in ms.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Cursor opacity at `now`, from 0.0 (hidden) to 1.0 (opaque).
    pub fn opacity_at(&self, now: u64) -> f32 {
        let Some(start) = self.started_at else {
            return 1.0;
        };
        if self.duration_ms == 0 {
            return 1.0;
        }

        let elapsed = now.saturating_sub(start);
        let half_cycle = elapsed / self.duration_ms;
        let progress = (elapsed % self.duration_ms) as f32 / self.duration_ms as f32;
        let eased = ease_in_out(progress);

        // Even half-cycles fade out, odd ones fade back in.
        if half_cycle % 2 == 0 { 1.0 - eased } else { eased }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out_shape() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
        assert_eq!(ease_in_out(-1.0), 0.0);
    }

    #[test]
    fn test_not_started_is_opaque() {
        let blink = CursorBlinker::new(500);
        assert!(!blink.is_running());
        assert_eq!(blink.opacity_at(12_345), 1.0);
    }

    #[test]
    fn test_oscillates_between_one_and_zero() {
        let mut blink = CursorBlinker::new(400);
        blink.start(100);

        assert_eq!(blink.opacity_at(100), 1.0);
        assert_eq!(blink.opacity_at(500), 0.0);
        assert_eq!(blink.opacity_at(900), 1.0);
        assert_eq!(blink.opacity_at(1300), 0.0);

        for t in (100..5000).step_by(37) {
            let o = blink.opacity_at(t);
            assert!((0.0..=1.0).contains(&o));
        }
    }

    #[test]
    fn test_fade_is_monotonic_within_half_cycle() {
        let mut blink = CursorBlinker::new(100);
        blink.start(0);
        let fading: Vec<f32> = (0..100).map(|t| blink.opacity_at(t)).collect();
        assert!(fading.windows(2).all(|w| w[1] <= w[0]));
        let rising: Vec<f32> = (100..200).map(|t| blink.opacity_at(t)).collect();
        assert!(rising.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_zero_duration_disables() {
        let mut blink = CursorBlinker::new(0);
        blink.start(0);
        assert!(!blink.is_running());
        assert_eq!(blink.opacity_at(10), 1.0);
    }

    #[test]
    fn test_restart_and_stop() {
        let mut blink = CursorBlinker::new(100);
        blink.start(0);
        blink.start(50);
        assert_eq!(blink.opacity_at(100), 0.0);
        blink.stop();
        assert_eq!(blink.opacity_at(100), 1.0);
    }
}
