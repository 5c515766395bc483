//! Fixed-step timing
//!
//! Frame time is converted into whole ticks. A long frame produces several
//! ticks on the next calls; ticks are never skipped.

/// Accumulator measured in ticks
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    rate: f32,
    accumulator: f32,
}

impl FixedStep {
    /// `rate` ticks per second
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            accumulator: 0.0,
        }
    }

    /// Add one frame's worth of time
    pub fn advance(&mut self, frame_secs: f32) {
        self.accumulator += frame_secs.max(0.0) * self.rate;
    }

    /// Consume one whole tick if available
    pub fn consume(&mut self) -> bool {
        if self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            true
        } else {
            false
        }
    }

    /// Fraction of a tick left over
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(step: &mut FixedStep) -> u32 {
        let mut ticks = 0;
        while step.consume() {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_catches_up_after_stall() {
        let mut step = FixedStep::new(60.0);
        step.advance(0.105);
        assert_eq!(drain(&mut step), 6);
        assert!(step.pending() < 1.0);
    }

    #[test]
    fn test_fractions_carry_over() {
        let mut step = FixedStep::new(60.0);
        let mut total = 0;
        for _ in 0..120 {
            step.advance(1.0 / 120.0);
            total += drain(&mut step);
        }
        assert!((59..=60).contains(&total));
    }
}
