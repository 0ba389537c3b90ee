#![cfg_attr(not(test), no_std)]

use adxl345_shared::Vector;

pub const DEFAULT_ALPHA: f32 = 0.5;

/// First order exponential smoothing, applied per axis.
///
/// `alpha` weights the new sample: 1.0 passes it through unchanged, 0.0 freezes
/// the output at the previous state.
#[derive(Copy, Clone, Debug, Default)]
pub struct LowPassFilter {
    state: Vector,
}

impl LowPassFilter {
    pub const fn new() -> Self {
        Self {
            state: Vector::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.state = Vector::ZERO;
    }

    pub fn state(&self) -> Vector {
        self.state
    }

    pub fn apply(&mut self, sample: Vector, alpha: f32) -> Vector {
        let keep = 1.0 - alpha;
        self.state = Vector {
            x: sample.x * alpha + self.state.x * keep,
            y: sample.y * alpha + self.state.y * keep,
            z: sample.z * alpha + self.state.z * keep,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Vector = Vector::new(10.0, 0.0, 0.0);

    #[test]
    fn alpha_one_passes_through() {
        let mut f = LowPassFilter::new();
        assert_eq!(f.apply(SAMPLE, 1.0), SAMPLE);
        assert_eq!(f.apply(Vector::new(-3.0, 2.0, 1.0), 1.0), Vector::new(-3.0, 2.0, 1.0));
    }

    #[test]
    fn alpha_zero_freezes() {
        let mut f = LowPassFilter::new();
        assert_eq!(f.apply(SAMPLE, 0.0), Vector::ZERO);

        f.apply(SAMPLE, 1.0);
        assert_eq!(f.apply(Vector::new(99.0, 99.0, 99.0), 0.0), SAMPLE);
    }

    #[test]
    fn default_alpha_converges() {
        let mut f = LowPassFilter::new();
        assert_eq!(f.apply(SAMPLE, DEFAULT_ALPHA), Vector::new(5.0, 0.0, 0.0));
        assert_eq!(f.apply(SAMPLE, DEFAULT_ALPHA), Vector::new(7.5, 0.0, 0.0));
        assert_eq!(f.state(), Vector::new(7.5, 0.0, 0.0));
    }

    #[test]
    fn reset_clears_state() {
        let mut f = LowPassFilter::new();
        f.apply(SAMPLE, 1.0);
        f.reset();
        assert_eq!(f.state(), Vector::ZERO);
    }
}
