//! Frame-rate scaled weight smoothing.

/// Moves `previous` toward `target` by `clamp01(dt * speed)`.
///
/// The lerp factor is clamped, so the result never overshoots `target`
/// regardless of frame time. A zero speed or non-positive `dt` holds the
/// previous value.
#[inline]
pub fn smooth_weight(previous: f32, target: f32, dt: f32, speed: f32) -> f32 {
    let factor = (dt * speed).clamp(0.0, 1.0);
    previous + (target - previous) * factor
}

/// Smoothing state owned by a single IK channel.
///
/// Holds the value produced on the previous frame. Stops advancing when
/// the channel is not evaluated and resumes from the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightAccumulator {
    value: f32,
}

impl WeightAccumulator {
    /// Creates an accumulator starting at `value`, clamped to [0, 1]. NaN maps to 0.
    pub fn new(value: f32) -> Self {
        Self {
            value: unit(value),
        }
    }

    /// Returns the current smoothed value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advances toward `target` and returns the new value.
    pub fn advance(&mut self, target: f32, dt: f32, speed: f32) -> f32 {
        self.value = unit(smooth_weight(self.value, target, dt, speed));
        self.value
    }

    /// Stores an externally computed value, clamped to [0, 1]. NaN maps to 0.
    pub fn set(&mut self, value: f32) {
        self.value = unit(value);
    }

    /// Snaps back to zero.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_weight_partial_step() {
        let w = smooth_weight(0.0, 1.0, 0.1, 5.0);
        assert!((w - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_weight_clamps_factor() {
        // dt * speed = 10, clamped to a full step.
        assert_eq!(smooth_weight(0.2, 0.8, 1.0, 10.0), 0.8);
        // Negative time holds still.
        assert_eq!(smooth_weight(0.2, 0.8, -1.0, 10.0), 0.2);
    }

    #[test]
    fn test_accumulator_converges_without_overshoot() {
        let mut acc = WeightAccumulator::default();
        let mut last = acc.value();
        for _ in 0..200 {
            let v = acc.advance(0.7, 0.016, 4.0);
            assert!(v >= last);
            assert!(v <= 0.7 + 1e-6);
            last = v;
        }
        assert!((acc.value() - 0.7).abs() < 1e-3);
    }

    #[test]
    fn test_accumulator_decays() {
        let mut acc = WeightAccumulator::new(1.0);
        acc.advance(0.0, 0.1, 2.0);
        assert!((acc.value() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_accumulator_reset_and_clamp() {
        let mut acc = WeightAccumulator::new(3.0);
        assert_eq!(acc.value(), 1.0);
        acc.set(-2.0);
        assert_eq!(acc.value(), 0.0);
        acc.set(0.4);
        acc.reset();
        assert_eq!(acc.value(), 0.0);
    }

    #[test]
    fn test_accumulator_rejects_nan() {
        assert_eq!(WeightAccumulator::new(f32::NAN).value(), 0.0);

        let mut acc = WeightAccumulator::new(0.5);
        acc.set(f32::NAN);
        assert_eq!(acc.value(), 0.0);

        acc.set(0.5);
        assert_eq!(acc.advance(f32::NAN, 0.1, 4.0), 0.0);
        acc.advance(1.0, 1.0, 4.0);
        assert_eq!(acc.value(), 1.0);
    }
}
