//! Hand reach weighting.
//!
//! A hand reaches for its target only while the target is within
//! `reach_proximity_max` of the hand's current position. Inside that range
//! the weight grows as the hand gets closer and shrinks for targets lying
//! far to the side of the hips.

use crate::{ConfigError, HandReachConfig, HandSide, InputError, Transform, smooth_weight};
use glam::{Quat, Vec3};

/// Proximity falloff: 1 at zero distance, 0 at `reach_proximity_max`.
pub fn normalized_hand_weight(hand_dist: f32, reach_proximity_max: f32) -> f32 {
    1.0 - (hand_dist / reach_proximity_max).clamp(0.0, 1.0)
}

/// Signed lateral offset of `target` as seen from `hip_origin`.
///
/// Dot product of the (unit) hip right axis with the direction to the
/// target: +1 fully to the right, -1 fully to the left.
pub fn lateral_bias(hip_origin: Vec3, hip_right: Vec3, target: Vec3) -> f32 {
    let offset = target - hip_origin;
    // Rescaled first so huge offsets still normalize; overflow and zero give 0.
    let direction = (offset / offset.abs().max_element()).normalize_or_zero();
    hip_right.dot(direction)
}

/// Lateral damping factor for a hand.
///
/// The left hand sees the bias negated, which makes the two hands mirror
/// images of each other.
pub fn lateral_adjustment(bias: f32, side: HandSide) -> f32 {
    let signed = bias * side.sign();
    (1.0 - signed.abs()).clamp(0.0, 1.0)
}

/// Elbow hint forwarded to the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HintOverride {
    /// Hint position, passed through unchanged.
    pub position: Vec3,
    /// Hint weight, equal to the goal weight.
    pub weight: f32,
}

/// Per-frame hand input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReachInput {
    /// Which hand.
    pub side: HandSide,
    /// Current world position of the hand end effector.
    pub current_goal: Vec3,
    /// World-space reach target.
    pub target: Vec3,
    /// World-space target rotation.
    pub target_rotation: Quat,
    /// Lateral-bias origin (hip forward position).
    pub hip_origin: Vec3,
    /// Unit right axis of the hips.
    pub hip_right: Vec3,
    /// Optional elbow hint.
    pub hint: Option<Vec3>,
    /// Channel damper in [0, 1], applied after smoothing.
    pub weight_scale: f32,
    /// Blend rate override.
    pub speed: Option<f32>,
}

impl HandReachInput {
    /// Creates an input with no hint, full channel scale and the configured speed.
    pub fn new(side: HandSide, current_goal: Vec3, target: Vec3, target_rotation: Quat) -> Self {
        Self {
            side,
            current_goal,
            target,
            target_rotation,
            hip_origin: Vec3::ZERO,
            hip_right: Vec3::X,
            hint: None,
            weight_scale: 1.0,
            speed: None,
        }
    }

    /// Sets the lateral-bias frame.
    pub fn with_hips(mut self, hip_origin: Vec3, hip_right: Vec3) -> Self {
        self.hip_origin = hip_origin;
        self.hip_right = hip_right;
        self
    }

    /// Sets the lateral-bias frame from the hip bone's world transform.
    pub fn with_hip_transform(self, hips: &Transform, hip_offset: Vec3) -> Self {
        self.with_hips(hips.transform_point(hip_offset), hips.right())
    }

    /// Sets the elbow hint.
    pub fn with_hint(mut self, hint: Option<Vec3>) -> Self {
        self.hint = hint;
        self
    }

    /// Sets the channel damper.
    pub fn with_weight_scale(mut self, weight_scale: f32) -> Self {
        self.weight_scale = weight_scale;
        self
    }

    fn check(&self) -> Result<(), InputError> {
        let channel = self.side.channel();
        let vectors = [
            (self.current_goal, "current goal"),
            (self.target, "reach target"),
            (self.hip_origin, "hip origin"),
            (self.hip_right, "hip right"),
        ];
        for (value, field) in vectors {
            if !value.is_finite() {
                return Err(InputError::non_finite(channel, field));
            }
        }
        if !self.target_rotation.is_finite() {
            return Err(InputError::non_finite(channel, "target rotation"));
        }
        if !self.hint.is_none_or(|h| h.is_finite()) {
            return Err(InputError::non_finite(channel, "hint"));
        }
        if !self.weight_scale.is_finite() || !self.speed.is_none_or(f32::is_finite) {
            return Err(InputError::non_finite(channel, "channel scale"));
        }
        Ok(())
    }
}

/// Outcome of a hand reach evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReachResult {
    /// Which hand.
    pub side: HandSide,
    /// Final goal weight in [0, 1].
    pub weight: f32,
    /// Goal position override. `None` leaves the solver's position alone.
    pub position: Option<Vec3>,
    /// Goal rotation override. `None` leaves the solver's rotation alone.
    pub rotation: Option<Quat>,
    /// Elbow hint, present when a hint was supplied and the target is in reach.
    pub hint: Option<HintOverride>,
    /// Smoothed weight (before the channel damper) to carry into the next frame.
    pub smoothed: f32,
}

impl HandReachResult {
    /// Zero weight with no overrides; `smoothed` carries the given state.
    pub fn none(side: HandSide, smoothed: f32) -> Self {
        Self {
            side,
            weight: 0.0,
            position: None,
            rotation: None,
            hint: None,
            smoothed,
        }
    }

    /// Returns true if the reach gate rejected the target or input was invalid.
    pub fn is_gated(&self) -> bool {
        self.position.is_none()
    }

    /// Returns true if the solver should apply the elbow hint.
    pub fn apply_hint(&self) -> bool {
        self.hint.is_some()
    }
}

/// Validated hand reach configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReach {
    config: HandReachConfig,
}

impl HandReach {
    /// Validates `config`.
    pub fn new(config: HandReachConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &HandReachConfig {
        &self.config
    }

    /// Evaluates one frame, rejecting non-finite input.
    pub fn try_evaluate(
        &self,
        input: &HandReachInput,
        dt: f32,
        previous: f32,
    ) -> Result<HandReachResult, InputError> {
        input.check()?;
        if !dt.is_finite() {
            return Err(InputError::non_finite(input.side.channel(), "delta time"));
        }
        if !previous.is_finite() {
            return Err(InputError::non_finite(
                input.side.channel(),
                "previous weight",
            ));
        }

        let reach = self.config.reach_proximity_max;
        let hand_dist = input.current_goal.distance(input.target);
        if hand_dist > reach {
            // Hard gate: the solver falls back to the animated pose.
            return Ok(HandReachResult::none(input.side, 0.0));
        }

        let proximity = normalized_hand_weight(hand_dist, reach);
        let bias = lateral_bias(input.hip_origin, input.hip_right, input.target);
        let lateral = lateral_adjustment(bias, input.side);
        let target_weight = self.config.scale_weight * proximity * lateral;

        let speed = input.speed.unwrap_or(self.config.speed);
        let smoothed =
            smooth_weight(previous.clamp(0.0, 1.0), target_weight, dt, speed).clamp(0.0, 1.0);
        let weight = (smoothed * input.weight_scale.clamp(0.0, 1.0)).clamp(0.0, 1.0);

        Ok(HandReachResult {
            side: input.side,
            weight,
            position: Some(input.target),
            rotation: Some(input.target_rotation),
            hint: input.hint.map(|position| HintOverride { position, weight }),
            smoothed,
        })
    }

    /// Evaluates one frame; invalid input yields [`HandReachResult::none`]
    /// with the smoothing state unchanged.
    pub fn evaluate(&self, input: &HandReachInput, dt: f32, previous: f32) -> HandReachResult {
        self.try_evaluate(input, dt, previous).unwrap_or_else(|err| {
            log::debug!("skipping hand reach: {err}");
            HandReachResult::none(input.side, previous)
        })
    }
}

/// Computes the hand reach weight for one frame.
///
/// `previous` is the `smoothed` value returned on the previous frame.
pub fn evaluate_hand_reach(
    input: &HandReachInput,
    reach: &HandReach,
    dt: f32,
    previous: f32,
) -> HandReachResult {
    reach.evaluate(input, dt, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelKind;
    use proptest::prelude::*;

    fn reach(max: f32) -> HandReach {
        HandReach::new(HandReachConfig {
            reach_proximity_max: max,
            ..HandReachConfig::default()
        })
        .unwrap()
    }

    /// Target straight ahead of the hips so lateral damping is neutral.
    fn ahead_input(side: HandSide, hand_dist: f32) -> HandReachInput {
        let target = Vec3::new(0.0, 1.0, 1.0);
        HandReachInput::new(
            side,
            target - Vec3::new(0.0, 0.0, hand_dist),
            target,
            Quat::from_rotation_x(0.3),
        )
        .with_hips(Vec3::new(0.0, 1.0, 0.0), Vec3::X)
    }

    #[test]
    fn test_normalized_hand_weight_scenario() {
        assert_eq!(normalized_hand_weight(0.75, 1.5), 0.5);
        assert_eq!(normalized_hand_weight(0.0, 1.5), 1.0);
        assert_eq!(normalized_hand_weight(1.5, 1.5), 0.0);
    }

    #[test]
    fn test_out_of_reach_is_gated() {
        let r = evaluate_hand_reach(&ahead_input(HandSide::Right, 2.0), &reach(1.5), 0.016, 0.8);
        assert_eq!(r.weight, 0.0);
        assert_eq!(r.position, None);
        assert_eq!(r.rotation, None);
        assert!(!r.apply_hint());
        assert!(r.is_gated());
        assert_eq!(r.smoothed, 0.0);
    }

    #[test]
    fn test_in_reach_full_step() {
        let input = ahead_input(HandSide::Left, 0.75);
        let r = evaluate_hand_reach(&input, &reach(1.5), 1.0, 0.0);
        assert!((r.weight - 0.5).abs() < 1e-6);
        assert_eq!(r.position, Some(input.target));
        assert_eq!(r.rotation, Some(input.target_rotation));
        assert!(!r.is_gated());
    }

    #[test]
    fn test_weight_scale_applied_after_smoothing() {
        let input = ahead_input(HandSide::Right, 0.0).with_weight_scale(0.5);
        let r = evaluate_hand_reach(&input, &reach(1.5), 0.1, 0.0);
        // speed 4, dt 0.1: smoothed 0.4, scaled 0.2.
        assert!((r.smoothed - 0.4).abs() < 1e-6);
        assert!((r.weight - 0.2).abs() < 1e-6);

        let next = evaluate_hand_reach(&input, &reach(1.5), 0.1, r.smoothed);
        assert!((next.smoothed - 0.64).abs() < 1e-5);
        assert!((next.weight - 0.32).abs() < 1e-5);
    }

    #[test]
    fn test_hint_mirrors_weight() {
        let hint = Vec3::new(0.4, 1.2, -0.2);
        let input = ahead_input(HandSide::Right, 0.3).with_hint(Some(hint));
        let r = evaluate_hand_reach(&input, &reach(1.5), 0.05, 0.2);
        let h = r.hint.unwrap();
        assert_eq!(h.position, hint);
        assert_eq!(h.weight, r.weight);
    }

    #[test]
    fn test_lateral_bias_penalizes_side_reach() {
        let hips = Vec3::ZERO;
        let right = Vec3::X;
        assert_eq!(lateral_bias(hips, right, Vec3::new(2.0, 0.0, 0.0)), 1.0);
        assert_eq!(lateral_bias(hips, right, Vec3::new(-2.0, 0.0, 0.0)), -1.0);
        assert_eq!(lateral_bias(hips, right, Vec3::new(0.0, 0.0, 3.0)), 0.0);
        assert_eq!(lateral_bias(hips, right, hips), 0.0);

        assert_eq!(lateral_adjustment(1.0, HandSide::Right), 0.0);
        assert_eq!(lateral_adjustment(0.0, HandSide::Left), 1.0);
        assert!((lateral_adjustment(0.25, HandSide::Right) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_lateral_bias_with_huge_offsets() {
        let right = Vec3::X;
        let far = lateral_bias(Vec3::ZERO, right, Vec3::new(3e38, 0.0, 0.0));
        assert!((far - 1.0).abs() < 1e-6);
        let overflow = lateral_bias(Vec3::new(-3e38, 0.0, 0.0), right, Vec3::new(3e38, 0.0, 0.0));
        assert_eq!(overflow, 0.0);
    }

    #[test]
    fn test_hip_transform_frame() {
        let hips = Transform::from_translation_rotation(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::PI),
        );
        let input = HandReachInput::new(HandSide::Right, Vec3::ZERO, Vec3::Z, Quat::IDENTITY)
            .with_hip_transform(&hips, Vec3::new(0.0, 0.0, 0.2));
        assert!((input.hip_origin - Vec3::new(0.0, 1.0, -0.2)).length() < 1e-5);
        assert!((input.hip_right - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_non_finite_input_is_noop() {
        let mut input = ahead_input(HandSide::Right, 0.2);
        input.target_rotation = Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0);
        let err = reach(1.5).try_evaluate(&input, 0.016, 0.3).unwrap_err();
        assert_eq!(err.channel(), ChannelKind::RightHand);

        let r = evaluate_hand_reach(&input, &reach(1.5), 0.016, 0.3);
        assert_eq!(r, HandReachResult::none(HandSide::Right, 0.3));
    }

    fn hand_side() -> impl Strategy<Value = HandSide> {
        prop_oneof![Just(HandSide::Right), Just(HandSide::Left)]
    }

    proptest! {
        #[test]
        fn prop_lateral_adjustment_mirrors(bias in -2.0f32..2.0, side in hand_side()) {
            prop_assert_eq!(
                lateral_adjustment(bias, side),
                lateral_adjustment(-bias, side.mirror())
            );
        }

        #[test]
        fn prop_beyond_reach_always_gated(
            max in 0.1f32..5.0,
            extra in 0.001f32..10.0,
            previous in 0.0f32..1.0,
            side in hand_side(),
        ) {
            let input = ahead_input(side, max + extra).with_hint(Some(Vec3::ONE));
            let r = evaluate_hand_reach(&input, &reach(max), 0.016, previous);
            prop_assert_eq!(r.weight, 0.0);
            prop_assert!(r.position.is_none() && r.rotation.is_none() && r.hint.is_none());
        }

        #[test]
        fn prop_converges_monotonically(
            hand_dist in 0.0f32..1.5,
            dt in 0.001f32..0.1,
            scale in 0.0f32..1.0,
        ) {
            let r = reach(1.5);
            let input = ahead_input(HandSide::Right, hand_dist).with_weight_scale(scale);
            let target = normalized_hand_weight(input.current_goal.distance(input.target), 1.5);
            let mut previous = 0.0;
            for _ in 0..50 {
                let out = evaluate_hand_reach(&input, &r, dt, previous);
                prop_assert!(out.smoothed >= previous);
                prop_assert!(out.smoothed <= target + 1e-6);
                prop_assert!((0.0..=1.0).contains(&out.weight));
                previous = out.smoothed;
            }
        }
    }
}
