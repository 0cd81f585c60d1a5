//! Head look-at weighting.
//!
//! The look weight averages two falloffs inside a cone opening from a pivot
//! on the head:
//! - an angular term, full inside `min_angle_full_tracking` and zero past
//!   `max_angle_dropoff`, smoothed over time;
//! - a distance term, full at the pivot and zero at the cone's slant edge.

use crate::{ChannelKind, ConfigError, HeadLookConfig, InputError, Transform, smooth_weight};
use glam::Vec3;

/// Slant length of the look cone.
///
/// Solves the right triangle with height `cone_height` and apex half-angle
/// `max_angle_dropoff` (degrees) by the law of sines.
pub fn cone_hypotenuse(cone_height: f32, max_angle_dropoff: f32) -> f32 {
    cone_height / (90.0 - max_angle_dropoff).to_radians().sin() * 90.0_f32.to_radians().sin()
}

/// Distance falloff: 1 at the pivot, 0 at or beyond `hypotenuse`.
///
/// A non-positive or non-finite hypotenuse yields 0.
pub fn normalized_distance(hypotenuse: f32, distance: f32) -> f32 {
    if !hypotenuse.is_finite() || hypotenuse <= 0.0 {
        return 0.0;
    }
    ((hypotenuse - distance) / hypotenuse).clamp(0.0, 1.0)
}

/// Angular falloff: 1 at or below `min_full_tracking`, 0 at or above `max_dropoff`.
///
/// Callers guarantee `max_dropoff > min_full_tracking`.
pub fn normalized_angle(angle: f32, min_full_tracking: f32, max_dropoff: f32) -> f32 {
    1.0 - ((angle - min_full_tracking) / (max_dropoff - min_full_tracking)).clamp(0.0, 1.0)
}

/// Unsigned angle in degrees between `forward` and `to_target`.
///
/// A target sitting on the pivot counts as straight ahead.
fn look_angle(forward: Vec3, to_target: Vec3) -> f32 {
    if to_target.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    // Rescaled so the squared lengths inside `angle_between` stay finite.
    let forward = forward / forward.abs().max_element();
    let to_target = to_target / to_target.abs().max_element();
    forward.angle_between(to_target).to_degrees().clamp(0.0, 180.0)
}

/// World-space look pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    /// Pivot position.
    pub position: Vec3,
    /// Unit forward direction.
    pub forward: Vec3,
}

/// Per-frame head input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadLookInput {
    /// Look pivot.
    pub pivot: Pivot,
    /// World-space look target.
    pub target: Vec3,
    /// Channel damper in [0, 1], multiplied into the configured scale weight.
    pub weight_scale: f32,
    /// Blend rate override.
    pub speed: Option<f32>,
}

impl HeadLookInput {
    /// Creates an input with full channel scale and the configured speed.
    pub fn new(pivot_position: Vec3, pivot_forward: Vec3, target: Vec3) -> Self {
        Self {
            pivot: Pivot {
                position: pivot_position,
                forward: pivot_forward,
            },
            target,
            weight_scale: 1.0,
            speed: None,
        }
    }
}

/// Outcome of a head look evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadLookResult {
    /// Final look-at weight in [0, 1].
    pub weight: f32,
    /// Look-at position to hand to the solver, present when `weight > 0`.
    pub look_at: Option<Vec3>,
    /// Smoothed angular weight to carry into the next frame.
    pub cone_weight: f32,
    /// Unsmoothed angular falloff.
    pub normalized_angle: f32,
    /// Distance falloff.
    pub normalized_distance: f32,
}

impl HeadLookResult {
    /// Zero weight, no look-at, smoothing state carried unchanged.
    pub fn none(previous: f32) -> Self {
        Self {
            weight: 0.0,
            look_at: None,
            cone_weight: previous,
            normalized_angle: 0.0,
            normalized_distance: 0.0,
        }
    }

    /// Returns true if the solver should apply the look-at.
    pub fn should_apply(&self) -> bool {
        self.look_at.is_some()
    }
}

/// Validated head configuration with its cone geometry solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadCone {
    config: HeadLookConfig,
    hypotenuse: f32,
    local_forward: Vec3,
}

impl HeadCone {
    /// Validates `config` and precomputes the cone.
    pub fn new(config: HeadLookConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            hypotenuse: cone_hypotenuse(config.cone_height, config.max_angle_dropoff),
            local_forward: config.pivot_forward.normalize(),
        })
    }

    /// The configuration this cone was built from.
    pub fn config(&self) -> &HeadLookConfig {
        &self.config
    }

    /// Slant length of the cone.
    pub fn hypotenuse(&self) -> f32 {
        self.hypotenuse
    }

    /// Places the pivot relative to the head bone's world transform.
    pub fn pivot(&self, head: &Transform) -> Pivot {
        Pivot {
            position: head.transform_point(self.config.pivot_offset),
            forward: head.transform_direction(self.local_forward),
        }
    }

    /// Angular falloff for an angle in degrees.
    pub fn normalized_angle(&self, angle: f32) -> f32 {
        normalized_angle(
            angle,
            self.config.min_angle_full_tracking,
            self.config.max_angle_dropoff,
        )
    }

    /// Distance falloff for a pivot-to-target distance.
    pub fn normalized_distance(&self, distance: f32) -> f32 {
        normalized_distance(self.hypotenuse, distance)
    }

    /// Evaluates one frame, rejecting non-finite or degenerate input.
    pub fn try_evaluate(
        &self,
        input: &HeadLookInput,
        dt: f32,
        previous: f32,
    ) -> Result<HeadLookResult, InputError> {
        let channel = ChannelKind::HeadLook;
        if !input.pivot.position.is_finite() {
            return Err(InputError::non_finite(channel, "pivot position"));
        }
        if !input.pivot.forward.is_finite() {
            return Err(InputError::non_finite(channel, "pivot forward"));
        }
        if input.pivot.forward.length_squared() <= f32::EPSILON {
            return Err(InputError::ZeroDirection {
                channel,
                field: "pivot forward",
            });
        }
        if !input.target.is_finite() {
            return Err(InputError::non_finite(channel, "look target"));
        }
        if !dt.is_finite() {
            return Err(InputError::non_finite(channel, "delta time"));
        }
        if !previous.is_finite() {
            return Err(InputError::non_finite(channel, "previous weight"));
        }
        if !input.weight_scale.is_finite() || !input.speed.is_none_or(f32::is_finite) {
            return Err(InputError::non_finite(channel, "channel scale"));
        }

        let to_target = input.target - input.pivot.position;
        if !to_target.is_finite() {
            return Err(InputError::non_finite(channel, "look direction"));
        }
        let normalized_distance = self.normalized_distance(to_target.length());
        let normalized_angle = self.normalized_angle(look_angle(input.pivot.forward, to_target));

        let scale = self.config.scale_weight * input.weight_scale.clamp(0.0, 1.0);
        let speed = input.speed.unwrap_or(self.config.speed);
        let cone_weight = smooth_weight(
            previous.clamp(0.0, 1.0),
            scale * normalized_angle,
            dt,
            speed,
        )
        .clamp(0.0, 1.0);

        let weight = ((cone_weight + normalized_distance) * 0.5).clamp(0.0, 1.0);

        Ok(HeadLookResult {
            weight,
            look_at: (weight > 0.0).then_some(input.target),
            cone_weight,
            normalized_angle,
            normalized_distance,
        })
    }

    /// Evaluates one frame; invalid input yields [`HeadLookResult::none`].
    pub fn evaluate(&self, input: &HeadLookInput, dt: f32, previous: f32) -> HeadLookResult {
        self.try_evaluate(input, dt, previous).unwrap_or_else(|err| {
            log::debug!("skipping head look: {err}");
            HeadLookResult::none(previous)
        })
    }
}

/// Computes the head look weight for one frame.
///
/// `previous` is the `cone_weight` returned on the previous frame.
pub fn evaluate_head_look(
    pivot_position: Vec3,
    pivot_forward: Vec3,
    look_target: Vec3,
    cone: &HeadCone,
    dt: f32,
    previous: f32,
) -> HeadLookResult {
    cone.evaluate(
        &HeadLookInput::new(pivot_position, pivot_forward, look_target),
        dt,
        previous,
    )
}
