//! Static rig configuration.
//!
//! Configurations are plain values. They are validated once when handed to
//! [`crate::IkWeightEvaluator`] (or [`crate::HeadCone`] / [`crate::HandReach`])
//! and never per frame.

use crate::ConfigError;
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for head look-at weighting.
///
/// The look cone opens from a pivot placed relative to the head bone.
/// Targets inside `min_angle_full_tracking` get full angular weight, which
/// falls to zero at `max_angle_dropoff`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeadLookConfig {
    /// Pivot position in head-bone local space.
    pub pivot_offset: Vec3,
    /// Pivot forward direction in head-bone local space.
    pub pivot_forward: Vec3,
    /// Angle (degrees) at which angular weight reaches zero.
    pub max_angle_dropoff: f32,
    /// Angle (degrees) below which angular weight is full.
    pub min_angle_full_tracking: f32,
    /// Height of the look cone (maximum tracking distance along forward).
    pub cone_height: f32,
    /// Blend rate in weight per second.
    pub speed: f32,
    /// Overall strength in [0, 1].
    pub scale_weight: f32,
}

impl Default for HeadLookConfig {
    fn default() -> Self {
        Self {
            pivot_offset: Vec3::ZERO,
            pivot_forward: Vec3::Z,
            max_angle_dropoff: 60.0,
            min_angle_full_tracking: 20.0,
            cone_height: 5.0,
            speed: 4.0,
            scale_weight: 1.0,
        }
    }
}

impl HeadLookConfig {
    /// Wide cone that keeps tracking far to the side.
    pub fn attentive() -> Self {
        Self {
            max_angle_dropoff: 80.0,
            min_angle_full_tracking: 35.0,
            cone_height: 8.0,
            speed: 6.0,
            ..Self::default()
        }
    }

    /// Narrow, slow cone for idle glances.
    pub fn subtle() -> Self {
        Self {
            max_angle_dropoff: 40.0,
            min_angle_full_tracking: 10.0,
            cone_height: 3.0,
            speed: 2.0,
            scale_weight: 0.6,
            ..Self::default()
        }
    }

    /// Sets the pivot offset and forward direction.
    pub fn with_pivot(mut self, offset: Vec3, forward: Vec3) -> Self {
        self.pivot_offset = offset;
        self.pivot_forward = forward;
        self
    }

    /// Sets the angular falloff range in degrees.
    pub fn with_angles(mut self, min_full_tracking: f32, max_dropoff: f32) -> Self {
        self.min_angle_full_tracking = min_full_tracking;
        self.max_angle_dropoff = max_dropoff;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite_vec("pivot_offset", self.pivot_offset)?;
        require_finite_vec("pivot_forward", self.pivot_forward)?;
        if self.pivot_forward.length_squared() <= f32::EPSILON {
            return Err(ConfigError::ZeroForward);
        }
        require_angle("max_angle_dropoff", self.max_angle_dropoff)?;
        require_angle("min_angle_full_tracking", self.min_angle_full_tracking)?;
        if self.max_angle_dropoff <= self.min_angle_full_tracking {
            return Err(ConfigError::InvalidAngleRange {
                min: self.min_angle_full_tracking,
                max: self.max_angle_dropoff,
            });
        }
        require_finite("cone_height", self.cone_height)?;
        if self.cone_height < 0.0 {
            return Err(ConfigError::NegativeConeHeight(self.cone_height));
        }
        require_speed("head speed", self.speed)?;
        require_unit("head scale_weight", self.scale_weight)
    }
}

/// Configuration for hand reach weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HandReachConfig {
    /// Distance from the current hand position beyond which reach is ignored.
    pub reach_proximity_max: f32,
    /// Lateral-bias origin in hip-bone local space.
    pub hip_offset: Vec3,
    /// Blend rate in weight per second.
    pub speed: f32,
    /// Overall strength in [0, 1].
    pub scale_weight: f32,
}

impl Default for HandReachConfig {
    fn default() -> Self {
        Self {
            reach_proximity_max: 1.5,
            hip_offset: Vec3::ZERO,
            speed: 4.0,
            scale_weight: 1.0,
        }
    }
}

impl HandReachConfig {
    /// Short-range reach for touching nearby props.
    pub fn close() -> Self {
        Self {
            reach_proximity_max: 0.6,
            speed: 8.0,
            ..Self::default()
        }
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("reach_proximity_max", self.reach_proximity_max)?;
        if self.reach_proximity_max <= 0.0 {
            return Err(ConfigError::NonPositiveReach(self.reach_proximity_max));
        }
        require_finite_vec("hip_offset", self.hip_offset)?;
        require_speed("hand speed", self.speed)?;
        require_unit("hand scale_weight", self.scale_weight)
    }
}

/// Complete configuration of one rig.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RigConfig {
    /// Animation layer the IK pass runs on.
    pub ik_layer: usize,
    /// Head look-at settings.
    pub head: HeadLookConfig,
    /// Hand reach settings, shared by both hands.
    pub hand: HandReachConfig,
}

impl RigConfig {
    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.head.validate()?;
        self.hand.validate()
    }
}

fn require_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn require_finite_vec(name: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn require_angle(name: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if (0.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::AngleOutOfRange { name, value })
    }
}

fn require_speed(name: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value < 0.0 {
        Err(ConfigError::NegativeSpeed { name, value })
    } else {
        Ok(())
    }
}

fn require_unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::WeightOutOfRange { name, value })
    }
}
