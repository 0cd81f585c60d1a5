//! Error types for resin-ik-weight.

use crate::ChannelKind;
use thiserror::Error;

/// Errors raised when a rig configuration is rejected.
///
/// These surface once, at setup. A rejected configuration never replaces
/// a previously accepted one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The full-tracking angle is not strictly below the dropoff angle.
    #[error("invalid angle range: min full-tracking {min} must be below max dropoff {max}")]
    InvalidAngleRange {
        /// Minimum angle for full tracking, in degrees.
        min: f32,
        /// Maximum dropoff angle, in degrees.
        max: f32,
    },

    /// An angle lies outside [0, 180] degrees.
    #[error("{name} must be within [0, 180] degrees, got {value}")]
    AngleOutOfRange {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// A smoothing speed is negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeSpeed {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// The head cone height is negative.
    #[error("cone height must not be negative, got {0}")]
    NegativeConeHeight(f32),

    /// The hand reach proximity is zero or negative.
    #[error("reach proximity must be positive, got {0}")]
    NonPositiveReach(f32),

    /// A scale weight lies outside [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    WeightOutOfRange {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// The pivot forward direction has zero length.
    #[error("pivot forward direction must not be zero")]
    ZeroForward,

    /// A configuration value is NaN or infinite.
    #[error("{name} must be finite")]
    NonFinite {
        /// Field name.
        name: &'static str,
    },
}

/// Errors raised when per-frame geometry cannot be evaluated.
///
/// The evaluator turns these into a no-op result for the frame; the
/// `try_*` entry points return them to callers that want to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// A position, direction, rotation or time value is NaN or infinite.
    #[error("non-finite {field} on {channel:?} channel")]
    NonFinite {
        /// Channel being evaluated.
        channel: ChannelKind,
        /// Offending input.
        field: &'static str,
    },

    /// A direction that must have length has none.
    #[error("zero-length {field} on {channel:?} channel")]
    ZeroDirection {
        /// Channel being evaluated.
        channel: ChannelKind,
        /// Offending input.
        field: &'static str,
    },
}

impl InputError {
    pub(crate) fn non_finite(channel: ChannelKind, field: &'static str) -> Self {
        Self::NonFinite { channel, field }
    }

    /// Channel the rejected input belonged to.
    pub fn channel(&self) -> ChannelKind {
        match self {
            Self::NonFinite { channel, .. } | Self::ZeroDirection { channel, .. } => *channel,
        }
    }
}
