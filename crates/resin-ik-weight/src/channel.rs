//! IK channels and their per-rig runtime state.

use glam::{Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which IK goal a channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelKind {
    /// Head look-at.
    HeadLook,
    /// Right hand reach.
    RightHand,
    /// Left hand reach.
    LeftHand,
}

impl ChannelKind {
    /// All channels in evaluation order.
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::HeadLook,
        ChannelKind::RightHand,
        ChannelKind::LeftHand,
    ];

    /// Returns the hand side for hand channels.
    pub fn hand_side(self) -> Option<HandSide> {
        match self {
            ChannelKind::HeadLook => None,
            ChannelKind::RightHand => Some(HandSide::Right),
            ChannelKind::LeftHand => Some(HandSide::Left),
        }
    }
}

/// Side of the body a hand channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandSide {
    /// Right hand.
    Right,
    /// Left hand.
    Left,
}

impl HandSide {
    /// Sign applied to the lateral bias (+1 right, -1 left).
    pub fn sign(self) -> f32 {
        match self {
            HandSide::Right => 1.0,
            HandSide::Left => -1.0,
        }
    }

    /// The opposite side.
    pub fn mirror(self) -> Self {
        match self {
            HandSide::Right => HandSide::Left,
            HandSide::Left => HandSide::Right,
        }
    }

    /// The channel driven by this hand.
    pub fn channel(self) -> ChannelKind {
        match self {
            HandSide::Right => ChannelKind::RightHand,
            HandSide::Left => ChannelKind::LeftHand,
        }
    }
}

impl From<HandSide> for ChannelKind {
    fn from(side: HandSide) -> Self {
        side.channel()
    }
}

/// Runtime state of one IK channel.
///
/// Targets are assigned by the host; an unassigned target means the
/// channel has nothing to evaluate and reports zero weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkChannel {
    /// Which goal this channel drives.
    pub kind: ChannelKind,
    /// Whether the channel is evaluated.
    pub enabled: bool,
    /// World-space target position.
    pub target: Option<Vec3>,
    /// World-space target rotation (hands only).
    pub target_rotation: Quat,
    /// Optional world-space hint (elbow) position (hands only).
    pub hint: Option<Vec3>,
    weight_scale: f32,
    smoothing_speed: Option<f32>,
}

impl IkChannel {
    /// Creates an enabled channel with full weight scale and no target.
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            enabled: true,
            target: None,
            target_rotation: Quat::IDENTITY,
            hint: None,
            weight_scale: 1.0,
            smoothing_speed: None,
        }
    }

    /// Sets the target position.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the target rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.target_rotation = rotation;
        self
    }

    /// Sets the hint position.
    pub fn with_hint(mut self, hint: Vec3) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Sets the weight scale.
    pub fn with_weight_scale(mut self, scale: f32) -> Self {
        self.set_weight_scale(scale);
        self
    }

    /// Sets the smoothing speed override.
    pub fn with_smoothing_speed(mut self, speed: f32) -> Self {
        self.set_smoothing_speed(Some(speed));
        self
    }

    /// Multiplicative damper in [0, 1].
    pub fn weight_scale(&self) -> f32 {
        self.weight_scale
    }

    /// Sets the weight scale, clamped to [0, 1]. NaN maps to 0.
    pub fn set_weight_scale(&mut self, scale: f32) {
        self.weight_scale = if scale.is_nan() {
            0.0
        } else {
            scale.clamp(0.0, 1.0)
        };
    }

    /// Per-channel blend rate override, in weight per second.
    pub fn smoothing_speed(&self) -> Option<f32> {
        self.smoothing_speed
    }

    /// Sets or clears the smoothing speed override. Negative or NaN speeds map to 0.
    pub fn set_smoothing_speed(&mut self, speed: Option<f32>) {
        self.smoothing_speed = speed.map(|s| if s.is_nan() { 0.0 } else { s.max(0.0) });
    }

    /// The target to evaluate this frame, or `None` when the channel is
    /// disabled or untargeted.
    pub fn active_target(&self) -> Option<Vec3> {
        self.target.filter(|_| self.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_channel_defaults() {
        let ch = IkChannel::new(ChannelKind::RightHand);
        assert!(ch.enabled);
        assert_eq!(ch.weight_scale(), 1.0);
        assert_eq!(ch.smoothing_speed(), None);
        assert_eq!(ch.active_target(), None);
    }

    #[test]
    fn test_builder_clamps() {
        let ch = IkChannel::new(ChannelKind::LeftHand)
            .with_target(Vec3::X)
            .with_weight_scale(1.5)
            .with_smoothing_speed(-3.0);
        assert_eq!(ch.active_target(), Some(Vec3::X));
        assert_eq!(ch.weight_scale(), 1.0);
        assert_eq!(ch.smoothing_speed(), Some(0.0));
    }

    #[test]
    fn test_disabled_channel_inactive() {
        let mut ch = IkChannel::new(ChannelKind::HeadLook).with_target(Vec3::Z);
        ch.enabled = false;
        assert_eq!(ch.active_target(), None);
    }

    #[test]
    fn test_hand_side_mapping() {
        assert_eq!(ChannelKind::HeadLook.hand_side(), None);
        assert_eq!(ChannelKind::RightHand.hand_side(), Some(HandSide::Right));
        assert_eq!(HandSide::Left.channel(), ChannelKind::LeftHand);
        assert_eq!(HandSide::Left.mirror(), HandSide::Right);
        assert_eq!(HandSide::Right.sign(), -HandSide::Left.sign());
    }
}
