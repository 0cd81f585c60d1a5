//! Per-rig IK weight evaluation.

use crate::{
    ChannelKind, ConfigError, HandReach, HandReachInput, HandReachResult, HandSide, HeadCone,
    HeadLookInput, HeadLookResult, IkChannel, IkTargetSink, RigConfig, Transform,
    WeightAccumulator,
};
use glam::{Quat, Vec3};

/// Geometry supplied by the host once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Animation layer currently running its IK pass.
    pub layer_index: usize,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// World transform of the head bone.
    pub head: Transform,
    /// World transform of the hip bone.
    pub hips: Transform,
    /// Current world position of the right hand end effector.
    pub right_hand: Vec3,
    /// Current world position of the left hand end effector.
    pub left_hand: Vec3,
}

impl FrameInput {
    /// Creates a frame with identity bones and hands at the origin.
    pub fn new(layer_index: usize, delta_time: f32) -> Self {
        Self {
            layer_index,
            delta_time,
            head: Transform::IDENTITY,
            hips: Transform::IDENTITY,
            right_hand: Vec3::ZERO,
            left_hand: Vec3::ZERO,
        }
    }

    /// Sets the head and hip bone transforms.
    pub fn with_bones(mut self, head: Transform, hips: Transform) -> Self {
        self.head = head;
        self.hips = hips;
        self
    }

    /// Sets the current hand positions.
    pub fn with_hands(mut self, right: Vec3, left: Vec3) -> Self {
        self.right_hand = right;
        self.left_hand = left;
        self
    }

    fn hand(&self, side: HandSide) -> Vec3 {
        match side {
            HandSide::Right => self.right_hand,
            HandSide::Left => self.left_hand,
        }
    }
}

/// Weights and overrides for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    /// False when the frame ran on a layer other than the rig's IK layer.
    pub active: bool,
    /// Head look-at channel.
    pub head: HeadLookResult,
    /// Right hand channel.
    pub right_hand: HandReachResult,
    /// Left hand channel.
    pub left_hand: HandReachResult,
}

impl EvaluationResult {
    /// A result with every weight at zero and no overrides.
    pub fn inactive() -> Self {
        Self {
            active: false,
            head: HeadLookResult::none(0.0),
            right_hand: HandReachResult::none(HandSide::Right, 0.0),
            left_hand: HandReachResult::none(HandSide::Left, 0.0),
        }
    }

    /// Result for one hand.
    pub fn hand(&self, side: HandSide) -> &HandReachResult {
        match side {
            HandSide::Right => &self.right_hand,
            HandSide::Left => &self.left_hand,
        }
    }

    /// Final weight of a channel.
    pub fn weight(&self, kind: ChannelKind) -> f32 {
        match kind {
            ChannelKind::HeadLook => self.head.weight,
            ChannelKind::RightHand => self.right_hand.weight,
            ChannelKind::LeftHand => self.left_hand.weight,
        }
    }
}

/// Head look and hand reach weighting for one rig.
///
/// Owns the validated configuration, the three channels and their
/// smoothing state. Call [`evaluate`](Self::evaluate) once per frame after
/// base animation and before the IK solve.
///
/// # Example
///
/// ```
/// use glam::{Quat, Vec3};
/// use rhizome_resin_ik_weight::{
///     ChannelKind, FrameInput, HandSide, IkTargets, IkWeightEvaluator, RigConfig,
/// };
///
/// let mut rig = IkWeightEvaluator::new(RigConfig::default()).unwrap();
/// rig.set_target(ChannelKind::HeadLook, Vec3::new(0.0, 1.6, 2.0));
/// rig.set_hand_target(HandSide::Right, Vec3::new(0.2, 1.0, 0.5), Quat::IDENTITY);
///
/// let frame = FrameInput::new(0, 1.0 / 60.0).with_hands(Vec3::new(0.2, 1.0, 0.1), Vec3::ZERO);
/// let mut targets = IkTargets::new();
/// rig.evaluate_into(&frame, &mut targets);
/// assert!(targets.right.weight > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct IkWeightEvaluator {
    config: RigConfig,
    head: HeadCone,
    hand: HandReach,
    channels: [IkChannel; 3],
    accumulators: [WeightAccumulator; 3],
}

fn slot(kind: ChannelKind) -> usize {
    match kind {
        ChannelKind::HeadLook => 0,
        ChannelKind::RightHand => 1,
        ChannelKind::LeftHand => 2,
    }
}

impl IkWeightEvaluator {
    /// Validates `config` and creates a rig with enabled, untargeted channels.
    pub fn new(config: RigConfig) -> Result<Self, ConfigError> {
        let (head, hand) = build(&config)?;
        Ok(Self {
            config,
            head,
            hand,
            channels: ChannelKind::ALL.map(IkChannel::new),
            accumulators: [WeightAccumulator::default(); 3],
        })
    }

    /// Replaces the configuration.
    ///
    /// On error the current configuration stays in effect. Smoothing state
    /// is kept either way.
    pub fn set_config(&mut self, config: RigConfig) -> Result<(), ConfigError> {
        let (head, hand) = build(&config).inspect_err(|err| {
            log::warn!("rejected rig configuration: {err}");
        })?;
        self.config = config;
        self.head = head;
        self.hand = hand;
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// The solved head cone.
    pub fn head_cone(&self) -> &HeadCone {
        &self.head
    }

    /// A channel's state.
    pub fn channel(&self, kind: ChannelKind) -> &IkChannel {
        &self.channels[slot(kind)]
    }

    /// Mutable access to a channel's state.
    pub fn channel_mut(&mut self, kind: ChannelKind) -> &mut IkChannel {
        &mut self.channels[slot(kind)]
    }

    /// Sets a channel's target position.
    pub fn set_target(&mut self, kind: ChannelKind, position: Vec3) {
        self.channel_mut(kind).target = Some(position);
    }

    /// Sets a hand's target position and rotation.
    pub fn set_hand_target(&mut self, side: HandSide, position: Vec3, rotation: Quat) {
        let channel = self.channel_mut(side.channel());
        channel.target = Some(position);
        channel.target_rotation = rotation;
    }

    /// Removes a channel's target; the channel reports zero until retargeted.
    pub fn clear_target(&mut self, kind: ChannelKind) {
        self.channel_mut(kind).target = None;
    }

    /// Sets or clears a hand's elbow hint.
    pub fn set_hint(&mut self, side: HandSide, hint: Option<Vec3>) {
        self.channel_mut(side.channel()).hint = hint;
    }

    /// Enables or disables a channel. Disabled channels keep their smoothing state.
    pub fn set_enabled(&mut self, kind: ChannelKind, enabled: bool) {
        self.channel_mut(kind).enabled = enabled;
    }

    /// Current smoothed weight of a channel.
    pub fn weight(&self, kind: ChannelKind) -> f32 {
        self.accumulators[slot(kind)].value()
    }

    /// Snaps a channel's smoothing state back to zero.
    pub fn reset(&mut self, kind: ChannelKind) {
        self.accumulators[slot(kind)].reset();
    }

    /// Snaps every channel back to zero.
    pub fn reset_all(&mut self) {
        for acc in &mut self.accumulators {
            acc.reset();
        }
    }

    /// Evaluates every channel for one frame.
    pub fn evaluate(&mut self, frame: &FrameInput) -> EvaluationResult {
        if frame.layer_index != self.config.ik_layer {
            return EvaluationResult::inactive();
        }

        EvaluationResult {
            active: true,
            head: self.evaluate_head(frame),
            right_hand: self.evaluate_hand(HandSide::Right, frame),
            left_hand: self.evaluate_hand(HandSide::Left, frame),
        }
    }

    /// Evaluates one frame and writes the result into `sink`.
    ///
    /// Frames on other layers write nothing.
    pub fn evaluate_into<S: IkTargetSink + ?Sized>(
        &mut self,
        frame: &FrameInput,
        sink: &mut S,
    ) -> EvaluationResult {
        let result = self.evaluate(frame);
        if result.active {
            result.apply(sink);
        }
        result
    }

    fn evaluate_head(&mut self, frame: &FrameInput) -> HeadLookResult {
        let channel = self.channels[slot(ChannelKind::HeadLook)];
        let acc = &mut self.accumulators[slot(ChannelKind::HeadLook)];
        let Some(target) = channel.active_target() else {
            return HeadLookResult::none(acc.value());
        };

        let input = HeadLookInput {
            pivot: self.head.pivot(&frame.head),
            target,
            weight_scale: channel.weight_scale(),
            speed: channel.smoothing_speed(),
        };
        let result = self.head.evaluate(&input, frame.delta_time, acc.value());
        acc.set(result.cone_weight);
        result
    }

    fn evaluate_hand(&mut self, side: HandSide, frame: &FrameInput) -> HandReachResult {
        let kind = side.channel();
        let channel = self.channels[slot(kind)];
        let acc = &mut self.accumulators[slot(kind)];
        let Some(target) = channel.active_target() else {
            return HandReachResult::none(side, acc.value());
        };

        let input = HandReachInput {
            hint: channel.hint,
            weight_scale: channel.weight_scale(),
            speed: channel.smoothing_speed(),
            ..HandReachInput::new(side, frame.hand(side), target, channel.target_rotation)
                .with_hip_transform(&frame.hips, self.hand.config().hip_offset)
        };
        let result = self.hand.evaluate(&input, frame.delta_time, acc.value());
        acc.set(result.smoothed);
        result
    }
}

fn build(config: &RigConfig) -> Result<(HeadCone, HandReach), ConfigError> {
    Ok((HeadCone::new(config.head)?, HandReach::new(config.hand)?))
}
