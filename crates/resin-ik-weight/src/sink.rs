//! Hand-off of evaluated weights to an external IK solver.

use crate::{EvaluationResult, HandReachResult, HandSide, HeadLookResult};
use glam::{Quat, Vec3};

/// The IK goal slots of a host skeletal solver.
///
/// Implemented by whatever owns the solver. Weights are written every
/// frame; positions and rotations only when an override is present, so a
/// gated goal keeps whatever the solver had before.
pub trait IkTargetSink {
    /// Sets the look-at weight.
    fn set_look_at_weight(&mut self, weight: f32);

    /// Sets the look-at position.
    fn set_look_at_position(&mut self, position: Vec3);

    /// Sets the position and rotation weight of a hand goal.
    fn set_goal_weight(&mut self, side: HandSide, weight: f32);

    /// Sets the position of a hand goal.
    fn set_goal_position(&mut self, side: HandSide, position: Vec3);

    /// Sets the rotation of a hand goal.
    fn set_goal_rotation(&mut self, side: HandSide, rotation: Quat);

    /// Sets the weight of an elbow hint.
    fn set_hint_weight(&mut self, side: HandSide, weight: f32);

    /// Sets the position of an elbow hint.
    fn set_hint_position(&mut self, side: HandSide, position: Vec3);
}

impl HeadLookResult {
    /// Writes this result into `sink`.
    pub fn apply<S: IkTargetSink + ?Sized>(&self, sink: &mut S) {
        sink.set_look_at_weight(self.weight);
        if let Some(position) = self.look_at {
            sink.set_look_at_position(position);
        }
    }
}

impl HandReachResult {
    /// Writes this result into `sink`.
    pub fn apply<S: IkTargetSink + ?Sized>(&self, sink: &mut S) {
        sink.set_goal_weight(self.side, self.weight);
        if let Some(position) = self.position {
            sink.set_goal_position(self.side, position);
        }
        if let Some(rotation) = self.rotation {
            sink.set_goal_rotation(self.side, rotation);
        }
        match self.hint {
            Some(hint) => {
                sink.set_hint_weight(self.side, hint.weight);
                sink.set_hint_position(self.side, hint.position);
            }
            None => sink.set_hint_weight(self.side, 0.0),
        }
    }
}

impl EvaluationResult {
    /// Writes every channel into `sink`.
    pub fn apply<S: IkTargetSink + ?Sized>(&self, sink: &mut S) {
        self.head.apply(sink);
        self.right_hand.apply(sink);
        self.left_hand.apply(sink);
    }
}

/// Goal slots of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GoalSlots {
    /// Goal weight.
    pub weight: f32,
    /// Last written goal position.
    pub position: Option<Vec3>,
    /// Last written goal rotation.
    pub rotation: Option<Quat>,
    /// Hint weight.
    pub hint_weight: f32,
    /// Last written hint position.
    pub hint_position: Option<Vec3>,
}

/// A plain record of solver slots.
///
/// Useful for hosts that copy targets into their solver in one batch, and
/// for inspecting what an evaluation would write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IkTargets {
    /// Look-at weight.
    pub look_at_weight: f32,
    /// Last written look-at position.
    pub look_at_position: Option<Vec3>,
    /// Right hand slots.
    pub right: GoalSlots,
    /// Left hand slots.
    pub left: GoalSlots,
}

impl IkTargets {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots for one hand.
    pub fn goal(&self, side: HandSide) -> &GoalSlots {
        match side {
            HandSide::Right => &self.right,
            HandSide::Left => &self.left,
        }
    }

    fn goal_mut(&mut self, side: HandSide) -> &mut GoalSlots {
        match side {
            HandSide::Right => &mut self.right,
            HandSide::Left => &mut self.left,
        }
    }
}

impl IkTargetSink for IkTargets {
    fn set_look_at_weight(&mut self, weight: f32) {
        self.look_at_weight = weight;
    }

    fn set_look_at_position(&mut self, position: Vec3) {
        self.look_at_position = Some(position);
    }

    fn set_goal_weight(&mut self, side: HandSide, weight: f32) {
        self.goal_mut(side).weight = weight;
    }

    fn set_goal_position(&mut self, side: HandSide, position: Vec3) {
        self.goal_mut(side).position = Some(position);
    }

    fn set_goal_rotation(&mut self, side: HandSide, rotation: Quat) {
        self.goal_mut(side).rotation = Some(rotation);
    }

    fn set_hint_weight(&mut self, side: HandSide, weight: f32) {
        self.goal_mut(side).hint_weight = weight;
    }

    fn set_hint_position(&mut self, side: HandSide, position: Vec3) {
        self.goal_mut(side).hint_position = Some(position);
    }
}
