//! Procedural IK blend weights for resin rigs.
//!
//! Computes per-frame weights for a head look-at goal and two hand reach
//! goals from bone transforms and targets. The results drive an external
//! IK solver through [`IkTargetSink`]; nothing here moves bones itself.

mod channel;
mod config;
mod error;
mod evaluator;
mod hand;
mod head;
mod sink;
mod smoothing;
mod transform;

pub use channel::{ChannelKind, HandSide, IkChannel};
pub use config::{HandReachConfig, HeadLookConfig, RigConfig};
pub use error::{ConfigError, InputError};
pub use evaluator::{EvaluationResult, FrameInput, IkWeightEvaluator};
pub use hand::{
    HandReach, HandReachInput, HandReachResult, HintOverride, evaluate_hand_reach,
    lateral_adjustment, lateral_bias, normalized_hand_weight,
};
pub use head::{
    HeadCone, HeadLookInput, HeadLookResult, Pivot, cone_hypotenuse, evaluate_head_look,
    normalized_angle, normalized_distance,
};
pub use sink::{GoalSlots, IkTargetSink, IkTargets};
pub use smoothing::{WeightAccumulator, smooth_weight};
pub use transform::Transform;
