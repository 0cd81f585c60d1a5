//! Bone transforms used to derive IK reference frames.

use glam::{Quat, Vec3};

/// A 3D transform (translation, rotation, scale).
///
/// Hosts pass the world transforms of the head and hip bones; the
/// evaluator derives the look pivot and the lateral-bias frame from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position offset.
    pub translation: Vec3,
    /// Rotation quaternion.
    pub rotation: Quat,
    /// Scale factors per axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform (no translation, rotation, or scale).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform with translation and rotation.
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Transforms a point.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    /// Transforms a direction (ignores translation and scale, normalizes result).
    ///
    /// Returns zero for a zero-length direction.
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        (self.rotation * direction).normalize_or_zero()
    }

    /// Local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.transform_direction(Vec3::X)
    }
}
