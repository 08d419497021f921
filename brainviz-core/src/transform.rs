//! Orientation, zoom and model transforms

use crate::error::{Error, Result};
use crate::point::*;
use nalgebra::{Matrix3, Matrix4, Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// A 3D transformation applied to scene geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Create a uniform scaling transformation
    pub fn uniform_scaling(scale: f32) -> Self {
        Self {
            matrix: Matrix4::new_scaling(scale),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another (`self` applied last)
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

/// Cumulative orientation of the model.
///
/// Increments are applied about axes fixed to the object: a world axis is
/// first carried into object space through the inverse of the current
/// orientation, and the increment about that local axis is right-multiplied
/// onto the orientation. The quaternion is renormalized after every
/// increment so it stays a rotation over arbitrarily long sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    orientation: UnitQuaternion<f32>,
}

impl RotationState {
    pub fn identity() -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn from_quaternion(orientation: UnitQuaternion<f32>) -> Self {
        Self { orientation }
    }

    pub fn orientation(&self) -> &UnitQuaternion<f32> {
        &self.orientation
    }

    /// Orientation as an orthonormal 3x3 matrix
    pub fn matrix(&self) -> Matrix3<f32> {
        self.orientation.to_rotation_matrix().into_inner()
    }

    pub fn to_transform(&self) -> Transform3D {
        Transform3D::rotation(self.orientation)
    }

    /// `world_axis` expressed in object coordinates
    pub fn local_axis(&self, world_axis: &Vector3f) -> Option<Unit<Vector3f>> {
        let local = self.orientation.inverse_transform_vector(world_axis);
        Unit::try_new(local, f32::EPSILON)
    }

    /// Rotate by `angle` radians about the object-local image of `world_axis`.
    ///
    /// Returns the increment that was composed onto the orientation, or
    /// `None` if the angle is zero or the axis degenerate.
    pub fn rotate_local(&mut self, world_axis: &Vector3f, angle: f32) -> Option<UnitQuaternion<f32>> {
        if angle == 0.0 || !angle.is_finite() {
            return None;
        }
        let axis = self.local_axis(world_axis)?;
        let increment = UnitQuaternion::from_axis_angle(&axis, angle);
        self.orientation *= increment;
        self.orientation.renormalize();
        Some(increment)
    }

    /// Rotate a point from object space into world space
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        self.orientation.transform_point(point)
    }

    /// Whether the matrix form is orthonormal with determinant 1 within `epsilon`
    pub fn is_valid_rotation(&self, epsilon: f32) -> bool {
        let m = self.matrix();
        let orthonormal = (m.transpose() * m - Matrix3::identity()).amax() <= epsilon;
        orthonormal && (m.determinant() - 1.0).abs() <= epsilon
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Bounds and step of the zoom scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub initial: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 20.0,
            step: 0.05,
            initial: 1.0,
        }
    }
}

impl ZoomConfig {
    /// Check that every field is finite and the bounds and step are positive
    pub fn validate(&self) -> Result<()> {
        let fields = [("min", self.min), ("max", self.max), ("step", self.step), ("initial", self.initial)];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidData(format!("Zoom {} must be finite, got {}", name, value)));
            }
        }
        if self.min <= 0.0 || self.max <= 0.0 || self.step <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Zoom bounds and step must be positive (min {}, max {}, step {})",
                self.min, self.max, self.step
            )));
        }
        Ok(())
    }
}

/// Uniform scene scale bounded to `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    value: f32,
    config: ZoomConfig,
}

impl ZoomState {
    /// Create a zoom state; the initial value is clamped into the bounds.
    /// A config that fails [`ZoomConfig::validate`] is replaced by the default.
    pub fn new(config: ZoomConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}; using default zoom settings", e);
                ZoomConfig::default()
            }
        };
        let (min, max) = if config.min <= config.max {
            (config.min, config.max)
        } else {
            (config.max, config.min)
        };
        let config = ZoomConfig { min, max, ..config };
        Self {
            value: config.initial.clamp(min, max),
            config,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Apply `ticks` wheel ticks, one step each, positive ticks zooming in.
    /// Ticks that would leave the bounds stop at the bound. Returns whether
    /// the value changed.
    pub fn step_by(&mut self, ticks: i32) -> bool {
        let before = self.value;
        let delta = if ticks >= 0 { self.config.step } else { -self.config.step };
        for _ in 0..ticks.unsigned_abs() {
            self.value = (self.value + delta).clamp(self.config.min, self.config.max);
        }
        self.value != before
    }

    /// Restore the configured initial value
    pub fn reset(&mut self) {
        self.value = self.config.initial.clamp(self.config.min, self.config.max);
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
