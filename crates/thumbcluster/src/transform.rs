//! Rigid transforms: the fixed anchor pipeline and generic poses.
//!
//! Convention
//! - Rotations are given in degrees, one angle per axis, applied X first, then
//!   Y, then Z (matrix `Rz · Ry · Rx`). Every consumer in the crate (point
//!   placement, the reference backend, decomposition of main-body poses) uses
//!   this one convention.
//!
//! Anchor pipeline (order is fixed)
//! 1. rotate about the local origin by the anchor rotation;
//! 2. translate by the cluster origin;
//! 3. translate by the anchor position.
//! Steps 2 and 3 commute; step 1 does not commute with them.

use nalgebra::{Isometry3, Point3, Rotation3, Vector3};

use crate::backend::GeometryBackend;
use crate::params::AnchorSpec;

/// Rotation matrix for per-axis degrees under the X→Y→Z convention.
#[inline]
pub fn rotation_from_degrees(deg: Vector3<f64>) -> Rotation3<f64> {
    // from_euler_angles(roll, pitch, yaw) == Rz(yaw) * Ry(pitch) * Rx(roll)
    Rotation3::from_euler_angles(deg.x.to_radians(), deg.y.to_radians(), deg.z.to_radians())
}

/// Inverse of `rotation_from_degrees` (angles in degrees).
#[inline]
pub fn degrees_from_rotation(r: &Rotation3<f64>) -> Vector3<f64> {
    let (roll, pitch, yaw) = r.euler_angles();
    Vector3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// Rotation followed by a translation, expressed the way the backend consumes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotation_deg: Vector3<f64>,
    pub translation: Vector3<f64>,
}

impl Pose {
    #[inline]
    pub fn identity() -> Self {
        Self {
            rotation_deg: Vector3::zeros(),
            translation: Vector3::zeros(),
        }
    }

    #[inline]
    pub fn translation(t: Vector3<f64>) -> Self {
        Self {
            rotation_deg: Vector3::zeros(),
            translation: t,
        }
    }

    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            rotation_deg: degrees_from_rotation(&iso.rotation.to_rotation_matrix()),
            translation: iso.translation.vector,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point3<f64>) -> Point3<f64> {
        rotation_from_degrees(self.rotation_deg) * p + self.translation
    }

    pub fn apply_shape<B: GeometryBackend>(&self, backend: &B, shape: B::Shape) -> B::Shape {
        let shape = backend.rotate(shape, self.rotation_deg);
        backend.translate(shape, self.translation)
    }
}

/// World pose of one anchor, built once from validated parameters.
#[derive(Clone, Copy, Debug)]
pub struct AnchorTransform {
    rotation_deg: Vector3<f64>,
    rotation: Rotation3<f64>,
    origin: Vector3<f64>,
    position: Vector3<f64>,
    plate_rotation: f64,
}

impl AnchorTransform {
    pub fn new(spec: &AnchorSpec, origin: Vector3<f64>) -> Self {
        Self {
            rotation_deg: spec.rotation,
            rotation: rotation_from_degrees(spec.rotation),
            origin,
            position: spec.position,
            plate_rotation: spec.plate_rotation,
        }
    }

    /// Place a local point: rotate, then origin, then position.
    #[inline]
    pub fn apply(&self, p: Point3<f64>) -> Point3<f64> {
        let rotated = self.rotation * p;
        let at_origin = rotated + self.origin;
        at_origin + self.position
    }

    /// Like `apply`, but first turns the point by the plate rotation about local Z.
    #[inline]
    pub fn apply_plate(&self, p: Point3<f64>) -> Point3<f64> {
        let plate = rotation_from_degrees(Vector3::new(0.0, 0.0, self.plate_rotation));
        self.apply(plate * p)
    }

    /// Shape counterpart of `apply`; issues exactly rotate, translate, translate.
    pub fn place<B: GeometryBackend>(&self, backend: &B, shape: B::Shape) -> B::Shape {
        let shape = backend.rotate(shape, self.rotation_deg);
        let shape = backend.translate(shape, self.origin);
        backend.translate(shape, self.position)
    }

    /// Shape counterpart of `apply_plate`.
    pub fn place_plate<B: GeometryBackend>(&self, backend: &B, shape: B::Shape) -> B::Shape {
        let shape = backend.rotate(shape, Vector3::new(0.0, 0.0, self.plate_rotation));
        self.place(backend, shape)
    }
}
