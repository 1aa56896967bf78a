//! Capability interfaces for the geometry kernel and the shape library.
//!
//! The cluster core never inspects shapes; it only routes them through these
//! primitives. Implementations must be deterministic and side-effect free.
//! `reference::PointSolidBackend` is the in-crate implementation.

use nalgebra::Vector3;

use crate::error::Result;
use crate::posts::MountDims;

pub trait GeometryBackend {
    type Shape: Clone;

    /// Rotate about the shape's local origin (degrees, X then Y then Z).
    fn rotate(&self, shape: Self::Shape, degrees: Vector3<f64>) -> Self::Shape;

    fn translate(&self, shape: Self::Shape, offset: Vector3<f64>) -> Self::Shape;

    fn union(&self, shapes: Vec<Self::Shape>) -> Result<Self::Shape>;

    /// Convex hull of all input shapes as one solid.
    fn hull(&self, shapes: &[Self::Shape]) -> Result<Self::Shape>;

    /// Convex hull of the inputs together with their projection onto the base plane.
    fn lowest_envelope(&self, shapes: &[Self::Shape]) -> Result<Self::Shape>;

    /// Sliding-window bridge: hull every three consecutive shapes, union the results.
    fn hull_bridge(&self, shapes: &[Self::Shape]) -> Result<Self::Shape> {
        let mut hulls = Vec::with_capacity(shapes.len().saturating_sub(2));
        for window in shapes.windows(3) {
            hulls.push(self.hull(window)?);
        }
        self.union(hulls)
    }
}

/// Per-key solids placed by the cluster (web posts, plates, caps).
pub trait ShapeLibrary<B: GeometryBackend> {
    /// Mount footprint every post offset is computed from.
    fn mount(&self) -> MountDims;

    /// Small connector solid for a post at the local origin.
    fn web_post(&self, backend: &B) -> B::Shape;

    fn plate(&self, backend: &B) -> B::Shape;

    fn key_cap(&self, backend: &B) -> B::Shape;
}
