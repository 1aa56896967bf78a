//! Thumb-key cluster geometry for split ergonomic keyboards.
//!
//! Places five key mounts around a shared origin, bridges neighbouring
//! mounts with a hull web, wraps the cluster in a perimeter wall that hands
//! off to the main body's wall, and locates the fastener that ties the
//! cluster to the base plate.
//!
//! Layers (bottom-up)
//! - `params`, `transform`, `placement`: validated poses and the anchor pipeline.
//! - `layout`: per-variant adjacency tables (HullGroups, wall loop, connection).
//! - `resolve`, `validate`: symbolic sites to world points; connectivity checks.
//! - `bridge`, `walls`, `screws`: solids and fastener positions.
//! - `cluster`: the facade most callers use.
//!
//! Geometry is produced through the `GeometryBackend` and `ShapeLibrary`
//! traits; `reference` carries in-crate implementations.

pub mod backend;
pub mod body;
pub mod bridge;
pub(crate) mod cfg;
pub mod cluster;
pub mod error;
pub mod layout;
pub mod params;
pub mod placement;
pub mod posts;
pub mod reference;
pub mod resolve;
pub mod screws;
pub mod transform;
pub mod validate;
pub mod walls;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::ValidateCfg;
pub use error::{ClusterError, Result};

/// Common exports for callers building a cluster.
pub mod prelude {
    pub use crate::backend::{GeometryBackend, ShapeLibrary};
    pub use crate::body::{KeySlot, MainBody, MatrixRow, WallLevel, WallOffsets};
    pub use crate::cfg::ValidateCfg;
    pub use crate::cluster::{ClusterPoints, ClusterSolids, ThumbCluster};
    pub use crate::error::{ClusterError, Result};
    pub use crate::layout::{ClusterLayout, ClusterVariant};
    pub use crate::params::{AnchorName, ClusterParameters};
    pub use crate::posts::{Corner, MountDims};
    pub use crate::reference::{BodyParams, BoxShapes, PointSolidBackend, ReferenceBody};
    pub use crate::transform::Pose;
}
