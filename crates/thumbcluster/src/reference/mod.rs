//! In-crate collaborators: a point-set geometry backend, a box shape library
//! and a dactyl-style main body.
//!
//! Purpose
//! - Exercise the cluster end to end (tests, benches, CLI) without a CSG
//!   kernel. Solids are vertex sets; a production caller plugs in its own
//!   `GeometryBackend`.

mod body;
mod shapes;
mod solid;

pub use body::{BodyParams, ReferenceBody};
pub use shapes::BoxShapes;
pub use solid::{ConvexPiece, PointSolid, PointSolidBackend};
