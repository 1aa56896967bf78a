//! Interface to the surrounding keyboard body.
//!
//! The cluster meets the main key matrix at a handful of boundary posts and
//! hands its wall off to the body's own wall. Everything it needs from the
//! body goes through `MainBody`; there is no ambient parent state.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::posts::{corner, Corner, MountDims};
use crate::transform::Pose;

/// Matrix rows the cluster attaches to, resolved by the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixRow {
    /// Lowest row that still has keys in every column.
    Corner,
    /// Bottom row (only the inner columns).
    Last,
}

/// A key slot of the main matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeySlot {
    pub column: usize,
    pub row: MatrixRow,
}

impl KeySlot {
    #[inline]
    pub const fn corner(column: usize) -> Self {
        Self {
            column,
            row: MatrixRow::Corner,
        }
    }
    #[inline]
    pub const fn last(column: usize) -> Self {
        Self {
            column,
            row: MatrixRow::Last,
        }
    }
}

/// Which of the three wall extrapolation offsets to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallLevel {
    Near,
    Mid,
    Far,
}

/// Near/mid/far wall offsets for one outward direction, in the post's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallOffsets {
    pub near: Vector3<f64>,
    pub mid: Vector3<f64>,
    pub far: Vector3<f64>,
}

impl WallOffsets {
    #[inline]
    pub fn get(&self, level: WallLevel) -> Vector3<f64> {
        match level {
            WallLevel::Near => self.near,
            WallLevel::Mid => self.mid,
            WallLevel::Far => self.far,
        }
    }
}

pub trait MainBody {
    /// Key-matrix point the cluster origin is measured from.
    fn shared_origin(&self) -> Vector3<f64>;

    fn row_index(&self, row: MatrixRow) -> usize;

    /// World pose of the key mount at `(column, row)`.
    fn key_pose(&self, column: usize, row: usize) -> Pose;

    /// World position of the left wall's edge post at `row` (translation only).
    fn left_edge(&self, row: usize) -> Vector3<f64>;

    /// The body's own wall-brace convention for outward direction `(dx, dy)`.
    fn wall_offsets(&self, dx: f64, dy: f64) -> WallOffsets;

    #[inline]
    fn slot_pose(&self, slot: KeySlot) -> Pose {
        self.key_pose(slot.column, self.row_index(slot.row))
    }

    /// World position of a slot's corner post.
    fn boundary_post(&self, slot: KeySlot, c: Corner, dims: &MountDims) -> Point3<f64> {
        self.slot_pose(slot).apply(Point3::from(corner(dims, c)))
    }
}
