//! Corner posts of a rectangular key mount.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One of the four mount corners, named from above (y up, x right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Tl,
    Tr,
    Bl,
    Br,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Tl, Corner::Tr, Corner::Bl, Corner::Br];

    #[inline]
    fn signs(self) -> (f64, f64) {
        match self {
            Corner::Tl => (-1.0, 1.0),
            Corner::Tr => (1.0, 1.0),
            Corner::Bl => (-1.0, -1.0),
            Corner::Br => (1.0, -1.0),
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Corner::Tl => "tl",
            Corner::Tr => "tr",
            Corner::Bl => "bl",
            Corner::Br => "br",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mount footprint and post inset, shared by every post that meets in a hull.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountDims {
    pub width: f64,
    pub height: f64,
    /// Distance from the mount edge to the post centre.
    pub inset: f64,
}

impl Default for MountDims {
    fn default() -> Self {
        Self {
            width: 18.0,
            height: 18.0,
            inset: 0.0,
        }
    }
}

/// Local offset of `corner` from the mount centre: `(±(w/2 − inset), ±(h/2 − inset), 0)`.
#[inline]
pub fn corner(dims: &MountDims, corner: Corner) -> Vector3<f64> {
    let (sx, sy) = corner.signs();
    Vector3::new(
        sx * (dims.width / 2.0 - dims.inset),
        sy * (dims.height / 2.0 - dims.inset),
        0.0,
    )
}
