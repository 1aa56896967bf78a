//! Cluster shape definitions: which posts bridge, which posts wall.
//!
//! Purpose
//! - Hold the per-variant adjacency as plain data: ordered HullGroups, the
//!   wall loop in traversal order, the hand-off through the main body, and
//!   the bespoke connection pieces at the body's left wall.
//!
//! Why data, not inference
//! - Near-miss posts and intentional touch points are numerically alike, so
//!   adjacency cannot be recovered from coordinates. The tables are checked
//!   instead (`crate::validate`).

mod mini;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::body::{KeySlot, MatrixRow, WallLevel};
use crate::params::AnchorName;
use crate::posts::Corner;

/// Symbolic location of a post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Thumb(AnchorName, Corner),
    Key(KeySlot, Corner),
    /// The main body's left-wall edge post at a row.
    LeftEdge(MatrixRow),
}

impl Site {
    /// True for posts owned by the main body rather than the cluster.
    #[inline]
    pub fn is_body(&self) -> bool {
        !matches!(self, Site::Thumb(..))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Thumb(a, c) => write!(f, "{a}.{c}"),
            Site::Key(slot, c) => write!(f, "key({},{:?}).{c}", slot.column, slot.row),
            Site::LeftEdge(row) => write!(f, "left({row:?})"),
        }
    }
}

/// Outward wall direction in the post's local xy plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outward {
    pub dx: f64,
    pub dy: f64,
}

impl Outward {
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// A site, optionally pushed out by one of the body's wall offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub site: Site,
    pub wall: Option<(WallLevel, Outward)>,
}

impl Spot {
    #[inline]
    pub const fn at(site: Site) -> Self {
        Self { site, wall: None }
    }
    #[inline]
    pub const fn wall(site: Site, level: WallLevel, dir: Outward) -> Self {
        Self {
            site,
            wall: Some((level, dir)),
        }
    }
}

/// Ordered sites fed to the backend's hull bridge.
#[derive(Clone, Debug, PartialEq)]
pub struct HullGroup {
    pub name: &'static str,
    pub sites: Vec<Site>,
}

/// Allowed HullGroup sizes.
pub const HULL_GROUP_MIN: usize = 3;
pub const HULL_GROUP_MAX: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallEndpoint {
    pub site: Site,
    pub dir: Outward,
}

impl fmt::Display for WallEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.site, self.dir.dx, self.dir.dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Along one mount edge.
    Run,
    /// Same post, direction changes.
    Corner,
    /// Between two different mounts.
    Tweener,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub from: WallEndpoint,
    pub to: WallEndpoint,
}

impl WallSegment {
    pub fn kind(&self) -> SegmentKind {
        let owner = |s: &Site| match s {
            Site::Thumb(a, _) => Owner::Anchor(*a),
            Site::Key(slot, _) => Owner::Key(*slot),
            Site::LeftEdge(row) => Owner::Left(*row),
        };
        if owner(&self.from.site) != owner(&self.to.site) {
            SegmentKind::Tweener
        } else if self.from.site == self.to.site && self.from.dir != self.to.dir {
            SegmentKind::Corner
        } else {
            SegmentKind::Run
        }
    }
}

#[derive(PartialEq)]
enum Owner {
    Anchor(AnchorName),
    Key(KeySlot),
    Left(MatrixRow),
}

/// How a connection piece is hulled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceHull {
    Hull,
    LowestEnvelope,
}

/// Bespoke hull between the body's left wall and the cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionPiece {
    pub name: &'static str,
    pub hull: PieceHull,
    pub spots: Vec<Spot>,
}

/// Everything that defines one cluster variant's connective geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterLayout {
    pub name: &'static str,
    pub hull_groups: Vec<HullGroup>,
    /// Wall loop in traversal order; segment i ends where segment i+1 starts.
    pub walls: Vec<WallSegment>,
    /// Closes the loop through the main body: from the last wall end to the first wall start.
    pub handoff: WallSegment,
    pub connection: Vec<ConnectionPiece>,
}

impl ClusterLayout {
    /// Every site referenced by a HullGroup, wall segment or connection piece.
    pub fn referenced_sites(&self) -> impl Iterator<Item = Site> + '_ {
        let groups = self.hull_groups.iter().flat_map(|g| g.sites.iter().copied());
        let walls = self.walls.iter().flat_map(|w| [w.from.site, w.to.site]);
        let conn = self
            .connection
            .iter()
            .flat_map(|c| c.spots.iter().map(|p| p.site));
        groups.chain(walls).chain(conn)
    }
}

/// Known cluster variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterVariant {
    #[default]
    Mini,
}

impl ClusterVariant {
    pub fn layout(self) -> ClusterLayout {
        match self {
            ClusterVariant::Mini => mini::layout(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClusterVariant::Mini => "MINI",
        }
    }
}
