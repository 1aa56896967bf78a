//! Turn symbolic sites and spots into world points and placed shapes.
//!
//! A spot's local offset (corner + optional wall offset) is applied in the
//! frame that owns the site, then the frame places it. Thumb sites go through
//! the anchor pipeline, key sites through the body's key pose, left-edge sites
//! through a plain translation.

use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::backend::GeometryBackend;
use crate::body::{MainBody, WallLevel};
use crate::layout::{Spot, Site, WallEndpoint};
use crate::params::AnchorName;
use crate::placement::PlacementTable;
use crate::posts::{corner, MountDims};
use crate::transform::Pose;

/// Frame that owns a site.
#[derive(Clone, Copy, Debug)]
enum Frame {
    Anchor(AnchorName),
    Body(Pose),
}

/// Post plus its three wall offsets, all in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WallPoints {
    pub post: [f64; 3],
    pub near: [f64; 3],
    pub mid: [f64; 3],
    pub far: [f64; 3],
}

impl WallPoints {
    pub fn iter(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        [self.post, self.near, self.mid, self.far]
            .into_iter()
            .map(|p| Point3::new(p[0], p[1], p[2]))
    }

    /// Largest distance between corresponding points.
    pub fn max_distance(&self, other: &WallPoints) -> f64 {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

pub struct Resolver<'a, M: MainBody + ?Sized> {
    table: &'a PlacementTable,
    body: &'a M,
    dims: MountDims,
}

impl<'a, M: MainBody + ?Sized> Resolver<'a, M> {
    pub fn new(table: &'a PlacementTable, body: &'a M, dims: MountDims) -> Self {
        Self { table, body, dims }
    }

    fn frame_and_local(&self, site: Site) -> (Frame, Vector3<f64>) {
        match site {
            Site::Thumb(a, c) => (Frame::Anchor(a), corner(&self.dims, c)),
            Site::Key(slot, c) => (Frame::Body(self.body.slot_pose(slot)), corner(&self.dims, c)),
            Site::LeftEdge(row) => {
                let at = self.body.left_edge(self.body.row_index(row));
                (Frame::Body(Pose::translation(at)), Vector3::zeros())
            }
        }
    }

    fn spot_local(&self, spot: &Spot) -> (Frame, Vector3<f64>) {
        let (frame, mut local) = self.frame_and_local(spot.site);
        if let Some((level, dir)) = spot.wall {
            local += self.body.wall_offsets(dir.dx, dir.dy).get(level);
        }
        (frame, local)
    }

    pub fn site_point(&self, site: Site) -> Point3<f64> {
        self.spot_point(&Spot::at(site))
    }

    pub fn spot_point(&self, spot: &Spot) -> Point3<f64> {
        let (frame, local) = self.spot_local(spot);
        let local = Point3::from(local);
        match frame {
            Frame::Anchor(a) => self.table.place_point(a, local),
            Frame::Body(pose) => pose.apply(local),
        }
    }

    /// Place `post` (a shape centred on the local origin) at the spot.
    pub fn spot_shape<B: GeometryBackend>(&self, backend: &B, post: &B::Shape, spot: &Spot) -> B::Shape {
        let (frame, local) = self.spot_local(spot);
        let shape = backend.translate(post.clone(), local);
        match frame {
            Frame::Anchor(a) => self.table.place(backend, a, shape),
            Frame::Body(pose) => pose.apply_shape(backend, shape),
        }
    }

    pub fn endpoint_points(&self, ep: &WallEndpoint) -> WallPoints {
        let at = |level: Option<WallLevel>| {
            let spot = match level {
                None => Spot::at(ep.site),
                Some(l) => Spot::wall(ep.site, l, ep.dir),
            };
            let p = self.spot_point(&spot);
            [p.x, p.y, p.z]
        };
        WallPoints {
            post: at(None),
            near: at(Some(WallLevel::Near)),
            mid: at(Some(WallLevel::Mid)),
            far: at(Some(WallLevel::Far)),
        }
    }
}
