//! Web between adjacent anchors and the main key matrix.
//!
//! Each HullGroup becomes one `hull_bridge` call over placed web posts; the
//! union of all groups is the web mesh. Group membership and order come from
//! the layout table, never from the coordinates.

use nalgebra::Point3;
use serde::Serialize;

use crate::backend::{GeometryBackend, ShapeLibrary};
use crate::body::MainBody;
use crate::error::Result;
use crate::layout::{HullGroup, Spot};
use crate::resolve::Resolver;

/// World points of one HullGroup, in group order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupPoints {
    pub name: &'static str,
    pub sites: Vec<String>,
    pub points: Vec<[f64; 3]>,
}

pub struct HullBridgeBuilder<'r, 'a, M: MainBody + ?Sized> {
    resolver: &'r Resolver<'a, M>,
}

impl<'r, 'a, M: MainBody + ?Sized> HullBridgeBuilder<'r, 'a, M> {
    pub fn new(resolver: &'r Resolver<'a, M>) -> Self {
        Self { resolver }
    }

    pub fn group_points(&self, group: &HullGroup) -> Vec<Point3<f64>> {
        group
            .sites
            .iter()
            .map(|&s| self.resolver.site_point(s))
            .collect()
    }

    pub fn describe(&self, group: &HullGroup) -> GroupPoints {
        GroupPoints {
            name: group.name,
            sites: group.sites.iter().map(|s| s.to_string()).collect(),
            points: self
                .group_points(group)
                .into_iter()
                .map(|p| [p.x, p.y, p.z])
                .collect(),
        }
    }

    /// Web panel for a single group.
    pub fn group_shape<B, L>(&self, backend: &B, library: &L, group: &HullGroup) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        let post = library.web_post(backend);
        let shapes: Vec<_> = group
            .sites
            .iter()
            .map(|&s| self.resolver.spot_shape(backend, &post, &Spot::at(s)))
            .collect();
        backend.hull_bridge(&shapes)
    }

    /// Union of every group's panel.
    pub fn build<B, L>(&self, backend: &B, library: &L, groups: &[HullGroup]) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        let mut panels = Vec::with_capacity(groups.len());
        for group in groups {
            tracing::debug!(group = group.name, posts = group.sites.len(), "bridging");
            panels.push(self.group_shape(backend, library, group)?);
        }
        backend.union(panels)
    }
}
