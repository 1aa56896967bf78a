//! Cluster facade: validate once, then hand out web, walls, plates and caps.
//!
//! Construction runs every check that does not need a backend (parameter
//! validation, layout arity/coverage/degeneracy, wall-loop closure), so a
//! `ThumbCluster` value is always safe to build geometry from.

use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::backend::{GeometryBackend, ShapeLibrary};
use crate::body::MainBody;
use crate::bridge::{GroupPoints, HullBridgeBuilder};
use crate::cfg::ValidateCfg;
use crate::error::{ClusterError, Result};
use crate::layout::{ClusterLayout, ClusterVariant};
use crate::params::{AnchorName, ClusterParameters, ValidParams};
use crate::placement::PlacementTable;
use crate::posts::{Corner, MountDims};
use crate::resolve::Resolver;
use crate::screws::ScrewPositionResolver;
use crate::validate::{validate_layout, ValidationReport};
use crate::walls::{SegmentPoints, WallSynthesizer};

/// The two connective solids handed to the assembly layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSolids<S> {
    pub web: S,
    pub walls: S,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnchorPoints {
    pub name: AnchorName,
    pub centre: [f64; 3],
    pub posts: Vec<(Corner, [f64; 3])>,
}

/// Every resolved point of a build; identical inputs give identical snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterPoints {
    pub layout: &'static str,
    pub origin: [f64; 3],
    pub anchors: Vec<AnchorPoints>,
    pub hull_groups: Vec<GroupPoints>,
    pub walls: Vec<SegmentPoints>,
    pub handoff: SegmentPoints,
    pub screw: [f64; 3],
    pub footprint_screws: Vec<[f64; 3]>,
}

#[inline]
fn arr(p: Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

pub struct ThumbCluster<'a, M: MainBody + ?Sized> {
    params: ValidParams,
    table: PlacementTable,
    layout: ClusterLayout,
    body: &'a M,
    dims: MountDims,
    report: ValidationReport,
}

impl<'a, M: MainBody + ?Sized> ThumbCluster<'a, M> {
    pub fn new(
        raw: &ClusterParameters,
        variant: ClusterVariant,
        body: &'a M,
        dims: MountDims,
    ) -> Result<Self> {
        Self::with_layout(raw, variant.layout(), body, dims, &ValidateCfg::default())
    }

    /// Build from an explicit layout table (custom or modified variants).
    pub fn with_layout(
        raw: &ClusterParameters,
        layout: ClusterLayout,
        body: &'a M,
        dims: MountDims,
        cfg: &ValidateCfg,
    ) -> Result<Self> {
        let params = raw.validate()?;
        if !(dims.width.is_finite() && dims.height.is_finite() && dims.width > 0.0 && dims.height > 0.0) {
            return Err(ClusterError::config("mount", "mount width and height must be positive and finite"));
        }
        if !(dims.inset.is_finite() && dims.inset >= 0.0) {
            return Err(ClusterError::config("mount.inset", "inset must be finite and non-negative"));
        }
        let table = PlacementTable::new(&params, body.shared_origin());
        let report = validate_layout(&layout, &Resolver::new(&table, body, dims), cfg)?;
        tracing::debug!(layout = layout.name, origin = ?table.origin(), "cluster ready");
        Ok(Self {
            params,
            table,
            layout,
            body,
            dims,
            report,
        })
    }

    #[inline]
    pub fn table(&self) -> &PlacementTable {
        &self.table
    }

    #[inline]
    pub fn layout(&self) -> &ClusterLayout {
        &self.layout
    }

    #[inline]
    pub fn params(&self) -> &ValidParams {
        &self.params
    }

    #[inline]
    pub fn validation(&self) -> &ValidationReport {
        &self.report
    }

    fn resolver(&self) -> Resolver<'_, M> {
        Resolver::new(&self.table, self.body, self.dims)
    }

    fn check_library<B: GeometryBackend, L: ShapeLibrary<B> + ?Sized>(&self, library: &L) -> Result<()> {
        let mount = library.mount();
        if mount != self.dims {
            return Err(ClusterError::config(
                "mount",
                format!("shape library mount {mount:?} differs from cluster mount {:?}", self.dims),
            ));
        }
        Ok(())
    }

    pub fn web<B, L>(&self, backend: &B, library: &L) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        self.check_library::<B, L>(library)?;
        let resolver = self.resolver();
        HullBridgeBuilder::new(&resolver).build(backend, library, &self.layout.hull_groups)
    }

    pub fn walls<B, L>(&self, backend: &B, library: &L) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        self.check_library::<B, L>(library)?;
        let resolver = self.resolver();
        WallSynthesizer::new(&resolver).build(
            backend,
            library,
            &self.layout.walls,
            &self.layout.connection,
        )
    }

    pub fn build<B, L>(&self, backend: &B, library: &L) -> Result<ClusterSolids<B::Shape>>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        let web = self.web(backend, library)?;
        let walls = self.walls(backend, library)?;
        Ok(ClusterSolids { web, walls })
    }

    /// Switch plates on every anchor, each turned by its plate rotation.
    pub fn plates<B, L>(&self, backend: &B, library: &L) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        self.check_library::<B, L>(library)?;
        let plate = library.plate(backend);
        let placed = AnchorName::ALL
            .iter()
            .map(|&a| self.table.place_plate(backend, a, plate.clone()))
            .collect();
        backend.union(placed)
    }

    /// Key caps; the tr cap is a 1.5u cap turned a quarter turn.
    pub fn caps<B, L>(&self, backend: &B, library: &L) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        self.check_library::<B, L>(library)?;
        let cap = library.key_cap(backend);
        let placed = AnchorName::ALL
            .iter()
            .map(|&a| {
                let cap = match a {
                    AnchorName::Tr => backend.rotate(cap.clone(), Vector3::new(0.0, 0.0, 90.0)),
                    _ => cap.clone(),
                };
                self.table.place_plate(backend, a, cap)
            })
            .collect();
        backend.union(placed)
    }

    pub fn screw_position(&self) -> Point3<f64> {
        ScrewPositionResolver::new(self.table.origin(), self.params.screw_offset).screw_position()
    }

    pub fn footprint_screws(&self, separable: bool) -> Vec<Point3<f64>> {
        let xy = if separable {
            &self.params.separable_screw_xy
        } else {
            &self.params.screw_xy
        };
        ScrewPositionResolver::footprint(xy)
    }

    pub fn points(&self) -> ClusterPoints {
        let resolver = self.resolver();
        let bridge = HullBridgeBuilder::new(&resolver);
        let walls = WallSynthesizer::new(&resolver);
        let anchors = AnchorName::ALL
            .iter()
            .map(|&name| AnchorPoints {
                name,
                centre: arr(self.table.place_point(name, Point3::origin())),
                posts: Corner::ALL
                    .iter()
                    .map(|&c| (c, arr(self.table.post(name, &self.dims, c))))
                    .collect(),
            })
            .collect();
        let o = self.table.origin();
        ClusterPoints {
            layout: self.layout.name,
            origin: [o.x, o.y, o.z],
            anchors,
            hull_groups: self.layout.hull_groups.iter().map(|g| bridge.describe(g)).collect(),
            walls: self.layout.walls.iter().map(|s| walls.describe(s)).collect(),
            handoff: walls.describe(&self.layout.handoff),
            screw: arr(self.screw_position()),
            footprint_screws: self.footprint_screws(false).into_iter().map(arr).collect(),
        }
    }
}

#[cfg(test)]
mod tests;
