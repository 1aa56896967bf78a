use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use thumbcluster::prelude::*;
use thumbcluster::reference::PointSolid;
use thumbcluster::validate::ValidationReport;

/// Piece/vertex counts and bounds of one reference solid.
#[derive(Debug, Serialize)]
pub struct SolidSummary {
    pub pieces: usize,
    pub vertices: usize,
    pub min: Option<[f64; 3]>,
    pub max: Option<[f64; 3]>,
}

impl SolidSummary {
    fn of(solid: &PointSolid) -> Self {
        let bounds = solid.bounds();
        Self {
            pieces: solid.piece_count(),
            vertices: solid.vertex_count(),
            min: bounds.map(|(lo, _)| [lo.x, lo.y, lo.z]),
            max: bounds.map(|(_, hi)| [hi.x, hi.y, hi.z]),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub version: &'static str,
    pub validation: ValidationReport,
    pub web: SolidSummary,
    pub walls: SolidSummary,
    pub plates: SolidSummary,
    pub caps: SolidSummary,
    pub points: ClusterPoints,
}

/// Read cluster parameters from JSON; fields left out keep their defaults.
pub fn load_params(path: Option<&Path>) -> Result<ClusterParameters> {
    let Some(path) = path else {
        return Ok(ClusterParameters::default());
    };
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Validate only; no geometry is produced.
pub fn check(params: &ClusterParameters, variant: ClusterVariant) -> Result<ValidationReport> {
    let body = ReferenceBody::default();
    let cluster = ThumbCluster::new(params, variant, &body, MountDims::default())?;
    Ok(cluster.validation().clone())
}

/// Full build against the reference body, backend and shapes.
pub fn build(params: &ClusterParameters, variant: ClusterVariant) -> Result<BuildReport> {
    let body = ReferenceBody::default();
    let (backend, shapes) = (PointSolidBackend, BoxShapes::default());
    let cluster = ThumbCluster::new(params, variant, &body, shapes.mount)?;
    let solids = cluster.build(&backend, &shapes)?;
    tracing::info!(
        web = solids.web.piece_count(),
        walls = solids.walls.piece_count(),
        "built cluster"
    );
    Ok(BuildReport {
        version: thumbcluster::VERSION,
        validation: cluster.validation().clone(),
        web: SolidSummary::of(&solids.web),
        walls: SolidSummary::of(&solids.walls),
        plates: SolidSummary::of(&cluster.plates(&backend, &shapes)?),
        caps: SolidSummary::of(&cluster.caps(&backend, &shapes)?),
        points: cluster.points(),
    })
}
