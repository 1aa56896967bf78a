//! Point-set solids: unions of convex pieces, each the hull of its vertices.
//!
//! Purpose
//! - A small, exact-enough backend for tests and the CLI. Hulls are kept as
//!   vertex sets (no face enumeration); degeneracy is detected from the
//!   initial simplex the same way quickhull seeds itself.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::backend::GeometryBackend;
use crate::cfg::{COINCIDENT_EPS, COLLINEAR_EPS, FLAT_EPS};
use crate::error::{ClusterError, Result};
use crate::transform::rotation_from_degrees;

/// Convex piece: the hull of `vertices`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPiece {
    pub vertices: Vec<Point3<f64>>,
}

impl ConvexPiece {
    pub fn centroid(&self) -> Point3<f64> {
        centroid(self.vertices.iter())
    }
}

/// Union of convex pieces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSolid {
    pub pieces: Vec<ConvexPiece>,
}

impl PointSolid {
    pub fn from_points(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            pieces: vec![ConvexPiece { vertices }],
        }
    }

    /// Axis-aligned box with the given full extents, centred at `centre`.
    pub fn cuboid(extent: Vector3<f64>, centre: Vector3<f64>) -> Self {
        let h = extent / 2.0;
        let mut v = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    v.push(Point3::new(sx * h.x, sy * h.y, sz * h.z) + centre);
                }
            }
        }
        Self::from_points(v)
    }

    /// Square frustum: `bottom` side at z = 0, `top` side at z = `height`.
    pub fn frustum(bottom: f64, top: f64, height: f64) -> Self {
        let mut v = Vec::with_capacity(8);
        for (side, z) in [(bottom, 0.0), (top, height)] {
            let s = side / 2.0;
            for (x, y) in [(-s, -s), (s, -s), (s, s), (-s, s)] {
                v.push(Point3::new(x, y, z));
            }
        }
        Self::from_points(v)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.pieces.iter().flat_map(|p| p.vertices.iter())
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.pieces.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn centroid(&self) -> Point3<f64> {
        centroid(self.vertices())
    }

    /// Axis-aligned bounds, `None` for an empty solid.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut it = self.vertices();
        let first = *it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))))
    }

    fn map(self, f: impl Fn(Point3<f64>) -> Point3<f64>) -> Self {
        Self {
            pieces: self
                .pieces
                .into_iter()
                .map(|p| ConvexPiece {
                    vertices: p.vertices.into_iter().map(&f).collect(),
                })
                .collect(),
        }
    }
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Point3<f64> {
    let (sum, n) = points.fold((Vector3::zeros(), 0usize), |(s, n), p| (s + p.coords, n + 1));
    if n == 0 {
        Point3::origin()
    } else {
        Point3::from(sum / n as f64)
    }
}

fn farthest_by(points: &[Point3<f64>], key: impl Fn(&Point3<f64>) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, key(p)))
        .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
}

/// Why a point set cannot bound a solid, if it cannot.
pub(crate) fn degeneracy(points: &[Point3<f64>]) -> Option<&'static str> {
    let p0 = *points.first()?;
    let (i1, d1) = farthest_by(points, |p| (p - p0).norm());
    if d1 < COINCIDENT_EPS {
        return Some("all points coincide");
    }
    let axis = (points[i1] - p0) / d1;
    let (i2, d2) = farthest_by(points, |p| (p - p0).cross(&axis).norm());
    if d2 < COLLINEAR_EPS {
        return Some("points are collinear");
    }
    let normal = (points[i1] - p0).cross(&(points[i2] - p0)).normalize();
    let (_, d3) = farthest_by(points, |p| (p - p0).dot(&normal).abs());
    if d3 < FLAT_EPS {
        return Some("points are coplanar (zero volume)");
    }
    None
}

fn dedup(points: &mut Vec<Point3<f64>>) {
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points.drain(..) {
        if !out.iter().any(|q| (q - p).norm() < COINCIDENT_EPS) {
            out.push(p);
        }
    }
    *points = out;
}

/// Reference geometry backend over `PointSolid`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointSolidBackend;

impl PointSolidBackend {
    fn hull_points(context: &str, mut points: Vec<Point3<f64>>) -> Result<PointSolid> {
        dedup(&mut points);
        if points.is_empty() {
            return Err(ClusterError::geometry(context, "no input points"));
        }
        if let Some(reason) = degeneracy(&points) {
            return Err(ClusterError::geometry(context, reason));
        }
        Ok(PointSolid::from_points(points))
    }
}

impl GeometryBackend for PointSolidBackend {
    type Shape = PointSolid;

    fn rotate(&self, shape: PointSolid, degrees: Vector3<f64>) -> PointSolid {
        let r: Rotation3<f64> = rotation_from_degrees(degrees);
        shape.map(|p| r * p)
    }

    fn translate(&self, shape: PointSolid, offset: Vector3<f64>) -> PointSolid {
        shape.map(|p| p + offset)
    }

    fn union(&self, shapes: Vec<PointSolid>) -> Result<PointSolid> {
        if shapes.is_empty() {
            return Err(ClusterError::geometry("union", "nothing to union"));
        }
        Ok(PointSolid {
            pieces: shapes.into_iter().flat_map(|s| s.pieces).collect(),
        })
    }

    fn hull(&self, shapes: &[PointSolid]) -> Result<PointSolid> {
        Self::hull_points("hull", shapes.iter().flat_map(|s| s.vertices().copied()).collect())
    }

    fn lowest_envelope(&self, shapes: &[PointSolid]) -> Result<PointSolid> {
        let mut points: Vec<_> = shapes.iter().flat_map(|s| s.vertices().copied()).collect();
        let floor: Vec<_> = points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
        points.extend(floor);
        Self::hull_points("lowest envelope", points)
    }

    /// Rejects windows whose input shapes coincide or line up before hulling.
    fn hull_bridge(&self, shapes: &[PointSolid]) -> Result<PointSolid> {
        let mut hulls = Vec::with_capacity(shapes.len().saturating_sub(2));
        for (i, window) in shapes.windows(3).enumerate() {
            let centres: Vec<_> = window.iter().map(PointSolid::centroid).collect();
            for (a, b) in [(0, 1), (1, 2), (0, 2)] {
                if (centres[a] - centres[b]).norm() < COINCIDENT_EPS {
                    return Err(ClusterError::geometry(
                        "hull bridge",
                        format!("window {i}: inputs {} and {} coincide", i + a, i + b),
                    ));
                }
            }
            let area = (centres[1] - centres[0]).cross(&(centres[2] - centres[0])).norm() / 2.0;
            if area < COLLINEAR_EPS {
                return Err(ClusterError::geometry(
                    "hull bridge",
                    format!("window {i}: inputs are collinear"),
                ));
            }
            hulls.push(self.hull(window)?);
        }
        self.union(hulls)
    }
}
