//! Connectivity checks run before any geometry is handed to the backend.
//!
//! - Every resolved post and wall point finite (finite inputs can overflow).
//! - HullGroup arity within `[HULL_GROUP_MIN, HULL_GROUP_MAX]`.
//! - No hull window with coincident or collinear posts.
//! - Every corner post of every anchor used by a HullGroup or wall segment.
//! - Wall loop closed: each junction (including the hand-off through the main
//!   body) agrees on post, near, mid and far points within tolerance.

use std::collections::BTreeSet;

use nalgebra::Point3;
use serde::Serialize;

use crate::body::MainBody;
use crate::cfg::ValidateCfg;
use crate::error::{ClusterError, Result};
use crate::layout::{ClusterLayout, HullGroup, Spot, Site, HULL_GROUP_MAX, HULL_GROUP_MIN};
use crate::params::AnchorName;
use crate::posts::Corner;
use crate::resolve::Resolver;

/// Summary of a successful validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationReport {
    pub hull_groups: usize,
    pub hull_windows: usize,
    pub wall_segments: usize,
    pub covered_posts: usize,
    /// Largest junction mismatch seen along the wall loop (mm).
    pub max_junction_gap: f64,
}

pub fn check_group_arity(group: &HullGroup) -> Result<()> {
    let n = group.sites.len();
    if !(HULL_GROUP_MIN..=HULL_GROUP_MAX).contains(&n) {
        return Err(ClusterError::gap(format!(
            "hull group `{}` has {n} posts (expected {HULL_GROUP_MIN}..={HULL_GROUP_MAX})",
            group.name
        )));
    }
    Ok(())
}

/// Reject windows of three consecutive points that are coincident or collinear.
pub fn check_windows(context: &str, points: &[Point3<f64>], cfg: &ValidateCfg) -> Result<usize> {
    for (i, w) in points.windows(3).enumerate() {
        for (a, b) in [(0, 1), (1, 2), (0, 2)] {
            if (w[a] - w[b]).norm() < cfg.eps_coincident {
                return Err(ClusterError::geometry(
                    context,
                    format!("window {i}: posts {} and {} coincide", i + a, i + b),
                ));
            }
        }
        let area = 0.5 * (w[1] - w[0]).cross(&(w[2] - w[0])).norm();
        if area < cfg.eps_collinear {
            return Err(ClusterError::geometry(
                context,
                format!("window {i}: posts {i}..{} are collinear", i + 2),
            ));
        }
    }
    Ok(points.len().saturating_sub(2))
}

/// Every anchor corner must be bridged or walled somewhere.
pub fn check_coverage(layout: &ClusterLayout) -> Result<usize> {
    let used: BTreeSet<Site> = layout
        .hull_groups
        .iter()
        .flat_map(|g| g.sites.iter().copied())
        .chain(layout.walls.iter().flat_map(|w| [w.from.site, w.to.site]))
        .collect();
    let mut covered = 0;
    for a in AnchorName::ALL {
        for c in Corner::ALL {
            let site = Site::Thumb(a, c);
            if !used.contains(&site) {
                return Err(ClusterError::gap(format!("orphan post {site}")));
            }
            covered += 1;
        }
    }
    Ok(covered)
}

/// Reject any resolved site, wall offset or connection spot that is not finite.
pub fn check_finite_points<M: MainBody + ?Sized>(layout: &ClusterLayout, resolver: &Resolver<'_, M>) -> Result<()> {
    let non_finite = |p: Point3<f64>| !p.coords.iter().all(|c| c.is_finite());
    for group in &layout.hull_groups {
        for &site in &group.sites {
            if non_finite(resolver.site_point(site)) {
                return Err(ClusterError::geometry(format!("site {site}"), "resolved point is not finite"));
            }
        }
    }
    let endpoints = layout
        .walls
        .iter()
        .chain(std::iter::once(&layout.handoff))
        .flat_map(|w| [w.from, w.to]);
    for ep in endpoints {
        if resolver.endpoint_points(&ep).iter().any(non_finite) {
            return Err(ClusterError::geometry(format!("wall endpoint {ep}"), "resolved point is not finite"));
        }
    }
    for piece in &layout.connection {
        if piece.spots.iter().map(|p: &Spot| resolver.spot_point(p)).any(non_finite) {
            return Err(ClusterError::geometry(
                format!("connection `{}`", piece.name),
                "resolved point is not finite",
            ));
        }
    }
    Ok(())
}

/// Walk the wall loop and the hand-off; returns the largest junction gap.
pub fn check_wall_loop<M: MainBody + ?Sized>(
    layout: &ClusterLayout,
    resolver: &Resolver<'_, M>,
    cfg: &ValidateCfg,
) -> Result<f64> {
    let (first, last) = match (layout.walls.first(), layout.walls.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(ClusterError::gap("wall loop has no segments")),
    };
    let mut junctions: Vec<(String, _, _)> = layout
        .walls
        .windows(2)
        .enumerate()
        .map(|(i, w)| (format!("segment {i} -> {}", i + 1), w[0].to, w[1].from))
        .collect();
    junctions.push(("last segment -> hand-off".into(), last.to, layout.handoff.from));
    junctions.push(("hand-off -> first segment".into(), layout.handoff.to, first.from));

    let mut max_gap: f64 = 0.0;
    for (label, end, start) in junctions {
        let gap = resolver
            .endpoint_points(&end)
            .max_distance(&resolver.endpoint_points(&start));
        if gap > cfg.eps_closure {
            return Err(ClusterError::gap(format!(
                "wall loop open at {label}: {end} does not meet {start} (gap {gap:.3e} mm)"
            )));
        }
        max_gap = max_gap.max(gap);
    }
    Ok(max_gap)
}

/// Run every check against the resolved layout.
pub fn validate_layout<M: MainBody + ?Sized>(
    layout: &ClusterLayout,
    resolver: &Resolver<'_, M>,
    cfg: &ValidateCfg,
) -> Result<ValidationReport> {
    check_finite_points(layout, resolver)?;
    let mut hull_windows = 0;
    for group in &layout.hull_groups {
        check_group_arity(group)?;
        let points: Vec<_> = group.sites.iter().map(|&s| resolver.site_point(s)).collect();
        hull_windows += check_windows(&format!("hull group `{}`", group.name), &points, cfg)?;
    }
    let covered_posts = check_coverage(layout)?;
    let max_junction_gap = check_wall_loop(layout, resolver, cfg)?;
    let report = ValidationReport {
        hull_groups: layout.hull_groups.len(),
        hull_windows,
        wall_segments: layout.walls.len(),
        covered_posts,
        max_junction_gap,
    };
    tracing::debug!(layout = layout.name, ?report, "layout validated");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_reject_coincident_and_collinear() {
        let cfg = ValidateCfg::default();
        let ok = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        assert_eq!(check_windows("ok", &ok, &cfg).unwrap(), 2);

        let dup = [ok[0], ok[1], ok[1]];
        assert!(matches!(
            check_windows("dup", &dup, &cfg),
            Err(ClusterError::Geometry { .. })
        ));

        let line = [ok[0], ok[1], Point3::new(2.0, 0.0, 0.0)];
        let err = check_windows("line", &line, &cfg).unwrap_err();
        assert!(err.to_string().contains("collinear"));
    }

    #[test]
    fn arity_bounds() {
        let mut g = HullGroup {
            name: "g",
            sites: vec![Site::Thumb(AnchorName::Tr, Corner::Tl); 2],
        };
        assert!(check_group_arity(&g).is_err());
        g.sites = vec![Site::Thumb(AnchorName::Tr, Corner::Tl); 11];
        assert!(check_group_arity(&g).is_ok());
        g.sites.push(Site::Thumb(AnchorName::Tr, Corner::Tr));
        assert!(matches!(
            check_group_arity(&g),
            Err(ClusterError::AdjacencyGap { .. })
        ));
    }
}
