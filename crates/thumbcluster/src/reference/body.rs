//! Dactyl-style curved key matrix used as the main body in tests and the CLI.
//!
//! Key placement (applied to the mount, innermost first):
//! 1. row curvature: rotate about X by `alpha · (centre_row − row)` around a
//!    pivot `row_radius` below the key;
//! 2. column curvature: rotate about Y by `beta · (centre_col − col)` around a
//!    pivot `column_radius` below the key;
//! 3. per-column stagger offset;
//! 4. tent about Y, then lift by `z_offset`.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::body::{MainBody, MatrixRow, WallOffsets};
use crate::posts::MountDims;
use crate::transform::Pose;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub mount: MountDims,
    pub rows: usize,
    pub columns: usize,
    /// Row curvature step, degrees.
    pub alpha_deg: f64,
    /// Column curvature step, degrees.
    pub beta_deg: f64,
    pub centre_col: f64,
    pub tenting_deg: f64,
    pub extra_width: f64,
    pub extra_height: f64,
    /// Plate thickness plus keycap profile height.
    pub cap_top_height: f64,
    pub z_offset: f64,
    /// Stagger per column; missing columns use zero.
    pub column_offsets: Vec<[f64; 3]>,
    pub wall_thickness: f64,
    pub wall_x_offset: f64,
    pub wall_y_offset: f64,
    pub wall_z_offset: f64,
    pub wall_base_x_thickness: f64,
    pub wall_base_y_thickness: f64,
    pub left_wall_x_offset: f64,
    pub left_wall_z_offset: f64,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            mount: MountDims::default(),
            rows: 5,
            columns: 6,
            alpha_deg: 15.0,
            beta_deg: 5.0,
            centre_col: 3.0,
            tenting_deg: 15.0,
            extra_width: 2.5,
            extra_height: 1.0,
            cap_top_height: 5.1 + 12.7,
            z_offset: 9.0,
            column_offsets: vec![
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 2.82, -4.5],
                [0.0, 0.0, 0.0],
                [0.0, -12.0, 5.64],
                [0.0, -12.0, 5.64],
            ],
            wall_thickness: 4.5,
            wall_x_offset: 5.0,
            wall_y_offset: 6.0,
            wall_z_offset: 15.0,
            wall_base_x_thickness: 3.0,
            wall_base_y_thickness: 3.0,
            left_wall_x_offset: 8.0,
            left_wall_z_offset: 3.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReferenceBody {
    params: BodyParams,
}

impl ReferenceBody {
    pub fn new(params: BodyParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &BodyParams {
        &self.params
    }

    #[inline]
    fn centre_row(&self) -> f64 {
        self.params.rows as f64 - 3.0
    }

    fn row_radius(&self) -> f64 {
        let p = &self.params;
        ((p.mount.height + p.extra_height) / 2.0) / (p.alpha_deg.to_radians() / 2.0).sin()
            + p.cap_top_height
    }

    fn column_radius(&self) -> f64 {
        let p = &self.params;
        ((p.mount.width + p.extra_width) / 2.0) / (p.beta_deg.to_radians() / 2.0).sin()
            + p.cap_top_height
    }

    /// Key placement as a single rigid transform.
    pub fn key_isometry(&self, column: usize, row: usize) -> Isometry3<f64> {
        let p = &self.params;
        let lift = |z: f64| Isometry3::from_parts(Translation3::new(0.0, 0.0, z), UnitQuaternion::identity());
        let about = |axis: Vector3<f64>, deg: f64| {
            Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_scaled_axis(axis * deg.to_radians()),
            )
        };
        let offset = p.column_offsets.get(column).copied().unwrap_or([0.0; 3]);
        let row_angle = p.alpha_deg * (self.centre_row() - row as f64);
        let column_angle = p.beta_deg * (p.centre_col - column as f64);
        let (rr, cr) = (self.row_radius(), self.column_radius());

        lift(p.z_offset)
            * about(Vector3::y(), p.tenting_deg)
            * Isometry3::from_parts(
                Translation3::new(offset[0], offset[1], offset[2]),
                UnitQuaternion::identity(),
            )
            * lift(cr)
            * about(Vector3::y(), column_angle)
            * lift(-cr)
            * lift(rr)
            * about(Vector3::x(), row_angle)
            * lift(-rr)
    }

    /// Key-placed point (without the pose round-trip through Euler angles).
    pub fn key_position(&self, local: Point3<f64>, column: usize, row: usize) -> Point3<f64> {
        self.key_isometry(column, row) * local
    }
}

impl Default for ReferenceBody {
    fn default() -> Self {
        Self::new(BodyParams::default())
    }
}

impl MainBody for ReferenceBody {
    /// Bottom-right corner of the column-1 corner-row key.
    fn shared_origin(&self) -> Vector3<f64> {
        let m = &self.params.mount;
        let row = self.row_index(MatrixRow::Corner);
        self.key_position(Point3::new(m.width / 2.0, -m.height / 2.0, 0.0), 1, row)
            .coords
    }

    fn row_index(&self, row: MatrixRow) -> usize {
        let last = self.params.rows.saturating_sub(1);
        match row {
            MatrixRow::Last => last,
            MatrixRow::Corner => last.saturating_sub(1),
        }
    }

    fn key_pose(&self, column: usize, row: usize) -> Pose {
        Pose::from_isometry(&self.key_isometry(column, row))
    }

    fn left_edge(&self, row: usize) -> Vector3<f64> {
        let p = &self.params;
        let edge = self.key_position(
            Point3::new(-p.mount.width / 2.0, -p.mount.height / 2.0, 0.0),
            0,
            row,
        );
        edge.coords - Vector3::new(p.left_wall_x_offset, 0.0, p.left_wall_z_offset)
    }

    fn wall_offsets(&self, dx: f64, dy: f64) -> WallOffsets {
        let p = &self.params;
        WallOffsets {
            near: Vector3::new(dx * p.wall_thickness, dy * p.wall_thickness, -1.0),
            mid: Vector3::new(dx * p.wall_x_offset, dy * p.wall_y_offset, -p.wall_z_offset),
            far: Vector3::new(
                dx * (p.wall_x_offset + p.wall_base_x_thickness),
                dy * (p.wall_y_offset + p.wall_base_y_thickness),
                -p.wall_z_offset,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::{corner, Corner};

    #[test]
    fn pose_matches_isometry_on_posts() {
        let body = ReferenceBody::default();
        let dims = body.params().mount;
        for column in 0..4 {
            for row in [3usize, 4] {
                let iso = body.key_isometry(column, row);
                let pose = body.key_pose(column, row);
                for c in Corner::ALL {
                    let local = Point3::from(corner(&dims, c));
                    assert!((pose.apply(local) - iso * local).norm() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn boundary_post_uses_slot_rows() {
        let body = ReferenceBody::default();
        let dims = body.params().mount;
        let slot = crate::body::KeySlot::last(3);
        let expected = body.key_position(Point3::from(corner(&dims, Corner::Bl)), 3, 4);
        assert!((body.boundary_post(slot, Corner::Bl, &dims) - expected).norm() < 1e-9);
        assert_eq!(body.row_index(MatrixRow::Corner), 3);
    }

    #[test]
    fn wall_offsets_grow_outward() {
        let body = ReferenceBody::default();
        let w = body.wall_offsets(0.0, -1.0);
        assert!(w.near.y > w.mid.y && w.mid.y > w.far.y);
        assert_eq!(w.mid.z, w.far.z);
        assert_eq!(w.near.x, 0.0);
    }
}
