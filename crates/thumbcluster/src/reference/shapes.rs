//! Box-and-frustum stand-ins for the key mount shape library.

use nalgebra::Vector3;

use crate::backend::ShapeLibrary;
use crate::posts::MountDims;

use super::solid::{PointSolid, PointSolidBackend};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShapes {
    pub mount: MountDims,
    /// Side of the square web post.
    pub post_size: f64,
    pub web_thickness: f64,
    pub plate_thickness: f64,
    /// Cap footprint at the base and at the top, and cap height.
    pub cap_bottom: f64,
    pub cap_top: f64,
    pub cap_height: f64,
    /// Gap between plate top and cap base.
    pub cap_lift: f64,
}

impl Default for BoxShapes {
    fn default() -> Self {
        Self {
            mount: MountDims::default(),
            post_size: 0.1,
            web_thickness: 4.1,
            plate_thickness: 5.1,
            cap_bottom: 18.25,
            cap_top: 12.0,
            cap_height: 12.0,
            cap_lift: 5.0,
        }
    }
}

impl ShapeLibrary<PointSolidBackend> for BoxShapes {
    fn mount(&self) -> MountDims {
        self.mount
    }

    /// Post hangs down from the plate top.
    fn web_post(&self, _backend: &PointSolidBackend) -> PointSolid {
        PointSolid::cuboid(
            Vector3::new(self.post_size, self.post_size, self.web_thickness),
            Vector3::new(0.0, 0.0, self.plate_thickness - self.web_thickness / 2.0),
        )
    }

    fn plate(&self, _backend: &PointSolidBackend) -> PointSolid {
        PointSolid::cuboid(
            Vector3::new(self.mount.width, self.mount.height, self.plate_thickness),
            Vector3::new(0.0, 0.0, self.plate_thickness / 2.0),
        )
    }

    fn key_cap(&self, backend: &PointSolidBackend) -> PointSolid {
        use crate::backend::GeometryBackend;
        let cap = PointSolid::frustum(self.cap_bottom, self.cap_top, self.cap_height);
        backend.translate(cap, Vector3::new(0.0, 0.0, self.plate_thickness + self.cap_lift))
    }
}
