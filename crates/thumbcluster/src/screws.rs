//! Fastener positions. Holes are referenced to the base plane, so z is always 0.

use nalgebra::{Point3, Vector2, Vector3};

#[derive(Clone, Copy, Debug)]
pub struct ScrewPositionResolver {
    origin: Vector3<f64>,
    offset: Vector3<f64>,
}

impl ScrewPositionResolver {
    pub fn new(origin: Vector3<f64>, offset: Vector3<f64>) -> Self {
        Self { origin, offset }
    }

    /// `origin + offset` before the base-plane projection.
    #[inline]
    pub fn raw_position(&self) -> Point3<f64> {
        Point3::from(self.origin + self.offset)
    }

    pub fn screw_position(&self) -> Point3<f64> {
        let mut p = self.raw_position();
        p.z = 0.0;
        p
    }

    /// Footprint-relative xy locations lifted onto the base plane.
    pub fn footprint(xy: &[Vector2<f64>]) -> Vec<Point3<f64>> {
        xy.iter().map(|v| Point3::new(v.x, v.y, 0.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_is_forced_to_zero() {
        let r = ScrewPositionResolver::new(Vector3::new(6.0, -3.0, 7.0), Vector3::new(-29.0, -51.0, -16.0));
        assert_eq!(r.raw_position(), Point3::new(-23.0, -54.0, -9.0));
        assert_eq!(r.screw_position(), Point3::new(-23.0, -54.0, 0.0));
    }

    #[test]
    fn footprint_lies_on_base_plane() {
        let pts = ScrewPositionResolver::footprint(&[Vector2::new(-62.0, 10.0), Vector2::new(12.0, -25.0)]);
        assert_eq!(pts, vec![Point3::new(-62.0, 10.0, 0.0), Point3::new(12.0, -25.0, 0.0)]);
    }
}
