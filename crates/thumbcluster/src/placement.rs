//! Anchor placement table: one `AnchorTransform` per named anchor.

use nalgebra::{Point3, Vector3};

use crate::backend::GeometryBackend;
use crate::params::{AnchorName, ValidParams};
use crate::posts::{corner, Corner, MountDims};
use crate::transform::AnchorTransform;

/// Built once per build from validated parameters; immutable afterwards.
#[derive(Clone, Debug)]
pub struct PlacementTable {
    origin: Vector3<f64>,
    anchors: [AnchorTransform; 5],
}

impl PlacementTable {
    /// `shared_origin` is the body's anchor point; the cluster origin adds `origin_offset` to it.
    pub fn new(params: &ValidParams, shared_origin: Vector3<f64>) -> Self {
        let origin = shared_origin + params.origin_offset;
        let anchors = AnchorName::ALL.map(|name| AnchorTransform::new(params.anchor(name), origin));
        Self { origin, anchors }
    }

    /// Cluster origin in world coordinates.
    #[inline]
    pub fn origin(&self) -> Vector3<f64> {
        self.origin
    }

    #[inline]
    pub fn transform(&self, name: AnchorName) -> &AnchorTransform {
        &self.anchors[name.index()]
    }

    #[inline]
    pub fn place_point(&self, name: AnchorName, local: Point3<f64>) -> Point3<f64> {
        self.transform(name).apply(local)
    }

    pub fn place<B: GeometryBackend>(&self, backend: &B, name: AnchorName, shape: B::Shape) -> B::Shape {
        self.transform(name).place(backend, shape)
    }

    pub fn place_plate<B: GeometryBackend>(
        &self,
        backend: &B,
        name: AnchorName,
        shape: B::Shape,
    ) -> B::Shape {
        self.transform(name).place_plate(backend, shape)
    }

    /// World position of an anchor's corner post.
    #[inline]
    pub fn post(&self, name: AnchorName, dims: &MountDims, c: Corner) -> Point3<f64> {
        self.place_point(name, Point3::from(corner(dims, c)))
    }

    /// World position of every anchor's mount centre, in `AnchorName::ALL` order.
    pub fn centres(&self) -> Vec<(AnchorName, Point3<f64>)> {
        AnchorName::ALL
            .iter()
            .map(|&n| (n, self.place_point(n, Point3::origin())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ClusterParameters;
    use crate::transform::rotation_from_degrees;
    use proptest::prelude::*;

    fn table(params: &ClusterParameters) -> PlacementTable {
        PlacementTable::new(&params.validate().unwrap(), Vector3::zeros())
    }

    #[test]
    fn tr_scenario_matches_rotate_then_translate_twice() {
        let params = ClusterParameters::default();
        let t = table(&params);
        let rot = rotation_from_degrees(Vector3::new(14.0, -15.0, 10.0));
        let origin = Vector3::new(6.0, -3.0, 7.0);
        let position = Vector3::new(-15.0, -10.0, 5.0);

        for local in [Point3::origin(), Point3::new(9.0, -9.0, 0.0)] {
            let expected = (rot * local + origin) + position;
            assert_eq!(t.place_point(AnchorName::Tr, local), expected);
        }

        // changing only position.z shifts world z by exactly the difference
        let mut lowered = params.clone();
        lowered.anchor_mut(AnchorName::Tr).position[2] = 0.0;
        let a = t.place_point(AnchorName::Tr, Point3::origin());
        let b = table(&lowered).place_point(AnchorName::Tr, Point3::origin());
        assert!((b.z - a.z + 5.0).abs() < 1e-12);
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn rotation_does_not_commute_with_translation() {
        let t = table(&ClusterParameters::default());
        let rot = rotation_from_degrees(Vector3::new(14.0, -15.0, 10.0));
        let origin = Vector3::new(6.0, -3.0, 7.0);
        let position = Vector3::new(-15.0, -10.0, 5.0);
        let p = Point3::new(1.0, 2.0, 3.0);

        let placed = t.place_point(AnchorName::Tr, p);
        // steps 2 and 3 commute
        let swapped_translations = (rot * p + position) + origin;
        assert!((placed - swapped_translations).norm() < 1e-12);
        // rotating after translating gives a different point
        let rotate_last = rot * (p + origin + position);
        assert!((placed - rotate_last).norm() > 1e-3);
    }

    #[test]
    fn shared_origin_shifts_every_anchor() {
        let params = ClusterParameters::default().validate().unwrap();
        let base = PlacementTable::new(&params, Vector3::zeros());
        let shift = Vector3::new(10.0, -4.0, 2.5);
        let moved = PlacementTable::new(&params, shift);
        assert_eq!(moved.origin(), base.origin() + shift);
        for ((_, a), (_, b)) in base.centres().into_iter().zip(moved.centres()) {
            assert!((b - a - shift).norm() < 1e-12);
        }
    }

    proptest! {
        #[test]
        fn placement_is_affine_in_position(
            dz in -20.0f64..20.0,
            x in -10.0f64..10.0,
            y in -10.0f64..10.0,
        ) {
            let params = ClusterParameters::default();
            let mut moved = params.clone();
            moved.anchor_mut(AnchorName::Bl).position[2] += dz;
            let p = Point3::new(x, y, 0.0);
            let a = table(&params).place_point(AnchorName::Bl, p);
            let b = table(&moved).place_point(AnchorName::Bl, p);
            prop_assert!((b.z - a.z - dz).abs() < 1e-9);
            prop_assert!((b.x - a.x).abs() < 1e-12);
            prop_assert!((b.y - a.y).abs() < 1e-12);
        }
    }
}
