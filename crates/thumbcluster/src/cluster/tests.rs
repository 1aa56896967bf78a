use nalgebra::{Point3, Vector3};

use super::*;
use crate::body::{KeySlot, MatrixRow, WallOffsets};
use crate::layout::{HullGroup, Site};
use crate::reference::{BoxShapes, PointSolidBackend, ReferenceBody};
use crate::transform::Pose;

/// Flat grid of keys at z = 0 with the shared origin at the world origin.
struct FlatBody;

impl MainBody for FlatBody {
    fn shared_origin(&self) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn row_index(&self, row: MatrixRow) -> usize {
        match row {
            MatrixRow::Corner => 3,
            MatrixRow::Last => 4,
        }
    }

    fn key_pose(&self, column: usize, row: usize) -> Pose {
        Pose::translation(Vector3::new(column as f64 * 19.0, 40.0 - row as f64 * 19.0, 0.0))
    }

    fn left_edge(&self, row: usize) -> Vector3<f64> {
        Vector3::new(-17.0, 31.0 - row as f64 * 19.0, -3.0)
    }

    fn wall_offsets(&self, dx: f64, dy: f64) -> WallOffsets {
        WallOffsets {
            near: Vector3::new(dx * 4.5, dy * 4.5, -1.0),
            mid: Vector3::new(dx * 5.0, dy * 6.0, -15.0),
            far: Vector3::new(dx * 8.0, dy * 9.0, -15.0),
        }
    }
}

fn mini<M: MainBody + ?Sized>(body: &M) -> ThumbCluster<'_, M> {
    ThumbCluster::new(
        &ClusterParameters::default(),
        ClusterVariant::Mini,
        body,
        MountDims::default(),
    )
    .unwrap()
}

fn with_layout<'a>(body: &'a ReferenceBody, layout: ClusterLayout) -> Result<ThumbCluster<'a, ReferenceBody>> {
    ThumbCluster::with_layout(
        &ClusterParameters::default(),
        layout,
        body,
        MountDims::default(),
        &ValidateCfg::default(),
    )
}

#[test]
fn default_build_validates() {
    let body = ReferenceBody::default();
    let cluster = mini(&body);
    let report = cluster.validation();
    assert_eq!(report.hull_groups, 7);
    assert_eq!(report.hull_windows, 30);
    assert_eq!(report.wall_segments, 11);
    assert_eq!(report.covered_posts, 20);
    assert!(report.max_junction_gap <= 1e-6);
}

#[test]
fn solids_have_one_piece_per_hull() {
    let body = ReferenceBody::default();
    let cluster = mini(&body);
    let solids = cluster.build(&PointSolidBackend, &BoxShapes::default()).unwrap();
    // one hull per window
    assert_eq!(solids.web.piece_count(), 30);
    // brace + floor per segment, plus the five connection pieces
    assert_eq!(solids.walls.piece_count(), 11 * 2 + 5);
    let (lo, _) = solids.walls.bounds().unwrap();
    assert!(lo.z <= 0.0);
}

#[test]
fn plates_and_caps_cover_every_anchor() {
    let body = ReferenceBody::default();
    let cluster = mini(&body);
    let (backend, shapes) = (PointSolidBackend, BoxShapes::default());
    assert_eq!(cluster.plates(&backend, &shapes).unwrap().piece_count(), 5);
    assert_eq!(cluster.caps(&backend, &shapes).unwrap().piece_count(), 5);
}

#[test]
fn points_are_deterministic() {
    let body = ReferenceBody::default();
    let a = mini(&body).points();
    let b = mini(&body).points();
    assert_eq!(a, b);
    assert_eq!(a.layout, "MINI");
    assert_eq!(a.anchors.len(), 5);
    assert_eq!(a.walls.len(), 11);
    assert_eq!(a.handoff.from, "key(3,Last).bl (0, -1)");
}

#[test]
fn full_build_is_repeatable() {
    let body = ReferenceBody::default();
    let (backend, shapes) = (PointSolidBackend, BoxShapes::default());
    let first = mini(&body).build(&backend, &shapes).unwrap();
    let second = mini(&body).build(&backend, &shapes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn screw_sits_on_base_plane() {
    let flat = mini(&FlatBody);
    assert_eq!(flat.table().origin(), Vector3::new(6.0, -3.0, 7.0));
    assert_eq!(flat.screw_position(), Point3::new(-23.0, -54.0, 0.0));

    let body = ReferenceBody::default();
    let cluster = mini(&body);
    let expected = body.shared_origin() + Vector3::new(6.0, -3.0, 7.0) + Vector3::new(-29.0, -51.0, -16.0);
    let screw = cluster.screw_position();
    assert!((screw.x - expected.x).abs() < 1e-12);
    assert!((screw.y - expected.y).abs() < 1e-12);
    assert_eq!(screw.z, 0.0);
}

#[test]
fn footprint_screws_pick_the_variant() {
    let cluster = mini(&FlatBody);
    assert_eq!(cluster.footprint_screws(false), vec![Point3::new(-29.0, -52.0, 0.0)]);
    assert_eq!(cluster.footprint_screws(true).len(), 3);
}

#[test]
fn works_through_a_trait_object() {
    let body = ReferenceBody::default();
    let dyn_body: &dyn MainBody = &body;
    assert_eq!(mini(dyn_body).points(), mini(&body).points());
}

#[test]
fn lowering_tr_shifts_its_posts() {
    let body = FlatBody;
    let base = mini(&body).points();
    let mut params = ClusterParameters::default();
    params.anchor_mut(AnchorName::Tr).position[2] = 0.0;
    let lowered = ThumbCluster::new(&params, ClusterVariant::Mini, &body, MountDims::default())
        .unwrap()
        .points();
    let (a, b) = (&base.anchors[0], &lowered.anchors[0]);
    assert_eq!(a.name, AnchorName::Tr);
    for ((_, p), (_, q)) in a.posts.iter().zip(&b.posts) {
        assert!((p[2] - 5.0 - q[2]).abs() < 1e-12);
        assert_eq!((p[0], p[1]), (q[0], q[1]));
    }
    assert_eq!(base.anchors[1], lowered.anchors[1]);
}

#[test]
fn plate_rotation_leaves_web_alone() {
    let body = ReferenceBody::default();
    let (backend, shapes) = (PointSolidBackend, BoxShapes::default());
    let mut params = ClusterParameters::default();
    params.anchor_mut(AnchorName::Tr).plate_rotation = 90.0;
    let turned = ThumbCluster::new(&params, ClusterVariant::Mini, &body, MountDims::default()).unwrap();
    let plain = mini(&body);
    assert_eq!(
        turned.web(&backend, &shapes).unwrap(),
        plain.web(&backend, &shapes).unwrap()
    );
    assert_ne!(
        turned.plates(&backend, &shapes).unwrap(),
        plain.plates(&backend, &shapes).unwrap()
    );
}

#[test]
fn missing_wall_segment_opens_the_loop() {
    let body = ReferenceBody::default();
    let mut layout = ClusterVariant::Mini.layout();
    layout.walls.remove(5);
    let err = with_layout(&body, layout).err().unwrap();
    assert!(matches!(err, ClusterError::AdjacencyGap { .. }));
    assert!(err.to_string().contains("wall loop open"));
}

#[test]
fn orphan_post_is_reported() {
    let body = ReferenceBody::default();
    let mut layout = ClusterVariant::Mini.layout();
    layout
        .hull_groups
        .retain(|g| g.name != "top pair" && g.name != "matrix left");
    let err = with_layout(&body, layout).err().unwrap();
    assert_eq!(err, ClusterError::gap("orphan post tr.tl"));
}

#[test]
fn oversized_group_is_rejected() {
    let body = ReferenceBody::default();
    let mut layout = ClusterVariant::Mini.layout();
    layout.hull_groups[3]
        .sites
        .push(Site::Key(KeySlot::corner(0), Corner::Bl));
    assert!(matches!(
        with_layout(&body, layout),
        Err(ClusterError::AdjacencyGap { .. })
    ));
}

#[test]
fn repeated_post_in_a_window_is_degenerate() {
    let body = ReferenceBody::default();
    let mut layout = ClusterVariant::Mini.layout();
    let tr = |c| Site::Thumb(AnchorName::Tr, c);
    layout.hull_groups.push(HullGroup {
        name: "bad",
        sites: vec![tr(Corner::Tl), tr(Corner::Tl), tr(Corner::Tr)],
    });
    let err = with_layout(&body, layout).err().unwrap();
    assert!(matches!(err, ClusterError::Geometry { .. }));
    assert!(err.to_string().contains("coincide"));
}

#[test]
fn bad_parameters_fail_before_geometry() {
    let body = ReferenceBody::default();
    let mut params = ClusterParameters::default();
    params.anchor_mut(AnchorName::Tr).rotation = vec![1.0, 2.0];
    let err = ThumbCluster::new(&params, ClusterVariant::Mini, &body, MountDims::default())
        .err()
        .unwrap();
    assert!(err.is_configuration());

    let zero = MountDims {
        width: 0.0,
        ..MountDims::default()
    };
    let err = ThumbCluster::new(&ClusterParameters::default(), ClusterVariant::Mini, &body, zero)
        .err()
        .unwrap();
    assert!(err.is_configuration());

    for inset in [f64::NAN, -1.0] {
        let dims = MountDims {
            inset,
            ..MountDims::default()
        };
        match ThumbCluster::new(&ClusterParameters::default(), ClusterVariant::Mini, &body, dims) {
            Err(ClusterError::Configuration { field, .. }) => assert_eq!(field, "mount.inset"),
            other => panic!("expected inset rejection, got {:?}", other.err()),
        }
    }
}

#[test]
fn overflowing_placement_is_rejected_up_front() {
    let body = FlatBody;
    let mut params = ClusterParameters::default();
    params.origin_offset[2] = 1.7e308;
    params.anchor_mut(AnchorName::Tr).position[2] = 1.7e308;
    assert!(params.validate().is_ok());
    let err = ThumbCluster::new(&params, ClusterVariant::Mini, &body, MountDims::default())
        .err()
        .unwrap();
    assert!(matches!(err, ClusterError::Geometry { .. }));
    let msg = err.to_string();
    assert!(msg.contains("site tr."), "{msg}");
    assert!(msg.contains("not finite"), "{msg}");
}

#[test]
fn library_mount_must_match() {
    let body = ReferenceBody::default();
    let cluster = mini(&body);
    let shapes = BoxShapes {
        mount: MountDims {
            width: 14.0,
            height: 14.0,
            inset: 0.0,
        },
        ..BoxShapes::default()
    };
    match cluster.web(&PointSolidBackend, &shapes) {
        Err(ClusterError::Configuration { field, .. }) => assert_eq!(field, "mount"),
        other => panic!("expected mount mismatch, got {other:?}"),
    }
}
