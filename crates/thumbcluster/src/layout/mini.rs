//! The MINI cluster: five 1u mounts (tr is a 1.5u cap on a 1u plate).
//!
//! ```text
//!         K(0,c)  K(1,c)  K(2,l)  K(3,l)
//!     bl      tl      tr
//!         br      mr
//! ```

use crate::body::{KeySlot, MatrixRow, WallLevel};
use crate::params::AnchorName;
use crate::posts::Corner::{self, Bl, Br, Tl, Tr};

use super::{
    ClusterLayout, ConnectionPiece, HullGroup, Outward, PieceHull, Spot, Site, WallEndpoint,
    WallSegment,
};

fn tr(c: Corner) -> Site {
    Site::Thumb(AnchorName::Tr, c)
}
fn tl(c: Corner) -> Site {
    Site::Thumb(AnchorName::Tl, c)
}
fn mr(c: Corner) -> Site {
    Site::Thumb(AnchorName::Mr, c)
}
fn br(c: Corner) -> Site {
    Site::Thumb(AnchorName::Br, c)
}
fn bl(c: Corner) -> Site {
    Site::Thumb(AnchorName::Bl, c)
}
fn key_c(col: usize, c: Corner) -> Site {
    Site::Key(KeySlot::corner(col), c)
}
fn key_l(col: usize, c: Corner) -> Site {
    Site::Key(KeySlot::last(col), c)
}

const UP: Outward = Outward::new(0.0, 1.0);
const DOWN: Outward = Outward::new(0.0, -1.0);
const LEFT: Outward = Outward::new(-1.0, 0.0);
/// Skewed direction used where the bl mount meets the left wall.
const UP_LEFT: Outward = Outward::new(-0.3, 1.0);

fn seg(a: Site, da: Outward, b: Site, db: Outward) -> WallSegment {
    WallSegment {
        from: WallEndpoint { site: a, dir: da },
        to: WallEndpoint { site: b, dir: db },
    }
}

fn hull_groups() -> Vec<HullGroup> {
    vec![
        HullGroup {
            name: "top pair",
            sites: vec![tl(Tr), tl(Br), tr(Tl), tr(Bl)],
        },
        HullGroup {
            name: "bottom pair right",
            sites: vec![br(Tr), br(Br), mr(Tl), mr(Bl)],
        },
        HullGroup {
            name: "bottom pair left",
            sites: vec![mr(Tr), mr(Br), tr(Br)],
        },
        HullGroup {
            name: "between rows",
            sites: vec![
                br(Tl),
                bl(Bl),
                br(Tr),
                bl(Br),
                mr(Tl),
                tl(Bl),
                mr(Tr),
                tl(Br),
                tr(Bl),
                mr(Tr),
                tr(Br),
            ],
        },
        HullGroup {
            name: "left column",
            sites: vec![tl(Tl), bl(Tr), tl(Bl), bl(Br), mr(Tr), tl(Bl), tl(Br), mr(Tr)],
        },
        HullGroup {
            name: "matrix left",
            sites: vec![
                tl(Tl),
                key_c(0, Bl),
                tl(Tr),
                key_c(0, Br),
                tr(Tl),
                key_c(1, Bl),
                tr(Tr),
                key_c(1, Br),
                key_l(2, Bl),
            ],
        },
        // shares the (tr.tr, K(2,l).bl) edge with "matrix left"
        HullGroup {
            name: "matrix right",
            sites: vec![tr(Tr), key_l(2, Bl), tr(Br), key_l(2, Br), key_l(3, Bl)],
        },
    ]
}

fn walls() -> Vec<WallSegment> {
    vec![
        seg(bl(Tr), UP, bl(Tl), UP),
        seg(bl(Tl), UP, bl(Tl), LEFT),
        seg(bl(Tl), LEFT, bl(Bl), LEFT),
        seg(bl(Bl), LEFT, br(Tl), LEFT),
        seg(br(Tl), LEFT, br(Bl), LEFT),
        seg(br(Bl), LEFT, br(Bl), DOWN),
        seg(br(Bl), DOWN, br(Br), DOWN),
        seg(br(Br), DOWN, mr(Bl), DOWN),
        seg(mr(Bl), DOWN, mr(Br), DOWN),
        seg(mr(Br), DOWN, tr(Br), DOWN),
        seg(tr(Br), DOWN, key_l(3, Bl), DOWN),
    ]
}

fn connection() -> Vec<ConnectionPiece> {
    use WallLevel::{Far, Mid, Near};
    let left = Site::LeftEdge(MatrixRow::Corner);
    let l = |level| Spot::wall(left, level, LEFT);
    let b = |level| Spot::wall(bl(Tr), level, UP_LEFT);
    vec![
        ConnectionPiece {
            name: "left wall floor",
            hull: PieceHull::LowestEnvelope,
            spots: vec![l(Mid), l(Far), b(Mid), b(Far)],
        },
        ConnectionPiece {
            name: "left wall to tl",
            hull: PieceHull::Hull,
            spots: vec![l(Mid), l(Far), b(Mid), b(Far), Spot::at(tl(Tl))],
        },
        ConnectionPiece {
            name: "left edge column",
            hull: PieceHull::Hull,
            spots: vec![Spot::at(left), l(Near), l(Mid), l(Far), Spot::at(tl(Tl))],
        },
        ConnectionPiece {
            name: "left edge to matrix",
            hull: PieceHull::Hull,
            spots: vec![
                Spot::at(left),
                l(Near),
                Spot::at(key_c(0, Bl)),
                Spot::at(tl(Tl)),
            ],
        },
        ConnectionPiece {
            name: "bl riser",
            hull: PieceHull::Hull,
            spots: vec![Spot::at(bl(Tr)), b(Near), b(Mid), b(Far), Spot::at(tl(Tl))],
        },
    ]
}

pub(super) fn layout() -> ClusterLayout {
    ClusterLayout {
        name: "MINI",
        hull_groups: hull_groups(),
        walls: walls(),
        handoff: seg(key_l(3, Bl), DOWN, bl(Tr), UP),
        connection: connection(),
    }
}
