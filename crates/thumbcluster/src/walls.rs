//! Perimeter wall: one brace per wall segment plus the left-wall connection.
//!
//! A brace between endpoints `p1` and `p2` is
//! `hull(p1, p1+near, p1+mid, p1+far, p2, p2+near, p2+mid, p2+far)` unioned
//! with `lowest_envelope(p1+mid, p1+far, p2+mid, p2+far)`, the same brace the
//! main body uses for its own walls. Offsets are applied in each post's local
//! frame before placement.

use serde::Serialize;

use crate::backend::{GeometryBackend, ShapeLibrary};
use crate::body::{MainBody, WallLevel};
use crate::error::Result;
use crate::layout::{ConnectionPiece, PieceHull, Spot, SegmentKind, WallEndpoint, WallSegment};
use crate::resolve::{Resolver, WallPoints};

/// World points of one wall segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentPoints {
    pub from: String,
    pub to: String,
    pub kind: SegmentKind,
    pub start: WallPoints,
    pub end: WallPoints,
}

pub struct WallSynthesizer<'r, 'a, M: MainBody + ?Sized> {
    resolver: &'r Resolver<'a, M>,
}

impl<'r, 'a, M: MainBody + ?Sized> WallSynthesizer<'r, 'a, M> {
    pub fn new(resolver: &'r Resolver<'a, M>) -> Self {
        Self { resolver }
    }

    pub fn describe(&self, seg: &WallSegment) -> SegmentPoints {
        SegmentPoints {
            from: seg.from.to_string(),
            to: seg.to.to_string(),
            kind: seg.kind(),
            start: self.resolver.endpoint_points(&seg.from),
            end: self.resolver.endpoint_points(&seg.to),
        }
    }

    fn spots(ep: &WallEndpoint, levels: &[Option<WallLevel>]) -> Vec<Spot> {
        levels
            .iter()
            .map(|level| match level {
                None => Spot::at(ep.site),
                Some(l) => Spot::wall(ep.site, *l, ep.dir),
            })
            .collect()
    }

    fn place_all<B: GeometryBackend>(&self, backend: &B, post: &B::Shape, spots: &[Spot]) -> Vec<B::Shape> {
        spots
            .iter()
            .map(|p| self.resolver.spot_shape(backend, post, p))
            .collect()
    }

    /// Brace for one segment.
    pub fn segment_shape<B, L>(&self, backend: &B, library: &L, seg: &WallSegment) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        use WallLevel::{Far, Mid, Near};
        let post = library.web_post(backend);
        let column = [None, Some(Near), Some(Mid), Some(Far)];
        let foot = [Some(Mid), Some(Far)];

        let mut upper = Self::spots(&seg.from, &column);
        upper.extend(Self::spots(&seg.to, &column));
        let mut lower = Self::spots(&seg.from, &foot);
        lower.extend(Self::spots(&seg.to, &foot));

        let brace = backend.hull(&self.place_all(backend, &post, &upper))?;
        let floor = backend.lowest_envelope(&self.place_all(backend, &post, &lower))?;
        backend.union(vec![brace, floor])
    }

    pub fn connection_shape<B, L>(&self, backend: &B, library: &L, piece: &ConnectionPiece) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        let post = library.web_post(backend);
        let shapes = self.place_all(backend, &post, &piece.spots);
        match piece.hull {
            PieceHull::Hull => backend.hull(&shapes),
            PieceHull::LowestEnvelope => backend.lowest_envelope(&shapes),
        }
    }

    /// Union of every brace and connection piece. Callers validate the loop first.
    pub fn build<B, L>(
        &self,
        backend: &B,
        library: &L,
        walls: &[WallSegment],
        connection: &[ConnectionPiece],
    ) -> Result<B::Shape>
    where
        B: GeometryBackend,
        L: ShapeLibrary<B> + ?Sized,
    {
        let mut parts = Vec::with_capacity(walls.len() + connection.len());
        for (i, seg) in walls.iter().enumerate() {
            tracing::debug!(segment = i, from = %seg.from, to = %seg.to, kind = ?seg.kind(), "wall brace");
            parts.push(self.segment_shape(backend, library, seg)?);
        }
        for piece in connection {
            tracing::debug!(piece = piece.name, "connection");
            parts.push(self.connection_shape(backend, library, piece)?);
        }
        backend.union(parts)
    }
}
