use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation as _};

/// Marks a half-edge on the convex hull, which has no twin.
pub const EMPTY: usize = usize::MAX;

/// Index form of a Delaunay triangulation.
///
/// `triangles[e]` is the point where half-edge `e` starts; half-edges
/// `3t, 3t+1, 3t+2` form triangle `t`. `halfedges[e]` is the opposite
/// half-edge in the neighbouring triangle, or [`EMPTY`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangulation {
    pub triangles: Vec<usize>,
    pub halfedges: Vec<usize>,
}

#[inline]
pub fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 { e - 2 } else { e + 1 }
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Each undirected interior edge once, as `(e, twin)` with `e < twin`.
    pub fn interior_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|&(e, &j)| j != EMPTY && e < j)
            .map(|(e, &j)| (e, j))
    }
}

// Point tagged with its slot in the coordinate buffer, so output indices
// refer to the caller's ordering whatever order spade stores vertices in.
#[derive(Clone, Copy, Debug)]
struct IndexedPoint {
    position: Point2<f64>,
    index: usize,
}

impl HasPosition for IndexedPoint {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Triangulates a flat `[x0, y0, x1, y1, ...]` buffer.
///
/// Degenerate input (fewer than three points, all collinear, or coordinates
/// spade refuses) produces an empty triangulation.
pub fn triangulate(coords: &[f64]) -> Triangulation {
    let points: Vec<IndexedPoint> = coords
        .chunks_exact(2)
        .enumerate()
        .map(|(index, xy)| IndexedPoint {
            position: Point2::new(xy[0], xy[1]),
            index,
        })
        .collect();

    if points.len() < 3 {
        return Triangulation::default();
    }

    let delaunay = match DelaunayTriangulation::<IndexedPoint>::bulk_load(points) {
        Ok(d) => d,
        Err(err) => {
            tracing::warn!(?err, "triangulation rejected input, drawing an empty frame");
            return Triangulation::default();
        }
    };

    let face_count = delaunay.num_inner_faces();
    let mut triangles = Vec::with_capacity(face_count * 3);
    // spade directed edge index -> our half-edge index
    let mut slot_of_edge = vec![EMPTY; delaunay.num_undirected_edges() * 2];

    for face in delaunay.inner_faces() {
        for edge in face.adjacent_edges() {
            slot_of_edge[edge.fix().index()] = triangles.len();
            triangles.push(edge.from().data().index);
        }
    }

    let mut halfedges = vec![EMPTY; triangles.len()];
    for face in delaunay.inner_faces() {
        for edge in face.adjacent_edges() {
            let twin = edge.rev();
            if twin.face().is_outer() {
                continue;
            }
            let e = slot_of_edge[edge.fix().index()];
            halfedges[e] = slot_of_edge[twin.fix().index()];
        }
    }

    Triangulation {
        triangles,
        halfedges,
    }
}
