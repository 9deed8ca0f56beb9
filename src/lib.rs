//! Ear-clipping triangulation of 2-D polygons with holes.
//!
//! Takes a flat buffer of point coordinates (outer ring first, hole rings
//! after it) plus the point offsets where each hole starts, and produces a
//! flat triangle index buffer suitable for a rendering pipeline. The engine
//! handles degenerate and mildly self-intersecting input by escalating
//! through repair passes and always terminates with a best-effort result.

#![no_std]

extern crate alloc;

mod clip;
mod holes;
mod predicates;
mod ring;
mod zindex;

use alloc::vec::Vec;
use num_traits::float::Float;

use clip::Stage;
use holes::merge_holes;
use ring::{build_ring, filter_ring, signed_area, Arena, VertId};
use zindex::ZGrid;

/// Vertex index type of the output triangle buffer.
pub trait OutIndex: Copy {
    fn to_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;
}

impl OutIndex for u32 {
    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as Self
    }
}

impl OutIndex for u16 {
    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as Self
    }
}

impl OutIndex for usize {
    fn to_usize(self) -> usize {
        self
    }
    fn from_usize(v: usize) -> Self {
        v
    }
}

/// Reusable triangulation state.
///
/// A single instance can run any number of triangulations; the vertex arena
/// and the internal work queues are recycled between calls.
///
/// ```
/// use ringcut::Triangulator;
///
/// let square = [0.0f64, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
/// let mut triangulator = Triangulator::new();
/// let mut triangles: Vec<u32> = Vec::new();
/// triangulator.triangulate(&square, &[], 2, &mut triangles);
/// assert_eq!(triangles.len(), 6);
/// ```
pub struct Triangulator<T: Float> {
    arena: Arena<T>,
    hole_queue: Vec<VertId>,
    jobs: Vec<(VertId, Stage)>,
}

impl<T: Float> Default for Triangulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Triangulator<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            hole_queue: Vec::new(),
            jobs: Vec::new(),
        }
    }

    /// Triangulates a polygon given as a flat coordinate buffer with `dim`
    /// numbers per point (only the first two are geometric) and the point
    /// indices where each hole ring starts, in ascending order.
    ///
    /// `triangles_out` is cleared and filled with triples of point indices.
    /// Input that collapses below a triangle produces an empty result, never
    /// an error.
    pub fn triangulate<N: OutIndex>(
        &mut self,
        data: &[T],
        hole_indices: &[N],
        dim: usize,
        triangles_out: &mut Vec<N>,
    ) {
        debug_assert!(dim >= 2);
        triangles_out.clear();

        let num_points = data.len() / dim;
        if num_points < 3 {
            return;
        }
        triangles_out.reserve((num_points - 2) * 3);

        let has_holes = !hole_indices.is_empty();
        let outer_len = if has_holes {
            hole_indices[0].to_usize()
        } else {
            num_points
        };

        // ring nodes plus room for split duplicates
        self.arena.reset(num_points * 3 / 2);

        let Some(outer) = build_ring(&mut self.arena, data, dim, 0, outer_len, true) else {
            return;
        };
        // drop duplicate and collinear outer vertices up front; hole rings
        // keep theirs so degenerate holes survive as steiner geometry
        let mut outer = filter_ring(&mut self.arena, outer, None);
        {
            let o = self.arena.vert(outer);
            if o.next == o.prev {
                return;
            }
        }

        if has_holes {
            outer = merge_holes(
                &mut self.arena,
                data,
                dim,
                hole_indices,
                num_points,
                &mut self.hole_queue,
                outer,
            );
        }

        // the z-order index only pays off beyond this size
        let grid = if data.len() > 80 * dim {
            ZGrid::compute(data, dim, outer_len)
        } else {
            None
        };

        clip::run(
            &mut self.arena,
            &mut self.jobs,
            outer,
            triangles_out,
            grid.as_ref(),
        );
    }
}

/// Relative difference between the polygon area (outer minus holes) and the
/// summed area of the produced triangles; `0` for a perfect triangulation.
/// Meant for validating output, not used by the engine itself.
pub fn deviation<T: Float, N: OutIndex>(
    data: &[T],
    hole_indices: &[N],
    dim: usize,
    triangles: &[N],
) -> T {
    let has_holes = !hole_indices.is_empty();
    let num_points = data.len() / dim;
    let outer_len = if has_holes {
        hole_indices[0].to_usize()
    } else {
        num_points
    };

    let mut polygon_area = if num_points < 3 {
        T::zero()
    } else {
        signed_area(data, dim, 0, outer_len).abs()
    };
    if has_holes && num_points >= 3 {
        for k in 0..hole_indices.len() {
            let start = hole_indices[k].to_usize();
            let end = if k + 1 < hole_indices.len() {
                hole_indices[k + 1].to_usize()
            } else {
                num_points
            };
            if end - start >= 3 {
                polygon_area = polygon_area - signed_area(data, dim, start, end).abs();
            }
        }
    }

    let mut triangles_area = T::zero();
    for tri in triangles.chunks_exact(3) {
        let a = tri[0].to_usize() * dim;
        let b = tri[1].to_usize() * dim;
        let c = tri[2].to_usize() * dim;
        triangles_area = triangles_area
            + ((data[a] - data[c]) * (data[b + 1] - data[a + 1])
                - (data[a] - data[b]) * (data[c + 1] - data[a + 1]))
                .abs();
    }

    if polygon_area == T::zero() && triangles_area == T::zero() {
        T::zero()
    } else {
        ((polygon_area - triangles_area) / polygon_area).abs()
    }
}

/// Reshapes nested rings of points (outer ring first) into the flat
/// `(coordinates, hole_indices, dim)` triple [`Triangulator::triangulate`]
/// expects. Pure reshaping; no geometry involved.
pub fn flatten<T: Float>(rings: &[Vec<Vec<T>>]) -> (Vec<T>, Vec<usize>, usize) {
    let dim = rings
        .first()
        .and_then(|ring| ring.first())
        .map_or(2, Vec::len);

    let mut coords = Vec::new();
    let mut hole_indices = Vec::new();
    let mut offset = 0;
    for (k, ring) in rings.iter().enumerate() {
        if k > 0 {
            hole_indices.push(offset);
        }
        offset += ring.len();
        for point in ring {
            coords.extend(point.iter().copied().take(dim));
        }
    }
    (coords, hole_indices, dim)
}
