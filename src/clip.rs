//! The ear-clipping engine.
//!
//! A ring is consumed by repeatedly cutting valid ears. When a full lap
//! finds no ear the ring escalates through two repair stages (degenerate
//! filtering, then local self-intersection curing) and finally a forced
//! split into two sub-rings. Escalation and splitting are driven by an
//! explicit worklist instead of recursion, so pathological inputs cannot
//! exhaust the native call stack; the LIFO order reproduces the traversal
//! order of the recursive formulation exactly.

use alloc::vec::Vec;
use num_traits::float::Float;

use crate::predicates::{
    doubled_area, locally_inside, middle_inside, point_in_triangle_except_first, same_point,
    segments_cross,
};
use crate::ring::{filter_ring, Arena, Vert, VertId};
use crate::zindex::{index_ring, ZGrid};
use crate::OutIndex;

/// How far a pending ring has escalated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    /// not yet repaired; entering with a grid (re)builds the z-index
    Fresh,
    /// degenerate filter applied after a stalled lap
    Filtered,
    /// local intersections cured; next stall forces a split
    Cured,
}

/// Triangulates `head` and every sub-ring produced along the way, appending
/// triangle vertex indices to `triangles`.
pub(crate) fn run<T: Float, N: OutIndex>(
    arena: &mut Arena<T>,
    jobs: &mut Vec<(VertId, Stage)>,
    head: VertId,
    triangles: &mut Vec<N>,
    grid: Option<&ZGrid<T>>,
) {
    jobs.clear();
    jobs.push((head, Stage::Fresh));

    while let Some((mut head, mut stage)) = jobs.pop() {
        loop {
            if stage == Stage::Fresh {
                if let Some(grid) = grid {
                    index_ring(arena, head, grid);
                }
            }

            let Some(stalled) = clip_ears(arena, head, triangles, grid) else {
                break;
            };

            match stage {
                Stage::Fresh => {
                    head = filter_ring(arena, stalled, None);
                    stage = Stage::Filtered;
                }
                Stage::Filtered => {
                    let filtered = filter_ring(arena, stalled, None);
                    head = cure_local_intersections(arena, filtered, triangles);
                    stage = Stage::Cured;
                }
                Stage::Cured => {
                    let Some((a_i, b_i)) = find_split_diagonal(arena, stalled) else {
                        break;
                    };
                    let c_i = arena.split_ring(a_i, b_i);

                    // trim collinear points around both seams
                    let end = Some(arena.vert(a_i).next);
                    let first = filter_ring(arena, a_i, end);
                    let end = Some(arena.vert(c_i).next);
                    let second = filter_ring(arena, c_i, end);

                    jobs.push((second, Stage::Fresh));
                    head = first;
                    stage = Stage::Fresh;
                }
            }
        }
    }
}

/// One clipping lap. Returns `None` when the ring is exhausted, or the node
/// at which a full lap completed without cutting anything.
fn clip_ears<T: Float, N: OutIndex>(
    arena: &mut Arena<T>,
    start: VertId,
    triangles: &mut Vec<N>,
    grid: Option<&ZGrid<T>>,
) -> Option<VertId> {
    let mut ear_i = start;
    let mut stop_i = start;

    loop {
        let ear = arena.vert(ear_i);
        if ear.prev == ear.next {
            return None;
        }
        let next_i = ear.next;

        let good = match grid {
            Some(grid) => is_ear_indexed(arena, ear_i, grid),
            None => is_ear(arena, ear_i),
        };

        if good {
            let prev_src = arena.vert(arena.vert(ear_i).prev).src;
            let ear_src = arena.vert(ear_i).src;
            let next = arena.vert(next_i);
            let (next_src, after_next) = (next.src, next.next);

            triangles.extend([
                N::from_usize(prev_src as usize),
                N::from_usize(ear_src as usize),
                N::from_usize(next_src as usize),
            ]);
            arena.unlink(ear_i);

            // skipping the next vertex produces fewer sliver triangles
            ear_i = after_next;
            stop_i = after_next;
            continue;
        }

        ear_i = next_i;
        if ear_i == stop_i {
            return Some(ear_i);
        }
    }
}

/// The candidate ear triangle plus its bounding box, shared by the linear
/// and indexed interference scans.
struct EarFrame<T> {
    ax: T,
    ay: T,
    bx: T,
    by: T,
    cx: T,
    cy: T,
    x0: T,
    y0: T,
    x1: T,
    y1: T,
}

impl<T: Float> EarFrame<T> {
    fn new(a: &Vert<T>, b: &Vert<T>, c: &Vert<T>) -> Self {
        Self {
            ax: a.x,
            ay: a.y,
            bx: b.x,
            by: b.y,
            cx: c.x,
            cy: c.y,
            x0: a.x.min(b.x.min(c.x)),
            y0: a.y.min(b.y.min(c.y)),
            x1: a.x.max(b.x.max(c.x)),
            y1: a.y.max(b.y.max(c.y)),
        }
    }

    /// Whether vertex `p_i` would be swallowed by this ear: inside the
    /// bounding box and the triangle, and non-reflex at its own corner.
    fn blocked_by(&self, arena: &Arena<T>, p_i: VertId) -> bool {
        let p = arena.vert(p_i);
        p.x >= self.x0
            && p.x <= self.x1
            && p.y >= self.y0
            && p.y <= self.y1
            && point_in_triangle_except_first(
                self.ax, self.ay, self.bx, self.by, self.cx, self.cy, p.x, p.y,
            )
            && doubled_area(arena.vert(p.prev), p, arena.vert(p.next)) >= T::zero()
    }
}

/// Linear ear test: scan every other ring vertex for interference.
fn is_ear<T: Float>(arena: &Arena<T>, ear_i: VertId) -> bool {
    let b = arena.vert(ear_i);
    let a = arena.vert(b.prev);
    let c = arena.vert(b.next);

    if doubled_area(a, b, c) >= T::zero() {
        // reflex or collinear corner
        return false;
    }
    let frame = EarFrame::new(a, b, c);

    let mut p_i = c.next;
    let a_i = b.prev;
    while p_i != a_i {
        if frame.blocked_by(arena, p_i) {
            return false;
        }
        p_i = arena.vert(p_i).next;
    }
    true
}

/// Indexed ear test: restrict the interference scan to z-neighbors whose
/// keys fall inside the ear's bounding-box key range.
fn is_ear_indexed<T: Float>(arena: &Arena<T>, ear_i: VertId, grid: &ZGrid<T>) -> bool {
    let b = arena.vert(ear_i);
    let a = arena.vert(b.prev);
    let c = arena.vert(b.next);

    if doubled_area(a, b, c) >= T::zero() {
        return false;
    }
    let frame = EarFrame::new(a, b, c);
    let (a_i, c_i) = (b.prev, b.next);

    let min_z = grid.key(frame.x0, frame.y0);
    let max_z = grid.key(frame.x1, frame.y1);

    let mut p = b.prev_z;
    while let Some(p_i) = p {
        let v = arena.vert(p_i);
        if v.z < min_z {
            break;
        }
        if p_i != a_i && p_i != c_i && frame.blocked_by(arena, p_i) {
            return false;
        }
        p = v.prev_z;
    }

    let mut n = b.next_z;
    while let Some(n_i) = n {
        let v = arena.vert(n_i);
        if v.z > max_z {
            break;
        }
        if n_i != a_i && n_i != c_i && frame.blocked_by(arena, n_i) {
            return false;
        }
        n = v.next_z;
    }

    true
}

/// Repairs bowtie-style local self-intersections: where the edges around a
/// vertex pair cross and both endpoints see each other from inside, the
/// crossing pair is cut out as one triangle. Returns the re-filtered ring.
pub(crate) fn cure_local_intersections<T: Float, N: OutIndex>(
    arena: &mut Arena<T>,
    start: VertId,
    triangles: &mut Vec<N>,
) -> VertId {
    let mut start_i = start;
    let mut p_i = start;

    loop {
        let p = arena.vert(p_i);
        let a_i = p.prev;
        let p_next_i = p.next;
        let b_i = arena.vert(p_next_i).next;

        let cut = {
            let a = arena.vert(a_i);
            let b = arena.vert(b_i);
            !same_point(a, b)
                && segments_cross(a, p, arena.vert(p_next_i), b)
                && locally_inside(arena, a_i, b_i)
                && locally_inside(arena, b_i, a_i)
        };

        if cut {
            let tri = [
                arena.vert(a_i).src,
                arena.vert(p_i).src,
                arena.vert(b_i).src,
            ];
            triangles.extend(tri.map(|s| N::from_usize(s as usize)));

            arena.unlink(p_i);
            arena.unlink(p_next_i);

            p_i = b_i;
            start_i = b_i;
        }

        p_i = arena.vert(p_i).next;
        if p_i == start_i {
            return filter_ring(arena, p_i, None);
        }
    }
}

/// Searches the ring for the first valid diagonal, in ring order.
fn find_split_diagonal<T: Float>(arena: &Arena<T>, start: VertId) -> Option<(VertId, VertId)> {
    let mut a_i = start;
    loop {
        let a = arena.vert(a_i);
        let mut b_i = arena.vert(a.next).next;

        while b_i != a.prev {
            let b = arena.vert(b_i);
            if a.src != b.src && is_valid_diagonal(arena, a_i, b_i) {
                return Some((a_i, b_i));
            }
            b_i = b.next;
        }

        a_i = a.next;
        if a_i == start {
            return None;
        }
    }
}

/// A diagonal is valid when it stays clear of every ring edge and either
/// runs through the interior (both ends locally inside, midpoint inside,
/// neither adjacent triple degenerate) or joins two coincident non-reflex
/// corners.
fn is_valid_diagonal<T: Float>(arena: &Arena<T>, a_i: VertId, b_i: VertId) -> bool {
    let a = arena.vert(a_i);
    let b = arena.vert(b_i);
    let a_next = arena.vert(a.next);
    let a_prev = arena.vert(a.prev);
    let b_next = arena.vert(b.next);
    let b_prev = arena.vert(b.prev);

    if a_next.src == b.src || a_prev.src == b.src || crosses_ring(arena, a_i, b_i) {
        return false;
    }

    (locally_inside(arena, a_i, b_i)
        && locally_inside(arena, b_i, a_i)
        && middle_inside(arena, a_i, b_i)
        // does not create opposite-facing zero-width sectors
        && (doubled_area(a_prev, a, b_prev) != T::zero()
            || doubled_area(a, b_prev, b) != T::zero()))
        || (same_point(a, b)
            && doubled_area(a_prev, a, a_next) > T::zero()
            && doubled_area(b_prev, b, b_next) > T::zero())
}

/// Whether the segment `a`-`b` crosses any ring edge not incident to either
/// endpoint.
fn crosses_ring<T: Float>(arena: &Arena<T>, a_i: VertId, b_i: VertId) -> bool {
    let a = arena.vert(a_i);
    let b = arena.vert(b_i);
    let (a_src, b_src) = (a.src, b.src);

    let mut p_i = a_i;
    loop {
        let p = arena.vert(p_i);
        let n_i = p.next;
        let n = arena.vert(n_i);
        if p.src != a_src
            && p.src != b_src
            && n.src != a_src
            && n.src != b_src
            && segments_cross(p, n, a, b)
        {
            return true;
        }
        p_i = n_i;
        if p_i == a_i {
            return false;
        }
    }
}
