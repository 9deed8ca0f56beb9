//! Folding hole rings into the outer ring.
//!
//! Each hole is connected to the boundary through a bridge found with David
//! Eberly's visibility scan, then spliced in with the ring-split primitive,
//! leaving a single hole-free ring for the clipping engine.

use alloc::vec::Vec;
use core::cmp::Ordering;
use num_traits::float::Float;

use crate::predicates::{doubled_area, locally_inside, point_in_triangle};
use crate::ring::{build_ring, filter_ring, Arena, VertId};
use crate::OutIndex;

/// Builds a reversed ring per hole, then merges every hole into the outer
/// ring in a deterministic left-to-right order. Returns the merged ring.
pub(crate) fn merge_holes<T: Float, N: OutIndex>(
    arena: &mut Arena<T>,
    data: &[T],
    dim: usize,
    hole_indices: &[N],
    num_points: usize,
    queue: &mut Vec<VertId>,
    mut outer: VertId,
) -> VertId {
    queue.clear();
    for (k, hole_start) in hole_indices.iter().enumerate() {
        let start = hole_start.to_usize();
        let end = if k + 1 < hole_indices.len() {
            hole_indices[k + 1].to_usize()
        } else {
            num_points
        };
        if let Some(ring) = build_ring(arena, data, dim, start, end, false) {
            if ring == arena.vert(ring).next {
                // single-point hole; keep it through the degenerate filter
                arena.vert_mut(ring).bridge = true;
            }
            queue.push(leftmost(arena, ring));
        }
    }

    queue.sort_unstable_by(|&a, &b| compare_x_y_slope(arena, a, b));

    for &hole in queue.iter() {
        outer = link_hole(arena, hole, outer);
    }
    outer
}

/// Orders hole representatives by x, then y, then the slope of the outgoing
/// ring edge, so coincident hole corners merge in a stable order.
fn compare_x_y_slope<T: Float>(arena: &Arena<T>, a_i: VertId, b_i: VertId) -> Ordering {
    let a = arena.vert(a_i);
    let b = arena.vert(b_i);
    match a.x.partial_cmp(&b.x) {
        Some(Ordering::Equal) | None => {}
        Some(o) => return o,
    }
    match a.y.partial_cmp(&b.y) {
        Some(Ordering::Equal) | None => {}
        Some(o) => return o,
    }
    let an = arena.vert(a.next);
    let bn = arena.vert(b.next);
    let slope_a = (an.y - a.y) / (an.x - a.x);
    let slope_b = (bn.y - b.y) / (bn.x - b.x);
    slope_a.partial_cmp(&slope_b).unwrap_or(Ordering::Equal)
}

/// The minimal vertex of a ring under [`compare_x_y_slope`].
fn leftmost<T: Float>(arena: &Arena<T>, start: VertId) -> VertId {
    let mut best = start;
    let mut p = arena.vert(start).next;
    while p != start {
        if compare_x_y_slope(arena, p, best) == Ordering::Less {
            best = p;
        }
        p = arena.vert(p).next;
    }
    best
}

/// Splices one hole into the outer ring at a visible bridge vertex and
/// re-filters both sides of the seam. A hole with no visible bridge is left
/// out (the outer ring is returned unchanged).
fn link_hole<T: Float>(arena: &mut Arena<T>, hole: VertId, outer: VertId) -> VertId {
    let Some(bridge) = find_bridge(arena, hole, outer) else {
        return outer;
    };
    let seam = arena.split_ring(bridge, hole);

    let end = arena.vert(seam).next;
    filter_ring(arena, seam, Some(end));
    let end = arena.vert(bridge).next;
    filter_ring(arena, bridge, Some(end))
}

/// Finds an outer-ring vertex visible from the hole's representative point.
///
/// First pass: cast a horizontal ray leftward from the hole point and keep
/// the closest crossing edge's lesser-x endpoint. Second pass: among ring
/// vertices inside the triangle spanned by the ray hit, prefer the minimum
/// tangent angle to the hole point, breaking ties by larger x and then by
/// sector containment.
fn find_bridge<T: Float>(arena: &Arena<T>, hole_i: VertId, outer: VertId) -> Option<VertId> {
    let (hx, hy) = {
        let hole = arena.vert(hole_i);
        (hole.x, hole.y)
    };
    let mut qx = T::neg_infinity();
    let mut m_i: Option<VertId> = None;

    let mut p_i = outer;
    loop {
        let p = arena.vert(p_i);
        let n = arena.vert(p.next);
        if hy <= p.y && hy >= n.y && n.y != p.y {
            let x = p.x + (hy - p.y) * (n.x - p.x) / (n.y - p.y);
            if x <= hx && x > qx {
                qx = x;
                m_i = Some(if p.x < n.x { p_i } else { p.next });
                if x == hx {
                    // ray hit a vertex exactly; it is its own bridge
                    return m_i;
                }
            }
        }
        p_i = p.next;
        if p_i == outer {
            break;
        }
    }

    let mut m_i = m_i?;
    let stop_i = m_i;
    let (mx, my) = {
        let m = arena.vert(m_i);
        (m.x, m.y)
    };
    let mut tan_min = T::infinity();

    let mut p_i = m_i;
    loop {
        let p = arena.vert(p_i);
        if hx >= p.x
            && p.x >= mx
            && hx != p.x
            && point_in_triangle(
                if hy < my { hx } else { qx },
                hy,
                mx,
                my,
                if hy < my { qx } else { hx },
                hy,
                p.x,
                p.y,
            )
        {
            let tan = (hy - p.y).abs() / (hx - p.x);
            let best = arena.vert(m_i);
            if locally_inside(arena, p_i, hole_i)
                && (tan < tan_min
                    || (tan == tan_min
                        && (p.x > best.x
                            || (p.x == best.x && sector_contains_sector(arena, m_i, p_i)))))
            {
                m_i = p_i;
                tan_min = tan;
            }
        }
        p_i = p.next;
        if p_i == stop_i {
            return Some(m_i);
        }
    }
}

/// Whether the visibility sector at `m` strictly contains the sector at `p`,
/// for two vertices at the same coordinates.
fn sector_contains_sector<T: Float>(arena: &Arena<T>, m_i: VertId, p_i: VertId) -> bool {
    let m = arena.vert(m_i);
    let p = arena.vert(p_i);
    doubled_area(arena.vert(m.prev), m, arena.vert(p.prev)) < T::zero()
        && doubled_area(arena.vert(p.next), m, arena.vert(m.next)) < T::zero()
}
