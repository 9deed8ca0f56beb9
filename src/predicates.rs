//! Exact geometric predicates.
//!
//! All tests are sign-of-area based and use exact floating-point comparison;
//! coincident points are detected by bit-exact equality, never by epsilon.
//! Winding convention: a convex corner of a canonically-wound ring has
//! negative doubled area.

use num_traits::float::Float;

use crate::ring::{Arena, Vert, VertId};

/// Twice the signed area of the triangle `p`, `q`, `r`.
#[inline]
pub(crate) fn doubled_area<T: Float>(p: &Vert<T>, q: &Vert<T>, r: &Vert<T>) -> T {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

#[inline]
pub(crate) fn same_point<T: Float>(p: &Vert<T>, q: &Vert<T>) -> bool {
    p.x == q.x && p.y == q.y
}

/// Inclusive point-in-triangle test via three half-plane checks.
#[allow(clippy::too_many_arguments)]
#[inline]
pub(crate) fn point_in_triangle<T: Float>(
    ax: T,
    ay: T,
    bx: T,
    by: T,
    cx: T,
    cy: T,
    px: T,
    py: T,
) -> bool {
    (cx - px) * (ay - py) >= (ax - px) * (cy - py)
        && (ax - px) * (by - py) >= (bx - px) * (ay - py)
        && (bx - px) * (cy - py) >= (cx - px) * (by - py)
}

/// Like [`point_in_triangle`] but rejects a point coinciding with the first
/// corner, so an ear candidate never disqualifies itself.
#[allow(clippy::too_many_arguments)]
#[inline]
pub(crate) fn point_in_triangle_except_first<T: Float>(
    ax: T,
    ay: T,
    bx: T,
    by: T,
    cx: T,
    cy: T,
    px: T,
    py: T,
) -> bool {
    !(ax == px && ay == py) && point_in_triangle(ax, ay, bx, by, cx, cy, px, py)
}

fn orient_sign<T: Float>(v: T) -> i32 {
    (v > T::zero()) as i32 - (v < T::zero()) as i32
}

/// For collinear `p`, `q`, `r`, whether `q` lies within the bounding box of
/// segment `p`-`r`.
fn on_segment<T: Float>(p: &Vert<T>, q: &Vert<T>, r: &Vert<T>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segments `p1`-`q1` and `p2`-`q2` intersect, including touching
/// and collinear-overlap cases.
pub(crate) fn segments_cross<T: Float>(
    p1: &Vert<T>,
    q1: &Vert<T>,
    p2: &Vert<T>,
    q2: &Vert<T>,
) -> bool {
    let o1 = orient_sign(doubled_area(p1, q1, p2));
    let o2 = orient_sign(doubled_area(p1, q1, q2));
    let o3 = orient_sign(doubled_area(p2, q2, p1));
    let o4 = orient_sign(doubled_area(p2, q2, q1));

    (o1 != o2 && o3 != o4)
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o1 == 0 && on_segment(p1, p2, q1))
}

/// Whether the segment `a`-`b` starts into the ring interior at `a`,
/// distinguishing convex from reflex corners by the turn direction at `a`.
pub(crate) fn locally_inside<T: Float>(arena: &Arena<T>, a_i: VertId, b_i: VertId) -> bool {
    let a = arena.vert(a_i);
    let b = arena.vert(b_i);
    let a_prev = arena.vert(a.prev);
    let a_next = arena.vert(a.next);

    if doubled_area(a_prev, a, a_next) < T::zero() {
        doubled_area(a, b, a_next) >= T::zero() && doubled_area(a, a_prev, b) >= T::zero()
    } else {
        doubled_area(a, b, a_prev) < T::zero() || doubled_area(a, a_next, b) < T::zero()
    }
}

/// Whether the midpoint of `a`-`b` lies inside the ring, by ray-casting
/// parity over all ring edges.
pub(crate) fn middle_inside<T: Float>(arena: &Arena<T>, a_i: VertId, b_i: VertId) -> bool {
    let a = arena.vert(a_i);
    let b = arena.vert(b_i);
    let two = T::one() + T::one();
    let (mx, my) = ((a.x + b.x) / two, (a.y + b.y) / two);

    let mut inside = false;
    let mut p_i = a_i;
    loop {
        let p = arena.vert(p_i);
        let n = arena.vert(p.next);
        inside ^= (p.y > my) != (n.y > my)
            && n.y != p.y
            && (mx < (n.x - p.x) * (my - p.y) / (n.y - p.y) + p.x);
        p_i = p.next;
        if p_i == a_i {
            return inside;
        }
    }
}
