//! Vertex arena and ring construction.
//!
//! Rings are circular doubly-linked lists of vertices stored in a flat arena
//! and addressed by [`VertId`] handles. Slot 0 of the arena is a sentinel so
//! that handles can be `NonZeroU32` and `Option<VertId>` stays 4 bytes.

use alloc::vec::Vec;
use core::num::NonZeroU32;
use num_traits::float::Float;

use crate::predicates::{doubled_area, same_point};

pub(crate) type VertId = NonZeroU32;

/// points at the sentinel slot; every real handle is >= 1
const UNLINKED: VertId = unsafe { VertId::new_unchecked(1) };

pub(crate) struct Vert<T: Float> {
    /// index of the vertex in the original point sequence
    pub src: u32,
    pub x: T,
    pub y: T,
    /// Morton key; 0 means "not computed yet"
    pub z: i32,
    /// ring-order links (always circular)
    pub prev: VertId,
    pub next: VertId,
    /// z-order links, present only after spatial indexing
    pub prev_z: Option<VertId>,
    pub next_z: Option<VertId>,
    /// steiner point; exempt from degenerate-point removal
    pub bridge: bool,
}

impl<T: Float> Vert<T> {
    fn unlinked(src: u32, x: T, y: T) -> Self {
        Self {
            src,
            x,
            y,
            z: 0,
            prev: UNLINKED,
            next: UNLINKED,
            prev_z: None,
            next_z: None,
            bridge: false,
        }
    }
}

pub(crate) struct Arena<T: Float> {
    verts: Vec<Vert<T>>,
}

impl<T: Float> Arena<T> {
    pub fn new() -> Self {
        Self { verts: Vec::new() }
    }

    pub fn reset(&mut self, capacity: usize) {
        self.verts.clear();
        self.verts.reserve(capacity + 1);
        // sentinel slot
        self.verts
            .push(Vert::unlinked(0, T::infinity(), T::infinity()));
    }

    #[inline]
    pub fn vert(&self, i: VertId) -> &Vert<T> {
        &self.verts[i.get() as usize]
    }

    #[inline]
    pub fn vert_mut(&mut self, i: VertId) -> &mut Vert<T> {
        &mut self.verts[i.get() as usize]
    }

    fn next_id(&self) -> VertId {
        debug_assert!(!self.verts.is_empty());
        unsafe { VertId::new_unchecked(self.verts.len() as u32) }
    }

    /// Creates a vertex and links it after `last`, or as a self-loop when the
    /// ring is empty.
    pub fn insert_after(&mut self, src: u32, x: T, y: T, last: Option<VertId>) -> VertId {
        let id = self.next_id();
        let mut v = Vert::unlinked(src, x, y);
        match last {
            Some(last_i) => {
                let last = self.vert_mut(last_i);
                let last_next = last.next;
                last.next = id;
                v.prev = last_i;
                v.next = last_next;
                self.vert_mut(last_next).prev = id;
            }
            None => {
                v.prev = id;
                v.next = id;
            }
        }
        self.verts.push(v);
        id
    }

    /// Unlinks a vertex from the ring family and, if indexed, from the
    /// z family. Returns the former `(prev, next)` ring neighbors.
    pub fn unlink(&mut self, i: VertId) -> (VertId, VertId) {
        let v = self.vert(i);
        let (prev, next) = (v.prev, v.next);
        let (prev_z, next_z) = (v.prev_z, v.next_z);

        self.vert_mut(prev).next = next;
        self.vert_mut(next).prev = prev;
        if let Some(pz) = prev_z {
            self.vert_mut(pz).next_z = next_z;
        }
        if let Some(nz) = next_z {
            self.vert_mut(nz).prev_z = prev_z;
        }
        (prev, next)
    }

    /// Connects `a` and `b` with a pair of duplicate vertices. Applied within
    /// one ring this splits it in two; applied across two rings (outer ring
    /// and hole) it merges them into one. Returns a handle into the ring that
    /// does not contain `a`.
    pub fn split_ring(&mut self, a_i: VertId, b_i: VertId) -> VertId {
        let a2_i = self.next_id();
        let b2_i = unsafe { VertId::new_unchecked(a2_i.get() + 1) };

        let a = self.vert_mut(a_i);
        let mut a2 = Vert::unlinked(a.src, a.x, a.y);
        let a_next = a.next;
        a.next = b_i;
        a2.prev = b2_i;
        a2.next = a_next;
        self.vert_mut(a_next).prev = a2_i;

        let b = self.vert_mut(b_i);
        let mut b2 = Vert::unlinked(b.src, b.x, b.y);
        let b_prev = b.prev;
        b.prev = a_i;
        b2.next = a2_i;
        b2.prev = b_prev;
        self.vert_mut(b_prev).next = b2_i;

        self.verts.extend([a2, b2]);
        b2_i
    }
}

/// Twice the signed area of the sub-range `[start, end)` of a flat coordinate
/// buffer with `dim` numbers per point.
pub(crate) fn signed_area<T: Float>(data: &[T], dim: usize, start: usize, end: usize) -> T {
    if start >= end {
        return T::zero();
    }
    let mut sum = T::zero();
    let mut j = end - 1;
    for i in start..end {
        sum = sum + (data[j * dim] - data[i * dim]) * (data[i * dim + 1] + data[j * dim + 1]);
        j = i;
    }
    sum
}

/// Builds a circular ring from the point range `[start, end)`, walking the
/// range backwards when its signed area disagrees with the requested winding.
/// A coordinate-equal closing point is dropped. Returns `None` for an empty
/// range.
pub(crate) fn build_ring<T: Float>(
    arena: &mut Arena<T>,
    data: &[T],
    dim: usize,
    start: usize,
    end: usize,
    clockwise: bool,
) -> Option<VertId> {
    let mut last: Option<VertId> = None;

    if clockwise == (signed_area(data, dim, start, end) > T::zero()) {
        for i in start..end {
            last = Some(arena.insert_after(i as u32, data[i * dim], data[i * dim + 1], last));
        }
    } else {
        for i in (start..end).rev() {
            last = Some(arena.insert_after(i as u32, data[i * dim], data[i * dim + 1], last));
        }
    }

    if let Some(last_i) = last {
        let v = arena.vert(last_i);
        if same_point(v, arena.vert(v.next)) {
            let (_, next) = arena.unlink(last_i);
            last = Some(next);
        }
    }
    last
}

/// Removes coordinate-duplicate and collinear vertices, restarting from each
/// removal point until a full lap removes nothing. Steiner points survive.
pub(crate) fn filter_ring<T: Float>(
    arena: &mut Arena<T>,
    start: VertId,
    end: Option<VertId>,
) -> VertId {
    let mut end_i = end.unwrap_or(start);
    let mut p_i = start;

    loop {
        let p = arena.vert(p_i);
        let p_next_i = p.next;
        let degenerate = !p.bridge
            && (same_point(p, arena.vert(p_next_i))
                || doubled_area(arena.vert(p.prev), p, arena.vert(p_next_i)) == T::zero());

        if degenerate {
            let (prev_i, next_i) = arena.unlink(p_i);
            p_i = prev_i;
            end_i = prev_i;
            if p_i == next_i {
                return end_i;
            }
        } else {
            p_i = p_next_i;
            if p_i == end_i {
                return end_i;
            }
        }
    }
}
