//! Z-order (Morton) spatial index over ring vertices.
//!
//! Vertices are quantized onto a 15-bit grid spanning the outer ring's
//! bounding box and chained into a second, z-key-sorted linked list that the
//! indexed ear test walks instead of the whole ring.

use num_traits::float::Float;

use crate::ring::{Arena, VertId};

/// Quantization grid derived from the outer ring's bounding box.
pub(crate) struct ZGrid<T: Float> {
    min_x: T,
    min_y: T,
    inv_size: T,
}

impl<T: Float> ZGrid<T> {
    /// Computes the grid from the first `outer_len` points of a flat
    /// coordinate buffer. Returns `None` for a zero-size bounding box.
    pub fn compute(data: &[T], dim: usize, outer_len: usize) -> Option<Self> {
        let mut min_x = data[0];
        let mut min_y = data[1];
        let (mut max_x, mut max_y) = (min_x, min_y);
        for i in 1..outer_len {
            let (x, y) = (data[i * dim], data[i * dim + 1]);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let size = (max_x - min_x).max(max_y - min_y);
        if size == T::zero() {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            inv_size: T::from(32767.0).unwrap() / size,
        })
    }

    /// Morton key of a point: both coordinates quantized to 15 bits and
    /// bit-interleaved.
    pub fn key(&self, x: T, y: T) -> i32 {
        let x = spread_bits(((x - self.min_x) * self.inv_size).to_u32().unwrap());
        let y = spread_bits(((y - self.min_y) * self.inv_size).to_u32().unwrap());
        (x | (y << 1)) as i32
    }
}

/// Spreads the low 16 bits of `v` so a zero bit separates each of them.
fn spread_bits(v: u32) -> u32 {
    let mut v = v & 0x0000FFFF;
    v = (v | (v << 8)) & 0x00FF00FF;
    v = (v | (v << 4)) & 0x0F0F0F0F;
    v = (v | (v << 2)) & 0x33333333;
    v = (v | (v << 1)) & 0x55555555;
    v
}

/// Assigns every ring vertex its Morton key (if unset), mirrors the ring
/// order into the z links, opens the cycle and sorts it by key.
pub(crate) fn index_ring<T: Float>(arena: &mut Arena<T>, start: VertId, grid: &ZGrid<T>) {
    let mut p_i = start;
    loop {
        let p = arena.vert_mut(p_i);
        if p.z == 0 {
            p.z = grid.key(p.x, p.y);
        }
        p.prev_z = Some(p.prev);
        p.next_z = Some(p.next);
        p_i = p.next;
        if p_i == start {
            break;
        }
    }

    // cut the circle open: the sort works on a nil-terminated chain
    let tail = arena.vert(start).prev;
    arena.vert_mut(start).prev_z = None;
    arena.vert_mut(tail).next_z = None;

    sort_by_key(arena, start);
}

/// Bottom-up, doubling-width merge sort over the singly-linked `next_z`
/// chain (Simon Tatham's list sort). Stable: equal keys keep their prior
/// relative order. Rebuilds `prev_z` as the exact reverse of `next_z`.
fn sort_by_key<T: Float>(arena: &mut Arena<T>, head: VertId) {
    let mut width = 1usize;
    let mut head = Some(head);

    loop {
        let mut next_run = head;
        head = None;
        let mut tail: Option<VertId> = None;
        let mut merges = 0usize;

        while let Some(run_start) = next_run {
            merges += 1;

            // measure out `width` nodes for the left run; the right run
            // starts wherever the left one ends
            let mut left = Some(run_start);
            let mut left_len = 0usize;
            let mut right = Some(run_start);
            for _ in 0..width {
                let Some(r) = right else { break };
                left_len += 1;
                right = arena.vert(r).next_z;
            }
            let mut right_len = width;

            loop {
                let e = match (left, right) {
                    (Some(l), Some(r)) if left_len > 0 && right_len > 0 => {
                        if arena.vert(l).z <= arena.vert(r).z {
                            left_len -= 1;
                            left = arena.vert(l).next_z;
                            l
                        } else {
                            right_len -= 1;
                            right = arena.vert(r).next_z;
                            r
                        }
                    }
                    (Some(l), _) if left_len > 0 => {
                        left_len -= 1;
                        left = arena.vert(l).next_z;
                        l
                    }
                    (_, Some(r)) if right_len > 0 => {
                        right_len -= 1;
                        right = arena.vert(r).next_z;
                        r
                    }
                    _ => break,
                };

                arena.vert_mut(e).prev_z = tail;
                match tail {
                    Some(t) => arena.vert_mut(t).next_z = Some(e),
                    None => head = Some(e),
                }
                tail = Some(e);
            }

            next_run = right;
        }

        if let Some(t) = tail {
            arena.vert_mut(t).next_z = None;
        }
        if merges <= 1 {
            return;
        }
        width *= 2;
    }
}
