//! Ordered bead chain for the match-chain game
//!
//! Beads have stable ids so a delayed insertion can find its target even after
//! the chain has shifted. Positions are derived from the chain's travel offset
//! and each bead's index, so insert/remove never leaves gaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;

/// Bead edge length in pixels
pub const BEAD_SIZE: f32 = 20.0;
/// Distance between neighbouring bead left edges
pub const BEAD_SPACING: f32 = BEAD_SIZE + 2.0;
/// Minimum run length that gets removed
pub const MIN_RUN: usize = 3;
/// Points per removed bead
pub const POINTS_PER_BEAD: u32 = 100;

/// Vertical position of the track at horizontal position `x`
#[inline]
pub fn track_y(x: f32) -> f32 {
    100.0 + (x * 0.02).sin() * 50.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bead {
    pub id: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    beads: Vec<Bead>,
    next_id: u32,
    /// Left edge of the first bead along the track
    offset: f32,
}

impl Chain {
    pub fn new(colors: impl IntoIterator<Item = Color>, offset: f32) -> Self {
        let mut chain = Self {
            beads: Vec::new(),
            next_id: 0,
            offset,
        };
        for color in colors {
            chain.push(color);
        }
        chain
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn push(&mut self, color: Color) -> u32 {
        let id = self.alloc_id();
        self.beads.push(Bead { id, color });
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Move the whole chain along the track
    pub fn advance(&mut self, dx: f32) {
        self.offset += dx;
    }

    /// Left edge of the bead at `index`
    #[inline]
    pub fn bead_x(&self, index: usize) -> f32 {
        self.offset + index as f32 * BEAD_SPACING
    }

    /// Centre of the bead at `index`, on the track
    pub fn position(&self, index: usize) -> Vec2 {
        let x = self.bead_x(index);
        Vec2::new(x + BEAD_SIZE * 0.5, track_y(x))
    }

    /// Left edge of the last bead, if any
    pub fn tail_x(&self) -> Option<f32> {
        self.len().checked_sub(1).map(|i| self.bead_x(i))
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.beads.iter().position(|b| b.id == id)
    }

    /// First bead whose centre is within `reach` of `point` on both axes
    pub fn hit_test(&self, point: Vec2, reach: f32) -> Option<usize> {
        (0..self.len()).find(|&i| {
            let d = (self.position(i) - point).abs();
            d.x < reach && d.y < reach
        })
    }

    /// Insert a new bead before `index` (clamped to the end); returns its id
    pub fn insert(&mut self, index: usize, color: Color) -> u32 {
        let id = self.alloc_id();
        let index = index.min(self.beads.len());
        self.beads.insert(index, Bead { id, color });
        id
    }

    /// Inclusive bounds of the same-colour run through `index`
    fn run_bounds(&self, index: usize) -> (usize, usize) {
        let color = self.beads[index].color;
        let mut start = index;
        while start > 0 && self.beads[start - 1].color == color {
            start -= 1;
        }
        let mut end = index;
        while end + 1 < self.beads.len() && self.beads[end + 1].color == color {
            end += 1;
        }
        (start, end)
    }

    /// Remove the run through `index` if it is long enough, then keep
    /// collapsing at the join point while the closed gap forms a new run.
    ///
    /// Returns the points earned (`run length * 100` per removed run).
    pub fn digest_match(&mut self, index: usize) -> u32 {
        if index >= self.beads.len() {
            return 0;
        }

        let mut points = 0;
        let mut probe = index;
        loop {
            let (start, end) = self.run_bounds(probe);
            let run = end - start + 1;
            if run < MIN_RUN {
                break;
            }
            self.beads.drain(start..=end);
            points += run as u32 * POINTS_PER_BEAD;
            log::debug!("Chain run of {run} removed, {} beads left", self.beads.len());

            // Neighbours that just became adjacent
            if start == 0 || start >= self.beads.len() {
                break;
            }
            if self.beads[start - 1].color != self.beads[start].color {
                break;
            }
            probe = start;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::palette::{BLUE, GREEN, RED, YELLOW};

    fn colors(chain: &Chain) -> Vec<Color> {
        chain.beads().iter().map(|b| b.color).collect()
    }

    #[test]
    fn test_insert_completes_run_of_three() {
        let mut chain = Chain::new([BLUE, RED, RED, GREEN], 50.0);
        let id = chain.insert(1, RED);
        let index = chain.index_of(id).unwrap();
        assert_eq!(chain.digest_match(index), 300);
        assert_eq!(colors(&chain), vec![BLUE, GREEN]);
    }

    #[test]
    fn test_run_spans_both_sides_of_insert() {
        let mut chain = Chain::new([BLUE, RED, RED, RED, GREEN], 50.0);
        let id = chain.insert(3, RED);
        let index = chain.index_of(id).unwrap();
        assert_eq!(index, 3);
        assert_eq!(chain.digest_match(index), 400);
        assert_eq!(colors(&chain), vec![BLUE, GREEN]);
    }

    #[test]
    fn test_short_run_stays() {
        let mut chain = Chain::new([BLUE, RED, GREEN], 50.0);
        let id = chain.insert(1, RED);
        assert_eq!(chain.digest_match(chain.index_of(id).unwrap()), 0);
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn test_removal_propagates_through_join() {
        // G G R R + R -> removes RRR, then GG|G closes into a run of three
        let mut chain = Chain::new([YELLOW, GREEN, GREEN, RED, RED, GREEN, BLUE], 50.0);
        let id = chain.insert(3, RED);
        let points = chain.digest_match(chain.index_of(id).unwrap());
        assert_eq!(points, 300 + 300);
        assert_eq!(colors(&chain), vec![YELLOW, BLUE]);
    }

    #[test]
    fn test_ids_survive_shifts() {
        let mut chain = Chain::new([RED, GREEN, BLUE], 0.0);
        let target = chain.beads()[2].id;
        chain.insert(0, YELLOW);
        assert_eq!(chain.index_of(target), Some(3));
        assert_eq!(chain.insert(99, RED), 4);
        assert_eq!(chain.len(), 5);
    }

    #[test]
    fn test_positions_follow_offset() {
        let mut chain = Chain::new([RED, GREEN], 50.0);
        assert_eq!(chain.bead_x(1), 72.0);
        chain.advance(0.5);
        assert_eq!(chain.tail_x(), Some(72.5));
        let p = chain.position(0);
        assert_eq!(p.x, 60.5);
        assert!((p.y - track_y(50.5)).abs() < 1e-5);
        assert_eq!(chain.hit_test(p + Vec2::new(5.0, -5.0), BEAD_SIZE), Some(0));
        assert_eq!(chain.hit_test(Vec2::new(400.0, 380.0), BEAD_SIZE), None);
    }
}
