//! RNG module - seeded 7-bag piece selection for the reference grid
//!
//! Each bag holds one of every kind, shuffled with a small LCG so a given seed
//! always produces the same spawn sequence.

use crate::types::PieceKind;

/// Simple LCG (Numerical Recipes constants)
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // 0 would be a valid LCG state, but keep seeds distinct from "unseeded"
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    drawn: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            drawn: 0,
            rng: SimpleRng::new(seed),
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.drawn = 0;
    }

    /// Draw the next kind, starting a new bag when the current one is empty
    pub fn draw(&mut self) -> PieceKind {
        if self.drawn >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.drawn];
        self.drawn += 1;
        kind
    }

    /// Kinds left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.drawn..]
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_bag_contains_every_kind_once() {
        let mut queue = PieceQueue::new(7);
        let mut drawn: Vec<_> = (0..7).map(|_| queue.draw()).collect();
        drawn.sort_by_key(|k| format!("{k:?}"));
        let mut all = PieceKind::ALL.to_vec();
        all.sort_by_key(|k| format!("{k:?}"));
        assert_eq!(drawn, all);
        assert!(queue.remaining().is_empty());
    }

    #[test]
    fn test_second_bag_refills() {
        let mut queue = PieceQueue::new(7);
        for _ in 0..7 {
            queue.draw();
        }
        queue.draw();
        assert_eq!(queue.remaining().len(), 6);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceQueue::new(99);
        let mut b = PieceQueue::new(99);
        for _ in 0..21 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
