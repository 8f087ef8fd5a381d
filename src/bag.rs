//! Piece generator: a shuffled bag of all seven kinds, dealt one at a time and refilled when empty.

use crate::board::WIDTH;
use crate::piece::{ActivePiece, Kind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Bag of 7 tetrominoes (random order, then refill).
#[derive(Debug, Clone)]
pub struct Bag {
    queue: Vec<Kind>,
    rng: StdRng,
}

impl Bag {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic bag; the same seed deals the same sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            queue: Vec::with_capacity(Kind::ALL.len()),
            rng,
        }
    }

    /// Pieces left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Reshuffle a full set of kinds, but only once the current bag is exhausted.
    pub fn refill_if_empty(&mut self) {
        if self.queue.is_empty() {
            self.queue = self.shuffled().to_vec();
        }
    }

    /// Take the next kind from the bag.
    pub fn next_kind(&mut self) -> Kind {
        if let Some(kind) = self.queue.pop() {
            return kind;
        }
        let [rest @ .., last] = self.shuffled();
        self.queue = rest.to_vec();
        last
    }

    fn shuffled(&mut self) -> [Kind; 7] {
        let mut all = Kind::ALL;
        all.shuffle(&mut self.rng);
        log::trace!("bag refilled: {all:?}");
        all
    }

    /// Take the next kind and build its spawn piece (row 0, centred).
    pub fn next(&mut self) -> ActivePiece {
        ActivePiece::spawn(self.next_kind(), WIDTH)
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}
