//! RNG module - bag random piece generation
//!
//! Each bag contains one of each catalog kind in a uniformly shuffled order.
//! Draws come from the bag until it is empty, then a new bag is shuffled, so a
//! kind never waits more than `2K - 1` draws for its next appearance.
//!
//! A seeded `StdRng` drives the shuffle so a seed replays the same game.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::pieces::PieceCatalog;
use crate::types::PieceKind;

/// Draws piece kinds one bag at a time.
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    catalog: PieceCatalog,
    /// Remaining kinds of the current bag; popped from the back.
    bag: Vec<PieceKind>,
    rng: StdRng,
    seed: u32,
}

impl BagRandomizer {
    pub fn new(catalog: PieceCatalog, seed: u32) -> Self {
        Self {
            bag: Vec::with_capacity(catalog.len()),
            catalog,
            rng: StdRng::seed_from_u64(u64::from(seed)),
            seed,
        }
    }

    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend_from_slice(self.catalog.kinds());
        self.bag.shuffle(&mut self.rng);
    }

    /// Draw the next kind, shuffling a fresh bag when the current one is spent.
    pub fn next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill_bag();
        }
        // The catalog is never empty, so a refilled bag always has an element.
        self.bag.pop().unwrap_or(PieceKind::I)
    }

    /// Kinds left in the current bag, in the order they will be drawn.
    pub fn remaining(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().rev().copied()
    }

    /// Seed this randomizer was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Draw a seed for the next episode from this stream.
    pub fn next_seed(&mut self) -> u32 {
        self.rng.gen()
    }
}

/// Fixed-length lookahead in front of a [`BagRandomizer`].
///
/// The queue is filled once at creation; every [`PieceQueue::pop`] hands out
/// the front entry and appends exactly one new draw, so what the player sees
/// next is always `len` pieces ahead of what spawns now.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    upcoming: VecDeque<PieceKind>,
    randomizer: BagRandomizer,
}

impl PieceQueue {
    pub fn new(mut randomizer: BagRandomizer, len: usize) -> Self {
        let upcoming = (0..len).map(|_| randomizer.next()).collect();
        Self {
            upcoming,
            randomizer,
        }
    }

    /// Next kind to spawn. With a zero-length lookahead this draws directly.
    pub fn pop(&mut self) -> PieceKind {
        let next = self.randomizer.next();
        match self.upcoming.pop_front() {
            Some(front) => {
                self.upcoming.push_back(next);
                front
            }
            None => next,
        }
    }

    /// Upcoming kinds without consuming them, nearest first.
    pub fn preview(&self) -> impl ExactSizeIterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty()
    }

    pub fn seed(&self) -> u32 {
        self.randomizer.seed()
    }

    pub fn next_seed(&mut self) -> u32 {
        self.randomizer.next_seed()
    }
}
