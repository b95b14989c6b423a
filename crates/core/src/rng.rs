//! RNG module - random source abstraction and 7-bag piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern falling-block
//! games. Each bag contains one of each shape (I, O, T, S, Z, J, L), shuffled.
//! Two bags are live at once: the one being drawn from and a lookahead bag
//! that feeds the preview.
//!
//! Also provides a simple LCG for deterministic sessions and testing.

use crate::types::{ShapeKind, NEXT_PREVIEW};

/// Source of randomness used by the bag shuffle, garbage holes, and
/// punisher-mode rolls.
pub trait RandomSource {
    /// Uniform integer in `[min, max_exclusive)`. Returns `min` when the
    /// range is empty.
    fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32;

    /// Uniform float in `[min, max)`.
    fn next_float(&mut self, min: f32, max: f32) -> f32;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl RandomSource for SimpleRng {
    fn next_int(&mut self, min: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min {
            return min;
        }
        let span = (max_exclusive as i64 - min as i64) as u32;
        min + self.next_range(span) as i32
    }

    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        let unit = (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32;
        min + (max - min) * unit
    }
}

/// Shuffle a slice using Fisher-Yates
pub fn shuffle<T>(rng: &mut dyn RandomSource, slice: &mut [T]) {
    for i in (1..slice.len()).rev() {
        let j = rng.next_int(0, i as i32 + 1) as usize;
        slice.swap(i, j);
    }
}

fn shuffled_bag(rng: &mut dyn RandomSource) -> [ShapeKind; 7] {
    let mut bag = ShapeKind::ALL;
    shuffle(rng, &mut bag);
    bag
}

/// 7-bag shape generator
#[derive(Debug, Clone)]
pub struct Bag {
    /// Bag currently being drawn from
    current: [ShapeKind; 7],
    /// Index into current bag
    index: usize,
    /// Next bag, already shuffled
    lookahead: [ShapeKind; 7],
}

impl Bag {
    /// Create a bag pair, shuffling both with `rng`
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let current = shuffled_bag(rng);
        let lookahead = shuffled_bag(rng);
        Self {
            current,
            index: 0,
            lookahead,
        }
    }

    /// Draw the next shape. When the current bag runs out the lookahead bag
    /// takes its place and a fresh lookahead is shuffled.
    pub fn draw(&mut self, rng: &mut dyn RandomSource) -> ShapeKind {
        let kind = self.current[self.index];
        self.index += 1;

        if self.index >= self.current.len() {
            self.current = self.lookahead;
            self.lookahead = shuffled_bag(rng);
            self.index = 0;
        }

        kind
    }

    /// Peek at the next shape without drawing it
    pub fn peek(&self) -> ShapeKind {
        self.current[self.index]
    }

    /// Peek at the upcoming shapes (spans into the lookahead bag).
    ///
    /// This is stack-only and does not allocate.
    pub fn preview(&self) -> [ShapeKind; NEXT_PREVIEW] {
        let mut out = [ShapeKind::I; NEXT_PREVIEW];
        let remaining = &self.current[self.index..];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = if i < remaining.len() {
                remaining[i]
            } else {
                self.lookahead[i - remaining.len()]
            };
        }
        out
    }

    /// Shapes left in the current bag
    pub fn remaining(&self) -> &[ShapeKind] {
        &self.current[self.index..]
    }
}
