//! Deterministic Park–Miller random stream.
//!
//! Every bit of randomness a layout run consumes comes from a
//! [`SeededRandom`], so the same seed and input always reproduce the same
//! layout.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;

/// Multiplicative linear-congruential generator (Park–Miller "minimal
/// standard").
///
/// The internal state is always in `[1, MODULUS - 1]`. Besides the
/// `next_*` helpers it implements [`RngCore`], so it can drive any
/// [`rand::Rng`] method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Creates a generator from a 32-bit-range seed.
    ///
    /// The seed is reduced modulo `2^31 - 1`; non-positive residues are
    /// shifted up by `2^31 - 2` so the state starts strictly positive.
    pub fn new(seed: i64) -> Self {
        let m = MODULUS as i64;
        let mut s = seed % m;
        if s <= 0 {
            s += m - 1;
        }
        // -(m - 1) is the one residue the shift maps onto zero.
        Self {
            state: s.max(1) as u64,
        }
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Returns the next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.advance() - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Returns the next value in `[min, max)`.
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns the next integer in `[min, max]`, both ends inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        self.next_range(min as f64, max as f64 + 1.0).floor() as i64
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for SeededRandom {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed) as i64)
    }
}
