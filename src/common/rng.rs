//! Deterministic random source for reproducible belief updates.
//!
//! Every sampling call in this crate takes the random generator as an explicit
//! argument (`&mut impl rand::Rng`). [`SimpleRng`] is the generator used by the
//! tests and benchmarks: seeding it twice with the same value reproduces the
//! same velocity samples and therefore the same belief trajectory.

/// Xorshift64 pseudo random number generator.
///
/// Small, fast and fully deterministic. Implements [`rand::RngCore`], so it can
/// be passed anywhere a `rand::Rng` is expected.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new SimpleRng with the given seed.
    /// A zero seed would lock xorshift at zero, so it is replaced by 1.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform f64 in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        // top 53 bits give every representable value in [0, 1) with equal spacing
        (self.advance() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl rand::RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
