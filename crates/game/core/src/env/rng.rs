//! Deterministic random sampling.
//!
//! Every roll is a pure function of a seed, so a replay of the same commands
//! against the same game seed heals for exactly the same amounts.

/// Seeded random source.
///
/// Implementations must return the same value for the same seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[min, max]`. Returns `min` when the range is empty.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
///
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rotation = (state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derives the seed of one roll.
///
/// * `game_seed` - fixed at game creation
/// * `nonce` - skill execution counter of the game state
/// * `actor` - raw id of the acting entity
/// * `context` - distinguishes several rolls of one execution, e.g. the
///   index of each heal target
pub fn compute_seed(game_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // Murmur3 finalizer.
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
