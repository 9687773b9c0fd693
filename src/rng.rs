//! The seeded random stream used to place loads, escorts and AMRs.
//!
//! Published benchmark datasets were drawn with a Mersenne Twister (MT19937) stream seeded from
//! the replication number, followed by a particular "sample without replacement" routine. Both
//! are reproduced here exactly, so that regenerating a dataset yields the same instances.
use rand::RngCore;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;

/// Degree of recurrence of MT19937
const N: usize = 624;
/// Middle word offset of MT19937
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// A random stream which can be reset to the start of the sequence for a given seed.
pub trait ReseedableRng: RngCore {
    /// Restart the stream from `seed`, discarding all previous state
    fn reseed(&mut self, seed: u64);
}

/// MT19937 with integer seeding via `init_by_array`.
///
/// The seed is split into 32-bit little-endian words to form the key (a zero seed gives the key
/// `[0]`).
#[derive(Clone)]
pub struct PyRandom {
    state: Box<[u32; N]>,
    index: usize,
}

impl PyRandom {
    /// Create a new stream seeded with `seed`
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            state: Box::new([0; N]),
            index: N,
        };
        rng.reseed(seed);
        rng
    }

    #[allow(clippy::cast_possible_truncation)]
    fn init_genrand(&mut self, seed: u32) {
        let mt = &mut self.state;
        mt[0] = seed;
        for i in 1..N {
            let prev = mt[i - 1];
            mt[i] = 1_812_433_253_u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = N;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn init_by_array(&mut self, key: &[u32]) {
        self.init_genrand(19_650_218);
        let mt = &mut self.state;

        let mut i = 1;
        let mut j = 0;
        for _ in 0..N.max(key.len()) {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 1..N {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
        }

        // Guarantee a non-zero initial state
        mt[0] = UPPER_MASK;
        self.index = N;
    }

    /// Regenerate the whole block of N words
    fn twist(&mut self) {
        let mt = &mut self.state;
        for kk in 0..N {
            let y = (mt[kk] & UPPER_MASK) | (mt[(kk + 1) % N] & LOWER_MASK);
            let mag = if y & 1 == 0 { 0 } else { MATRIX_A };
            mt[kk] = mt[(kk + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }
}

/// The `init_by_array` key for an integer seed
#[allow(clippy::cast_possible_truncation)]
fn seed_key(seed: u64) -> Vec<u32> {
    let low = (seed & u64::from(u32::MAX)) as u32;
    let high = (seed >> 32) as u32;
    if high == 0 { vec![low] } else { vec![low, high] }
}

impl ReseedableRng for PyRandom {
    fn reseed(&mut self, seed: u64) {
        self.init_by_array(&seed_key(seed));
    }
}

impl RngCore for PyRandom {
    fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    fn next_u64(&mut self) -> u64 {
        // The first word drawn forms the low half
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Draw a uniformly distributed integer with `bits` random bits (at most 64).
///
/// Words are consumed least significant first and the surplus bits of the last word are
/// discarded from the bottom.
fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: u32) -> u64 {
    debug_assert!(bits <= 64);
    match bits {
        0 => 0,
        1..=32 => u64::from(rng.next_u32() >> (32 - bits)),
        _ => {
            let low = u64::from(rng.next_u32());
            let high = u64::from(rng.next_u32() >> (64 - bits));
            (high << 32) | low
        }
    }
}

/// Draw a uniformly distributed integer in `[0, n)` by rejection.
///
/// Exactly `bit_length(n)` bits are drawn per attempt; `n` must be positive.
#[allow(clippy::cast_possible_truncation)]
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, n: usize) -> usize {
    debug_assert!(n > 0, "Cannot draw from an empty range");
    let n = n as u64;
    let bits = u64::BITS - n.leading_zeros();
    loop {
        let r = random_bits(rng, bits);
        if r < n {
            return r as usize;
        }
    }
}

/// Indicates that more distinct elements were requested than a population holds.
#[derive(Debug, Clone, PartialEq)]
pub struct InsufficientPopulationError {
    /// The number of elements requested
    pub requested: usize,
    /// The size of the population
    pub available: usize,
}

impl fmt::Display for InsufficientPopulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Cannot sample {} distinct elements from a population of {}",
            self.requested, self.available
        )
    }
}

impl Error for InsufficientPopulationError {}

/// The population size up to which [`sample`] copies the population into a pool.
///
/// Above this size, picked indices are tracked in a set instead.
fn pool_threshold(k: usize) -> usize {
    let mut setsize = 21;
    if k > 5 {
        // 4^ceil(log4(3k)). 3k is never a power of four, so this is the smallest power of four
        // exceeding it.
        let mut power = 1;
        while power < 3 * k {
            power *= 4;
        }
        setsize += power;
    }
    setsize
}

/// Choose `k` distinct elements of `population` uniformly at random, without replacement.
///
/// The elements are returned in selection order. For a given stream state, the result depends
/// only on the population's order, so callers should pass a sorted population.
pub fn sample<T, R>(
    rng: &mut R,
    population: &[T],
    k: usize,
) -> Result<Vec<T>, InsufficientPopulationError>
where
    T: Clone,
    R: RngCore + ?Sized,
{
    let n = population.len();
    if k > n {
        return Err(InsufficientPopulationError {
            requested: k,
            available: n,
        });
    }

    let mut result = Vec::with_capacity(k);
    if n <= pool_threshold(k) {
        // Partial Fisher-Yates over a copy of the population
        let mut pool = population.to_vec();
        for i in 0..k {
            let j = random_below(rng, n - i);
            result.push(pool[j].clone());
            pool[j] = pool[n - i - 1].clone();
        }
    } else {
        let mut selected = HashSet::with_capacity(k);
        for _ in 0..k {
            let mut j = random_below(rng, n);
            while !selected.insert(j) {
                j = random_below(rng, n);
            }
            result.push(population[j].clone());
        }
    }

    Ok(result)
}
