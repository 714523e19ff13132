//! Random Number Generators
//!
//! Every source of uniform variates implements **Random**. A source
//! is never shared between threads; each worker thread owns its own
//! (see `Random::box_clone`), or uses **ThreadLocalRandom**.

// std
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
// others
use hexf::*;
// jmist
use crate::core::jmist::Float;

pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf64!("0x1.fffffffffffffp-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

/// A source of uniform variates in [0, 1).
pub trait Random: Send {
    fn next(&mut self) -> Float;
    /// Marks the start of a new sample. Stratified sources restart
    /// their strata; other sources ignore it.
    fn reset(&mut self) {}
    fn reseed(&mut self, seed: u64);
    fn box_clone(&self) -> Box<dyn Random>;
}

/// Random number generator
#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng::new()
    }
}

impl Rng {
    pub fn new() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
    pub fn with_sequence(initseq: u64) -> Self {
        let mut rng = Rng::new();
        rng.set_sequence(initseq);
        rng
    }
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = (oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27) as u32;
        let rot: u32 = oldstate.wrapping_shr(59) as u32;
        xorshifted.wrapping_shr(rot) | xorshifted.wrapping_shl(rot.wrapping_neg() & 31)
    }
    pub fn uniform_uint32_bounded(&mut self, b: u32) -> u32 {
        let threshold = b.wrapping_neg() % b;
        loop {
            let r = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf64!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
}

impl Random for Rng {
    fn next(&mut self) -> Float {
        self.uniform_float()
    }
    fn reseed(&mut self, seed: u64) {
        self.set_sequence(seed);
    }
    fn box_clone(&self) -> Box<dyn Random> {
        Box::new(*self)
    }
}

/// Divides [0, 1) into `n` strata and returns one variate from each
/// stratum, in random order, for every `n` consecutive draws.
#[derive(Debug, Clone)]
pub struct StratifiedRandom {
    n: usize,
    buckets: Vec<usize>,
    inner: Rng,
}

impl StratifiedRandom {
    pub fn new(n: usize, seed: u64) -> Self {
        let n = n.max(1);
        StratifiedRandom {
            n,
            buckets: (0..n).collect(),
            inner: Rng::with_sequence(seed),
        }
    }
    pub fn strata(&self) -> usize {
        self.n
    }
}

impl Random for StratifiedRandom {
    fn next(&mut self) -> Float {
        if self.buckets.is_empty() {
            self.reset();
        }
        let index = self.inner.uniform_uint32_bounded(self.buckets.len() as u32) as usize;
        let bucket = self.buckets.swap_remove(index);
        ((bucket as Float + self.inner.uniform_float()) / self.n as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
    fn reset(&mut self) {
        self.buckets.clear();
        self.buckets.extend(0..self.n);
    }
    fn reseed(&mut self, seed: u64) {
        self.inner.set_sequence(seed);
        self.reset();
    }
    fn box_clone(&self) -> Box<dyn Random> {
        Box::new(self.clone())
    }
}

static THREAD_SEED: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_RNG: RefCell<Rng> =
        RefCell::new(Rng::with_sequence(THREAD_SEED.fetch_add(1, Ordering::Relaxed)));
}

/// Forwards every draw to a generator owned by the calling thread.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadLocalRandom;

impl ThreadLocalRandom {
    pub fn new() -> Self {
        ThreadLocalRandom
    }
}

impl Random for ThreadLocalRandom {
    fn next(&mut self) -> Float {
        THREAD_RNG.with(|rng| rng.borrow_mut().uniform_float())
    }
    fn reseed(&mut self, seed: u64) {
        THREAD_RNG.with(|rng| rng.borrow_mut().set_sequence(seed));
    }
    fn box_clone(&self) -> Box<dyn Random> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::Rng;
    use proptest::prelude::*;

    #[test]
    fn same_sequence_same_numbers() {
        let mut a = Rng::with_sequence(7);
        let mut b = Rng::with_sequence(7);
        for _ in 0..16 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn thread_local_random_stays_in_range() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let mut rng = ThreadLocalRandom::new();
                    (0..1000).all(|_| {
                        let x = rng.next();
                        (0.0..1.0).contains(&x)
                    })
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    proptest! {
        #[test]
        fn stratified_hits_every_stratum(n in 1usize..64, seed in 0u64..1000) {
            let mut rng = StratifiedRandom::new(n, seed);
            let mut hits = vec![0; n];
            for _ in 0..n {
                let x = rng.next();
                prop_assert!((0.0..1.0).contains(&x));
                hits[(x * n as Float) as usize] += 1;
            }
            prop_assert!(hits.iter().all(|h| *h == 1));
        }
    }
}
