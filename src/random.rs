//! Sources of randomness for throttle and bucket decisions.

/// A source of uniformly distributed values in `[0, 1)`.
///
/// Every [`rand::RngCore`] is a `RandomSource`, so `rand::thread_rng()` or a seeded
/// `StdRng` can be passed wherever a source is expected.
pub trait RandomSource {
    /// Draw the next value. Must be in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_uniform(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }
}

/// Deterministic source that derives each draw from the md5 hash of `"{seed}-{n}"`, where `n`
/// counts previous draws.
///
/// Seeding with a subject key makes throttle and bucket decisions reproducible for that subject
/// without storing a gene.
pub struct HashedRandom {
    seed: String,
    draws: u64,
}

impl HashedRandom {
    /// Create a source seeded with `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        HashedRandom {
            seed: seed.into(),
            draws: 0,
        }
    }
}

impl RandomSource for HashedRandom {
    fn next_uniform(&mut self) -> f64 {
        let hash = md5::compute(format!("{}-{}", self.seed, self.draws));
        self.draws += 1;
        let value = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]);
        f64::from(value) / (f64::from(u32::MAX) + 1.0)
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
#[cfg(test)]
pub(crate) struct SequenceRandom(pub Vec<f64>, pub usize);

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_uniform(&mut self) -> f64 {
        let value = self.0[self.1 % self.0.len()];
        self.1 += 1;
        value
    }
}
