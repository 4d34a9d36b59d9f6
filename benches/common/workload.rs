//! Workload generators for hit-rate benchmarks.
//!
//! Key streams are seeded so every run of a benchmark sees the same sequence.

use clockpro::ClockProCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`.
    Scan,
    /// Hot set interleaved with a one-shot sequential scan.
    ScanWithHotset { hot_size: u64, scan_every: u32 },
    /// Zipfian distribution; `theta` 0.0 = uniform, 0.99 = highly skewed (YCSB default).
    Zipfian { theta: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator::new(self.universe, self.workload, self.seed)
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    rng: StdRng,
    scan_pos: u64,
    tick: u32,
    zipfian: Option<ZipfianState>,
}

impl WorkloadGenerator {
    pub fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let universe = universe.max(1);
        let zipfian = match workload {
            Workload::Zipfian { theta } => Some(ZipfianState::new(universe, theta)),
            _ => None,
        };
        Self {
            universe,
            workload,
            rng: StdRng::seed_from_u64(seed),
            scan_pos: 0,
            tick: 0,
            zipfian,
        }
    }

    pub fn next_key(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.gen_range(0..self.universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_size = ((self.universe as f64) * hot_fraction.clamp(0.0, 1.0)).round() as u64;
                let hot_size = hot_size.clamp(1, self.universe);
                if self.rng.gen_bool(hot_prob.clamp(0.0, 1.0)) || hot_size == self.universe {
                    self.rng.gen_range(0..hot_size)
                } else {
                    self.rng.gen_range(hot_size..self.universe)
                }
            },
            Workload::Scan => self.next_scan_key(0),
            Workload::ScanWithHotset {
                hot_size,
                scan_every,
            } => {
                let hot_size = hot_size.clamp(1, self.universe);
                self.tick = self.tick.wrapping_add(1);
                if scan_every > 0 && self.tick % scan_every == 0 {
                    hot_size + self.next_scan_key(hot_size)
                } else {
                    self.rng.gen_range(0..hot_size)
                }
            },
            Workload::Zipfian { .. } => match &self.zipfian {
                Some(zipf) => zipf.sample(self.rng.r#gen::<f64>()),
                None => 0,
            },
        }
    }

    fn next_scan_key(&mut self, offset: u64) -> u64 {
        let span = (self.universe - offset.min(self.universe - 1)).max(1);
        let key = self.scan_pos % span;
        self.scan_pos = self.scan_pos.wrapping_add(1);
        key
    }
}

/// Drive `operations` read-through lookups and return the cache's get hit rate.
///
/// The cache must have a read callback installed; every miss loads and
/// inserts the key.
pub fn run_hit_rate<V>(
    cache: &mut ClockProCache<u64, V>,
    generator: &mut WorkloadGenerator,
    operations: usize,
) -> f64
where
    V: Clone,
{
    cache.reset_stats();
    for _ in 0..operations {
        let key = generator.next_key();
        let _ = std::hint::black_box(cache.get(&key));
    }
    cache.stats().get_hit_rate()
}

/// Zipfian distribution state for inverse CDF sampling (YCSB algorithm).
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        let eta = (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n);

        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}
