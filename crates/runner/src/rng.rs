//! Seeded shared random stream

use desim_ports::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Single seeded generator shared by every handler, in delivery order
pub struct SimRng {
    seed: u64,
    rng: StdRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Degenerate or invalid distributions collapse to the mean
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return mean;
        }
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.normal(100.0, 5.0), b.normal(100.0, 5.0));
        }
    }

    #[test]
    fn test_uniform_in_unit_interval() {
        let mut rng = SimRng::new(1);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_zero_std_returns_mean() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.normal(42.0, 0.0), 42.0);
        assert_eq!(rng.normal(42.0, f64::NAN), 42.0);
    }
}
