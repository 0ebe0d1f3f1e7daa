use std::collections::VecDeque;

/// Port for the shared random stream
///
/// A single generator is threaded through every handler invocation in
/// delivery order. Implementations must be deterministic for a fixed seed so
/// that a fixed message ordering reproduces a run bit for bit.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Normal draw with the given mean and standard deviation
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Unbiased coin flip, consuming one uniform draw
    fn coin_flip(&mut self) -> bool {
        self.uniform() < 0.5
    }
}

/// Replays fixed draw sequences, for deterministic tests
///
/// Once a sequence is exhausted, uniform draws return `1.0` (so that no
/// `p > u` or `u < p` decision fires for `p <= 1`) and normal draws return
/// the requested mean.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    uniforms: VecDeque<f64>,
    normals: VecDeque<f64>,
    uniform_draws: usize,
    normal_draws: usize,
}

impl ScriptedRandom {
    pub fn new(uniforms: impl IntoIterator<Item = f64>) -> Self {
        Self {
            uniforms: uniforms.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Set the sequence returned by normal draws
    pub fn with_normals(mut self, normals: impl IntoIterator<Item = f64>) -> Self {
        self.normals = normals.into_iter().collect();
        self
    }

    /// Append more uniform draws
    pub fn push_uniforms(&mut self, uniforms: impl IntoIterator<Item = f64>) {
        self.uniforms.extend(uniforms);
    }

    /// Number of uniform draws consumed so far
    pub fn uniform_draws(&self) -> usize {
        self.uniform_draws
    }

    /// Number of normal draws consumed so far
    pub fn normal_draws(&self) -> usize {
        self.normal_draws
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        self.uniform_draws += 1;
        self.uniforms.pop_front().unwrap_or(1.0)
    }

    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        self.normal_draws += 1;
        self.normals.pop_front().unwrap_or(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replay_then_fallback() {
        let mut rng = ScriptedRandom::new([0.1, 0.7]).with_normals([42.0]);

        assert_eq!(rng.uniform(), 0.1);
        assert!(!rng.coin_flip());
        assert_eq!(rng.uniform(), 1.0);
        assert_eq!(rng.uniform_draws(), 3);

        assert_eq!(rng.normal(100.0, 5.0), 42.0);
        assert_eq!(rng.normal(100.0, 5.0), 100.0);
        assert_eq!(rng.normal_draws(), 2);
    }
}
