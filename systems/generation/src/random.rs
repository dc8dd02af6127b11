use std::collections::VecDeque;

use noise::{NoiseFn, Perlin};
use rand::{Rng, RngCore};

/// Largest value strictly below one, used to keep samples inside `[0, 1)`.
const UNIT_UPPER: f64 = 1.0 - f64::EPSILON;

/// Uniform random source consumed by every generation routine.
///
/// `rand::Rng` is not object safe, so generation code talks to this narrower
/// trait instead and can be handed scripted sources in tests.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Returns a uniformly distributed integer in `[low, high)`.
    ///
    /// Empty ranges collapse to `low`.
    fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = high - low;
        let offset = (self.next_unit() * f64::from(span)).floor() as u32;
        low + offset.min(span - 1)
    }

    /// Returns `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Random source that replays a fixed script of unit samples.
///
/// Once the script runs dry every further draw yields the fallback value.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    /// Creates a source replaying `script` and then repeating `fallback`.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: fallback.clamp(0.0, UNIT_UPPER),
        }
    }

    /// Creates a source that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(std::iter::empty(), value)
    }

    /// Number of scripted samples not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.script
            .pop_front()
            .map_or(self.fallback, |value| value.clamp(0.0, UNIT_UPPER))
    }
}

/// Deterministic 2D coherent noise sampled during biome synthesis.
pub trait CoherentNoise {
    /// Samples the noise field, returning a value in `[0, 1)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Perlin noise remapped from `[-1, 1]` into `[0, 1)`.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Creates a Perlin field seeded with `seed`.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl CoherentNoise for PerlinNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self.perlin.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, UNIT_UPPER)
    }
}

/// Noise field returning the same value everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantNoise(pub f64);

impl CoherentNoise for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn range_stays_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            let value = rng.range_u32(4, 8);
            assert!((4..8).contains(&value));
        }
    }

    #[test]
    fn empty_range_collapses_to_low() {
        let mut rng = ScriptedRandom::constant(0.9);
        assert_eq!(rng.range_u32(5, 5), 5);
        assert_eq!(rng.range_u32(9, 3), 9);
    }

    #[test]
    fn scripted_source_replays_then_falls_back() {
        let mut rng = ScriptedRandom::new([0.1, 0.6], 0.3);
        assert!((rng.next_unit() - 0.1).abs() < f64::EPSILON);
        assert!((rng.next_unit() - 0.6).abs() < f64::EPSILON);
        assert_eq!(rng.remaining(), 0);
        assert!((rng.next_unit() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn scripted_range_maps_unit_to_integer() {
        let mut rng = ScriptedRandom::new([0.0, 0.999, 0.5], 0.0);
        assert_eq!(rng.range_u32(10, 20), 10);
        assert_eq!(rng.range_u32(10, 20), 19);
        assert_eq!(rng.range_u32(10, 20), 15);
    }

    #[test]
    fn perlin_samples_stay_in_unit_interval() {
        let noise = PerlinNoise::new(42);
        for row in 0..64 {
            for column in 0..64 {
                let value = noise.sample(f64::from(column) * 0.08, f64::from(row) * 0.08);
                assert!((0.0..1.0).contains(&value), "sample {value} escaped [0, 1)");
            }
        }
    }

    #[test]
    fn perlin_is_deterministic_per_seed() {
        let first = PerlinNoise::new(3);
        let second = PerlinNoise::new(3);
        assert_eq!(first.sample(1.3, 4.7), second.sample(1.3, 4.7));
    }
}
