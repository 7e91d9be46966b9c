use std::f64::consts::PI;

/// Precomputed sine table driving the flicker modulation
///
/// One full cycle sampled at a phase step of π/60, giving 120 entries over
/// 0..2π. Built once per effect instance and never modified; every lookup
/// reduces its index modulo the table length, so any integer phase lands
/// on a valid entry, including negative sums from adversarial parameters.
#[derive(Debug, Clone)]
pub struct LookupTable {
    samples: Vec<f32>,
}

const PHASE_STEPS: usize = 120; // 2π / (π/60)

impl LookupTable {
    /// Generate the table: `sin(i · π/60)` for `i` in `0..120`
    pub fn build() -> Self {
        let samples = (0..PHASE_STEPS)
            .map(|i| (i as f64 * PI / 60.0).sin() as f32)
            .collect();
        Self { samples }
    }

    /// Number of entries in the table (always 120)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Look up the sine sample at an arbitrary integer phase
    pub fn sample(&self, phase: i64) -> f32 {
        let index = phase.rem_euclid(self.samples.len() as i64) as usize;
        self.samples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_one_full_cycle() {
        let table = LookupTable::build();
        assert_eq!(table.len(), 120);

        // sin(0) = 0, sin(π/2) = 1 at entry 30, sin(π) = 0 at entry 60
        assert!(table.sample(0).abs() < 1e-6);
        assert!((table.sample(30) - 1.0).abs() < 1e-6);
        assert!(table.sample(60).abs() < 1e-6);
        assert!((table.sample(90) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_wraps_for_any_phase() {
        let table = LookupTable::build();

        for phase in [-1_000_000i64, -121, -1, 0, 119, 120, 121, i64::MAX, i64::MIN] {
            // must not panic, and must agree with the reduced index
            let reduced = phase.rem_euclid(120);
            assert_eq!(table.sample(phase), table.sample(reduced));
        }
    }

    #[test]
    fn test_negative_phase_matches_cycle() {
        let table = LookupTable::build();
        // -30 ≡ 90 (mod 120)
        assert_eq!(table.sample(-30), table.sample(90));
    }
}
