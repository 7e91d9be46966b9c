use rayon::prelude::*;

use crate::effect::lookup::LookupTable;
use crate::params::FlickerParams;
use crate::video::frame::Frame;

/// Smallest modulation factor the stage will divide by
///
/// The per-row factor is a divisor; adversarial live parameters (brightness
/// near zero, strength past the baseline) can drive it to zero, negative or
/// NaN. Flooring keeps the division finite instead of letting NaN/Inf leak
/// into the frame buffer. `f32::max` returns the other operand for NaN, so
/// the floor absorbs that case too.
pub const FACTOR_FLOOR: f32 = 1e-3;

/// Scanline brightness modulation
///
/// For each pixel row `r` the stage computes
///
/// ```text
/// factor = 1/brightness + lookup[(floor(r / spacing) + t) mod len] * strength
/// ```
///
/// and divides the R, G and B channels by `factor`, leaving alpha alone.
/// Advancing `t` between frames scrolls the modulation bands vertically.
pub struct FlickerStage {
    lookup: LookupTable,
}

impl FlickerStage {
    pub fn new() -> Self {
        Self {
            lookup: LookupTable::build(),
        }
    }

    pub fn lookup(&self) -> &LookupTable {
        &self.lookup
    }

    /// Modulate the frame in place for phase counter `t`
    pub fn apply(&self, frame: &mut Frame, params: &FlickerParams, t: u64) {
        if !params.enabled() {
            return;
        }

        let width = frame.width() as usize;
        let stride = width * 4;
        if stride == 0 || frame.height() == 0 {
            return;
        }

        let brightness = params.brightness;
        let strength = params.strength;
        let spacing = params.spacing;
        let t_reduced = (t % self.lookup.len() as u64) as i64;

        // rows are independent, so modulate them in parallel
        frame
            .as_raw_mut()
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(row, pixels)| {
                // float-to-int casts saturate, so a degenerate spacing
                // (zero or negative) still yields a usable band index
                let band = (row as f32 / spacing).floor() as i64;
                let factor = 1.0 / brightness + self.lookup.sample(band + t_reduced) * strength;
                let factor = factor.max(FACTOR_FLOOR);

                for px in pixels.chunks_exact_mut(4) {
                    for channel in &mut px[..3] {
                        *channel = (*channel as f32 / factor).clamp(0.0, 255.0) as u8;
                    }
                }
            });
    }
}

impl Default for FlickerStage {
    fn default() -> Self {
        Self::new()
    }
}
