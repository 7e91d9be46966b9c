use std::sync::{Arc, Mutex};

use crate::config::EffectOptions;

/// Live configuration for one running effect instance
///
/// A handle to this record is returned at construction so an external
/// controller (sliders, scripting, tests) can steer the running effect.
/// Mutation contract: every field is safe to change between frames; the
/// pipeline reads each field once at its point of use, so a mid-frame
/// change becomes visible on the next produced frame. No field triggers
/// recomputation of derived state; frame dimensions in particular are
/// fixed at construction and unaffected by later writes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Blur strength handed to the external blur capability (>= 0)
    pub radius: f32,

    /// Draw fixed opaque borders on the frame edges
    pub borders: bool,

    /// Scanline flicker modulation parameters
    pub flicker: FlickerParams,
}

/// Parameters of the scanline flicker modulation
#[derive(Debug, Clone, PartialEq)]
pub struct FlickerParams {
    /// Decided once at construction from the presence of a flicker options
    /// object; deliberately not public so it cannot be altered afterward.
    enabled: bool,

    /// Baseline brightness divisor seed (> 0); the per-row factor starts
    /// at `1 / brightness`
    pub brightness: f32,

    /// Phase advance per produced frame
    ///
    /// Integral on purpose: a fractional phase would land between lookup
    /// table entries.
    pub speed: u32,

    /// Modulation amplitude added on top of the baseline
    pub strength: f32,

    /// Rows per modulation band (>= 1)
    pub spacing: f32,
}

pub const DEFAULT_RADIUS: f32 = 10.0;
pub const DEFAULT_SCALE_FACTOR: u32 = 8;
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
pub const DEFAULT_SPEED: u32 = 5;
pub const DEFAULT_STRENGTH: f32 = 0.5;
pub const DEFAULT_SPACING: f32 = 1.0;

impl FlickerParams {
    /// Whether the flicker stage runs at all for this instance
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl ParameterSet {
    /// Build the live parameter set from construction options
    ///
    /// `flicker.enabled` is true iff a flicker table was supplied: an empty
    /// `[options.flicker]` counts, absence does not. All other fields fall
    /// back to their documented defaults. The scale factor is consumed by
    /// the pipeline at construction and intentionally not stored here.
    pub fn from_options(options: &EffectOptions) -> Self {
        let flicker_opts = options.flicker.clone().unwrap_or_default();

        Self {
            radius: options.radius.unwrap_or(DEFAULT_RADIUS),
            borders: options.borders.unwrap_or(false),
            flicker: FlickerParams {
                enabled: options.flicker.is_some(),
                brightness: flicker_opts.brightness.unwrap_or(DEFAULT_BRIGHTNESS),
                speed: flicker_opts.speed.unwrap_or(DEFAULT_SPEED),
                strength: flicker_opts.strength.unwrap_or(DEFAULT_STRENGTH),
                spacing: flicker_opts.spacing.unwrap_or(DEFAULT_SPACING),
            },
        }
    }
}

/// Shared handle to the live [`ParameterSet`]
///
/// The scheduling model is single-threaded and cooperative, but the
/// controlling side may well live on another thread, so access is
/// serialized with a mutex. A poisoned lock is recovered rather than
/// propagated: the parameter record holds no invariants a panic could
/// break.
#[derive(Clone, Debug)]
pub struct ParamsHandle {
    inner: Arc<Mutex<ParameterSet>>,
}

impl ParamsHandle {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(params)),
        }
    }

    /// Read fields under the lock
    pub fn read<R>(&self, f: impl FnOnce(&ParameterSet) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Mutate fields under the lock
    pub fn update<R>(&self, f: impl FnOnce(&mut ParameterSet) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// A snapshot copy of the current parameters
    pub fn snapshot(&self) -> ParameterSet {
        self.read(|p| p.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectOptions, FlickerOptions};

    #[test]
    fn test_defaults_without_any_options() {
        let params = ParameterSet::from_options(&EffectOptions::default());

        assert_eq!(params.radius, DEFAULT_RADIUS);
        assert!(!params.borders);
        assert!(!params.flicker.enabled());
        assert_eq!(params.flicker.brightness, DEFAULT_BRIGHTNESS);
        assert_eq!(params.flicker.speed, DEFAULT_SPEED);
        assert_eq!(params.flicker.strength, DEFAULT_STRENGTH);
        assert_eq!(params.flicker.spacing, DEFAULT_SPACING);
    }

    #[test]
    fn test_empty_flicker_table_enables_flicker() {
        // presence decides, not content
        let options = EffectOptions {
            flicker: Some(FlickerOptions::default()),
            ..EffectOptions::default()
        };
        let params = ParameterSet::from_options(&options);

        assert!(params.flicker.enabled());
        assert_eq!(params.flicker.speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_absent_flicker_table_disables_flicker() {
        let options = EffectOptions {
            radius: Some(3.0),
            ..EffectOptions::default()
        };
        let params = ParameterSet::from_options(&options);

        assert!(!params.flicker.enabled());
    }

    #[test]
    fn test_supplied_values_override_defaults() {
        let options = EffectOptions {
            radius: Some(2.5),
            borders: Some(true),
            scale_factor: Some(4),
            flicker: Some(FlickerOptions {
                brightness: Some(2.0),
                speed: Some(9),
                strength: None,
                spacing: Some(3.0),
            }),
        };
        let params = ParameterSet::from_options(&options);

        assert_eq!(params.radius, 2.5);
        assert!(params.borders);
        assert_eq!(params.flicker.brightness, 2.0);
        assert_eq!(params.flicker.speed, 9);
        assert_eq!(params.flicker.strength, DEFAULT_STRENGTH);
        assert_eq!(params.flicker.spacing, 3.0);
    }

    #[test]
    fn test_handle_mutation_is_visible_to_readers() {
        let handle = ParamsHandle::new(ParameterSet::from_options(&EffectOptions::default()));
        handle.update(|p| p.radius = 42.0);
        assert_eq!(handle.read(|p| p.radius), 42.0);
    }
}
