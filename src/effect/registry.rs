use std::collections::HashMap;

use tracing::info;

use crate::config::EffectOptions;
use crate::effect::blur::SharedBlur;
use crate::effect::pipeline::EffectPipeline;
use crate::error::{ConfigError, Result};
use crate::params::{ParameterSet, ParamsHandle, DEFAULT_SCALE_FACTOR};
use crate::schedule::scheduler::FrameScheduler;
use crate::video::source::VideoSource;
use crate::video::surface::Surface;

/// Everything an effect needs to come to life
///
/// The host resolves its source/surface identifiers to live objects and
/// hands them over here together with the construction options.
pub struct EffectContext {
    pub source: Box<dyn VideoSource>,
    pub surface: Box<dyn Surface>,
    pub blur: SharedBlur,
    pub options: EffectOptions,
}

/// A constructed, ready-to-drive effect
///
/// `params` is the live parameter handle, the construction output an
/// external controller mutates to steer the running effect.
pub struct EffectInstance {
    pub scheduler: FrameScheduler,
    pub params: ParamsHandle,
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

type EffectFactory = Box<dyn Fn(EffectContext) -> Result<EffectInstance> + Send + Sync>;

/// Registry for managing available effect types
///
/// Effects are registered by name and constructed from an
/// [`EffectContext`]. Requesting a name that is not registered is a
/// configuration error: nothing is built and no frames are ever produced.
pub struct EffectRegistry {
    effects: HashMap<String, EffectFactory>,
}

impl EffectRegistry {
    /// Create a new registry with all built-in effects
    pub fn new() -> Self {
        let mut registry = Self {
            effects: HashMap::new(),
        };
        registry.register("blur".to_string(), build_blur_effect);
        registry
    }

    /// Register a custom effect
    pub fn register<F>(&mut self, name: String, factory: F)
    where
        F: Fn(EffectContext) -> Result<EffectInstance> + Send + Sync + 'static,
    {
        self.effects.insert(name, Box::new(factory));
    }

    /// Construct the named effect
    pub fn build(&self, name: &str, context: EffectContext) -> Result<EffectInstance> {
        match self.effects.get(name) {
            Some(factory) => {
                info!("constructing \"{}\" effect", name);
                factory(context)
            }
            None => Err(ConfigError::UnknownEffect {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Get all available effect names
    pub fn available_effects(&self) -> Vec<String> {
        self.effects.keys().cloned().collect()
    }

    /// Check if an effect is available
    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory for the built-in blur effect
fn build_blur_effect(context: EffectContext) -> Result<EffectInstance> {
    crate::config::validate_options(&context.options)?;

    let params = ParamsHandle::new(ParameterSet::from_options(&context.options));
    let scale_factor = context
        .options
        .scale_factor
        .unwrap_or(DEFAULT_SCALE_FACTOR);

    let pipeline = EffectPipeline::new(
        context.source,
        context.surface,
        context.blur,
        params.clone(),
        scale_factor,
    )?;

    let mut scheduler = FrameScheduler::new(pipeline);
    // with autoplay the play event fires before construction finishes
    scheduler.start_if_playing();

    Ok(EffectInstance { scheduler, params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use crate::video::source::TestPatternSource;
    use crate::video::surface::BufferSurface;

    fn make_context() -> EffectContext {
        let (source, _control) = TestPatternSource::new();
        let (surface, _handle) = BufferSurface::new(640, 480);
        EffectContext {
            source: Box::new(source),
            surface: Box::new(surface),
            blur: SharedBlur::unresolved(),
            options: EffectOptions::default(),
        }
    }

    #[test]
    fn test_builtin_effects_available() {
        let registry = EffectRegistry::new();
        assert!(registry.has_effect("blur"));
        assert_eq!(registry.len(), 1);
        assert!(registry.available_effects().contains(&"blur".to_string()));
    }

    #[test]
    fn test_build_blur_effect() {
        let registry = EffectRegistry::new();
        let instance = registry.build("blur", make_context()).unwrap();

        // 640x480 over the default scale factor of 8
        assert_eq!(instance.scheduler.pipeline().frame_size(), (80, 60));
        assert!(!instance.params.read(|p| p.flicker.enabled()));
    }

    #[test]
    fn test_unknown_effect_is_a_config_error() {
        let registry = EffectRegistry::new();
        let err = registry.build("sharpen", make_context()).unwrap_err();

        assert!(matches!(
            err,
            OverlayError::Config(ConfigError::UnknownEffect { .. })
        ));
    }

    #[test]
    fn test_invalid_options_halt_construction() {
        let registry = EffectRegistry::new();
        let mut context = make_context();
        context.options.radius = Some(f32::NAN);

        assert!(registry.build("blur", context).is_err());
    }

    #[test]
    fn test_custom_effect_registration() {
        let mut registry = EffectRegistry::new();
        registry.register("custom".to_string(), build_blur_effect);

        assert!(registry.has_effect("custom"));
        assert_eq!(registry.len(), 2);
    }
}
