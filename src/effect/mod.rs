//! # Effect Stages
//!
//! The per-frame processing stages and their composition. Order inside the
//! pipeline is fixed: borders first, then blur, then flicker, so the
//! borders receive the same smearing and modulation as the content behind
//! them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crt_overlay::effect::{EffectContext, EffectRegistry};
//! use crt_overlay::effect::blur::SharedBlur;
//! use crt_overlay::config::EffectOptions;
//! use crt_overlay::video::{BufferSurface, TestPatternSource};
//!
//! # fn main() -> crt_overlay::error::Result<()> {
//! let registry = EffectRegistry::new();
//! let (source, _control) = TestPatternSource::new();
//! let (surface, _handle) = BufferSurface::new(640, 480);
//!
//! let instance = registry.build("blur", EffectContext {
//!     source: Box::new(source),
//!     surface: Box::new(surface),
//!     blur: SharedBlur::unresolved(),
//!     options: EffectOptions::default(),
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod blur;
pub mod border;
pub mod flicker;
pub mod lookup;
pub mod pipeline;
pub mod registry;

// Re-exports for convenience
pub use blur::{BlurCapability, BlurStage, ImageBlur, SharedBlur};
pub use border::BorderStage;
pub use flicker::FlickerStage;
pub use lookup::LookupTable;
pub use pipeline::{EffectPipeline, FrameOutcome};
pub use registry::{EffectContext, EffectInstance, EffectRegistry};
