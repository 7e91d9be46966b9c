//! # crt-overlay
//!
//! Real-time stylized video overlay: samples frames from a playing video
//! source, blurs them, optionally composites a scanline flicker and fixed
//! borders, and presents the result in sync with playback state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crt_overlay::{
//!     config::{EffectOptions, FlickerOptions},
//!     effect::{EffectContext, EffectRegistry, SharedBlur},
//!     schedule::{FramePacer, PlaybackEvent},
//!     video::{BufferSurface, TestPatternSource},
//! };
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let registry = EffectRegistry::new();
//! let (source, control) = TestPatternSource::new();
//! let (surface, screen) = BufferSurface::new(640, 480);
//!
//! // supplying the flicker table (even empty) switches the stage on
//! let instance = registry.build("blur", EffectContext {
//!     source: Box::new(source),
//!     surface: Box::new(surface),
//!     blur: SharedBlur::unresolved(),
//!     options: EffectOptions {
//!         flicker: Some(FlickerOptions::default()),
//!         ..EffectOptions::default()
//!     },
//! })?;
//!
//! // the params handle steers the running effect
//! instance.params.update(|p| p.radius = 4.0);
//!
//! let (events, events_rx) = mpsc::channel(16);
//! let driver = tokio::spawn(instance.scheduler.run(FramePacer::interval(), events_rx));
//!
//! control.set_paused(false);
//! events.send(PlaybackEvent::Play).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Frame buffers, the video source seam, the presentation surface
//! - [`effect`] - The border/blur/flicker stages and the pipeline composing them
//! - [`schedule`] - The playback-driven scheduler and frame pacing
//! - [`config`] - Construction-time configuration
//! - [`params`] - The live, externally mutable parameter set
//!
//! ## Custom blur capabilities
//!
//! The blur algorithm is an opaque external capability that may finish
//! loading after the first frames have already been produced:
//!
//! ```rust,no_run
//! use crt_overlay::effect::{BlurCapability, SharedBlur};
//! use crt_overlay::video::Frame;
//! use crt_overlay::error::Result;
//!
//! struct MyBlur;
//!
//! impl BlurCapability for MyBlur {
//!     fn blur_in_place(
//!         &self,
//!         frame: &mut Frame,
//!         x: u32, y: u32, w: u32, h: u32,
//!         radius: f32,
//!     ) -> Result<()> {
//!         // your blur implementation
//!         Ok(())
//!     }
//! }
//!
//! let slot = SharedBlur::unresolved();
//! slot.provide(std::sync::Arc::new(MyBlur));
//! ```

pub mod config;
pub mod effect;
pub mod error;
pub mod params;
pub mod schedule;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::EffectConfig,
    effect::{EffectContext, EffectInstance, EffectRegistry, SharedBlur},
    error::{OverlayError, Result},
    params::{ParameterSet, ParamsHandle},
    schedule::{FramePacer, FrameScheduler, PlaybackEvent},
};
