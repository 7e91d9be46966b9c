use tracing::debug;

use crate::effect::blur::{BlurStage, SharedBlur};
use crate::effect::border::BorderStage;
use crate::effect::flicker::FlickerStage;
use crate::error::{ConfigError, Result};
use crate::params::ParamsHandle;
use crate::video::frame::Frame;
use crate::video::source::VideoSource;
use crate::video::surface::Surface;

/// What producing one frame amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The source had ended; nothing was drawn
    Ended,
    /// Frame rendered and presented; the source is still advancing
    Rendered,
    /// Frame rendered and presented, but the source is paused; the last
    /// frame stays visible and no further frame should be scheduled
    Paused,
}

/// The per-frame processing pipeline
///
/// Owns the working frame buffer and runs the fixed stage order on every
/// produced frame: acquire from the source, borders, blur, flicker, then
/// present to the surface. Borders go on first so the later stages treat
/// them like any other frame content.
///
/// The working frame dimensions are derived once here, from the surface
/// size and the construction-time scale factor, and never change.
pub struct EffectPipeline {
    source: Box<dyn VideoSource>,
    surface: Box<dyn Surface>,
    border: BorderStage,
    blur: BlurStage,
    flicker: FlickerStage,
    params: ParamsHandle,
    frame: Frame,
    /// Flicker phase counter; advances by `flicker.speed` per produced
    /// frame while flicker is enabled, never resets
    t: u64,
}

impl EffectPipeline {
    pub fn new(
        source: Box<dyn VideoSource>,
        surface: Box<dyn Surface>,
        blur: SharedBlur,
        params: ParamsHandle,
        scale_factor: u32,
    ) -> Result<Self> {
        if scale_factor == 0 {
            return Err(ConfigError::InvalidValue {
                key: "options.scale_factor".to_string(),
                value: scale_factor.to_string(),
            }
            .into());
        }

        let width = surface.width() / scale_factor;
        let height = surface.height() / scale_factor;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "options.scale_factor".to_string(),
                value: format!(
                    "{} (surface {}x{} leaves no pixels)",
                    scale_factor,
                    surface.width(),
                    surface.height()
                ),
            }
            .into());
        }

        debug!(
            "pipeline working frame {}x{} (surface {}x{}, scale {})",
            width,
            height,
            surface.width(),
            surface.height(),
            scale_factor
        );

        Ok(Self {
            source,
            surface,
            border: BorderStage::new(),
            blur: BlurStage::new(blur),
            flicker: FlickerStage::new(),
            params,
            frame: Frame::new_black(width, height),
            t: 0,
        })
    }

    /// Dimensions of the working frame
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    /// Current value of the flicker phase counter
    pub fn phase(&self) -> u64 {
        self.t
    }

    /// Handle to the live parameters of this pipeline
    pub fn params(&self) -> ParamsHandle {
        self.params.clone()
    }

    pub fn source_paused(&self) -> bool {
        self.source.paused()
    }

    pub fn source_ended(&self) -> bool {
        self.source.ended()
    }

    /// Produce and present one frame
    ///
    /// Each parameter is read once at its point of use, so concurrent
    /// mutation through the params handle lands cleanly on the next frame.
    /// A missing blur capability is recovered inside the blur stage; other
    /// stage failures bubble up for the scheduler to log and ride out.
    pub fn produce_frame(&mut self) -> Result<FrameOutcome> {
        if self.source.ended() {
            return Ok(FrameOutcome::Ended);
        }

        self.source.sample_into(&mut self.frame)?;

        let borders = self.params.read(|p| p.borders);
        self.border.apply(&mut self.frame, borders);

        let radius = self.params.read(|p| p.radius);
        self.blur.apply(&mut self.frame, radius);

        let flicker = self.params.read(|p| p.flicker.clone());
        if flicker.enabled() {
            self.t = self.t.wrapping_add(u64::from(flicker.speed));
            self.flicker.apply(&mut self.frame, &flicker, self.t);
        }

        self.surface.present(&self.frame)?;

        Ok(if self.source.paused() {
            FrameOutcome::Paused
        } else {
            FrameOutcome::Rendered
        })
    }
}
