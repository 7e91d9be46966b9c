use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::video::frame::Frame;

/// A playing video source observed by the effect pipeline
///
/// The pipeline holds no copy of the playback state; `paused` and `ended`
/// are read fresh every time a frame decision is made. The discrete
/// playback events (`play`, `seeking`, `seeked`) are delivered to the
/// scheduler by whatever observer mechanism the host wires up; the source
/// itself only answers state queries and samples pixels.
pub trait VideoSource: Send {
    /// Whether playback is currently paused
    fn paused(&self) -> bool;

    /// Whether playback has reached the end of the source
    fn ended(&self) -> bool;

    /// Sample the current visual content into the frame-sized buffer
    ///
    /// The source scales its content to the frame's fixed dimensions.
    fn sample_into(&mut self, frame: &mut Frame) -> Result<()>;
}

/// Shared playback flags for [`TestPatternSource`]
#[derive(Debug, Default)]
struct SourceState {
    paused: AtomicBool,
    ended: AtomicBool,
}

/// External control over a [`TestPatternSource`]'s playback flags
///
/// Lets a demo or test flip `paused`/`ended` while the source itself is
/// owned by the pipeline, the way a real player owns its video element.
#[derive(Clone, Debug)]
pub struct SourceControl {
    state: Arc<SourceState>,
}

impl SourceControl {
    pub fn set_paused(&self, paused: bool) {
        self.state.paused.store(paused, Ordering::SeqCst);
    }

    pub fn set_ended(&self, ended: bool) {
        self.state.ended.store(ended, Ordering::SeqCst);
    }

    pub fn paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> bool {
        self.state.ended.load(Ordering::SeqCst)
    }
}

/// Synthetic video source producing an animated test pattern
///
/// Renders a scrolling diagonal gradient with a band of analog-style noise,
/// advancing one step per sample. Used by the demo binary and the scheduler
/// tests in place of a real decoder.
pub struct TestPatternSource {
    state: Arc<SourceState>,
    tick: u64,
    rng: SmallRng,
}

impl TestPatternSource {
    /// Create a source along with its external control handle
    ///
    /// The source starts paused, like a video element without autoplay.
    pub fn new() -> (Self, SourceControl) {
        let state = Arc::new(SourceState {
            paused: AtomicBool::new(true),
            ended: AtomicBool::new(false),
        });

        let source = Self {
            state: Arc::clone(&state),
            tick: 0,
            rng: SmallRng::seed_from_u64(0x5eed),
        };

        (source, SourceControl { state })
    }
}

impl VideoSource for TestPatternSource {
    fn paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    fn ended(&self) -> bool {
        self.state.ended.load(Ordering::SeqCst)
    }

    fn sample_into(&mut self, frame: &mut Frame) -> Result<()> {
        let (w, h) = (frame.width(), frame.height());
        let shift = self.tick as u32;

        for y in 0..h {
            for x in 0..w {
                let r = (x.wrapping_mul(255) / w.max(1)).wrapping_add(shift) as u8;
                let g = (y.wrapping_mul(255) / h.max(1)) as u8;
                let b = r.wrapping_add(g) / 2;
                frame.set_pixel(x, y, [r, g, b, 255]);
            }
        }

        // a thin scrolling band of snow, so motion is visible even at rest
        if h > 0 {
            let band = (shift / 2) % h;
            for x in 0..w {
                let v: u8 = self.rng.gen();
                frame.set_pixel(x, band, [v, v, v, 255]);
            }
        }

        self.tick += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_flags_are_shared() {
        let (source, control) = TestPatternSource::new();
        assert!(source.paused());
        assert!(!source.ended());

        control.set_paused(false);
        control.set_ended(true);
        assert!(!source.paused());
        assert!(source.ended());
    }

    #[test]
    fn test_pattern_advances_between_samples() {
        let (mut source, _control) = TestPatternSource::new();
        let mut first = Frame::new_black(16, 12);
        let mut second = Frame::new_black(16, 12);

        source.sample_into(&mut first).unwrap();
        source.sample_into(&mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_sample_fills_alpha_opaque() {
        let (mut source, _control) = TestPatternSource::new();
        let mut frame = Frame::new_filled(8, 8, [0, 0, 0, 0]);
        source.sample_into(&mut frame).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(frame.get_pixel(x, y)[3], 255);
            }
        }
    }
}
