use std::future::Future;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::error::{Result, StageError};
use crate::video::frame::Frame;

/// The external blur routine
///
/// The pipeline treats blurring as an opaque capability: quality and
/// performance live entirely behind this trait. Implementations blur the
/// given region of the frame in place.
pub trait BlurCapability: Send + Sync {
    fn blur_in_place(
        &self,
        frame: &mut Frame,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        radius: f32,
    ) -> Result<()>;
}

/// Once-settable slot for a lazily loaded [`BlurCapability`]
///
/// The capability typically arrives asynchronously some time after the
/// effect starts producing frames. The slot is cheap to clone and can be
/// polled for readiness before each use; "not yet resolved" is a normal
/// transient state, not an error.
#[derive(Clone, Default)]
pub struct SharedBlur {
    slot: Arc<OnceLock<Arc<dyn BlurCapability>>>,
}

impl SharedBlur {
    /// A slot with no capability yet
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// A slot that already holds a capability
    pub fn resolved(capability: Arc<dyn BlurCapability>) -> Self {
        let shared = Self::default();
        shared.provide(capability);
        shared
    }

    /// Install the capability; returns false if one was already installed
    pub fn provide(&self, capability: Arc<dyn BlurCapability>) -> bool {
        self.slot.set(capability).is_ok()
    }

    /// Whether the capability has been resolved
    pub fn ready(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The resolved capability, if any
    pub fn get(&self) -> Option<Arc<dyn BlurCapability>> {
        self.slot.get().cloned()
    }

    /// Resolve the capability from an asynchronous loader
    ///
    /// Awaits the loader once and installs its result. A loader failure is
    /// logged and leaves the slot unresolved; frames simply stay unblurred.
    pub async fn load<F>(&self, loader: F)
    where
        F: Future<Output = Result<Arc<dyn BlurCapability>>>,
    {
        match loader.await {
            Ok(capability) => {
                if self.provide(capability) {
                    debug!("blur capability resolved");
                }
            }
            Err(e) => warn!("blur capability failed to load: {}", e),
        }
    }
}

/// Applies the external blur to the working frame
///
/// If the capability has not finished loading when a frame comes through
/// (expected on the very first frames) the frame is left unblurred and the
/// pipeline carries on. The first miss is logged at `warn`, later ones at
/// `debug` so a 60 Hz loop stays readable.
pub struct BlurStage {
    capability: SharedBlur,
    warned_unavailable: bool,
}

impl BlurStage {
    pub fn new(capability: SharedBlur) -> Self {
        Self {
            capability,
            warned_unavailable: false,
        }
    }

    /// Whether the external capability is available right now
    pub fn ready(&self) -> bool {
        self.capability.ready()
    }

    /// Blur the whole frame in place with the given radius
    ///
    /// All failure modes are recovered here: the frame is simply left
    /// unblurred for this call and the error is logged.
    pub fn apply(&mut self, frame: &mut Frame, radius: f32) {
        let Some(capability) = self.capability.get() else {
            let err = StageError::BlurUnavailable;
            if self.warned_unavailable {
                debug!("{}", err);
            } else {
                warn!("{}; rendering unblurred until it resolves", err);
                self.warned_unavailable = true;
            }
            return;
        };

        if !(radius > 0.0) {
            return;
        }

        let (w, h) = (frame.width(), frame.height());
        if let Err(e) = capability.blur_in_place(frame, 0, 0, w, h, radius) {
            warn!("blur failed, frame left unblurred: {}", e);
        }
    }
}

/// Gaussian blur capability backed by the `image` crate
///
/// This is the stock capability the demo resolves after a short delay; any
/// other implementation can be dropped in through [`SharedBlur`].
pub struct ImageBlur;

impl BlurCapability for ImageBlur {
    fn blur_in_place(
        &self,
        frame: &mut Frame,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        radius: f32,
    ) -> Result<()> {
        if radius <= 0.0 {
            return Ok(());
        }

        let w = w.min(frame.width().saturating_sub(x));
        let h = h.min(frame.height().saturating_sub(y));
        if w == 0 || h == 0 {
            return Ok(());
        }

        // the radius parameter approximates a box-blur radius; gaussian
        // sigma of half that gives a comparable visual spread
        let sigma = (radius * 0.5).max(0.1);

        let region = image::imageops::crop_imm(frame.as_image(), x, y, w, h).to_image();
        let blurred = image::imageops::blur(&region, sigma);
        image::imageops::replace(frame.as_image_mut(), &blurred, x as i64, y as i64);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records invocations instead of blurring
    struct CountingBlur {
        calls: AtomicUsize,
    }

    impl CountingBlur {
        fn shared() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl BlurCapability for CountingBlur {
        fn blur_in_place(
            &self,
            _frame: &mut Frame,
            _x: u32,
            _y: u32,
            _w: u32,
            _h: u32,
            _radius: f32,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_unresolved_capability_leaves_frame_untouched() {
        let mut stage = BlurStage::new(SharedBlur::unresolved());
        assert!(!stage.ready());

        let mut frame = Frame::new_filled(8, 8, [50, 60, 70, 255]);
        let before = frame.clone();
        stage.apply(&mut frame, 10.0);

        assert_eq!(frame, before);
    }

    #[test]
    fn test_capability_arriving_late_is_picked_up() {
        let shared = SharedBlur::unresolved();
        let mut stage = BlurStage::new(shared.clone());
        let counting = CountingBlur::shared();

        let mut frame = Frame::new_black(4, 4);
        stage.apply(&mut frame, 5.0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

        shared.provide(Arc::clone(&counting) as Arc<dyn BlurCapability>);
        assert!(stage.ready());

        stage.apply(&mut frame, 5.0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_provide_only_sticks_once() {
        let shared = SharedBlur::unresolved();
        let first = CountingBlur::shared();
        let second = CountingBlur::shared();

        assert!(shared.provide(Arc::clone(&first) as Arc<dyn BlurCapability>));
        assert!(!shared.provide(second as Arc<dyn BlurCapability>));

        let mut stage = BlurStage::new(shared);
        let mut frame = Frame::new_black(2, 2);
        stage.apply(&mut frame, 1.0);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_radius_skips_the_capability() {
        let counting = CountingBlur::shared();
        let mut stage = BlurStage::new(SharedBlur::resolved(
            Arc::clone(&counting) as Arc<dyn BlurCapability>
        ));

        let mut frame = Frame::new_black(4, 4);
        stage.apply(&mut frame, 0.0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_image_blur_softens_a_hard_edge() {
        // left half black, right half white
        let mut frame = Frame::new_black(16, 8);
        for y in 0..8 {
            for x in 8..16 {
                frame.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }

        ImageBlur
            .blur_in_place(&mut frame, 0, 0, 16, 8, 6.0)
            .unwrap();

        // pixels at the former edge are neither pure black nor pure white
        let edge = frame.get_pixel(8, 4);
        assert!(edge[0] > 0 && edge[0] < 255);
    }

    #[tokio::test]
    async fn test_async_load_resolves_the_slot() {
        let shared = SharedBlur::unresolved();
        shared
            .load(async { Ok(CountingBlur::shared() as Arc<dyn BlurCapability>) })
            .await;
        assert!(shared.ready());
    }
}
