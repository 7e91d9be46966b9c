use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::video::frame::Frame;

/// The presentation surface frames are handed to
///
/// The surface has fixed dimensions for the lifetime of an effect instance;
/// the pipeline derives its working-frame size from them once, at
/// construction. `present` receives the finished pixels after all stages
/// have run; how the surface scales or displays them is its own business.
pub trait Surface: Send {
    /// Width of the surface in display units
    fn width(&self) -> u32;

    /// Height of the surface in display units
    fn height(&self) -> u32;

    /// Store the finished frame for display
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

#[derive(Debug, Default)]
struct Presented {
    frames: u64,
    last: Option<Frame>,
}

/// In-memory presentation surface
///
/// Keeps the most recently presented frame and a running count, both
/// readable through a [`SurfaceHandle`] while the surface itself is owned
/// by the pipeline. This is the headless stand-in for an on-screen canvas.
pub struct BufferSurface {
    width: u32,
    height: u32,
    shared: Arc<Mutex<Presented>>,
}

/// Read access to what a [`BufferSurface`] has displayed so far
#[derive(Clone)]
pub struct SurfaceHandle {
    shared: Arc<Mutex<Presented>>,
}

impl BufferSurface {
    /// Create a surface of the given display size along with its handle
    pub fn new(width: u32, height: u32) -> (Self, SurfaceHandle) {
        let shared = Arc::new(Mutex::new(Presented::default()));
        let surface = Self {
            width,
            height,
            shared: Arc::clone(&shared),
        };
        (surface, SurfaceHandle { shared })
    }
}

impl Surface for BufferSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut presented = lock_presented(&self.shared);
        presented.frames += 1;
        presented.last = Some(frame.clone());
        Ok(())
    }
}

impl SurfaceHandle {
    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        lock_presented(&self.shared).frames
    }

    /// A copy of the most recently presented frame, if any
    pub fn last_frame(&self) -> Option<Frame> {
        lock_presented(&self.shared).last.clone()
    }
}

fn lock_presented(shared: &Arc<Mutex<Presented>>) -> MutexGuard<'_, Presented> {
    // a poisoned lock only means a panicking test presented mid-frame;
    // the stored pixels are still the last complete present
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_updates_handle() {
        let (mut surface, handle) = BufferSurface::new(640, 480);
        assert_eq!(handle.frames_presented(), 0);
        assert!(handle.last_frame().is_none());

        let frame = Frame::new_filled(80, 60, [9, 9, 9, 255]);
        surface.present(&frame).unwrap();
        surface.present(&frame).unwrap();

        assert_eq!(handle.frames_presented(), 2);
        assert_eq!(handle.last_frame().unwrap(), frame);
    }
}
