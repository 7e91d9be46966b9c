//! # Video Plumbing
//!
//! Frame buffers plus the seams to the outside world: the video source
//! frames are sampled from and the surface finished frames are handed to.

pub mod frame;
pub mod source;
pub mod surface;

pub use frame::Frame;
pub use source::{SourceControl, TestPatternSource, VideoSource};
pub use surface::{BufferSurface, Surface, SurfaceHandle};
