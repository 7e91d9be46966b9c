//! # Frame Scheduling
//!
//! The playback-driven animation loop: an explicit state machine reacting
//! to `play`/`seeking`/`seeked` events, paced by the platform's frame-sync
//! primitive or a 60 Hz timer fallback.

pub mod pacer;
pub mod scheduler;

pub use pacer::{FramePacer, FALLBACK_FRAME_INTERVAL};
pub use scheduler::{FrameScheduler, PlaybackEvent, SchedulerState};
