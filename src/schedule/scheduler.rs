use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::effect::pipeline::{EffectPipeline, FrameOutcome};
use crate::schedule::pacer::FramePacer;

/// Discrete playback events observed on the video source
///
/// How these are captured (element listeners, a player callback, a test
/// driving the scheduler by hand) is up to the host; the scheduler only
/// cares about the transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Seeking,
    Seeked,
}

/// Scheduler states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No active rendering; the last presented frame stays visible
    Idle,
    /// Producing one frame per pacer tick
    Animating,
    /// Rendering exactly one frame for a seek while paused
    SingleShot,
}

/// Playback-driven frame scheduler
///
/// Owns the pipeline and decides, per playback transition, whether a frame
/// is produced:
///
/// - `play` while not animating starts the loop with an immediate frame
/// - every animated frame re-checks `ended` (stop) and `paused` (park)
/// - `seeking`/`seeked` while paused render a single frame and return to
///   idle; while playing they are ignored, the loop is already live
///
/// The model is cooperative and single-threaded: frames never overlap, and
/// the next frame is only requested after the current one is presented.
pub struct FrameScheduler {
    pipeline: EffectPipeline,
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new(pipeline: EffectPipeline) -> Self {
        Self {
            pipeline,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn pipeline(&self) -> &EffectPipeline {
        &self.pipeline
    }

    /// Start animating if the source is already playing
    ///
    /// With autoplay, the play event fires before the effect is wired up;
    /// this covers that window by checking the state directly.
    pub fn start_if_playing(&mut self) {
        if !self.pipeline.source_paused() && !self.pipeline.source_ended() {
            self.on_play();
        }
    }

    /// Route an observed playback event to its transition
    pub fn dispatch(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Play => self.on_play(),
            PlaybackEvent::Seeking | PlaybackEvent::Seeked => self.seek_redraw(),
        }
    }

    /// `play` observed: enter the animation loop with an immediate frame
    pub fn on_play(&mut self) {
        if self.state == SchedulerState::Animating {
            debug!("play while already animating; ignored");
            return;
        }
        self.state = SchedulerState::Animating;
        self.step();
    }

    /// Pacer tick: produce the next animated frame
    ///
    /// Ticks arriving while not animating are stale and render nothing.
    pub fn on_tick(&mut self) {
        if self.state != SchedulerState::Animating {
            return;
        }
        self.step();
    }

    /// One animated frame, then decide whether the loop continues
    fn step(&mut self) {
        match self.pipeline.produce_frame() {
            Ok(FrameOutcome::Rendered) => {}
            Ok(FrameOutcome::Ended) => {
                debug!("source ended; leaving animation loop");
                self.state = SchedulerState::Idle;
            }
            Ok(FrameOutcome::Paused) => {
                debug!("source paused; leaving animation loop");
                self.state = SchedulerState::Idle;
            }
            Err(e) => {
                // per-frame failures are local; the loop keeps running
                warn!("frame skipped: {}", e);
            }
        }
    }

    /// Seek while paused: render exactly one frame
    fn seek_redraw(&mut self) {
        if !self.pipeline.source_paused() {
            // the animation loop already keeps the frame current
            return;
        }

        self.state = SchedulerState::SingleShot;
        if let Err(e) = self.pipeline.produce_frame() {
            warn!("single-shot redraw failed: {}", e);
        }
        self.state = SchedulerState::Idle;
    }

    /// Drive the scheduler from an event stream and a frame pacer
    ///
    /// Runs until the event channel closes; teardown is simply the
    /// absence of further events. Returns the scheduler so callers can
    /// inspect its final state.
    pub async fn run(
        mut self,
        mut pacer: FramePacer,
        mut events: mpsc::Receiver<PlaybackEvent>,
    ) -> Self {
        loop {
            if self.state == SchedulerState::Animating {
                tokio::select! {
                    maybe_event = events.recv() => match maybe_event {
                        Some(event) => self.dispatch(event),
                        None => break,
                    },
                    _ = pacer.next_frame() => self.on_tick(),
                }
            } else {
                match events.recv().await {
                    Some(event) => self.dispatch(event),
                    None => break,
                }
            }
        }
        self
    }
}
