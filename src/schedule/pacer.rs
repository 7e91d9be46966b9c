use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::warn;

/// Fallback frame interval, ~60 ticks per second
pub const FALLBACK_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Paces frame production
///
/// The native mode consumes ticks pushed by the platform's frame-sync
/// primitive over a channel; awaiting [`FramePacer::next_frame`] is the
/// equivalent of requesting the next animation callback. When no native
/// feed exists, or when one closes mid-run, the pacer degrades to a
/// fixed ~16.67 ms timer.
pub struct FramePacer {
    kind: PacerKind,
}

enum PacerKind {
    Native(mpsc::Receiver<()>),
    Interval(Interval),
}

impl FramePacer {
    /// Pace off ticks delivered by a platform frame-sync feed
    pub fn native(ticks: mpsc::Receiver<()>) -> Self {
        Self {
            kind: PacerKind::Native(ticks),
        }
    }

    /// Timer fallback at ~60 ticks per second
    pub fn interval() -> Self {
        Self {
            kind: PacerKind::Interval(make_interval()),
        }
    }

    /// Wait for the next frame slot
    ///
    /// Cancel-safe: dropping the future consumes no tick.
    pub async fn next_frame(&mut self) {
        loop {
            match &mut self.kind {
                PacerKind::Native(ticks) => match ticks.recv().await {
                    Some(()) => return,
                    None => {
                        warn!("native frame-sync feed closed; falling back to interval timer");
                        self.kind = PacerKind::Interval(make_interval());
                    }
                },
                PacerKind::Interval(interval) => {
                    interval.tick().await;
                    return;
                }
            }
        }
    }
}

fn make_interval() -> Interval {
    // first tick a full frame from now; missed slots are skipped rather
    // than burst through, like a real frame-sync source
    let mut interval = time::interval_at(
        Instant::now() + FALLBACK_FRAME_INTERVAL,
        FALLBACK_FRAME_INTERVAL,
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_native_pacer_delivers_pushed_ticks() {
        let (tx, rx) = mpsc::channel(4);
        let mut pacer = FramePacer::native(rx);

        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();

        pacer.next_frame().await;
        pacer.next_frame().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_native_feed_falls_back_to_interval() {
        let (tx, rx) = mpsc::channel(1);
        let mut pacer = FramePacer::native(rx);
        drop(tx);

        // must resolve via the timer fallback instead of hanging
        pacer.next_frame().await;
        pacer.next_frame().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_pacer_ticks() {
        let mut pacer = FramePacer::interval();
        let before = Instant::now();
        pacer.next_frame().await;
        assert!(Instant::now() - before >= FALLBACK_FRAME_INTERVAL);
    }
}
