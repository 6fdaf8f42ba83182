use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often the audio playhead is sampled.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that reports the playhead of a playing track.
pub trait PlaybackClock: Send + Sync + 'static {
    fn position(&self) -> Duration;
    fn finished(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub position: Duration,
    pub finished: bool,
}

/// A periodic task sampling a [`PlaybackClock`]. The task stops when the
/// clock reports the end of the track, when [`PollTask::cancel`] is called,
/// or when the handle is dropped.
pub struct PollTask {
    task: JoinHandle<()>,
    ticks: UnboundedReceiver<Tick>,
}

impl PollTask {
    pub fn spawn(
        runtime: &Handle,
        period: Duration,
        clock: Arc<dyn PlaybackClock>,
        repaint: Option<egui::Context>,
    ) -> Self {
        let (tx, ticks) = unbounded_channel();
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let tick = Tick {
                    position: clock.position(),
                    finished: clock.finished(),
                };
                if tx.send(tick).is_err() {
                    break;
                }
                if let Some(ctx) = &repaint {
                    ctx.request_repaint();
                }
                if tick.finished {
                    break;
                }
            }
        });
        Self { task, ticks }
    }

    /// Most recent tick since the last call. A finishing tick is always
    /// returned, never skipped over.
    pub fn latest(&mut self) -> Option<Tick> {
        let mut latest = None;
        while let Ok(tick) = self.ticks.try_recv() {
            latest = Some(tick);
            if tick.finished {
                break;
            }
        }
        latest
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[derive(Default)]
    struct FakeClock {
        position_ms: AtomicU64,
        finished: AtomicBool,
    }

    impl PlaybackClock for FakeClock {
        fn position(&self) -> Duration {
            Duration::from_millis(self.position_ms.load(Ordering::SeqCst))
        }

        fn finished(&self) -> bool {
            self.finished.load(Ordering::SeqCst)
        }
    }

    async fn next_tick(task: &mut PollTask) -> Tick {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(tick) = task.latest() {
                    return tick;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("tick within timeout")
    }

    #[tokio::test]
    async fn test_reports_clock_position() {
        let clock = Arc::new(FakeClock::default());
        clock.position_ms.store(2500, Ordering::SeqCst);
        let mut task = PollTask::spawn(
            &Handle::current(),
            Duration::from_millis(10),
            clock.clone(),
            None,
        );
        let tick = next_tick(&mut task).await;
        assert_eq!(tick.position, Duration::from_millis(2500));
        assert!(!tick.finished);
    }

    #[tokio::test]
    async fn test_stops_after_finished_tick() {
        let clock = Arc::new(FakeClock::default());
        clock.finished.store(true, Ordering::SeqCst);
        let mut task = PollTask::spawn(
            &Handle::current(),
            Duration::from_millis(10),
            clock,
            None,
        );
        let tick = next_tick(&mut task).await;
        assert!(tick.finished);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(task.is_stopped());
    }

    #[tokio::test]
    async fn test_cancel_stops_task() {
        let clock = Arc::new(FakeClock::default());
        let task = PollTask::spawn(
            &Handle::current(),
            Duration::from_millis(10),
            clock,
            None,
        );
        task.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(task.is_stopped());
    }
}
