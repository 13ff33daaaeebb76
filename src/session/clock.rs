use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// One second elapsed; carries the decremented remaining time.
    Tick(u32),
    /// Remaining time reached zero. Sent exactly once; the clock stops itself.
    Expired,
}

/// One-second countdown for an exam attempt. Best-effort 1 Hz: each tick
/// decrements the remainder by one, with no reconciliation against wall-clock
/// time if ticks are delayed.
#[derive(Debug, Default)]
pub struct SessionClock {
    task: Option<JoinHandle<()>>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins the countdown, delivering events on `events`. At most one timer
    /// may run per clock; starting a running clock is a caller error.
    pub fn start(&mut self, total_seconds: u32, events: mpsc::Sender<ClockEvent>) -> Result<()> {
        if self.is_running() {
            return Err(Error::Internal(
                "Session clock is already running".to_string(),
            ));
        }

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;

            let mut remaining = total_seconds;
            loop {
                interval.tick().await;
                remaining = remaining.saturating_sub(1);

                if events.send(ClockEvent::Tick(remaining)).await.is_err() {
                    debug!("Clock receiver dropped; stopping countdown");
                    return;
                }

                if remaining == 0 {
                    let _ = events.send(ClockEvent::Expired).await;
                    return;
                }
            }
        });

        self.task = Some(task);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels the countdown. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SessionClock {
    // Screen teardown must not leak a ticking timer.
    fn drop(&mut self) {
        self.stop();
    }
}
