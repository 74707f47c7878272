//! Periodic tick sources.
//!
//! A [`TickSource`] arms a repeating one-second callback and hands back a
//! handle. Releasing (dropping) the handle stops the callback. Every tick
//! carries the [`TickId`] it was armed with so the receiver can drop ticks
//! that were already queued when the handle was released.

use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::{debug, trace};

use crate::pomodoro::mode::TICK_INTERVAL_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Something that can arm a periodic tick.
pub trait TickSource {
    type Handle;

    /// Start emitting `id` once per tick interval until the returned
    /// handle is dropped.
    fn arm(&mut self, id: TickId) -> Self::Handle;
}

pub type TickSender = mpsc::UnboundedSender<TickId>;
pub type TickReceiver = mpsc::UnboundedReceiver<TickId>;

pub fn create_tick_channel() -> (TickSender, TickReceiver) {
    mpsc::unbounded_channel()
}

/// Tick source backed by a tokio interval task per armed handle.
#[derive(Debug, Clone)]
pub struct IntervalTicks {
    tx: TickSender,
    period: Duration,
}

impl IntervalTicks {
    pub fn new(tx: TickSender) -> Self {
        Self::with_period(tx, Duration::from_millis(TICK_INTERVAL_MS))
    }

    pub fn with_period(tx: TickSender, period: Duration) -> Self {
        Self { tx, period }
    }
}

/// Aborts the interval task on drop.
#[derive(Debug)]
pub struct IntervalGuard {
    id: TickId,
    task: JoinHandle<()>,
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        debug!(id = %self.id, "releasing interval ticker");
        self.task.abort();
    }
}

impl TickSource for IntervalTicks {
    type Handle = IntervalGuard;

    fn arm(&mut self, id: TickId) -> IntervalGuard {
        debug!(id = %id, period_ms = self.period.as_millis() as u64, "arming interval ticker");
        let tx = self.tx.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            // First tick lands one full period after arming
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(id = %id, "tick");
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        IntervalGuard { id, task }
    }
}
