//! Frame pacing.
//!
//! The animation never decides when the next frame happens; it only asks for
//! one. A [`FrameScheduler`] stands in for the host's refresh callback and
//! blocks until the next frame is due.

use std::thread;
use std::time::{Duration, Instant};

pub trait FrameScheduler {
    /// Block until the next refresh. Returns `false` once the host is gone
    /// and no further frames will be delivered.
    fn wait_for_refresh(&mut self) -> bool;
}

impl<F> FrameScheduler for F
where
    F: FnMut() -> bool,
{
    fn wait_for_refresh(&mut self) -> bool {
        self()
    }
}

/// Paces frames to a fixed rate by sleeping off whatever is left of the
/// frame interval. A slow frame delays the next one but never overlaps it.
pub struct FixedRateScheduler {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FixedRateScheduler {
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1))),
            last_tick: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn wait_for_refresh(&mut self) -> bool {
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last_tick = Some(Instant::now());
        true
    }
}

/// Delivers frames back to back, optionally only a fixed number of them.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    remaining: Option<u64>,
}

impl ImmediateScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver at most `ticks` frames, then report the host as gone.
    #[must_use]
    pub fn with_budget(ticks: u64) -> Self {
        Self {
            remaining: Some(ticks),
        }
    }
}

impl FrameScheduler for ImmediateScheduler {
    fn wait_for_refresh(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
        }
    }
}
