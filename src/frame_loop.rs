//! Cancelable frame loop with an injectable clock
//!
//! The winit host pulls one [`FrameTick`] per redraw. Headless callers (and
//! tests) drive [`FrameLoop::run_until_cancelled`] with a [`ManualClock`] to
//! feed synthetic timestamps.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// Source of monotonic frame timestamps
pub trait FrameClock {
    /// Time elapsed since the clock's origin
    fn now(&mut self) -> Duration;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that advances by a fixed step each time it is read
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: Duration,
    step: Duration,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }

    /// A 60 Hz clock
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl FrameClock for ManualClock {
    fn now(&mut self) -> Duration {
        let now = self.now;
        self.now += self.step;
        now
    }
}

/// Shared stop flag for a [`FrameLoop`]
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Zero-based frame counter
    pub index: u64,
    /// Timestamp of this frame
    pub now: Duration,
    /// Time since the previous frame, zero on the first one
    pub delta: Duration,
}

impl FrameTick {
    pub fn dt(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[derive(Debug)]
pub struct FrameLoop<C: FrameClock> {
    clock: C,
    cancel: CancelHandle,
    index: u64,
    last: Option<Duration>,
}

impl Default for FrameLoop<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::default())
    }
}

impl<C: FrameClock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            cancel: CancelHandle::default(),
            index: 0,
            last: None,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Produces the next tick, or `None` once cancelled
    pub fn next_tick(&mut self) -> Option<FrameTick> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let now = self.clock.now();
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        let tick = FrameTick {
            index: self.index,
            now,
            delta,
        };
        self.index += 1;
        self.last = Some(now);
        Some(tick)
    }

    /// Calls `frame` for every tick until the handle is cancelled (possibly
    /// from inside `frame`); returns the number of frames run
    pub fn run_until_cancelled<F>(&mut self, mut frame: F) -> u64
    where
        F: FnMut(&FrameTick, &CancelHandle),
    {
        let cancel = self.cancel.clone();
        let mut frames = 0;
        while let Some(tick) = self.next_tick() {
            frame(&tick, &cancel);
            frames += 1;
        }
        log::debug!("frame loop stopped after {frames} frames");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_carry_manual_timestamps() {
        let mut frames = FrameLoop::new(ManualClock::new(Duration::from_millis(10)));
        let first = frames.next_tick().unwrap();
        let second = frames.next_tick().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.delta, Duration::ZERO);
        assert_eq!(second.now, Duration::from_millis(10));
        assert_eq!(second.delta, Duration::from_millis(10));
    }

    #[test]
    fn loop_stops_once_cancelled_inside_a_frame() {
        let mut frames = FrameLoop::new(ManualClock::sixty_hz());
        let ran = frames.run_until_cancelled(|tick, cancel| {
            if tick.index == 4 {
                cancel.cancel();
            }
        });
        assert_eq!(ran, 5);
        assert!(frames.next_tick().is_none());
    }

    #[test]
    fn external_handle_cancels_before_first_frame() {
        let mut frames = FrameLoop::new(ManualClock::sixty_hz());
        frames.cancel_handle().cancel();
        assert_eq!(frames.run_until_cancelled(|_, _| {}), 0);
    }
}
