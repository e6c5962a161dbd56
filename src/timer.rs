// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Elapsed-time popup logic, independent of any window toolkit.
//!
//! A [`TimerLoop`] owns the per-popup [`TimerState`] (label and blink colour), a one-second
//! [`Ticker`], and the [`CancelFlag`] shared with whoever started the popup. The window
//! calls [`TimerLoop::on_frame`] whenever it wakes and draws through a [`TimerDisplay`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One-shot stop signal. Set by the session when a task ends, or by the window when it is closed.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Repeating timer with an explicit start/stop lifecycle. Fires at most once per `poll`.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval,
            next_due: None,
        }
    }

    /// First tick is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true if a tick is due and schedules the next one.
    /// A ticker that fell behind by several intervals fires once and resumes from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due + self.interval;
                self.next_due = Some(if next <= now { now + self.interval } else { next });
                true
            }
            _ => false,
        }
    }

    /// Time until the next tick, or `None` when stopped.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    Green,
    Red,
}

impl Background {
    fn toggled(self) -> Self {
        match self {
            Background::Green => Background::Red,
            Background::Red => Background::Green,
        }
    }
}

/// What the window should show after a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickFrame {
    pub label: String,
    pub background: Background,
}

/// Label text for a number of elapsed minutes, e.g. `07m`.
pub fn minutes_label(minutes: i64) -> String {
    format!("{:02}m", minutes)
}

/// Per-popup state threaded through every tick.
#[derive(Clone, Debug)]
pub struct TimerState {
    start: NaiveDateTime,
    target_minutes: i64,
    background: Background,
}

impl TimerState {
    pub fn new(start: NaiveDateTime, target_minutes: i64) -> Self {
        TimerState {
            start,
            target_minutes,
            background: Background::Green,
        }
    }

    /// What the window shows before the first tick.
    pub fn initial_frame(&self) -> TickFrame {
        TickFrame {
            label: minutes_label(0),
            background: self.background,
        }
    }

    /// Recomputes the label; past the target, flips the background on every call.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickFrame {
        let minutes = duration::elapsed_minutes(self.start, now);
        if minutes > self.target_minutes {
            self.background = self.background.toggled();
        }
        TickFrame {
            label: minutes_label(minutes),
            background: self.background,
        }
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    /// The window was destroyed; treated as a stop signal.
    #[error("timer window is no longer available")]
    Gone,
    #[error("timer window: {0}")]
    Other(String),
}

/// Whatever draws a [`TickFrame`].
pub trait TimerDisplay {
    fn show(&mut self, frame: &TickFrame) -> Result<(), DisplayError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Stopped,
}

pub struct TimerLoop {
    state: TimerState,
    ticker: Ticker,
    cancel: CancelFlag,
}

impl TimerLoop {
    /// Starts ticking immediately.
    pub fn start(state: TimerState, cancel: CancelFlag, now: Instant) -> Self {
        let mut ticker = Ticker::new(TICK_INTERVAL);
        ticker.start(now);
        TimerLoop {
            state,
            ticker,
            cancel,
        }
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn initial_frame(&self) -> TickFrame {
        self.state.initial_frame()
    }

    /// Time until the window should wake again, or `None` once stopped.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.ticker.until_next(now)
    }

    /// Runs one wake-up: stops on cancellation, otherwise draws a frame if a tick is due.
    pub fn on_frame<D: TimerDisplay>(
        &mut self,
        now: Instant,
        wall: NaiveDateTime,
        display: &mut D,
    ) -> Result<LoopStatus, DisplayError> {
        if self.cancel.is_set() {
            self.ticker.stop();
            return Ok(LoopStatus::Stopped);
        }
        if !self.ticker.is_running() {
            return Ok(LoopStatus::Stopped);
        }
        if !self.ticker.poll(now) {
            return Ok(LoopStatus::Running);
        }
        let frame = self.state.tick(wall);
        match display.show(&frame) {
            Ok(()) => Ok(LoopStatus::Running),
            Err(DisplayError::Gone) => {
                log::debug!("timer window gone, stopping updates");
                self.cancel.set();
                self.ticker.stop();
                Ok(LoopStatus::Stopped)
            }
            Err(e) => Err(e),
        }
    }
}
