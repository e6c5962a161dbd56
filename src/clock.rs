// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

use chrono::{Local, NaiveDateTime, Timelike};

/// Source of local wall-clock time, truncated to whole seconds (the precision stored on disk).
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let t = Local::now().naive_local();
        t.with_nanosecond(0).unwrap_or(t)
    }
}
