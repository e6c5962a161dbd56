// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Formatting of task spans for the spreadsheet and for the terminal.

use chrono::NaiveDateTime;

const SECS_PER_DAY: i64 = 86_400;

/// Whole seconds from `start` to `end`; zero if `end` is earlier.
fn span_secs(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().max(0)
}

/// Span as stored in the `Total Time` column: `H:MM:SS`, with a `N day(s), ` prefix past 24 hours.
pub fn storable(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let secs = span_secs(start, end);
    let days = secs / SECS_PER_DAY;
    let rem = secs % SECS_PER_DAY;
    let hms = format!("{}:{:02}:{:02}", rem / 3600, rem % 3600 / 60, rem % 60);
    match days {
        0 => hms,
        1 => format!("1 day, {}", hms),
        n => format!("{} days, {}", n, hms),
    }
}

/// Span for the end-of-task summary, e.g. `0 hours, 16 minutes, and 40 seconds`.
pub fn human(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let secs = span_secs(start, end);
    format!(
        "{} hours, {} minutes, and {} seconds",
        secs / 3600,
        secs % 3600 / 60,
        secs % 60
    )
}

/// Whole minutes elapsed since `start`, floored; what the popup label shows.
pub fn elapsed_minutes(start: NaiveDateTime, now: NaiveDateTime) -> i64 {
    span_secs(start, now) / 60
}
