// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! The interactive loop.
//!
//! 1. If today's sheet already has a task, ask what happened since its end time and log that gap.
//! 2. Ask for a task name and a target duration in minutes.
//! 3. Start the popup and wait for Enter.
//! 4. Stop the popup, log the task, go back to 2.
//!
//! There is no quit command: the loop ends on interrupt, or cleanly on end of input.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, info};

use crate::clock::Clock;
use crate::duration;
use crate::error::{Error, Result};
use crate::popup::Launcher;
use crate::store::{format_timestamp, DayStore, TaskRecord};

/// Parses the answer to `Duration?` as whole minutes.
pub fn parse_target(input: &str) -> Result<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|source| Error::Target {
            input: input.to_string(),
            source,
        })
}

pub struct Session<R, W, C, L> {
    dir: PathBuf,
    input: R,
    out: W,
    clock: C,
    launcher: L,
}

impl<R: BufRead, W: Write, C: Clock, L: Launcher> Session<R, W, C, L> {
    pub fn new(dir: PathBuf, input: R, out: W, clock: C, launcher: L) -> Self {
        Session {
            dir,
            input,
            out,
            clock,
            launcher,
        }
    }

    /// Runs until end of input.
    pub fn run(&mut self) -> Result<()> {
        self.log_gap()?;
        while self.run_task()? {}
        debug!("end of input, session over");
        Ok(())
    }

    fn store_for(&self, day: NaiveDate) -> Result<DayStore> {
        DayStore::open_or_create(&self.dir, day)
    }

    /// Reads one line without its line ending; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;
        self.read_line()
    }

    fn log(&mut self, record: &TaskRecord) -> Result<()> {
        let store = self.store_for(record.start.date())?;
        store.append(record)?;
        info!(
            "logged {:?} {} .. {} to {}",
            record.name,
            format_timestamp(record.start),
            format_timestamp(record.end),
            store.path().display()
        );
        writeln!(self.out, "Total Time:  {}", record.total())?;
        Ok(())
    }

    /// Logs what happened between the last recorded end time and now, if there is one.
    fn log_gap(&mut self) -> Result<()> {
        let today = self.clock.now().date();
        let store = self.store_for(today)?;
        debug!("using {}", store.path().display());
        let last_end = match store.last_end_time()? {
            Some(t) => t,
            None => return Ok(()),
        };
        writeln!(self.out, "\n--- Logging Previous Task ---")?;
        let name = match self.prompt("What did you do since the last task? ")? {
            Some(n) => n,
            None => return Ok(()),
        };
        let end = self.clock.now().max(last_end);
        self.log(&TaskRecord::new(name.as_str(), last_end, end))?;
        writeln!(self.out, "Task '{}' logged successfully.\n", name)?;
        Ok(())
    }

    /// One pass through new task, running, logging. Returns false at end of input.
    fn run_task(&mut self) -> Result<bool> {
        writeln!(self.out, "\n--- New Task ---")?;
        let name = match self.prompt("What are you going to do now? ")? {
            Some(n) => n,
            None => return Ok(false),
        };
        let target = match self.prompt("Duration? ")? {
            Some(t) => parse_target(&t)?,
            None => return Ok(false),
        };

        let start = self.clock.now();
        writeln!(
            self.out,
            "Started task '{}' at {}.",
            name,
            format_timestamp(start)
        )?;
        writeln!(self.out, "Press Enter when you finish the task...")?;
        self.out.flush()?;

        let popup = self.launcher.launch(start, target);
        let more = self.read_line()?.is_some();
        if popup.is_closed() {
            debug!("timer window was closed before the task finished");
        }
        popup.stop();

        let end = self.clock.now().max(start);
        self.log(&TaskRecord::new(name.as_str(), start, end))?;
        writeln!(self.out, "\nTask '{}' logged successfully.", name)?;
        writeln!(
            self.out,
            "Task '{}' took {}.\n",
            name,
            duration::human(start, end)
        )?;
        Ok(more)
    }
}
