// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # tt — task timer
//!
//! Asks what you are about to work on, shows a small always-on-top window with the
//! minutes elapsed, and when you press Enter logs the task to a spreadsheet for the day.
//!
//! ## Files
//!
//! `tasks_YYYY-MM-DD.xlsx` in `$TT_DIR` (default: the current directory), sheet `Tasks`,
//! columns `Task Name | Start Time | End Time | Total Time`.
//!
//! ## Session
//!
//! - On start, if today's sheet has rows, asks what you did since the last end time and logs it.
//! - Then loops: task name, target duration in minutes, Enter when done.
//! - Past the target the window blinks red/green every second.
//! - Stop with Ctrl-C (or end of input).
//!
//! ## Environment
//!
//! `TT_DIR`, `TT_DEBUG`, `TT_NO_POPUP`; see [`config`].

mod clock;
mod config;
mod duration;
mod error;
mod logging;
mod popup;
mod session;
mod store;
mod timer;
mod window;

use std::env;
use std::io;
use std::process;

#[cfg(unix)]
use libc::{signal, SIGPIPE, SIG_IGN};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::popup::{Launcher, NoPopup, ProcessLauncher};
use crate::session::Session;

fn run_session<L: Launcher>(config: &Config, launcher: L) -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(
        config.dir.clone(),
        stdin.lock(),
        io::stdout(),
        SystemClock,
        launcher,
    );
    session.run()
}

fn run(config: &Config, args: &[String]) -> Result<()> {
    if args.first().map(String::as_str) == Some(window::POPUP_FLAG) {
        return window::run_from_args(&args[1..]);
    }
    if config.popup {
        let exe = env::current_exe()?;
        run_session(config, ProcessLauncher::new(exe))
    } else {
        run_session(config, NoPopup)
    }
}

fn main() {
    #[cfg(unix)]
    unsafe {
        signal(SIGPIPE, SIG_IGN);
    }
    let config = Config::from_env();
    let _logger = match logging::init(config.debug) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    };
    let args: Vec<String> = env::args().skip(1).collect();
    log::debug!("args {:?} dir {}", args, config.dir.display());

    if let Err(e) = run(&config, &args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
