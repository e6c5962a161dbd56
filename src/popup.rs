// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Session-side handle for the elapsed-time window.
//!
//! A worker thread owns the window process: it polls the child, sets the shared
//! [`CancelFlag`] when the window goes away on its own, and shuts the child down when
//! the session sets the flag. [`Popup::stop`] joins that worker.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::timer::CancelFlag;
use crate::window;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long a child gets to close its window after stdin is closed, before it is killed.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// A running (or already closed) popup.
pub struct Popup {
    cancel: CancelFlag,
    worker: Option<JoinHandle<()>>,
}

impl Popup {
    /// A popup with no window behind it; `stop` returns immediately.
    pub fn detached() -> Self {
        Popup {
            cancel: CancelFlag::new(),
            worker: None,
        }
    }

    /// True once the window was closed or the popup was stopped.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_set()
    }

    /// Signals the window to close and waits for the worker to finish.
    pub fn stop(mut self) {
        self.cancel.set();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("popup worker panicked");
            }
        }
    }
}

/// Starts popups for tasks.
pub trait Launcher {
    fn launch(&self, start: NaiveDateTime, target_minutes: i64) -> Popup;
}

/// Runs each popup as a child copy of this executable.
pub struct ProcessLauncher {
    exe: PathBuf,
}

impl ProcessLauncher {
    pub fn new(exe: PathBuf) -> Self {
        ProcessLauncher { exe }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, start: NaiveDateTime, target_minutes: i64) -> Popup {
        let spawned = Command::new(&self.exe)
            .args(window::popup_args(start, target_minutes))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn();
        let child = match spawned {
            Ok(c) => c,
            Err(e) => {
                warn!("cannot open timer window ({}): {}", self.exe.display(), e);
                return Popup::detached();
            }
        };
        debug!("popup pid {}", child.id());
        let cancel = CancelFlag::new();
        let flag = cancel.clone();
        let worker = thread::Builder::new()
            .name("popup".to_string())
            .spawn(move || supervise(child, flag));
        match worker {
            Ok(handle) => Popup {
                cancel,
                worker: Some(handle),
            },
            Err(e) => {
                warn!("cannot start popup worker: {}", e);
                Popup::detached()
            }
        }
    }
}

/// Never opens a window (`TT_NO_POPUP`).
pub struct NoPopup;

impl Launcher for NoPopup {
    fn launch(&self, _start: NaiveDateTime, _target_minutes: i64) -> Popup {
        Popup::detached()
    }
}

/// Worker body: watch the child until it exits or `cancel` is set, then make sure it is gone.
fn supervise(mut child: Child, cancel: CancelFlag) {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("popup closed by user ({})", status);
                cancel.set();
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("popup: {}", e);
                cancel.set();
                return;
            }
        }
        if cancel.is_set() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
    // EOF on the child's stdin asks it to close its window.
    drop(child.stdin.take());
    let deadline = Instant::now() + CLOSE_GRACE;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            _ => {
                debug!("popup did not close in time, killing pid {}", child.id());
                let _ = child.kill();
                let _ = child.wait();
                return;
            }
        }
    }
}
