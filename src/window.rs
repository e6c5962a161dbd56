// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! The elapsed-time window, run as `tt --popup <start> <target-minutes>` in a child process.
//!
//! winit allows one event loop per process, so every task gets a fresh child. The parent
//! closes our stdin to ask the window to go away; closing the window ends the process,
//! which is how the parent learns about it.

use std::io;
use std::thread;
use std::time::Instant;

use chrono::NaiveDateTime;
use eframe::egui::{self, Color32, RichText};
use log::{debug, error};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::timer::{
    Background, CancelFlag, DisplayError, LoopStatus, TickFrame, TimerDisplay, TimerLoop,
    TimerState,
};

pub const POPUP_FLAG: &str = "--popup";
const TITLE: &str = "Timer";
const START_ARG_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const WINDOW_SIZE: [f32; 2] = [40.0, 27.0];
const LABEL_SIZE: f32 = 14.0;
const GREEN: Color32 = Color32::from_rgb(0x00, 0x80, 0x00);
const RED: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);

/// Command-line arguments that start a popup for a task begun at `start`.
pub fn popup_args(start: NaiveDateTime, target_minutes: i64) -> Vec<String> {
    vec![
        POPUP_FLAG.to_string(),
        start.format(START_ARG_FORMAT).to_string(),
        target_minutes.to_string(),
    ]
}

/// Parses the arguments following [`POPUP_FLAG`].
fn parse_args(args: &[String]) -> Result<(NaiveDateTime, i64)> {
    let (start, target) = match args {
        [s, t, ..] => (s, t),
        _ => {
            return Err(Error::PopupArgs(
                "usage: tt --popup <start> <target-minutes>".to_string(),
            ))
        }
    };
    let start = NaiveDateTime::parse_from_str(start, START_ARG_FORMAT)
        .map_err(|e| Error::PopupArgs(format!("bad start time {:?}: {}", start, e)))?;
    let target = target
        .trim()
        .parse::<i64>()
        .map_err(|e| Error::PopupArgs(format!("bad target {:?}: {}", target, e)))?;
    Ok((start, target))
}

/// Runs the window until it is closed or stdin reaches EOF.
pub fn run_from_args(args: &[String]) -> Result<()> {
    let (start, target) = parse_args(args)?;
    debug!("popup start={} target={}m", start, target);
    let cancel = CancelFlag::new();
    let timer = TimerLoop::start(TimerState::new(start, target), cancel.clone(), Instant::now());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(false)
            .with_always_on_top(),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            watch_stdin(cancel, cc.egui_ctx.clone());
            Ok(Box::new(TimerWindow::new(timer)))
        }),
    )
    .map_err(|e| Error::Window(e.to_string()))
}

/// Sets `cancel` and wakes the window once the parent closes our stdin.
fn watch_stdin(cancel: CancelFlag, ctx: egui::Context) {
    let spawned = thread::Builder::new()
        .name("popup-stdin".to_string())
        .spawn(move || {
            let _ = io::copy(&mut io::stdin().lock(), &mut io::sink());
            debug!("popup stdin closed");
            cancel.set();
            ctx.request_repaint();
        });
    if let Err(e) = spawned {
        error!("popup: cannot watch stdin: {}", e);
    }
}

/// Last frame drawn, plus whether the window is on its way out.
struct Surface {
    frame: TickFrame,
    closing: bool,
}

impl TimerDisplay for Surface {
    fn show(&mut self, frame: &TickFrame) -> std::result::Result<(), DisplayError> {
        if self.closing {
            return Err(DisplayError::Gone);
        }
        self.frame = frame.clone();
        Ok(())
    }
}

struct TimerWindow {
    timer: TimerLoop,
    surface: Surface,
}

impl TimerWindow {
    fn new(timer: TimerLoop) -> Self {
        let surface = Surface {
            frame: timer.initial_frame(),
            closing: false,
        };
        TimerWindow { timer, surface }
    }
}

fn fill(background: Background) -> Color32 {
    match background {
        Background::Green => GREEN,
        Background::Red => RED,
    }
}

impl eframe::App for TimerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.surface.closing = true;
            self.timer.cancel_flag().set();
        }
        let now = Instant::now();
        match self
            .timer
            .on_frame(now, SystemClock.now(), &mut self.surface)
        {
            Ok(LoopStatus::Running) => {
                if let Some(wait) = self.timer.until_next(now) {
                    ctx.request_repaint_after(wait);
                }
            }
            Ok(LoopStatus::Stopped) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Err(e) => {
                error!("popup: {}", e);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        let frame = &self.surface.frame;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(fill(frame.background)))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(frame.label.as_str())
                            .size(LABEL_SIZE)
                            .strong()
                            .color(Color32::BLACK)
                            .background_color(RED),
                    );
                });
            });
    }
}
