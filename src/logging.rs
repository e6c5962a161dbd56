// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Stderr logging via `flexi_logger`. Quiet unless `TT_DEBUG` is set; `RUST_LOG` wins when present.

use flexi_logger::{Logger, LoggerHandle};

use crate::error::Result;

fn level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

/// Starts the logger. Keep the returned handle alive for the life of the process.
pub fn init(debug: bool) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level(debug))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()?;
    log::debug!("logging started pid={}", std::process::id());
    Ok(handle)
}
