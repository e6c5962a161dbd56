// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Error type shared by every fallible operation in `tt`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("tt: cannot read {path}: {source}")]
    ReadSheet {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("tt: cannot write {path}: {source}")]
    WriteSheet {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("tt: malformed timestamp {value:?} in {path}: {source}")]
    Timestamp {
        path: PathBuf,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The target duration typed at the `Duration?` prompt is not a whole number of minutes.
    #[error("tt: duration must be a whole number of minutes, got {input:?}")]
    Target {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("tt --popup: {0}")]
    PopupArgs(String),

    #[error("tt: cannot start logger: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),

    #[error("tt: timer window failed: {0}")]
    Window(String),
}
