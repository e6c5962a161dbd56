// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Runtime settings, read once from the environment.
//!
//! | Variable      | Effect |
//! |---------------|--------|
//! | `TT_DIR`      | Directory holding the `tasks_YYYY-MM-DD.xlsx` files (default: current directory). |
//! | `TT_DEBUG`    | Enables debug logging on stderr. |
//! | `TT_NO_POPUP` | Skips the elapsed-time window (e.g. over ssh). |

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const ENV_DIR: &str = "TT_DIR";
pub const ENV_DEBUG: &str = "TT_DEBUG";
pub const ENV_NO_POPUP: &str = "TT_NO_POPUP";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub dir: PathBuf,
    pub debug: bool,
    pub popup: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let dir = lookup(ENV_DIR)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Config {
            dir,
            debug: lookup(ENV_DEBUG).is_some(),
            popup: lookup(ENV_NO_POPUP).is_none(),
        }
    }
}
