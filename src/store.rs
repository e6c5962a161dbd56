// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Per-day task spreadsheet.
//!
//! One file per calendar day, `tasks_YYYY-MM-DD.xlsx`, with a single sheet `Tasks`:
//!
//! | Task Name | Start Time | End Time | Total Time |
//! |-----------|------------|----------|------------|
//! | text | `YYYY-MM-DD HH:MM:SS` | `YYYY-MM-DD HH:MM:SS` | `H:MM:SS` |
//!
//! Rows are only ever appended. Every append re-reads the workbook and saves it
//! again, so the file on disk is complete after each task.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_xlsxwriter::Workbook;

use crate::duration;
use crate::error::{Error, Result};

pub const SHEET: &str = "Tasks";
pub const HEADER: [&str; 4] = ["Task Name", "Start Time", "End Time", "Total Time"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column index of `End Time`.
const END_COL: usize = 2;
const COLUMN_WIDTHS: [f64; 4] = [32.0, 20.0, 20.0, 12.0];

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// File name for the given day, e.g. `tasks_2025-03-14.xlsx`.
pub fn file_name(day: NaiveDate) -> String {
    format!("tasks_{}.xlsx", day.format("%Y-%m-%d"))
}

/// One logged task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TaskRecord {
            name: name.into(),
            start,
            end,
        }
    }

    /// Value of the `Total Time` column.
    pub fn total(&self) -> String {
        duration::storable(self.start, self.end)
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format_timestamp(self.start),
            format_timestamp(self.end),
            self.total(),
        ]
    }
}

/// Handle to one day's spreadsheet.
#[derive(Clone, Debug)]
pub struct DayStore {
    path: PathBuf,
}

impl DayStore {
    /// Opens the file for `day` under `dir`, creating it (header row only) if it does not exist.
    pub fn open_or_create(dir: &Path, day: NaiveDate) -> Result<Self> {
        let store = DayStore {
            path: dir.join(file_name(day)),
        };
        if !store.path.exists() {
            fs::create_dir_all(dir)?;
            let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
            store.save(&[header])?;
            debug!("created {}", store.path.display());
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows as text, header first.
    pub fn rows(&self) -> Result<Vec<Vec<String>>> {
        let read_err = |source| Error::ReadSheet {
            path: self.path.clone(),
            source,
        };
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(read_err)?;
        let range = workbook.worksheet_range(SHEET).map_err(read_err)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    /// Appends one record and saves the file before returning.
    pub fn append(&self, record: &TaskRecord) -> Result<()> {
        let mut rows = self.rows()?;
        rows.push(record.to_row());
        self.save(&rows)?;
        debug!(
            "appended {:?} to {} ({} data rows)",
            record.name,
            self.path.display(),
            rows.len() - 1
        );
        Ok(())
    }

    /// End time of the last data row, or `None` when only the header is present.
    pub fn last_end_time(&self) -> Result<Option<NaiveDateTime>> {
        let rows = self.rows()?;
        if rows.len() < 2 {
            return Ok(None);
        }
        let value = rows
            .last()
            .and_then(|row| row.get(END_COL))
            .cloned()
            .unwrap_or_default();
        NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
            .map(Some)
            .map_err(|source| Error::Timestamp {
                path: self.path.clone(),
                value,
                source,
            })
    }

    fn save(&self, rows: &[Vec<String>]) -> Result<()> {
        let write_err = |source| Error::WriteSheet {
            path: self.path.clone(),
            source,
        };
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET).map_err(write_err)?;
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, *width)
                .map_err(write_err)?;
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet
                    .write_string(r as u32, c as u16, value.as_str())
                    .map_err(write_err)?;
            }
        }
        workbook.save(&self.path).map_err(write_err)?;
        Ok(())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(day()), "tasks_2025-03-14.xlsx");
    }

    #[test]
    fn test_open_or_create_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        assert!(store.path().ends_with("tasks_2025-03-14.xlsx"));
        assert!(store.path().exists());
        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], HEADER.to_vec());
    }

    #[test]
    fn test_open_or_create_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = DayStore::open_or_create(&nested, day()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_open_or_create_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        store
            .append(&TaskRecord::new("a", at(9, 0, 0), at(9, 5, 0)))
            .unwrap();
        let reopened = DayStore::open_or_create(dir.path(), day()).unwrap();
        assert_eq!(reopened.rows().unwrap().len(), 2);
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        let names = ["first", "second", "third"];
        for (i, name) in names.iter().enumerate() {
            let start = at(9 + i as u32, 0, 0);
            store
                .append(&TaskRecord::new(*name, start, start + chrono::Duration::minutes(10)))
                .unwrap();
        }
        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), names.len() + 1);
        let logged: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(logged, names);
    }

    #[test]
    fn test_append_row_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        store
            .append(&TaskRecord::new("Write report", at(10, 0, 0), at(10, 16, 40)))
            .unwrap();
        let rows = store.rows().unwrap();
        assert_eq!(
            rows[1],
            vec![
                "Write report",
                "2025-03-14 10:00:00",
                "2025-03-14 10:16:40",
                "0:16:40"
            ]
        );
    }

    #[test]
    fn test_stored_timestamps_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        let (start, end) = (at(11, 22, 33), at(12, 0, 1));
        store.append(&TaskRecord::new("x", start, end)).unwrap();
        let row = &store.rows().unwrap()[1];
        let parsed_start = NaiveDateTime::parse_from_str(&row[1], TIMESTAMP_FORMAT).unwrap();
        let parsed_end = NaiveDateTime::parse_from_str(&row[2], TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed_start, start);
        assert_eq!(parsed_end, end);
        assert_eq!(row[3], "0:37:28");
    }

    #[test]
    fn test_last_end_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        assert_eq!(store.last_end_time().unwrap(), None);
        store
            .append(&TaskRecord::new("a", at(8, 0, 0), at(9, 0, 0)))
            .unwrap();
        assert_eq!(store.last_end_time().unwrap(), Some(at(9, 0, 0)));
        store
            .append(&TaskRecord::new("b", at(9, 0, 0), at(9, 45, 12)))
            .unwrap();
        assert_eq!(store.last_end_time().unwrap(), Some(at(9, 45, 12)));
    }

    #[test]
    fn test_last_end_time_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
        let bad = vec![
            "a".to_string(),
            "2025-03-14 08:00:00".to_string(),
            "yesterday-ish".to_string(),
            "?".to_string(),
        ];
        store.save(&[header, bad]).unwrap();
        let err = store.last_end_time().unwrap_err();
        assert!(matches!(err, Error::Timestamp { ref value, .. } if value == "yesterday-ish"));
    }

    #[test]
    fn test_rows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DayStore::open_or_create(dir.path(), day()).unwrap();
        fs::remove_file(store.path()).unwrap();
        assert!(matches!(store.rows(), Err(Error::ReadSheet { .. })));
    }
}
