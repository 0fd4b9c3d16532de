//! Last-sync timestamps.
//!
//! Panels show when their data was last refreshed as
//! `dd/mm/yyyy - HH:MM:SS` in local time, every field zero-padded.

use chrono::{DateTime, Local, TimeZone};

const SYNC_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

/// Format a point in time as a sync stamp.
pub fn format_sync_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(SYNC_FORMAT).to_string()
}

/// Sync stamp for the current local time.
pub fn sync_stamp_now() -> String {
    format_sync_stamp(&Local::now())
}

/// Full label shown under a panel.
pub fn last_sync_label(stamp: &str) -> String {
    format!("Last sync: {stamp}")
}
