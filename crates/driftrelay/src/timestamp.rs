use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Wall-clock layout the attachment timestamp passes through.
pub const TS_FORMAT: &str = "%H:%M:%S %m-%d-%Y";

/// Attachment `ts` for the current local time.
pub fn current() -> Result<f64> {
    round_trip(&Local, Local::now())
}

/// Formats `now` with [`TS_FORMAT`] and parses it back in zone `tz`.
///
/// Sub-second precision is dropped. An ambiguous local time (DST fold)
/// resolves to the earlier instant.
pub fn round_trip<Tz>(tz: &Tz, now: DateTime<Tz>) -> Result<f64>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rendered = now.format(TS_FORMAT).to_string();
    let naive = NaiveDateTime::parse_from_str(&rendered, TS_FORMAT)
        .with_context(|| format!("Parsing timestamp {rendered:?}"))?;
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Local time {rendered:?} does not exist"))?;
    Ok(local.timestamp() as f64)
}
