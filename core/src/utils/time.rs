use chrono::{DateTime, Local, TimeZone, Utc};
use std::env;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Return time now in seconds or 0
pub(crate) fn time_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::new(0, 0))
        .as_secs()
}

/// Convert Windows filetime values to unixepoch. Sub-second precision
/// is discarded
pub(crate) fn filetime_to_unixepoch(filetime: &u64) -> i64 {
    let windows_nano = 10000000;
    let seconds_to_unix: i64 = 11644473600;

    // We should not overflow because of the division.
    (filetime / windows_nano) as i64 - seconds_to_unix
}

/// Deletion times before 1995 or in the future point at a mangled
/// FILETIME field
pub(crate) fn deletion_time_is_dubious(epoch: &i64) -> bool {
    let unix_1995: i64 = 788918400;
    let slack: i64 = 86400;
    *epoch < unix_1995 || *epoch > time_now() as i64 + slack
}

/// Render unixepoch seconds as `YYYY-MM-DD HH:MM:SS`, UTC or local
pub(crate) fn format_timestamp(epoch: &i64, localtime: bool) -> String {
    if localtime {
        match Local.timestamp_opt(*epoch, 0).single() {
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::from("???"),
        }
    } else {
        let value: DateTime<Utc> = match Utc.timestamp_opt(*epoch, 0).single() {
            Some(result) => result,
            None => return String::from("???"),
        };
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Render unixepoch seconds as ISO-8601 with a `T` separator: `Z` for
/// UTC, numeric offset for local time
pub(crate) fn format_iso(epoch: &i64, localtime: bool) -> String {
    if localtime {
        match Local.timestamp_opt(*epoch, 0).single() {
            Some(value) => value.format("%Y-%m-%dT%H:%M:%S%z").to_string(),
            None => String::from("???"),
        }
    } else {
        match Utc.timestamp_opt(*epoch, 0).single() {
            Some(value) => value.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            None => String::from("???"),
        }
    }
}

/// Active UTC offset as `±HHMM`. Computed from the current instant, not
/// the record time, so DST-straddling records keep the offset of "now"
pub(crate) fn tz_offset_label(localtime: bool) -> String {
    if !localtime {
        return String::from("+0000");
    }
    let seconds = Local::now().offset().local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

/// Human name for the active zone. Platform zone-name lookup belongs to
/// an outer surface, so this settles for the `TZ` environment variable
pub(crate) fn tz_name(localtime: bool) -> String {
    if !localtime {
        return String::from("UTC");
    }
    match env::var("TZ") {
        Ok(name) if !name.is_empty() => name,
        _ => String::from("local"),
    }
}
