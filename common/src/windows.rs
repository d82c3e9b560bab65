use serde::Serialize;
use std::fmt;

/// Size value stored when the on-disk size field is known to be broken
/// (543-byte `$I` files)
pub const BROKEN_SIZE: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinFormat {
    /// Single INFO2 index file (Windows 95 - XP/2003)
    Info2,
    /// `$Recycle.bin` directory of `$I` files (Vista and later)
    ModernDir,
}

impl BinFormat {
    /// Short label used by the XML `format` attribute and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            BinFormat::Info2 => "file",
            BinFormat::ModernDir => "dir",
        }
    }
}

/// Recycle bin version. The on-disk value is overloaded with two
/// run-level conditions, kept as explicit variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinVersion {
    Known(u64),
    /// Valid but empty bin, no version to report
    NotFound,
    /// Mixed `$I` versions in one directory. Terminal, nothing is emitted
    Inconsistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsGuess {
    Win95,
    Nt4,
    Win98,
    WinMe,
    Win2000,
    WinXp2003,
    /// INFO2 version 5 with unicode paths before the junk-fill scan ran
    Win2000Xp2003,
    Vista,
    Win10,
    Unknown,
}

impl fmt::Display for OsGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OsGuess::Win95 => "Windows 95",
            OsGuess::Nt4 => "Windows NT 4.0",
            OsGuess::Win98 => "Windows 98",
            OsGuess::WinMe => "Windows ME",
            OsGuess::Win2000 => "Windows 2000",
            OsGuess::WinXp2003 => "Windows XP or 2003",
            OsGuess::Win2000Xp2003 => "Windows 2000/XP/2003",
            OsGuess::Vista => "Windows Vista - 8.1",
            OsGuess::Win10 => "Windows 10 or above",
            OsGuess::Unknown => "Unknown",
        };
        write!(f, "{label}")
    }
}

/// Chronological index for INFO2 records, `$I` basename for modern ones.
/// Within one run the modern basename is unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecordIndex {
    Sequence(u32),
    Basename(String),
}

impl fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIndex::Sequence(value) => write!(f, "{value}"),
            RecordIndex::Basename(name) => write!(f, "{name}"),
        }
    }
}

/// Run-level metadata describing the decoded bin
#[derive(Debug, Clone, Serialize)]
pub struct RecycleMeta {
    pub format: BinFormat,
    pub source_path: String,
    pub version: BinVersion,
    /// 280 or 800, INFO2 only
    pub record_size: Option<u32>,
    pub os_guess: OsGuess,
    pub has_unicode_path: bool,
    /// True when the format keeps purged entries around (INFO2)
    pub keep_deleted_entry: bool,
    /// Uninitialized bytes found in record padding, an OS fingerprint
    pub fill_junk: bool,
    pub is_empty: bool,
}

/// One deleted item. Built completely by a decoder or discarded
#[derive(Debug, Clone, Serialize)]
pub struct RecycleRecord {
    pub version: u64,
    pub index: RecordIndex,
    /// Deletion time as unix epoch seconds, UTC
    pub deleted: i64,
    /// `BROKEN_SIZE` when the size field is unreadable
    pub size: u64,
    /// `A`-`Z`, `\` or `?`, INFO2 only
    pub drive_letter: Option<char>,
    /// Original payload removed from the bin. INFO2 only
    pub purged: bool,
    pub unicode_path: String,
    pub legacy_path: Option<String>,
}

impl RecycleRecord {
    /// Path shown in reports: the unicode path when the record carries
    /// one, otherwise the reconstructed legacy path
    pub fn preferred_path(&self) -> &str {
        if !self.unicode_path.is_empty() {
            return &self.unicode_path;
        }
        match &self.legacy_path {
            Some(path) => path.as_str(),
            None => "",
        }
    }
}

/// Everything one decoder run produced. `warnings` holds per-record and
/// per-file issues that did not stop the run
#[derive(Debug, Clone, Serialize)]
pub struct RecycleBinData {
    pub meta: RecycleMeta,
    pub records: Vec<RecycleRecord>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{BinFormat, OsGuess, RecordIndex, RecycleRecord};

    #[test]
    fn test_format_label() {
        assert_eq!(BinFormat::Info2.label(), "file");
        assert_eq!(BinFormat::ModernDir.label(), "dir");
    }

    #[test]
    fn test_os_guess_display() {
        assert_eq!(OsGuess::Vista.to_string(), "Windows Vista - 8.1");
        assert_eq!(OsGuess::WinXp2003.to_string(), "Windows XP or 2003");
    }

    #[test]
    fn test_record_index_display() {
        assert_eq!(RecordIndex::Sequence(7).to_string(), "7");
        assert_eq!(
            RecordIndex::Basename(String::from("$IWHBX3J")).to_string(),
            "$IWHBX3J"
        );
    }

    #[test]
    fn test_preferred_path() {
        let mut record = RecycleRecord {
            version: 5,
            index: RecordIndex::Sequence(1),
            deleted: 1631147228,
            size: 1024,
            drive_letter: Some('C'),
            purged: false,
            unicode_path: String::from("C:\\Users\\bob\\file.txt"),
            legacy_path: Some(String::from("C:\\Users\\bob\\file.txt")),
        };
        assert_eq!(record.preferred_path(), "C:\\Users\\bob\\file.txt");

        record.unicode_path = String::new();
        record.legacy_path = Some(String::from("C:\\DC1.txt"));
        assert_eq!(record.preferred_path(), "C:\\DC1.txt");

        record.legacy_path = None;
        assert_eq!(record.preferred_path(), "");
    }
}
