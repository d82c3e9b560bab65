use super::error::RecycleBinError;
use crate::structs::options::RunOptions;
use crate::utils::encoding::decode_legacy_path;
use crate::utils::nom_helper::{
    Endian, nom_data, nom_unsigned_eight_bytes, nom_unsigned_four_bytes,
};
use crate::utils::strings::{extract_utf16_path, filter_nonprintable, utf16_len_to_terminator};
use crate::utils::time::{deletion_time_is_dubious, filetime_to_unixepoch};
use common::windows::{
    BinFormat, BinVersion, OsGuess, RecordIndex, RecycleBinData, RecycleMeta, RecycleRecord,
};
use log::{debug, error, warn};

pub(crate) const HEADER_SIZE: usize = 20;
const RECORD_SIZE_ANSI: u32 = 280;
const RECORD_SIZE_UNICODE: u32 = 800;
const ANSI_PATH_FIELD: usize = 260;
const UNICODE_PATH_FIELD: usize = 520;

const VERSION_WIN95: u32 = 0;
const VERSION_NT4: u32 = 2;
const VERSION_WIN98: u32 = 4;
const VERSION_ME_XP: u32 = 5;

/// First 20 bytes of every INFO2 file. Only version and record size
/// matter for decoding, the counters went stale after Windows 95
#[derive(Debug)]
pub(crate) struct Info2Header {
    pub(crate) version: u32,
    _kept_entries: u32,
    _total_entries: u32,
    pub(crate) record_size: u32,
    _size_sum: u32,
}

impl Info2Header {
    pub(crate) fn parse_header(data: &[u8]) -> nom::IResult<&[u8], Info2Header> {
        let (input, version) = nom_unsigned_four_bytes(data, Endian::Le)?;
        let (input, kept_entries) = nom_unsigned_four_bytes(input, Endian::Le)?;
        let (input, total_entries) = nom_unsigned_four_bytes(input, Endian::Le)?;
        let (input, record_size) = nom_unsigned_four_bytes(input, Endian::Le)?;
        let (input, size_sum) = nom_unsigned_four_bytes(input, Endian::Le)?;

        let header = Info2Header {
            version,
            _kept_entries: kept_entries,
            _total_entries: total_entries,
            record_size,
            _size_sum: size_sum,
        };
        Ok((input, header))
    }
}

struct RawRecord<'a> {
    legacy_field: &'a [u8],
    index: u32,
    drive: u32,
    filetime: u64,
    size: u32,
    unicode_field: Option<&'a [u8]>,
}

/// One raw record slice into its fields. The slice length was validated
/// by the caller
fn parse_record(data: &[u8], record_size: u32) -> nom::IResult<&[u8], RawRecord<'_>> {
    let (input, legacy_field) = nom_data(data, ANSI_PATH_FIELD as u64)?;
    let (input, index) = nom_unsigned_four_bytes(input, Endian::Le)?;
    let (input, drive) = nom_unsigned_four_bytes(input, Endian::Le)?;
    let (input, filetime) = nom_unsigned_eight_bytes(input, Endian::Le)?;
    let (input, size) = nom_unsigned_four_bytes(input, Endian::Le)?;

    let (input, unicode_field) = if record_size == RECORD_SIZE_UNICODE {
        let (input, field) = nom_data(input, UNICODE_PATH_FIELD as u64)?;
        (input, Some(field))
    } else {
        (input, None)
    };

    let record = RawRecord {
        legacy_field,
        index,
        drive,
        filetime,
        size,
        unicode_field,
    };
    Ok((input, record))
}

/// Drive number to drive letter. Anything past the table is `?`
fn drive_letter(number: &u32) -> char {
    match number {
        0..=25 => (b'A' + *number as u8) as char,
        26 => '\\',
        _ => '?',
    }
}

/// Exclusive end of the null-terminated text inside a path field
fn field_text_len(field: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < field.len() && field[end] != 0 {
        end += 1;
    }
    end
}

/// Decode a whole INFO2 file into records
pub(crate) fn parse_info2(
    data: &[u8],
    source: &str,
    options: &RunOptions,
) -> Result<RecycleBinData, RecycleBinError> {
    let header_result = Info2Header::parse_header(data);
    let (_, header) = match header_result {
        Ok(result) => result,
        Err(_err) => {
            error!("[recyclebin] {source} is too small for an INFO2 header");
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let mut os_guess = match (header.version, header.record_size) {
        (VERSION_WIN95, RECORD_SIZE_ANSI) => OsGuess::Win95,
        (VERSION_WIN98, RECORD_SIZE_ANSI) => OsGuess::Win98,
        (VERSION_ME_XP, RECORD_SIZE_ANSI) => OsGuess::WinMe,
        (VERSION_NT4, RECORD_SIZE_UNICODE) => OsGuess::Nt4,
        (VERSION_ME_XP, RECORD_SIZE_UNICODE) => OsGuess::Win2000Xp2003,
        (version, record_size) => {
            error!(
                "[recyclebin] {source} has impossible version {version} and record size {record_size}"
            );
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let has_unicode_path = header.record_size == RECORD_SIZE_UNICODE;
    if !has_unicode_path && options.legacy_encoding.is_none() {
        error!("[recyclebin] {source} stores paths only in a legacy code page");
        return Err(RecycleBinError::MissingCodepage);
    }

    let style = options.escape_style();
    let mut records: Vec<RecycleRecord> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut fill_junk = false;

    for chunk in data[HEADER_SIZE..].chunks(header.record_size as usize) {
        if chunk.len() < header.record_size as usize {
            warn!(
                "[recyclebin] {source} ends mid-record, discarding {} trailing bytes",
                chunk.len()
            );
            warnings.push(format!(
                "Premature end of file, trailing record of {} bytes discarded",
                chunk.len()
            ));
            break;
        }

        let raw = match parse_record(chunk, header.record_size) {
            Ok((_, result)) => result,
            Err(_err) => {
                warnings.push(String::from("Could not slice record fields"));
                continue;
            }
        };

        let purged = raw.legacy_field[0] == 0;
        let letter = drive_letter(&raw.drive);
        if raw.drive >= 27 {
            warn!(
                "[recyclebin] Record {} has dubious drive number {}",
                raw.index, raw.drive
            );
            warnings.push(format!(
                "Record {} has dubious drive number {}",
                raw.index, raw.drive
            ));
        }

        let legacy_path = match options.legacy_encoding {
            Some(encoding) => {
                let start = if purged { 1 } else { 0 };
                let text = &raw.legacy_field[start..field_text_len(raw.legacy_field, start)];
                let (decoded, bad_offsets) = decode_legacy_path(text, encoding, style);
                if !bad_offsets.is_empty() {
                    warnings.push(format!(
                        "Record {}: legacy path not fully convertible from {}",
                        raw.index,
                        encoding.name()
                    ));
                    debug!(
                        "[recyclebin] Record {} illegal bytes at offsets {bad_offsets:?}",
                        raw.index
                    );
                }
                let mut path = filter_nonprintable(&decoded, style);
                if purged {
                    path.insert(0, letter);
                }
                Some(path)
            }
            None => None,
        };

        let unicode_path = match raw.unicode_field {
            Some(field) => {
                let used = utf16_len_to_terminator(field, UNICODE_PATH_FIELD);
                let (decoded, bad_offsets) = extract_utf16_path(&field[..used], style);
                if !bad_offsets.is_empty() {
                    warnings.push(format!(
                        "Record {}: unicode path contains invalid UTF-16",
                        raw.index
                    ));
                    debug!(
                        "[recyclebin] Record {} illegal units at offsets {bad_offsets:?}",
                        raw.index
                    );
                }
                // Bytes past the terminator should be zero. Leftover
                // junk is uninitialized memory, a Windows 2000 trait
                let tail_start = std::cmp::min(used + 2, field.len());
                if field[tail_start..].iter().any(|value| *value != 0) {
                    fill_junk = true;
                }
                filter_nonprintable(&decoded, style)
            }
            None => String::new(),
        };

        let deleted = filetime_to_unixepoch(&raw.filetime);
        if deletion_time_is_dubious(&deleted) {
            warnings.push(format!("Record {} has dubious deletion time", raw.index));
        }

        let record = RecycleRecord {
            version: header.version as u64,
            index: RecordIndex::Sequence(raw.index),
            deleted,
            size: raw.size as u64,
            drive_letter: Some(letter),
            purged,
            unicode_path,
            legacy_path,
        };
        debug!(
            "[recyclebin] {}",
            serde_json::to_string(&record).unwrap_or_default()
        );
        records.push(record);
    }

    if os_guess == OsGuess::Win2000Xp2003 {
        os_guess = if fill_junk {
            OsGuess::Win2000
        } else {
            OsGuess::WinXp2003
        };
    }

    let meta = RecycleMeta {
        format: BinFormat::Info2,
        source_path: source.to_string(),
        version: BinVersion::Known(header.version as u64),
        record_size: Some(header.record_size),
        os_guess,
        has_unicode_path,
        keep_deleted_entry: true,
        fill_junk,
        is_empty: records.is_empty(),
    };

    Ok(RecycleBinData {
        meta,
        records,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::{Info2Header, drive_letter, parse_info2};
    use crate::artifacts::recyclebin::error::RecycleBinError;
    use crate::structs::options::RunOptions;
    use crate::utils::encoding::resolve_codepage;
    use common::windows::{BinVersion, OsGuess, RecordIndex};

    const TEST_FILETIME: u64 = 132756208280000000;

    fn build_header(version: u32, record_size: u32, total: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&version.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&total.to_le_bytes());
        data.extend_from_slice(&record_size.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data
    }

    fn build_record(
        path: &str,
        purged: bool,
        index: u32,
        drive: u32,
        size: u32,
        unicode: Option<&str>,
        junk: bool,
    ) -> Vec<u8> {
        let mut field = [0u8; 260];
        for (position, value) in path.as_bytes().iter().enumerate() {
            field[position] = *value;
        }
        if purged {
            field[0] = 0;
        }

        let mut data = Vec::new();
        data.extend_from_slice(&field);
        data.extend_from_slice(&index.to_le_bytes());
        data.extend_from_slice(&drive.to_le_bytes());
        data.extend_from_slice(&TEST_FILETIME.to_le_bytes());
        data.extend_from_slice(&size.to_le_bytes());

        if let Some(wide) = unicode {
            let mut field = [0u8; 520];
            let mut position = 0;
            for unit in wide.encode_utf16() {
                field[position..position + 2].copy_from_slice(&unit.to_le_bytes());
                position += 2;
            }
            if junk {
                field[519] = 0xcc;
            }
            data.extend_from_slice(&field);
        }
        data
    }

    fn ansi_options() -> RunOptions {
        RunOptions {
            legacy_encoding: Some(resolve_codepage("CP1252").unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_header() {
        let data = build_header(5, 800, 3);
        let (_, header) = Info2Header::parse_header(&data).unwrap();
        assert_eq!(header.version, 5);
        assert_eq!(header.record_size, 800);
        assert_eq!(header._total_entries, 3);
    }

    #[test]
    fn test_drive_letter() {
        assert_eq!(drive_letter(&0), 'A');
        assert_eq!(drive_letter(&2), 'C');
        assert_eq!(drive_letter(&25), 'Z');
        assert_eq!(drive_letter(&26), '\\');
        assert_eq!(drive_letter(&27), '?');
        assert_eq!(drive_letter(&4096), '?');
    }

    #[test]
    fn test_parse_info2_ansi() {
        let mut data = build_header(5, 280, 1);
        data.extend(build_record("C:\\DC1.txt", false, 1, 2, 1024, None, false));

        let results = parse_info2(&data, "INFO2", &ansi_options()).unwrap();
        assert_eq!(results.meta.version, BinVersion::Known(5));
        assert_eq!(results.meta.os_guess, OsGuess::WinMe);
        assert_eq!(results.meta.record_size, Some(280));
        assert!(!results.meta.has_unicode_path);
        assert!(results.meta.keep_deleted_entry);
        assert!(results.warnings.is_empty());

        assert_eq!(results.records.len(), 1);
        let record = &results.records[0];
        assert_eq!(record.index, RecordIndex::Sequence(1));
        assert_eq!(record.deleted, 1631147228);
        assert_eq!(record.size, 1024);
        assert_eq!(record.drive_letter, Some('C'));
        assert!(!record.purged);
        assert_eq!(record.legacy_path.as_deref(), Some("C:\\DC1.txt"));
        assert!(record.unicode_path.is_empty());
    }

    #[test]
    fn test_parse_info2_ansi_needs_codepage() {
        let data = build_header(5, 280, 0);
        assert_eq!(
            parse_info2(&data, "INFO2", &RunOptions::default()).unwrap_err(),
            RecycleBinError::MissingCodepage
        );
    }

    #[test]
    fn test_parse_info2_unicode() {
        let mut data = build_header(5, 800, 2);
        data.extend(build_record(
            "C:\\Users\\alice\\recipe.docx",
            false,
            1,
            2,
            2048,
            Some("C:\\Users\\alice\\recipe.docx"),
            false,
        ));
        data.extend(build_record(
            "C:\\gone.txt",
            true,
            2,
            2,
            512,
            Some("C:\\gone.txt"),
            false,
        ));

        let results = parse_info2(&data, "INFO2", &ansi_options()).unwrap();
        assert_eq!(results.meta.os_guess, OsGuess::WinXp2003);
        assert!(results.meta.has_unicode_path);
        assert!(!results.meta.fill_junk);
        assert_eq!(results.records.len(), 2);

        let gone = &results.records[1];
        assert!(gone.purged);
        assert_eq!(gone.drive_letter, Some('C'));
        assert_eq!(gone.legacy_path.as_deref(), Some("C:\\gone.txt"));
        assert_eq!(gone.unicode_path, "C:\\gone.txt");
    }

    #[test]
    fn test_parse_info2_junk_fill() {
        let mut data = build_header(5, 800, 1);
        data.extend(build_record(
            "C:\\old.txt",
            false,
            1,
            2,
            64,
            Some("C:\\old.txt"),
            true,
        ));

        let results = parse_info2(&data, "INFO2", &ansi_options()).unwrap();
        assert!(results.meta.fill_junk);
        assert_eq!(results.meta.os_guess, OsGuess::Win2000);
    }

    #[test]
    fn test_parse_info2_nt4() {
        let mut data = build_header(2, 800, 1);
        data.extend(build_record(
            "D:\\report.doc",
            false,
            1,
            3,
            128,
            Some("D:\\report.doc"),
            false,
        ));

        let results = parse_info2(&data, "INFO2", &RunOptions::default()).unwrap();
        assert_eq!(results.meta.os_guess, OsGuess::Nt4);
        assert_eq!(results.records[0].drive_letter, Some('D'));
        assert!(results.records[0].legacy_path.is_none());
    }

    #[test]
    fn test_parse_info2_dubious_drive() {
        let mut data = build_header(5, 280, 1);
        data.extend(build_record("C:\\DC1.txt", false, 1, 100, 16, None, false));

        let results = parse_info2(&data, "INFO2", &ansi_options()).unwrap();
        assert_eq!(results.records[0].drive_letter, Some('?'));
        assert_eq!(results.warnings.len(), 1);
    }

    #[test]
    fn test_parse_info2_truncated() {
        let mut data = build_header(5, 280, 2);
        data.extend(build_record("C:\\DC1.txt", false, 1, 2, 16, None, false));
        data.extend_from_slice(&[0u8; 100]);

        let results = parse_info2(&data, "INFO2", &ansi_options()).unwrap();
        assert_eq!(results.records.len(), 1);
        assert_eq!(results.warnings.len(), 1);
        assert!(results.warnings[0].contains("100 bytes"));
    }

    #[test]
    fn test_parse_info2_bad_combination() {
        let data = build_header(2, 280, 0);
        assert_eq!(
            parse_info2(&data, "INFO2", &ansi_options()).unwrap_err(),
            RecycleBinError::BrokenFile
        );

        let data = build_header(9, 800, 0);
        assert_eq!(
            parse_info2(&data, "INFO2", &ansi_options()).unwrap_err(),
            RecycleBinError::BrokenFile
        );
    }

    #[test]
    fn test_parse_info2_short_header() {
        let data = [5, 0, 0];
        assert_eq!(
            parse_info2(&data, "INFO2", &ansi_options()).unwrap_err(),
            RecycleBinError::BrokenFile
        );
    }
}
