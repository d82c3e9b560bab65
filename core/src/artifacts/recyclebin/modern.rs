use super::error::RecycleBinError;
use crate::structs::options::RunOptions;
use crate::utils::nom_helper::{
    Endian, nom_data, nom_unsigned_eight_bytes, nom_unsigned_four_bytes,
};
use crate::utils::strings::{extract_utf16_path, filter_nonprintable, utf16_len_to_terminator};
use crate::utils::time::{deletion_time_is_dubious, filetime_to_unixepoch};
use common::windows::{BROKEN_SIZE, RecordIndex, RecycleRecord};
use log::{debug, error, warn};

const VERSION_VISTA: u64 = 1;
const VERSION_WIN10: u64 = 2;

/// Fixed-size version 1 layout: 24 byte header plus a 520 byte path field
const V1_SIZE: usize = 544;
/// A known corruption drops one byte out of the size field
const V1_SIZE_ERRONEOUS: usize = 543;
const FIXED_PATH_FIELD: usize = 520;
/// Version 2 header including the path length field
const V2_HEADER_SIZE: usize = 28;

/// Parse one self-contained `$I` index file. Returns the record and any
/// non-fatal warnings attributed to it
pub(crate) fn parse_index_file(
    data: &[u8],
    basename: &str,
    options: &RunOptions,
) -> Result<(RecycleRecord, Vec<String>), RecycleBinError> {
    let version_result = nom_unsigned_eight_bytes(data, Endian::Le);
    let (input, version) = match version_result {
        Ok(result) => result,
        Err(_err) => {
            error!("[recyclebin] {basename} is too small for an index header");
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let mut warnings: Vec<String> = Vec::new();
    let (size, filetime, path_field) = match version {
        VERSION_VISTA => parse_fixed_layout(input, data.len(), basename, &mut warnings)?,
        VERSION_WIN10 => parse_sized_layout(input, data.len(), basename)?,
        _ => {
            error!("[recyclebin] {basename} reports unknown index version {version}");
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let style = options.escape_style();
    let used = utf16_len_to_terminator(path_field, path_field.len());
    let (decoded, bad_offsets) = extract_utf16_path(&path_field[..used], style);
    if !bad_offsets.is_empty() {
        warnings.push(format!("{basename}: path contains invalid UTF-16"));
        debug!("[recyclebin] {basename} illegal units at offsets {bad_offsets:?}");
    }
    let unicode_path = filter_nonprintable(&decoded, style);

    let deleted = filetime_to_unixepoch(&filetime);
    if deletion_time_is_dubious(&deleted) {
        warnings.push(format!("{basename} has dubious deletion time"));
    }

    let record = RecycleRecord {
        version,
        index: RecordIndex::Basename(basename.to_string()),
        deleted,
        size,
        drive_letter: None,
        purged: false,
        unicode_path,
        legacy_path: None,
    };
    debug!(
        "[recyclebin] {}",
        serde_json::to_string(&record).unwrap_or_default()
    );
    Ok((record, warnings))
}

/// Version 1 body: size and deletion time, then a fixed path field. The
/// 543 byte variant lost one byte of its size field, shifting the rest
/// of the record; the stored size is unusable there
fn parse_fixed_layout<'a>(
    input: &'a [u8],
    total_size: usize,
    basename: &str,
    warnings: &mut Vec<String>,
) -> Result<(u64, u64, &'a [u8]), RecycleBinError> {
    let erroneous = match total_size {
        V1_SIZE => false,
        V1_SIZE_ERRONEOUS => true,
        _ => {
            error!(
                "[recyclebin] {basename} should be {V1_SIZE} bytes for version 1, got {total_size}"
            );
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let layout = if erroneous {
        warn!("[recyclebin] {basename} is one byte short, size field unreadable");
        warnings.push(format!(
            "{basename} is a truncated variant, file size reported as unknown"
        ));
        let (input, _size_fragment) =
            nom_data(input, 7).map_err(|_err| RecycleBinError::BrokenFile)?;
        let (input, filetime) = nom_unsigned_eight_bytes(input, Endian::Le)
            .map_err(|_err| RecycleBinError::BrokenFile)?;
        (BROKEN_SIZE, filetime, input)
    } else {
        let (input, size) = nom_unsigned_eight_bytes(input, Endian::Le)
            .map_err(|_err| RecycleBinError::BrokenFile)?;
        let (input, filetime) = nom_unsigned_eight_bytes(input, Endian::Le)
            .map_err(|_err| RecycleBinError::BrokenFile)?;
        (size, filetime, input)
    };

    let (size, filetime, path_field) = layout;
    if path_field.len() != FIXED_PATH_FIELD {
        error!("[recyclebin] {basename} has a malformed path field");
        return Err(RecycleBinError::BrokenFile);
    }
    Ok((size, filetime, path_field))
}

/// Version 2 body: size, deletion time, then a length-prefixed path
fn parse_sized_layout<'a>(
    input: &'a [u8],
    total_size: usize,
    basename: &str,
) -> Result<(u64, u64, &'a [u8]), RecycleBinError> {
    let parse = |input: &'a [u8]| -> nom::IResult<&'a [u8], (u64, u64, u32)> {
        let (input, size) = nom_unsigned_eight_bytes(input, Endian::Le)?;
        let (input, filetime) = nom_unsigned_eight_bytes(input, Endian::Le)?;
        let (input, path_units) = nom_unsigned_four_bytes(input, Endian::Le)?;
        Ok((input, (size, filetime, path_units)))
    };

    let (path_data, (size, filetime, path_units)) = match parse(input) {
        Ok(result) => result,
        Err(_err) => {
            error!("[recyclebin] {basename} is too small for a version 2 header");
            return Err(RecycleBinError::BrokenFile);
        }
    };

    let expected = V2_HEADER_SIZE + 2 * path_units as usize;
    if total_size != expected {
        error!(
            "[recyclebin] {basename} should be {expected} bytes for a {path_units} unit path, got {total_size}"
        );
        return Err(RecycleBinError::BrokenFile);
    }
    Ok((size, filetime, path_data))
}
