/**
 * Windows keeps metadata about "deleted" files next to the trashed
 * payload: a single `INFO2` index on Windows 95 - XP/2003, one `$I`
 * file per item under `$Recycle.bin` from Vista on. These decoders
 * normalize both generations into one record model.
 *
 * References:
 * `https://github.com/libyal/dtformats/blob/main/documentation/Windows%20Recycle.Bin%20file%20formats.asciidoc`
 */
pub(crate) mod discover;
pub mod error;
pub(crate) mod info2;
pub(crate) mod modern;

use crate::filesystem::files::{get_filename, read_file};
use crate::structs::options::RunOptions;
use common::windows::{
    BinFormat, BinVersion, OsGuess, RecycleBinData, RecycleMeta, RecycleRecord,
};
use error::RecycleBinError;
use log::{error, warn};
use std::collections::BTreeSet;

/// Decode a legacy INFO2 index file
pub fn grab_info2(path: &str, options: &RunOptions) -> Result<RecycleBinData, RecycleBinError> {
    let files = discover::discover_info2(path)?;
    let target = &files[0];

    let data = read_file(target).map_err(|_err| RecycleBinError::ReadFile)?;
    info2::parse_info2(&data, path, options)
}

/// Decode a `$Recycle.bin` directory or a single `$I` file. All index
/// files must agree on the format version
pub fn grab_modern(path: &str, options: &RunOptions) -> Result<RecycleBinData, RecycleBinError> {
    let files = discover::discover_modern(path)?;

    let mut records: Vec<RecycleRecord> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut versions: BTreeSet<u64> = BTreeSet::new();
    for entry in &files {
        let basename = get_filename(entry);
        let data = match read_file(entry) {
            Ok(result) => result,
            Err(err) => {
                warn!("[recyclebin] Could not read {entry}: {err:?}");
                warnings.push(format!("{basename}: unreadable, skipped"));
                continue;
            }
        };

        match modern::parse_index_file(&data, &basename, options) {
            Ok((record, record_warnings)) => {
                versions.insert(record.version);
                warnings.extend(record_warnings);
                records.push(record);
            }
            Err(err) => {
                warn!("[recyclebin] Could not parse {entry}: {err:?}");
                warnings.push(format!("{basename}: {err}"));
            }
        }
    }

    if !files.is_empty() && records.is_empty() {
        error!("[recyclebin] No index file in {path} could be decoded");
        return Err(RecycleBinError::BrokenFile);
    }

    let (version, os_guess) = match (versions.len(), versions.first().copied()) {
        (0, _) => (BinVersion::NotFound, OsGuess::Unknown),
        (1, Some(1)) => (BinVersion::Known(1), OsGuess::Vista),
        (1, Some(2)) => (BinVersion::Known(2), OsGuess::Win10),
        (1, Some(other)) => (BinVersion::Known(other), OsGuess::Unknown),
        _ => {
            error!(
                "[recyclebin] {path} mixes index versions {versions:?}, refusing to emit records"
            );
            return Err(RecycleBinError::InconsistentVersion);
        }
    };

    let meta = RecycleMeta {
        format: BinFormat::ModernDir,
        source_path: path.to_string(),
        version,
        record_size: None,
        os_guess,
        has_unicode_path: true,
        keep_deleted_entry: false,
        fill_junk: false,
        is_empty: records.is_empty(),
    };

    Ok(RecycleBinData {
        meta,
        records,
        warnings,
    })
}
