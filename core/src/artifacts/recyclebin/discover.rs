use super::error::RecycleBinError;
use crate::filesystem::directory::is_directory;
use crate::filesystem::files::{is_file, read_file};
use crate::filesystem::metadata::glob_paths;
use crate::utils::nom_helper::{Endian, nom_unsigned_two_bytes};
use crate::utils::strings::extract_utf16_lossy;
use log::{debug, error};

/// Class ID that marks a directory as a Recycle Bin in `desktop.ini`
const RECYCLE_CLSID: &str = "645FF040-5081-101B-9F08-00AA002F954E";

/// Validate an INFO2 argument. The path must be a regular file
pub(crate) fn discover_info2(path: &str) -> Result<Vec<String>, RecycleBinError> {
    if !is_file(path) {
        error!("[recyclebin] {path} does not exist or is not a regular file");
        return Err(RecycleBinError::OpenFile);
    }
    Ok(vec![path.to_string()])
}

/// Yield the `$I` files under a `$Recycle.bin` argument. A regular file
/// is accepted as a single index file for one-off inspection. An empty
/// directory is a valid bin only if `desktop.ini` carries the Recycle
/// Bin class ID
pub(crate) fn discover_modern(path: &str) -> Result<Vec<String>, RecycleBinError> {
    if is_file(path) {
        return Ok(vec![path.to_string()]);
    }
    if !is_directory(path) {
        error!("[recyclebin] {path} does not exist or is not a directory");
        return Err(RecycleBinError::OpenFile);
    }

    let base = path.trim_end_matches(['/', '\\']);
    let mut found: Vec<String> = Vec::new();
    for pattern in [format!("{base}/$I??????.*"), format!("{base}/$I??????")] {
        let glob_result = glob_paths(&pattern);
        let entries = match glob_result {
            Ok(result) => result,
            Err(err) => {
                error!("[recyclebin] Could not scan {path} for index files: {err:?}");
                return Err(RecycleBinError::OpenFile);
            }
        };
        for entry in entries {
            if entry.is_file {
                found.push(entry.full_path);
            }
        }
    }
    found.sort();
    found.dedup();

    if !found.is_empty() {
        debug!("[recyclebin] Found {} index files in {path}", found.len());
        return Ok(found);
    }

    if is_empty_bin(base) {
        return Ok(Vec::new());
    }
    error!("[recyclebin] No index files and no recycle bin marker in {path}");
    Err(RecycleBinError::NotRecycleBin)
}

/// An emptied bin keeps a `desktop.ini` naming the Recycle Bin class.
/// The file may be UTF-8 or UTF-16LE on disk
fn is_empty_bin(base: &str) -> bool {
    let ini_path = format!("{base}/desktop.ini");
    let data = match read_file(&ini_path) {
        Ok(result) => result,
        Err(_err) => return false,
    };

    let contents = match nom_unsigned_two_bytes(&data, Endian::Be) {
        Ok((rest, bom)) if bom == 0xfffe || bom == 0xfeff => extract_utf16_lossy(rest),
        _ => String::from_utf8_lossy(&data).to_string(),
    };
    contents.contains(RECYCLE_CLSID)
}

#[cfg(test)]
mod tests {
    use super::{discover_info2, discover_modern};
    use crate::artifacts::recyclebin::error::RecycleBinError;
    use std::path::PathBuf;

    fn test_data(dir: &str) -> String {
        let mut test_location = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        test_location.push("tests/test_data/windows/recyclebin");
        test_location.push(dir);
        test_location.display().to_string()
    }

    #[test]
    fn test_discover_info2() {
        let path = format!("{}/INFO2", test_data("info2_xp"));
        let results = discover_info2(&path).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_discover_info2_missing() {
        assert_eq!(
            discover_info2("missing file").unwrap_err(),
            RecycleBinError::OpenFile
        );
    }

    #[test]
    fn test_discover_modern_directory() {
        let results = discover_modern(&test_data("win10")).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0] < results[1]);
    }

    #[test]
    fn test_discover_modern_single_file() {
        let path = format!("{}/$I6XYJDV.xlsx", test_data("win10"));
        let results = discover_modern(&path).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_discover_modern_empty_bin() {
        let results = discover_modern(&test_data("empty_bin")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_discover_modern_not_a_bin() {
        assert_eq!(
            discover_modern(&test_data("not_a_bin")).unwrap_err(),
            RecycleBinError::NotRecycleBin
        );
    }
}
