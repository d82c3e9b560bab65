use super::error::FileSystemError;
use log::error;
use std::{fs::read, path::Path};

/// Check if path is a file
pub(crate) fn is_file(path: &str) -> bool {
    let file = Path::new(path);
    if file.is_file() {
        return true;
    }
    false
}

/// Read a whole index file into memory. Recycle bin metadata is tiny,
/// still cap reads at 16MB in case something else was handed to us
pub(crate) fn read_file(path: &str) -> Result<Vec<u8>, FileSystemError> {
    if !is_file(path) {
        return Err(FileSystemError::NotFile);
    }

    let max_size = 16777216;
    if get_file_size(path) > max_size {
        error!("[binsift] File {path} is too large for an index file");
        return Err(FileSystemError::ReadFile);
    }

    let read_result = read(path);
    match read_result {
        Ok(result) => Ok(result),
        Err(err) => {
            error!("[binsift] Failed to read file {path}: {err:?}");
            Err(FileSystemError::ReadFile)
        }
    }
}

/// Get size of file at provided path
pub(crate) fn get_file_size(path: &str) -> u64 {
    let metadata_result = Path::new(path).metadata();
    match metadata_result {
        Ok(result) => result.len(),
        Err(err) => {
            error!("[binsift] Failed to get file size for {path}: {err:?}");
            0
        }
    }
}

/// Get the filename component from a path
pub(crate) fn get_filename(path: &str) -> String {
    let entry = Path::new(path).file_name();
    match entry {
        Some(result) => result.to_str().unwrap_or_default().to_string(),
        None => path.to_string(),
    }
}
