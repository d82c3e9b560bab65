use super::error::FileSystemError;
use super::files::is_file;
use log::error;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct GlobInfo {
    pub(crate) full_path: String,
    pub(crate) filename: String,
    pub(crate) is_file: bool,
}

/// Execute a provided glob pattern (Ex: /files/$I*) and return results
pub(crate) fn glob_paths(glob_pattern: &str) -> Result<Vec<GlobInfo>, FileSystemError> {
    let mut info = Vec::new();
    let glob_results = glob::glob(glob_pattern);
    let paths = match glob_results {
        Ok(result) => result,
        Err(err) => {
            error!("[binsift] Could not glob {glob_pattern}: {err:?}");
            return Err(FileSystemError::BadGlob);
        }
    };

    for entry_result in paths {
        let entry = match entry_result {
            Ok(result) => result,
            Err(err) => {
                error!("[binsift] Failed to get glob entry: {err:?}");
                continue;
            }
        };
        let full_path = entry.display().to_string();
        info.push(GlobInfo {
            filename: entry
                .file_name()
                .unwrap_or_default()
                .to_str()
                .unwrap_or_default()
                .to_string(),
            is_file: is_file(&full_path),
            full_path,
        });
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::glob_paths;
    use std::path::PathBuf;

    #[test]
    fn test_glob_paths() {
        let mut test_location = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        test_location.push("tests/test_data/windows/recyclebin/win10");

        let pattern = format!("{}/$I??????.*", test_location.display());
        let results = glob_paths(&pattern).unwrap();
        assert!(!results.is_empty());
        assert!(results[0].filename.starts_with("$I"));
        assert!(results[0].is_file);
    }
}
