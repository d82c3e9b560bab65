use super::error::OutputError;
use crate::filesystem::files::get_filename;
use crate::utils::uuid::generate_uuid;
use log::{error, info};
use std::fs::{File, rename};
use std::io::{Write, stdout};
use std::path::Path;

/// Write the finished report to stdout, or to the target file through a
/// uniquely named sibling temp file renamed into place on success. A
/// temp file that could not be renamed is left behind and its path is
/// reported
pub(crate) fn final_output(report: &[u8], target: Option<&str>) -> Result<(), OutputError> {
    let destination = match target {
        Some(result) => result,
        None => {
            let mut out = stdout();
            let write_result = out.write_all(report).and_then(|_| out.flush());
            return match write_result {
                Ok(_) => Ok(()),
                Err(err) => {
                    error!("[output] Failed to write report to stdout: {err:?}");
                    Err(OutputError::WriteFailed)
                }
            };
        }
    };

    let parent = match Path::new(destination).parent() {
        Some(result) if !result.as_os_str().is_empty() => result.display().to_string(),
        _ => String::from("."),
    };
    let temp_path = format!(
        "{parent}/.{}.{}.tmp",
        get_filename(destination),
        generate_uuid()
    );

    let write_result = File::create(&temp_path).and_then(|mut temp| temp.write_all(report));
    match write_result {
        Ok(_) => {}
        Err(err) => {
            error!("[output] Failed to create temp output {temp_path}: {err:?}");
            return Err(OutputError::TempFile);
        }
    }

    match rename(&temp_path, destination) {
        Ok(_) => {
            info!("[output] Report written to {destination}");
            Ok(())
        }
        Err(err) => {
            error!(
                "[output] Failed to move report into place, partial output left at {temp_path}: {err:?}"
            );
            Err(OutputError::WriteFailed)
        }
    }
}
