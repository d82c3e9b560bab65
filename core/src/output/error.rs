use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum OutputError {
    Format,
    TempFile,
    WriteFailed,
}

impl std::error::Error for OutputError {}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Format => write!(f, "Failed to format report"),
            OutputError::TempFile => write!(f, "Failed to create temporary output file"),
            OutputError::WriteFailed => write!(f, "Failed to write report"),
        }
    }
}
