use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FileSystemError {
    OpenFile,
    ReadFile,
    NotFile,
    BadGlob,
}

impl std::error::Error for FileSystemError {}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::OpenFile => write!(f, "Failed to open file"),
            FileSystemError::ReadFile => write!(f, "Failed to read file"),
            FileSystemError::NotFile => write!(f, "Not a file"),
            FileSystemError::BadGlob => write!(f, "Could not glob provided path"),
        }
    }
}
