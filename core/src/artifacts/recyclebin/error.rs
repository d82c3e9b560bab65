use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum RecycleBinError {
    OpenFile,
    ReadFile,
    NotRecycleBin,
    MissingCodepage,
    BrokenFile,
    InconsistentVersion,
}

impl std::error::Error for RecycleBinError {}

impl fmt::Display for RecycleBinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecycleBinError::OpenFile => write!(f, "Cannot open or find the provided input"),
            RecycleBinError::ReadFile => write!(f, "Failed to read recycle bin data"),
            RecycleBinError::NotRecycleBin => {
                write!(f, "Provided directory is not a recycle bin")
            }
            RecycleBinError::MissingCodepage => write!(
                f,
                "This index variant stores paths in a legacy code page, supply one with -l (Ex: -l CP1252)"
            ),
            RecycleBinError::BrokenFile => write!(f, "Unrecoverable index file format"),
            RecycleBinError::InconsistentVersion => {
                write!(f, "Index files report inconsistent format versions")
            }
        }
    }
}
