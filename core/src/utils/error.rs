use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum UtilsError {
    UnknownCodepage,
    AsciiIncompatible,
}

impl std::error::Error for UtilsError {}

impl fmt::Display for UtilsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilsError::UnknownCodepage => write!(f, "Unknown or unsupported code page"),
            UtilsError::AsciiIncompatible => {
                write!(f, "Code page cannot represent ASCII drive letters and separators")
            }
        }
    }
}
