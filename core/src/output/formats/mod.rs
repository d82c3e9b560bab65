pub(crate) mod json;
pub(crate) mod tsv;
pub(crate) mod xml;

use crate::structs::options::RunOptions;
use common::windows::{RecycleMeta, RecycleRecord};
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FormatError {
    Xml,
}

impl std::error::Error for FormatError {}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Xml => write!(f, "Failed to assemble XML report"),
        }
    }
}

/// The three report formats share one shape: a header, one entry per
/// record, a footer. The concrete emitter is picked once at startup
pub(crate) trait BinEmitter {
    fn header(&mut self, meta: &RecycleMeta, options: &RunOptions) -> Result<(), FormatError>;
    fn record(
        &mut self,
        record: &RecycleRecord,
        meta: &RecycleMeta,
        options: &RunOptions,
    ) -> Result<(), FormatError>;
    fn footer(&mut self, meta: &RecycleMeta, options: &RunOptions) -> Result<(), FormatError>;
    fn finish(self: Box<Self>) -> Vec<u8>;
}
