pub mod artifacts;
pub mod output;
pub mod structs;

pub(crate) mod filesystem;
pub(crate) mod utils;

pub use utils::encoding::{filter_delimiter_escapes, resolve_codepage};
pub use utils::error::UtilsError;
pub use utils::logging::setup_logging;
