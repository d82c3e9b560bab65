use crate::utils::encoding::EscapeStyle;
use encoding_rs::Encoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Xml,
    Json,
}

/// Run-wide configuration threaded through decoders and emitters, so
/// nothing reaches for process globals
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    /// Text-format field delimiter, escape sequences already resolved
    pub delimiter: String,
    /// Render times in the host local zone instead of UTC
    pub localtime: bool,
    /// Suppress the text-format preamble
    pub no_heading: bool,
    /// Write to this path (atomically) instead of stdout
    pub output_file: Option<String>,
    /// Code page for INFO2 8-bit path fields
    pub legacy_encoding: Option<&'static Encoding>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            format: OutputFormat::Text,
            delimiter: String::from("\t"),
            localtime: false,
            no_heading: false,
            output_file: None,
            legacy_encoding: None,
        }
    }
}

impl RunOptions {
    /// Escape template set matching the output format
    pub(crate) fn escape_style(&self) -> EscapeStyle {
        match self.format {
            OutputFormat::Text => EscapeStyle::Tsv,
            OutputFormat::Xml => EscapeStyle::Xml,
            OutputFormat::Json => EscapeStyle::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, RunOptions};
    use crate::utils::encoding::EscapeStyle;

    #[test]
    fn test_default_options() {
        let options = RunOptions::default();
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(options.delimiter, "\t");
        assert!(!options.localtime);
        assert!(options.legacy_encoding.is_none());
    }

    #[test]
    fn test_escape_style() {
        let mut options = RunOptions::default();
        assert_eq!(options.escape_style(), EscapeStyle::Tsv);
        options.format = OutputFormat::Json;
        assert_eq!(options.escape_style(), EscapeStyle::Json);
    }
}
