/**
 * Path fields in recycle bin records are untrusted bytes: an 8-bit
 * legacy code page (INFO2) or UTF-16LE (everything else). Conversion
 * never fails the record. Illegal input is replaced unit-by-unit with
 * an escape template and the byte offsets of the damage are handed back
 * for debug output.
 */
use crate::utils::error::UtilsError;
use encoding_rs::{DecoderResult, Encoding};
use log::error;

/// Which escape template set a converted path is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStyle {
    Tsv,
    Xml,
    Json,
}

/// Template for one illegal byte
pub(crate) fn escape_byte(_style: EscapeStyle, value: u8) -> String {
    format!("<\\{value:02X}>")
}

/// Template for one illegal or non-printable UTF-16 code unit. JSON gets
/// an asterisk-prefixed form so the sequence survives the JSON string
/// escape pass, which rewrites it to a real `\u` escape
pub(crate) fn escape_unit(style: EscapeStyle, value: u16) -> String {
    match style {
        EscapeStyle::Tsv | EscapeStyle::Xml => format!("<\\u{value:04X}>"),
        EscapeStyle::Json => format!("*u{value:04X}"),
    }
}

/// Decode a legacy code page path field. Malformed byte sequences become
/// one template per byte. Returns the string and the offsets of every
/// replaced byte
pub(crate) fn decode_legacy_path(
    data: &[u8],
    encoding: &'static Encoding,
    style: EscapeStyle,
) -> (String, Vec<usize>) {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut output = String::new();
    let mut bad_offsets: Vec<usize> = Vec::new();
    let mut pos = 0;

    output.reserve(data.len() * 3 + 4);
    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&data[pos..], &mut output, true);
        pos += read;
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => {
                // Short output buffer. Grow and resume where we stopped
                output.reserve(data.len().saturating_sub(pos) * 3 + 4);
            }
            DecoderResult::Malformed(bad_length, pushed) => {
                let start = pos
                    .saturating_sub(pushed as usize)
                    .saturating_sub(bad_length as usize);
                for offset in start..start + bad_length as usize {
                    bad_offsets.push(offset);
                    output.push_str(&escape_byte(style, data[offset]));
                }
            }
        }
    }

    (output, bad_offsets)
}

/// Resolve a user-supplied code page name (`CP932`, `932`, or a WHATWG
/// label like `windows-1252`) to an encoding. Rejects anything that
/// cannot round-trip the ASCII subset needed for drive letters and path
/// separators
pub fn resolve_codepage(name: &str) -> Result<&'static Encoding, UtilsError> {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();
    let number = lower.strip_prefix("cp").unwrap_or(lower.as_str());

    let lookup = if let Ok(page) = number.parse::<u16>() {
        codepage::to_encoding(page)
    } else {
        Encoding::for_label(trimmed.as_bytes())
    };

    let encoding = match lookup {
        Some(result) => result,
        None => {
            error!("[encoding] No converter for code page {trimmed}");
            return Err(UtilsError::UnknownCodepage);
        }
    };

    if !encoding_is_ascii_compatible(encoding) {
        error!(
            "[encoding] Code page {} cannot represent plain ASCII paths",
            encoding.name()
        );
        return Err(UtilsError::AsciiIncompatible);
    }
    Ok(encoding)
}

/// Probe that drive letters and separators survive a round trip through
/// the encoding unchanged
pub(crate) fn encoding_is_ascii_compatible(encoding: &'static Encoding) -> bool {
    let probe = "C:\\?";
    let (bytes, _, had_errors) = encoding.encode(probe);
    encoding.is_ascii_compatible() && !had_errors && bytes.as_ref() == probe.as_bytes()
}

/// Resolve backslash escape sequences in a user-supplied field
/// delimiter. An unrecognized escape keeps its backslash
pub fn filter_delimiter_escapes(input: &str) -> String {
    let mut resolved = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(value) = chars.next() {
        if value != '\\' {
            resolved.push(value);
            continue;
        }
        match chars.next() {
            Some('r') => resolved.push('\r'),
            Some('n') => resolved.push('\n'),
            Some('t') => resolved.push('\t'),
            Some('v') => resolved.push('\u{b}'),
            Some('f') => resolved.push('\u{c}'),
            Some('e') => resolved.push('\u{1b}'),
            Some('\\') => resolved.push('\\'),
            Some(other) => {
                resolved.push('\\');
                resolved.push(other);
            }
            None => resolved.push('\\'),
        }
    }
    resolved
}

/// Escape a string for a JSON string literal. Rewrites the `*uXXXX`
/// placeholder produced by `escape_unit` into a real `\u` escape and
/// emits surrogate pairs for characters outside the BMP
pub(crate) fn json_escape(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut escaped = String::with_capacity(input.len() + 2);
    let mut index = 0;

    while index < chars.len() {
        let value = chars[index];
        if value == '*'
            && index + 6 <= chars.len()
            && chars[index + 1] == 'u'
            && chars[index + 2..index + 6].iter().all(char::is_ascii_hexdigit)
        {
            escaped.push('\\');
            escaped.push('u');
            for digit in &chars[index + 2..index + 6] {
                escaped.push(*digit);
            }
            index += 6;
            continue;
        }

        match value {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{8}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{b}' => escaped.push_str("\\v"),
            '\u{c}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            _ => {
                let point = value as u32;
                if point < 0x20 {
                    escaped.push_str(&format!("\\u{point:04X}"));
                } else if point > 0xFFFF {
                    let mut units = [0u16; 2];
                    for unit in value.encode_utf16(&mut units) {
                        escaped.push_str(&format!("\\u{:04X}", unit));
                    }
                } else {
                    escaped.push(value);
                }
            }
        }
        index += 1;
    }
    escaped
}
