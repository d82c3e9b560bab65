use crate::utils::encoding::{EscapeStyle, escape_byte, escape_unit};

/// Decode a UTF-16LE path field. Unpaired surrogates become one escape
/// template per code unit, an odd trailing byte becomes a one-byte
/// template. Returns the string and the byte offsets of replaced input
pub(crate) fn extract_utf16_path(data: &[u8], style: EscapeStyle) -> (String, Vec<usize>) {
    let mut units: Vec<u16> = Vec::with_capacity(data.len() / 2);
    let chunks = data.chunks_exact(2);
    let tail = chunks.remainder();
    for wide_char in chunks {
        units.push(u16::from_le_bytes([wide_char[0], wide_char[1]]));
    }

    let mut path = String::with_capacity(data.len());
    let mut bad_offsets: Vec<usize> = Vec::new();
    let mut unit_index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(value) => {
                path.push(value);
                unit_index += value.len_utf16();
            }
            Err(err) => {
                bad_offsets.push(unit_index * 2);
                path.push_str(&escape_unit(style, err.unpaired_surrogate()));
                unit_index += 1;
            }
        }
    }

    if !tail.is_empty() {
        bad_offsets.push(data.len() - 1);
        path.push_str(&escape_byte(style, tail[0]));
    }

    (path, bad_offsets)
}

/// Byte length of a UTF-16LE string up to (not including) its double
/// null terminator, capped at `cap`. An odd byte left over before the
/// cap counts as a final broken unit
pub(crate) fn utf16_len_to_terminator(data: &[u8], cap: usize) -> usize {
    let limit = std::cmp::min(data.len(), cap);
    let mut length = 0;
    while length + 2 <= limit {
        if data[length] == 0 && data[length + 1] == 0 {
            return length;
        }
        length += 2;
    }
    limit
}

/// Replace every code point that is neither graphic nor ASCII space
/// with the escape template. Idempotent: template output is all
/// printable ASCII
pub(crate) fn filter_nonprintable(input: &str, style: EscapeStyle) -> String {
    let mut filtered = String::with_capacity(input.len());
    for value in input.chars() {
        if value == ' ' || !(value.is_control() || value.is_whitespace()) {
            filtered.push(value);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in value.encode_utf16(&mut units) {
            filtered.push_str(&escape_unit(style, *unit));
        }
    }
    filtered
}

/// Best-effort UTF-16LE text extraction, for sniffing `desktop.ini`
/// contents. Not used for path fields
pub(crate) fn extract_utf16_lossy(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|wide_char| u16::from_le_bytes([wide_char[0], wide_char[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_matches('\0')
        .to_string()
}
