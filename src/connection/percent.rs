//! Percent-encoding helpers for connection strings.
//!
//! Decoding is deliberately forgiving: a `%` that is not followed by two hex
//! digits is kept as-is instead of failing the whole connection string.

use std::fmt::Write;

pub(super) fn decode(input: &str) -> String {
    decode_bytes(input.as_bytes(), false)
}

/// `application/x-www-form-urlencoded` decoding: `+` is a space.
pub(super) fn decode_form(input: &str) -> String {
    decode_bytes(input.as_bytes(), true)
}

fn decode_bytes(bytes: &[u8], plus_as_space: bool) -> String {
    if !bytes.iter().any(|&b| b == b'%' || (plus_as_space && b == b'+')) {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'%' => match (hex_value(bytes.get(idx + 1)), hex_value(bytes.get(idx + 2))) {
                (Some(high), Some(low)) => {
                    decoded.push((high << 4) | low);
                    idx += 2;
                }
                _ => decoded.push(b'%'),
            },
            b'+' if plus_as_space => decoded.push(b' '),
            b => decoded.push(b),
        }
        idx += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(digit: Option<&u8>) -> Option<u8> {
    match *digit? {
        d @ b'0'..=b'9' => Some(d - b'0'),
        d @ b'A'..=b'F' => Some(d - b'A' + 10),
        d @ b'a'..=b'f' => Some(d - b'a' + 10),
        _ => None,
    }
}

/// Encode everything outside the RFC 3986 unreserved set.
pub(super) fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            // writing into a String cannot fail
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}
