//! Permissive `<ButtonId>:<level>` parser
//!
//! Anything that is not a well-formed message for a mapped button yields
//! `None`. Serial links deliver partial and garbled lines around resets,
//! so none of this is an error.

use crate::events::ButtonEvent;
use crate::keys::KeyMapping;

/// Parse one line (terminator already stripped) into a button event.
///
/// # Protocol Format
///
/// ```text
/// B1:1\n   -> B1 pressed
/// B1:0\n   -> B1 released
/// ```
///
/// The level is any integer; only a value of exactly 1 means pressed.
/// `B1:2` and `B1:-1` both decode as released.
pub fn parse_line(line: &str, mapping: &KeyMapping) -> Option<ButtonEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.split(':');
    let button_id = parts.next()?;
    let level = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let pressed = parse_level(level)?;

    if !mapping.contains(button_id) {
        return None;
    }

    Some(ButtonEvent::new(button_id, pressed))
}

/// Decode raw bytes from the link into a line of text.
///
/// Invalid UTF-8 is dropped rather than replaced, and the line terminator
/// (LF, optionally preceded by CR) is removed.
pub fn decode_line(raw: &[u8]) -> String {
    let mut line = String::with_capacity(raw.len());
    for chunk in raw.utf8_chunks() {
        line.push_str(chunk.valid());
    }
    while line.ends_with(['\n', '\r']) {
        line.pop();
    }
    line
}

/// Parse the level field as an integer, returning whether it equals 1.
///
/// Accepts surrounding whitespace, an optional sign and any number of
/// digits; a value too large for a machine integer is still an integer.
fn parse_level(field: &str) -> Option<bool> {
    let field = field.trim();
    let (negative, digits) = match field.as_bytes().first().copied()? {
        b'-' => (true, &field[1..]),
        b'+' => (false, &field[1..]),
        _ => (false, field),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let magnitude = digits.trim_start_matches('0');
    Some(!negative && magnitude == "1")
}
