//! Protocol codec
//!
//! Encoding and decoding for the line protocol: typed values to and from
//! wire text, and request/reply line framing.
//!
//! ## Value Encoding (SET argument)
//! ```text
//! String   "he said \"hi\""     quotes escaped, nothing else
//! Boolean  true | false
//! Null     null
//! Number   42 | 2.5             shortest decimal form, 3.0 -> 3
//! Object   {"a":1,"b":[true]}   compact JSON
//! Array    [1,"x",null]         compact JSON
//! ```
//!
//! ## Value Decoding (GET reply)
//! Rules are tried in order: `nil`, quoted string, boolean, `null`, number,
//! JSON object/array, raw text. A number is a Float when it has a decimal
//! point and an Integer otherwise, so a Float without fractional part does
//! not survive the round trip as a Float.
//!
//! ## Framing
//! One request per line, one reply per line, `\n` terminated. A trailing `\r`
//! on replies is tolerated.

use std::io::{BufRead, Read, Write};

use crate::error::{ClientError, Result};
use crate::value::Value;
use super::{Command, Reply, NIL};

/// Upper bound on a single reply line (16 MB)
pub const MAX_LINE_SIZE: usize = 16 * 1024 * 1024;

const NULL: &str = "null";
const TRUE: &str = "true";
const FALSE: &str = "false";

// =============================================================================
// Value Encoding
// =============================================================================

/// Encode a value into the text used as the argument of `SET`
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        Value::Bool(true) => TRUE.to_string(),
        Value::Bool(false) => FALSE.to_string(),
        Value::Null => NULL.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        // Object keys are always strings, so JSON serialization cannot fail
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| NULL.to_string())
        }
    }
}

// =============================================================================
// Value Decoding
// =============================================================================

/// How a reply was interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The `nil` sentinel: no such key
    Absent,

    /// Quoted string, boolean, null or number
    Scalar(Value),

    /// Parsed JSON object or array
    Structured(Value),

    /// Looked like an object/array but did not parse; kept as raw text
    MalformedStructured(String),

    /// Anything else, returned verbatim
    Raw(String),
}

impl Decoded {
    /// Collapse to the value a caller sees. Text outcomes become strings.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Decoded::Absent => None,
            Decoded::Scalar(value) | Decoded::Structured(value) => Some(value),
            Decoded::MalformedStructured(text) | Decoded::Raw(text) => Some(Value::String(text)),
        }
    }
}

/// Decode a reply, keeping track of which rule matched
pub fn decode_tagged(text: &str) -> Decoded {
    let text = text.trim();

    if text == NIL {
        return Decoded::Absent;
    }

    if let Some(inner) = strip_quotes(text) {
        return Decoded::Scalar(Value::String(inner.replace("\\\"", "\"")));
    }

    match text {
        TRUE => return Decoded::Scalar(Value::Bool(true)),
        FALSE => return Decoded::Scalar(Value::Bool(false)),
        NULL => return Decoded::Scalar(Value::Null),
        _ => {}
    }

    if let Some(number) = parse_number(text) {
        return Decoded::Scalar(number);
    }

    if looks_structured(text) {
        return match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Decoded::Structured(value),
            _ => Decoded::MalformedStructured(text.to_string()),
        };
    }

    Decoded::Raw(text.to_string())
}

/// Decode a reply into a value; `None` when the key is absent
pub fn decode_value(text: &str) -> Option<Value> {
    decode_tagged(text).into_value()
}

fn strip_quotes(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn looks_structured(text: &str) -> bool {
    (text.starts_with('{') && text.ends_with('}')) || (text.starts_with('[') && text.ends_with(']'))
}

/// Plain decimal or exponent notation only; `inf`/`NaN` stay text
fn parse_number(text: &str) -> Option<Value> {
    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric_chars || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let float = text.parse::<f64>().ok()?;
    if text.contains('.') {
        return Some(Value::Float(float));
    }
    // Out-of-range or exponent forms fall back to Float
    Some(text.parse::<i64>().map_or(Value::Float(float), Value::Integer))
}

// =============================================================================
// Line Framing
// =============================================================================

/// Encode a command as a terminated request line
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut line = command.to_line().into_bytes();
    line.push(b'\n');
    line
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes).map_err(ClientError::from_socket)?;
    writer.flush().map_err(ClientError::from_socket)?;
    Ok(())
}

/// Read one reply line from a stream
///
/// Blocks until a full line arrives, the peer closes, or the stream's
/// read timeout fires.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let mut buf = Vec::with_capacity(64);
    let read = reader
        .by_ref()
        .take(MAX_LINE_SIZE as u64 + 1)
        .read_until(b'\n', &mut buf)
        .map_err(ClientError::from_socket)?;

    if read == 0 {
        return Err(ClientError::ConnectionClosed);
    }

    if buf.last() != Some(&b'\n') {
        if buf.len() > MAX_LINE_SIZE {
            return Err(ClientError::Protocol(format!(
                "Reply line too large: more than {} bytes",
                MAX_LINE_SIZE
            )));
        }
        // EOF in the middle of a line
        return Err(ClientError::ConnectionClosed);
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    let line = String::from_utf8(buf)
        .map_err(|_| ClientError::Protocol("Reply is not valid UTF-8".to_string()))?;
    Ok(Reply::new(line))
}
