//! Hand-written JSON parser over two explicit stacks.
//!
//! The bracket stack records open-token history and exists purely for
//! balance validation. The value stack holds partially built containers and
//! pending object keys as role-tagged [`Frame`]s, so key-vs-value
//! disambiguation never inspects payload types.
//!
//! Scanning is a single left-to-right pass: strings scan to the next
//! unescaped quote (a quote is escaped iff an odd number of backslashes
//! immediately precedes it), bare literals scan to their terminating
//! delimiter and are validated against a real-number regex when they are not
//! `null`/`true`/`false`.

use std::sync::OnceLock;

use regex::Regex;

use json_mill_util::is_blank;

use crate::array::JsonArray;
use crate::config::{ConfigRef, JsonConfig};
use crate::error::ParseError;
use crate::object::JsonObject;
use crate::value::{Payload, Value};

/// Standard JSON numeric grammar.
fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?$").expect("static regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Curly,
    Square,
}

/// Role-tagged value-stack entry.
#[derive(Debug)]
enum Frame {
    Object(JsonObject),
    Array(JsonArray),
    Key(String),
}

/// Parses JSON text into the value model.
pub struct JsonParser {
    config: ConfigRef,
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new(JsonConfig::default_ref())
    }
}

impl JsonParser {
    pub fn new(config: ConfigRef) -> Self {
        Self { config }
    }

    /// Parses a document whose root is an object or an array.
    pub fn parse(&self, text: &str) -> Result<Value, ParseError> {
        if is_blank(text) {
            return Err(ParseError::Empty);
        }
        let trimmed = text.trim();
        // Empty-literal fast paths skip the state machine entirely.
        if trimmed == "{}" {
            return Ok(Value::from(JsonObject::with_config(self.config.clone()))
                .stamped(&self.config));
        }
        if trimmed == "[]" {
            return Ok(Value::from(JsonArray::with_config(self.config.clone()))
                .stamped(&self.config));
        }
        self.run(trimmed)
    }

    /// Parses a document and requires an object root.
    pub fn parse_object(&self, text: &str) -> Result<JsonObject, ParseError> {
        match self.parse(text)?.into_payload() {
            Payload::Object(obj) => Ok(obj),
            _ => Err(ParseError::UnexpectedRoot { expected: "object" }),
        }
    }

    /// Parses a document and requires an array root.
    pub fn parse_array(&self, text: &str) -> Result<JsonArray, ParseError> {
        match self.parse(text)?.into_payload() {
            Payload::Array(arr) => Ok(arr),
            _ => Err(ParseError::UnexpectedRoot { expected: "array" }),
        }
    }

    fn run(&self, input: &str) -> Result<Value, ParseError> {
        let bytes = input.as_bytes();
        let mut brackets: Vec<Bracket> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut root: Option<Value> = None;
        // armed by `,` and `:`; a closer while armed is a trailing comma
        let mut expect_value = false;
        // set after each attached value; a new value while set lacks a comma
        let mut after_value = false;
        let mut i = 0usize;

        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    i += 1;
                }
                b'{' | b'[' => {
                    self.check_value_position(input, i, &root, after_value)?;
                    if bytes[i] == b'{' {
                        brackets.push(Bracket::Curly);
                        frames.push(Frame::Object(JsonObject::with_config(self.config.clone())));
                    } else {
                        brackets.push(Bracket::Square);
                        frames.push(Frame::Array(JsonArray::with_config(self.config.clone())));
                    }
                    expect_value = false;
                    after_value = false;
                    i += 1;
                }
                b'"' => {
                    self.check_value_position(input, i, &root, after_value)?;
                    let start = i + 1;
                    let end = find_closing_quote(bytes, start)
                        .ok_or_else(|| ParseError::UnterminatedString(snippet(input, i)))?;
                    let text = self.unescape(&input[start..end]);
                    i = end + 1;
                    match next_significant(bytes, i) {
                        Some((j, b':')) => {
                            if !matches!(frames.last(), Some(Frame::Object(_))) {
                                return Err(ParseError::ExpectedDelimiter(snippet(input, j)));
                            }
                            frames.push(Frame::Key(text));
                            i = j + 1;
                            expect_value = true;
                            after_value = false;
                        }
                        Some((_, b',')) | Some((_, b'}')) | Some((_, b']')) => {
                            attach(&mut frames, &mut root, Value::from(text))
                                .map_err(|()| ParseError::ExpectedDelimiter(snippet(input, i)))?;
                            expect_value = false;
                            after_value = true;
                        }
                        Some((j, _)) => {
                            return Err(ParseError::ExpectedDelimiter(snippet(input, j)));
                        }
                        None => {
                            if frames.is_empty() {
                                return Err(ParseError::RootNotContainer);
                            }
                            return Err(ParseError::Unbalanced(snippet(input, i)));
                        }
                    }
                }
                b',' => {
                    if !after_value {
                        return Err(ParseError::ExpectedValue(snippet(input, i)));
                    }
                    expect_value = true;
                    after_value = false;
                    i += 1;
                }
                b':' => {
                    return Err(ParseError::ExpectedValue(snippet(input, i)));
                }
                b'}' | b']' => {
                    if expect_value {
                        return Err(ParseError::ExpectedValue(snippet(input, i)));
                    }
                    let open = match brackets.pop() {
                        Some(b) => b,
                        None if root.is_some() => {
                            return Err(ParseError::Trailing(snippet(input, i)))
                        }
                        None => return Err(ParseError::Unbalanced(snippet(input, i))),
                    };
                    let closes = matches!(
                        (open, bytes[i]),
                        (Bracket::Curly, b'}') | (Bracket::Square, b']')
                    );
                    if !closes {
                        return Err(ParseError::Unbalanced(snippet(input, i)));
                    }
                    let value = match frames.pop() {
                        Some(Frame::Object(obj)) => Value::from(obj),
                        Some(Frame::Array(arr)) => Value::from(arr),
                        _ => return Err(ParseError::Unbalanced(snippet(input, i))),
                    };
                    attach(&mut frames, &mut root, value.stamped(&self.config))
                        .map_err(|()| ParseError::ExpectedDelimiter(snippet(input, i)))?;
                    after_value = true;
                    i += 1;
                }
                _ => {
                    self.check_value_position(input, i, &root, after_value)?;
                    let end = scan_literal(bytes, i);
                    let token = &input[i..end];
                    let value = literal_value(token)
                        .ok_or_else(|| ParseError::InvalidLiteral(token.to_string()))?;
                    attach(&mut frames, &mut root, value)
                        .map_err(|()| ParseError::ExpectedDelimiter(snippet(input, i)))?;
                    expect_value = false;
                    after_value = true;
                    i = end;
                }
            }
        }

        if !brackets.is_empty() || !frames.is_empty() {
            return Err(ParseError::Unbalanced(snippet(input, input.len())));
        }
        match root {
            Some(v) if matches!(v.payload(), Payload::Object(_) | Payload::Array(_)) => {
                Ok(v.stamped(&self.config))
            }
            _ => Err(ParseError::RootNotContainer),
        }
    }

    /// A value token is only legal when no root exists yet and the previous
    /// value was followed by a delimiter.
    fn check_value_position(
        &self,
        input: &str,
        at: usize,
        root: &Option<Value>,
        after_value: bool,
    ) -> Result<(), ParseError> {
        if root.is_some() {
            return Err(ParseError::Trailing(snippet(input, at)));
        }
        if after_value {
            return Err(ParseError::ExpectedDelimiter(snippet(input, at)));
        }
        Ok(())
    }

    /// Resolves `\\` and `\"` when the escaping config is open; verbatim
    /// otherwise. Unknown escapes pass through untouched.
    fn unescape(&self, raw: &str) -> String {
        if !self.config.special.open {
            return raw.to_string();
        }
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        out
    }
}

/// Attaches a completed value to the top of the value stack, or promotes it
/// to the document root when the stack is empty. `Err(())` means a value
/// appeared directly inside an object with no pending key.
fn attach(frames: &mut Vec<Frame>, root: &mut Option<Value>, value: Value) -> Result<(), ()> {
    match frames.last_mut() {
        Some(Frame::Array(arr)) => {
            arr.push(value);
            Ok(())
        }
        Some(Frame::Key(_)) => {
            let Some(Frame::Key(key)) = frames.pop() else {
                unreachable!("just matched a key frame");
            };
            match frames.last_mut() {
                Some(Frame::Object(obj)) => {
                    obj.put(key, value);
                    Ok(())
                }
                _ => Err(()),
            }
        }
        Some(Frame::Object(_)) => Err(()),
        None => {
            *root = Some(value);
            Ok(())
        }
    }
}

/// Position of the closing quote, starting at the first content byte. A
/// candidate quote preceded by an odd number of backslashes is escaped.
fn find_closing_quote(bytes: &[u8], mut i: usize) -> Option<usize> {
    let start = i;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            let mut backslashes = 0;
            let mut j = i;
            while j > start && bytes[j - 1] == b'\\' {
                backslashes += 1;
                j -= 1;
            }
            if backslashes % 2 == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Index of the next non-whitespace byte, with that byte.
fn next_significant(bytes: &[u8], mut i: usize) -> Option<(usize, u8)> {
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b => return Some((i, b)),
        }
    }
    None
}

/// Scans a bare literal to its terminating delimiter or whitespace.
fn scan_literal(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    i
}

/// `null`/`true`/`false`, or a number validated against the numeric grammar.
/// Integers land in `Int` (or `BigInt` past `i64`), everything else `Float`.
fn literal_value(token: &str) -> Option<Value> {
    match token {
        "null" => return Some(Value::null()),
        "true" => return Some(Value::from(true)),
        "false" => return Some(Value::from(false)),
        _ => {}
    }
    if !number_re().is_match(token) {
        return None;
    }
    let integral = !token.contains(['.', 'e', 'E']);
    if integral {
        if let Ok(i) = token.parse::<i64>() {
            return Some(Value::from(i));
        }
        if let Ok(i) = token.parse::<i128>() {
            return Some(Value::from(i));
        }
    }
    token.parse::<f64>().ok().map(Value::from)
}

/// Trailing fragment of the input starting at `from`, clipped for error
/// messages. At end of input, the tail of the document is used instead.
fn snippet(s: &str, from: usize) -> String {
    const MAX: usize = 32;
    let mut from = from.min(s.len());
    while !s.is_char_boundary(from) {
        from -= 1;
    }
    let tail: &str = if from == s.len() {
        let chars: Vec<char> = s.chars().collect();
        return chars[chars.len().saturating_sub(16)..].iter().collect();
    } else {
        &s[from..]
    };
    tail.chars().take(MAX).collect()
}
