//! JSON text parser: characters in, handler events out.
//!
//! One recursive-descent implementation serves both input widths. Bytes
//! are treated as UTF-8 (multi-byte sequences become UTF-16 code units,
//! astral characters become surrogate pairs); 16-bit input is taken as
//! UTF-16 and passed through code unit by code unit. Error positions are
//! indices into the input in its own units.

use crate::handler::ParserHandler;
use crate::platform::Platform;
use crate::status::{Error, Status};
use crate::STACK_LIMIT;

/// Parses UTF-8 JSON text and drives `handler`. Errors are delivered via
/// `handler.error(..)`; the outermost value must be an object or array.
pub fn parse_json<H: ParserHandler>(platform: &dyn Platform, chars: &[u8], handler: &mut H) {
    JsonParser {
        platform,
        chars,
        handler,
    }
    .parse();
}

/// Parses UTF-16 JSON text. Same contract as [`parse_json`], with
/// positions counted in code units.
pub fn parse_json_utf16<H: ParserHandler>(platform: &dyn Platform, chars: &[u16], handler: &mut H) {
    JsonParser {
        platform,
        chars,
        handler,
    }
    .parse();
}

/// An input character the parser can scan. The two widths differ only in
/// how a raw (unescaped) run of string characters becomes UTF-16.
trait JsonChar: Copy {
    fn as_u32(self) -> u32;

    /// Appends the UTF-16 form of `run` to `out`; `false` when the run is
    /// not valid text in this width.
    fn push_run(run: &[Self], out: &mut Vec<u16>) -> bool;
}

impl JsonChar for u8 {
    fn as_u32(self) -> u32 {
        u32::from(self)
    }

    fn push_run(run: &[u8], out: &mut Vec<u16>) -> bool {
        match std::str::from_utf8(run) {
            Ok(text) => {
                out.extend(text.encode_utf16());
                true
            }
            Err(_) => false,
        }
    }
}

impl JsonChar for u16 {
    fn as_u32(self) -> u32 {
        u32::from(self)
    }

    fn push_run(run: &[u16], out: &mut Vec<u16>) -> bool {
        out.extend_from_slice(run);
        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    StringLiteral,
    Number,
    BoolTrue,
    BoolFalse,
    NullToken,
    ListSeparator,
    ObjectPairSeparator,
    InvalidToken,
    NoInput,
}

struct JsonParser<'a, C, H> {
    platform: &'a dyn Platform,
    chars: &'a [C],
    handler: &'a mut H,
}

impl<C: JsonChar, H: ParserHandler> JsonParser<'_, C, H> {
    fn parse(&mut self) {
        let (first, first_start, _) = scan_token(self.chars, 0);
        match first {
            Token::ObjectBegin | Token::ArrayBegin => {}
            Token::NoInput => {
                self.fail(Error::JsonNoInput, first_start);
                return;
            }
            _ => {
                // Scalars are not allowed at the top level.
                self.fail(Error::JsonInvalidToken, first_start);
                return;
            }
        }
        let Some(end) = self.parse_value(0, 0) else {
            return;
        };
        let tail = skip_whitespace(self.chars, end);
        if tail != self.chars.len() {
            self.fail(Error::JsonUnprocessedInputRemains, tail);
        }
    }

    /// Parses one value starting at `start`, returning the index just past
    /// it, or `None` after reporting an error.
    fn parse_value(&mut self, start: usize, depth: usize) -> Option<usize> {
        if depth > STACK_LIMIT {
            self.fail(Error::JsonStackLimitExceeded, start);
            return None;
        }
        let (token, token_start, token_end) = scan_token(self.chars, start);
        match token {
            Token::NoInput => {
                self.fail(Error::JsonNoInput, token_start);
                None
            }
            Token::InvalidToken => {
                self.fail(Error::JsonInvalidToken, token_start);
                None
            }
            Token::NullToken => {
                self.handler.null();
                Some(token_end)
            }
            Token::BoolTrue => {
                self.handler.boolean(true);
                Some(token_end)
            }
            Token::BoolFalse => {
                self.handler.boolean(false);
                Some(token_end)
            }
            Token::Number => {
                self.handle_number(token_start, token_end)?;
                Some(token_end)
            }
            Token::StringLiteral => {
                let mut chars16 = Vec::new();
                if !decode_string(&self.chars[token_start + 1..token_end - 1], &mut chars16) {
                    self.fail(Error::JsonInvalidString, token_start);
                    return None;
                }
                self.handler.string(&chars16);
                Some(token_end)
            }
            Token::ArrayBegin => {
                self.handler.array_begin();
                self.parse_array_tail(token_end, depth)
            }
            Token::ObjectBegin => {
                self.handler.map_begin();
                self.parse_object_tail(token_end, depth)
            }
            Token::ArrayEnd
            | Token::ObjectEnd
            | Token::ListSeparator
            | Token::ObjectPairSeparator => {
                self.fail(Error::JsonValueExpected, token_start);
                None
            }
        }
    }

    /// Elements after an emitted `array_begin`.
    fn parse_array_tail(&mut self, mut start: usize, depth: usize) -> Option<usize> {
        loop {
            let (token, _, close_end) = scan_token(self.chars, start);
            if token == Token::ArrayEnd {
                self.handler.array_end();
                return Some(close_end);
            }
            start = self.parse_value(start, depth + 1)?;
            let (sep, sep_start, sep_end) = scan_token(self.chars, start);
            match sep {
                Token::ListSeparator => {
                    start = sep_end;
                    let (next, next_start, _) = scan_token(self.chars, start);
                    if next == Token::ArrayEnd {
                        self.fail(Error::JsonUnexpectedArrayEnd, next_start);
                        return None;
                    }
                }
                Token::ArrayEnd => {
                    self.handler.array_end();
                    return Some(sep_end);
                }
                _ => {
                    self.fail(Error::JsonCommaOrArrayEndExpected, sep_start);
                    return None;
                }
            }
        }
    }

    /// Key/value pairs after an emitted `map_begin`.
    fn parse_object_tail(&mut self, mut start: usize, depth: usize) -> Option<usize> {
        loop {
            let (token, token_start, token_end) = scan_token(self.chars, start);
            if token == Token::ObjectEnd {
                self.handler.map_end();
                return Some(token_end);
            }
            if token != Token::StringLiteral {
                self.fail(Error::JsonStringLiteralExpected, token_start);
                return None;
            }
            let mut key = Vec::new();
            if !decode_string(&self.chars[token_start + 1..token_end - 1], &mut key) {
                self.fail(Error::JsonInvalidString, token_start);
                return None;
            }
            self.handler.string_key(&key);
            start = token_end;
            let (colon, colon_start, colon_end) = scan_token(self.chars, start);
            if colon != Token::ObjectPairSeparator {
                self.fail(Error::JsonColonExpected, colon_start);
                return None;
            }
            start = self.parse_value(colon_end, depth + 1)?;
            let (sep, sep_start, sep_end) = scan_token(self.chars, start);
            match sep {
                Token::ListSeparator => {
                    start = sep_end;
                    let (next, next_start, _) = scan_token(self.chars, start);
                    if next == Token::ObjectEnd {
                        self.fail(Error::JsonUnexpectedMapEnd, next_start);
                        return None;
                    }
                }
                Token::ObjectEnd => {
                    self.handler.map_end();
                    return Some(sep_end);
                }
                _ => {
                    self.fail(Error::JsonCommaOrMapEndExpected, sep_start);
                    return None;
                }
            }
        }
    }

    /// Number tokens without `.` or an exponent that fit i32 become `int`;
    /// everything else goes through the platform shim as a double.
    fn handle_number(&mut self, token_start: usize, token_end: usize) -> Option<()> {
        let text: String = self.chars[token_start..token_end]
            .iter()
            .map(|c| c.as_u32() as u8 as char)
            .collect();
        let is_float = text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
        if !is_float {
            if let Ok(value) = text.parse::<i32>() {
                self.handler.int(value);
                return Some(());
            }
        }
        match self.platform.string_to_double(&text) {
            Some(value) => {
                self.handler.double(value);
                Some(())
            }
            None => {
                self.fail(Error::JsonInvalidNumber, token_start);
                None
            }
        }
    }

    fn fail(&mut self, error: Error, pos: usize) {
        self.handler.error(Status::at(error, pos));
    }
}

fn is_whitespace(c: u32) -> bool {
    matches!(c, 0x20 | 0x09 | 0x0a | 0x0d)
}

fn is_digit(c: u32) -> bool {
    (0x30..=0x39).contains(&c)
}

fn skip_whitespace<C: JsonChar>(chars: &[C], mut pos: usize) -> usize {
    while pos < chars.len() && is_whitespace(chars[pos].as_u32()) {
        pos += 1;
    }
    pos
}

/// Scans one token, skipping leading whitespace. Returns the token kind,
/// its first index, and the index just past it.
fn scan_token<C: JsonChar>(chars: &[C], start: usize) -> (Token, usize, usize) {
    let pos = skip_whitespace(chars, start);
    if pos == chars.len() {
        return (Token::NoInput, pos, pos);
    }
    match chars[pos].as_u32() {
        c if c == u32::from(b'{') => (Token::ObjectBegin, pos, pos + 1),
        c if c == u32::from(b'}') => (Token::ObjectEnd, pos, pos + 1),
        c if c == u32::from(b'[') => (Token::ArrayBegin, pos, pos + 1),
        c if c == u32::from(b']') => (Token::ArrayEnd, pos, pos + 1),
        c if c == u32::from(b',') => (Token::ListSeparator, pos, pos + 1),
        c if c == u32::from(b':') => (Token::ObjectPairSeparator, pos, pos + 1),
        c if c == u32::from(b'n') => scan_literal(chars, pos, "null", Token::NullToken),
        c if c == u32::from(b't') => scan_literal(chars, pos, "true", Token::BoolTrue),
        c if c == u32::from(b'f') => scan_literal(chars, pos, "false", Token::BoolFalse),
        c if c == u32::from(b'"') => scan_string(chars, pos),
        c if c == u32::from(b'-') || is_digit(c) => scan_number(chars, pos),
        _ => (Token::InvalidToken, pos, pos),
    }
}

fn scan_literal<C: JsonChar>(
    chars: &[C],
    pos: usize,
    literal: &str,
    token: Token,
) -> (Token, usize, usize) {
    let bytes = literal.as_bytes();
    if pos + bytes.len() > chars.len() {
        return (Token::InvalidToken, pos, pos);
    }
    for (offset, &expected) in bytes.iter().enumerate() {
        if chars[pos + offset].as_u32() != u32::from(expected) {
            return (Token::InvalidToken, pos, pos);
        }
    }
    (token, pos, pos + bytes.len())
}

/// Scans a string token from its opening quote to just past the closing
/// quote. Escape validity is checked later, in [`decode_string`]; here a
/// backslash only shields the next character from ending the scan.
fn scan_string<C: JsonChar>(chars: &[C], pos: usize) -> (Token, usize, usize) {
    let mut i = pos + 1;
    while i < chars.len() {
        match chars[i].as_u32() {
            c if c == u32::from(b'\\') => i += 2,
            c if c == u32::from(b'"') => return (Token::StringLiteral, pos, i + 1),
            _ => i += 1,
        }
    }
    (Token::InvalidToken, pos, pos)
}

/// Scans a number token per RFC 8259: `-? int frac? exp?`.
fn scan_number<C: JsonChar>(chars: &[C], pos: usize) -> (Token, usize, usize) {
    let len = chars.len();
    let mut i = pos;
    if i < len && chars[i].as_u32() == u32::from(b'-') {
        i += 1;
    }
    // Integer part: a lone zero or a nonzero-led digit run.
    if i < len && chars[i].as_u32() == u32::from(b'0') {
        i += 1;
    } else if i < len && is_digit(chars[i].as_u32()) {
        while i < len && is_digit(chars[i].as_u32()) {
            i += 1;
        }
    } else {
        return (Token::InvalidToken, pos, pos);
    }
    if i < len && chars[i].as_u32() == u32::from(b'.') {
        i += 1;
        if i == len || !is_digit(chars[i].as_u32()) {
            return (Token::InvalidToken, pos, pos);
        }
        while i < len && is_digit(chars[i].as_u32()) {
            i += 1;
        }
    }
    if i < len && matches!(chars[i].as_u32(), c if c == u32::from(b'e') || c == u32::from(b'E')) {
        i += 1;
        if i < len
            && matches!(chars[i].as_u32(), c if c == u32::from(b'+') || c == u32::from(b'-'))
        {
            i += 1;
        }
        if i == len || !is_digit(chars[i].as_u32()) {
            return (Token::InvalidToken, pos, pos);
        }
        while i < len && is_digit(chars[i].as_u32()) {
            i += 1;
        }
    }
    (Token::Number, pos, i)
}

/// Decodes the body of a string token (between the quotes) into UTF-16,
/// processing escapes. Surrogate escapes are preserved as-is, one code
/// unit per `\uXXXX`.
fn decode_string<C: JsonChar>(raw: &[C], out: &mut Vec<u16>) -> bool {
    let mut i = 0;
    let mut run_start = 0;
    while i < raw.len() {
        let c = raw[i].as_u32();
        if c == u32::from(b'\\') {
            if !C::push_run(&raw[run_start..i], out) {
                return false;
            }
            i += 1;
            let Some(escape) = raw.get(i) else {
                return false;
            };
            i += 1;
            match escape.as_u32() {
                c if c == u32::from(b'"') => out.push(u16::from(b'"')),
                c if c == u32::from(b'\\') => out.push(u16::from(b'\\')),
                c if c == u32::from(b'/') => out.push(u16::from(b'/')),
                c if c == u32::from(b'b') => out.push(0x08),
                c if c == u32::from(b'f') => out.push(0x0c),
                c if c == u32::from(b'n') => out.push(0x0a),
                c if c == u32::from(b'r') => out.push(0x0d),
                c if c == u32::from(b't') => out.push(0x09),
                c if c == u32::from(b'u') => {
                    if i + 4 > raw.len() {
                        return false;
                    }
                    let mut unit: u16 = 0;
                    for offset in 0..4 {
                        let Some(digit) = hex_digit(raw[i + offset].as_u32()) else {
                            return false;
                        };
                        unit = unit << 4 | u16::from(digit);
                    }
                    out.push(unit);
                    i += 4;
                }
                _ => return false,
            }
            run_start = i;
        } else if c < 0x20 {
            // Raw control characters are not allowed inside strings.
            return false;
        } else {
            i += 1;
        }
    }
    C::push_run(&raw[run_start..], out)
}

fn hex_digit(c: u32) -> Option<u8> {
    match c {
        0x30..=0x39 => Some((c - 0x30) as u8),
        0x61..=0x66 => Some((c - 0x61 + 10) as u8),
        0x41..=0x46 => Some((c - 0x41 + 10) as u8),
        _ => None,
    }
}
