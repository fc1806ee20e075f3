//! Binary wire parser: bytes in, handler events out.

use wireprobe_buffers::Span;

use crate::cbor::{
    decode_double, decode_negative, decode_unsigned, decode_utf16_string, decode_utf8_string,
    INITIAL_BYTE_DOUBLE, INITIAL_BYTE_FALSE, INITIAL_BYTE_INDEF_ARRAY, INITIAL_BYTE_INDEF_MAP,
    INITIAL_BYTE_NULL, INITIAL_BYTE_STOP, INITIAL_BYTE_TRUE, MAJOR_NEGATIVE, MAJOR_STRING16,
    MAJOR_STRING8, MAJOR_UNSIGNED,
};
use crate::handler::ParserHandler;
use crate::status::{Error, Status};
use crate::STACK_LIMIT;

/// Parses a binary message and drives `handler`. Messages must begin with
/// the indefinite-length map byte `0xbf`, which is how textual JSON
/// (starting with `{`) is kept off this code path. Errors are delivered
/// via `handler.error(..)` with byte-exact positions.
pub fn parse_binary<H: ParserHandler>(bytes: &[u8], handler: &mut H) {
    let mut parser = BinaryParser {
        total: bytes.len(),
        handler,
    };
    let mut span = Span::new(bytes);
    if span.is_empty() {
        parser.fail(Error::BinaryNoInput, 0);
        return;
    }
    if span.peek() != Some(INITIAL_BYTE_INDEF_MAP) {
        parser.fail(Error::BinaryInvalidStartByte, 0);
        return;
    }
    parser.parse_map(1, &mut span);
}

struct BinaryParser<'a, H> {
    total: usize,
    handler: &'a mut H,
}

impl<H: ParserHandler> BinaryParser<'_, H> {
    fn pos(&self, span: &Span) -> usize {
        self.total - span.len()
    }

    fn fail(&mut self, error: Error, pos: usize) -> bool {
        self.handler.error(Status::at(error, pos));
        false
    }

    /// Parses a map whose `0xbf` is the next byte. `depth` counts this map.
    fn parse_map(&mut self, depth: usize, span: &mut Span) -> bool {
        span.advance(1);
        self.handler.map_begin();
        loop {
            if span.is_empty() {
                return self.fail(Error::BinaryUnexpectedEofInMap, self.pos(span));
            }
            if span.peek() == Some(INITIAL_BYTE_STOP) {
                span.advance(1);
                self.handler.map_end();
                return true;
            }
            let key_pos = self.pos(span);
            if span.peek().map(|b| b >> 5) != Some(MAJOR_STRING8) {
                return self.fail(Error::BinaryInvalidMapKey, key_pos);
            }
            let Some(bytes) = decode_utf8_string(span) else {
                return self.fail(Error::BinaryInvalidString8, key_pos);
            };
            if !bytes.iter().all(|&b| b <= 0x7f) {
                return self.fail(Error::BinaryString8MustBe7Bit, key_pos);
            }
            let key: Vec<u16> = bytes.iter().map(|&b| u16::from(b)).collect();
            self.handler.string_key(&key);
            if span.is_empty() {
                return self.fail(Error::BinaryUnexpectedEofExpectedValue, self.pos(span));
            }
            if span.peek() == Some(INITIAL_BYTE_STOP) {
                // A stray stop byte in value position; skipping it lets the
                // key-position checks above surface the error.
                span.advance(1);
                continue;
            }
            if !self.parse_value(depth, span) {
                return false;
            }
        }
    }

    /// Parses an array whose `0x9f` is the next byte.
    fn parse_array(&mut self, depth: usize, span: &mut Span) -> bool {
        span.advance(1);
        self.handler.array_begin();
        loop {
            if span.is_empty() {
                return self.fail(Error::BinaryUnexpectedEofInArray, self.pos(span));
            }
            if span.peek() == Some(INITIAL_BYTE_STOP) {
                span.advance(1);
                self.handler.array_end();
                return true;
            }
            if !self.parse_value(depth, span) {
                return false;
            }
        }
    }

    /// Parses one value. `depth` is the number of open containers; the
    /// limit check lives here so that over-deep nests of any depth report
    /// the same position.
    fn parse_value(&mut self, depth: usize, span: &mut Span) -> bool {
        let pos = self.pos(span);
        if depth > STACK_LIMIT {
            return self.fail(Error::BinaryStackLimitExceeded, pos);
        }
        let Some(initial) = span.peek() else {
            return self.fail(Error::BinaryUnexpectedEofExpectedValue, pos);
        };
        match initial {
            INITIAL_BYTE_INDEF_MAP => return self.parse_map(depth + 1, span),
            INITIAL_BYTE_INDEF_ARRAY => return self.parse_array(depth + 1, span),
            INITIAL_BYTE_TRUE => {
                span.advance(1);
                self.handler.boolean(true);
            }
            INITIAL_BYTE_FALSE => {
                span.advance(1);
                self.handler.boolean(false);
            }
            INITIAL_BYTE_NULL => {
                span.advance(1);
                self.handler.null();
            }
            INITIAL_BYTE_DOUBLE => {
                let Some(value) = decode_double(span) else {
                    return self.fail(Error::BinaryInvalidDouble, pos);
                };
                self.handler.double(value);
            }
            _ => match initial >> 5 {
                MAJOR_UNSIGNED => {
                    let Some(raw) = decode_unsigned(span) else {
                        return self.fail(Error::BinaryInvalidSigned, pos);
                    };
                    let Ok(value) = i32::try_from(raw) else {
                        return self.fail(Error::BinaryInvalidSigned, pos);
                    };
                    self.handler.int(value);
                }
                MAJOR_NEGATIVE => {
                    let Some(raw) = decode_negative(span) else {
                        return self.fail(Error::BinaryInvalidSigned, pos);
                    };
                    let Ok(value) = i32::try_from(raw) else {
                        return self.fail(Error::BinaryInvalidSigned, pos);
                    };
                    self.handler.int(value);
                }
                MAJOR_STRING16 => {
                    let Some(chars) = decode_utf16_string(span) else {
                        return self.fail(Error::BinaryInvalidString16, pos);
                    };
                    self.handler.string(&chars);
                }
                MAJOR_STRING8 => {
                    let Some(bytes) = decode_utf8_string(span) else {
                        return self.fail(Error::BinaryInvalidString8, pos);
                    };
                    if !bytes.iter().all(|&b| b <= 0x7f) {
                        return self.fail(Error::BinaryString8MustBe7Bit, pos);
                    }
                    let chars: Vec<u16> = bytes.iter().map(|&b| u16::from(b)).collect();
                    self.handler.string(&chars);
                }
                // Tags, fixed-length containers, half/single floats,
                // undefined: all outside the profile.
                _ => return self.fail(Error::BinaryUnsupportedValue, pos),
            },
        }
        true
    }
}
