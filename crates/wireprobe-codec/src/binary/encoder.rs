//! Binary encoder: handler events in, wire bytes out.

use wireprobe_buffers::Writer;

use crate::cbor::{
    encode_double, encode_negative, encode_unsigned, encode_utf16_string, encode_utf8_string,
    write_type_and_value, INITIAL_BYTE_FALSE, INITIAL_BYTE_INDEF_ARRAY, INITIAL_BYTE_INDEF_MAP,
    INITIAL_BYTE_NULL, INITIAL_BYTE_STOP, INITIAL_BYTE_TRUE, MAJOR_STRING16,
};
use crate::handler::ParserHandler;
use crate::status::Status;

/// A [`ParserHandler`] that appends the binary wire form of the event
/// stream to a caller-owned [`Writer`].
///
/// Strings whose code units all fit 7 bits go out as compact major-3 text
/// (one byte per unit); everything else as major-2 UTF-16LE. After an
/// `error` event the status is latched and all further events dropped;
/// bytes already written are left for the caller to discard.
pub struct JsonToBinaryEncoder<'a> {
    out: &'a mut Writer,
    status: &'a mut Status,
}

impl<'a> JsonToBinaryEncoder<'a> {
    pub fn new(out: &'a mut Writer, status: &'a mut Status) -> Self {
        Self { out, status }
    }

    fn write_string(&mut self, chars: &[u16]) {
        if chars.iter().all(|&unit| unit <= 0x7f) {
            let bytes: Vec<u8> = chars.iter().map(|&unit| unit as u8).collect();
            encode_utf8_string(&bytes, self.out);
        } else {
            encode_utf16_string(chars, self.out);
        }
    }
}

impl ParserHandler for JsonToBinaryEncoder<'_> {
    fn map_begin(&mut self) {
        if self.status.is_ok() {
            self.out.u8(INITIAL_BYTE_INDEF_MAP);
        }
    }

    fn map_end(&mut self) {
        if self.status.is_ok() {
            self.out.u8(INITIAL_BYTE_STOP);
        }
    }

    fn array_begin(&mut self) {
        if self.status.is_ok() {
            self.out.u8(INITIAL_BYTE_INDEF_ARRAY);
        }
    }

    fn array_end(&mut self) {
        if self.status.is_ok() {
            self.out.u8(INITIAL_BYTE_STOP);
        }
    }

    fn string_key(&mut self, chars: &[u16]) {
        if self.status.is_ok() {
            self.write_string(chars);
        }
    }

    fn string(&mut self, chars: &[u16]) {
        if self.status.is_ok() {
            self.write_string(chars);
        }
    }

    fn binary(&mut self, bytes: &[u8]) {
        if self.status.is_ok() {
            write_type_and_value(self.out, MAJOR_STRING16, bytes.len() as u64);
            self.out.buf(bytes);
        }
    }

    fn double(&mut self, value: f64) {
        if self.status.is_ok() {
            encode_double(value, self.out);
        }
    }

    fn int(&mut self, value: i32) {
        if self.status.is_ok() {
            if value >= 0 {
                encode_unsigned(value as u64, self.out);
            } else {
                encode_negative(i64::from(value), self.out);
            }
        }
    }

    fn boolean(&mut self, value: bool) {
        if self.status.is_ok() {
            self.out
                .u8(if value { INITIAL_BYTE_TRUE } else { INITIAL_BYTE_FALSE });
        }
    }

    fn null(&mut self) {
        if self.status.is_ok() {
            self.out.u8(INITIAL_BYTE_NULL);
        }
    }

    fn error(&mut self, status: Status) {
        if self.status.is_ok() {
            *self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Error;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    fn encode(drive: impl FnOnce(&mut JsonToBinaryEncoder)) -> (Vec<u8>, Status) {
        let mut writer = Writer::new();
        let mut status = Status::ok();
        let mut encoder = JsonToBinaryEncoder::new(&mut writer, &mut status);
        drive(&mut encoder);
        (writer.flush(), status)
    }

    #[test]
    fn seven_bit_strings_use_the_compact_text_form() {
        let (bytes, status) = encode(|e| e.string(&utf16("foo")));
        assert!(status.is_ok());
        assert_eq!(bytes, [3 << 5 | 3, b'f', b'o', b'o']);
    }

    #[test]
    fn wide_strings_use_utf16le() {
        let (bytes, _) = encode(|e| e.string(&utf16("Hello, \u{1f30e}.")));
        assert_eq!(bytes[0], 2 << 5 | 20);
        assert_eq!(&bytes[1..5], [b'H', 0, b'e', 0]);
        assert_eq!(&bytes[15..19], [0x3c, 0xd8, 0x0e, 0xdf]);
    }

    #[test]
    fn containers_use_indefinite_sentinels() {
        let (bytes, _) = encode(|e| {
            e.map_begin();
            e.string_key(&utf16("a"));
            e.array_begin();
            e.int(1);
            e.array_end();
            e.map_end();
        });
        assert_eq!(bytes, [0xbf, 3 << 5 | 1, b'a', 0x9f, 1, 0xff, 0xff]);
    }

    #[test]
    fn integers_pick_the_signed_major_by_sign() {
        let (bytes, _) = encode(|e| {
            e.array_begin();
            e.int(1);
            e.int(-1);
            e.int(i32::MAX);
            e.int(i32::MIN);
            e.array_end();
        });
        assert_eq!(
            bytes,
            [
                0x9f,
                1,
                1 << 5,
                26,
                0x7f,
                0xff,
                0xff,
                0xff,
                1 << 5 | 26,
                0x7f,
                0xff,
                0xff,
                0xff,
                0xff,
            ]
        );
    }

    #[test]
    fn scalars_encode_their_sentinels() {
        let (bytes, _) = encode(|e| {
            e.array_begin();
            e.boolean(true);
            e.boolean(false);
            e.null();
            e.double(1.0 / 3.0);
            e.array_end();
        });
        assert_eq!(bytes[0], 0x9f);
        assert_eq!(bytes[1], 7 << 5 | 21);
        assert_eq!(bytes[2], 7 << 5 | 20);
        assert_eq!(bytes[3], 7 << 5 | 22);
        assert_eq!(bytes[4], 7 << 5 | 27);
        assert_eq!(bytes[5..13], [0x3f, 0xd5, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55]);
        assert_eq!(bytes[13], 0xff);
    }

    #[test]
    fn binary_values_pass_through_as_byte_strings() {
        let (bytes, _) = encode(|e| e.binary(&[1, 2, 3]));
        assert_eq!(bytes, [2 << 5 | 3, 1, 2, 3]);
    }

    #[test]
    fn error_latches_and_drops_later_events() {
        let (bytes, status) = encode(|e| {
            e.map_begin();
            e.error(Status::at(Error::JsonInvalidToken, 4));
            e.string_key(&utf16("dropped"));
            e.map_end();
            e.error(Status::at(Error::JsonNoInput, 0));
        });
        assert_eq!(bytes, [0xbf]);
        assert_eq!(status, Status::at(Error::JsonInvalidToken, 4));
    }
}
