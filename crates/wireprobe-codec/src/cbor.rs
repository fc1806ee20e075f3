//! Primitive codec for the restricted CBOR profile on the wire.
//!
//! Encode operations append to a [`Writer`]; decode operations consume a
//! prefix of a [`Span`] and return `Option`. `None` means the span was
//! left untouched, so the caller can report the offset of the offending
//! byte. Only the profile's shapes are supported: unsigned and negative
//! integers in shortest form, UTF-16LE byte strings, length-prefixed text
//! strings, doubles, and the fixed sentinel bytes.

use wireprobe_buffers::{Span, Writer};

pub const MAJOR_UNSIGNED: u8 = 0;
pub const MAJOR_NEGATIVE: u8 = 1;
/// Byte string, interpreted as UTF-16LE code units.
pub const MAJOR_STRING16: u8 = 2;
/// Text string, constrained to 7-bit ASCII by the binary parser.
pub const MAJOR_STRING8: u8 = 3;

/// RFC 7049 §2.3 Table 2 simple values.
pub const INITIAL_BYTE_FALSE: u8 = 7 << 5 | 20;
pub const INITIAL_BYTE_TRUE: u8 = 7 << 5 | 21;
pub const INITIAL_BYTE_NULL: u8 = 7 << 5 | 22;
pub const INITIAL_BYTE_DOUBLE: u8 = 7 << 5 | 27;

/// Start of an indefinite-length map; every message begins with this.
pub const INITIAL_BYTE_INDEF_MAP: u8 = 0xbf;
/// Start of an indefinite-length array.
pub const INITIAL_BYTE_INDEF_ARRAY: u8 = 0x9f;
/// Terminates an indefinite-length container.
pub const INITIAL_BYTE_STOP: u8 = 0xff;

/// Writes an initial byte for `major` carrying `value` (a magnitude or a
/// payload length) in the shortest of the five supported widths.
pub(crate) fn write_type_and_value(out: &mut Writer, major: u8, value: u64) {
    let major_bits = major << 5;
    if value <= 23 {
        out.u8(major_bits | value as u8);
    } else if value <= 0xff {
        out.u8(major_bits | 24);
        out.u8(value as u8);
    } else if value <= 0xffff {
        out.u8u16(major_bits | 25, value as u16);
    } else if value <= 0xffff_ffff {
        out.u8u32(major_bits | 26, value as u32);
    } else {
        out.u8u64(major_bits | 27, value);
    }
}

/// Reads an initial byte of `expected_major` and its additional-info
/// payload. Fails on a different major type, on additional info 28..=31,
/// and on a short payload.
fn read_type_and_value(span: &mut Span, expected_major: u8) -> Option<u64> {
    let mut probe = *span;
    let initial = probe.read_u8()?;
    if initial >> 5 != expected_major {
        return None;
    }
    let value = match initial & 0x1f {
        info @ 0..=23 => u64::from(info),
        24 => u64::from(probe.read_u8()?),
        25 => u64::from(probe.read_be_u16()?),
        26 => u64::from(probe.read_be_u32()?),
        27 => probe.read_be_u64()?,
        _ => return None,
    };
    *span = probe;
    Some(value)
}

/// Appends `value` with major type 0.
pub fn encode_unsigned(value: u64, out: &mut Writer) {
    write_type_and_value(out, MAJOR_UNSIGNED, value);
}

/// Consumes an unsigned integer.
pub fn decode_unsigned(span: &mut Span) -> Option<u64> {
    read_type_and_value(span, MAJOR_UNSIGNED)
}

/// Appends `value` (which must be negative) with major type 1.
pub fn encode_negative(value: i64, out: &mut Writer) {
    debug_assert!(value < 0);
    // -1 - value, in arithmetic wide enough for i64::MIN.
    let raw = (-1i128 - i128::from(value)) as u64;
    write_type_and_value(out, MAJOR_NEGATIVE, raw);
}

/// Consumes a negative integer. Fails when the raw magnitude does not fit
/// the i64 result.
pub fn decode_negative(span: &mut Span) -> Option<i64> {
    let mut probe = *span;
    let raw = read_type_and_value(&mut probe, MAJOR_NEGATIVE)?;
    if raw > i64::MAX as u64 {
        return None;
    }
    *span = probe;
    Some((-1i128 - i128::from(raw)) as i64)
}

/// Appends `chars` as a major-2 byte string of `2 * chars.len()` bytes,
/// each code unit little-endian regardless of host endianness.
pub fn encode_utf16_string(chars: &[u16], out: &mut Writer) {
    write_type_and_value(out, MAJOR_STRING16, (chars.len() * 2) as u64);
    for &unit in chars {
        out.buf(&unit.to_le_bytes());
    }
}

/// Consumes a major-2 byte string into UTF-16 code units. Fails on an odd
/// byte length.
pub fn decode_utf16_string(span: &mut Span) -> Option<Vec<u16>> {
    let mut probe = *span;
    let byte_len = read_type_and_value(&mut probe, MAJOR_STRING16)?;
    if byte_len % 2 != 0 {
        return None;
    }
    let bytes = probe.read_bytes(usize::try_from(byte_len).ok()?)?;
    let mut chars = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        chars.push(u16::from_le_bytes([pair[0], pair[1]]));
    }
    *span = probe;
    Some(chars)
}

/// Appends `bytes` as a major-3 text string. Callers are responsible for
/// the bytes being valid text; the binary parser additionally restricts
/// decoded strings to 7-bit ASCII.
pub fn encode_utf8_string(bytes: &[u8], out: &mut Writer) {
    write_type_and_value(out, MAJOR_STRING8, bytes.len() as u64);
    out.buf(bytes);
}

/// Consumes a major-3 text string. No 7-bit check here.
pub fn decode_utf8_string<'a>(span: &mut Span<'a>) -> Option<&'a [u8]> {
    let mut probe = *span;
    let byte_len = read_type_and_value(&mut probe, MAJOR_STRING8)?;
    let bytes = probe.read_bytes(usize::try_from(byte_len).ok()?)?;
    *span = probe;
    Some(bytes)
}

/// Appends `value` as the double initial byte plus 8 big-endian payload
/// bytes. The sign of zero and NaN payload bits go out verbatim.
pub fn encode_double(value: f64, out: &mut Writer) {
    out.u8f64(INITIAL_BYTE_DOUBLE, value);
}

/// Consumes a double. The initial byte must be exactly the 8-byte form;
/// any NaN bit pattern is accepted.
pub fn decode_double(span: &mut Span) -> Option<f64> {
    let mut probe = *span;
    if probe.read_u8()? != INITIAL_BYTE_DOUBLE {
        return None;
    }
    let bits = probe.read_be_u64()?;
    *span = probe;
    Some(f64::from_bits(bits))
}
