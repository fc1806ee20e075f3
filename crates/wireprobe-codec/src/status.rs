//! Parse outcome reporting.

use thiserror::Error;

/// Everything that can go wrong while parsing or re-encoding a message.
///
/// The JSON kinds are produced by the text parser, the binary kinds by the
/// wire parser. `Ok` exists so a [`Status`] can be carried by value through
/// the handler protocol without wrapping.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("ok")]
    Ok,

    #[error("unprocessed input remains")]
    JsonUnprocessedInputRemains,
    #[error("stack limit exceeded")]
    JsonStackLimitExceeded,
    #[error("no input")]
    JsonNoInput,
    #[error("invalid token")]
    JsonInvalidToken,
    #[error("invalid number")]
    JsonInvalidNumber,
    #[error("invalid string")]
    JsonInvalidString,
    #[error("unexpected array end")]
    JsonUnexpectedArrayEnd,
    #[error("comma or array end expected")]
    JsonCommaOrArrayEndExpected,
    #[error("string literal expected")]
    JsonStringLiteralExpected,
    #[error("colon expected")]
    JsonColonExpected,
    #[error("unexpected map end")]
    JsonUnexpectedMapEnd,
    #[error("comma or map end expected")]
    JsonCommaOrMapEndExpected,
    #[error("value expected")]
    JsonValueExpected,

    #[error("no input")]
    BinaryNoInput,
    #[error("invalid start byte")]
    BinaryInvalidStartByte,
    #[error("unexpected eof, expected value")]
    BinaryUnexpectedEofExpectedValue,
    #[error("unexpected eof in array")]
    BinaryUnexpectedEofInArray,
    #[error("unexpected eof in map")]
    BinaryUnexpectedEofInMap,
    #[error("invalid map key")]
    BinaryInvalidMapKey,
    #[error("stack limit exceeded")]
    BinaryStackLimitExceeded,
    #[error("unsupported value")]
    BinaryUnsupportedValue,
    #[error("invalid utf-16 string")]
    BinaryInvalidString16,
    #[error("invalid utf-8 string")]
    BinaryInvalidString8,
    #[error("string must be 7 bit")]
    BinaryString8MustBe7Bit,
    #[error("invalid double")]
    BinaryInvalidDouble,
    #[error("invalid signed")]
    BinaryInvalidSigned,
}

/// The outcome of a parse or encode: an error kind plus the offset at which
/// it was detected. `pos` is `None` on success and counts input units
/// (bytes for binary and UTF-8 input, code units for UTF-16 input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub error: Error,
    pub pos: Option<usize>,
}

impl Status {
    /// The success status `(Ok, no position)`.
    pub const fn ok() -> Self {
        Self {
            error: Error::Ok,
            pos: None,
        }
    }

    /// An error status at a specific input offset.
    pub const fn at(error: Error, pos: usize) -> Self {
        Self {
            error,
            pos: Some(pos),
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self.error, Error::Ok)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}
