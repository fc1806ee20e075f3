//! Streaming two-way codec between JSON text and a compact binary wire
//! format for inspector-style protocol messages.
//!
//! The binary format is a restricted CBOR profile: messages are
//! indefinite-length maps (`0xbf` .. `0xff`) whose keys are 7-bit text
//! strings and whose values are 32-bit integers, doubles, booleans, null,
//! UTF-16LE byte strings, and nested indefinite-length containers.
//!
//! Both directions flow through one event protocol, [`ParserHandler`]:
//!
//! - JSON text → [`parse_json`] → events → [`JsonToBinaryEncoder`] → bytes
//! - bytes → [`parse_binary`] → events → [`JsonWriter`] → JSON text
//!
//! Outcomes are reported through [`Status`] values (a kind plus an input
//! offset), never through panics; a parser stops at the first error.
//!
//! ```
//! use wireprobe_buffers::Writer;
//! use wireprobe_codec::{
//!     parse_binary, parse_json, JsonToBinaryEncoder, JsonWriter, Status, SystemPlatform,
//! };
//!
//! let json = r#"{"msg":"hi","n":3}"#;
//!
//! let mut wire = Writer::new();
//! let mut status = Status::ok();
//! let mut encoder = JsonToBinaryEncoder::new(&mut wire, &mut status);
//! parse_json(&SystemPlatform, json.as_bytes(), &mut encoder);
//! assert!(status.is_ok());
//! let bytes = wire.flush();
//!
//! let mut text = String::new();
//! let mut status = Status::ok();
//! let mut writer = JsonWriter::new(&SystemPlatform, &mut text, &mut status);
//! parse_binary(&bytes, &mut writer);
//! assert!(status.is_ok());
//! assert_eq!(text, json);
//! ```

mod base64;
pub mod cbor;
mod handler;
mod platform;
mod status;

pub mod binary;
pub mod json;

pub use binary::{parse_binary, JsonToBinaryEncoder};
pub use handler::ParserHandler;
pub use json::{parse_json, parse_json_utf16, JsonWriter};
pub use platform::{Platform, SystemPlatform};
pub use status::{Error, Status};

/// Maximum container nesting accepted by both parsers.
pub const STACK_LIMIT: usize = 1000;
