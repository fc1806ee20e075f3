//! The JSON side of the codec: text parser and text writer.

mod parser;
mod writer;

pub use parser::{parse_json, parse_json_utf16};
pub use writer::JsonWriter;
