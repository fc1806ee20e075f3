//! JSON writer: handler events in, JSON text out.

use crate::base64::to_base64;
use crate::handler::ParserHandler;
use crate::platform::Platform;
use crate::status::Status;

const BIN_URI_PREFIX: &str = "data:application/octet-stream;base64,";

enum Container {
    Map,
    Array,
}

struct Frame {
    container: Container,
    members: usize,
}

/// A [`ParserHandler`] that renders the event stream as compact JSON text
/// into a caller-owned `String`.
///
/// The output is pure ASCII: every code unit at or above 0x7f (and each
/// half of a surrogate pair) is written as a lowercase `\uXXXX` escape,
/// so the text round-trips through the binary encoder byte for byte. On
/// `error` the buffer is cleared and the status stored; all later events
/// are dropped.
pub struct JsonWriter<'a> {
    platform: &'a dyn Platform,
    out: &'a mut String,
    status: &'a mut Status,
    stack: Vec<Frame>,
    after_key: bool,
}

impl<'a> JsonWriter<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        out: &'a mut String,
        status: &'a mut Status,
    ) -> Self {
        Self {
            platform,
            out,
            status,
            stack: Vec::new(),
            after_key: false,
        }
    }

    /// Separator before a value: a colon after a key, a comma between
    /// container members.
    fn begin_value(&mut self) {
        if self.after_key {
            self.out.push(':');
            self.after_key = false;
        } else if let Some(frame) = self.stack.last() {
            if frame.members > 0 {
                self.out.push(',');
            }
        }
    }

    fn end_value(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.members += 1;
        }
    }

    fn write_string(&mut self, chars: &[u16]) {
        self.out.push('"');
        for &unit in chars {
            match unit {
                0x22 => self.out.push_str("\\\""),
                0x5c => self.out.push_str("\\\\"),
                0x08 => self.out.push_str("\\b"),
                0x0c => self.out.push_str("\\f"),
                0x0a => self.out.push_str("\\n"),
                0x0d => self.out.push_str("\\r"),
                0x09 => self.out.push_str("\\t"),
                0x20..=0x7e => self.out.push(unit as u8 as char),
                _ => self.out.push_str(&format!("\\u{unit:04x}")),
            }
        }
        self.out.push('"');
    }
}

impl ParserHandler for JsonWriter<'_> {
    fn map_begin(&mut self) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push('{');
        self.stack.push(Frame {
            container: Container::Map,
            members: 0,
        });
    }

    fn map_end(&mut self) {
        if !self.status.is_ok() {
            return;
        }
        debug_assert!(matches!(
            self.stack.last(),
            Some(Frame {
                container: Container::Map,
                ..
            })
        ));
        self.stack.pop();
        self.out.push('}');
        self.end_value();
    }

    fn array_begin(&mut self) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push('[');
        self.stack.push(Frame {
            container: Container::Array,
            members: 0,
        });
    }

    fn array_end(&mut self) {
        if !self.status.is_ok() {
            return;
        }
        debug_assert!(matches!(
            self.stack.last(),
            Some(Frame {
                container: Container::Array,
                ..
            })
        ));
        self.stack.pop();
        self.out.push(']');
        self.end_value();
    }

    fn string_key(&mut self, chars: &[u16]) {
        if !self.status.is_ok() {
            return;
        }
        if let Some(frame) = self.stack.last() {
            if frame.members > 0 {
                self.out.push(',');
            }
        }
        self.write_string(chars);
        self.after_key = true;
    }

    fn string(&mut self, chars: &[u16]) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.write_string(chars);
        self.end_value();
    }

    fn binary(&mut self, bytes: &[u8]) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push('"');
        self.out.push_str(BIN_URI_PREFIX);
        self.out.push_str(&to_base64(bytes));
        self.out.push('"');
        self.end_value();
    }

    fn double(&mut self, value: f64) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push_str(&self.platform.double_to_string(value));
        self.end_value();
    }

    fn int(&mut self, value: i32) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push_str(&value.to_string());
        self.end_value();
    }

    fn boolean(&mut self, value: bool) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push_str(if value { "true" } else { "false" });
        self.end_value();
    }

    fn null(&mut self) {
        if !self.status.is_ok() {
            return;
        }
        self.begin_value();
        self.out.push_str("null");
        self.end_value();
    }

    fn error(&mut self, status: Status) {
        if !self.status.is_ok() {
            return;
        }
        self.out.clear();
        *self.status = status;
    }
}
