//! The event protocol shared by both parsers and both writers.

use crate::status::Status;

/// Sink for the streaming event protocol.
///
/// Both [`parse_json`](crate::parse_json) and
/// [`parse_binary`](crate::parse_binary) drive a `ParserHandler`; the
/// binary encoder and the JSON writer implement it. Drivers guarantee a
/// well-formed event order: containers are balanced, map events alternate
/// `string_key` and a value, and exactly one top-level value is produced
/// unless [`error`](ParserHandler::error) aborts the stream. Handlers do
/// not validate this themselves.
///
/// Strings and keys are UTF-16 code units; surrogate pairs arrive as two
/// units. `int` carries the signed 32-bit range only, and parsers reject
/// wider wire integers instead of truncating. `error` is terminal: no
/// events follow it.
pub trait ParserHandler {
    fn map_begin(&mut self);
    fn map_end(&mut self);
    fn array_begin(&mut self);
    fn array_end(&mut self);
    /// A map key. Only ever emitted between `map_begin` and `map_end`, in
    /// key position.
    fn string_key(&mut self, chars: &[u16]);
    fn string(&mut self, chars: &[u16]);
    /// A raw-bytes value. Reserved: neither parser emits it in the current
    /// profile.
    fn binary(&mut self, bytes: &[u8]);
    fn double(&mut self, value: f64);
    fn int(&mut self, value: i32);
    fn boolean(&mut self, value: bool);
    fn null(&mut self);
    fn error(&mut self, status: Status);
}
