//! Binary buffer primitives for the wireprobe codec.
//!
//! [`Span`] is the decode-side cursor: a non-owning, bounds-checked window
//! over a byte slice that shrinks from the left as values are consumed.
//! [`Writer`] is the encode-side buffer: an auto-growing byte vector with
//! big-endian integer writes and combined initial-byte-plus-payload writes.

mod span;
mod writer;

pub use span::Span;
pub use writer::Writer;
