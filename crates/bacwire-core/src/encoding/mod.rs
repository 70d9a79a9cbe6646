/// Application-class tag family (tag numbers 0–12, reserved 13 and up).
pub mod application;
/// Opening/closing tag pairs delimiting nested regions.
pub mod bracket;
/// Context-class tag family, typed by the enclosing schema.
pub mod context;
/// Speculative optional fields and counted/terminated arrays.
pub mod optional;
/// Payload codecs shared by both tag families.
pub mod primitives;
/// Zero-copy byte reader for decoding BACnet frames.
pub mod reader;
/// Named diagnostic scopes carried by readers and writers.
pub mod scope;
/// The tag header preamble shared by every value.
pub mod tag;
/// Length accounting and encoding traits.
pub mod traits;
/// Byte writer for encoding BACnet frames into a caller-owned buffer.
pub mod writer;
