//! Bit-exact BACnet/IP wire codec.
//!
//! `bacwire-core` turns raw octets into a typed message tree
//! (BVLC → NPDU/NLM → APDU → constructed property data) and back. At its
//! centre is the generic tag engine in [`encoding`]: the tag header codec,
//! the application and context tag families, bracketed regions, and the
//! speculative optional/array readers. [`constructed`] resolves a property's
//! concrete shape from its object type, property identifier, and array index.
//!
//! Every node can report its encoded size through
//! [`BitLength`](encoding::traits::BitLength) before it is written, so buffers
//! are sized exactly and re-encoding a decoded frame reproduces its bytes.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`serde`** — derives `Serialize` on the decoded tree.
//! - **`defmt`** — derives `defmt::Format` on headers and identifiers for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// APDU (Application Protocol Data Unit) headers and service dispatch.
pub mod apdu;
/// BACnet/IP virtual link control header.
pub mod bvlc;
/// Property values resolved from (object type, property identifier, array index).
pub mod constructed;
/// Tag engine: headers, primitive families, brackets, optional and array readers.
pub mod encoding;
/// Error types for encoding and decoding operations.
pub mod error;
/// Whole-datagram decoding and encoding with located errors.
pub mod frame;
/// NPDU (Network Protocol Data Unit) header and network-layer messages.
pub mod npdu;
/// BACnet service request and response codecs.
pub mod services;
/// Core BACnet data types: object identifiers, property identifiers, dates and strings.
pub mod types;

pub use error::{DecodeError, EncodeError, LocatedDecodeError, LocatedEncodeError};
pub use frame::Frame;
