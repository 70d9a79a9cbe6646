use crate::encoding::scope::ScopePath;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer too small")]
    BufferTooSmall,
    #[error("value out of range")]
    ValueOutOfRange,
    #[error("invalid length")]
    InvalidLength,
    #[error("operation unsupported")]
    Unsupported,
    #[error("{0}")]
    Message(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid tag")]
    InvalidTag,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid value")]
    InvalidValue,
    /// A header, class, or tag-number expectation did not hold.
    ///
    /// This is the only variant optional fields and terminated arrays absorb:
    /// there it means "the field is absent" or "the array ended".
    #[error("validation failed: {0}")]
    Validation(&'static str),
    /// An integer used more octets than its value needs.
    ///
    /// Fatal on its own, but a property value or service body holding one is
    /// kept as raw octets so it still re-encodes byte for byte.
    #[error("integer of {0} octets is not minimally encoded")]
    NonMinimalInteger(u8),
    #[error("closing tag {closed} does not match opening tag {opened}")]
    BracketMismatch { opened: u8, closed: u8 },
    #[error("bracketed region {0} is not closed")]
    UnclosedRegion(u8),
    /// The dispatch table was asked to resolve a reserved property selector.
    #[error("property identifier {0} cannot be decoded in this context")]
    ReservedProperty(u32),
    #[error("operation unsupported")]
    Unsupported,
    #[error("{0}")]
    Message(&'static str),
}

impl DecodeError {
    /// Whether this failure means "not present here" rather than corruption.
    pub const fn is_absence(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether content hitting this failure is kept raw by the constructed-data
    /// dispatcher and the service body codecs.
    pub const fn keeps_raw(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NonMinimalInteger(_))
    }
}

/// A decode failure with the byte offset and scope path where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{error} at byte {offset} in {path}")]
pub struct LocatedDecodeError {
    pub error: DecodeError,
    pub offset: usize,
    pub path: ScopePath,
}

/// An encode failure with the byte offset and scope path where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{error} at byte {offset} in {path}")]
pub struct LocatedEncodeError {
    pub error: EncodeError,
    pub offset: usize,
    pub path: ScopePath,
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, LocatedDecodeError};
    use crate::encoding::scope::ScopePath;
    use alloc::string::ToString;

    #[test]
    fn only_validation_is_absence() {
        assert!(DecodeError::Validation("expected context tag").is_absence());
        assert!(!DecodeError::UnexpectedEof.is_absence());
        assert!(!DecodeError::BracketMismatch {
            opened: 5,
            closed: 3
        }
        .is_absence());
    }

    #[test]
    fn padded_integers_keep_raw_but_are_not_absent() {
        let err = DecodeError::NonMinimalInteger(2);
        assert!(err.keeps_raw());
        assert!(!err.is_absence());
        assert!(DecodeError::Validation("expected context tag").keeps_raw());
        assert!(!DecodeError::InvalidLength.keeps_raw());
    }

    #[test]
    fn located_error_renders_offset_and_path() {
        let mut path = ScopePath::new();
        path.push("Frame");
        path.push("Apdu");
        let err = LocatedDecodeError {
            error: DecodeError::UnexpectedEof,
            offset: 12,
            path,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at byte 12 in Frame/Apdu"
        );
    }
}
