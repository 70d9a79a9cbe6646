use crate::encoding::application::{decode_app_enumerated, ApplicationValue};
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{ErrorClass, ErrorCode};
use crate::{DecodeError, EncodeError};

/// An error class/code pair, as carried by an Error PDU and by a
/// ReadPropertyMultiple access error.
///
/// Both values are kept raw so vendor codes survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BacnetError {
    pub error_class: u32,
    pub error_code: u32,
}

impl BacnetError {
    pub const fn new(class: ErrorClass, code: ErrorCode) -> Self {
        Self {
            error_class: class.to_u32(),
            error_code: code.to_u32(),
        }
    }

    pub fn class(&self) -> Option<ErrorClass> {
        ErrorClass::from_u32(self.error_class)
    }

    pub fn code(&self) -> Option<ErrorCode> {
        ErrorCode::from_u32(self.error_code)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            error_class: decode_app_enumerated(r)?,
            error_code: decode_app_enumerated(r)?,
        })
    }

    fn fields(&self) -> [ApplicationValue<'static>; 2] {
        [
            ApplicationValue::Enumerated(self.error_class),
            ApplicationValue::Enumerated(self.error_code),
        ]
    }
}

impl BitLength for BacnetError {
    fn length_in_bits(&self) -> u32 {
        self.fields().length_in_bits()
    }
}

impl Encode for BacnetError {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.fields().iter().try_for_each(|f| f.encode(w))
    }
}
