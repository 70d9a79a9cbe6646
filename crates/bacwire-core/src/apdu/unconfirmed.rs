use crate::apdu::confirmed::check_type;
use crate::apdu::ApduType;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Header for a BACnet Unconfirmed-Request APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnconfirmedRequestHeader {
    pub service_choice: u8,
}

impl UnconfirmedRequestHeader {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        check_type(r.read_u8()?, ApduType::UnconfirmedRequest, 0)?;
        Ok(Self {
            service_choice: r.read_u8()?,
        })
    }
}

impl BitLength for UnconfirmedRequestHeader {
    fn length_in_bits(&self) -> u32 {
        16
    }
}

impl Encode for UnconfirmedRequestHeader {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::UnconfirmedRequest as u8) << 4)?;
        w.write_u8(self.service_choice)
    }
}
