use crate::encoding::application::{
    decode_app_enumerated, decode_app_object_id, decode_app_unsigned, ApplicationValue,
};
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{ObjectId, Segmentation};
use crate::{DecodeError, EncodeError};

pub const SERVICE_I_AM: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub segmentation: u32,
    pub vendor_id: u32,
}

impl IAmRequest {
    pub fn segmentation(&self) -> Option<Segmentation> {
        Segmentation::from_u32(self.segmentation)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = decode_app_object_id(r)?;
        let max_apdu = decode_app_unsigned(r)?;
        let segmentation = decode_app_enumerated(r)?;
        let vendor_id = decode_app_unsigned(r)?;

        Ok(Self {
            device_id,
            max_apdu,
            segmentation,
            vendor_id,
        })
    }

    fn fields(&self) -> [ApplicationValue<'static>; 4] {
        [
            ApplicationValue::ObjectId(self.device_id),
            ApplicationValue::Unsigned(self.max_apdu),
            ApplicationValue::Enumerated(self.segmentation),
            ApplicationValue::Unsigned(self.vendor_id),
        ]
    }
}

impl BitLength for IAmRequest {
    fn length_in_bits(&self) -> u32 {
        self.fields().length_in_bits()
    }
}

impl Encode for IAmRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.fields().iter().try_for_each(|f| f.encode(w))
    }
}
