use crate::constructed::ConstructedData;
use crate::encoding::context::{
    decode_ctx_enumerated, decode_ctx_object_id, decode_ctx_unsigned, encode_ctx_enumerated,
    encode_ctx_object_id, encode_ctx_unsigned, ContextTag, ContextValue,
};
use crate::encoding::optional::optional;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

/// Object, property and optional array index: the head shared by
/// ReadProperty requests, acks and WriteProperty requests.
pub(crate) fn decode_property_head(
    r: &mut Reader<'_>,
) -> Result<(ObjectId, PropertyId, Option<u32>), DecodeError> {
    let object_id = decode_ctx_object_id(r, 0)?;
    let property_id = PropertyId::from_u32(decode_ctx_enumerated(r, 1)?);
    let array_index = optional(r, |r| decode_ctx_unsigned(r, 2))?;
    Ok((object_id, property_id, array_index))
}

pub(crate) fn encode_property_head(
    w: &mut Writer<'_>,
    object_id: ObjectId,
    property_id: PropertyId,
    array_index: Option<u32>,
) -> Result<(), EncodeError> {
    encode_ctx_object_id(w, 0, object_id)?;
    encode_ctx_enumerated(w, 1, property_id.to_u32())?;
    if let Some(idx) = array_index {
        encode_ctx_unsigned(w, 2, idx)?;
    }
    Ok(())
}

pub(crate) fn property_head_bits(
    object_id: ObjectId,
    property_id: PropertyId,
    array_index: Option<u32>,
) -> u32 {
    ContextTag::new(0, ContextValue::ObjectId(object_id)).length_in_bits()
        + ContextTag::new(1, ContextValue::Enumerated(property_id.to_u32())).length_in_bits()
        + array_index.map_or(0, |idx| {
            ContextTag::new(2, ContextValue::Unsigned(idx)).length_in_bits()
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl ReadPropertyRequest {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let (object_id, property_id, array_index) = decode_property_head(r)?;
        Ok(Self {
            object_id,
            property_id,
            array_index,
        })
    }
}

impl BitLength for ReadPropertyRequest {
    fn length_in_bits(&self) -> u32 {
        property_head_bits(self.object_id, self.property_id, self.array_index)
    }
}

impl Encode for ReadPropertyRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_property_head(w, self.object_id, self.property_id, self.array_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadPropertyAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: ConstructedData<'a>,
}

impl<'a> ReadPropertyAck<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let (object_id, property_id, array_index) = decode_property_head(r)?;
        let value = ConstructedData::decode(
            r,
            3,
            object_id.object_type(),
            property_id,
            array_index,
        )?;
        Ok(Self {
            object_id,
            property_id,
            array_index,
            value,
        })
    }
}

impl BitLength for ReadPropertyAck<'_> {
    fn length_in_bits(&self) -> u32 {
        property_head_bits(self.object_id, self.property_id, self.array_index)
            + self.value.length_in_bits()
    }
}

impl Encode for ReadPropertyAck<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_property_head(w, self.object_id, self.property_id, self.array_index)?;
        self.value.encode(w)
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadPropertyAck, ReadPropertyRequest};
    use crate::constructed::PropertyValue;
    use crate::encoding::application::ApplicationValue;
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::types::{ObjectId, ObjectType, PropertyId};

    #[test]
    fn request_roundtrip() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::AnalogInput, 1),
            property_id: PropertyId::PresentValue,
            array_index: None,
        };
        let bytes = req.to_vec().unwrap();
        assert_eq!(bytes, [0x0C, 0x00, 0x00, 0x00, 0x01, 0x19, 0x55]);
        let mut r = Reader::new(&bytes);
        assert_eq!(ReadPropertyRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn ack_resolves_value_from_object_type() {
        let bytes = [
            0x0C, 0x00, 0x00, 0x00, 0x01, 0x19, 0x55, 0x3E, 0x44, 0x42, 0x91, 0x00, 0x00, 0x3F,
        ];
        let mut r = Reader::new(&bytes);
        let ack = ReadPropertyAck::decode(&mut r).unwrap();
        assert!(r.is_empty());
        assert_eq!(ack.value.actual_value(), Some(ApplicationValue::Real(72.5)));
        assert_eq!(ack.length_in_bits(), bytes.len() as u32 * 8);
        assert_eq!(ack.to_vec().unwrap(), bytes);
    }

    #[test]
    fn ack_with_array_index() {
        // device,1 object-list[0] = 4
        let bytes = [
            0x0C, 0x02, 0x00, 0x00, 0x01, 0x19, 0x4C, 0x29, 0x00, 0x3E, 0x21, 0x04, 0x3F,
        ];
        let mut r = Reader::new(&bytes);
        let ack = ReadPropertyAck::decode(&mut r).unwrap();
        assert_eq!(ack.array_index, Some(0));
        assert_eq!(ack.value.value, PropertyValue::ArrayLength(4));
        assert_eq!(ack.to_vec().unwrap(), bytes);
    }
}
