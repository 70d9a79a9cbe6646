use crate::constructed::ConstructedData;
use crate::encoding::context::{decode_ctx_unsigned, encode_ctx_unsigned, ctx_unsigned_bits};
use crate::encoding::optional::optional;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::read_property::{
    decode_property_head, encode_property_head, property_head_bits,
};
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WRITE_PROPERTY: u8 = 0x0F;

/// Lowest and highest command priority.
pub const PRIORITY_RANGE: core::ops::RangeInclusive<u8> = 1..=16;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WritePropertyRequest<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: ConstructedData<'a>,
    pub priority: Option<u8>,
}

impl<'a> WritePropertyRequest<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let (object_id, property_id, array_index) = decode_property_head(r)?;
        let value = ConstructedData::decode(
            r,
            3,
            object_id.object_type(),
            property_id,
            array_index,
        )?;
        let priority = match optional(r, |r| decode_ctx_unsigned(r, 4))? {
            Some(p) => Some(
                u8::try_from(p)
                    .ok()
                    .filter(|p| PRIORITY_RANGE.contains(p))
                    .ok_or(DecodeError::InvalidValue)?,
            ),
            None => None,
        };
        Ok(Self {
            object_id,
            property_id,
            array_index,
            value,
            priority,
        })
    }
}

impl BitLength for WritePropertyRequest<'_> {
    fn length_in_bits(&self) -> u32 {
        property_head_bits(self.object_id, self.property_id, self.array_index)
            + self.value.length_in_bits()
            + self.priority.map_or(0, |p| ctx_unsigned_bits(4, u32::from(p)))
    }
}

impl Encode for WritePropertyRequest<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_property_head(w, self.object_id, self.property_id, self.array_index)?;
        self.value.encode(w)?;
        if let Some(priority) = self.priority {
            if !PRIORITY_RANGE.contains(&priority) {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned(w, 4, u32::from(priority))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WritePropertyRequest;
    use crate::constructed::{ConstructedData, Element, PropertyValue, Selector};
    use crate::encoding::application::ApplicationValue;
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::types::{CharacterString, ObjectId, ObjectType, PropertyId};
    use crate::{DecodeError, EncodeError};

    fn relinquish(priority: Option<u8>) -> WritePropertyRequest<'static> {
        let object_id = ObjectId::new(ObjectType::BinaryOutput, 2);
        WritePropertyRequest {
            object_id,
            property_id: PropertyId::PresentValue,
            array_index: None,
            value: ConstructedData {
                tag_number: 3,
                selector: Selector::new(ObjectType::BinaryOutput, PropertyId::PresentValue, None),
                value: PropertyValue::Single(Element::Application(ApplicationValue::Null)),
            },
            priority,
        }
    }

    #[test]
    fn null_write_with_priority() {
        let req = relinquish(Some(8));
        let bytes = req.to_vec().unwrap();
        assert_eq!(
            bytes,
            [0x0C, 0x01, 0x00, 0x00, 0x02, 0x19, 0x55, 0x3E, 0x00, 0x3F, 0x49, 0x08]
        );
        let mut r = Reader::new(&bytes);
        assert_eq!(WritePropertyRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn priority_out_of_range() {
        assert_eq!(relinquish(Some(17)).to_vec(), Err(EncodeError::ValueOutOfRange));
        let bytes = [0x0C, 0x01, 0x00, 0x00, 0x02, 0x19, 0x55, 0x3E, 0x00, 0x3F, 0x49, 0x00];
        let mut r = Reader::new(&bytes);
        assert_eq!(WritePropertyRequest::decode(&mut r), Err(DecodeError::InvalidValue));
    }

    #[test]
    fn encode_write_property_with_character_string() {
        let object_id = ObjectId::new(ObjectType::AnalogValue, 3);
        let req = WritePropertyRequest {
            object_id,
            property_id: PropertyId::Description,
            array_index: None,
            value: ConstructedData {
                tag_number: 3,
                selector: Selector::new(ObjectType::AnalogValue, PropertyId::Description, None),
                value: PropertyValue::Single(Element::Application(
                    ApplicationValue::CharacterString(CharacterString::utf8("supply air")),
                )),
            },
            priority: None,
        };
        let bytes = req.to_vec().unwrap();
        assert_eq!(bytes.len() as u32 * 8, req.length_in_bits());
        let mut r = Reader::new(&bytes);
        assert_eq!(WritePropertyRequest::decode(&mut r).unwrap(), req);
    }
}
