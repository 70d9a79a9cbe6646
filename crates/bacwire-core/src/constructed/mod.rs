//! Constructed property data.
//!
//! A property value travels inside a bracketed region whose content shape is
//! not on the wire: it follows from the object type, the property identifier,
//! and whether an array index was given. [`ConstructedData::decode`] resolves
//! that shape through a static table and falls back to the raw octets when
//! the table has no entry or the content does not fit the entry.

mod leaf;
mod table;

pub use leaf::{AddressBinding, DailySchedule, Element, PriorityValue, TimeStamp, TimeValue};
pub use table::Shape;

use crate::encoding::application::{decode_app_unsigned, ApplicationValue};
use crate::encoding::bracket::{
    bracket_length_in_bits, close_region, encode_closing, encode_opening, open_region,
    read_region_contents, OpeningMark,
};
use crate::encoding::optional::{read_until, Terminator};
use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{ObjectType, PropertyId};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// The discriminators that select a property's codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Selector {
    pub object_type: ObjectType,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl Selector {
    pub const fn new(
        object_type: ObjectType,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Self {
        Self {
            object_type,
            property_id,
            array_index,
        }
    }

    /// The shape this selector resolves to, or `None` for an unmapped property.
    pub fn shape(&self) -> Option<Shape> {
        table::lookup(self.object_type, self.property_id).map(|e| e.shape)
    }
}

/// The content of a property's bracketed region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PropertyValue<'a> {
    /// Array index 0: the number of elements.
    ArrayLength(u32),
    Single(Element<'a>),
    List(Vec<Element<'a>>),
    /// Raw content of a property this codec does not model.
    Unknown(&'a [u8]),
}

impl<'a> PropertyValue<'a> {
    /// The single primitive value a scalar-shaped property mirrors.
    ///
    /// Derived on each call and never encoded.
    pub fn actual_value(&self) -> Option<ApplicationValue<'a>> {
        match self {
            Self::ArrayLength(n) => Some(ApplicationValue::Unsigned(*n)),
            Self::Single(element) => element.as_application().cloned(),
            Self::List(_) | Self::Unknown(_) => None,
        }
    }

    fn decode_shaped(
        r: &mut Reader<'a>,
        mark: OpeningMark,
        selector: Selector,
    ) -> Result<Self, DecodeError> {
        let Some(entry) = table::lookup(selector.object_type, selector.property_id) else {
            log::debug!(
                "no codec for {:?} of {:?}, keeping raw octets",
                selector.property_id,
                selector.object_type
            );
            return read_region_contents(r, mark).map(Self::Unknown);
        };

        let element = entry.element;
        match (entry.shape, selector.array_index) {
            (Shape::Sentinel, _) => Err(DecodeError::ReservedProperty(selector.property_id.to_u32())),
            (Shape::Array, Some(0)) => decode_app_unsigned(r).map(Self::ArrayLength),
            (Shape::Array, Some(_)) | (Shape::Scalar, None) => element(r).map(Self::Single),
            (Shape::Array | Shape::List, None) => {
                read_until(r, Terminator::ClosingTag(mark.tag_number), element).map(Self::List)
            }
            (Shape::Scalar | Shape::List, Some(_)) => {
                Err(DecodeError::Validation("array index on a property that is not an array"))
            }
        }
    }
}

impl BitLength for PropertyValue<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::ArrayLength(n) => ApplicationValue::Unsigned(*n).length_in_bits(),
            Self::Single(element) => element.length_in_bits(),
            Self::List(elements) => elements.length_in_bits(),
            Self::Unknown(raw) => octets_in_bits(raw.len()),
        }
    }
}

impl Encode for PropertyValue<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ArrayLength(n) => ApplicationValue::Unsigned(*n).encode(w),
            Self::Single(element) => element.encode(w),
            Self::List(elements) => elements.iter().try_for_each(|e| e.encode(w)),
            Self::Unknown(raw) => w.write_all(raw),
        }
    }
}

/// A property value under a bracketed context tag, with the selector it was
/// decoded against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConstructedData<'a> {
    pub tag_number: u8,
    pub selector: Selector,
    pub value: PropertyValue<'a>,
}

impl<'a> ConstructedData<'a> {
    /// Decodes the region opened by `tag_number`.
    ///
    /// Content that does not fit the table's shape for `selector` is kept as
    /// [`PropertyValue::Unknown`]. A selector-only property such as `all`
    /// fails with [`DecodeError::ReservedProperty`].
    pub fn decode(
        r: &mut Reader<'a>,
        tag_number: u8,
        object_type: ObjectType,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Result<Self, DecodeError> {
        let selector = Selector::new(object_type, property_id, array_index);
        let mark = open_region(r, tag_number)?;
        let value = r.scoped("PropertyValue", |r| {
            let start = *r;
            match PropertyValue::decode_shaped(r, mark, selector) {
                Ok(value) if r.peek_header()?.is_closing_of(tag_number) => Ok(value),
                Err(err) if !err.keeps_raw() => Err(err),
                outcome => {
                    match outcome {
                        Err(err) => log::debug!(
                            "content of {:?} does not fit its codec ({err}), keeping raw octets",
                            selector.property_id,
                        ),
                        Ok(_) => log::debug!(
                            "content of {:?} has trailing data, keeping raw octets",
                            selector.property_id,
                        ),
                    }
                    *r = start;
                    read_region_contents(r, mark).map(PropertyValue::Unknown)
                }
            }
        })?;
        close_region(r, mark)?;
        Ok(Self {
            tag_number,
            selector,
            value,
        })
    }

    pub fn actual_value(&self) -> Option<ApplicationValue<'a>> {
        self.value.actual_value()
    }
}

impl BitLength for ConstructedData<'_> {
    fn length_in_bits(&self) -> u32 {
        bracket_length_in_bits(self.tag_number) + self.value.length_in_bits()
    }
}

impl Encode for ConstructedData<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.selector.shape() == Some(Shape::Sentinel) {
            return Err(EncodeError::Unsupported);
        }
        encode_opening(w, self.tag_number)?;
        w.scoped("PropertyValue", |w| self.value.encode(w))?;
        encode_closing(w, self.tag_number)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConstructedData, Element, PriorityValue, PropertyValue, Selector, TimeStamp};
    use crate::encoding::application::ApplicationValue;
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::types::{CharacterString, ObjectId, ObjectType, PropertyId};
    use crate::{DecodeError, EncodeError};

    fn decode(
        bytes: &[u8],
        object_type: ObjectType,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Result<ConstructedData<'_>, DecodeError> {
        let mut r = Reader::new(bytes);
        let data = ConstructedData::decode(&mut r, 3, object_type, property_id, array_index)?;
        assert!(r.is_empty());
        assert_eq!(data.to_vec().unwrap(), bytes);
        assert_eq!(data.length_in_bits(), bytes.len() as u32 * 8);
        Ok(data)
    }

    #[test]
    fn present_value_follows_object_type() {
        let real = [0x3E, 0x44, 0x42, 0x91, 0x00, 0x00, 0x3F];
        let data = decode(&real, ObjectType::AnalogInput, PropertyId::PresentValue, None).unwrap();
        assert_eq!(data.actual_value(), Some(ApplicationValue::Real(72.5)));

        let active = [0x3E, 0x91, 0x01, 0x3F];
        let data = decode(&active, ObjectType::BinaryValue, PropertyId::PresentValue, None).unwrap();
        assert_eq!(data.actual_value(), Some(ApplicationValue::Enumerated(1)));

        // An analog object reporting an enumerated value does not fit its codec.
        let data = decode(&active, ObjectType::AnalogValue, PropertyId::PresentValue, None).unwrap();
        assert_eq!(data.value, PropertyValue::Unknown(&[0x91, 0x01]));
    }

    #[test]
    fn unmapped_property_is_kept_raw() {
        let bytes = [0x3E, 0x21, 0x05, 0x1E, 0x09, 0x01, 0x1F, 0x3F];
        let data = decode(
            &bytes,
            ObjectType::Proprietary(600),
            PropertyId::Proprietary(9000),
            None,
        )
        .unwrap();
        assert_eq!(data.value, PropertyValue::Unknown(&bytes[1..7]));
        assert_eq!(data.actual_value(), None);
    }

    #[test]
    fn array_index_selects_shape() {
        // object-list[0] = 3
        let count = [0x3E, 0x21, 0x03, 0x3F];
        let data = decode(&count, ObjectType::Device, PropertyId::ObjectList, Some(0)).unwrap();
        assert_eq!(data.value, PropertyValue::ArrayLength(3));
        assert_eq!(data.actual_value(), Some(ApplicationValue::Unsigned(3)));

        // object-list[2]
        let one = [0x3E, 0xC4, 0x00, 0x00, 0x00, 0x01, 0x3F];
        let data = decode(&one, ObjectType::Device, PropertyId::ObjectList, Some(2)).unwrap();
        assert_eq!(
            data.value,
            PropertyValue::Single(Element::Application(ApplicationValue::ObjectId(
                ObjectId::new(ObjectType::AnalogInput, 1)
            )))
        );

        // whole object-list
        let all = [
            0x3E, 0xC4, 0x02, 0x00, 0x00, 0x01, 0xC4, 0x00, 0x00, 0x00, 0x01, 0x3F,
        ];
        let data = decode(&all, ObjectType::Device, PropertyId::ObjectList, None).unwrap();
        match &data.value {
            PropertyValue::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn priority_array_mixes_null_and_values() {
        let mut bytes = alloc::vec![0x3E];
        bytes.extend_from_slice(&[0x00; 7]);
        bytes.extend_from_slice(&[0x44, 0x42, 0x20, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x00; 8]);
        bytes.push(0x3F);
        let data = decode(&bytes, ObjectType::AnalogOutput, PropertyId::PriorityArray, None).unwrap();
        let PropertyValue::List(slots) = &data.value else {
            panic!("expected list");
        };
        assert_eq!(slots.len(), 16);
        assert_eq!(
            slots[7],
            Element::PriorityValue(PriorityValue::Value(ApplicationValue::Real(40.0)))
        );
    }

    #[test]
    fn event_time_stamps_decode_choices() {
        let bytes = [0x3E, 0x19, 0x05, 0x19, 0x06, 0x19, 0x07, 0x3F];
        let data = decode(&bytes, ObjectType::AnalogInput, PropertyId::EventTimeStamps, None).unwrap();
        assert_eq!(
            data.value,
            PropertyValue::List(alloc::vec![
                Element::TimeStamp(TimeStamp::SequenceNumber(5)),
                Element::TimeStamp(TimeStamp::SequenceNumber(6)),
                Element::TimeStamp(TimeStamp::SequenceNumber(7)),
            ])
        );
    }

    #[test]
    fn padded_integers_are_kept_raw() {
        // vendor-identifier 5 sent in two octets
        let bytes = [0x3E, 0x22, 0x00, 0x05, 0x3F];
        let data = decode(&bytes, ObjectType::Device, PropertyId::VendorIdentifier, None).unwrap();
        assert_eq!(data.value, PropertyValue::Unknown(&bytes[1..4]));

        // object-list[0] with a four-octet count
        let bytes = [0x3E, 0x24, 0x00, 0x00, 0x00, 0x03, 0x3F];
        let data = decode(&bytes, ObjectType::Device, PropertyId::ObjectList, Some(0)).unwrap();
        assert_eq!(data.value, PropertyValue::Unknown(&bytes[1..6]));
    }

    #[test]
    fn object_name_is_a_string() {
        let bytes = [0x3E, 0x75, 0x05, 0x00, b'Z', b'o', b'n', b'e', 0x3F];
        let data = decode(&bytes, ObjectType::AnalogInput, PropertyId::ObjectName, None).unwrap();
        assert_eq!(
            data.actual_value(),
            Some(ApplicationValue::CharacterString(CharacterString::utf8("Zone")))
        );
    }

    #[test]
    fn selector_properties_are_fatal() {
        let bytes = [0x3E, 0x21, 0x01, 0x3F];
        let mut r = Reader::new(&bytes);
        let err = ConstructedData::decode(&mut r, 3, ObjectType::Device, PropertyId::All, None)
            .unwrap_err();
        assert_eq!(err, DecodeError::ReservedProperty(8));
        assert!(!err.is_absence());
        assert_eq!(r.scope_path().to_string(), "PropertyValue");

        let data = ConstructedData {
            tag_number: 3,
            selector: Selector::new(ObjectType::Device, PropertyId::Required, None),
            value: PropertyValue::Unknown(&[]),
        };
        assert_eq!(data.to_vec(), Err(EncodeError::Unsupported));
    }

    #[test]
    fn missing_close_is_structural() {
        let bytes = [0x3E, 0x21, 0x01, 0x2F];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            ConstructedData::decode(&mut r, 3, ObjectType::Device, PropertyId::VendorIdentifier, None),
            Err(DecodeError::BracketMismatch { opened: 3, closed: 2 })
        );
    }
}
