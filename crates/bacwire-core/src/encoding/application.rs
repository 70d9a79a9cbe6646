use crate::encoding::primitives::{
    bit_string_len, character_string_len, decode_bit_string, decode_character_string,
    decode_date, decode_double, decode_object_id, decode_real, decode_signed, decode_time,
    decode_unsigned, encode_bit_string, encode_character_string, encode_double, encode_real,
    encode_signed, encode_unsigned, signed_len, unsigned_len,
};
use crate::encoding::tag::{AppTag, TagHeader};
use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{BitString, CharacterString, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};

fn u32_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueOutOfRange)
}

/// A primitive value carried under an application-class tag.
///
/// The tag number on the wire selects the variant. Reserved tag numbers
/// (13 and above) decode as [`Reserved`](Self::Reserved) with their raw
/// content so newer encodings pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ApplicationValue<'a> {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(&'a [u8]),
    CharacterString(CharacterString<'a>),
    BitString(BitString<'a>),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
    Reserved { tag_number: u8, data: &'a [u8] },
}

impl<'a> ApplicationValue<'a> {
    pub fn app_tag(&self) -> Option<AppTag> {
        Some(match self {
            Self::Null => AppTag::Null,
            Self::Boolean(_) => AppTag::Boolean,
            Self::Unsigned(_) => AppTag::UnsignedInt,
            Self::Signed(_) => AppTag::SignedInt,
            Self::Real(_) => AppTag::Real,
            Self::Double(_) => AppTag::Double,
            Self::OctetString(_) => AppTag::OctetString,
            Self::CharacterString(_) => AppTag::CharacterString,
            Self::BitString(_) => AppTag::BitString,
            Self::Enumerated(_) => AppTag::Enumerated,
            Self::Date(_) => AppTag::Date,
            Self::Time(_) => AppTag::Time,
            Self::ObjectId(_) => AppTag::ObjectId,
            Self::Reserved { .. } => return None,
        })
    }

    pub fn tag_number(&self) -> u8 {
        match self {
            Self::Reserved { tag_number, .. } => *tag_number,
            other => other.app_tag().map_or(0, |t| t as u8),
        }
    }

    fn content_len(&self) -> usize {
        match self {
            Self::Null | Self::Boolean(_) => 0,
            Self::Unsigned(v) | Self::Enumerated(v) => unsigned_len(*v) as usize,
            Self::Signed(v) => signed_len(*v) as usize,
            Self::Real(_) | Self::Date(_) | Self::Time(_) | Self::ObjectId(_) => 4,
            Self::Double(_) => 8,
            Self::OctetString(v) => v.len(),
            Self::CharacterString(v) => character_string_len(v),
            Self::BitString(v) => bit_string_len(v),
            Self::Reserved { data, .. } => data.len(),
        }
    }

    /// The header this value is written under. A boolean keeps its value in
    /// the length/value/type field.
    pub fn header(&self) -> Result<TagHeader, EncodeError> {
        let length = match self {
            Self::Boolean(v) => u32::from(*v),
            other => u32_len(other.content_len())?,
        };
        Ok(TagHeader::application(self.tag_number(), length))
    }

    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let header = r.read_header()?;
        Self::decode_from_header(r, header)
    }

    /// Decodes the content for a header the caller already consumed.
    pub fn decode_from_header(r: &mut Reader<'a>, header: TagHeader) -> Result<Self, DecodeError> {
        if !header.is_application() {
            return Err(DecodeError::Validation("expected application tag"));
        }
        let len = header.actual_length() as usize;
        let Some(tag) = header.app_tag() else {
            return Ok(Self::Reserved {
                tag_number: header.actual_tag_number(),
                data: r.read_exact(len)?,
            });
        };
        Ok(match tag {
            AppTag::Null => {
                if len != 0 {
                    return Err(DecodeError::InvalidLength);
                }
                Self::Null
            }
            AppTag::Boolean => match len {
                0 => Self::Boolean(false),
                1 => Self::Boolean(true),
                _ => return Err(DecodeError::InvalidValue),
            },
            AppTag::UnsignedInt => Self::Unsigned(decode_unsigned(r, len)?),
            AppTag::SignedInt => Self::Signed(decode_signed(r, len)?),
            AppTag::Real => Self::Real(decode_real(r, len)?),
            AppTag::Double => Self::Double(decode_double(r, len)?),
            AppTag::OctetString => Self::OctetString(r.read_exact(len)?),
            AppTag::CharacterString => Self::CharacterString(decode_character_string(r, len)?),
            AppTag::BitString => Self::BitString(decode_bit_string(r, len)?),
            AppTag::Enumerated => Self::Enumerated(decode_unsigned(r, len)?),
            AppTag::Date => Self::Date(decode_date(r, len)?),
            AppTag::Time => Self::Time(decode_time(r, len)?),
            AppTag::ObjectId => Self::ObjectId(decode_object_id(r, len)?),
        })
    }

    /// Decodes a value and checks it is of the expected kind.
    pub fn decode_expecting(r: &mut Reader<'a>, expected: AppTag) -> Result<Self, DecodeError> {
        let header = r.peek_header()?;
        if header.app_tag() != Some(expected) {
            return Err(DecodeError::Validation("unexpected application tag"));
        }
        Self::decode(r)
    }
}

impl BitLength for ApplicationValue<'_> {
    fn length_in_bits(&self) -> u32 {
        let header = self
            .header()
            .map_or(u32::MAX / 2, |h| h.length_in_bits());
        header.saturating_add(octets_in_bits(self.content_len()))
    }
}

impl Encode for ApplicationValue<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_header(&self.header()?)?;
        match self {
            Self::Null | Self::Boolean(_) => Ok(()),
            Self::Unsigned(v) | Self::Enumerated(v) => encode_unsigned(w, *v).map(|_| ()),
            Self::Signed(v) => encode_signed(w, *v).map(|_| ()),
            Self::Real(v) => encode_real(w, *v),
            Self::Double(v) => encode_double(w, *v),
            Self::OctetString(v) => w.write_all(v),
            Self::CharacterString(v) => encode_character_string(w, v),
            Self::BitString(v) => encode_bit_string(w, v),
            Self::Date(v) => w.write_all(&v.to_bytes()),
            Self::Time(v) => w.write_all(&v.to_bytes()),
            Self::ObjectId(v) => w.write_be_u32(v.raw()),
            Self::Reserved { tag_number, data } => {
                if AppTag::from_u8(*tag_number).is_some() {
                    return Err(EncodeError::ValueOutOfRange);
                }
                w.write_all(data)
            }
        }
    }
}

pub fn decode_app_unsigned(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match ApplicationValue::decode_expecting(r, AppTag::UnsignedInt)? {
        ApplicationValue::Unsigned(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_enumerated(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    match ApplicationValue::decode_expecting(r, AppTag::Enumerated)? {
        ApplicationValue::Enumerated(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_object_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
    match ApplicationValue::decode_expecting(r, AppTag::ObjectId)? {
        ApplicationValue::ObjectId(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_date(r: &mut Reader<'_>) -> Result<Date, DecodeError> {
    match ApplicationValue::decode_expecting(r, AppTag::Date)? {
        ApplicationValue::Date(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_app_time(r: &mut Reader<'_>) -> Result<Time, DecodeError> {
    match ApplicationValue::decode_expecting(r, AppTag::Time)? {
        ApplicationValue::Time(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_app_unsigned, ApplicationValue};
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::types::{BitString, CharacterSet, CharacterString, Date, ObjectId, ObjectType, Time};
    use crate::DecodeError;
    use proptest::prelude::*;

    fn roundtrip(v: &ApplicationValue<'_>) -> alloc::vec::Vec<u8> {
        let bytes = v.to_vec().unwrap();
        assert_eq!(bytes.len() as u32 * 8, v.length_in_bits());
        let mut r = Reader::new(&bytes);
        assert_eq!(&ApplicationValue::decode(&mut r).unwrap(), v);
        assert!(r.is_empty());
        bytes
    }

    #[test]
    fn value_codec_roundtrip_supported_types() {
        let values = [
            ApplicationValue::Null,
            ApplicationValue::Boolean(true),
            ApplicationValue::Boolean(false),
            ApplicationValue::Unsigned(123),
            ApplicationValue::Signed(-123),
            ApplicationValue::Real(12.5),
            ApplicationValue::Double(42.25),
            ApplicationValue::OctetString(&[1, 2, 3]),
            ApplicationValue::CharacterString(CharacterString::utf8("hello")),
            ApplicationValue::CharacterString(CharacterString::new(CharacterSet::Ucs2, &[0, 0x41])),
            ApplicationValue::BitString(BitString::new(1, &[0b1010_0000])),
            ApplicationValue::Enumerated(9),
            ApplicationValue::Date(Date {
                year_since_1900: 124,
                month: 2,
                day: 3,
                weekday: 6,
            }),
            ApplicationValue::Time(Time {
                hour: 1,
                minute: 2,
                second: 3,
                hundredths: 4,
            }),
            ApplicationValue::ObjectId(ObjectId::new(ObjectType::Device, 1)),
        ];

        for v in &values {
            roundtrip(v);
        }
    }

    #[test]
    fn boolean_lives_in_length_field() {
        assert_eq!(roundtrip(&ApplicationValue::Boolean(true)), [0x11]);
        assert_eq!(roundtrip(&ApplicationValue::Boolean(false)), [0x10]);
        let mut r = Reader::new(&[0x12]);
        assert_eq!(
            ApplicationValue::decode(&mut r),
            Err(DecodeError::InvalidValue)
        );
    }

    #[test]
    fn known_wire_forms() {
        assert_eq!(roundtrip(&ApplicationValue::Unsigned(42)), [0x21, 0x2A]);
        assert_eq!(roundtrip(&ApplicationValue::Signed(-1)), [0x31, 0xFF]);
        assert_eq!(
            roundtrip(&ApplicationValue::Real(72.5)),
            [0x44, 0x42, 0x91, 0x00, 0x00]
        );
        assert_eq!(
            roundtrip(&ApplicationValue::CharacterString(CharacterString::utf8("AHU"))),
            [0x74, 0x00, b'A', b'H', b'U']
        );
        assert_eq!(
            roundtrip(&ApplicationValue::ObjectId(ObjectId::new(ObjectType::AnalogInput, 5))),
            [0xC4, 0x00, 0x00, 0x00, 0x05]
        );
    }

    #[test]
    fn reserved_tag_numbers_pass_through() {
        let bytes = [0xD2, 0xAB, 0xCD];
        let mut r = Reader::new(&bytes);
        let v = ApplicationValue::decode(&mut r).unwrap();
        assert_eq!(
            v,
            ApplicationValue::Reserved {
                tag_number: 13,
                data: &[0xAB, 0xCD]
            }
        );
        assert_eq!(v.to_vec().unwrap(), bytes);
    }

    #[test]
    fn context_class_is_a_validation_failure() {
        let mut r = Reader::new(&[0x09, 0x2A]);
        assert_eq!(
            ApplicationValue::decode(&mut r),
            Err(DecodeError::Validation("expected application tag"))
        );
    }

    #[test]
    fn typed_helper_checks_kind_without_consuming() {
        let mut r = Reader::new(&[0x91, 0x03]);
        assert!(decode_app_unsigned(&mut r).unwrap_err().is_absence());
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn padded_integers_are_rejected() {
        let mut r = Reader::new(&[0x22, 0x00, 0x2A]);
        assert_eq!(
            ApplicationValue::decode(&mut r),
            Err(DecodeError::NonMinimalInteger(2))
        );
        let mut r = Reader::new(&[0x92, 0x00, 0x01]);
        assert_eq!(
            ApplicationValue::decode(&mut r),
            Err(DecodeError::NonMinimalInteger(2))
        );
        let mut r = Reader::new(&[0x32, 0x00, 0x7F]);
        assert_eq!(
            ApplicationValue::decode(&mut r),
            Err(DecodeError::NonMinimalInteger(2))
        );
        // two octets are needed here, so this one is minimal
        let mut r = Reader::new(&[0x22, 0x01, 0x00]);
        assert_eq!(ApplicationValue::decode(&mut r), Ok(ApplicationValue::Unsigned(256)));
    }

    #[test]
    fn enumerated_keeps_vendor_values() {
        let v = ApplicationValue::Enumerated(70_000);
        assert_eq!(roundtrip(&v), [0x93, 0x01, 0x11, 0x70]);
    }

    proptest! {
        #[test]
        fn unsigned_value_roundtrip(v in any::<u32>()) {
            let value = ApplicationValue::Unsigned(v);
            let bytes = value.to_vec().unwrap();
            prop_assert_eq!(bytes.len() as u32 * 8, value.length_in_bits());
            let mut r = Reader::new(&bytes);
            prop_assert_eq!(ApplicationValue::decode(&mut r).unwrap(), value);
        }

        #[test]
        fn octet_string_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..400)) {
            let value = ApplicationValue::OctetString(&data);
            let bytes = value.to_vec().unwrap();
            prop_assert_eq!(bytes.len() as u32 * 8, value.length_in_bits());
            let mut r = Reader::new(&bytes);
            prop_assert_eq!(ApplicationValue::decode(&mut r).unwrap(), value);
        }
    }
}
