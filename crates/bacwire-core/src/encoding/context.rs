use crate::encoding::primitives::{
    bit_string_len, character_string_len, decode_bit_string, decode_character_string,
    decode_date, decode_double, decode_object_id, decode_real, decode_signed, decode_time,
    decode_unsigned, encode_bit_string, encode_character_string, encode_double, encode_real,
    encode_signed, encode_unsigned, signed_len, unsigned_len,
};
use crate::encoding::tag::TagHeader;
use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{BitString, CharacterString, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};

/// Payload type of a context-tagged value.
///
/// Context tag numbers are positional, so the surrounding message decides
/// which of these applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataType {
    Null,
    Boolean,
    Unsigned,
    Signed,
    Real,
    Double,
    OctetString,
    CharacterString,
    BitString,
    Enumerated,
    Date,
    Time,
    ObjectId,
    /// Keep the raw content octets.
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContextValue<'a> {
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
    Unknown(&'a [u8]),
}

impl ContextValue<'_> {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Unsigned(_) => DataType::Unsigned,
            Self::Signed(_) => DataType::Signed,
            Self::Real(_) => DataType::Real,
            Self::Double(_) => DataType::Double,
            Self::OctetString(_) => DataType::OctetString,
            Self::CharacterString(_) => DataType::CharacterString,
            Self::BitString(_) => DataType::BitString,
            Self::Enumerated(_) => DataType::Enumerated,
            Self::Date(_) => DataType::Date,
            Self::Time(_) => DataType::Time,
            Self::ObjectId(_) => DataType::ObjectId,
            Self::Unknown(_) => DataType::Unknown,
        }
    }

    fn content_len(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Unsigned(v) | Self::Enumerated(v) => unsigned_len(*v) as usize,
            Self::Signed(v) => signed_len(*v) as usize,
            Self::Real(_) | Self::Date(_) | Self::Time(_) | Self::ObjectId(_) => 4,
            Self::Double(_) => 8,
            Self::OctetString(v) | Self::Unknown(v) => v.len(),
            Self::CharacterString(v) => character_string_len(v),
            Self::BitString(v) => bit_string_len(v),
        }
    }
}

/// A primitive value under a context-specific tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextTag<'a> {
    pub tag_number: u8,
    pub value: ContextValue<'a>,
}

impl<'a> ContextTag<'a> {
    pub const fn new(tag_number: u8, value: ContextValue<'a>) -> Self {
        Self { tag_number, value }
    }

    /// Content octets after the header. Derived from the value, never stored.
    pub fn actual_length(&self) -> u32 {
        u32::try_from(self.value.content_len()).unwrap_or(u32::MAX)
    }

    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    pub fn header(&self) -> Result<TagHeader, EncodeError> {
        let length =
            u32::try_from(self.value.content_len()).map_err(|_| EncodeError::ValueOutOfRange)?;
        Ok(TagHeader::context(self.tag_number, length))
    }

    pub fn decode(
        r: &mut Reader<'a>,
        expected_tag: u8,
        data_type: DataType,
    ) -> Result<Self, DecodeError> {
        let header = r.read_header()?;
        Self::decode_from_header(r, header, expected_tag, data_type)
    }

    /// Validates a header the caller already consumed, then decodes its
    /// content as `data_type`.
    pub fn decode_from_header(
        r: &mut Reader<'a>,
        header: TagHeader,
        expected_tag: u8,
        data_type: DataType,
    ) -> Result<Self, DecodeError> {
        if !header.is_context() {
            return Err(DecodeError::Validation("expected context tag"));
        }
        if header.actual_tag_number() != expected_tag {
            return Err(DecodeError::Validation("tag number mismatch"));
        }
        if header.is_bracket() {
            return Err(DecodeError::Validation("expected primitive context value"));
        }

        let len = header.actual_length() as usize;
        let value = match data_type {
            DataType::Null => {
                if len != 0 {
                    return Err(DecodeError::InvalidLength);
                }
                ContextValue::Null
            }
            DataType::Boolean => {
                if len != 1 {
                    return Err(DecodeError::InvalidLength);
                }
                match r.read_u8()? {
                    0 => ContextValue::Boolean(false),
                    1 => ContextValue::Boolean(true),
                    _ => return Err(DecodeError::InvalidValue),
                }
            }
            DataType::Unsigned => ContextValue::Unsigned(decode_unsigned(r, len)?),
            DataType::Signed => ContextValue::Signed(decode_signed(r, len)?),
            DataType::Real => ContextValue::Real(decode_real(r, len)?),
            DataType::Double => ContextValue::Double(decode_double(r, len)?),
            DataType::OctetString => ContextValue::OctetString(r.read_exact(len)?),
            DataType::CharacterString => {
                ContextValue::CharacterString(decode_character_string(r, len)?)
            }
            DataType::BitString => ContextValue::BitString(decode_bit_string(r, len)?),
            DataType::Enumerated => ContextValue::Enumerated(decode_unsigned(r, len)?),
            DataType::Date => ContextValue::Date(decode_date(r, len)?),
            DataType::Time => ContextValue::Time(decode_time(r, len)?),
            DataType::ObjectId => ContextValue::ObjectId(decode_object_id(r, len)?),
            DataType::Unknown => ContextValue::Unknown(r.read_exact(len)?),
        };
        Ok(Self {
            tag_number: expected_tag,
            value,
        })
    }
}

impl BitLength for ContextTag<'_> {
    fn length_in_bits(&self) -> u32 {
        let header = self.header().map_or(u32::MAX / 2, |h| h.length_in_bits());
        header.saturating_add(octets_in_bits(self.value.content_len()))
    }
}

impl Encode for ContextTag<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_header(&self.header()?)?;
        match &self.value {
            ContextValue::Null => Ok(()),
            ContextValue::Boolean(v) => w.write_u8(u8::from(*v)),
            ContextValue::Unsigned(v) | ContextValue::Enumerated(v) => {
                encode_unsigned(w, *v).map(|_| ())
            }
            ContextValue::Signed(v) => encode_signed(w, *v).map(|_| ()),
            ContextValue::Real(v) => encode_real(w, *v),
            ContextValue::Double(v) => encode_double(w, *v),
            ContextValue::OctetString(v) | ContextValue::Unknown(v) => w.write_all(v),
            ContextValue::CharacterString(v) => encode_character_string(w, v),
            ContextValue::BitString(v) => encode_bit_string(w, v),
            ContextValue::Date(v) => w.write_all(&v.to_bytes()),
            ContextValue::Time(v) => w.write_all(&v.to_bytes()),
            ContextValue::ObjectId(v) => w.write_be_u32(v.raw()),
        }
    }
}

pub fn encode_ctx_unsigned(w: &mut Writer<'_>, tag_number: u8, value: u32) -> Result<(), EncodeError> {
    ContextTag::new(tag_number, ContextValue::Unsigned(value)).encode(w)
}

pub fn encode_ctx_enumerated(
    w: &mut Writer<'_>,
    tag_number: u8,
    value: u32,
) -> Result<(), EncodeError> {
    ContextTag::new(tag_number, ContextValue::Enumerated(value)).encode(w)
}

pub fn encode_ctx_object_id(
    w: &mut Writer<'_>,
    tag_number: u8,
    value: ObjectId,
) -> Result<(), EncodeError> {
    ContextTag::new(tag_number, ContextValue::ObjectId(value)).encode(w)
}

pub fn decode_ctx_unsigned(r: &mut Reader<'_>, tag_number: u8) -> Result<u32, DecodeError> {
    match ContextTag::decode(r, tag_number, DataType::Unsigned)?.value {
        ContextValue::Unsigned(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_ctx_enumerated(r: &mut Reader<'_>, tag_number: u8) -> Result<u32, DecodeError> {
    match ContextTag::decode(r, tag_number, DataType::Enumerated)?.value {
        ContextValue::Enumerated(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

pub fn decode_ctx_object_id(r: &mut Reader<'_>, tag_number: u8) -> Result<ObjectId, DecodeError> {
    match ContextTag::decode(r, tag_number, DataType::ObjectId)?.value {
        ContextValue::ObjectId(v) => Ok(v),
        _ => Err(DecodeError::InvalidTag),
    }
}

/// Bits a context-tagged unsigned takes on the wire.
pub fn ctx_unsigned_bits(tag_number: u8, value: u32) -> u32 {
    ContextTag::new(tag_number, ContextValue::Unsigned(value)).length_in_bits()
}
