use crate::constructed::ConstructedData;
use crate::encoding::bracket::{
    bracket_length_in_bits, decode_bracketed, encode_bracketed,
};
use crate::encoding::context::{
    ctx_unsigned_bits, decode_ctx_enumerated, decode_ctx_object_id, decode_ctx_unsigned,
    encode_ctx_enumerated, encode_ctx_object_id, encode_ctx_unsigned, ContextTag, ContextValue,
};
use crate::encoding::optional::{optional, read_until, Terminator};
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::error::BacnetError;
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0E;

fn object_id_bits(object_id: ObjectId) -> u32 {
    ContextTag::new(0, ContextValue::ObjectId(object_id)).length_in_bits()
}

fn property_id_bits(tag_number: u8, property_id: PropertyId) -> u32 {
    ContextTag::new(tag_number, ContextValue::Enumerated(property_id.to_u32())).length_in_bits()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl PropertyReference {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let property_id = PropertyId::from_u32(decode_ctx_enumerated(r, 0)?);
        let array_index = optional(r, |r| decode_ctx_unsigned(r, 1))?;
        Ok(Self {
            property_id,
            array_index,
        })
    }
}

impl BitLength for PropertyReference {
    fn length_in_bits(&self) -> u32 {
        property_id_bits(0, self.property_id)
            + self.array_index.map_or(0, |idx| ctx_unsigned_bits(1, idx))
    }
}

impl Encode for PropertyReference {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 0, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 1, idx)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadAccessSpecification {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyReference>,
}

impl ReadAccessSpecification {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let properties = decode_bracketed(r, 1, "ListOfPropertyReferences", |r| {
            read_until(r, Terminator::ClosingTag(1), PropertyReference::decode)
        })?;
        Ok(Self {
            object_id,
            properties,
        })
    }
}

impl BitLength for ReadAccessSpecification {
    fn length_in_bits(&self) -> u32 {
        object_id_bits(self.object_id) + bracket_length_in_bits(1) + self.properties.length_in_bits()
    }
}

impl Encode for ReadAccessSpecification {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_bracketed(w, 1, "ListOfPropertyReferences", |w| {
            self.properties.iter().try_for_each(|p| p.encode(w))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadPropertyMultipleRequest {
    pub specs: Vec<ReadAccessSpecification>,
}

impl ReadPropertyMultipleRequest {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let specs = read_until(r, Terminator::EndOfInput, |r| {
            r.scoped("ReadAccessSpecification", ReadAccessSpecification::decode)
        })?;
        if specs.is_empty() {
            return Err(DecodeError::Validation("empty read access specification list"));
        }
        Ok(Self { specs })
    }
}

impl BitLength for ReadPropertyMultipleRequest {
    fn length_in_bits(&self) -> u32 {
        self.specs.length_in_bits()
    }
}

impl Encode for ReadPropertyMultipleRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.specs.iter().try_for_each(|s| s.encode(w))
    }
}

/// Outcome for one property: its value under `[4]`, or an access error
/// under `[5]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReadResult<'a> {
    Value(ConstructedData<'a>),
    Error(BacnetError),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadResultElement<'a> {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub result: ReadResult<'a>,
}

impl<'a> ReadResultElement<'a> {
    fn decode(r: &mut Reader<'a>, object_id: ObjectId) -> Result<Self, DecodeError> {
        let property_id = PropertyId::from_u32(decode_ctx_enumerated(r, 2)?);
        let array_index = optional(r, |r| decode_ctx_unsigned(r, 3))?;
        let header = r.peek_header()?;
        let result = if header.is_opening_of(4) {
            ReadResult::Value(ConstructedData::decode(
                r,
                4,
                object_id.object_type(),
                property_id,
                array_index,
            )?)
        } else if header.is_opening_of(5) {
            ReadResult::Error(decode_bracketed(r, 5, "PropertyAccessError", BacnetError::decode)?)
        } else {
            return Err(DecodeError::Validation("expected property value or access error"));
        };
        Ok(Self {
            property_id,
            array_index,
            result,
        })
    }
}

impl BitLength for ReadResultElement<'_> {
    fn length_in_bits(&self) -> u32 {
        let result = match &self.result {
            ReadResult::Value(v) => v.length_in_bits(),
            ReadResult::Error(e) => bracket_length_in_bits(5) + e.length_in_bits(),
        };
        property_id_bits(2, self.property_id)
            + self.array_index.map_or(0, |idx| ctx_unsigned_bits(3, idx))
            + result
    }
}

impl Encode for ReadResultElement<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_enumerated(w, 2, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 3, idx)?;
        }
        match &self.result {
            ReadResult::Value(v) => v.encode(w),
            ReadResult::Error(e) => encode_bracketed(w, 5, "PropertyAccessError", |w| e.encode(w)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadAccessResult<'a> {
    pub object_id: ObjectId,
    pub results: Vec<ReadResultElement<'a>>,
}

impl<'a> ReadAccessResult<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = decode_ctx_object_id(r, 0)?;
        let results = decode_bracketed(r, 1, "ListOfResults", |r| {
            read_until(r, Terminator::ClosingTag(1), |r| {
                ReadResultElement::decode(r, object_id)
            })
        })?;
        Ok(Self { object_id, results })
    }
}

impl BitLength for ReadAccessResult<'_> {
    fn length_in_bits(&self) -> u32 {
        object_id_bits(self.object_id) + bracket_length_in_bits(1) + self.results.length_in_bits()
    }
}

impl Encode for ReadAccessResult<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id)?;
        encode_bracketed(w, 1, "ListOfResults", |w| {
            self.results.iter().try_for_each(|e| e.encode(w))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadPropertyMultipleAck<'a> {
    pub results: Vec<ReadAccessResult<'a>>,
}

impl<'a> ReadPropertyMultipleAck<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let results = read_until(r, Terminator::EndOfInput, |r| {
            r.scoped("ReadAccessResult", ReadAccessResult::decode)
        })?;
        Ok(Self { results })
    }
}

impl BitLength for ReadPropertyMultipleAck<'_> {
    fn length_in_bits(&self) -> u32 {
        self.results.length_in_bits()
    }
}

impl Encode for ReadPropertyMultipleAck<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.results.iter().try_for_each(|r| r.encode(w))
    }
}
