use crate::encoding::traits::BitLength;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Tag-number nibble announcing an extension octet.
pub const EXTENDED_TAG_NUMBER: u8 = 15;
/// Largest tag number; 255 is reserved.
pub const MAX_TAG_NUMBER: u8 = 254;
/// Length/value/type code announcing an extended length.
pub const EXTENDED_LENGTH: u8 = 5;
pub const OPENING_TAG: u8 = 6;
pub const CLOSING_TAG: u8 = 7;

const CLASS_BIT: u8 = 0b0000_1000;
const LENGTH_U16_MARKER: u8 = 254;
const LENGTH_U32_MARKER: u8 = 255;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    /// Maps an application tag number; 13–254 are reserved and yield `None`.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Null),
            1 => Some(Self::Boolean),
            2 => Some(Self::UnsignedInt),
            3 => Some(Self::SignedInt),
            4 => Some(Self::Real),
            5 => Some(Self::Double),
            6 => Some(Self::OctetString),
            7 => Some(Self::CharacterString),
            8 => Some(Self::BitString),
            9 => Some(Self::Enumerated),
            10 => Some(Self::Date),
            11 => Some(Self::Time),
            12 => Some(Self::ObjectId),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagClass {
    Application,
    ContextSpecific,
}

/// The preamble in front of every BACnet value.
///
/// Wire layout of the first octet is `[tag number:4][class:1][length/value/type:3]`.
/// Tag numbers above 14 move to one extension octet; lengths above 4 move to
/// one, three, or five extension octets. Constructors always pick the
/// minimal form, and [`decode`](Self::decode) rejects non-minimal forms, so a
/// decoded header re-encodes to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TagHeader {
    class: TagClass,
    tag_number: u8,
    length_value_type: u8,
    length: u32,
}

impl TagHeader {
    pub const fn application(tag_number: u8, length: u32) -> Self {
        Self::with_length(TagClass::Application, tag_number, length)
    }

    pub const fn context(tag_number: u8, length: u32) -> Self {
        Self::with_length(TagClass::ContextSpecific, tag_number, length)
    }

    pub const fn opening(tag_number: u8) -> Self {
        Self {
            class: TagClass::ContextSpecific,
            tag_number,
            length_value_type: OPENING_TAG,
            length: 0,
        }
    }

    pub const fn closing(tag_number: u8) -> Self {
        Self {
            class: TagClass::ContextSpecific,
            tag_number,
            length_value_type: CLOSING_TAG,
            length: 0,
        }
    }

    const fn with_length(class: TagClass, tag_number: u8, length: u32) -> Self {
        let length_value_type = if length <= 4 {
            length as u8
        } else {
            EXTENDED_LENGTH
        };
        Self {
            class,
            tag_number,
            length_value_type,
            length,
        }
    }

    pub const fn class(&self) -> TagClass {
        self.class
    }

    /// The tag number, whether it was carried inline or in the extension octet.
    pub const fn actual_tag_number(&self) -> u8 {
        self.tag_number
    }

    pub const fn length_value_type(&self) -> u8 {
        self.length_value_type
    }

    /// The content length, whether it was carried inline or extended.
    ///
    /// Zero for opening and closing tags. For an application boolean this is
    /// the value itself.
    pub const fn actual_length(&self) -> u32 {
        self.length
    }

    pub const fn is_application(&self) -> bool {
        matches!(self.class, TagClass::Application)
    }

    pub const fn is_context(&self) -> bool {
        matches!(self.class, TagClass::ContextSpecific)
    }

    pub const fn is_opening(&self) -> bool {
        self.length_value_type == OPENING_TAG
    }

    pub const fn is_closing(&self) -> bool {
        self.length_value_type == CLOSING_TAG
    }

    pub const fn is_bracket(&self) -> bool {
        self.is_opening() || self.is_closing()
    }

    pub const fn is_opening_of(&self, tag_number: u8) -> bool {
        self.is_opening() && self.tag_number == tag_number
    }

    pub const fn is_closing_of(&self, tag_number: u8) -> bool {
        self.is_closing() && self.tag_number == tag_number
    }

    /// The application tag kind, for application-class headers with a
    /// standard tag number.
    pub const fn app_tag(&self) -> Option<AppTag> {
        if self.is_application() {
            AppTag::from_u8(self.tag_number)
        } else {
            None
        }
    }

    /// Octets of content following the header.
    pub const fn content_length(&self) -> u32 {
        if self.is_bracket()
            || (self.is_application() && self.tag_number == AppTag::Boolean as u8)
        {
            0
        } else {
            self.length
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.tag_number > MAX_TAG_NUMBER {
            return Err(EncodeError::ValueOutOfRange);
        }
        if self.is_bracket() && self.is_application() {
            return Err(EncodeError::InvalidLength);
        }

        let mut first = if self.tag_number < EXTENDED_TAG_NUMBER {
            self.tag_number << 4
        } else {
            EXTENDED_TAG_NUMBER << 4
        };
        if self.is_context() {
            first |= CLASS_BIT;
        }
        first |= self.length_value_type;
        w.write_u8(first)?;

        if self.tag_number >= EXTENDED_TAG_NUMBER {
            w.write_u8(self.tag_number)?;
        }

        if self.length_value_type == EXTENDED_LENGTH {
            if self.length < LENGTH_U16_MARKER as u32 {
                w.write_u8(self.length as u8)?;
            } else if self.length <= u16::MAX as u32 {
                w.write_u8(LENGTH_U16_MARKER)?;
                w.write_be_u16(self.length as u16)?;
            } else {
                w.write_u8(LENGTH_U32_MARKER)?;
                w.write_be_u32(self.length)?;
            }
        }

        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let first = r.read_u8()?;
        let class = if (first & CLASS_BIT) != 0 {
            TagClass::ContextSpecific
        } else {
            TagClass::Application
        };

        let mut tag_number = first >> 4;
        if tag_number == EXTENDED_TAG_NUMBER {
            tag_number = r.read_u8()?;
            if !(EXTENDED_TAG_NUMBER..=MAX_TAG_NUMBER).contains(&tag_number) {
                return Err(DecodeError::InvalidTag);
            }
        }

        let length_value_type = first & 0x07;
        let length = match length_value_type {
            OPENING_TAG | CLOSING_TAG => {
                if class == TagClass::Application {
                    return Err(DecodeError::InvalidLength);
                }
                0
            }
            EXTENDED_LENGTH => decode_extended_length(r)?,
            inline => inline as u32,
        };

        Ok(Self {
            class,
            tag_number,
            length_value_type,
            length,
        })
    }
}

impl BitLength for TagHeader {
    fn length_in_bits(&self) -> u32 {
        let mut octets = 1;
        if self.tag_number >= EXTENDED_TAG_NUMBER {
            octets += 1;
        }
        if self.length_value_type == EXTENDED_LENGTH {
            octets += if self.length < LENGTH_U16_MARKER as u32 {
                1
            } else if self.length <= u16::MAX as u32 {
                3
            } else {
                5
            };
        }
        octets * 8
    }
}

fn decode_extended_length(r: &mut Reader<'_>) -> Result<u32, DecodeError> {
    let (length, minimum) = match r.read_u8()? {
        LENGTH_U16_MARKER => (r.read_be_u16()? as u32, LENGTH_U16_MARKER as u32),
        LENGTH_U32_MARKER => (r.read_be_u32()?, u16::MAX as u32 + 1),
        short => (short as u32, EXTENDED_LENGTH as u32),
    };
    if length < minimum {
        return Err(DecodeError::InvalidLength);
    }
    Ok(length)
}
