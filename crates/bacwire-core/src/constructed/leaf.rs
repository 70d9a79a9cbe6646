//! Element shapes a property value can take, with their codecs.

use crate::encoding::application::{
    decode_app_date, decode_app_object_id, decode_app_time, decode_app_unsigned,
    ApplicationValue,
};
use crate::encoding::bracket::{bracket_length_in_bits, decode_bracketed, encode_bracketed};
use crate::encoding::context::{ContextTag, ContextValue, DataType};
use crate::encoding::optional::{read_until, Terminator};
use crate::encoding::tag::AppTag;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{Date, DateRange, DateTime, ObjectId, Time};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

fn date_bits() -> u32 {
    ApplicationValue::Date(Date::from_bytes([0; 4])).length_in_bits()
}

fn encode_date_time(w: &mut Writer<'_>, value: &DateTime) -> Result<(), EncodeError> {
    ApplicationValue::Date(value.date).encode(w)?;
    ApplicationValue::Time(value.time).encode(w)
}

fn decode_date_time(r: &mut Reader<'_>) -> Result<DateTime, DecodeError> {
    let date = decode_app_date(r)?;
    let time = decode_app_time(r)?;
    Ok(DateTime { date, time })
}

/// BACnetTimeStamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TimeStamp {
    Time(Time),
    SequenceNumber(u32),
    DateTime(DateTime),
}

impl TimeStamp {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let header = r.peek_header()?;
        if header.is_opening_of(2) {
            return decode_bracketed(r, 2, "DateTime", decode_date_time).map(Self::DateTime);
        }
        if !header.is_context() || header.is_bracket() {
            return Err(DecodeError::Validation("expected time stamp choice"));
        }
        match header.actual_tag_number() {
            0 => match ContextTag::decode(r, 0, DataType::Time)?.value {
                ContextValue::Time(t) => Ok(Self::Time(t)),
                _ => Err(DecodeError::InvalidTag),
            },
            1 => match ContextTag::decode(r, 1, DataType::Unsigned)?.value {
                ContextValue::Unsigned(n) => Ok(Self::SequenceNumber(n)),
                _ => Err(DecodeError::InvalidTag),
            },
            _ => Err(DecodeError::Validation("expected time stamp choice")),
        }
    }
}

impl BitLength for TimeStamp {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Time(t) => ContextTag::new(0, ContextValue::Time(*t)).length_in_bits(),
            Self::SequenceNumber(n) => {
                ContextTag::new(1, ContextValue::Unsigned(*n)).length_in_bits()
            }
            Self::DateTime(_) => bracket_length_in_bits(2) + 2 * date_bits(),
        }
    }
}

impl Encode for TimeStamp {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Time(t) => ContextTag::new(0, ContextValue::Time(*t)).encode(w),
            Self::SequenceNumber(n) => ContextTag::new(1, ContextValue::Unsigned(*n)).encode(w),
            Self::DateTime(dt) => encode_bracketed(w, 2, "DateTime", |w| encode_date_time(w, dt)),
        }
    }
}

/// One slot of a priority array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PriorityValue<'a> {
    Value(ApplicationValue<'a>),
    DateTime(DateTime),
}

impl<'a> PriorityValue<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        if r.peek_header()?.is_opening_of(0) {
            return decode_bracketed(r, 0, "DateTime", decode_date_time).map(Self::DateTime);
        }
        ApplicationValue::decode(r).map(Self::Value)
    }
}

impl BitLength for PriorityValue<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Value(v) => v.length_in_bits(),
            Self::DateTime(_) => bracket_length_in_bits(0) + 2 * date_bits(),
        }
    }
}

impl Encode for PriorityValue<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Value(v) => v.encode(w),
            Self::DateTime(dt) => encode_bracketed(w, 0, "DateTime", |w| encode_date_time(w, dt)),
        }
    }
}

/// Device address binding entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AddressBinding<'a> {
    pub device: ObjectId,
    pub network_number: u16,
    pub mac: &'a [u8],
}

impl<'a> AddressBinding<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let device = decode_app_object_id(r)?;
        let network_number =
            u16::try_from(decode_app_unsigned(r)?).map_err(|_| DecodeError::InvalidValue)?;
        let mac = match ApplicationValue::decode_expecting(r, AppTag::OctetString)? {
            ApplicationValue::OctetString(mac) => mac,
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            device,
            network_number,
            mac,
        })
    }

    fn parts(&self) -> [ApplicationValue<'a>; 3] {
        [
            ApplicationValue::ObjectId(self.device),
            ApplicationValue::Unsigned(u32::from(self.network_number)),
            ApplicationValue::OctetString(self.mac),
        ]
    }
}

impl BitLength for AddressBinding<'_> {
    fn length_in_bits(&self) -> u32 {
        self.parts().length_in_bits()
    }
}

impl Encode for AddressBinding<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.parts().iter().try_for_each(|part| part.encode(w))
    }
}

/// A scheduled value change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeValue<'a> {
    pub time: Time,
    pub value: ApplicationValue<'a>,
}

impl<'a> TimeValue<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let time = decode_app_time(r)?;
        let value = ApplicationValue::decode(r)?;
        Ok(Self { time, value })
    }
}

impl BitLength for TimeValue<'_> {
    fn length_in_bits(&self) -> u32 {
        ApplicationValue::Time(self.time).length_in_bits() + self.value.length_in_bits()
    }
}

impl Encode for TimeValue<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ApplicationValue::Time(self.time).encode(w)?;
        self.value.encode(w)
    }
}

/// One day of a weekly schedule: `[0]` bracketing a list of time/value pairs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailySchedule<'a> {
    pub day_schedule: Vec<TimeValue<'a>>,
}

impl<'a> DailySchedule<'a> {
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let day_schedule = decode_bracketed(r, 0, "DaySchedule", |r| {
            read_until(r, Terminator::ClosingTag(0), TimeValue::decode)
        })?;
        Ok(Self { day_schedule })
    }
}

impl BitLength for DailySchedule<'_> {
    fn length_in_bits(&self) -> u32 {
        bracket_length_in_bits(0) + self.day_schedule.length_in_bits()
    }
}

impl Encode for DailySchedule<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_bracketed(w, 0, "DaySchedule", |w| {
            self.day_schedule.iter().try_for_each(|tv| tv.encode(w))
        })
    }
}

/// A single decoded element of a property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Element<'a> {
    Application(ApplicationValue<'a>),
    DateTime(DateTime),
    DateRange(DateRange),
    TimeStamp(TimeStamp),
    PriorityValue(PriorityValue<'a>),
    AddressBinding(AddressBinding<'a>),
    DailySchedule(DailySchedule<'a>),
}

impl<'a> Element<'a> {
    /// The primitive value this element carries directly, if any.
    pub fn as_application(&self) -> Option<&ApplicationValue<'a>> {
        match self {
            Self::Application(v) | Self::PriorityValue(PriorityValue::Value(v)) => Some(v),
            _ => None,
        }
    }
}

impl BitLength for Element<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Application(v) => v.length_in_bits(),
            Self::DateTime(_) | Self::DateRange(_) => 2 * date_bits(),
            Self::TimeStamp(v) => v.length_in_bits(),
            Self::PriorityValue(v) => v.length_in_bits(),
            Self::AddressBinding(v) => v.length_in_bits(),
            Self::DailySchedule(v) => v.length_in_bits(),
        }
    }
}

impl Encode for Element<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Application(v) => v.encode(w),
            Self::DateTime(v) => encode_date_time(w, v),
            Self::DateRange(v) => {
                ApplicationValue::Date(v.start).encode(w)?;
                ApplicationValue::Date(v.end).encode(w)
            }
            Self::TimeStamp(v) => v.encode(w),
            Self::PriorityValue(v) => v.encode(w),
            Self::AddressBinding(v) => v.encode(w),
            Self::DailySchedule(v) => v.encode(w),
        }
    }
}

/// Decoder for one element of a property.
pub(crate) type DecodeElement = for<'a> fn(&mut Reader<'a>) -> Result<Element<'a>, DecodeError>;

/// Declares a leaf that accepts only the listed application value shapes.
macro_rules! application_leaf {
    ($name:ident => $($accept:pat_param)|+) => {
        pub(crate) fn $name<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
            match ApplicationValue::decode(r)? {
                value @ ($($accept)|+) => Ok(Element::Application(value)),
                _ => Err(DecodeError::Validation("unexpected application tag for property")),
            }
        }
    };
}

use ApplicationValue as V;

application_leaf!(any_application => _);
application_leaf!(unsigned => V::Unsigned(_));
application_leaf!(signed => V::Signed(_));
application_leaf!(real => V::Real(_));
application_leaf!(boolean => V::Boolean(_));
application_leaf!(enumerated => V::Enumerated(_));
application_leaf!(character_string => V::CharacterString(_));
application_leaf!(bit_string => V::BitString(_));
application_leaf!(object_id => V::ObjectId(_));
application_leaf!(date => V::Date(_));
application_leaf!(time => V::Time(_));
application_leaf!(commandable_real => V::Real(_) | V::Null);
application_leaf!(commandable_enumerated => V::Enumerated(_) | V::Null);
application_leaf!(commandable_unsigned => V::Unsigned(_) | V::Null);

pub(crate) fn date_time<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    decode_date_time(r).map(Element::DateTime)
}

pub(crate) fn date_range<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    let start = decode_app_date(r)?;
    let end = decode_app_date(r)?;
    Ok(Element::DateRange(DateRange { start, end }))
}

pub(crate) fn time_stamp<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    TimeStamp::decode(r).map(Element::TimeStamp)
}

pub(crate) fn priority_value<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    PriorityValue::decode(r).map(Element::PriorityValue)
}

pub(crate) fn address_binding<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    AddressBinding::decode(r).map(Element::AddressBinding)
}

pub(crate) fn daily_schedule<'a>(r: &mut Reader<'a>) -> Result<Element<'a>, DecodeError> {
    DailySchedule::decode(r).map(Element::DailySchedule)
}
