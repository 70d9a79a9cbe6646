pub mod error;
pub mod i_am;
pub mod read_property;
pub mod read_property_multiple;
pub mod who_is;
pub mod write_property;

pub use error::BacnetError;
pub use i_am::{IAmRequest, SERVICE_I_AM};
pub use read_property::{ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY};
pub use read_property_multiple::{
    PropertyReference, ReadAccessResult, ReadAccessSpecification, ReadPropertyMultipleAck,
    ReadPropertyMultipleRequest, ReadResult, ReadResultElement, SERVICE_READ_PROPERTY_MULTIPLE,
};
pub use who_is::{WhoIsRequest, SERVICE_WHO_IS};
pub use write_property::{WritePropertyRequest, SERVICE_WRITE_PROPERTY};

use crate::apdu::Container;
use crate::encoding::reader::Reader;
use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::writer::Writer;
use crate::{DecodeError, EncodeError};

/// Decodes a whole service body with `f`.
///
/// `Ok(None)` means the body did not fit: `f` reported an absent field or a
/// padded integer, or left octets behind. The reader is then back at the start of the body.
fn decode_fitted<'a, T>(
    r: &mut Reader<'a>,
    scope: &'static str,
    f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    let start = *r;
    match r.scoped(scope, f) {
        Ok(body) if r.is_empty() => Ok(Some(body)),
        Err(err) if !err.keeps_raw() => Err(err),
        Ok(_) => {
            log::debug!(
                "{scope} left {} trailing octets, keeping raw body",
                r.remaining()
            );
            *r = start;
            Ok(None)
        }
        Err(err) => {
            log::debug!("{scope} does not fit ({err}), keeping raw body");
            *r = start;
            Ok(None)
        }
    }
}

fn encode_opaque(w: &mut Writer<'_>, body: &[u8]) -> Result<(), EncodeError> {
    w.write_all(body)
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConfirmedService<'a> {
    ReadProperty(ReadPropertyRequest),
    WriteProperty(WritePropertyRequest<'a>),
    ReadPropertyMultiple(ReadPropertyMultipleRequest),
    /// Unknown service, segmented body, or a body its codec rejected.
    Other(&'a [u8]),
}

impl<'a> ConfirmedService<'a> {
    pub fn decode(
        r: &mut Reader<'a>,
        service_choice: u8,
        container: Container,
    ) -> Result<Self, DecodeError> {
        let fitted = match service_choice {
            SERVICE_READ_PROPERTY => {
                decode_fitted(r, "ReadPropertyRequest", ReadPropertyRequest::decode)?
                    .map(Self::ReadProperty)
            }
            SERVICE_WRITE_PROPERTY => {
                decode_fitted(r, "WritePropertyRequest", WritePropertyRequest::decode)?
                    .map(Self::WriteProperty)
            }
            SERVICE_READ_PROPERTY_MULTIPLE => decode_fitted(
                r,
                "ReadPropertyMultipleRequest",
                ReadPropertyMultipleRequest::decode,
            )?
            .map(Self::ReadPropertyMultiple),
            _ => None,
        };
        match fitted {
            Some(service) => Ok(service),
            None => container.read_rest(r).map(Self::Other),
        }
    }

    /// The service choice this body belongs to, if it is a typed one.
    pub const fn service_choice(&self) -> Option<u8> {
        match self {
            Self::ReadProperty(_) => Some(SERVICE_READ_PROPERTY),
            Self::WriteProperty(_) => Some(SERVICE_WRITE_PROPERTY),
            Self::ReadPropertyMultiple(_) => Some(SERVICE_READ_PROPERTY_MULTIPLE),
            Self::Other(_) => None,
        }
    }
}

impl BitLength for ConfirmedService<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::ReadProperty(s) => s.length_in_bits(),
            Self::WriteProperty(s) => s.length_in_bits(),
            Self::ReadPropertyMultiple(s) => s.length_in_bits(),
            Self::Other(body) => octets_in_bits(body.len()),
        }
    }
}

impl Encode for ConfirmedService<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ReadProperty(s) => w.scoped("ReadPropertyRequest", |w| s.encode(w)),
            Self::WriteProperty(s) => w.scoped("WritePropertyRequest", |w| s.encode(w)),
            Self::ReadPropertyMultiple(s) => {
                w.scoped("ReadPropertyMultipleRequest", |w| s.encode(w))
            }
            Self::Other(body) => encode_opaque(w, body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnconfirmedService<'a> {
    WhoIs(WhoIsRequest),
    IAm(IAmRequest),
    Other(&'a [u8]),
}

impl<'a> UnconfirmedService<'a> {
    pub fn decode(
        r: &mut Reader<'a>,
        service_choice: u8,
        container: Container,
    ) -> Result<Self, DecodeError> {
        let fitted = match service_choice {
            SERVICE_WHO_IS => decode_fitted(r, "WhoIsRequest", WhoIsRequest::decode)?.map(Self::WhoIs),
            SERVICE_I_AM => decode_fitted(r, "IAmRequest", IAmRequest::decode)?.map(Self::IAm),
            _ => None,
        };
        match fitted {
            Some(service) => Ok(service),
            None => container.read_rest(r).map(Self::Other),
        }
    }

    pub const fn service_choice(&self) -> Option<u8> {
        match self {
            Self::WhoIs(_) => Some(SERVICE_WHO_IS),
            Self::IAm(_) => Some(SERVICE_I_AM),
            Self::Other(_) => None,
        }
    }
}

impl BitLength for UnconfirmedService<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::WhoIs(s) => s.length_in_bits(),
            Self::IAm(s) => s.length_in_bits(),
            Self::Other(body) => octets_in_bits(body.len()),
        }
    }
}

impl Encode for UnconfirmedService<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::WhoIs(s) => w.scoped("WhoIsRequest", |w| s.encode(w)),
            Self::IAm(s) => w.scoped("IAmRequest", |w| s.encode(w)),
            Self::Other(body) => encode_opaque(w, body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ComplexAckService<'a> {
    ReadProperty(ReadPropertyAck<'a>),
    ReadPropertyMultiple(ReadPropertyMultipleAck<'a>),
    Other(&'a [u8]),
}

impl<'a> ComplexAckService<'a> {
    pub fn decode(
        r: &mut Reader<'a>,
        service_choice: u8,
        container: Container,
    ) -> Result<Self, DecodeError> {
        let fitted = match service_choice {
            SERVICE_READ_PROPERTY => {
                decode_fitted(r, "ReadPropertyAck", ReadPropertyAck::decode)?
                    .map(Self::ReadProperty)
            }
            SERVICE_READ_PROPERTY_MULTIPLE => {
                decode_fitted(r, "ReadPropertyMultipleAck", ReadPropertyMultipleAck::decode)?
                    .map(Self::ReadPropertyMultiple)
            }
            _ => None,
        };
        match fitted {
            Some(service) => Ok(service),
            None => container.read_rest(r).map(Self::Other),
        }
    }

    pub const fn service_choice(&self) -> Option<u8> {
        match self {
            Self::ReadProperty(_) => Some(SERVICE_READ_PROPERTY),
            Self::ReadPropertyMultiple(_) => Some(SERVICE_READ_PROPERTY_MULTIPLE),
            Self::Other(_) => None,
        }
    }
}

impl BitLength for ComplexAckService<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::ReadProperty(s) => s.length_in_bits(),
            Self::ReadPropertyMultiple(s) => s.length_in_bits(),
            Self::Other(body) => octets_in_bits(body.len()),
        }
    }
}

impl Encode for ComplexAckService<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ReadProperty(s) => w.scoped("ReadPropertyAck", |w| s.encode(w)),
            Self::ReadPropertyMultiple(s) => w.scoped("ReadPropertyMultipleAck", |w| s.encode(w)),
            Self::Other(body) => encode_opaque(w, body),
        }
    }
}

/// Body of an Error PDU: the class/code pair most services return, or raw
/// octets for services with a richer error structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorBody<'a> {
    Error(BacnetError),
    Other(&'a [u8]),
}

impl<'a> ErrorBody<'a> {
    pub fn decode(r: &mut Reader<'a>, container: Container) -> Result<Self, DecodeError> {
        match decode_fitted(r, "BacnetError", BacnetError::decode)? {
            Some(error) => Ok(Self::Error(error)),
            None => container.read_rest(r).map(Self::Other),
        }
    }
}

impl BitLength for ErrorBody<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::Error(e) => e.length_in_bits(),
            Self::Other(body) => octets_in_bits(body.len()),
        }
    }
}

impl Encode for ErrorBody<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Error(e) => e.encode(w),
            Self::Other(body) => encode_opaque(w, body),
        }
    }
}
