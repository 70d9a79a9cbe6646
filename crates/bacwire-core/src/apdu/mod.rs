/// Confirmed-service request/response headers and the fixed-size PDUs.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-service request header.
pub mod unconfirmed;

pub use confirmed::{
    AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, ErrorHeader, RejectPdu, SegmentAck,
    SimpleAck,
};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;

use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::{ComplexAckService, ConfirmedService, ErrorBody, UnconfirmedService};
use crate::{DecodeError, EncodeError};

/// Size of an enclosing PDU, fixed when its decoding starts.
///
/// Bodies nobody can interpret take whatever the container has left:
/// its size minus what the header and any decoded fields consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    start: usize,
    bits: u32,
}

impl Container {
    /// A container spanning everything `r` has left.
    pub fn new(r: &Reader<'_>) -> Self {
        Self {
            start: r.position(),
            bits: octets_in_bits(r.remaining()),
        }
    }

    pub fn remaining_bits(&self, r: &Reader<'_>) -> Result<u32, DecodeError> {
        let consumed = octets_in_bits(r.position().saturating_sub(self.start));
        self.bits
            .checked_sub(consumed)
            .ok_or(DecodeError::InvalidLength)
    }

    /// Reads the rest of the container as raw octets.
    pub fn read_rest<'a>(&self, r: &mut Reader<'a>) -> Result<&'a [u8], DecodeError> {
        let bits = self.remaining_bits(r)?;
        r.read_exact((bits / 8) as usize)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Apdu<'a> {
    ConfirmedRequest {
        header: ConfirmedRequestHeader,
        service: ConfirmedService<'a>,
    },
    UnconfirmedRequest {
        header: UnconfirmedRequestHeader,
        service: UnconfirmedService<'a>,
    },
    SimpleAck(SimpleAck),
    ComplexAck {
        header: ComplexAckHeader,
        service: ComplexAckService<'a>,
    },
    SegmentAck(SegmentAck),
    Error {
        header: ErrorHeader,
        body: ErrorBody<'a>,
    },
    Reject(RejectPdu),
    Abort(AbortPdu),
}

impl<'a> Apdu<'a> {
    /// Decodes one APDU spanning the rest of `r`.
    ///
    /// Segments are kept as raw octets; only a reassembled message has a
    /// body a service codec can read.
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let container = Container::new(r);
        let apdu_type = ApduType::from_first_octet(r.peek_u8()?).ok_or(DecodeError::InvalidValue)?;
        let apdu = match apdu_type {
            ApduType::ConfirmedRequest => {
                let header = ConfirmedRequestHeader::decode(r)?;
                let service = if header.segmented {
                    ConfirmedService::Other(container.read_rest(r)?)
                } else {
                    ConfirmedService::decode(r, header.service_choice, container)?
                };
                Self::ConfirmedRequest { header, service }
            }
            ApduType::UnconfirmedRequest => {
                let header = UnconfirmedRequestHeader::decode(r)?;
                let service = UnconfirmedService::decode(r, header.service_choice, container)?;
                Self::UnconfirmedRequest { header, service }
            }
            ApduType::SimpleAck => Self::SimpleAck(SimpleAck::decode(r)?),
            ApduType::ComplexAck => {
                let header = ComplexAckHeader::decode(r)?;
                let service = if header.segmented {
                    ComplexAckService::Other(container.read_rest(r)?)
                } else {
                    ComplexAckService::decode(r, header.service_choice, container)?
                };
                Self::ComplexAck { header, service }
            }
            ApduType::SegmentAck => Self::SegmentAck(SegmentAck::decode(r)?),
            ApduType::Error => {
                let header = ErrorHeader::decode(r)?;
                let body = ErrorBody::decode(r, container)?;
                Self::Error { header, body }
            }
            ApduType::Reject => Self::Reject(RejectPdu::decode(r)?),
            ApduType::Abort => Self::Abort(AbortPdu::decode(r)?),
        };
        if container.remaining_bits(r)? != 0 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(apdu)
    }

    pub const fn apdu_type(&self) -> ApduType {
        match self {
            Self::ConfirmedRequest { .. } => ApduType::ConfirmedRequest,
            Self::UnconfirmedRequest { .. } => ApduType::UnconfirmedRequest,
            Self::SimpleAck(_) => ApduType::SimpleAck,
            Self::ComplexAck { .. } => ApduType::ComplexAck,
            Self::SegmentAck(_) => ApduType::SegmentAck,
            Self::Error { .. } => ApduType::Error,
            Self::Reject(_) => ApduType::Reject,
            Self::Abort(_) => ApduType::Abort,
        }
    }
}

fn check_choice(header_choice: u8, body_choice: Option<u8>) -> Result<(), EncodeError> {
    match body_choice {
        Some(choice) if choice != header_choice => Err(EncodeError::Message(
            "service body does not match the header's service choice",
        )),
        _ => Ok(()),
    }
}

impl BitLength for Apdu<'_> {
    fn length_in_bits(&self) -> u32 {
        match self {
            Self::ConfirmedRequest { header, service } => {
                header.length_in_bits() + service.length_in_bits()
            }
            Self::UnconfirmedRequest { header, service } => {
                header.length_in_bits() + service.length_in_bits()
            }
            Self::SimpleAck(pdu) => pdu.length_in_bits(),
            Self::ComplexAck { header, service } => {
                header.length_in_bits() + service.length_in_bits()
            }
            Self::SegmentAck(pdu) => pdu.length_in_bits(),
            Self::Error { header, body } => header.length_in_bits() + body.length_in_bits(),
            Self::Reject(pdu) => pdu.length_in_bits(),
            Self::Abort(pdu) => pdu.length_in_bits(),
        }
    }
}

impl Encode for Apdu<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ConfirmedRequest { header, service } => {
                check_choice(header.service_choice, service.service_choice())?;
                header.encode(w)?;
                service.encode(w)
            }
            Self::UnconfirmedRequest { header, service } => {
                check_choice(header.service_choice, service.service_choice())?;
                header.encode(w)?;
                service.encode(w)
            }
            Self::SimpleAck(pdu) => pdu.encode(w),
            Self::ComplexAck { header, service } => {
                check_choice(header.service_choice, service.service_choice())?;
                header.encode(w)?;
                service.encode(w)
            }
            Self::SegmentAck(pdu) => pdu.encode(w),
            Self::Error { header, body } => {
                header.encode(w)?;
                body.encode(w)
            }
            Self::Reject(pdu) => pdu.encode(w),
            Self::Abort(pdu) => pdu.encode(w),
        }
    }
}
