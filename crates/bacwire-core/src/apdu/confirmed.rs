use crate::apdu::ApduType;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::MaxApdu;
use crate::{DecodeError, EncodeError};

/// Checks the type nibble and that no flag outside `flags` is set.
pub(crate) fn check_type(b0: u8, expected: ApduType, flags: u8) -> Result<(), DecodeError> {
    if (b0 >> 4) != expected as u8 || (b0 & 0x0F & !flags) != 0 {
        return Err(DecodeError::InvalidValue);
    }
    Ok(())
}

fn segment_fields(
    segmented: bool,
    r: &mut Reader<'_>,
) -> Result<(Option<u8>, Option<u8>), DecodeError> {
    if segmented {
        Ok((Some(r.read_u8()?), Some(r.read_u8()?)))
    } else {
        Ok((None, None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfirmedRequestHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    pub max_segments: u8,
    pub max_apdu: u8,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    /// An unsegmented request for `service_choice` accepting up to 1476 octets.
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: true,
            max_segments: 0,
            max_apdu: MaxApdu::UpTo1476 as u8,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn max_apdu(&self) -> Option<MaxApdu> {
        MaxApdu::from_u32(u32::from(self.max_apdu))
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        check_type(b0, ApduType::ConfirmedRequest, 0b0000_1110)?;
        let segmented = (b0 & 0b0000_1000) != 0;
        let more_follows = (b0 & 0b0000_0100) != 0;
        let segmented_response_accepted = (b0 & 0b0000_0010) != 0;
        let seg_apdu = r.read_u8()?;
        if (seg_apdu & 0x80) != 0 {
            return Err(DecodeError::InvalidValue);
        }
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = segment_fields(segmented, r)?;
        let service_choice = r.read_u8()?;
        Ok(Self {
            segmented,
            more_follows,
            segmented_response_accepted,
            max_segments: seg_apdu >> 4,
            max_apdu: seg_apdu & 0x0f,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice,
        })
    }
}

impl BitLength for ConfirmedRequestHeader {
    fn length_in_bits(&self) -> u32 {
        if self.segmented {
            48
        } else {
            32
        }
    }
}

impl Encode for ConfirmedRequestHeader {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ConfirmedRequest as u8) << 4;
        if self.segmented {
            b0 |= 0b0000_1000;
        }
        if self.more_follows {
            b0 |= 0b0000_0100;
        }
        if self.segmented_response_accepted {
            b0 |= 0b0000_0010;
        }

        w.write_u8(b0)?;
        w.write_u8(((self.max_segments & 0x07) << 4) | (self.max_apdu & 0x0f))?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplexAckHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        check_type(b0, ApduType::ComplexAck, 0b0000_1100)?;

        let segmented = (b0 & 0b0000_1000) != 0;
        let more_follows = (b0 & 0b0000_0100) != 0;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = segment_fields(segmented, r)?;
        let service_choice = r.read_u8()?;

        Ok(Self {
            segmented,
            more_follows,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice,
        })
    }
}

impl BitLength for ComplexAckHeader {
    fn length_in_bits(&self) -> u32 {
        if self.segmented {
            40
        } else {
            24
        }
    }
}

impl Encode for ComplexAckHeader {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ComplexAck as u8) << 4;
        if self.segmented {
            b0 |= 0b0000_1000;
        }
        if self.more_follows {
            b0 |= 0b0000_0100;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        check_type(r.read_u8()?, ApduType::SimpleAck, 0)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

impl BitLength for SimpleAck {
    fn length_in_bits(&self) -> u32 {
        24
    }
}

impl Encode for SimpleAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::SimpleAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }
}

/// The fixed part of an Error PDU; the error itself follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorHeader {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ErrorHeader {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        check_type(r.read_u8()?, ApduType::Error, 0)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

impl BitLength for ErrorHeader {
    fn length_in_bits(&self) -> u32 {
        24
    }
}

impl Encode for ErrorHeader {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::Error as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RejectPdu {
    pub invoke_id: u8,
    pub reason: u8,
}

impl RejectPdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        check_type(r.read_u8()?, ApduType::Reject, 0)?;
        Ok(Self {
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

impl BitLength for RejectPdu {
    fn length_in_bits(&self) -> u32 {
        24
    }
}

impl Encode for RejectPdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::Reject as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbortPdu {
    pub server: bool,
    pub invoke_id: u8,
    pub reason: u8,
}

impl AbortPdu {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        check_type(b0, ApduType::Abort, 0b0000_0001)?;
        Ok(Self {
            server: (b0 & 0x01) != 0,
            invoke_id: r.read_u8()?,
            reason: r.read_u8()?,
        })
    }
}

impl BitLength for AbortPdu {
    fn length_in_bits(&self) -> u32 {
        24
    }
}

impl Encode for AbortPdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(((ApduType::Abort as u8) << 4) | u8::from(self.server))?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentAck {
    pub negative_ack: bool,
    pub sent_by_server: bool,
    pub invoke_id: u8,
    pub sequence_number: u8,
    pub actual_window_size: u8,
}

impl SegmentAck {
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        check_type(b0, ApduType::SegmentAck, 0b0000_0011)?;
        Ok(Self {
            negative_ack: (b0 & 0b0000_0010) != 0,
            sent_by_server: (b0 & 0b0000_0001) != 0,
            invoke_id: r.read_u8()?,
            sequence_number: r.read_u8()?,
            actual_window_size: r.read_u8()?,
        })
    }
}

impl BitLength for SegmentAck {
    fn length_in_bits(&self) -> u32 {
        32
    }
}

impl Encode for SegmentAck {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::SegmentAck as u8) << 4;
        if self.negative_ack {
            b0 |= 0b0000_0010;
        }
        if self.sent_by_server {
            b0 |= 0b0000_0001;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.sequence_number)?;
        w.write_u8(self.actual_window_size)
    }
}

#[cfg(test)]
mod tests {
    use super::{AbortPdu, ComplexAckHeader, ConfirmedRequestHeader, SegmentAck, SimpleAck};
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::types::MaxApdu;
    use crate::DecodeError;

    #[test]
    fn confirmed_request_header_roundtrip() {
        let bytes = [0x02, 0x05, 0x01, 0x0C];
        let mut r = Reader::new(&bytes);
        let h = ConfirmedRequestHeader::decode(&mut r).unwrap();
        assert_eq!(h, ConfirmedRequestHeader::new(1, 0x0C));
        assert_eq!(h.max_apdu(), Some(MaxApdu::UpTo1476));
        assert_eq!(h.to_vec().unwrap(), bytes);
    }

    #[test]
    fn segmented_headers_carry_window() {
        let bytes = [0x0E, 0x75, 0x09, 0x02, 0x04, 0x0E];
        let mut r = Reader::new(&bytes);
        let h = ConfirmedRequestHeader::decode(&mut r).unwrap();
        assert!(h.segmented && h.more_follows);
        assert_eq!(h.sequence_number, Some(2));
        assert_eq!(h.proposed_window_size, Some(4));
        assert_eq!(h.length_in_bits(), 48);
        assert_eq!(h.to_vec().unwrap(), bytes);

        let bytes = [0x38, 0x09, 0x00, 0x10, 0x0C];
        let mut r = Reader::new(&bytes);
        let h = ComplexAckHeader::decode(&mut r).unwrap();
        assert_eq!(h.sequence_number, Some(0));
        assert_eq!(h.to_vec().unwrap(), bytes);
    }

    #[test]
    fn wrong_type_nibble_is_rejected() {
        let mut r = Reader::new(&[0x30, 0x01, 0x0C]);
        assert_eq!(
            ConfirmedRequestHeader::decode(&mut r),
            Err(DecodeError::InvalidValue)
        );
    }

    #[test]
    fn reserved_bits_are_rejected() {
        // max-segments octet with bit 7 set
        let mut r = Reader::new(&[0x02, 0x85, 0x01, 0x0C]);
        assert_eq!(
            ConfirmedRequestHeader::decode(&mut r),
            Err(DecodeError::InvalidValue)
        );
        let mut r = Reader::new(&[0x31, 0x01, 0x0C]);
        assert_eq!(
            ComplexAckHeader::decode(&mut r),
            Err(DecodeError::InvalidValue)
        );
        let mut r = Reader::new(&[0x24, 0x01, 0x0F]);
        assert_eq!(SimpleAck::decode(&mut r), Err(DecodeError::InvalidValue));
        let mut r = Reader::new(&[0x72, 0x01, 0x04]);
        assert_eq!(AbortPdu::decode(&mut r), Err(DecodeError::InvalidValue));
        let mut r = Reader::new(&[0x48, 0x01, 0x00, 0x01]);
        assert_eq!(SegmentAck::decode(&mut r), Err(DecodeError::InvalidValue));
    }

    #[test]
    fn fixed_pdus_roundtrip() {
        let abort = AbortPdu {
            server: true,
            invoke_id: 3,
            reason: 4,
        };
        assert_eq!(abort.to_vec().unwrap(), [0x71, 3, 4]);
        let ack = SegmentAck {
            negative_ack: true,
            sent_by_server: false,
            invoke_id: 9,
            sequence_number: 1,
            actual_window_size: 8,
        };
        let bytes = ack.to_vec().unwrap();
        assert_eq!(bytes, [0x42, 9, 1, 8]);
        assert_eq!(SegmentAck::decode(&mut Reader::new(&bytes)).unwrap(), ack);
    }
}
