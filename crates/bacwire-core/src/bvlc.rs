use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};
use core::fmt;

pub const BVLC_TYPE_BIP: u8 = 0x81;

/// Fixed part of every BVLC header: type, function, length.
pub const BVLC_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BvlcFunction {
    Result,
    WriteBroadcastDistributionTable,
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck,
    ForwardedNpdu,
    RegisterForeignDevice,
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck,
    DeleteForeignDeviceTableEntry,
    DistributeBroadcastToNetwork,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Unknown(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Result,
            0x01 => Self::WriteBroadcastDistributionTable,
            0x02 => Self::ReadBroadcastDistributionTable,
            0x03 => Self::ReadBroadcastDistributionTableAck,
            0x04 => Self::ForwardedNpdu,
            0x05 => Self::RegisterForeignDevice,
            0x06 => Self::ReadForeignDeviceTable,
            0x07 => Self::ReadForeignDeviceTableAck,
            0x08 => Self::DeleteForeignDeviceTableEntry,
            0x09 => Self::DistributeBroadcastToNetwork,
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::WriteBroadcastDistributionTable => 0x01,
            Self::ReadBroadcastDistributionTable => 0x02,
            Self::ReadBroadcastDistributionTableAck => 0x03,
            Self::ForwardedNpdu => 0x04,
            Self::RegisterForeignDevice => 0x05,
            Self::ReadForeignDeviceTable => 0x06,
            Self::ReadForeignDeviceTableAck => 0x07,
            Self::DeleteForeignDeviceTableEntry => 0x08,
            Self::DistributeBroadcastToNetwork => 0x09,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Unknown(v) => v,
        }
    }

    /// Whether an NPDU follows the BVLC header.
    pub const fn carries_npdu(self) -> bool {
        matches!(
            self,
            Self::ForwardedNpdu
                | Self::DistributeBroadcastToNetwork
                | Self::OriginalUnicastNpdu
                | Self::OriginalBroadcastNpdu
        )
    }
}

/// A B/IP address: IPv4 octets and UDP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BipAddress {
    pub ip: [u8; 4],
    pub port: u16,
}

impl BipAddress {
    pub const ENCODED_LEN: usize = 6;

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b = r.read_exact(4)?;
        Ok(Self {
            ip: [b[0], b[1], b[2], b[3]],
            port: r.read_be_u16()?,
        })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_all(&self.ip)?;
        w.write_be_u16(self.port)
    }
}

impl fmt::Display for BipAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.ip;
        write!(f, "{a}.{b}.{c}.{d}:{}", self.port)
    }
}

/// What follows the BVLC header when it is not an NPDU.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BvlcPayload<'a> {
    /// An NPDU follows; see [`crate::frame::Frame`].
    Npdu,
    ResultCode(u16),
    /// Link-management content kept as raw octets.
    Other(&'a [u8]),
}

/// BACnet/IP virtual link control header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bvlc<'a> {
    pub function: BvlcFunction,
    /// Length of the whole datagram, header included.
    pub length: u16,
    /// Originating address of a forwarded NPDU.
    pub origin: Option<BipAddress>,
    pub payload: BvlcPayload<'a>,
}

impl<'a> Bvlc<'a> {
    /// Decodes the header and any non-NPDU payload.
    ///
    /// Returns the header and a reader bounded to the NPDU when one follows.
    pub fn decode(r: &mut Reader<'a>) -> Result<(Self, Option<Reader<'a>>), DecodeError> {
        let datagram = r.remaining();
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_be_u16()?;
        if (length as usize) < BVLC_HEADER_LEN || length as usize != datagram {
            return Err(DecodeError::InvalidLength);
        }
        let mut body = r.take(length as usize - BVLC_HEADER_LEN)?;

        let origin = match function {
            BvlcFunction::ForwardedNpdu => Some(BipAddress::decode(&mut body)?),
            _ => None,
        };
        let (payload, npdu) = match function {
            f if f.carries_npdu() => (BvlcPayload::Npdu, Some(body)),
            BvlcFunction::Result => {
                let code = body.read_be_u16()?;
                if !body.is_empty() {
                    return Err(DecodeError::InvalidLength);
                }
                (BvlcPayload::ResultCode(code), None)
            }
            _ => (BvlcPayload::Other(body.read_exact(body.remaining())?), None),
        };

        Ok((
            Self {
                function,
                length,
                origin,
                payload,
            },
            npdu,
        ))
    }
}

impl BitLength for Bvlc<'_> {
    /// Header and own payload only; a following NPDU is counted by its frame.
    fn length_in_bits(&self) -> u32 {
        let origin = self.origin.map_or(0, |_| BipAddress::ENCODED_LEN);
        let payload = match self.payload {
            BvlcPayload::Npdu => 0,
            BvlcPayload::ResultCode(_) => 2,
            BvlcPayload::Other(data) => data.len(),
        };
        octets_in_bits(BVLC_HEADER_LEN + origin + payload)
    }
}

impl Encode for Bvlc<'_> {
    /// Encodes the header and any non-NPDU payload. The caller writes the
    /// NPDU, if any, straight after.
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.origin.is_some() != (self.function == BvlcFunction::ForwardedNpdu) {
            return Err(EncodeError::Message("originating address only on forwarded npdu"));
        }
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)?;
        if let Some(origin) = &self.origin {
            origin.encode(w)?;
        }
        match self.payload {
            BvlcPayload::Npdu => Ok(()),
            BvlcPayload::ResultCode(code) => w.write_be_u16(code),
            BvlcPayload::Other(data) => w.write_all(data),
        }
    }
}
