use crate::apdu::Apdu;
use crate::bvlc::{Bvlc, BvlcPayload};
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::npdu::{NetworkMessage, Npdu};
use crate::{DecodeError, EncodeError, LocatedDecodeError, LocatedEncodeError};
use alloc::vec;
use alloc::vec::Vec;

/// What follows the NPDU header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NpduBody<'a> {
    Network(NetworkMessage<'a>),
    Application(Apdu<'a>),
}

/// An NPDU header with the message it carries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NetworkPdu<'a> {
    pub header: Npdu,
    pub body: NpduBody<'a>,
}

impl<'a> NetworkPdu<'a> {
    /// Decodes an NPDU spanning the rest of `r`.
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        r.scoped("Npdu", |r| {
            let header = Npdu::decode(r)?;
            let body = if header.is_network_message() {
                NpduBody::Network(r.scoped("NetworkMessage", NetworkMessage::decode)?)
            } else {
                NpduBody::Application(r.scoped("Apdu", Apdu::decode)?)
            };
            Ok(Self { header, body })
        })
    }
}

impl BitLength for NetworkPdu<'_> {
    fn length_in_bits(&self) -> u32 {
        let body = match &self.body {
            NpduBody::Network(msg) => msg.length_in_bits(),
            NpduBody::Application(apdu) => apdu.length_in_bits(),
        };
        self.header.length_in_bits() + body
    }
}

impl Encode for NetworkPdu<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.scoped("Npdu", |w| {
            if self.header.is_network_message() != matches!(self.body, NpduBody::Network(_)) {
                return Err(EncodeError::Message(
                    "npdu control bit disagrees with its body",
                ));
            }
            self.header.encode(w)?;
            match &self.body {
                NpduBody::Network(msg) => w.scoped("NetworkMessage", |w| msg.encode(w)),
                NpduBody::Application(apdu) => w.scoped("Apdu", |w| apdu.encode(w)),
            }
        })
    }
}

/// One decoded datagram.
///
/// `bvlc` is absent when decoding started at the NPDU. `network` is absent
/// for BVLC functions that carry no NPDU.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame<'a> {
    pub bvlc: Option<Bvlc<'a>>,
    pub network: Option<NetworkPdu<'a>>,
}

impl<'a> Frame<'a> {
    /// Decodes a BACnet/IP datagram, BVLC header first.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, LocatedDecodeError> {
        let mut r = Reader::new(bytes);
        r.push_scope("Frame");
        let (bvlc, npdu) = r
            .scoped("Bvlc", Bvlc::decode)
            .map_err(|err| r.locate(err))?;
        let network = match npdu {
            Some(mut npdu) => {
                // split off while the Bvlc scope was open
                npdu.pop_scope("Bvlc");
                Some(NetworkPdu::decode(&mut npdu).map_err(|err| npdu.locate(err))?)
            }
            None => None,
        };
        Ok(Self {
            bvlc: Some(bvlc),
            network,
        })
    }

    /// Decodes a frame whose first octet is the NPDU version, as handed up by
    /// a data link without BVLC.
    pub fn decode_npdu(bytes: &'a [u8]) -> Result<Self, LocatedDecodeError> {
        let mut r = Reader::new(bytes);
        r.push_scope("Frame");
        let network = NetworkPdu::decode(&mut r).map_err(|err| r.locate(err))?;
        Ok(Self {
            bvlc: None,
            network: Some(network),
        })
    }

    /// The APDU carried by this frame, if any.
    pub fn apdu(&self) -> Option<&Apdu<'a>> {
        match &self.network {
            Some(NetworkPdu {
                body: NpduBody::Application(apdu),
                ..
            }) => Some(apdu),
            _ => None,
        }
    }

    /// Encodes into a buffer sized from [`BitLength`], locating any failure.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, LocatedEncodeError> {
        let len = self.length_in_bytes() as usize;
        let mut buf = vec![0u8; len];
        let mut w = Writer::new(&mut buf);
        w.push_scope("Frame");
        if let Err(err) = self.encode(&mut w) {
            return Err(w.locate(err));
        }
        if w.position() != len {
            return Err(w.locate(EncodeError::InvalidLength));
        }
        Ok(buf)
    }
}

impl BitLength for Frame<'_> {
    fn length_in_bits(&self) -> u32 {
        self.bvlc.length_in_bits() + self.network.length_in_bits()
    }
}

impl Encode for Frame<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(bvlc) = &self.bvlc {
            if u32::from(bvlc.length) != self.length_in_bytes() {
                return Err(EncodeError::InvalidLength);
            }
            if (bvlc.payload == BvlcPayload::Npdu) != self.network.is_some() {
                return Err(EncodeError::Message("bvlc function disagrees with npdu presence"));
            }
            w.scoped("Bvlc", |w| bvlc.encode(w))?;
        }
        match &self.network {
            Some(network) => network.encode(w),
            None => Ok(()),
        }
    }
}
