use crate::encoding::traits::{octets_in_bits, BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

pub const CONTROL_NETWORK_MESSAGE: u8 = 0x80;
pub const CONTROL_DESTINATION: u8 = 0x20;
pub const CONTROL_SOURCE: u8 = 0x08;
pub const CONTROL_EXPECTING_REPLY: u8 = 0x04;

/// Longest MAC address carried in DADR/SADR.
pub const MAX_MAC_LEN: usize = 6;

/// A network-layer address consisting of a network number and a MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NpduAddress {
    /// The DNET/SNET network number.
    pub network: u16,
    /// MAC address bytes (up to 6).
    pub mac: [u8; MAX_MAC_LEN],
    /// Number of valid bytes in `mac`. Zero in a destination means broadcast.
    pub mac_len: u8,
}

impl NpduAddress {
    pub fn new(network: u16, mac: &[u8]) -> Result<Self, EncodeError> {
        if mac.len() > MAX_MAC_LEN {
            return Err(EncodeError::InvalidLength);
        }
        let mut buf = [0u8; MAX_MAC_LEN];
        buf[..mac.len()].copy_from_slice(mac);
        Ok(Self {
            network,
            mac: buf,
            mac_len: mac.len() as u8,
        })
    }

    pub fn mac(&self) -> &[u8] {
        &self.mac[..usize::from(self.mac_len).min(MAX_MAC_LEN)]
    }

    fn encoded_len(&self) -> usize {
        3 + self.mac().len()
    }
}

/// BACnet Network Protocol Data Unit (NPDU) header.
///
/// The control octet is kept as received; its presence bits must agree with
/// `destination` and `source` when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Npdu {
    pub control: u8,
    pub destination: Option<NpduAddress>,
    pub source: Option<NpduAddress>,
    pub hop_count: Option<u8>,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self {
            control,
            destination: None,
            source: None,
            hop_count: None,
        }
    }

    pub const fn is_network_message(&self) -> bool {
        (self.control & CONTROL_NETWORK_MESSAGE) != 0
    }

    pub const fn expecting_reply(&self) -> bool {
        (self.control & CONTROL_EXPECTING_REPLY) != 0
    }

    /// Network priority, 0 (normal) to 3 (life safety).
    pub const fn priority(&self) -> u8 {
        self.control & 0x03
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if version != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }

        let control = r.read_u8()?;
        let has_dest = (control & CONTROL_DESTINATION) != 0;
        let has_src = (control & CONTROL_SOURCE) != 0;

        let destination = if has_dest {
            Some(r.scoped("Destination", decode_addr)?)
        } else {
            None
        };
        let source = if has_src {
            Some(r.scoped("Source", decode_addr)?)
        } else {
            None
        };
        let hop_count = if has_dest { Some(r.read_u8()?) } else { None };

        Ok(Self {
            control,
            destination,
            source,
            hop_count,
        })
    }
}

impl BitLength for Npdu {
    fn length_in_bits(&self) -> u32 {
        let dest = self.destination.map_or(0, |a| a.encoded_len() + 1);
        let src = self.source.map_or(0, |a| a.encoded_len());
        octets_in_bits(2 + dest + src)
    }
}

impl Encode for Npdu {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if ((self.control & CONTROL_DESTINATION) != 0) != self.destination.is_some()
            || ((self.control & CONTROL_SOURCE) != 0) != self.source.is_some()
        {
            return Err(EncodeError::Message("npdu control bits disagree with addresses"));
        }
        w.write_u8(NPDU_VERSION)?;
        w.write_u8(self.control)?;

        if let Some(dest) = self.destination {
            encode_addr(w, dest)?;
        }
        if let Some(src) = self.source {
            encode_addr(w, src)?;
        }
        if self.destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(255))?;
        }
        Ok(())
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: NpduAddress) -> Result<(), EncodeError> {
    if addr.mac_len as usize > addr.mac.len() {
        return Err(EncodeError::InvalidLength);
    }
    w.write_be_u16(addr.network)?;
    w.write_u8(addr.mac_len)?;
    w.write_all(addr.mac())
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NpduAddress, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if mac_len as usize > MAX_MAC_LEN {
        return Err(DecodeError::InvalidLength);
    }
    let mut mac = [0u8; MAX_MAC_LEN];
    let src = r.read_exact(mac_len as usize)?;
    mac[..mac_len as usize].copy_from_slice(src);
    Ok(NpduAddress {
        network,
        mac,
        mac_len,
    })
}

pub const WHO_IS_ROUTER_TO_NETWORK: u8 = 0x00;
pub const I_AM_ROUTER_TO_NETWORK: u8 = 0x01;

/// A network-layer message: the NPDU body when the control octet's bit 7 is set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NetworkMessage<'a> {
    WhoIsRouterToNetwork(Option<u16>),
    IAmRouterToNetwork(Vec<u16>),
    /// Any other message type, including vendor types (0x80 and up), which
    /// carry a vendor identifier.
    Other {
        message_type: u8,
        vendor_id: Option<u16>,
        payload: &'a [u8],
    },
}

impl<'a> NetworkMessage<'a> {
    pub fn message_type(&self) -> u8 {
        match self {
            Self::WhoIsRouterToNetwork(_) => WHO_IS_ROUTER_TO_NETWORK,
            Self::IAmRouterToNetwork(_) => I_AM_ROUTER_TO_NETWORK,
            Self::Other { message_type, .. } => *message_type,
        }
    }

    /// Decodes a message that extends to the end of `r`.
    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let message_type = r.read_u8()?;
        match message_type {
            WHO_IS_ROUTER_TO_NETWORK => match r.remaining() {
                0 => Ok(Self::WhoIsRouterToNetwork(None)),
                2 => Ok(Self::WhoIsRouterToNetwork(Some(r.read_be_u16()?))),
                _ => Err(DecodeError::InvalidLength),
            },
            I_AM_ROUTER_TO_NETWORK => {
                if r.remaining() % 2 != 0 {
                    return Err(DecodeError::InvalidLength);
                }
                let mut networks = Vec::with_capacity(r.remaining() / 2);
                while !r.is_empty() {
                    networks.push(r.read_be_u16()?);
                }
                Ok(Self::IAmRouterToNetwork(networks))
            }
            _ => {
                let vendor_id = if message_type >= 0x80 {
                    Some(r.read_be_u16()?)
                } else {
                    None
                };
                Ok(Self::Other {
                    message_type,
                    vendor_id,
                    payload: r.read_exact(r.remaining())?,
                })
            }
        }
    }
}

impl BitLength for NetworkMessage<'_> {
    fn length_in_bits(&self) -> u32 {
        let body = match self {
            Self::WhoIsRouterToNetwork(net) => net.map_or(0, |_| 2),
            Self::IAmRouterToNetwork(nets) => nets.len() * 2,
            Self::Other {
                vendor_id, payload, ..
            } => vendor_id.map_or(0, |_| 2) + payload.len(),
        };
        octets_in_bits(1 + body)
    }
}

impl Encode for NetworkMessage<'_> {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(self.message_type())?;
        match self {
            Self::WhoIsRouterToNetwork(net) => match net {
                Some(net) => w.write_be_u16(*net),
                None => Ok(()),
            },
            Self::IAmRouterToNetwork(nets) => nets.iter().try_for_each(|n| w.write_be_u16(*n)),
            Self::Other {
                message_type,
                vendor_id,
                payload,
            } => {
                match (*message_type >= 0x80, vendor_id) {
                    (true, Some(vendor)) => w.write_be_u16(*vendor)?,
                    (false, None) => {}
                    _ => return Err(EncodeError::Message("vendor id only on vendor message types")),
                }
                w.write_all(payload)
            }
        }
    }
}
