use crate::encoding::context::{decode_ctx_unsigned, encode_ctx_unsigned, ContextTag, ContextValue};
use crate::encoding::optional::optional;
use crate::encoding::traits::{BitLength, Encode};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WHO_IS: u8 = 0x08;

/// Who-Is body. The instance range limits are both present or both absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub const fn range(low: u32, high: u32) -> Self {
        Self {
            low_limit: Some(low),
            high_limit: Some(high),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let low_limit = optional(r, |r| decode_ctx_unsigned(r, 0))?;
        let high_limit = optional(r, |r| decode_ctx_unsigned(r, 1))?;
        if low_limit.is_some() != high_limit.is_some() {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            low_limit,
            high_limit,
        })
    }

    fn limits(&self) -> impl Iterator<Item = ContextTag<'static>> {
        [(0, self.low_limit), (1, self.high_limit)]
            .into_iter()
            .filter_map(|(tag, limit)| Some(ContextTag::new(tag, ContextValue::Unsigned(limit?))))
    }
}

impl BitLength for WhoIsRequest {
    fn length_in_bits(&self) -> u32 {
        self.limits().map(|t| t.length_in_bits()).sum()
    }
}

impl Encode for WhoIsRequest {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.low_limit.is_some() != self.high_limit.is_some() {
            return Err(EncodeError::Message("who-is limits must be given together"));
        }
        if let Some(low) = self.low_limit {
            encode_ctx_unsigned(w, 0, low)?;
        }
        if let Some(high) = self.high_limit {
            encode_ctx_unsigned(w, 1, high)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WhoIsRequest;
    use crate::encoding::reader::Reader;
    use crate::encoding::traits::{BitLength, Encode};
    use crate::DecodeError;

    #[test]
    fn global_who_is_has_empty_body() {
        let mut r = Reader::new(&[]);
        assert_eq!(WhoIsRequest::decode(&mut r).unwrap(), WhoIsRequest::global());
        assert_eq!(WhoIsRequest::global().length_in_bits(), 0);
    }

    #[test]
    fn ranged_who_is_roundtrip() {
        let bytes = [0x09, 0x0A, 0x1A, 0x01, 0x00];
        let mut r = Reader::new(&bytes);
        let req = WhoIsRequest::decode(&mut r).unwrap();
        assert_eq!(req, WhoIsRequest::range(10, 256));
        assert_eq!(req.to_vec().unwrap(), bytes);
    }

    #[test]
    fn lone_limit_is_invalid() {
        let mut r = Reader::new(&[0x19, 0x05]);
        assert_eq!(WhoIsRequest::decode(&mut r), Err(DecodeError::InvalidValue));
    }
}
