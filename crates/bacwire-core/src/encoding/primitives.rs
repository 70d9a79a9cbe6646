//! Payload codecs shared by the application and context tag families.
//!
//! Each decoder receives the content length from an already decoded header
//! and reads exactly that many octets; each encoder has a matching `*_len`
//! giving the content length it will write.

use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{BitString, CharacterSet, CharacterString, Date, ObjectId, Time};
use crate::{DecodeError, EncodeError};

/// Octets needed for an unsigned value: the smallest of 1–4.
pub const fn unsigned_len(value: u32) -> u32 {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFF_FFFF {
        3
    } else {
        4
    }
}

pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let len = unsigned_len(value) as usize;
    w.write_all(&value.to_be_bytes()[4 - len..])?;
    Ok(len)
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for _ in 0..len {
        value = (value << 8) | r.read_u8()? as u32;
    }
    if unsigned_len(value) as usize != len {
        return Err(DecodeError::NonMinimalInteger(len as u8));
    }
    Ok(value)
}

/// Octets needed for a two's-complement value: the smallest of 1–4.
pub const fn signed_len(value: i32) -> u32 {
    if value >= -128 && value <= 127 {
        1
    } else if value >= -32_768 && value <= 32_767 {
        2
    } else if value >= -8_388_608 && value <= 8_388_607 {
        3
    } else {
        4
    }
}

pub fn encode_signed(w: &mut Writer<'_>, value: i32) -> Result<usize, EncodeError> {
    let len = signed_len(value) as usize;
    w.write_all(&value.to_be_bytes()[4 - len..])?;
    Ok(len)
}

pub fn decode_signed(r: &mut Reader<'_>, len: usize) -> Result<i32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }

    let bytes = r.read_exact(len)?;
    let mut out = [0u8; 4];
    out[4 - len..].copy_from_slice(bytes);
    if (bytes[0] & 0x80) != 0 {
        for b in &mut out[..4 - len] {
            *b = 0xFF;
        }
    }
    let value = i32::from_be_bytes(out);
    if signed_len(value) as usize != len {
        return Err(DecodeError::NonMinimalInteger(len as u8));
    }
    Ok(value)
}

pub fn decode_real(r: &mut Reader<'_>, len: usize) -> Result<f32, DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    Ok(f32::from_bits(r.read_be_u32()?))
}

pub fn encode_real(w: &mut Writer<'_>, value: f32) -> Result<(), EncodeError> {
    w.write_all(&value.to_bits().to_be_bytes())
}

pub fn decode_double(r: &mut Reader<'_>, len: usize) -> Result<f64, DecodeError> {
    if len != 8 {
        return Err(DecodeError::InvalidLength);
    }
    let b = r.read_exact(8)?;
    Ok(f64::from_bits(u64::from_be_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ])))
}

pub fn encode_double(w: &mut Writer<'_>, value: f64) -> Result<(), EncodeError> {
    w.write_all(&value.to_bits().to_be_bytes())
}

pub fn character_string_len(value: &CharacterString<'_>) -> usize {
    value.data.len() + 1
}

pub fn decode_character_string<'a>(
    r: &mut Reader<'a>,
    len: usize,
) -> Result<CharacterString<'a>, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    Ok(CharacterString::new(CharacterSet::from_u8(raw[0]), &raw[1..]))
}

pub fn encode_character_string(
    w: &mut Writer<'_>,
    value: &CharacterString<'_>,
) -> Result<(), EncodeError> {
    w.write_u8(value.charset.to_u8())?;
    w.write_all(value.data)
}

pub fn bit_string_len(value: &BitString<'_>) -> usize {
    value.data.len() + 1
}

pub fn decode_bit_string<'a>(r: &mut Reader<'a>, len: usize) -> Result<BitString<'a>, DecodeError> {
    if len == 0 {
        return Err(DecodeError::InvalidLength);
    }
    let raw = r.read_exact(len)?;
    let unused_bits = raw[0];
    if unused_bits > 7 || (len == 1 && unused_bits != 0) {
        return Err(DecodeError::InvalidValue);
    }
    Ok(BitString::new(unused_bits, &raw[1..]))
}

pub fn encode_bit_string(w: &mut Writer<'_>, value: &BitString<'_>) -> Result<(), EncodeError> {
    if value.unused_bits > 7 || (value.data.is_empty() && value.unused_bits != 0) {
        return Err(EncodeError::ValueOutOfRange);
    }
    w.write_u8(value.unused_bits)?;
    w.write_all(value.data)
}

fn read_quad(r: &mut Reader<'_>, len: usize) -> Result<[u8; 4], DecodeError> {
    if len != 4 {
        return Err(DecodeError::InvalidLength);
    }
    let b = r.read_exact(4)?;
    Ok([b[0], b[1], b[2], b[3]])
}

pub fn decode_date(r: &mut Reader<'_>, len: usize) -> Result<Date, DecodeError> {
    Ok(Date::from_bytes(read_quad(r, len)?))
}

pub fn decode_time(r: &mut Reader<'_>, len: usize) -> Result<Time, DecodeError> {
    Ok(Time::from_bytes(read_quad(r, len)?))
}

pub fn decode_object_id(r: &mut Reader<'_>, len: usize) -> Result<ObjectId, DecodeError> {
    Ok(ObjectId::from_raw(u32::from_be_bytes(read_quad(r, len)?)))
}

#[cfg(test)]
mod tests {
    use super::{
        decode_bit_string, decode_character_string, decode_signed, decode_unsigned,
        encode_signed, encode_unsigned, signed_len, unsigned_len,
    };
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::CharacterSet;
    use crate::DecodeError;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u32>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = encode_unsigned(&mut w, v).unwrap();
            prop_assert_eq!(len as u32, unsigned_len(v));
            let mut r = Reader::new(w.as_written());
            let got = decode_unsigned(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }

        #[test]
        fn signed_roundtrip(v in any::<i32>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = encode_signed(&mut w, v).unwrap();
            prop_assert_eq!(len as u32, signed_len(v));
            let mut r = Reader::new(w.as_written());
            let got = decode_signed(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }
    }

    #[test]
    fn minimal_widths() {
        assert_eq!(unsigned_len(255), 1);
        assert_eq!(unsigned_len(256), 2);
        assert_eq!(signed_len(-128), 1);
        assert_eq!(signed_len(128), 2);
        assert_eq!(signed_len(i32::MIN), 4);
    }

    #[test]
    fn unsigned_rejects_bad_widths() {
        let mut r = Reader::new(&[0; 5]);
        assert_eq!(decode_unsigned(&mut r, 0), Err(DecodeError::InvalidLength));
        assert_eq!(decode_unsigned(&mut r, 5), Err(DecodeError::InvalidLength));
    }

    #[test]
    fn padded_integers_are_rejected() {
        let mut r = Reader::new(&[0x00, 0x2A]);
        assert_eq!(
            decode_unsigned(&mut r, 2),
            Err(DecodeError::NonMinimalInteger(2))
        );
        let mut r = Reader::new(&[0x00, 0x00, 0x00, 0x05]);
        assert_eq!(
            decode_unsigned(&mut r, 4),
            Err(DecodeError::NonMinimalInteger(4))
        );
        let mut r = Reader::new(&[0xFF, 0xFF]);
        assert_eq!(
            decode_signed(&mut r, 2),
            Err(DecodeError::NonMinimalInteger(2))
        );
        let mut r = Reader::new(&[0x00, 0x80]);
        assert_eq!(decode_signed(&mut r, 2), Ok(128));
        let mut r = Reader::new(&[0x00]);
        assert_eq!(decode_unsigned(&mut r, 1), Ok(0));
    }

    #[test]
    fn character_string_keeps_charset() {
        let mut r = Reader::new(&[5, 0xE9, 0x74]);
        let s = decode_character_string(&mut r, 3).unwrap();
        assert_eq!(s.charset, CharacterSet::Iso8859_1);
        assert_eq!(s.data, &[0xE9, 0x74]);
    }

    #[test]
    fn bit_string_rejects_unused_overflow() {
        let mut r = Reader::new(&[8, 0xFF]);
        assert_eq!(decode_bit_string(&mut r, 2), Err(DecodeError::InvalidValue));
        let mut r = Reader::new(&[0]);
        assert!(decode_bit_string(&mut r, 1).unwrap().is_empty());
    }
}
