//! Opening/closing tag pairs around constructed content.
//!
//! A bracket carries no knowledge of its content: callers open a region,
//! run their own decoder inside it, and close it. Nesting follows the call
//! stack.

use crate::encoding::tag::TagHeader;
use crate::encoding::traits::BitLength;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};
use alloc::vec::Vec;

/// Where a region was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpeningMark {
    pub tag_number: u8,
    pub position: usize,
}

/// Consumes the opening tag `tag_number`.
///
/// Anything else at this position is a validation failure, so an optional
/// bracketed field can be probed and rolled back.
pub fn open_region(r: &mut Reader<'_>, tag_number: u8) -> Result<OpeningMark, DecodeError> {
    let position = r.position();
    let header = r.read_header()?;
    if !header.is_opening_of(tag_number) {
        return Err(DecodeError::Validation("expected opening tag"));
    }
    Ok(OpeningMark {
        tag_number,
        position,
    })
}

/// Consumes the closing tag matching `mark`. Every failure here is structural.
pub fn close_region(r: &mut Reader<'_>, mark: OpeningMark) -> Result<(), DecodeError> {
    let header = r.read_header()?;
    if header.is_closing_of(mark.tag_number) {
        return Ok(());
    }
    if header.is_closing() {
        return Err(DecodeError::BracketMismatch {
            opened: mark.tag_number,
            closed: header.actual_tag_number(),
        });
    }
    Err(DecodeError::UnclosedRegion(mark.tag_number))
}

/// Opens `tag_number`, decodes its content inside a named scope, and closes it.
pub fn decode_bracketed<'a, T>(
    r: &mut Reader<'a>,
    tag_number: u8,
    scope: &'static str,
    f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    let mark = open_region(r, tag_number)?;
    let value = r.scoped(scope, f)?;
    close_region(r, mark)?;
    Ok(value)
}

/// Raw octets between an already consumed opening tag and its closing tag.
///
/// Nested brackets are tracked so an inner closing tag with the same number
/// does not end the region early. The cursor stops at the closing tag.
pub fn read_region_contents<'a>(
    r: &mut Reader<'a>,
    mark: OpeningMark,
) -> Result<&'a [u8], DecodeError> {
    let start = r.position();
    let mut open: Vec<u8> = Vec::new();
    loop {
        let header = r.peek_header()?;
        if header.is_closing() {
            match open.last() {
                None if header.is_closing_of(mark.tag_number) => break,
                None => {
                    return Err(DecodeError::BracketMismatch {
                        opened: mark.tag_number,
                        closed: header.actual_tag_number(),
                    })
                }
                Some(&inner) if !header.is_closing_of(inner) => {
                    return Err(DecodeError::BracketMismatch {
                        opened: inner,
                        closed: header.actual_tag_number(),
                    })
                }
                Some(_) => {
                    open.pop();
                }
            }
        } else if header.is_opening() {
            open.push(header.actual_tag_number());
        }
        r.read_header()?;
        r.read_exact(header.content_length() as usize)?;
    }
    Ok(r.consumed_since(start))
}

pub fn encode_opening(w: &mut Writer<'_>, tag_number: u8) -> Result<(), EncodeError> {
    w.write_header(&TagHeader::opening(tag_number))
}

pub fn encode_closing(w: &mut Writer<'_>, tag_number: u8) -> Result<(), EncodeError> {
    w.write_header(&TagHeader::closing(tag_number))
}

pub fn encode_bracketed(
    w: &mut Writer<'_>,
    tag_number: u8,
    scope: &'static str,
    f: impl FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
) -> Result<(), EncodeError> {
    encode_opening(w, tag_number)?;
    w.scoped(scope, f)?;
    encode_closing(w, tag_number)
}

/// Overhead of one opening/closing pair.
pub fn bracket_length_in_bits(tag_number: u8) -> u32 {
    TagHeader::opening(tag_number).length_in_bits() + TagHeader::closing(tag_number).length_in_bits()
}

#[cfg(test)]
mod tests {
    use super::{
        bracket_length_in_bits, close_region, decode_bracketed, encode_bracketed, open_region,
        read_region_contents,
    };
    use crate::encoding::context::{decode_ctx_unsigned, encode_ctx_unsigned};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    #[test]
    fn matching_region_closes() {
        let mut r = Reader::new(&[0x5E, 0x5F]);
        let mark = open_region(&mut r, 5).unwrap();
        assert_eq!(mark.position, 0);
        close_region(&mut r, mark).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn mismatched_close_is_structural() {
        let mut r = Reader::new(&[0x5E, 0x3F]);
        let mark = open_region(&mut r, 5).unwrap();
        let err = close_region(&mut r, mark).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BracketMismatch {
                opened: 5,
                closed: 3
            }
        );
        assert!(!err.is_absence());
    }

    #[test]
    fn opening_alone_is_truncated() {
        let mut r = Reader::new(&[0x5E]);
        let mark = open_region(&mut r, 5).unwrap();
        assert_eq!(close_region(&mut r, mark), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn primitive_where_close_expected_is_unclosed() {
        let mut r = Reader::new(&[0x5E, 0x09, 0x01]);
        let mark = open_region(&mut r, 5).unwrap();
        assert_eq!(close_region(&mut r, mark), Err(DecodeError::UnclosedRegion(5)));
    }

    #[test]
    fn wrong_opening_is_absence() {
        let mut r = Reader::new(&[0x3E, 0x3F]);
        assert!(open_region(&mut r, 5).unwrap_err().is_absence());
    }

    #[test]
    fn bracketed_roundtrip() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        encode_bracketed(&mut w, 3, "Inner", |w| encode_ctx_unsigned(w, 0, 7)).unwrap();
        assert_eq!(w.as_written(), &[0x3E, 0x09, 0x07, 0x3F]);
        assert_eq!(bracket_length_in_bits(3), 16);

        let mut r = Reader::new(&[0x3E, 0x09, 0x07, 0x3F]);
        let v = decode_bracketed(&mut r, 3, "Inner", |r| decode_ctx_unsigned(r, 0)).unwrap();
        assert_eq!(v, 7);
        assert_eq!(r.scope_path().depth(), 0);
    }

    #[test]
    fn region_contents_skip_nested_brackets() {
        // [3] { [3] { 0x21 0x01 } 0x10 }
        let bytes = [0x3E, 0x3E, 0x21, 0x01, 0x3F, 0x10, 0x3F];
        let mut r = Reader::new(&bytes);
        let mark = open_region(&mut r, 3).unwrap();
        let raw = read_region_contents(&mut r, mark).unwrap();
        assert_eq!(raw, &bytes[1..6]);
        assert_eq!(r.position(), 6);
        close_region(&mut r, mark).unwrap();
    }

    #[test]
    fn region_contents_reject_crossed_brackets() {
        let bytes = [0x3E, 0x1E, 0x2F, 0x3F];
        let mut r = Reader::new(&bytes);
        let mark = open_region(&mut r, 3).unwrap();
        assert_eq!(
            read_region_contents(&mut r, mark),
            Err(DecodeError::BracketMismatch {
                opened: 1,
                closed: 2
            })
        );
    }
}
