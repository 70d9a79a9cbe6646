//! Speculative reads.
//!
//! BACnet marks an absent optional field only by the next tag not matching.
//! These helpers checkpoint the reader, attempt a decode, and restore the
//! checkpoint when the attempt fails with [`DecodeError::Validation`]. Every
//! other failure is propagated untouched.

use crate::encoding::reader::Reader;
use crate::DecodeError;
use alloc::vec::Vec;

/// Decodes an optional field.
///
/// Returns `None` at end of input or when `f` reports an absence failure; in
/// both cases the reader is left exactly where it was.
pub fn optional<'a, T>(
    r: &mut Reader<'a>,
    f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
    if r.is_empty() {
        return Ok(None);
    }
    let checkpoint = *r;
    match f(r) {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_absence() => {
            log::trace!("optional field absent at byte {}: {err}", checkpoint.position());
            *r = checkpoint;
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Reads exactly `count` elements.
pub fn read_counted<'a, T>(
    r: &mut Reader<'a>,
    count: usize,
    mut f: impl FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    // A hostile count must not drive the allocation.
    let mut items = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        items.push(f(r)?);
    }
    Ok(items)
}

/// What ends a terminated array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The closing tag of the enclosing region. It is left unconsumed.
    ClosingTag(u8),
    /// The end of the reader's bounds.
    EndOfInput,
}

/// Reads elements until `terminator` is reached.
///
/// The terminator lookahead never consumes input. An element that fails
/// with an absence failure also ends the array, with the reader restored to
/// the element's start, leaving the enclosing decoder to report what it
/// finds there. A missing closing tag surfaces as
/// [`DecodeError::UnexpectedEof`].
pub fn read_until<'a, T>(
    r: &mut Reader<'a>,
    terminator: Terminator,
    mut f: impl FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let mut items = Vec::new();
    loop {
        match terminator {
            Terminator::ClosingTag(tag_number) => {
                if r.peek_header()?.is_closing_of(tag_number) {
                    break;
                }
            }
            Terminator::EndOfInput => {
                if r.is_empty() {
                    break;
                }
            }
        }

        let checkpoint = *r;
        match f(r) {
            Ok(item) => {
                if r.position() == checkpoint.position() {
                    return Err(DecodeError::Message("array element consumed no input"));
                }
                items.push(item);
            }
            Err(err) if err.is_absence() => {
                log::trace!(
                    "terminated array ended after {} elements at byte {}: {err}",
                    items.len(),
                    checkpoint.position()
                );
                *r = checkpoint;
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::{optional, read_counted, read_until, Terminator};
    use crate::encoding::application::decode_app_unsigned;
    use crate::encoding::bracket::{close_region, open_region};
    use crate::encoding::context::decode_ctx_unsigned;
    use crate::encoding::reader::Reader;
    use crate::DecodeError;

    #[test]
    fn mismatched_optional_rolls_back() {
        let mut r = Reader::new(&[0x19, 0x05]);
        let before = r.position();
        assert_eq!(optional(&mut r, |r| decode_ctx_unsigned(r, 0)).unwrap(), None);
        assert_eq!(r.position(), before);
        assert_eq!(optional(&mut r, |r| decode_ctx_unsigned(r, 1)).unwrap(), Some(5));
        assert!(r.is_empty());
    }

    #[test]
    fn optional_at_end_of_input_is_absent() {
        let mut r = Reader::new(&[]);
        assert_eq!(optional(&mut r, |r| decode_ctx_unsigned(r, 0)).unwrap(), None);
    }

    #[test]
    fn optional_does_not_hide_truncation() {
        let mut r = Reader::new(&[0x0A, 0x01]);
        assert_eq!(
            optional(&mut r, |r| decode_ctx_unsigned(r, 0)),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn optional_rollback_restores_scopes() {
        let mut r = Reader::new(&[0x19, 0x05]);
        let absent = optional(&mut r, |r| r.scoped("Probe", |r| decode_ctx_unsigned(r, 0)));
        assert_eq!(absent.unwrap(), None);
        assert_eq!(r.scope_path().depth(), 0);
    }

    #[test]
    fn terminated_array_stops_at_closing_tag() {
        let bytes = [0x2E, 0x21, 0x01, 0x21, 0x02, 0x21, 0x03, 0x2F];
        let mut r = Reader::new(&bytes);
        let mark = open_region(&mut r, 2).unwrap();
        let items = read_until(&mut r, Terminator::ClosingTag(2), decode_app_unsigned).unwrap();
        assert_eq!(items, [1, 2, 3]);
        assert_eq!(r.position(), 7);
        close_region(&mut r, mark).unwrap();
    }

    #[test]
    fn terminated_array_without_close_is_truncated() {
        let mut r = Reader::new(&[0x2E, 0x21, 0x01, 0x21, 0x02]);
        open_region(&mut r, 2).unwrap();
        assert_eq!(
            read_until(&mut r, Terminator::ClosingTag(2), decode_app_unsigned),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn foreign_element_ends_array_and_close_reports_it() {
        let bytes = [0x2E, 0x21, 0x01, 0x91, 0x02, 0x2F];
        let mut r = Reader::new(&bytes);
        let mark = open_region(&mut r, 2).unwrap();
        let items = read_until(&mut r, Terminator::ClosingTag(2), decode_app_unsigned).unwrap();
        assert_eq!(items, [1]);
        assert_eq!(r.position(), 3);
        assert_eq!(close_region(&mut r, mark), Err(DecodeError::UnclosedRegion(2)));
    }

    #[test]
    fn array_to_end_of_input() {
        let mut r = Reader::new(&[0x21, 0x01, 0x21, 0x02]);
        let items = read_until(&mut r, Terminator::EndOfInput, decode_app_unsigned).unwrap();
        assert_eq!(items, [1, 2]);
    }

    #[test]
    fn zero_progress_element_is_rejected() {
        let mut r = Reader::new(&[0x21, 0x01]);
        assert!(read_until(&mut r, Terminator::EndOfInput, |_| Ok(())).is_err());
    }

    #[test]
    fn counted_array_reads_exactly_n() {
        let mut r = Reader::new(&[0x21, 0x01, 0x21, 0x02, 0x21, 0x03]);
        let items = read_counted(&mut r, 2, decode_app_unsigned).unwrap();
        assert_eq!(items, [1, 2]);
        assert_eq!(r.remaining(), 2);
        assert_eq!(
            read_counted(&mut r, 2, decode_app_unsigned),
            Err(DecodeError::UnexpectedEof)
        );
    }
}
