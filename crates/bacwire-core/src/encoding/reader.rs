use crate::encoding::scope::ScopePath;
use crate::encoding::tag::TagHeader;
use crate::{DecodeError, LocatedDecodeError};

/// Read cursor over a borrowed frame.
///
/// Positions are absolute offsets into the original buffer, also for readers
/// produced by [`Reader::take`]. The reader is `Copy`: saving it is a
/// checkpoint, assigning it back is a rollback.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    scopes: ScopePath,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
            scopes: ScopePath::new(),
        }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back (or forward) to a position previously returned by
    /// [`position`](Self::position).
    pub fn reset_to(&mut self, position: usize) {
        debug_assert!(position <= self.end, "reset past end of reader");
        self.pos = position.min(self.end);
    }

    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        if self.pos >= self.end {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(self.buf[self.pos])
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Splits off the next `len` bytes as a bounded reader and skips them here.
    pub fn take(&mut self, len: usize) -> Result<Reader<'a>, DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let child = Reader {
            buf: self.buf,
            pos: self.pos,
            end: self.pos + len,
            scopes: self.scopes,
        };
        self.pos += len;
        Ok(child)
    }

    /// Bytes between an earlier position and the current one.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        let start = start.min(self.pos);
        &self.buf[start..self.pos]
    }

    /// Decodes the next tag header without consuming it.
    pub fn peek_header(&self) -> Result<TagHeader, DecodeError> {
        let mut probe = *self;
        TagHeader::decode(&mut probe)
    }

    pub fn read_header(&mut self) -> Result<TagHeader, DecodeError> {
        TagHeader::decode(self)
    }

    pub fn push_scope(&mut self, name: &'static str) {
        self.scopes.push(name);
    }

    pub fn pop_scope(&mut self, name: &'static str) {
        self.scopes.pop(name);
    }

    pub const fn scope_path(&self) -> ScopePath {
        self.scopes
    }

    /// Runs `f` inside a named scope.
    ///
    /// On failure the scope is left pushed so [`locate`](Self::locate) reports
    /// the innermost path.
    pub fn scoped<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        self.push_scope(name);
        let value = f(self)?;
        self.pop_scope(name);
        Ok(value)
    }

    /// Attaches the current offset and scope path to `error`.
    pub fn locate(&self, error: DecodeError) -> LocatedDecodeError {
        LocatedDecodeError {
            error,
            offset: self.pos,
            path: self.scopes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::DecodeError;

    #[test]
    fn reader_reads_values() {
        let mut r = Reader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_exact(2).unwrap(), &[2, 3]);
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn reader_bounds() {
        let mut r = Reader::new(&[1]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u8().unwrap_err(), DecodeError::UnexpectedEof);
    }

    #[test]
    fn take_keeps_absolute_positions() {
        let mut r = Reader::new(&[1, 2, 3, 4, 5]);
        r.read_u8().unwrap();
        let mut child = r.take(2).unwrap();
        assert_eq!(r.position(), 3);
        assert_eq!(child.position(), 1);
        assert_eq!(child.read_exact(2).unwrap(), &[2, 3]);
        assert_eq!(child.read_u8().unwrap_err(), DecodeError::UnexpectedEof);
        assert_eq!(child.position(), 3);
    }

    #[test]
    fn checkpoint_restores_position_and_scopes() {
        let mut r = Reader::new(&[0x09, 0x2A]);
        let checkpoint = r;
        r.push_scope("Probe");
        r.read_exact(2).unwrap();
        r = checkpoint;
        assert_eq!(r.position(), 0);
        assert_eq!(r.scope_path().depth(), 0);
    }

    #[test]
    fn failed_scope_stays_on_path() {
        let mut r = Reader::new(&[]);
        let err = r
            .scoped("Outer", |r| r.scoped("Inner", |r| r.read_u8()))
            .unwrap_err();
        let located = r.locate(err);
        assert_eq!(located.offset, 0);
        assert_eq!(located.path.iter().collect::<alloc::vec::Vec<_>>(), ["Outer", "Inner"]);
    }
}
