use crate::encoding::scope::ScopePath;
use crate::encoding::tag::TagHeader;
use crate::{EncodeError, LocatedEncodeError};

/// Write sink over a caller-owned buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
    scopes: ScopePath,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            scopes: ScopePath::new(),
        }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        if self.remaining() < 1 {
            return Err(EncodeError::BufferTooSmall);
        }
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        if self.remaining() < data.len() {
            return Err(EncodeError::BufferTooSmall);
        }
        let end = self.pos + data.len();
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    pub fn write_be_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_be_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_header(&mut self, header: &TagHeader) -> Result<(), EncodeError> {
        header.encode(self)
    }

    pub fn push_scope(&mut self, name: &'static str) {
        self.scopes.push(name);
    }

    pub fn pop_scope(&mut self, name: &'static str) {
        self.scopes.pop(name);
    }

    pub fn scoped(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        self.push_scope(name);
        f(self)?;
        self.pop_scope(name);
        Ok(())
    }

    pub fn locate(&self, error: EncodeError) -> LocatedEncodeError {
        LocatedEncodeError {
            error,
            offset: self.pos,
            path: self.scopes,
        }
    }
}
