//! Byte strings of fixed and varint-prefixed length.

use crate::{varint, Codec, Cursor, Error, Value};
use bytes::{BufMut, Bytes};

/// Exactly `length` raw bytes, read and written as [Value::Bytes].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedStr {
    length: usize,
}

impl FixedStr {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn value<'a>(&self, value: &'a Value) -> Result<&'a Bytes, Error> {
        let data = bytes_value(value)?;
        if data.len() != self.length {
            return Err(Error::LengthMismatch {
                expected: self.length,
                actual: data.len(),
            });
        }
        Ok(data)
    }
}

impl Codec for FixedStr {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (data, cursor) = cursor.read(self.length)?;
        Ok((Value::Bytes(data), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        buf.put_slice(self.value(value)?);
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.value(value).map(Bytes::len)
    }
}

/// A varint length followed by that many raw bytes, read and written as [Value::Bytes].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VarStr;

impl Codec for VarStr {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (len, cursor) = varint::read(cursor)?;
        let (data, cursor) = cursor.read(length(len))?;
        Ok((Value::Bytes(data), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        let data = bytes_value(value)?;
        varint::write(data.len() as u64, buf);
        buf.put_slice(data);
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        let data = bytes_value(value)?;
        Ok(varint::size(data.len() as u64) + data.len())
    }
}

/// Converts a decoded length prefix to `usize`.
///
/// A length that does not fit in `usize` can never be satisfied by the buffer, so it saturates
/// and the subsequent read fails with [Error::EndOfBuffer].
pub(crate) fn length(len: u64) -> usize {
    usize::try_from(len).unwrap_or(usize::MAX)
}

fn bytes_value(value: &Value) -> Result<&Bytes, Error> {
    value.as_bytes().ok_or(Error::UnexpectedValue {
        expected: "bytes",
        found: value.kind(),
    })
}
