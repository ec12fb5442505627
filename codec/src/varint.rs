//! Variable-length integer encoding and decoding
//!
//! This module implements the compact-size encoding used for lengths and counts. The first
//! byte selects one of four size classes:
//!
//! - `0x00..=0xFC`: the value is the byte itself
//! - `0xFD`: the value follows as a little-endian `u16`
//! - `0xFE`: the value follows as a little-endian `u32`
//! - `0xFF`: the value follows as a little-endian `u64`
//!
//! Every value has exactly one valid encoding: the smallest size class that can hold it.
//! Decoding rejects any other encoding with [Error::NonCanonicalVarInt].

use crate::{Codec, Cursor, Error, Value};
use bytes::{Buf, BufMut};

const MAX_SINGLE_BYTE: u8 = 0xFC;
const PREFIX_U16: u8 = 0xFD;
const PREFIX_U32: u8 = 0xFE;
const PREFIX_U64: u8 = 0xFF;

/// Encodes a value as a varint
pub fn write(value: u64, buf: &mut impl BufMut) {
    if value <= MAX_SINGLE_BYTE as u64 {
        // Fast path for small values (common case for lengths).
        buf.put_u8(value as u8);
    } else if let Ok(value) = u16::try_from(value) {
        buf.put_u8(PREFIX_U16);
        buf.put_u16_le(value);
    } else if let Ok(value) = u32::try_from(value) {
        buf.put_u8(PREFIX_U32);
        buf.put_u32_le(value);
    } else {
        buf.put_u8(PREFIX_U64);
        buf.put_u64_le(value);
    }
}

/// Decodes a varint, rejecting non-canonical encodings
pub fn read(cursor: Cursor) -> Result<(u64, Cursor), Error> {
    let (first, cursor) = cursor.read(1)?;
    let (size, minimum) = match first[0] {
        byte @ 0..=MAX_SINGLE_BYTE => return Ok((byte as u64, cursor)),
        PREFIX_U16 => (2, PREFIX_U16 as u64),
        PREFIX_U32 => (4, 1 << 16),
        PREFIX_U64 => (8, 1 << 32),
    };
    let (mut data, cursor) = cursor.read(size)?;
    let value = data.get_uint_le(size);
    if value < minimum {
        return Err(Error::NonCanonicalVarInt {
            value,
            size: 1 + size,
        });
    }
    Ok((value, cursor))
}

/// Calculates the number of bytes needed to encode a value as a varint.
pub fn size(value: u64) -> usize {
    if value <= MAX_SINGLE_BYTE as u64 {
        1
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Wire type for a single varint, read and written as [Value::Int].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VarInt;

impl VarInt {
    fn value(value: &Value) -> Result<u64, Error> {
        let int = value.as_int().ok_or(Error::UnexpectedValue {
            expected: "int",
            found: value.kind(),
        })?;
        u64::try_from(int).map_err(|_| Error::VarIntOverflow(int.clone()))
    }
}

impl Codec for VarInt {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        read(cursor).map(|(value, cursor)| (Value::from(value), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        write(Self::value(value)?, buf);
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        Self::value(value).map(size)
    }
}
