//! Fixed-width unsigned integers.
//!
//! # Native vs generic widths
//!
//! [Int::new] picks a representation once, at construction:
//!
//! * Widths of 8, 16, 32 and 64 bits become an [Int::Native], which reads and writes with the
//!   fixed-width accessors of [bytes::Buf] and [bytes::BufMut].
//! * Any other positive multiple of 8 becomes an [Int::Generic], which converts between bytes
//!   and [BigUint] directly. This covers widths such as 24 or 256 bits.
//!
//! Both produce identical bytes for the same width and [Endianness]; the distinction only
//! affects how the value is converted.

use crate::{Codec, Cursor, Error, Value};
use bytes::{Buf, BufMut};
use num_bigint::BigUint;

/// Byte order of a fixed-width integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Widths with a native Rust integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    pub fn bits(&self) -> usize {
        self.bytes() * 8
    }

    pub fn bytes(&self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }
}

/// An integer with a native width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeInt {
    width: Width,
    endianness: Endianness,
}

impl NativeInt {
    pub fn new(width: Width, endianness: Endianness) -> Self {
        Self { width, endianness }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn value(&self, value: &Value) -> Result<u64, Error> {
        let int = int_value(value)?;
        u64::try_from(int)
            .ok()
            .filter(|value| self.width == Width::W64 || *value >> self.width.bits() == 0)
            .ok_or_else(|| Error::IntOutOfRange {
                bits: self.width.bits(),
                value: int.clone(),
            })
    }
}

impl Codec for NativeInt {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (mut data, cursor) = cursor.read(self.width.bytes())?;
        let value = match (self.width, self.endianness) {
            (Width::W8, _) => data.get_u8() as u64,
            (Width::W16, Endianness::Little) => data.get_u16_le() as u64,
            (Width::W16, Endianness::Big) => data.get_u16() as u64,
            (Width::W32, Endianness::Little) => data.get_u32_le() as u64,
            (Width::W32, Endianness::Big) => data.get_u32() as u64,
            (Width::W64, Endianness::Little) => data.get_u64_le(),
            (Width::W64, Endianness::Big) => data.get_u64(),
        };
        Ok((Value::from(value), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        // Range checked, so the casts below do not truncate.
        let value = self.value(value)?;
        match (self.width, self.endianness) {
            (Width::W8, _) => buf.put_u8(value as u8),
            (Width::W16, Endianness::Little) => buf.put_u16_le(value as u16),
            (Width::W16, Endianness::Big) => buf.put_u16(value as u16),
            (Width::W32, Endianness::Little) => buf.put_u32_le(value as u32),
            (Width::W32, Endianness::Big) => buf.put_u32(value as u32),
            (Width::W64, Endianness::Little) => buf.put_u64_le(value),
            (Width::W64, Endianness::Big) => buf.put_u64(value),
        }
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.value(value)?;
        Ok(self.width.bytes())
    }
}

/// An integer of any whole number of bytes.
///
/// Only [Int::new] creates one, and only for widths without a [NativeInt], so each width has
/// exactly one descriptor:
///
/// ```compile_fail
/// use wirepack::{BitInt, Endianness};
///
/// let int = BitInt::new(8, Endianness::Little);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitInt {
    bytes: usize,
    endianness: Endianness,
}

impl BitInt {
    /// Returns [Error::InvalidBitWidth] unless `bits` is a positive multiple of 8.
    pub(crate) fn new(bits: usize, endianness: Endianness) -> Result<Self, Error> {
        if bits == 0 || bits % 8 != 0 {
            return Err(Error::InvalidBitWidth(bits));
        }
        Ok(Self {
            bytes: bits / 8,
            endianness,
        })
    }

    pub fn bits(&self) -> usize {
        self.bytes * 8
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn value<'a>(&self, value: &'a Value) -> Result<&'a BigUint, Error> {
        let int = int_value(value)?;
        if int.bits() > self.bits() as u64 {
            return Err(Error::IntOutOfRange {
                bits: self.bits(),
                value: int.clone(),
            });
        }
        Ok(int)
    }
}

impl Codec for BitInt {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (data, cursor) = cursor.read(self.bytes)?;
        let value = match self.endianness {
            Endianness::Little => BigUint::from_bytes_le(&data),
            Endianness::Big => BigUint::from_bytes_be(&data),
        };
        Ok((Value::Int(value), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        let mut data = self.value(value)?.to_bytes_le();
        data.resize(self.bytes, 0);
        if self.endianness == Endianness::Big {
            data.reverse();
        }
        buf.put_slice(&data);
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.value(value)?;
        Ok(self.bytes)
    }
}

/// An unsigned integer in `[0, 2^bits)`, read and written as [Value::Int].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Int {
    Native(NativeInt),
    Generic(BitInt),
}

impl Int {
    /// Creates an integer type of `bits` bits.
    ///
    /// Returns [Error::InvalidBitWidth] unless `bits` is a positive multiple of 8.
    pub fn new(bits: usize, endianness: Endianness) -> Result<Self, Error> {
        let width = match bits {
            8 => Width::W8,
            16 => Width::W16,
            32 => Width::W32,
            64 => Width::W64,
            _ => return BitInt::new(bits, endianness).map(Self::Generic),
        };
        Ok(Self::Native(NativeInt::new(width, endianness)))
    }

    pub fn bits(&self) -> usize {
        match self {
            Self::Native(int) => int.width().bits(),
            Self::Generic(int) => int.bits(),
        }
    }

    pub fn endianness(&self) -> Endianness {
        match self {
            Self::Native(int) => int.endianness(),
            Self::Generic(int) => int.endianness(),
        }
    }
}

impl Codec for Int {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        match self {
            Self::Native(int) => int.read(cursor),
            Self::Generic(int) => int.read(cursor),
        }
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        match self {
            Self::Native(int) => int.write(buf, value),
            Self::Generic(int) => int.write(buf, value),
        }
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        match self {
            Self::Native(int) => int.encode_size(value),
            Self::Generic(int) => int.encode_size(value),
        }
    }
}

fn int_value(value: &Value) -> Result<&BigUint, Error> {
    value.as_int().ok_or(Error::UnexpectedValue {
        expected: "int",
        found: value.kind(),
    })
}
