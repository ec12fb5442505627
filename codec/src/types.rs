//! Wire types and the [Type] tree that composes them.

use crate::{Codec, Cursor, Error, Value, VarInt};
use ::bytes::BufMut;

pub mod bytes;
pub mod composed;
pub mod enumeration;
pub mod net;
pub mod possibly_none;
pub mod primitives;
pub mod vec;

use self::{
    bytes::{FixedStr, VarStr},
    composed::Composed,
    enumeration::Enum,
    net::Ipv6Address,
    possibly_none::PossiblyNone,
    primitives::{Endianness, Int},
    vec::List,
};

/// Any wire type.
///
/// Types are immutable once built and compare (and hash) structurally, so they can be used as
/// map keys and shared across threads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    VarInt(VarInt),
    Int(Int),
    FixedStr(FixedStr),
    VarStr(VarStr),
    List(List),
    Enum(Enum),
    Composed(Composed),
    PossiblyNone(PossiblyNone),
    Ipv6Address(Ipv6Address),
}

impl Type {
    pub fn var_int() -> Self {
        Self::VarInt(VarInt)
    }

    /// Returns an unsigned integer of `bits` bits.
    ///
    /// Returns [Error::InvalidBitWidth] unless `bits` is a positive multiple of 8.
    pub fn int(bits: usize, endianness: Endianness) -> Result<Self, Error> {
        Int::new(bits, endianness).map(Self::Int)
    }

    pub fn fixed_str(length: usize) -> Self {
        Self::FixedStr(FixedStr::new(length))
    }

    pub fn var_str() -> Self {
        Self::VarStr(VarStr)
    }

    pub fn list(element: impl Into<Type>) -> Self {
        Self::List(List::new(element))
    }

    /// See [Enum::new].
    pub fn enumeration<I, S, R>(inner: impl Into<Type>, values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<Value>,
        R: Into<Value>,
    {
        Enum::new(inner, values).map(Self::Enum)
    }

    /// See [Composed::new].
    pub fn composed<I, S, T>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Type>,
    {
        Composed::new(fields).map(Self::Composed)
    }

    pub fn possibly_none(none_value: impl Into<Value>, inner: impl Into<Type>) -> Self {
        Self::PossiblyNone(PossiblyNone::new(none_value, inner))
    }

    pub fn ipv6_address() -> Self {
        Self::Ipv6Address(Ipv6Address)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Type {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    VarInt,
    Int,
    FixedStr,
    VarStr,
    List,
    Enum,
    Composed,
    PossiblyNone,
    Ipv6Address,
);

macro_rules! dispatch {
    ($self:ident, $codec:ident => $expr:expr) => {
        match $self {
            Type::VarInt($codec) => $expr,
            Type::Int($codec) => $expr,
            Type::FixedStr($codec) => $expr,
            Type::VarStr($codec) => $expr,
            Type::List($codec) => $expr,
            Type::Enum($codec) => $expr,
            Type::Composed($codec) => $expr,
            Type::PossiblyNone($codec) => $expr,
            Type::Ipv6Address($codec) => $expr,
        }
    };
}

impl Codec for Type {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        dispatch!(self, codec => codec.read(cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        dispatch!(self, codec => codec.write(buf, value))
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        dispatch!(self, codec => codec.encode_size(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_constructors() {
        assert_eq!(Type::var_int(), Type::from(VarInt));
        assert_eq!(Type::fixed_str(4), Type::from(FixedStr::new(4)));
        assert_eq!(Type::var_str(), Type::from(VarStr));
        assert_eq!(Type::list(VarInt), Type::from(List::new(VarInt)));
        assert_eq!(Type::ipv6_address(), Type::from(Ipv6Address));
        assert_eq!(
            Type::possibly_none(0u8, VarInt),
            Type::from(PossiblyNone::new(0u8, VarInt))
        );
        assert_eq!(
            Type::int(24, Endianness::Big).unwrap(),
            Type::from(Int::new(24, Endianness::Big).unwrap())
        );
        assert_eq!(
            Type::int(12, Endianness::Little),
            Err(Error::InvalidBitWidth(12))
        );
        assert!(Type::enumeration(VarInt, [("a", 0u8), ("b", 0u8)]).is_err());
        assert!(Type::composed([("a", VarInt), ("a", VarInt)]).is_err());
    }

    #[test]
    fn test_dispatch() {
        let types = [
            (Type::var_int(), Value::from(0xFDu8)),
            (Type::int(8, Endianness::Little).unwrap(), Value::from(7u8)),
            (Type::fixed_str(2), Value::from(&b"ab"[..])),
            (Type::var_str(), Value::from(&b"abc"[..])),
            (
                Type::list(VarInt),
                Value::List(vec![Value::from(1u8), Value::from(2u8)]),
            ),
            (
                Type::enumeration(VarInt, [("one", 1u8)]).unwrap(),
                Value::from("one"),
            ),
            (Type::possibly_none(0u8, VarInt), Value::None),
            (Type::ipv6_address(), Value::from("192.168.1.1")),
        ];
        for (ty, value) in types {
            let encoded = ty.pack(&value).unwrap();
            assert_eq!(ty.encode_size(&value).unwrap(), encoded.len());
            assert_eq!(ty.unpack(encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_structural_keys() {
        let mut names = HashMap::new();
        names.insert(Type::list(Type::var_str()), "strings");
        names.insert(Type::int(32, Endianness::Little).unwrap(), "u32");
        names.insert(
            Type::composed([("x", Type::var_int()), ("y", Type::var_str())]).unwrap(),
            "point",
        );

        // Independently built, structurally equal types find the same entries.
        assert_eq!(names.get(&Type::list(VarStr)), Some(&"strings"));
        assert_eq!(
            names.get(&Type::int(32, Endianness::Little).unwrap()),
            Some(&"u32")
        );
        assert_eq!(
            names.get(&Type::composed([("x", Type::var_int()), ("y", Type::var_str())]).unwrap()),
            Some(&"point")
        );

        assert_eq!(names.get(&Type::int(32, Endianness::Big).unwrap()), None);
        assert_eq!(names.get(&Type::list(Type::var_int())), None);
    }

    #[test]
    fn test_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Type>();
    }
}
