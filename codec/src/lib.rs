//! Serialize structured data.
//!
//! # Overview
//!
//! A library of composable wire types that:
//! - Serialize structured data into a compact, deterministic binary format
//! - Deserialize untrusted binary input into structured data
//!
//! Schemas are built at runtime by composing [Type]s, which convert between bytes and dynamic
//! [Value]s. Every encoding is canonical: a value has exactly one encoding, and decoding
//! rejects any input that is not the encoding of some value (including trailing bytes and
//! non-minimal varints).
//!
//! # Supported Types
//!
//! - [VarInt]: Bitcoin-style variable-length unsigned integers
//! - [Int]: unsigned integers of any byte-multiple width, little- or big-endian
//! - [FixedStr] and [VarStr]: fixed-length and length-prefixed byte strings
//! - [List]: length-prefixed homogeneous lists
//! - [Enum]: symbols mapped onto the raw values of another type
//! - [Composed]: named fields in declaration order, decoded into [Record]s
//! - [PossiblyNone]: another type with one raw value reserved for "absent"
//! - [Ipv6Address]: IPv4-mapped IPv6 addresses
//!
//! # Example
//!
//! ```
//! use wirepack::{Codec, Composed, Endianness, Type, Value};
//!
//! let share = Composed::new([
//!     ("version", Type::int(32, Endianness::Little).unwrap()),
//!     ("previous", Type::possibly_none(0u8, Type::var_int())),
//!     ("payouts", Type::list(Type::var_str())),
//! ])
//! .unwrap();
//!
//! let value: Value = share
//!     .record()
//!     .with("version", 17u32)
//!     .unwrap()
//!     .with("previous", Value::None)
//!     .unwrap()
//!     .with("payouts", Value::List(vec![Value::from(&b"abc"[..])]))
//!     .unwrap()
//!     .into();
//!
//! let encoded = share.pack(&value).unwrap();
//! assert_eq!(
//!     encoded,
//!     &[0x11, 0x00, 0x00, 0x00, 0x00, 0x01, 0x03, b'a', b'b', b'c'][..]
//! );
//! assert_eq!(share.unpack(encoded).unwrap(), value);
//! ```
//!
//! # Verification
//!
//! With [Config::verify] set (the default in debug builds), [Codec::pack] checks that its
//! output unpacks to the input and [Codec::unpack] checks that its input is reproduced by
//! packing the result. A mismatch means a wire type is broken, and panics.

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod record;
pub mod types;
pub mod value;
pub mod varint;

// Re-export main types and traits
pub use codec::Codec;
pub use config::Config;
pub use cursor::Cursor;
pub use error::Error;
pub use record::{schema_for, Record, RecordSchema};
pub use types::{
    bytes::{FixedStr, VarStr},
    composed::Composed,
    enumeration::Enum,
    net::Ipv6Address,
    possibly_none::PossiblyNone,
    primitives::{BitInt, Endianness, Int, NativeInt, Width},
    vec::List,
    Type,
};
pub use value::Value;
pub use varint::VarInt;
