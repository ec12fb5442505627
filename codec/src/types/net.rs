//! IPv4-mapped IPv6 addresses.
//!
//! An address occupies 16 bytes on the wire: the fixed prefix `::ffff:0:0/96` followed by the
//! four octets of the IPv4 address. Any other IPv6 address is rejected when read.

use crate::{value::Hex, Codec, Cursor, Error, Value};
use bytes::BufMut;

/// Length of an encoded address.
const ADDRESS_LEN: usize = 16;

/// Prefix shared by all IPv4-mapped IPv6 addresses.
const PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF];

/// A 16-byte IPv4-mapped IPv6 address, read and written as a dotted-quad [Value::Str].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ipv6Address;

impl Ipv6Address {
    /// Parses the octets of a dotted-quad address.
    fn octets(value: &Value) -> Result<[u8; 4], Error> {
        let text = value.as_str().ok_or(Error::UnexpectedValue {
            expected: "str",
            found: value.kind(),
        })?;
        let invalid = || Error::InvalidAddress(text.to_string());
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 4 {
            return Err(invalid());
        }
        let mut octets = [0u8; 4];
        for (octet, part) in octets.iter_mut().zip(parts) {
            // Only the canonical decimal form reads back to the same string.
            let canonical = !part.is_empty() && (part == "0" || !part.starts_with('0'));
            if !canonical || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *octet = part.parse().map_err(|_| invalid())?;
        }
        Ok(octets)
    }
}

impl Codec for Ipv6Address {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (data, cursor) = cursor.read(ADDRESS_LEN)?;
        if data[..PREFIX.len()] != PREFIX {
            return Err(Error::UnsupportedAddress(Hex(&data).to_string()));
        }
        let [a, b, c, d] = [data[12], data[13], data[14], data[15]];
        Ok((Value::Str(format!("{a}.{b}.{c}.{d}")), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        let octets = Self::octets(value)?;
        buf.put_slice(&PREFIX);
        buf.put_slice(&octets);
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        Self::octets(value)?;
        Ok(ADDRESS_LEN)
    }
}
