//! Core codec trait

use crate::{Config, Cursor, Error, Value};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// A wire type: a deterministic mapping between [Value]s and bytes.
///
/// Implementors provide [Codec::read], [Codec::write] and [Codec::encode_size]. Callers
/// normally use the provided [Codec::pack] and [Codec::unpack], which operate on complete
/// buffers.
pub trait Codec {
    /// Reads a value starting at `cursor`, returning it with the cursor positioned after it.
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error>;

    /// Appends the encoding of `value` to `buf`.
    ///
    /// On error, `buf` may contain a partial encoding and should be discarded.
    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error>;

    /// Returns the number of bytes [Codec::write] appends for `value`.
    ///
    /// Returns the same error [Codec::write] would for a value it cannot encode.
    fn encode_size(&self, value: &Value) -> Result<usize, Error>;

    /// Encodes `value` using the default [Config].
    fn pack(&self, value: &Value) -> Result<Bytes, Error> {
        self.pack_cfg(value, &Config::default())
    }

    /// Encodes `value`.
    ///
    /// Panics if [Codec::write] does not write exactly [Codec::encode_size] bytes, or (with
    /// [Config::verify]) if the output does not unpack to `value`.
    fn pack_cfg(&self, value: &Value, cfg: &Config) -> Result<Bytes, Error> {
        let len = self.encode_size(value)?;
        let mut buf = BytesMut::with_capacity(len);
        self.write(&mut buf, value)?;
        assert_eq!(buf.len(), len, "write() did not write expected bytes");
        let data = buf.freeze();

        if cfg.verify {
            trace!(len, "verifying packed value");
            match self.unpack_cfg(data.clone(), &Config::unverified()) {
                Ok(decoded) => assert_eq!(&decoded, value, "packed value did not unpack to itself"),
                Err(err) => panic!("packed value failed to unpack: {err}"),
            }
        }
        Ok(data)
    }

    /// Decodes `data` using the default [Config].
    fn unpack(&self, data: impl Into<Bytes>) -> Result<Value, Error> {
        self.unpack_cfg(data, &Config::default())
    }

    /// Decodes `data`, which must contain exactly one encoded value.
    ///
    /// Returns [Error::ExtraData] if bytes remain after the value. Panics (with
    /// [Config::verify]) if the decoded value does not pack back to `data`.
    fn unpack_cfg(&self, data: impl Into<Bytes>, cfg: &Config) -> Result<Value, Error> {
        let data = data.into();
        let (value, cursor) = self.read(Cursor::new(data.clone()))?;

        // Check that the buffer is fully consumed.
        let remaining = cursor.remaining();
        if remaining > 0 {
            trace!(remaining, "rejecting trailing bytes");
            return Err(Error::ExtraData(remaining));
        }

        if cfg.verify {
            trace!(len = data.len(), "verifying unpacked value");
            match self.pack_cfg(&value, &Config::unverified()) {
                Ok(repacked) => assert_eq!(repacked, data, "unpacked value did not pack to itself"),
                Err(err) => panic!("unpacked value failed to pack: {err}"),
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Endianness, Type};
    use bytes::Buf;

    /// Reads one byte, but writes one more than it was given.
    struct Skewed;

    impl Codec for Skewed {
        fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
            let (data, cursor) = cursor.read(1)?;
            Ok((Value::from(data[0]), cursor))
        }

        fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
            let byte = value.as_u64().unwrap_or_default() as u8;
            buf.put_u8(byte.wrapping_add(1));
            Ok(())
        }

        fn encode_size(&self, _: &Value) -> Result<usize, Error> {
            Ok(1)
        }
    }

    /// Claims a larger size than it writes.
    struct Short;

    impl Codec for Short {
        fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
            Ok((Value::None, cursor))
        }

        fn write(&self, _: &mut impl BufMut, _: &Value) -> Result<(), Error> {
            Ok(())
        }

        fn encode_size(&self, _: &Value) -> Result<usize, Error> {
            Ok(1)
        }
    }

    #[test]
    fn test_insufficient_buffer() {
        let int = Type::int(32, Endianness::Little).unwrap();
        assert!(matches!(
            int.unpack(Bytes::from_static(&[0x01, 0x02])),
            Err(Error::EndOfBuffer {
                needed: 4,
                remaining: 2
            })
        ));
    }

    #[test]
    fn test_extra_data() {
        let int = Type::int(8, Endianness::Little).unwrap();
        assert_eq!(
            int.unpack(Bytes::from_static(&[0x01, 0x02])),
            Err(Error::ExtraData(1))
        );
    }

    #[test]
    fn test_pack_unpack() {
        let int = Type::int(16, Endianness::Big).unwrap();
        let value = Value::from(0x0102u16);
        for cfg in [Config::verified(), Config::unverified()] {
            let packed = int.pack_cfg(&value, &cfg).unwrap();
            assert_eq!(packed, Bytes::from_static(&[0x01, 0x02]));
            assert_eq!(int.unpack_cfg(packed, &cfg).unwrap(), value);
        }
    }

    #[test]
    fn test_unpack_accepts_slices() {
        let int = Type::int(8, Endianness::Little).unwrap();
        assert_eq!(int.unpack(vec![7u8]).unwrap(), Value::from(7u8));
        assert_eq!(int.unpack(&b"\x07"[..]).unwrap(), Value::from(7u8));
    }

    #[test]
    fn test_unverified_skips_checks() {
        let packed = Skewed.pack_cfg(&Value::from(1u8), &Config::unverified()).unwrap();
        assert_eq!(packed.chunk(), &[2]);
        assert_eq!(
            Skewed.unpack_cfg(packed, &Config::unverified()).unwrap(),
            Value::from(2u8)
        );
    }

    #[test]
    #[should_panic(expected = "packed value did not unpack to itself")]
    fn test_verify_pack() {
        let _ = Skewed.pack_cfg(&Value::from(1u8), &Config::verified());
    }

    #[test]
    #[should_panic(expected = "unpacked value did not pack to itself")]
    fn test_verify_unpack() {
        let _ = Skewed.unpack_cfg(vec![1u8], &Config::verified());
    }

    #[test]
    #[should_panic(expected = "write() did not write expected bytes")]
    fn test_encode_size_mismatch() {
        let _ = Short.pack_cfg(&Value::None, &Config::unverified());
    }
}
