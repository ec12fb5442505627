//! End-to-end tests for a nested share-chain schema.

use bytes::Bytes;
use std::{collections::BTreeMap, sync::Arc, thread};
use wirepack::{
    schema_for, Codec, Composed, Config, Endianness, Error, List, Record, Type, Value,
};

fn int(bits: usize) -> Type {
    Type::int(bits, Endianness::Little).unwrap()
}

fn header() -> Composed {
    Composed::new([
        ("version", Type::var_int()),
        ("previous_block", Type::possibly_none(0u8, int(256))),
        ("timestamp", int(32)),
        ("bits", int(32)),
        ("nonce", int(32)),
    ])
    .unwrap()
}

fn share() -> Composed {
    Composed::new([
        ("header", Type::from(header())),
        ("peer", Type::ipv6_address()),
        ("merkle_link", List::new(int(256)).into()),
        ("payload", Type::var_str()),
        (
            "kind",
            Type::enumeration(int(8), [("share", 1u8), ("block", 2u8)]).unwrap(),
        ),
    ])
    .unwrap()
}

fn header_value() -> Record {
    header()
        .record()
        .with("version", 4u8)
        .unwrap()
        .with("previous_block", Value::None)
        .unwrap()
        .with("timestamp", 0x5F5E_1000u32)
        .unwrap()
        .with("bits", 0x1D00_FFFFu32)
        .unwrap()
        .with("nonce", 7u32)
        .unwrap()
}

fn share_value() -> Value {
    share()
        .record()
        .with("header", header_value())
        .unwrap()
        .with("peer", "10.0.0.1")
        .unwrap()
        .with("merkle_link", Value::List(vec![]))
        .unwrap()
        .with("payload", &b"hi"[..])
        .unwrap()
        .with("kind", "block")
        .unwrap()
        .into()
}

fn share_bytes() -> Vec<u8> {
    let mut expected = vec![0x04];
    expected.extend_from_slice(&[0; 32]);
    expected.extend_from_slice(&[0x00, 0x10, 0x5E, 0x5F]);
    expected.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x1D]);
    expected.extend_from_slice(&[0x07, 0x00, 0x00, 0x00]);
    expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 10, 0, 0, 1]);
    expected.push(0x00);
    expected.extend_from_slice(&[0x02, b'h', b'i']);
    expected.push(0x02);
    expected
}

#[test]
fn test_conformity() {
    let encoded = share().pack(&share_value()).unwrap();
    assert_eq!(encoded, Bytes::from(share_bytes()));
    assert_eq!(share().encode_size(&share_value()).unwrap(), encoded.len());
}

#[test]
fn test_decode() {
    let decoded = share().unpack(share_bytes()).unwrap();
    assert_eq!(decoded, share_value());

    let record = decoded.as_record().unwrap();
    assert_eq!(record["kind"], Value::from("block"));
    assert_eq!(record["peer"], Value::from("10.0.0.1"));

    let header = record["header"].as_record().unwrap();
    assert_eq!(header["previous_block"], Value::None);
    assert_eq!(header["timestamp"].as_u64(), Some(0x5F5E_1000));
    let expected: BTreeMap<String, Value> = header_value().to_map();
    assert_eq!(header, &expected);
}

#[test]
fn test_previous_block() {
    let mut hash = [0u8; 32];
    hash[0] = 0xAB;
    hash[31] = 0x01;
    let mut value = share_value();
    if let Value::Record(record) = &mut value {
        let header = header_value()
            .with("previous_block", num_bigint::BigUint::from_bytes_le(&hash))
            .unwrap();
        record.set("header", header).unwrap();
    }

    let encoded = share().pack(&value).unwrap();
    assert_eq!(&encoded[1..33], &hash[..]);
    assert_eq!(share().unpack(encoded).unwrap(), value);
}

#[test]
fn test_truncated() {
    let data = share_bytes();
    for len in 0..data.len() {
        let err = share().unpack(data[..len].to_vec()).unwrap_err();
        assert!(
            matches!(err.root(), Error::EndOfBuffer { .. }),
            "unexpected error at {len}: {err}"
        );
        assert!(!err.path().is_empty());
    }

    // The nonce is the last header field.
    let err = share().unpack(data[..43].to_vec()).unwrap_err();
    assert_eq!(err.path(), vec!["header", "nonce"]);
}

#[test]
fn test_trailing_data() {
    let mut data = share_bytes();
    data.push(0x00);
    assert_eq!(share().unpack(data), Err(Error::ExtraData(1)));
}

#[test]
fn test_rejects_invalid_fields() {
    let mut data = share_bytes();
    *data.last_mut().unwrap() = 0x03;
    let err = share().unpack(data).unwrap_err();
    assert_eq!(err.path(), vec!["kind"]);
    assert_eq!(err.root(), &Error::UnknownEnumValue(Value::from(3u8)));

    let mut data = share_bytes();
    data[45 + 9] = 0x01;
    let err = share().unpack(data).unwrap_err();
    assert_eq!(err.path(), vec!["peer"]);
    assert!(matches!(err.root(), Error::UnsupportedAddress(_)));

    // A merkle link claiming one hash, with only four bytes left.
    let mut data = share_bytes();
    data[61] = 0x01;
    let err = share().unpack(data).unwrap_err();
    assert_eq!(err.path(), vec!["merkle_link", "[0]"]);
    assert!(matches!(err.root(), Error::EndOfBuffer { needed: 32, .. }));
}

#[test]
fn test_list_element_path() {
    let mut value = share_value();
    if let Value::Record(record) = &mut value {
        let hash = Value::from(1u8);
        let too_large = Value::Int(num_bigint::BigUint::from(1u8) << 256u32);
        record
            .set("merkle_link", Value::List(vec![hash, too_large]))
            .unwrap();
    }
    let err = share().pack(&value).unwrap_err();
    assert_eq!(err.path(), vec!["merkle_link", "[1]"]);
    assert!(matches!(err.root(), Error::IntOutOfRange { bits: 256, .. }));
    assert_eq!(
        err.to_string(),
        format!("field merkle_link: field [1]: {}", err.root())
    );
}

#[test]
fn test_verified_and_unverified() {
    for cfg in [Config::verified(), Config::unverified()] {
        let encoded = share().pack_cfg(&share_value(), &cfg).unwrap();
        assert_eq!(share().unpack_cfg(encoded, &cfg).unwrap(), share_value());
    }
}

#[test]
fn test_schema_registry_concurrent() {
    let names = ["registry_c", "registry_a", "registry_b"];
    let schemas: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let mut names = names;
                    let len = names.len();
                    names.rotate_left(i % len);
                    schema_for(names).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for schema in &schemas {
        assert!(Arc::ptr_eq(schema, &schemas[0]));
    }
    assert_eq!(
        schemas[0].names(),
        ["registry_a", "registry_b", "registry_c"]
    );
}

#[test]
fn test_shared_across_threads() {
    let ty = Arc::new(Type::from(share()));
    let encoded: Vec<Bytes> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ty = ty.clone();
                scope.spawn(move || ty.pack(&share_value()).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for data in encoded {
        assert_eq!(data, Bytes::from(share_bytes()));
    }
}

#[test]
fn test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let ty = Composed::new([("logging_field", Type::var_int())]).unwrap();
    let value: Value = ty.record().with("logging_field", 1u8).unwrap().into();
    let encoded = ty.pack_cfg(&value, &Config::verified()).unwrap();
    assert_eq!(ty.unpack(vec![0x01u8, 0x00]), Err(Error::ExtraData(1)));
    assert_eq!(ty.unpack(encoded).unwrap(), value);
}
