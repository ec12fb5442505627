#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use std::sync::LazyLock;
use wirepack::{Codec, Composed, Config, Endianness, Error, Type, Value};

/// Schemas exercised by arbitrary input.
static SCHEMAS: LazyLock<Vec<Type>> = LazyLock::new(|| {
    let int = |bits, endianness| Type::int(bits, endianness).expect("valid bit width");
    vec![
        Type::var_int(),
        int(8, Endianness::Little),
        int(32, Endianness::Big),
        int(24, Endianness::Little),
        int(256, Endianness::Little),
        Type::fixed_str(4),
        Type::var_str(),
        Type::list(Type::var_int()),
        Type::list(Type::list(Type::var_str())),
        Type::enumeration(int(8, Endianness::Little), [("a", 1u8), ("b", 2u8), ("c", 255u8)])
            .expect("valid enum"),
        Type::possibly_none(0xFFFF_FFFFu32, int(32, Endianness::Little)),
        Type::ipv6_address(),
        Type::from(share()),
    ]
});

fn share() -> Composed {
    let int = |bits, endianness| Type::int(bits, endianness).expect("valid bit width");
    Composed::new([
        ("version", Type::var_int()),
        ("previous", Type::possibly_none(0u8, int(256, Endianness::Little))),
        ("timestamp", int(32, Endianness::Little)),
        ("address", Type::ipv6_address()),
        ("nonces", Type::list(int(64, Endianness::Big))),
        ("payload", Type::var_str()),
    ])
    .expect("valid fields")
}

#[derive(Arbitrary, Debug)]
struct Share {
    version: u64,
    previous: Option<[u8; 32]>,
    timestamp: u32,
    address: [u8; 4],
    nonces: Vec<u64>,
    payload: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Bytes(u8, &'a [u8]),
    VarInt(u64),
    Int(u8, u128, bool),
    Wide(Vec<u8>),
    FixedStr(Vec<u8>),
    VarStr(Vec<u8>),
    List(Vec<u64>),
    Address([u8; 4]),
    Optional(Option<u32>),
    Share(Share),
}

fn roundtrip(ty: &Type, value: &Value) {
    let encoded = ty
        .pack_cfg(value, &Config::verified())
        .expect("Failed to encode a valid value!");
    assert_eq!(ty.encode_size(value).unwrap(), encoded.len());
    let decoded = ty
        .unpack_cfg(encoded, &Config::verified())
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(&decoded, value);
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Bytes(index, data) => {
            // Anything that decodes must be the unique encoding of its value.
            let ty = &SCHEMAS[index as usize % SCHEMAS.len()];
            let data = Bytes::copy_from_slice(data);
            if let Ok(value) = ty.unpack_cfg(data.clone(), &Config::unverified()) {
                let repacked = ty
                    .pack_cfg(&value, &Config::unverified())
                    .expect("Failed to encode a decoded value!");
                assert_eq!(repacked, data);
            }
        }
        FuzzInput::VarInt(value) => roundtrip(&Type::var_int(), &Value::from(value)),
        FuzzInput::Int(width, value, big) => {
            let bits = 8 * (width as usize % 16 + 1);
            let endianness = if big {
                Endianness::Big
            } else {
                Endianness::Little
            };
            let ty = Type::int(bits, endianness).expect("valid bit width");
            let value = Value::from(value);
            match ty.pack(&value) {
                Ok(_) => roundtrip(&ty, &value),
                Err(err) => assert!(matches!(err, Error::IntOutOfRange { .. })),
            }
        }
        FuzzInput::Wide(data) => {
            let ty = Type::int(256, Endianness::Big).expect("valid bit width");
            let data = &data[..data.len().min(32)];
            roundtrip(&ty, &Value::from(BigUint::from_bytes_le(data)));
        }
        FuzzInput::FixedStr(data) => {
            roundtrip(&Type::fixed_str(data.len()), &Value::from(data));
        }
        FuzzInput::VarStr(data) => roundtrip(&Type::var_str(), &Value::from(data)),
        FuzzInput::List(items) => {
            let value = Value::List(items.into_iter().map(Value::from).collect());
            roundtrip(&Type::list(Type::var_int()), &value);
        }
        FuzzInput::Address([a, b, c, d]) => {
            roundtrip(&Type::ipv6_address(), &Value::from(format!("{a}.{b}.{c}.{d}")));
        }
        FuzzInput::Optional(value) => {
            let ty = &SCHEMAS[10];
            match value {
                Some(0xFFFF_FFFF) => assert!(matches!(
                    ty.pack(&Value::from(0xFFFF_FFFFu32)),
                    Err(Error::ReservedValue(_))
                )),
                value => roundtrip(ty, &Value::from(value)),
            }
        }
        FuzzInput::Share(input) => {
            let schema = share();
            let previous = match input.previous {
                Some(hash) if hash.iter().any(|byte| *byte != 0) => {
                    Value::from(BigUint::from_bytes_le(&hash))
                }
                _ => Value::None,
            };
            let [a, b, c, d] = input.address;
            let record = schema
                .record()
                .with("version", input.version)
                .and_then(|r| r.with("previous", previous))
                .and_then(|r| r.with("timestamp", input.timestamp))
                .and_then(|r| r.with("address", format!("{a}.{b}.{c}.{d}")))
                .and_then(|r| {
                    r.with(
                        "nonces",
                        Value::List(input.nonces.into_iter().map(Value::from).collect()),
                    )
                })
                .and_then(|r| r.with("payload", input.payload))
                .expect("known fields");
            roundtrip(&Type::from(schema), &Value::from(record));
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
