//! Symbolic values mapped onto raw wire values.

use crate::{Codec, Cursor, Error, Type, Value};
use bytes::BufMut;
use std::{
    collections::{hash_map::DefaultHasher, BTreeMap},
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

/// A bijection between symbols and the raw values an inner type puts on the wire.
///
/// Reads the raw value with the inner type and returns its symbol; writes the raw value mapped
/// to the given symbol. Raw values without a symbol (and symbols without a raw value) are
/// rejected.
#[derive(Clone, Debug)]
pub struct Enum {
    inner: Arc<Type>,
    values: BTreeMap<Value, Value>,
    keys: BTreeMap<Value, Value>,
    digest: OnceLock<u64>,
}

impl Enum {
    /// Creates an enum from `(symbol, raw)` pairs.
    ///
    /// Returns [Error::DuplicateValue] if two symbols share a raw value and
    /// [Error::DuplicateSymbol] if a symbol appears twice.
    pub fn new<I, S, R>(inner: impl Into<Type>, values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<Value>,
        R: Into<Value>,
    {
        let mut symbols = BTreeMap::new();
        let mut keys = BTreeMap::new();
        for (symbol, raw) in values {
            let (symbol, raw): (Value, Value) = (symbol.into(), raw.into());
            if keys.contains_key(&raw) {
                return Err(Error::DuplicateValue(raw));
            }
            if symbols.contains_key(&symbol) {
                return Err(Error::DuplicateSymbol(symbol));
            }
            keys.insert(raw.clone(), symbol.clone());
            symbols.insert(symbol, raw);
        }
        Ok(Self {
            inner: Arc::new(inner.into()),
            values: symbols,
            keys,
            digest: OnceLock::new(),
        })
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    /// Returns the raw value mapped to each symbol.
    pub fn values(&self) -> &BTreeMap<Value, Value> {
        &self.values
    }

    fn raw(&self, symbol: &Value) -> Result<&Value, Error> {
        self.values
            .get(symbol)
            .ok_or_else(|| Error::UnknownEnumSymbol(symbol.clone()))
    }
}

impl Codec for Enum {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (raw, cursor) = self.inner.read(cursor)?;
        match self.keys.get(&raw) {
            Some(symbol) => Ok((symbol.clone(), cursor)),
            None => Err(Error::UnknownEnumValue(raw)),
        }
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        self.inner.write(buf, self.raw(value)?)
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.inner.encode_size(self.raw(value)?)
    }
}

impl PartialEq for Enum {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.values == other.values
    }
}

impl Eq for Enum {}

impl Hash for Enum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let digest = self.digest.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.inner.hash(&mut hasher);
            self.values.hash(&mut hasher);
            hasher.finish()
        });
        state.write_u64(*digest);
    }
}
