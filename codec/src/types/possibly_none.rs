//! Optional values marked by a reserved raw value.

use crate::{Codec, Cursor, Error, Type, Value};
use bytes::BufMut;
use std::sync::Arc;

/// An inner type with one of its raw values reserved to mean "absent".
///
/// Reading the reserved value yields [Value::None]; writing [Value::None] writes the reserved
/// value. The reserved value itself can therefore never be written as a payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PossiblyNone {
    none_value: Value,
    inner: Arc<Type>,
}

impl PossiblyNone {
    pub fn new(none_value: impl Into<Value>, inner: impl Into<Type>) -> Self {
        Self {
            none_value: none_value.into(),
            inner: Arc::new(inner.into()),
        }
    }

    pub fn none_value(&self) -> &Value {
        &self.none_value
    }

    pub fn inner(&self) -> &Type {
        &self.inner
    }

    /// Returns the raw value to write for `value`.
    fn raw<'a>(&'a self, value: &'a Value) -> Result<&'a Value, Error> {
        if value == &self.none_value {
            return Err(Error::ReservedValue(value.clone()));
        }
        if value.is_none() {
            return Ok(&self.none_value);
        }
        Ok(value)
    }
}

impl Codec for PossiblyNone {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (value, cursor) = self.inner.read(cursor)?;
        if value == self.none_value {
            return Ok((Value::None, cursor));
        }
        Ok((value, cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        self.inner.write(buf, self.raw(value)?)
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        self.inner.encode_size(self.raw(value)?)
    }
}
