//! Ordered sequences of named fields.

use crate::{schema_for, Codec, Cursor, Error, Record, RecordSchema, Type, Value};
use bytes::BufMut;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};
use tracing::trace;

/// Named fields encoded back to back in declaration order, read and written as [Value::Record].
///
/// The record produced by [Codec::read] uses the registered schema for the field names, so
/// it compares equal to any record (or map) holding the same fields and values.
#[derive(Clone, Debug)]
pub struct Composed {
    fields: Arc<[(String, Type)]>,
    schema: Arc<RecordSchema>,
    digest: OnceLock<u64>,
}

impl Composed {
    /// Creates a composed type from `(name, type)` pairs in wire order.
    ///
    /// Returns [Error::DuplicateField] if a name appears more than once.
    pub fn new<I, S, T>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Type>,
    {
        let fields: Arc<[(String, Type)]> = fields
            .into_iter()
            .map(|(name, ty)| (name.into(), ty.into()))
            .collect();
        let schema = schema_for(fields.iter().map(|(name, _)| name.clone()))?;
        Ok(Self {
            fields,
            schema,
            digest: OnceLock::new(),
        })
    }

    /// Returns the fields in wire order.
    pub fn fields(&self) -> &[(String, Type)] {
        &self.fields
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Returns an empty record with this type's fields.
    pub fn record(&self) -> Record {
        Record::with_schema(self.schema.clone())
    }

    /// Returns `value` as a record holding exactly this type's fields, all set.
    fn value<'a>(&self, value: &'a Value) -> Result<&'a Record, Error> {
        let record = value.as_record().ok_or(Error::UnexpectedValue {
            expected: "record",
            found: value.kind(),
        })?;
        if record.schema().names() != self.schema.names() || !record.is_complete() {
            return Err(Error::FieldSetMismatch {
                expected: self.schema.names().to_vec(),
                found: record
                    .iter()
                    .filter(|(_, value)| value.is_some())
                    .map(|(name, _)| name.to_string())
                    .collect(),
            });
        }
        Ok(record)
    }

    fn field<'a>(record: &'a Record, name: &str) -> Result<&'a Value, Error> {
        // Presence was checked against the schema.
        record
            .get(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }
}

impl Codec for Composed {
    fn read(&self, mut cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let mut record = self.record();
        for (name, ty) in self.fields.iter() {
            let (value, next) = ty.read(cursor).map_err(|err| err.in_field(name))?;
            trace!(field = name.as_str(), offset = next.offset(), "read field");
            record.set(name, value)?;
            cursor = next;
        }
        Ok((Value::Record(record), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        let record = self.value(value)?;
        for (name, ty) in self.fields.iter() {
            ty.write(buf, Self::field(record, name)?)
                .map_err(|err| err.in_field(name))?;
        }
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        let record = self.value(value)?;
        self.fields.iter().try_fold(0, |size, (name, ty)| {
            let len = ty
                .encode_size(Self::field(record, name)?)
                .map_err(|err| err.in_field(name))?;
            Ok(size + len)
        })
    }
}

impl PartialEq for Composed {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields) || self.fields == other.fields
    }
}

impl Eq for Composed {}

impl Hash for Composed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let digest = self.digest.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.fields.hash(&mut hasher);
            hasher.finish()
        });
        state.write_u64(*digest);
    }
}
