//! Named-field values produced by [crate::Composed].
//!
//! Every distinct set of field names maps to exactly one [RecordSchema], held in a process-wide
//! registry. Records with the same field names share that schema, regardless of the order in
//! which the names were supplied or which [crate::Composed] type produced them.

use crate::{Error, Value};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt,
    hash::{Hash, Hasher},
    ops::Index,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};
use tracing::debug;

/// Registered schemas, keyed by their sorted field names. Entries are never removed or modified.
static SCHEMAS: LazyLock<RwLock<HashMap<Box<[String]>, Arc<RecordSchema>>>> =
    LazyLock::new(Default::default);

/// The set of field names of a [Record], sorted.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordSchema {
    names: Box<[String]>,
}

impl RecordSchema {
    /// Returns the field names in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the slot of `name`, if it is a field of this schema.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }
}

/// Returns the shared schema for the given field names, registering it on first use.
///
/// Returns [Error::DuplicateField] if a name appears more than once.
pub fn schema_for<I, S>(names: I) -> Result<Arc<RecordSchema>, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort_unstable();
    if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(Error::DuplicateField(pair[0].clone()));
    }
    let names = names.into_boxed_slice();

    // A poisoned lock still guards a consistent map (entries are only ever inserted whole).
    if let Some(schema) = SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&names)
    {
        return Ok(schema.clone());
    }
    let mut schemas = SCHEMAS.write().unwrap_or_else(PoisonError::into_inner);
    let schema = schemas.entry(names).or_insert_with_key(|names| {
        debug!(fields = ?names, "registered record schema");
        Arc::new(RecordSchema {
            names: names.clone(),
        })
    });
    Ok(schema.clone())
}

/// A fixed set of named fields, each of which may be unset.
///
/// Fields are stored in the sorted order of their names. The order in which a
/// [crate::Composed] type reads and writes them is defined by the type, not the record.
#[derive(Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Creates a record with every field unset.
    pub fn new<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::with_schema(schema_for(names)?))
    }

    /// Creates a record for an existing schema with every field unset.
    pub fn with_schema(schema: Arc<RecordSchema>) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    /// Creates a record with the same fields and values as `map`.
    pub fn from_map(map: BTreeMap<String, Value>) -> Result<Self, Error> {
        let mut record = Self::new(map.keys().cloned())?;
        for (slot, (_, value)) in record.values.iter_mut().zip(map) {
            *slot = Some(value);
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Returns every field name (set or not), sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schema.names().iter().map(String::as_str)
    }

    /// Returns true if `name` is one of the record's fields.
    pub fn contains(&self, name: &str) -> bool {
        self.schema.position(name).is_some()
    }

    /// Returns the value of `name`, or `None` if the field is unset or unknown.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .position(name)
            .and_then(|index| self.values[index].as_ref())
    }

    /// Returns the value of `name`, or `default` if the field is unset or unknown.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.get(name).unwrap_or(default)
    }

    /// Sets `name` to `value`, returning the previous value.
    ///
    /// Returns [Error::UnknownField] if `name` is not a field of the record.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>, Error> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        Ok(self.values[index].replace(value.into()))
    }

    /// Sets `name` to `value`, returning the updated record.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Returns true if every field is set.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Returns the names of unset fields.
    pub fn missing(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    /// Iterates over `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.keys().zip(self.values.iter().map(Option::as_ref))
    }

    /// Converts the record to a map of its set fields.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.iter()
            .filter_map(|(name, value)| Some((name.to_string(), value?.clone())))
            .collect()
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Panics if the field is unknown or unset.
    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("record has no value for field {name:?}"),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.names() == other.schema.names() && self.values == other.values
    }
}

impl Eq for Record {}

impl PartialEq<BTreeMap<String, Value>> for Record {
    fn eq(&self, other: &BTreeMap<String, Value>) -> bool {
        self.schema.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((name, value), (key, expected))| name == key && value == Some(expected))
    }
}

impl PartialEq<Record> for BTreeMap<String, Value> {
    fn eq(&self, other: &Record) -> bool {
        other == self
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.names().hash(state);
        self.values.hash(state);
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.schema
            .names()
            .cmp(other.schema.names())
            .then_with(|| self.values.cmp(&other.values))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
