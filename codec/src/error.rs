//! Error types for codec operations

use crate::Value;
use num_bigint::BigUint;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("varint not canonically packed: {value} encoded in {size} bytes")]
    NonCanonicalVarInt { value: u64, size: usize },
    #[error("int too large for varint: {0}")]
    VarIntOverflow(BigUint),
    #[error("invalid int value for {bits}-bit int: {value}")]
    IntOutOfRange { bits: usize, value: BigUint },
    #[error("invalid bit width: {0}")]
    InvalidBitWidth(usize),
    #[error("incorrect length: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("enum value {0} not in values")]
    UnknownEnumValue(Value),
    #[error("enum symbol {0} not in values")]
    UnknownEnumSymbol(Value),
    #[error("duplicate value in values: {0}")]
    DuplicateValue(Value),
    #[error("duplicate symbol in values: {0}")]
    DuplicateSymbol(Value),
    #[error("unsupported address: {0}")]
    UnsupportedAddress(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("list element occupies no bytes")]
    ZeroWidthElement,
    #[error("reserved value used as payload: {0}")]
    ReservedValue(Value),
    #[error("field set mismatch: expected {expected:?}, found {found:?}")]
    FieldSetMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unexpected value: expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
    #[error("field {name}: {source}")]
    Field {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps the error with the name of the field being processed.
    pub fn in_field(self, name: impl Into<String>) -> Self {
        Self::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, stripping any field context.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Self::Field { source, .. } = err {
            err = source;
        }
        err
    }

    /// Returns the path of fields (outermost first) where the error occurred.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut err = self;
        while let Self::Field { name, source } = err {
            path.push(name.as_str());
            err = source;
        }
        path
    }
}
