//! Varint-prefixed homogeneous lists.

use crate::{varint, Codec, Cursor, Error, Type, Value};
use bytes::BufMut;
use std::sync::Arc;

/// A varint count followed by that many elements, read and written as [Value::List].
///
/// Element order is preserved on the wire. Every element must occupy at least one byte, so the
/// number of elements read is bounded by the input length; a zero-width element fails with
/// [Error::ZeroWidthElement]. Element errors carry the element index (`[i]`) as context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct List {
    element: Arc<Type>,
}

impl List {
    pub fn new(element: impl Into<Type>) -> Self {
        Self {
            element: Arc::new(element.into()),
        }
    }

    pub fn element(&self) -> &Type {
        &self.element
    }

    fn value(value: &Value) -> Result<&[Value], Error> {
        value.as_list().ok_or(Error::UnexpectedValue {
            expected: "list",
            found: value.kind(),
        })
    }

    fn item_size(&self, item: &Value) -> Result<usize, Error> {
        match self.element.encode_size(item)? {
            0 => Err(Error::ZeroWidthElement),
            size => Ok(size),
        }
    }
}

fn index(index: usize) -> String {
    format!("[{index}]")
}

impl Codec for List {
    fn read(&self, cursor: Cursor) -> Result<(Value, Cursor), Error> {
        let (len, mut cursor) = varint::read(cursor)?;

        // Never reserve more slots than there are bytes left to fill them.
        let mut items = Vec::with_capacity(super::bytes::length(len).min(cursor.remaining()));
        for i in 0..super::bytes::length(len) {
            let remaining = cursor.remaining();
            let (item, next) = self
                .element
                .read(cursor)
                .map_err(|err| err.in_field(index(i)))?;
            if next.remaining() == remaining {
                return Err(Error::ZeroWidthElement.in_field(index(i)));
            }
            items.push(item);
            cursor = next;
        }
        Ok((Value::List(items), cursor))
    }

    fn write(&self, buf: &mut impl BufMut, value: &Value) -> Result<(), Error> {
        let items = Self::value(value)?;
        varint::write(items.len() as u64, buf);
        for (i, item) in items.iter().enumerate() {
            self.item_size(item)
                .and_then(|_| self.element.write(buf, item))
                .map_err(|err| err.in_field(index(i)))?;
        }
        Ok(())
    }

    fn encode_size(&self, value: &Value) -> Result<usize, Error> {
        let items = Self::value(value)?;
        items
            .iter()
            .enumerate()
            .try_fold(varint::size(items.len() as u64), |size, (i, item)| {
                let len = self.item_size(item).map_err(|err| err.in_field(index(i)))?;
                Ok(size + len)
            })
    }
}
