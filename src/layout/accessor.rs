//! Typed field accessors

use std::any::Any;
use std::fmt;

use crate::codec::{CodecResult, SqlType};

use super::field_type::FieldType;

/// Object-safe access to one column of record type `R`
pub trait FieldAccessor<R>: Send + Sync {
    /// Type token of the column
    fn field_type(&self) -> FieldType;

    /// Canonical literal of the field's current value
    fn encode(&self, record: &R) -> String;

    /// Overwrites the field from a value reported by the engine
    fn set_from_column_text(&self, record: &mut R, text: &str) -> CodecResult<()>;

    fn as_any<'r>(&self, record: &'r R) -> &'r dyn Any;

    fn as_any_mut<'r>(&self, record: &'r mut R) -> &'r mut dyn Any;
}

/// Getter/setter pair for a field of type `T` inside `R`
pub struct Field<R, T> {
    get: fn(&R) -> &T,
    get_mut: fn(&mut R) -> &mut T,
}

impl<R, T> Field<R, T> {
    pub fn new(get: fn(&R) -> &T, get_mut: fn(&mut R) -> &mut T) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'r>(&self, record: &'r R) -> &'r T {
        (self.get)(record)
    }

    pub fn get_mut<'r>(&self, record: &'r mut R) -> &'r mut T {
        (self.get_mut)(record)
    }
}

impl<R, T> Clone for Field<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for Field<R, T> {}

impl<R, T> fmt::Debug for Field<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<R: 'static, T: SqlType> FieldAccessor<R> for Field<R, T> {
    fn field_type(&self) -> FieldType {
        FieldType::of::<T>()
    }

    fn encode(&self, record: &R) -> String {
        self.get(record).encode()
    }

    fn set_from_column_text(&self, record: &mut R, text: &str) -> CodecResult<()> {
        *self.get_mut(record) = T::from_column_text(text)?;
        Ok(())
    }

    fn as_any<'r>(&self, record: &'r R) -> &'r dyn Any {
        self.get(record)
    }

    fn as_any_mut<'r>(&self, record: &'r mut R) -> &'r mut dyn Any {
        self.get_mut(record)
    }
}
