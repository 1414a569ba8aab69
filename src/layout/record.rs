//! Index-addressed access to the fields of one record type

use std::any::type_name;
use std::fmt;

use super::accessor::FieldAccessor;
use super::errors::{LayoutError, LayoutResult};
use super::offsets::FieldLayout;

/// The accessor table of record type `R` together with its computed layout.
///
/// Column `i` of a schema is read and written through accessor `i`; the
/// layout is derived from the accessors' type tokens.
pub struct RecordLayout<R> {
    layout: FieldLayout,
    accessors: Vec<Box<dyn FieldAccessor<R>>>,
}

impl<R: 'static> RecordLayout<R> {
    pub fn new(accessors: Vec<Box<dyn FieldAccessor<R>>>) -> Self {
        let layout = FieldLayout::new(accessors.iter().map(|a| a.field_type()).collect());
        Self { layout, accessors }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    fn accessor(&self, index: usize) -> LayoutResult<&dyn FieldAccessor<R>> {
        self.accessors
            .get(index)
            .map(|a| a.as_ref())
            .ok_or(LayoutError::IndexOutOfRange {
                index,
                len: self.accessors.len(),
            })
    }

    /// Typed shared reference to field `index` of `record`
    pub fn get_field_ref<'r, T: 'static>(
        &self,
        record: &'r R,
        index: usize,
    ) -> LayoutResult<&'r T> {
        let accessor = self.accessor(index)?;
        accessor
            .as_any(record)
            .downcast_ref::<T>()
            .ok_or_else(|| LayoutError::TypeMismatch {
                index,
                expected: type_name::<T>(),
                actual: accessor.field_type().type_name(),
            })
    }

    /// Typed mutable reference to field `index` of `record`
    pub fn get_field_mut<'r, T: 'static>(
        &self,
        record: &'r mut R,
        index: usize,
    ) -> LayoutResult<&'r mut T> {
        let accessor = self.accessor(index)?;
        let actual = accessor.field_type().type_name();
        accessor
            .as_any_mut(record)
            .downcast_mut::<T>()
            .ok_or(LayoutError::TypeMismatch {
                index,
                expected: type_name::<T>(),
                actual,
            })
    }

    /// Canonical literal of field `index`
    pub fn encode(&self, record: &R, index: usize) -> LayoutResult<String> {
        Ok(self.accessor(index)?.encode(record))
    }

    /// Canonical literals of every field, in column order
    pub fn encode_all(&self, record: &R) -> Vec<String> {
        self.accessors.iter().map(|a| a.encode(record)).collect()
    }

    /// Overwrites field `index` from an engine-reported value
    pub fn set_from_column_text(
        &self,
        record: &mut R,
        index: usize,
        text: &str,
    ) -> LayoutResult<()> {
        self.accessor(index)?
            .set_from_column_text(record, text)
            .map_err(|source| LayoutError::Decode { index, source })
    }
}

impl<R> fmt::Debug for RecordLayout<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordLayout")
            .field("record", &type_name::<R>())
            .field("layout", &self.layout)
            .finish()
    }
}
