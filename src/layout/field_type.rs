//! Per-column type token

use std::any::{type_name, TypeId};
use std::mem::{align_of, size_of};

use crate::codec::{SqlType, StorageType};

/// Everything the layer knows about one column's native type
#[derive(Debug, Clone, Copy)]
pub struct FieldType {
    type_id: TypeId,
    type_name: &'static str,
    storage_type: StorageType,
    size: usize,
    align: usize,
}

impl FieldType {
    /// Captures the type token of `T`
    pub fn of<T: SqlType>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            storage_type: T::storage_type(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn align(&self) -> usize {
        self.align
    }
}

/// Two tokens are equal when they describe the same native type.
impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for FieldType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_type_facts() {
        let ft = FieldType::of::<i64>();
        assert_eq!(ft.size(), 8);
        assert_eq!(ft.align(), align_of::<i64>());
        assert_eq!(ft.storage_type(), StorageType::Integer);
        assert_eq!(ft.type_name(), "i64");
    }

    #[test]
    fn test_equality_by_type() {
        assert_eq!(FieldType::of::<String>(), FieldType::of::<String>());
        assert_ne!(FieldType::of::<i32>(), FieldType::of::<i64>());
        // same storage class, different native type
        assert_ne!(FieldType::of::<f32>(), FieldType::of::<f64>());
    }
}
