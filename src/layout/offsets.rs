//! Alignment-aware offset computation

use std::fmt;

use super::errors::{LayoutError, LayoutResult};
use super::field_type::FieldType;

/// Rounds `offset` up to the next multiple of `align` (a power of two).
pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Byte layout of a row shape
#[derive(Debug, Clone)]
pub struct FieldLayout {
    fields: Vec<FieldType>,
    offsets: Vec<usize>,
    size: usize,
    align: usize,
}

impl FieldLayout {
    /// Computes the layout of `fields` in declaration order.
    pub fn new(fields: Vec<FieldType>) -> Self {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut end = 0;
        let mut align = 1;

        for field in &fields {
            let offset = align_up(end, field.align());
            offsets.push(offset);
            end = offset + field.size();
            align = align.max(field.align());
        }

        Self {
            fields,
            offsets,
            size: align_up(end, align),
            align,
        }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total record size including trailing padding
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment of the whole record
    pub fn align(&self) -> usize {
        self.align
    }

    /// Type token of field `index`
    pub fn field(&self, index: usize) -> LayoutResult<&FieldType> {
        self.fields.get(index).ok_or(LayoutError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Byte offset of field `index` from the start of the record
    pub fn offset(&self, index: usize) -> LayoutResult<usize> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(LayoutError::IndexOutOfRange {
                index,
                len: self.offsets.len(),
            })
    }

    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

/// Layouts are equal when their field types match in order.
impl PartialEq for FieldLayout {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for FieldLayout {}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field.type_name())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[repr(C)]
    #[allow(dead_code)]
    struct Mixed {
        flag: u8,
        id: i64,
        small: u16,
        ratio: f32,
        name: String,
        tail: u8,
    }

    fn mixed_layout() -> FieldLayout {
        FieldLayout::new(vec![
            FieldType::of::<u8>(),
            FieldType::of::<i64>(),
            FieldType::of::<u16>(),
            FieldType::of::<f32>(),
            FieldType::of::<String>(),
            FieldType::of::<u8>(),
        ])
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 4), 12);
        assert_eq!(align_up(3, 1), 3);
    }

    #[test]
    fn test_matches_repr_c_struct() {
        let layout = mixed_layout();

        assert_eq!(layout.offset(0).unwrap(), offset_of!(Mixed, flag));
        assert_eq!(layout.offset(1).unwrap(), offset_of!(Mixed, id));
        assert_eq!(layout.offset(2).unwrap(), offset_of!(Mixed, small));
        assert_eq!(layout.offset(3).unwrap(), offset_of!(Mixed, ratio));
        assert_eq!(layout.offset(4).unwrap(), offset_of!(Mixed, name));
        assert_eq!(layout.offset(5).unwrap(), offset_of!(Mixed, tail));
        assert_eq!(layout.size(), size_of::<Mixed>());
    }

    #[test]
    fn test_packed_when_no_padding_needed() {
        let layout = FieldLayout::new(vec![
            FieldType::of::<i32>(),
            FieldType::of::<i32>(),
            FieldType::of::<i32>(),
        ]);
        assert_eq!(layout.offsets(), &[0, 4, 8]);
        assert_eq!(layout.size(), 12);
        assert_eq!(layout.align(), 4);
    }

    #[test]
    fn test_empty_layout() {
        let layout = FieldLayout::new(Vec::new());
        assert!(layout.is_empty());
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.align(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let layout = mixed_layout();
        assert_eq!(
            layout.offset(6),
            Err(LayoutError::IndexOutOfRange { index: 6, len: 6 })
        );
        assert!(layout.field(42).is_err());
    }

    #[test]
    fn test_equality_is_by_type_sequence() {
        let a = FieldLayout::new(vec![FieldType::of::<i32>(), FieldType::of::<String>()]);
        let b = FieldLayout::new(vec![FieldType::of::<i32>(), FieldType::of::<String>()]);
        let c = FieldLayout::new(vec![FieldType::of::<String>(), FieldType::of::<i32>()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.to_string().starts_with("(i32, "));
    }
}
