//! Field layout of record types
//!
//! A row shape is the ordered list of column types. [`FieldLayout`] computes
//! where each field sits inside a record with that shape, using the standard
//! structure packing rule:
//!
//! ```text
//! offset(0) = 0
//! offset(i) = align_up(offset(i-1) + size(i-1), align(i))
//! ```
//!
//! That is exactly the layout of a `#[repr(C)]` struct declaring the fields
//! in the same order. The layout is the identity of a row shape; two schemas
//! may share a table name only if their layouts are equal.
//!
//! Field access never goes through raw offsets. Each column carries a typed
//! accessor ([`Field`], usually built with [`field!`](crate::field)) and
//! [`RecordLayout`] dispatches reads and writes by column index.

mod accessor;
mod errors;
mod field_type;
mod offsets;
mod record;

pub use accessor::{Field, FieldAccessor};
pub use errors::{LayoutError, LayoutResult};
pub use field_type::FieldType;
pub use offsets::{align_up, FieldLayout};
pub use record::RecordLayout;

/// Builds a typed [`Field`] accessor for `record.name`.
///
/// ```
/// use tablemap::field;
/// use tablemap::layout::FieldAccessor;
///
/// #[derive(Default)]
/// struct Point {
///     x: i64,
/// }
///
/// let accessor = field!(Point, x);
/// let point = Point { x: 7 };
/// assert_eq!(accessor.encode(&point), "7");
/// ```
#[macro_export]
macro_rules! field {
    ($record:ty, $name:ident) => {
        $crate::layout::Field::<$record, _>::new(|r| &r.$name, |r| &mut r.$name)
    };
}
