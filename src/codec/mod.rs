//! Type codec for column values
//!
//! Every column type maps to one storage tag and one canonical textual
//! form. The canonical form is what lands in generated statements:
//!
//! - integral types: decimal integer (`42`)
//! - floating types: fixed six-digit decimal (`180.500000`)
//! - text: single-quoted literal with embedded quotes doubled (`'O''Brien'`)
//!
//! The codec set is open. Implementing [`SqlType`] for a caller type makes it
//! usable as a column; types without an implementation are rejected by the
//! compiler at the point they are added to a schema.

mod errors;
mod primitives;
mod storage;
mod traits;

pub use errors::{CodecError, CodecResult};
pub use storage::StorageType;
pub use traits::{quote_text, unquote_text, SqlType};
