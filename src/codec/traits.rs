//! The column type capability set

use super::errors::{CodecError, CodecResult};
use super::storage::StorageType;

/// A native type that can live in a table column.
///
/// Implementors provide the storage tag used in DDL, the canonical SQL
/// literal used in generated statements, and the inverse parse.
///
/// # Custom types
///
/// ```
/// use tablemap::codec::{quote_text, unquote_text, CodecError, CodecResult, SqlType, StorageType};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Tag {
///     id: i32,
///     name: String,
/// }
///
/// impl Tag {
///     fn parse(raw: &str) -> CodecResult<Self> {
///         let (id, name) = raw
///             .split_once('|')
///             .ok_or_else(|| CodecError::InvalidLiteral(raw.to_string()))?;
///         Ok(Tag { id: i32::decode(id)?, name: name.to_string() })
///     }
/// }
///
/// impl SqlType for Tag {
///     fn storage_type() -> StorageType {
///         StorageType::Text
///     }
///
///     fn encode(&self) -> String {
///         quote_text(&format!("{}|{}", self.id, self.name))
///     }
///
///     fn decode(text: &str) -> CodecResult<Self> {
///         Self::parse(&unquote_text(text)?)
///     }
///
///     fn from_column_text(text: &str) -> CodecResult<Self> {
///         Self::parse(text)
///     }
/// }
///
/// let tag = Tag { id: 42, name: "hello".into() };
/// assert_eq!(tag.encode(), "'42|hello'");
/// assert_eq!(Tag::decode("'42|hello'").unwrap(), tag);
/// ```
pub trait SqlType: Sized + 'static {
    /// Storage class declared for columns of this type
    fn storage_type() -> StorageType;

    /// Canonical literal as it appears in an `INSERT` statement
    fn encode(&self) -> String;

    /// Parses the canonical literal produced by [`SqlType::encode`].
    ///
    /// Numeric types accept any decimal string.
    fn decode(text: &str) -> CodecResult<Self>;

    /// Parses a column value as reported by the storage engine.
    ///
    /// The engine reports text without the surrounding literal quotes, so
    /// text-backed types override this.
    fn from_column_text(text: &str) -> CodecResult<Self> {
        Self::decode(text)
    }
}

/// Wraps `value` in single quotes, doubling any embedded quote.
pub fn quote_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Reverses [`quote_text`].
///
/// Fails on a missing delimiter or an undoubled quote inside the literal.
pub fn unquote_text(literal: &str) -> CodecResult<String> {
    let inner = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| CodecError::InvalidLiteral(literal.to_string()))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            match chars.next() {
                Some('\'') => out.push('\''),
                _ => return Err(CodecError::InvalidLiteral(literal.to_string())),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
