//! Codecs for the built-in scalar types

use super::errors::{CodecError, CodecResult};
use super::storage::StorageType;
use super::traits::{quote_text, unquote_text, SqlType};

/// Parses an integral value, truncating decimal fractions toward zero.
fn decode_integer<T: TryFrom<i128>>(text: &str, type_name: &'static str) -> CodecResult<T> {
    let trimmed = text.trim();
    let wide = match trimmed.parse::<i128>() {
        Ok(v) => v,
        Err(_) => {
            let float = trimmed
                .parse::<f64>()
                .map_err(|_| CodecError::invalid_number(type_name, text))?;
            if !float.is_finite() {
                return Err(CodecError::invalid_number(type_name, text));
            }
            float.trunc() as i128
        }
    };
    T::try_from(wide).map_err(|_| CodecError::out_of_range(type_name, text))
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SqlType for $ty {
                fn storage_type() -> StorageType {
                    StorageType::Integer
                }

                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(text: &str) -> CodecResult<Self> {
                    decode_integer::<$ty>(text, stringify!($ty))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32);

// SQLite integers are 64-bit signed. Unsigned 64-bit values are stored with
// the same bits as i64, so values above i64::MAX read back as negative
// numbers in SQL but round trip exactly through this codec.
macro_rules! impl_wide_unsigned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SqlType for $ty {
                fn storage_type() -> StorageType {
                    StorageType::Integer
                }

                fn encode(&self) -> String {
                    (*self as u64 as i64).to_string()
                }

                fn decode(text: &str) -> CodecResult<Self> {
                    let bits = decode_integer::<i64>(text, stringify!($ty))? as u64;
                    <$ty>::try_from(bits)
                        .map_err(|_| CodecError::out_of_range(stringify!($ty), text))
                }
            }
        )*
    };
}

impl_wide_unsigned!(u64, usize);

impl SqlType for bool {
    fn storage_type() -> StorageType {
        StorageType::Integer
    }

    fn encode(&self) -> String {
        (if *self { "1" } else { "0" }).to_string()
    }

    fn decode(text: &str) -> CodecResult<Self> {
        decode_integer::<i64>(text, "bool").map(|v| v != 0)
    }
}

// Non-finite floats have no SQL literal; they are written as NULL.
macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SqlType for $ty {
                fn storage_type() -> StorageType {
                    StorageType::Real
                }

                fn encode(&self) -> String {
                    if self.is_finite() {
                        format!("{:.6}", self)
                    } else {
                        "NULL".to_string()
                    }
                }

                fn decode(text: &str) -> CodecResult<Self> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|_| CodecError::invalid_number(stringify!($ty), text))
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl SqlType for String {
    fn storage_type() -> StorageType {
        StorageType::Text
    }

    fn encode(&self) -> String {
        quote_text(self)
    }

    /// Accepts the quoted literal; text that does not open with a quote is
    /// taken verbatim.
    fn decode(text: &str) -> CodecResult<Self> {
        if text.starts_with('\'') {
            unquote_text(text)
        } else {
            Ok(text.to_string())
        }
    }

    fn from_column_text(text: &str) -> CodecResult<Self> {
        Ok(text.to_string())
    }
}
