//! Storage type tags emitted in DDL

use std::fmt;

/// Column storage class as declared in `CREATE TABLE`
///
/// Integral columns are always spelled `INT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Integral values (`INT`)
    Integer,
    /// Floating point values (`REAL`)
    Real,
    /// UTF-8 text (`TEXT`)
    Text,
}

impl StorageType {
    /// Returns the DDL keyword for this storage class
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Integer => "INT",
            StorageType::Real => "REAL",
            StorageType::Text => "TEXT",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_keywords() {
        assert_eq!(StorageType::Integer.as_str(), "INT");
        assert_eq!(StorageType::Real.as_str(), "REAL");
        assert_eq!(StorageType::Text.as_str(), "TEXT");
        assert_eq!(format!("{}", StorageType::Integer), "INT");
    }
}
