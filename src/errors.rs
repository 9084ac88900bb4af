//! Error types for boundary marshaling and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Raw argument payload rejected before rendering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// String argument with a null pointer payload
    #[error("null string pointer for type code {code}")]
    NullString { code: i64 },

    /// String pointer not aligned for wide characters
    #[error("misaligned string pointer {addr:#x}")]
    MisalignedString { addr: usize },

    /// Caller-built string without a 0 terminator
    #[error("wide string is missing its terminator")]
    Unterminated,

    /// Binary argument with bytes but no base pointer
    #[error("null binary pointer with length {len}")]
    NullBinary { len: i64 },

    #[error("negative binary length {len}")]
    NegativeLength { len: i64 },

    /// Length does not fit the address space
    #[error("binary length {len} exceeds addressable memory")]
    LengthOverflow { len: i64 },
}

impl MarshalError {
    /// Type code the failing record carried
    pub fn type_code(&self) -> i64 {
        use crate::interop::TypeCode;

        match self {
            Self::NullString { code } => *code,
            Self::MisalignedString { .. } | Self::Unterminated => TypeCode::String.raw(),
            Self::NullBinary { .. } | Self::NegativeLength { .. } | Self::LengthOverflow { .. } => {
                TypeCode::Binary.raw()
            }
        }
    }
}

/// Configuration could not be read or parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marshal_error_messages() {
        let err = MarshalError::NullString { code: 1 };
        assert_eq!(err.to_string(), "null string pointer for type code 1");

        let err = MarshalError::NegativeLength { len: -3 };
        assert_eq!(err.to_string(), "negative binary length -3");
        assert_eq!(err.type_code(), 2);
    }

    #[test]
    fn test_parse_error_wraps_toml() {
        let err: ConfigError = toml::from_str::<toml::Value>("not = [valid")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
