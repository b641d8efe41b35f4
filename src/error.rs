//! Error types for PostGIS type registration and decoding.

use thiserror::Error;

/// Result type alias for PostGIS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for PostGIS type registration and value decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the PostgreSQL client.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// The name to OID resolver failed.
    #[error("Type OID resolution failed: {message}")]
    Resolver { message: String },

    /// A geometry value was not valid hex.
    #[error("Invalid hex in geometry value: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The WKB codec rejected a geometry value.
    #[error("Geometry decoding failed: {0}")]
    Geometry(#[from] geozero::error::GeozeroError),

    /// Malformed `BOX(...)`/`BOX3D(...)` text.
    #[error("Invalid box value {value:?}: {message}")]
    InvalidBox { value: String, message: String },

    /// Malformed array literal.
    #[error("Invalid array literal at position {position}: {message}")]
    InvalidArrayLiteral { position: usize, message: String },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },
}

impl Error {
    /// Create a resolver error.
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver {
            message: message.into(),
        }
    }

    /// Create a box decoding error.
    pub fn invalid_box(value: &str, message: impl Into<String>) -> Self {
        Self::InvalidBox {
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Create an array literal error.
    pub fn invalid_array(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidArrayLiteral {
            position,
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::resolver("connection reset").to_string(),
            "Type OID resolution failed: connection reset"
        );
        assert_eq!(
            Error::invalid_box("BOX", "missing '('").to_string(),
            "Invalid box value \"BOX\": missing '('"
        );
        assert_eq!(
            Error::invalid_array(3, "unterminated quote").to_string(),
            "Invalid array literal at position 3: unterminated quote"
        );
    }
}
