//! Error types for the marketplace store.

use std::fmt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the marketplace store.
///
/// Every operation returns `Result<T>`. Domain variants are conditions the
/// caller is expected to display and let the user correct; infrastructure
/// variants come from the storage port or the collection codec. None of them
/// is fatal: a failed operation leaves stored state as it was (see
/// `Marketplace::checkout` for the one documented exception).
#[derive(Debug, Clone)]
pub enum Error {
    /// Registration or profile update used an email already held by another user.
    DuplicateEmail(String),

    /// No user matches the supplied email and password.
    ///
    /// Deliberately does not say which of the two was wrong.
    InvalidCredentials,

    /// A user or product id did not resolve.
    ///
    /// Returned by `update_product` when the product vanished between listing
    /// and editing (deleted, or purchased by someone else).
    NotFound {
        /// Entity kind, e.g. `"product"` or `"user"`
        entity: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// Input failed validation.
    ///
    /// Raised for:
    /// - missing required fields (title, description, email, ...)
    /// - non-positive price
    /// - malformed image reference
    /// - adding your own listing to your cart, or checking out an empty cart
    ValidationError(String),

    /// An uploaded image exceeds the configured size limit.
    ///
    /// Only produced by `ImageRef::from_upload`; images that are already
    /// encoded are never re-measured by the store.
    OversizedUpload {
        /// Size of the upload in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Encoding a collection for storage failed.
    SerializationError(String),

    /// A stored value could not be decoded.
    ///
    /// The key holds something that is not a JSON list of the expected
    /// record shape. The store never repairs it on its own.
    DeserializationError(String),

    /// Storage backend error (connection lost, pool exhausted, ...).
    BackendError(String),

    /// Invalid configuration (bad environment override, bad connection string).
    ConfigError(String),

    /// Operation not supported by this backend.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Shorthand for a missing product.
    pub fn product_not_found(id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: "product",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing user.
    pub fn user_not_found(id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: "user",
            id: id.to_string(),
        }
    }

    /// True for conditions caused by caller input rather than infrastructure.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::DuplicateEmail(_)
                | Error::InvalidCredentials
                | Error::NotFound { .. }
                | Error::ValidationError(_)
                | Error::OversizedUpload { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateEmail(email) => write!(f, "Email already registered: {}", email),
            Error::InvalidCredentials => write!(f, "Invalid email or password"),
            Error::NotFound { entity, id } => write!(f, "{} not found: {}", entity, id),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::OversizedUpload { size, limit } => write!(
                f,
                "Upload too large: {} bytes (limit {} bytes)",
                size, limit
            ),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}
