//! Error types for core-restriction
//!
//! Only catalog construction and loading can fail. Resolution itself has no
//! error path: missing content or viewers degrade to safe defaults.

use crate::ContentId;
use std::fmt;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, RestrictionError>;

/// Errors that can occur while building or loading restriction data
#[derive(Debug)]
pub enum RestrictionError {
    /// Two content items share the same identifier
    DuplicateContent(ContentId),

    /// Content item is malformed (zero id, wrong kind for a setting, ...)
    InvalidContent(String),

    /// Builder was finished with a required field missing
    MissingField(&'static str),

    /// Restriction result whose flag, id and reason disagree
    InconsistentResult {
        /// Content the result is about
        content_id: ContentId,
        /// Reason code carried by the input
        reason: String,
    },

    /// Serialization error
    SerializationError(String),

    /// TOML parsing error
    TomlError(toml::de::Error),

    // ===== Size limits =====
    /// Catalog exceeds maximum allowed items
    TooManyItems {
        /// Maximum allowed items
        max: usize,
        /// Attempted number of items
        attempted: usize,
    },

    /// Membership restriction list exceeds maximum length
    TooManyMemberships {
        /// Offending content item
        content_id: ContentId,
        /// Maximum allowed memberships
        max: usize,
        /// Actual list length
        length: usize,
    },

    /// Title exceeds maximum length
    TitleTooLong {
        /// Offending content item or track
        id: u64,
        /// Maximum allowed length
        max: usize,
        /// Actual title length
        length: usize,
    },
}

impl fmt::Display for RestrictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContent(id) => write!(f, "Duplicate content id: {}", id),
            Self::InvalidContent(msg) => write!(f, "Invalid content: {}", msg),
            Self::MissingField(field) => write!(f, "Missing required field: {}", field),
            Self::InconsistentResult { content_id, reason } => write!(
                f,
                "Inconsistent restriction result for {}: reason {} does not match the restricted flag",
                content_id, reason
            ),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            Self::TooManyItems { max, attempted } => write!(
                f,
                "Catalog exceeds maximum {} items (attempted: {})",
                max, attempted
            ),
            Self::TooManyMemberships {
                content_id,
                max,
                length,
            } => write!(
                f,
                "Content {} is restricted to more than {} memberships (length: {})",
                content_id, max, length
            ),
            Self::TitleTooLong { id, max, length } => write!(
                f,
                "Title of {} exceeds maximum {} characters (length: {})",
                id, max, length
            ),
        }
    }
}

impl From<toml::de::Error> for RestrictionError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlError(err)
    }
}

impl std::error::Error for RestrictionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlError(e) => Some(e),
            _ => None,
        }
    }
}
