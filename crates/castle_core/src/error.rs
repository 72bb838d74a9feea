//! Error types for the scheduler core.

use thiserror::Error;

/// Result type alias using [`CastleError`].
pub type Result<T> = std::result::Result<T, CastleError>;

/// Top-level error type for configuration and catalog errors.
///
/// In-simulation infeasibility is never reported through this type; it
/// surfaces as an incomplete [`Schedule`](crate::schedule::Schedule).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastleError {
    /// A configuration omitted one of the required building kinds.
    #[error("missing building level for: {0}")]
    MissingBuildingLevel(String),

    /// A building name that is not one of the known kinds.
    #[error("unknown building in {field}: {name}")]
    UnknownBuilding {
        /// Configuration field that carried the name.
        field: String,
        /// The unrecognised name.
        name: String,
    },

    /// A resource name that is not one of the known kinds.
    #[error("unknown resource in {field}: {name}")]
    UnknownResource {
        /// Configuration field that carried the name.
        field: String,
        /// The unrecognised name.
        name: String,
    },

    /// A unit name that is not one of the known kinds.
    #[error("unknown unit in {field}: {name}")]
    UnknownUnit {
        /// Configuration field that carried the name.
        field: String,
        /// The unrecognised name.
        name: String,
    },

    /// A technology that the catalog does not define.
    #[error("unknown technology in {field}: {name}")]
    UnknownTechnology {
        /// Configuration field that carried the name.
        field: String,
        /// The unrecognised name.
        name: String,
    },

    /// A building level outside the range the catalog supports.
    #[error("invalid level {level} for {building} in {field} (max {max})")]
    InvalidLevel {
        /// Configuration field that carried the level.
        field: String,
        /// Building kind name.
        building: String,
        /// Requested level.
        level: u32,
        /// Highest level the catalog defines.
        max: u32,
    },

    /// A negative or non-finite resource amount.
    #[error("invalid amount {amount} for {resource} in {field}")]
    InvalidAmount {
        /// Configuration field that carried the amount.
        field: String,
        /// Resource name.
        resource: String,
        /// Offending amount.
        amount: f64,
    },

    /// Data file parsing error.
    #[error("Failed to parse data '{source_name}': {message}")]
    DataParseError {
        /// Name of the input that failed to parse.
        source_name: String,
        /// Error message.
        message: String,
    },

    /// A schedule could not be encoded for hashing.
    #[error("failed to encode schedule: {0}")]
    EncodeError(String),
}
