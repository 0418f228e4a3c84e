use thiserror::Error;

/// Errors that can arise while interacting with the progression engine.
#[derive(Debug, Error)]
pub enum RpgError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when a skill unlock is gated on a higher player level.
    /// No document is mutated when this is reported.
    #[error("Level {required} required (player is level {current})")]
    LevelRequirement { required: u32, current: u32 },

    /// Returned when the backing store cannot be opened at all
    /// (missing directory, lock held by another process, corrupt db).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Returned when parsing an attribute name that is not one of the five.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}
