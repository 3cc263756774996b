//! Error types for the registration table ABI

/// Result type for table encoding and decoding
pub type AbiResult<T> = Result<T, AbiError>;

/// Registration table error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// A count field was negative
    #[error("Negative {what} count: {count}")]
    NegativeCount {
        /// Which count (e.g. "script", "field")
        what: String,
        /// Value found in the table
        count: i32,
    },

    /// An array or string pointer was null where data was required
    #[error("Null pointer for {what}")]
    NullPointer {
        /// Which entry was null
        what: String,
    },

    /// A name was not valid UTF-8
    #[error("{what} is not valid UTF-8")]
    InvalidUtf8 {
        /// Which entry failed to decode
        what: String,
    },

    /// A name contains a NUL byte and cannot be encoded as a C string
    #[error("{what} contains an interior NUL byte")]
    InteriorNul {
        /// Which entry failed to encode
        what: String,
    },

    /// Too many entries to describe with a C `int`
    #[error("Too many {what} entries: {len}")]
    TooLarge {
        /// Which array overflowed
        what: String,
        /// Number of entries
        len: usize,
    },
}
