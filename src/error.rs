//! Error taxonomy for schema definition, validation, and the binary codec.
//!
//! Every error is detected eagerly at the point of definition, assignment, or
//! decode and propagates synchronously; nothing is retried and no operation
//! leaves an instance partially mutated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructError {
    /// Two fields of one schema share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// `char` declared as a fixed-array element; char buffers must be
    /// declared as a char array type, which has its own string semantics.
    #[error("array of char is not supported; declare a char array field instead")]
    CharArrayElement,

    /// A kind that has no per-element encoding was used as an array element.
    #[error("{0} cannot be a fixed-array element")]
    BadArrayElement(&'static str),

    /// A declared default failed the same validation an explicit assignment
    /// would get.
    #[error("default for field {field}: {source}")]
    BadDefault {
        field: String,
        #[source]
        source: Box<StructError>,
    },

    /// Construction or mutation referenced a field name the schema does not
    /// declare.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Wrong value category for a field (or wrong nested record type).
    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Integer outside the declared width's representable range.
    #[error("value {value} out of range for {ty} ({min}..={max})")]
    Range {
        ty: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },

    /// Fixed-length array or char array given a value of the wrong length.
    #[error("expected length {expected}, got {actual}")]
    ArraySize { expected: usize, actual: usize },

    /// Padding fields occupy layout space only and can never hold a value.
    #[error("padding fields cannot be assigned")]
    PaddingField,

    /// `pack` reached a required field that was never assigned.
    #[error("missing field: {0}")]
    MissingField(String),

    /// `unpack` given fewer bytes than the schema's total size.
    #[error("buffer too short: need {need} bytes, got {got}")]
    BufferLength { need: usize, got: usize },
}
