/// Errors surfaced by the transform pipeline.
///
/// Malformed filter expressions and degenerate domains are handled locally
/// with documented defaults and never reach this enum.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A non-null value could not be coerced to a number where one was
    /// required (aggregate and bin transforms).
    #[error("cannot coerce field '{field}' to a number for op '{op}': got '{value}'")]
    Coercion {
        field: String,
        op: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
