//! Error type for reference validation.

/// Why a user-supplied reference was rejected, with the offending input when there was one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("reference cannot be empty")]
    EmptyReference,
    /// A local file or URL was recognized but does not name a descriptor file.
    #[error("{input:?} must point to a {extension} file")]
    WrongExtension { input: String, extension: String },
    #[error("{input:?} is not a magnet link, a local {extension} file or a URL to one")]
    UnrecognizedReference { input: String, extension: String },
}
