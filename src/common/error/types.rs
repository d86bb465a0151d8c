use thiserror::Error;

/// Main error type for slidedeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid package (missing or duplicated main part,
    /// malformed id list)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Package relationships contradict themselves
    #[error("Inconsistent package: {0}")]
    InconsistentPackage(String),

    /// Part, relationship or id not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for slidedeck operations.
pub type Result<T> = std::result::Result<T, Error>;
