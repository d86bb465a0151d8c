//! Conversions from module error types into the unified [`Error`].

use super::types::Error;
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::error::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::IoError(e) => Error::Io(e),
            OpcError::ZipError(e) => Error::ZipError(e.to_string()),
            OpcError::XmlError(s) | OpcError::AttrError(s) => Error::XmlError(s),
            OpcError::PartNotFound(s)
            | OpcError::PackageNotFound(s)
            | OpcError::RelationshipNotFound(s) => Error::ComponentNotFound(s),
            OpcError::ContentTypeNotFound(_) | OpcError::InvalidPackUri(_) => {
                Error::InvalidFormat(err.to_string())
            },
            _ => Error::Other(err.to_string()),
        }
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Opc(e) => Error::from(e),
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::Xml(s) => Error::XmlError(s),
            OoxmlError::Format(s) => Error::InvalidFormat(s),
            OoxmlError::InconsistentPackage(s) => Error::InconsistentPackage(s),
            OoxmlError::NotFound(s) => Error::ComponentNotFound(s),
            OoxmlError::Other(s) => Error::Other(s),
        }
    }
}
