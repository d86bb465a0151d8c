/// Open Packaging Conventions (OPC) implementation.
///
/// This is the part store the presentation loader is built on:
///
/// - ZIP container access (`phys_pkg`)
/// - `[Content_Types].xml` and `.rels` parsing (`pkgreader`)
/// - The in-memory part graph (`package`, `part`, `rel`)
/// - Serialization back to a container (`pkgwriter`)
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

pub use error::OpcError;
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
