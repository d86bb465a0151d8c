//! Office Open XML (OOXML) presentation packages.
//!
//! # Architecture
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, relationships)
//! 2. **Source ownership** (`source`): the close policy for caller sources
//! 3. **Document properties** (`metadata`): core and extended property parts
//! 4. **PresentationML** (`pptx`): id-list resolution and the loaded
//!    [`pptx::SlideShow`]
//!
//! # Example
//!
//! ```rust,no_run
//! use slidedeck::ooxml::pptx::SlideShow;
//!
//! let show = SlideShow::open("presentation.pptx")?;
//! let props = show.properties().extended();
//! println!("{:?} with {} slides", props.application(), show.slide_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod metadata;
pub mod opc;
pub mod pptx;
pub mod source;

pub use opc::{OpcPackage, PackURI};

pub use metadata::{CoreProperties, DocumentProperties, ExtendedProperties, PropertyBag};

pub use source::{InputSource, Ownership, SourceGuard};

pub use error::{OoxmlError, Result};
