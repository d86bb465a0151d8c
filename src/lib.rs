//! Slidedeck - a loader for PresentationML (.pptx) packages
//!
//! This library opens zip-based presentation packages and reconstructs a
//! consistent object graph from their parts and relationships.
//!
//! # Features
//!
//! - **OPC Layer**: read and write Open Packaging Conventions containers
//! - **Relationship resolution**: slide, master and notes-master id lists
//!   resolved in order, with the `0x80000000` inherit sentinel honoured
//! - **Comments**: package-wide author table and per-slide comment lists
//! - **Source ownership**: configurable close-or-keep policy for the
//!   caller's input source, applied exactly once
//! - **Metadata extraction**: typed core and extended document properties
//!
//! # Example - Reading a PPTX file
//!
//! ```no_run
//! use slidedeck::ooxml::pptx::SlideShow;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut show = SlideShow::open("presentation.pptx")?;
//!
//! for slide in show.slides() {
//!     println!(
//!         "slide {} ({}), notes: {}",
//!         slide.index(),
//!         slide.partname(),
//!         slide.notes().is_some()
//!     );
//! }
//! println!("notes master present: {}", show.notes_master().is_some());
//!
//! show.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Keeping the source open
//!
//! ```no_run
//! use slidedeck::ooxml::pptx::{LoadOptions, SlideShow};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cursor = Cursor::new(std::fs::read("presentation.pptx")?);
//! {
//!     let options = LoadOptions::new().with_close_source(false);
//!     let mut show = SlideShow::from_reader_with_options(&mut cursor, options)?;
//!     show.close()?;
//! }
//! println!("cursor still usable at {}", cursor.position());
//! # Ok(())
//! # }
//! ```

/// Shared error type, flattened metadata and XML helpers
pub mod common;

/// OOXML (Office Open XML) presentation packages
pub mod ooxml;

pub use common::{Error, Metadata, Result};
pub use ooxml::pptx::{LoadOptions, SlideShow};
