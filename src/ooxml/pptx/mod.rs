//! PowerPoint (.pptx) presentation loading.
//!
//! A presentation package is loaded into a [`SlideShow`]: the ordered
//! slides, the slide masters, the optional notes master, the optional
//! comment author table and the document properties.
//!
//! - [`resolver`]: maps id-list entries onto parts, honouring the
//!   `0x80000000` inherit sentinel
//! - [`presentation`]: the builder and the `SlideShow` accessors
//! - [`comments`]: author table and per-slide comment lists
//! - [`package`]: constructors and the close policy
//!
//! # Example
//!
//! ```rust,no_run
//! use slidedeck::ooxml::pptx::SlideShow;
//!
//! let show = SlideShow::open("presentation.pptx")?;
//! if let Some(authors) = show.comment_authors() {
//!     for slide in show.slides() {
//!         for comment in slide.comments() {
//!             let author = authors.author_by_id(comment.author_id)?;
//!             println!("{}: {}", author.name, comment.text);
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod comments;
pub mod options;
pub mod package;
pub mod parts;
pub mod presentation;
pub mod resolver;
pub mod slide;

pub use comments::{CommentAuthors, CommentsPart};
pub use options::LoadOptions;
pub use parts::{Comment, CommentAuthor, PartKind, SlideSize};
pub use presentation::SlideShow;
pub use resolver::{MASTER_ID_SENTINEL, ReferenceEntry, Resolution, ResolvedEntry};
pub use slide::{Notes, NotesMaster, Slide, SlideMaster};
