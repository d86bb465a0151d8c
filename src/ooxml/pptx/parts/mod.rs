/// Part readers for PresentationML packages.
///
/// Each reader takes the raw XML of one part kind and extracts the few
/// elements the document builder needs.
pub mod comment;
pub mod presentation;

pub use comment::{
    Comment, CommentAuthor, generate_comment_authors_xml, generate_comments_xml,
    parse_comment_authors, parse_comments,
};
pub use presentation::{PresentationPart, SlideSize};

use phf::phf_map;

/// Role of a part in a presentation package, derived from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// The root presentation part (any of the main content types)
    Presentation,
    /// The package-wide comment author table
    CommentAuthors,
}

static PART_KINDS: phf::Map<&'static str, PartKind> = phf_map! {
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml" => PartKind::Presentation,
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml" => PartKind::Presentation,
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml" => PartKind::Presentation,
    "application/vnd.ms-powerpoint.slideshow.macroEnabled.main+xml" => PartKind::Presentation,
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml" => PartKind::Presentation,
    "application/vnd.ms-powerpoint.template.macroEnabled.main+xml" => PartKind::Presentation,
    "application/vnd.openxmlformats-officedocument.presentationml.commentAuthors+xml" => PartKind::CommentAuthors,
};

impl PartKind {
    /// Classify a content type. Unknown content types have no kind.
    #[inline]
    pub fn of(content_type: &str) -> Option<PartKind> {
        PART_KINDS.get(content_type).copied()
    }
}
