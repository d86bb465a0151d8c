/// Slides, masters and notes of a loaded presentation.
///
/// These are handles: each names its backing part by partname and keeps the
/// list entry it was resolved from. Part content stays in the package.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::comments::CommentsPart;
use crate::ooxml::pptx::parts::comment::Comment;
use crate::ooxml::pptx::resolver::{self, ReferenceEntry};

/// A slide, at a fixed position in the presentation.
#[derive(Debug, Clone)]
pub struct Slide {
    index: usize,
    entry: ReferenceEntry,
    partname: PackURI,
    notes: Option<Notes>,
    comments: Option<CommentsPart>,
}

impl Slide {
    /// Build the slide at `index` and resolve its notes and comments, both
    /// scoped to the slide's own relationships.
    pub(crate) fn load(
        package: &OpcPackage,
        index: usize,
        entry: ReferenceEntry,
        partname: PackURI,
    ) -> Result<Self> {
        let notes = resolver::related_by_type(package, &partname, rt::NOTES_SLIDE)?
            .map(|partname| Notes { partname });
        let comments = CommentsPart::load(package, &partname)?;

        tracing::debug!(
            index,
            %partname,
            notes = notes.is_some(),
            comments = comments.as_ref().map_or(0, CommentsPart::number_of_comments),
            "loaded slide"
        );

        Ok(Self {
            index,
            entry,
            partname,
            notes,
            comments,
        })
    }

    /// Zero-based position in the presentation.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The slide id from `sldIdLst`.
    #[inline]
    pub fn id(&self) -> Option<u32> {
        self.entry.id
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.entry.r_id
    }

    #[inline]
    pub fn entry(&self) -> &ReferenceEntry {
        &self.entry
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn notes(&self) -> Option<&Notes> {
        self.notes.as_ref()
    }

    /// The slide's comments part, `None` when the slide has no comments
    /// relationship.
    #[inline]
    pub fn comments_part(&self) -> Option<&CommentsPart> {
        self.comments.as_ref()
    }

    /// The slide's comments; empty when there is no comments part.
    #[inline]
    pub fn comments(&self) -> &[Comment] {
        match &self.comments {
            Some(part) => part.comments(),
            None => &[],
        }
    }
}

/// The notes page of a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notes {
    partname: PackURI,
}

impl Notes {
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }
}

/// A slide master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideMaster {
    entry: ReferenceEntry,
    partname: PackURI,
    inherited: bool,
}

impl SlideMaster {
    pub(crate) fn new(entry: ReferenceEntry, partname: PackURI, inherited: bool) -> Self {
        Self {
            entry,
            partname,
            inherited,
        }
    }

    #[inline]
    pub fn id(&self) -> Option<u32> {
        self.entry.id
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.entry.r_id
    }

    #[inline]
    pub fn entry(&self) -> &ReferenceEntry {
        &self.entry
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Whether the master came from the sentinel fallback rather than its
    /// own relationship id.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }
}

/// The notes master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesMaster {
    entry: ReferenceEntry,
    partname: PackURI,
}

impl NotesMaster {
    pub(crate) fn new(entry: ReferenceEntry, partname: PackURI) -> Self {
        Self { entry, partname }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.entry.r_id
    }

    #[inline]
    pub fn entry(&self) -> &ReferenceEntry {
        &self.entry
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }
}
