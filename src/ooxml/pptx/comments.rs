/// Comment subsystem: the package-wide author table and per-slide comment
/// lists.
///
/// The author table exists only when the package has a comment authors
/// part. A slide has a [`CommentsPart`] only when its part carries a
/// comments relationship; the slide's comment view is an empty slice
/// otherwise.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::parts::comment::{
    Comment, CommentAuthor, parse_comment_authors, parse_comments,
};
use crate::ooxml::pptx::parts::PartKind;
use crate::ooxml::pptx::resolver;
use std::collections::HashSet;

/// The package-wide comment author table.
#[derive(Debug, Clone)]
pub struct CommentAuthors {
    partname: PackURI,
    authors: Vec<CommentAuthor>,
}

impl CommentAuthors {
    /// Find the author table of a package.
    ///
    /// The presentation part's `commentAuthors` relationship wins. Packages
    /// without it fall back to the one part with the comment authors content
    /// type; zero or several such parts mean there is no table.
    pub fn load(package: &OpcPackage, presentation: &PackURI) -> Result<Option<Self>> {
        let related = resolver::related_by_type(package, presentation, rt::COMMENT_AUTHORS)?;
        let partname = match related {
            Some(partname) => partname,
            None => {
                let mut candidates: Vec<&PackURI> = package
                    .iter_parts()
                    .filter(|part| {
                        PartKind::of(part.content_type()) == Some(PartKind::CommentAuthors)
                    })
                    .map(|part| part.partname())
                    .collect();
                candidates.sort();
                match candidates.as_slice() {
                    [] => return Ok(None),
                    [partname] => (*partname).clone(),
                    parts => {
                        tracing::warn!(
                            count = parts.len(),
                            "several unreferenced comment author parts, ignoring all"
                        );
                        return Ok(None);
                    },
                }
            },
        };

        let part = package.get_part(&partname)?;
        let authors = parse_comment_authors(part.blob())?;

        let mut seen = HashSet::with_capacity(authors.len());
        for author in &authors {
            if !seen.insert(author.id) {
                tracing::warn!(id = author.id, %partname, "duplicate comment author id");
            }
        }

        tracing::debug!(%partname, authors = authors.len(), "loaded comment authors");
        Ok(Some(Self { partname, authors }))
    }

    /// Look up an author by id.
    ///
    /// With duplicated ids the first author in document order is returned.
    pub fn author_by_id(&self, id: u32) -> Result<&CommentAuthor> {
        self.authors
            .iter()
            .find(|author| author.id == id)
            .ok_or_else(|| OoxmlError::NotFound(format!("comment author with id {}", id)))
    }

    /// Whether an author with `id` exists.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.authors.iter().any(|author| author.id == id)
    }

    /// All authors in document order.
    #[inline]
    pub fn authors(&self) -> &[CommentAuthor] {
        &self.authors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }
}

/// The comments attached to one slide.
#[derive(Debug, Clone)]
pub struct CommentsPart {
    partname: PackURI,
    comments: Vec<Comment>,
}

impl CommentsPart {
    /// Load the comments part related to `slide`, if it has one.
    pub fn load(package: &OpcPackage, slide: &PackURI) -> Result<Option<Self>> {
        let Some(partname) = resolver::related_by_type(package, slide, rt::COMMENTS)? else {
            return Ok(None);
        };
        let part = package.get_part(&partname)?;
        let comments = parse_comments(part.blob())?;
        Ok(Some(Self { partname, comments }))
    }

    #[inline]
    pub fn number_of_comments(&self) -> usize {
        self.comments.len()
    }

    /// The comment at position `index`, in document order.
    #[inline]
    pub fn comment_at(&self, index: usize) -> Option<&Comment> {
        self.comments.get(index)
    }

    #[inline]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Check every comment's author against the author table.
    ///
    /// Unknown authors are logged, or rejected when `strict` is set.
    pub(crate) fn check_authors(
        &self,
        authors: Option<&CommentAuthors>,
        strict: bool,
    ) -> Result<()> {
        for comment in &self.comments {
            let known = authors.is_some_and(|table| table.contains(comment.author_id));
            if known {
                continue;
            }
            if strict {
                return Err(OoxmlError::InconsistentPackage(format!(
                    "{} has a comment by unknown author {}",
                    self.partname, comment.author_id
                )));
            }
            tracing::warn!(
                partname = %self.partname,
                author_id = comment.author_id,
                "comment author not in author table"
            );
        }
        Ok(())
    }
}
