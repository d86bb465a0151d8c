/// The loaded presentation and the builder that assembles it from a package.
///
/// Building runs once: the main part is located, its id lists are resolved
/// against its relationships, and every slide is wired to its own notes and
/// comments. The resulting membership and order never change afterwards.
use crate::common::Metadata;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::DocumentProperties;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part};
use crate::ooxml::pptx::comments::CommentAuthors;
use crate::ooxml::pptx::options::LoadOptions;
use crate::ooxml::pptx::parts::{PartKind, PresentationPart, SlideSize};
use crate::ooxml::pptx::resolver::{self, Resolution};
use crate::ooxml::pptx::slide::{NotesMaster, Slide, SlideMaster};
use crate::ooxml::source::SourceGuard;
use std::io::Write;

/// A PowerPoint presentation.
///
/// Owns its package and, when loaded from a caller-supplied source, the
/// [`SourceGuard`] that decides whether closing the presentation closes the
/// source. Constructors live in [`crate::ooxml::pptx::package`].
///
/// # Examples
///
/// ```rust,no_run
/// use slidedeck::ooxml::pptx::SlideShow;
///
/// let mut show = SlideShow::open("deck.pptx")?;
/// for slide in show.slides() {
///     println!("slide {} has {} comments", slide.index(), slide.comments().len());
/// }
/// show.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SlideShow<'s> {
    package: OpcPackage,
    pub(crate) source: Option<SourceGuard<'s>>,
    pub(crate) closed: bool,
    presentation: PackURI,
    slides: Vec<Slide>,
    slide_masters: Vec<SlideMaster>,
    notes_master: Option<NotesMaster>,
    comment_authors: Option<CommentAuthors>,
    properties: DocumentProperties,
    slide_size: Option<SlideSize>,
    notes_size: Option<SlideSize>,
}

/// Everything the builder derives from the package.
struct Graph {
    presentation: PackURI,
    slides: Vec<Slide>,
    slide_masters: Vec<SlideMaster>,
    notes_master: Option<NotesMaster>,
    comment_authors: Option<CommentAuthors>,
    properties: DocumentProperties,
    slide_size: Option<SlideSize>,
    notes_size: Option<SlideSize>,
}

impl<'s> SlideShow<'s> {
    /// Build a presentation from a package.
    ///
    /// On failure the package is released and the source, if any, gets its
    /// close policy applied before the error is returned.
    pub(crate) fn build(
        package: OpcPackage,
        source: Option<SourceGuard<'s>>,
        options: &LoadOptions,
    ) -> Result<Self> {
        match Graph::build(&package, options) {
            Ok(graph) => Ok(Self {
                package,
                source,
                closed: false,
                presentation: graph.presentation,
                slides: graph.slides,
                slide_masters: graph.slide_masters,
                notes_master: graph.notes_master,
                comment_authors: graph.comment_authors,
                properties: graph.properties,
                slide_size: graph.slide_size,
                notes_size: graph.notes_size,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "presentation build failed");
                package.revert();
                if let Some(guard) = source {
                    release_source(guard);
                }
                Err(e)
            },
        }
    }

    /// Slides in presentation order; `slides()[i].index() == i`.
    #[inline]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[inline]
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide masters in list order.
    #[inline]
    pub fn slide_masters(&self) -> &[SlideMaster] {
        &self.slide_masters
    }

    #[inline]
    pub fn notes_master(&self) -> Option<&NotesMaster> {
        self.notes_master.as_ref()
    }

    /// The package-wide comment author table, `None` when the package has
    /// no comment authors part.
    #[inline]
    pub fn comment_authors(&self) -> Option<&CommentAuthors> {
        self.comment_authors.as_ref()
    }

    #[inline]
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Flattened summary of the document properties.
    pub fn metadata(&self) -> Metadata {
        self.properties.to_metadata()
    }

    #[inline]
    pub fn slide_size(&self) -> Option<SlideSize> {
        self.slide_size
    }

    #[inline]
    pub fn notes_size(&self) -> Option<SlideSize> {
        self.notes_size
    }

    /// Partname of the main presentation part.
    #[inline]
    pub fn presentation_partname(&self) -> &PackURI {
        &self.presentation
    }

    /// The underlying part store.
    #[inline]
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }

    /// Raw access to any part, e.g. the part behind a [`Slide`].
    #[inline]
    pub fn part(&self, partname: &PackURI) -> Option<&dyn Part> {
        self.package.part(partname)
    }

    /// Write the package to `writer` as a ZIP container.
    pub fn write_to_stream<W: Write>(&self, writer: W) -> Result<()> {
        PackageWriter::write_to_stream(writer, &self.package)?;
        Ok(())
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(PackageWriter::to_bytes(&self.package)?)
    }
}

impl Graph {
    fn build(package: &OpcPackage, options: &LoadOptions) -> Result<Self> {
        let presentation = find_main_part(package)?;
        let pres = PresentationPart::parse(package.get_part(&presentation)?.blob())?;

        let mut slides = Vec::with_capacity(pres.slide_ids().len());
        for (index, resolved) in resolver::resolve(pres.slide_ids(), package, &presentation)?
            .into_iter()
            .enumerate()
        {
            let partname = match resolved.resolution {
                Resolution::Resolved(partname) => partname,
                Resolution::Inherited => {
                    return Err(OoxmlError::Format(format!(
                        "slide entry {} ({}) has no part of its own",
                        index, resolved.entry.r_id
                    )));
                },
            };
            slides.push(Slide::load(package, index, resolved.entry, partname)?);
        }

        let mut slide_masters = Vec::with_capacity(pres.master_ids().len());
        for resolved in resolver::resolve(pres.master_ids(), package, &presentation)? {
            match resolved.resolution {
                Resolution::Resolved(partname) => {
                    slide_masters.push(SlideMaster::new(resolved.entry, partname, false));
                },
                Resolution::Inherited => match sole_master(package, &presentation) {
                    Some(partname) => {
                        slide_masters.push(SlideMaster::new(resolved.entry, partname, true));
                    },
                    None => {
                        tracing::warn!(
                            r_id = %resolved.entry.r_id,
                            "inherited master entry without a single master to inherit, skipped"
                        );
                    },
                },
            }
        }

        let notes_master = match pres.notes_master_id() {
            Some(entry) => match resolver::resolve_one(entry, package, &presentation)? {
                Resolution::Resolved(partname) => Some(NotesMaster::new(entry.clone(), partname)),
                Resolution::Inherited => None,
            },
            None => None,
        };

        let comment_authors = CommentAuthors::load(package, &presentation)?;
        for slide in &slides {
            if let Some(part) = slide.comments_part() {
                part.check_authors(comment_authors.as_ref(), options.strict_comment_authors)?;
            }
        }

        let properties = DocumentProperties::from_package(package)?;

        tracing::debug!(
            %presentation,
            slides = slides.len(),
            masters = slide_masters.len(),
            notes_master = notes_master.is_some(),
            comment_authors = comment_authors.is_some(),
            "built presentation"
        );

        Ok(Self {
            presentation,
            slides,
            slide_masters,
            notes_master,
            comment_authors,
            properties,
            slide_size: pres.slide_size(),
            notes_size: pres.notes_size(),
        })
    }
}

/// The single part whose content type marks it as the main presentation.
fn find_main_part(package: &OpcPackage) -> Result<PackURI> {
    let mut candidates: Vec<&PackURI> = package
        .iter_parts()
        .filter(|part| PartKind::of(part.content_type()) == Some(PartKind::Presentation))
        .map(|part| part.partname())
        .collect();
    candidates.sort();

    match candidates.as_slice() {
        [] => Err(OoxmlError::Format("package has no main presentation part".to_string())),
        [main] => Ok((*main).clone()),
        many => Err(OoxmlError::Format(format!(
            "package has {} main presentation parts: {}",
            many.len(),
            many.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Target of the presentation's only slide master relationship.
fn sole_master(package: &OpcPackage, presentation: &PackURI) -> Option<PackURI> {
    let rel = package
        .rels_of(presentation)
        .ok()?
        .part_with_reltype(rt::SLIDE_MASTER)
        .ok()?;
    let partname = rel.target_partname().ok()?;
    package.contains_part(&partname).then_some(partname)
}

/// Apply the close policy of a source whose document never came to be.
pub(crate) fn release_source(mut guard: SourceGuard<'_>) {
    if let Err(e) = guard.close() {
        tracing::warn!(error = %e, "failed to close input source");
    }
}
