//! In-memory presentation packages for the integration tests.
#![allow(dead_code)]

use slidedeck::ooxml::InputSource;
use slidedeck::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use slidedeck::ooxml::pptx::parts::comment::{generate_comment_authors_xml, generate_comments_xml};
use slidedeck::ooxml::pptx::{Comment, CommentAuthor, MASTER_ID_SENTINEL};
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Description of a deck to generate.
#[derive(Debug, Clone)]
pub struct Deck {
    pub slides: usize,
    /// Give every slide a notes page
    pub notes: bool,
    pub notes_master: bool,
    /// Numeric id written in `sldMasterIdLst`
    pub master_id: u32,
    /// Relationship id written in `sldMasterIdLst`; the master relationship
    /// itself is always `rId1`
    pub master_list_rid: &'static str,
    /// Whether the presentation has a slide master relationship at all
    pub master_rel: bool,
    /// Comment authors `(id, name)`; no authors part when empty
    pub authors: Vec<(u32, &'static str)>,
    /// Whether the presentation points at the authors part
    pub author_rel: bool,
    /// Comments `(slide index, author id, text)`
    pub comments: Vec<(usize, u32, &'static str)>,
    /// Slide whose presentation relationship is left out
    pub drop_slide_rel: Option<usize>,
    /// Numeric id override for one slide entry `(index, id)`
    pub slide_id_override: Option<(usize, u32)>,
    pub main_content_type: &'static str,
    /// Also write a second part with a main content type
    pub duplicate_main: bool,
    /// Like `duplicate_main`, but without any relationship to the second part
    pub orphan_main: bool,
    pub properties: bool,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            slides: 2,
            notes: true,
            notes_master: true,
            master_id: MASTER_ID_SENTINEL,
            master_list_rid: "rId1",
            master_rel: true,
            authors: Vec::new(),
            author_rel: true,
            comments: Vec::new(),
            drop_slide_rel: None,
            slide_id_override: None,
            main_content_type: ct::PML_PRESENTATION_MAIN,
            duplicate_main: false,
            orphan_main: false,
            properties: true,
        }
    }
}

/// One master, slides 256 -> rId2 and 257 -> rId3, both with notes, a notes
/// master, no comments.
pub fn sample_deck() -> Deck {
    Deck::default()
}

/// Four slides, one author `0 = XPVMWARE01`, one comment on each of the first
/// two slides.
pub fn comments_deck() -> Deck {
    Deck {
        slides: 4,
        authors: vec![(0, "XPVMWARE01")],
        comments: vec![(0, 0, "testdoc"), (1, 0, "test phrase")],
        ..Deck::default()
    }
}

struct Rel {
    r_id: String,
    reltype: &'static str,
    target: String,
}

fn rel(r_id: impl Into<String>, reltype: &'static str, target: impl Into<String>) -> Rel {
    Rel {
        r_id: r_id.into(),
        reltype,
        target: target.into(),
    }
}

fn rels_xml(rels: &[Rel]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for r in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            r.r_id, r.reltype, r.target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

impl Deck {
    fn notes_master_rid(&self) -> String {
        format!("rId{}", self.slides + 2)
    }

    fn authors_rid(&self) -> String {
        format!("rId{}", self.slides + 3)
    }

    fn presentation_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:r="{}" xmlns:p="{}">"#,
            R_NS, P_NS
        );
        xml.push_str(&format!(
            r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
            self.master_id, self.master_list_rid
        ));
        if self.notes_master {
            xml.push_str(&format!(
                r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
                self.notes_master_rid()
            ));
        }
        xml.push_str("<p:sldIdLst>");
        for i in 0..self.slides {
            let id = match self.slide_id_override {
                Some((index, id)) if index == i => id,
                _ => 256 + i as u32,
            };
            xml.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, id, i + 2));
        }
        xml.push_str("</p:sldIdLst>");
        xml.push_str(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");
        xml
    }

    fn core_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title></dc:title><dc:creator>Fixture Author</dc:creator><cp:lastModifiedBy>Fixture Author</cp:lastModifiedBy><cp:revision>2</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">2008-03-20T10:00:00Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2008-03-20T10:09:11Z</dcterms:modified></cp:coreProperties>"#
    }

    fn app_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><TotalTime>1</TotalTime><Words>0</Words><Application>Microsoft Office PowerPoint</Application><PresentationFormat>On-screen Show (4:3)</PresentationFormat><Paragraphs>0</Paragraphs><Slides>{}</Slides><Notes>{}</Notes><HiddenSlides>0</HiddenSlides><HeadingPairs><vt:vector size="2" baseType="variant"><vt:variant><vt:lpstr>Theme</vt:lpstr></vt:variant><vt:variant><vt:i4>1</vt:i4></vt:variant></vt:vector></HeadingPairs><AppVersion>12.0000</AppVersion></Properties>"#,
            self.slides,
            if self.notes { self.slides } else { 0 }
        )
    }

    /// Generate the package bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut files: Vec<(String, String)> = Vec::new();
        let mut overrides: Vec<(String, &'static str)> = Vec::new();

        // Package relationships
        let mut pkg_rels = vec![rel("rId1", rt::OFFICE_DOCUMENT, "ppt/presentation.xml")];
        if self.properties {
            pkg_rels.push(rel("rId2", rt::CORE_PROPERTIES, "docProps/core.xml"));
            pkg_rels.push(rel("rId3", rt::EXTENDED_PROPERTIES, "docProps/app.xml"));
            files.push(("docProps/core.xml".into(), Self::core_xml().into()));
            files.push(("docProps/app.xml".into(), self.app_xml()));
            overrides.push(("/docProps/core.xml".into(), ct::OPC_CORE_PROPERTIES));
            overrides.push(("/docProps/app.xml".into(), ct::OFC_EXTENDED_PROPERTIES));
        }
        if self.duplicate_main {
            pkg_rels.push(rel("rId4", rt::OFFICE_DOCUMENT, "ppt/presentation2.xml"));
            files.push(("ppt/presentation2.xml".into(), self.presentation_xml()));
            overrides.push(("/ppt/presentation2.xml".into(), ct::PML_PRESENTATION_MAIN));
        }
        if self.orphan_main {
            files.push(("ppt/presentation2.xml".into(), self.presentation_xml()));
            overrides.push(("/ppt/presentation2.xml".into(), ct::PML_PRESENTATION_MAIN));
        }
        files.push(("_rels/.rels".into(), rels_xml(&pkg_rels)));

        // Presentation part
        files.push(("ppt/presentation.xml".into(), self.presentation_xml()));
        overrides.push(("/ppt/presentation.xml".into(), self.main_content_type));

        let mut pres_rels = Vec::new();
        if self.master_rel {
            pres_rels.push(rel("rId1", rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml"));
        }
        for i in 0..self.slides {
            if self.drop_slide_rel != Some(i) {
                pres_rels.push(rel(format!("rId{}", i + 2), rt::SLIDE, format!("slides/slide{}.xml", i + 1)));
            }
        }
        if self.notes_master {
            pres_rels.push(rel(self.notes_master_rid(), rt::NOTES_MASTER, "notesMasters/notesMaster1.xml"));
        }
        if !self.authors.is_empty() && self.author_rel {
            pres_rels.push(rel(self.authors_rid(), rt::COMMENT_AUTHORS, "commentAuthors.xml"));
        }
        pres_rels.push(rel(format!("rId{}", self.slides + 4), rt::THEME, "theme/theme1.xml"));
        files.push(("ppt/_rels/presentation.xml.rels".into(), rels_xml(&pres_rels)));

        files.push(("ppt/theme/theme1.xml".into(), r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"/>"#.into()));
        overrides.push(("/ppt/theme/theme1.xml".into(), ct::OFC_THEME));

        // Master and layout
        files.push((
            "ppt/slideMasters/slideMaster1.xml".into(),
            format!(r#"<p:sldMaster xmlns:p="{}"/>"#, P_NS),
        ));
        files.push((
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            rels_xml(&[rel("rId1", rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")]),
        ));
        overrides.push(("/ppt/slideMasters/slideMaster1.xml".into(), ct::PML_SLIDE_MASTER));
        files.push((
            "ppt/slideLayouts/slideLayout1.xml".into(),
            format!(r#"<p:sldLayout xmlns:p="{}"/>"#, P_NS),
        ));
        files.push((
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            rels_xml(&[rel("rId1", rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml")]),
        ));
        overrides.push(("/ppt/slideLayouts/slideLayout1.xml".into(), ct::PML_SLIDE_LAYOUT));

        if self.notes_master {
            files.push((
                "ppt/notesMasters/notesMaster1.xml".into(),
                format!(r#"<p:notesMaster xmlns:p="{}"/>"#, P_NS),
            ));
            overrides.push(("/ppt/notesMasters/notesMaster1.xml".into(), ct::PML_NOTES_MASTER));
        }

        if !self.authors.is_empty() {
            let authors: Vec<CommentAuthor> = self
                .authors
                .iter()
                .map(|(id, name)| CommentAuthor::new(*id, *name, &name[..1]))
                .collect();
            files.push(("ppt/commentAuthors.xml".into(), generate_comment_authors_xml(&authors)));
            overrides.push(("/ppt/commentAuthors.xml".into(), ct::PML_COMMENT_AUTHORS));
        }

        // Slides with their notes and comments
        for i in 0..self.slides {
            let n = i + 1;
            files.push((
                format!("ppt/slides/slide{}.xml", n),
                format!(r#"<p:sld xmlns:p="{}"/>"#, P_NS),
            ));
            overrides.push((format!("/ppt/slides/slide{}.xml", n), ct::PML_SLIDE));

            let mut slide_rels = vec![rel("rId1", rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")];
            if self.notes {
                slide_rels.push(rel("rId2", rt::NOTES_SLIDE, format!("../notesSlides/notesSlide{}.xml", n)));
                files.push((
                    format!("ppt/notesSlides/notesSlide{}.xml", n),
                    format!(r#"<p:notes xmlns:p="{}"/>"#, P_NS),
                ));
                overrides.push((format!("/ppt/notesSlides/notesSlide{}.xml", n), ct::PML_NOTES_SLIDE));
            }

            let comments: Vec<Comment> = self
                .comments
                .iter()
                .filter(|(slide, _, _)| *slide == i)
                .enumerate()
                .map(|(idx, (_, author, text))| {
                    Comment::new(*author, *text, 10, 10)
                        .with_datetime("2008-03-20T10:09:11.371")
                        .with_index(idx as u32 + 1)
                })
                .collect();
            if !comments.is_empty() {
                slide_rels.push(rel("rId3", rt::COMMENTS, format!("../comments/comment{}.xml", n)));
                files.push((format!("ppt/comments/comment{}.xml", n), generate_comments_xml(&comments)));
                overrides.push((format!("/ppt/comments/comment{}.xml", n), ct::PML_COMMENTS));
            }

            files.push((format!("ppt/slides/_rels/slide{}.xml.rels", n), rels_xml(&slide_rels)));
        }

        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        for (partname, content_type) in &overrides {
            content_types.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                partname, content_type
            ));
        }
        content_types.push_str("</Types>");
        files.insert(0, ("[Content_Types].xml".into(), content_types));

        zip_files(&files)
    }
}

fn zip_files(files: &[(String, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in files {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A source that counts how often it was closed.
pub struct TrackingSource {
    data: Cursor<Vec<u8>>,
    closes: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl TrackingSource {
    /// The source plus a handle that outlives it.
    pub fn new(data: Vec<u8>) -> (Self, CloseCounter) {
        let counter = CloseCounter {
            closes: Arc::new(AtomicUsize::new(0)),
            drops: Arc::new(AtomicUsize::new(0)),
        };
        (
            Self {
                data: Cursor::new(data),
                closes: Arc::clone(&counter.closes),
                drops: Arc::clone(&counter.drops),
            },
            counter,
        )
    }
}

impl Read for TrackingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl InputSource for TrackingSource {
    fn close(&mut self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for TrackingSource {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct CloseCounter {
    closes: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl CloseCounter {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Whether the source value itself has been dropped.
    pub fn is_released(&self) -> bool {
        self.drops.load(Ordering::SeqCst) > 0
    }

    pub fn is_closed(&self) -> bool {
        self.closes() > 0
    }
}
