/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package. Only the three id
/// lists and the page sizes are read; everything else is left to the part
/// store untouched.
use crate::common::xml::attr_i64;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::resolver::ReferenceEntry;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Page size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    pub cx: i64,
    pub cy: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdList {
    Slides,
    Masters,
    NotesMasters,
}

/// Parsed content of the presentation part.
#[derive(Debug, Clone, Default)]
pub struct PresentationPart {
    slide_ids: Vec<ReferenceEntry>,
    master_ids: Vec<ReferenceEntry>,
    notes_master_ids: Vec<ReferenceEntry>,
    slide_size: Option<SlideSize>,
    notes_size: Option<SlideSize>,
}

impl PresentationPart {
    /// Parse the presentation XML.
    ///
    /// Fails with a format error when an id list entry has no relationship
    /// id or a non-numeric id, or when more than one notes master is listed.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut pres = Self::default();
        // Depth of the innermost open element; the root element is depth 1
        let mut depth = 0usize;
        let mut list: Option<IdList> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    depth += 1;
                    pres.handle_element(&e, depth, &mut list)?;
                },
                Ok(Event::Empty(e)) => {
                    // An empty element opens no scope for later siblings
                    let mut scope = list;
                    pres.handle_element(&e, depth + 1, &mut scope)?;
                },
                Ok(Event::End(_)) => {
                    if depth == 2 {
                        list = None;
                    }
                    depth = depth.saturating_sub(1);
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("Presentation parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        if pres.notes_master_ids.len() > 1 {
            return Err(OoxmlError::Format(format!(
                "notesMasterIdLst has {} entries, at most 1 allowed",
                pres.notes_master_ids.len()
            )));
        }

        Ok(pres)
    }

    fn handle_element(
        &mut self,
        e: &BytesStart<'_>,
        depth: usize,
        list: &mut Option<IdList>,
    ) -> Result<()> {
        let local = e.local_name();
        match depth {
            2 => {
                *list = match local.as_ref() {
                    b"sldIdLst" => Some(IdList::Slides),
                    b"sldMasterIdLst" => Some(IdList::Masters),
                    b"notesMasterIdLst" => Some(IdList::NotesMasters),
                    _ => None,
                };
                match local.as_ref() {
                    b"sldSz" => self.slide_size = read_size(e),
                    b"notesSz" => self.notes_size = read_size(e),
                    _ => {},
                }
            },
            3 => {
                let target = match (*list, local.as_ref()) {
                    (Some(IdList::Slides), b"sldId") => &mut self.slide_ids,
                    (Some(IdList::Masters), b"sldMasterId") => &mut self.master_ids,
                    (Some(IdList::NotesMasters), b"notesMasterId") => &mut self.notes_master_ids,
                    _ => return Ok(()),
                };
                target.push(read_entry(e)?);
            },
            _ => {},
        }
        Ok(())
    }

    /// Entries of `sldIdLst` in document order.
    #[inline]
    pub fn slide_ids(&self) -> &[ReferenceEntry] {
        &self.slide_ids
    }

    /// Entries of `sldMasterIdLst` in document order.
    #[inline]
    pub fn master_ids(&self) -> &[ReferenceEntry] {
        &self.master_ids
    }

    /// The `notesMasterIdLst` entry, if any.
    #[inline]
    pub fn notes_master_id(&self) -> Option<&ReferenceEntry> {
        self.notes_master_ids.first()
    }

    #[inline]
    pub fn slide_size(&self) -> Option<SlideSize> {
        self.slide_size
    }

    #[inline]
    pub fn notes_size(&self) -> Option<SlideSize> {
        self.notes_size
    }
}

fn read_size(e: &BytesStart<'_>) -> Option<SlideSize> {
    Some(SlideSize {
        cx: attr_i64(e, b"cx")?,
        cy: attr_i64(e, b"cy")?,
    })
}

/// Read one list entry. The unprefixed `id` is the numeric id; the
/// namespaced `id` (normally `r:id`) is the relationship id.
fn read_entry(e: &BytesStart<'_>) -> Result<ReferenceEntry> {
    let element = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut id = None;
    let mut r_id = None;

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() != b"id" {
            continue;
        }
        if attr.key.prefix().is_some() {
            let value = attr
                .unescape_value()
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            r_id = Some(value.into_owned());
        } else {
            let value = attr.value.as_ref();
            let parsed = atoi_simd::parse::<u32>(value).map_err(|_| {
                OoxmlError::Format(format!(
                    "{} has non-numeric id '{}'",
                    element,
                    String::from_utf8_lossy(value)
                ))
            })?;
            id = Some(parsed);
        }
    }

    let r_id = r_id.ok_or_else(|| {
        OoxmlError::Format(format!("{} without a relationship id", element))
    })?;
    Ok(ReferenceEntry::new(id, r_id))
}
