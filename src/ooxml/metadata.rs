/// Document property parts (`docProps/core.xml`, `docProps/app.xml`).
///
/// The loader does not interpret metadata; it hands the caller a
/// [`DocumentProperties`] handle. Well-known fields have typed getters, and
/// every simple field of either part is reachable by name through
/// [`PropertyBag::raw`], so producers' extra fields are never lost.
use crate::common::Metadata;
use crate::common::xml::push_reference;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, Part};
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;

/// Access to property fields by their XML local name.
pub trait PropertyBag {
    /// Text content of the field, `None` when absent or empty.
    fn raw(&self, name: &str) -> Option<&str>;

    /// Names of all populated fields.
    fn field_names(&self) -> Vec<&str>;

    /// Field parsed as an unsigned count.
    fn count(&self, name: &str) -> Option<u32> {
        self.raw(name).and_then(|v| atoi_simd::parse::<u32>(v.trim().as_bytes()).ok())
    }

    /// Field parsed as a W3CDTF timestamp.
    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.raw(name).and_then(|v| parse_datetime(v).ok())
    }
}

/// Core (Dublin Core based) properties.
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    partname: Option<PackURI>,
    fields: BTreeMap<String, String>,
}

impl CoreProperties {
    pub fn title(&self) -> Option<&str> {
        self.raw("title")
    }

    pub fn subject(&self) -> Option<&str> {
        self.raw("subject")
    }

    pub fn creator(&self) -> Option<&str> {
        self.raw("creator")
    }

    pub fn keywords(&self) -> Option<&str> {
        self.raw("keywords")
    }

    pub fn description(&self) -> Option<&str> {
        self.raw("description")
    }

    pub fn last_modified_by(&self) -> Option<&str> {
        self.raw("lastModifiedBy")
    }

    pub fn revision(&self) -> Option<&str> {
        self.raw("revision")
    }

    pub fn category(&self) -> Option<&str> {
        self.raw("category")
    }

    pub fn content_status(&self) -> Option<&str> {
        self.raw("contentStatus")
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.timestamp("created")
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.timestamp("modified")
    }

    pub fn last_printed(&self) -> Option<DateTime<Utc>> {
        self.timestamp("lastPrinted")
    }

    /// Partname of the backing part, `None` when the package has none.
    pub fn partname(&self) -> Option<&PackURI> {
        self.partname.as_ref()
    }
}

impl PropertyBag for CoreProperties {
    fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

/// Extended (application) properties.
#[derive(Debug, Clone, Default)]
pub struct ExtendedProperties {
    partname: Option<PackURI>,
    fields: BTreeMap<String, String>,
}

impl ExtendedProperties {
    pub fn application(&self) -> Option<&str> {
        self.raw("Application")
    }

    pub fn app_version(&self) -> Option<&str> {
        self.raw("AppVersion")
    }

    pub fn company(&self) -> Option<&str> {
        self.raw("Company")
    }

    pub fn presentation_format(&self) -> Option<&str> {
        self.raw("PresentationFormat")
    }

    pub fn template(&self) -> Option<&str> {
        self.raw("Template")
    }

    pub fn slides(&self) -> Option<u32> {
        self.count("Slides")
    }

    pub fn notes(&self) -> Option<u32> {
        self.count("Notes")
    }

    pub fn hidden_slides(&self) -> Option<u32> {
        self.count("HiddenSlides")
    }

    pub fn words(&self) -> Option<u32> {
        self.count("Words")
    }

    pub fn paragraphs(&self) -> Option<u32> {
        self.count("Paragraphs")
    }

    /// Character count; producers omit the field when it is zero.
    pub fn characters(&self) -> u32 {
        self.count("Characters").unwrap_or(0)
    }

    /// Line count; producers omit the field when it is zero.
    pub fn lines(&self) -> u32 {
        self.count("Lines").unwrap_or(0)
    }

    /// Total editing time in minutes.
    pub fn total_time(&self) -> Option<u32> {
        self.count("TotalTime")
    }

    pub fn partname(&self) -> Option<&PackURI> {
        self.partname.as_ref()
    }
}

impl PropertyBag for ExtendedProperties {
    fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

/// Metadata handle of a loaded document.
///
/// Both property sets are always available; a package without the
/// corresponding part yields an empty set whose `partname()` is `None`.
#[derive(Debug, Clone, Default)]
pub struct DocumentProperties {
    core: CoreProperties,
    extended: ExtendedProperties,
}

impl DocumentProperties {
    /// Read both property parts from a package.
    pub fn from_package(package: &OpcPackage) -> Result<Self> {
        let core = match find_property_part(
            package,
            rt::CORE_PROPERTIES,
            ct::OPC_CORE_PROPERTIES,
        )? {
            Some(part) => CoreProperties {
                partname: Some(part.partname().clone()),
                fields: parse_property_fields(part.blob())?,
            },
            None => CoreProperties::default(),
        };

        let extended = match find_property_part(
            package,
            rt::EXTENDED_PROPERTIES,
            ct::OFC_EXTENDED_PROPERTIES,
        )? {
            Some(part) => ExtendedProperties {
                partname: Some(part.partname().clone()),
                fields: parse_property_fields(part.blob())?,
            },
            None => ExtendedProperties::default(),
        };

        Ok(Self { core, extended })
    }

    pub fn core(&self) -> &CoreProperties {
        &self.core
    }

    pub fn extended(&self) -> &ExtendedProperties {
        &self.extended
    }

    /// Flatten the well-known fields into a [`Metadata`] summary.
    pub fn to_metadata(&self) -> Metadata {
        let core = &self.core;
        let ext = &self.extended;
        let owned = |v: Option<&str>| v.map(str::to_string);

        Metadata {
            title: owned(core.title()),
            subject: owned(core.subject()),
            author: owned(core.creator()),
            keywords: owned(core.keywords()),
            description: owned(core.description()),
            last_modified_by: owned(core.last_modified_by()),
            revision: owned(core.revision()),
            created: core.created(),
            modified: core.modified(),
            category: owned(core.category()),
            content_status: owned(core.content_status()),
            application: owned(ext.application()),
            company: owned(ext.company()),
            slide_count: ext.slides(),
            note_count: ext.notes(),
            word_count: ext.words(),
        }
    }
}

/// Locate a property part through the package relationship, falling back to
/// a content-type scan for packages that omit the relationship.
fn find_property_part<'a>(
    package: &'a OpcPackage,
    reltype: &str,
    content_type: &str,
) -> Result<Option<&'a dyn Part>> {
    if let Some(part) = package.related_by_type(&PackURI::package(), reltype)? {
        return Ok(Some(part));
    }
    Ok(package.parts_with_content_type(content_type).into_iter().next())
}

/// Collect the text of every simple child of the root element, keyed by
/// local name. Structured children (vectors, variants) are skipped.
fn parse_property_fields(xml: &[u8]) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_reader(xml);

    let mut fields = BTreeMap::new();
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if depth == 2 {
                    let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
                    current = Some((name, String::new()));
                } else if depth > 2 {
                    current = None;
                }
            },
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(std::str::from_utf8(e.as_ref())?);
                }
            },
            Ok(Event::GeneralRef(e)) => {
                if let Some((_, text)) = current.as_mut() {
                    push_reference(text, &e);
                }
            },
            Ok(Event::End(_)) => {
                if depth == 2
                    && let Some((name, text)) = current.take()
                    && !text.trim().is_empty()
                {
                    fields.insert(name, text.trim().to_string());
                }
                depth = depth.saturating_sub(1);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("Property part parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(fields)
}

/// Parse an ISO 8601 / W3CDTF timestamp.
///
/// Supports forms like `2023-10-10T14:30:00Z`, `2023-10-10T14:30:00.1234567Z`
/// and `2023-10-10T14:30:00` (assumed UTC).
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(OoxmlError::Format(format!("Invalid datetime format: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const CORE_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title></dc:title>
  <dc:creator>R &amp; D</dc:creator>
  <cp:revision>3</cp:revision>
  <dcterms:created xsi:type="dcterms:W3CDTF">2006-08-16T00:00:00Z</dcterms:created>
</cp:coreProperties>"#;

    const APP_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>4</TotalTime>
  <Words>11</Words>
  <Application>Microsoft Office PowerPoint</Application>
  <HeadingPairs><vt:vector size="2" baseType="variant"><vt:variant><vt:lpstr>Theme</vt:lpstr></vt:variant></vt:vector></HeadingPairs>
  <Slides>2</Slides>
</Properties>"#;

    #[test]
    fn test_core_fields() {
        let core = CoreProperties {
            partname: None,
            fields: parse_property_fields(CORE_XML).unwrap(),
        };
        assert_eq!(core.title(), None);
        assert_eq!(core.subject(), None);
        assert_eq!(core.creator(), Some("R & D"));
        assert_eq!(core.revision(), Some("3"));
        assert_eq!(core.created().unwrap().year(), 2006);
    }

    #[test]
    fn test_extended_fields_skip_structured_children() {
        let ext = ExtendedProperties {
            partname: None,
            fields: parse_property_fields(APP_XML).unwrap(),
        };
        assert_eq!(ext.application(), Some("Microsoft Office PowerPoint"));
        assert_eq!(ext.slides(), Some(2));
        assert_eq!(ext.characters(), 0);
        assert_eq!(ext.lines(), 0);
        assert_eq!(ext.raw("TotalTime"), Some("4"));
        assert!(ext.raw("HeadingPairs").is_none());
        assert_eq!(ext.field_names(), vec!["Application", "Slides", "TotalTime", "Words"]);
    }

    #[test]
    fn test_parse_datetime() {
        assert_eq!(parse_datetime("2023-10-10T14:30:00Z").unwrap().month(), 10);
        assert_eq!(parse_datetime("2023-10-10T14:30:00.1234567Z").unwrap().day(), 10);
        assert!(parse_datetime("2023-10-10T14:30:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
