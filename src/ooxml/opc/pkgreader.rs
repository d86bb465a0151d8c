//! Serialized view of a package: content types, `.rels` files and every
//! part the container holds.

use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// A part as loaded from the container, before it becomes a [`Part`].
///
/// [`Part`]: crate::ooxml::opc::part::Part
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    pub srels: SmallVec<[SerializedRelationship; 8]>,
}

/// A relationship as read from a `.rels` file.
#[derive(Debug, Clone)]
pub struct SerializedRelationship {
    pub base_uri: String,
    pub r_id: String,
    pub reltype: String,
    pub target_ref: String,
    pub target_mode: String,
}

impl SerializedRelationship {
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external() {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets external resource '{}'",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// `[Content_Types].xml`: `Default` entries by extension, `Override`
/// entries by partname. Both are matched case-insensitively.
struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        };
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) =
                                (attr_value(e, b"Extension")?, attr_value(e, b"ContentType")?)
                            {
                                map.defaults.insert(ext.to_lowercase(), ct);
                            }
                        },
                        b"Override" => {
                            if let (Some(pn), Some(ct)) =
                                (attr_value(e, b"PartName")?, attr_value(e, b"ContentType")?)
                            {
                                map.overrides.insert(pn.to_lowercase(), ct);
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!("Content types parse error: {}", e)));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    fn get(&self, pack_uri: &PackURI) -> Result<String> {
        if let Some(ct) = self.overrides.get(&pack_uri.as_str().to_lowercase()) {
            return Ok(ct.clone());
        }
        self.defaults
            .get(&pack_uri.ext().to_lowercase())
            .cloned()
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Reads the serialized parts and relationships of a package.
pub struct PackageReader {
    pkg_srels: SmallVec<[SerializedRelationship; 8]>,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    /// Load every part of the container exactly once.
    ///
    /// Parts reachable from the package relationships come first and must
    /// have a content type. Members no relationship points to are loaded
    /// afterwards when `[Content_Types].xml` declares a type for them, so
    /// content-type scans see the whole package.
    pub fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types = ContentTypeMap::from_xml(phys_reader.content_types_xml()?)?;
        let package_uri = PackURI::package();
        let pkg_srels = Self::load_rels(&phys_reader, &package_uri)?;

        let mut sparts = Vec::with_capacity(phys_reader.len());
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut work_queue: Vec<PackURI> = Vec::new();

        Self::enqueue(&pkg_srels, &mut visited, &mut work_queue);

        while let Some(partname) = work_queue.pop() {
            if !phys_reader.contains(&partname) {
                // Dangling targets are reported by whoever resolves them.
                tracing::debug!(%partname, "relationship target missing from container");
                continue;
            }

            let srels = Self::load_rels(&phys_reader, &partname)?;
            Self::enqueue(&srels, &mut visited, &mut work_queue);

            let content_type = content_types.get(&partname)?;
            let blob = phys_reader.take_blob(&partname)?;
            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                srels,
            });
        }

        for partname in Self::unreferenced_parts(&phys_reader) {
            let Ok(content_type) = content_types.get(&partname) else {
                tracing::debug!(%partname, "container member without a content type, skipped");
                continue;
            };
            let srels = Self::load_rels(&phys_reader, &partname)?;
            let blob = phys_reader.take_blob(&partname)?;
            tracing::debug!(%partname, %content_type, "loaded unreferenced part");
            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                srels,
            });
        }

        Ok(Self { pkg_srels, sparts })
    }

    fn enqueue(
        srels: &[SerializedRelationship],
        visited: &mut HashSet<PackURI>,
        work_queue: &mut Vec<PackURI>,
    ) {
        for srel in srels.iter().filter(|srel| !srel.is_external()) {
            if let Ok(partname) = srel.target_partname()
                && visited.insert(partname.clone())
            {
                work_queue.push(partname);
            }
        }
    }

    /// Members left after the relationship walk that can be parts: not the
    /// content types stream and not a `.rels` file. Sorted by partname.
    fn unreferenced_parts(phys_reader: &PhysPkgReader) -> Vec<PackURI> {
        let mut partnames: Vec<PackURI> = phys_reader
            .membernames()
            .filter(|name| !name.ends_with(".rels"))
            .filter_map(|name| PackURI::new(format!("/{}", name)).ok())
            .filter(|partname| partname.as_str() != CONTENT_TYPES_URI)
            .collect();
        partnames.sort();
        partnames
    }

    fn load_rels(
        phys_reader: &PhysPkgReader,
        source_uri: &PackURI,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        match phys_reader.rels_xml_for(source_uri)? {
            Some(xml) => Self::parse_rels_xml(xml, source_uri.base_uri()),
            None => Ok(SmallVec::new()),
        }
    }

    fn parse_rels_xml(
        rels_xml: &[u8],
        base_uri: &str,
    ) -> Result<SmallVec<[SerializedRelationship; 8]>> {
        let mut srels = SmallVec::new();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let r_id = attr_value(e, b"Id")?;
                    let reltype = attr_value(e, b"Type")?;
                    let target_ref = attr_value(e, b"Target")?;
                    let target_mode = attr_value(e, b"TargetMode")?
                        .unwrap_or_else(|| target_mode::INTERNAL.to_string());

                    match (r_id, reltype, target_ref) {
                        (Some(r_id), Some(reltype), Some(target_ref)) => {
                            srels.push(SerializedRelationship {
                                base_uri: base_uri.to_string(),
                                r_id,
                                reltype,
                                target_ref,
                                target_mode,
                            });
                        },
                        _ => {
                            return Err(OpcError::InvalidRelationship(format!(
                                "Relationship under {} lacks Id, Type or Target",
                                base_uri
                            )));
                        },
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(srels)
    }

    pub fn pkg_srels(&self) -> &[SerializedRelationship] {
        &self.pkg_srels
    }

    /// Take ownership of all serialized parts and package relationships.
    pub fn into_parts(
        self,
    ) -> (SmallVec<[SerializedRelationship; 8]>, Vec<SerializedPart>) {
        (self.pkg_srels, self.sparts)
    }
}
