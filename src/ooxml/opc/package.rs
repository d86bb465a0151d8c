/// In-memory OPC package: the part store every document is built from.
///
/// An `OpcPackage` owns all parts and the package-level relationships. It
/// answers three kinds of questions: which parts exist (and with which
/// content type), which part a relationship id points to from a given source,
/// and which part is reached through a relationship type.
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::rel::{Relationship, Relationships};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub struct OpcPackage {
    rels: Relationships,
    parts: HashMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::default(),
            parts: HashMap::new(),
        }
    }

    /// Open a package file.
    ///
    /// # Example
    /// ```no_run
    /// use slidedeck::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("deck.pptx").unwrap();
    /// println!("{} parts", pkg.part_count());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Load a package from any byte source. The source is read to the end.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::from_reader(reader)?)?)
    }

    /// Load a package from bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(PhysPkgReader::from_bytes(data)?)?)
    }

    fn unmarshal(pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();
        let (pkg_srels, sparts) = pkg_reader.into_parts();

        for srel in pkg_srels {
            let is_external = srel.is_external();
            package
                .rels
                .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
        }

        for spart in sparts {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut()
                    .add_relationship(srel.reltype, srel.target_ref, srel.r_id, is_external);
            }
            package.add_part(part);
        }

        tracing::debug!(parts = package.parts.len(), "unmarshalled package");
        Ok(package)
    }

    /// Look up a part by partname.
    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.part(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Look up a part by partname, `None` when absent.
    pub fn part(&self, partname: &PackURI) -> Option<&dyn Part> {
        self.parts.get(partname).map(|b| &**b as &dyn Part)
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        self.parts
            .get_mut(partname)
            .map(|b| &mut **b as &mut dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Relationships whose source is `source` (`/` for the package itself).
    pub fn rels_of(&self, source: &PackURI) -> Result<&Relationships> {
        if source.as_str() == "/" {
            Ok(&self.rels)
        } else {
            Ok(self.get_part(source)?.rels())
        }
    }

    /// The part that relationship `r_id` of `source` points to.
    ///
    /// Returns `Ok(None)` when `source` has no relationship with that id.
    /// A relationship that exists but cannot be followed (external target,
    /// target missing from the package) is an error.
    pub fn related_part(&self, source: &PackURI, r_id: &str) -> Result<Option<&dyn Part>> {
        match self.rels_of(source)?.get(r_id) {
            Some(rel) => self.follow(rel).map(Some),
            None => Ok(None),
        }
    }

    /// The part reached from `source` through the first relationship of
    /// `reltype` (in rId order), `Ok(None)` when there is none.
    pub fn related_by_type(&self, source: &PackURI, reltype: &str) -> Result<Option<&dyn Part>> {
        let rels = self.rels_of(source)?;
        let mut matching = rels.by_reltype(reltype);
        let Some(rel) = matching.next() else {
            return Ok(None);
        };
        if let Some(extra) = matching.next() {
            tracing::warn!(
                %source,
                reltype,
                used = rel.r_id(),
                ignored = extra.r_id(),
                "multiple relationships of a single-valued type"
            );
        }
        self.follow(rel).map(Some)
    }

    fn follow(&self, rel: &Relationship) -> Result<&dyn Part> {
        let partname = rel.target_partname()?;
        self.get_part(&partname)
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    /// Iterate over all parts in no particular order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    /// All parts with the given content type, ordered by partname.
    pub fn parts_with_content_type<'a>(&'a self, content_type: &str) -> Vec<&'a dyn Part> {
        let mut parts: Vec<&dyn Part> = self
            .iter_parts()
            .filter(|part| part.content_type() == content_type)
            .collect();
        parts.sort_by(|a, b| a.partname().cmp(b.partname()));
        parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    /// Package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Release the package without writing anything back.
    pub fn revert(self) {
        tracing::debug!(parts = self.parts.len(), "reverted package");
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
