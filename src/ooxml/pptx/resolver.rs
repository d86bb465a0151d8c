/// Resolution of id-list entries to parts.
///
/// The presentation part lists slides, masters and the notes master as
/// `(id, r:id)` pairs. Each pair is looked up in the relationship table of
/// the part that holds the list. The master id `0x80000000` is reserved:
/// an entry carrying it may legitimately have no relationship, meaning the
/// slide or master inherits the single applicable master.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::{OpcPackage, PackURI};

/// Reserved id meaning "no explicit id, inherit".
pub const MASTER_ID_SENTINEL: u32 = 0x8000_0000;

/// One row of an id list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceEntry {
    /// Numeric id; `None` for lists that carry only a relationship id
    pub id: Option<u32>,
    /// Relationship id, matched exactly against the source's `.rels`
    pub r_id: String,
}

impl ReferenceEntry {
    pub fn new(id: Option<u32>, r_id: impl Into<String>) -> Self {
        Self {
            id,
            r_id: r_id.into(),
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.id == Some(MASTER_ID_SENTINEL)
    }
}

/// Outcome of resolving one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The entry points to this part
    Resolved(PackURI),
    /// Sentinel entry with no relationship
    Inherited,
}

impl Resolution {
    #[inline]
    pub fn partname(&self) -> Option<&PackURI> {
        match self {
            Resolution::Resolved(partname) => Some(partname),
            Resolution::Inherited => None,
        }
    }

    #[inline]
    pub fn is_inherited(&self) -> bool {
        matches!(self, Resolution::Inherited)
    }
}

/// An entry paired with its resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub entry: ReferenceEntry,
    pub resolution: Resolution,
}

/// Resolve every entry against the relationships of `from`.
///
/// The output has one element per input entry, in input order. The first
/// entry that neither resolves nor carries the sentinel fails the whole
/// list with [`OoxmlError::InconsistentPackage`].
pub fn resolve(
    entries: &[ReferenceEntry],
    store: &OpcPackage,
    from: &PackURI,
) -> Result<Vec<ResolvedEntry>> {
    entries
        .iter()
        .map(|entry| {
            Ok(ResolvedEntry {
                entry: entry.clone(),
                resolution: resolve_one(entry, store, from)?,
            })
        })
        .collect()
}

/// Resolve a single entry against the relationships of `from`.
pub fn resolve_one(
    entry: &ReferenceEntry,
    store: &OpcPackage,
    from: &PackURI,
) -> Result<Resolution> {
    match store.related_part(from, &entry.r_id) {
        Ok(Some(part)) => {
            tracing::debug!(%from, r_id = %entry.r_id, target = %part.partname(), "resolved entry");
            Ok(Resolution::Resolved(part.partname().clone()))
        },
        Ok(None) if entry.is_sentinel() => {
            tracing::debug!(%from, r_id = %entry.r_id, "sentinel entry inherits");
            Ok(Resolution::Inherited)
        },
        Ok(None) => Err(OoxmlError::InconsistentPackage(format!(
            "{} lists relationship {} (id {:?}) but has no such relationship",
            from, entry.r_id, entry.id
        ))),
        Err(e) => Err(OoxmlError::InconsistentPackage(format!(
            "{} relationship {} cannot be followed: {}",
            from, entry.r_id, e
        ))),
    }
}

/// The part reached from `from` through a relationship of `reltype`.
///
/// Absence is `Ok(None)`; a relationship that exists but points nowhere is
/// an inconsistent package.
pub fn related_by_type(
    store: &OpcPackage,
    from: &PackURI,
    reltype: &str,
) -> Result<Option<PackURI>> {
    match store.related_by_type(from, reltype) {
        Ok(part) => Ok(part.map(|p| p.partname().clone())),
        Err(e) => Err(OoxmlError::InconsistentPackage(format!(
            "{} relationship of type {} cannot be followed: {}",
            from, reltype, e
        ))),
    }
}
