//! In-memory debug info backend
//!
//! A [`DieArena`] holds DIEs in a flat vector addressed by [`DieId`]. It is
//! built through a small builder API and is the backend used to exercise the
//! analyzer without an object file.

use crate::analyzer::file_table::FileTable;
use crate::backend::{AttrKind, AttrValue, DebugInfoProvider, Tag};
use crate::error::BackendError;

/// Handle to a DIE stored in a [`DieArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DieId(usize);

/// Handle to a unit stored in a [`DieArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(usize);

#[derive(Debug)]
struct ArenaUnit {
    root: DieId,
    files: FileTable,
}

#[derive(Debug)]
struct ArenaDie {
    tag: Tag,
    attrs: Vec<(AttrKind, AttrValue<DieId>)>,
    first_child: Option<DieId>,
    last_child: Option<DieId>,
    next_sibling: Option<DieId>,
}

impl ArenaDie {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }
}

/// Arena of DIEs grouped into units
#[derive(Debug, Default)]
pub struct DieArena {
    units: Vec<ArenaUnit>,
    dies: Vec<ArenaDie>,
}

impl DieArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit with a classic 1-based file table; returns its root DIE
    pub fn add_unit<I, S>(&mut self, tag: Tag, files: I) -> DieId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let files = FileTable::new(files.into_iter().map(Into::into).collect());
        self.add_unit_with_table(tag, files)
    }

    /// Add a unit with an explicit file table; returns its root DIE
    pub fn add_unit_with_table(&mut self, tag: Tag, files: FileTable) -> DieId {
        let root = self.push(ArenaDie::new(tag));
        self.units.push(ArenaUnit { root, files });
        root
    }

    /// Append a child DIE after the existing children of `parent`
    pub fn add_child(&mut self, parent: DieId, tag: Tag) -> DieId {
        let child = self.push(ArenaDie::new(tag));
        match self.dies[parent.0].last_child {
            Some(last) => self.dies[last.0].next_sibling = Some(child),
            None => self.dies[parent.0].first_child = Some(child),
        }
        self.dies[parent.0].last_child = Some(child);
        child
    }

    /// Set an attribute, replacing any previous value of the same kind
    pub fn set_attr(&mut self, die: DieId, kind: AttrKind, value: AttrValue<DieId>) -> &mut Self {
        let attrs = &mut self.dies[die.0].attrs;
        match attrs.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = value,
            None => attrs.push((kind, value)),
        }
        self
    }

    /// Set a string attribute
    pub fn set_str(&mut self, die: DieId, kind: AttrKind, value: &str) -> &mut Self {
        self.set_attr(die, kind, AttrValue::String(value.to_string()))
    }

    /// Set an unsigned attribute
    pub fn set_udata(&mut self, die: DieId, kind: AttrKind, value: u64) -> &mut Self {
        self.set_attr(die, kind, AttrValue::Unsigned(value))
    }

    /// Set a reference attribute
    pub fn set_ref(&mut self, die: DieId, kind: AttrKind, target: DieId) -> &mut Self {
        self.set_attr(die, kind, AttrValue::Reference(target))
    }

    /// Set a flag attribute to true
    pub fn set_flag(&mut self, die: DieId, kind: AttrKind) -> &mut Self {
        self.set_attr(die, kind, AttrValue::Flag(true))
    }

    /// Number of DIEs in the arena
    pub fn len(&self) -> usize {
        self.dies.len()
    }

    /// Whether the arena holds no DIEs
    pub fn is_empty(&self) -> bool {
        self.dies.is_empty()
    }

    fn push(&mut self, die: ArenaDie) -> DieId {
        self.dies.push(die);
        DieId(self.dies.len() - 1)
    }

    fn die(&self, id: DieId) -> Result<&ArenaDie, BackendError> {
        self.dies
            .get(id.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{:?}", id)))
    }

    fn unit(&self, id: UnitId) -> Result<&ArenaUnit, BackendError> {
        self.units
            .get(id.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{:?}", id)))
    }
}

impl DebugInfoProvider for DieArena {
    type Unit = UnitId;
    type Die = DieId;

    fn units(&self) -> Vec<UnitId> {
        (0..self.units.len()).map(UnitId).collect()
    }

    fn unit_root(&self, unit: UnitId) -> Result<Option<DieId>, BackendError> {
        Ok(Some(self.unit(unit)?.root))
    }

    fn file_table(&self, unit: UnitId) -> Result<FileTable, BackendError> {
        Ok(self.unit(unit)?.files.clone())
    }

    fn tag(&self, die: DieId) -> Result<Tag, BackendError> {
        Ok(self.die(die)?.tag)
    }

    fn first_child(&self, die: DieId) -> Result<Option<DieId>, BackendError> {
        Ok(self.die(die)?.first_child)
    }

    fn next_sibling(&self, die: DieId) -> Result<Option<DieId>, BackendError> {
        Ok(self.die(die)?.next_sibling)
    }

    fn attr(&self, die: DieId, kind: AttrKind) -> Result<Option<AttrValue<DieId>>, BackendError> {
        Ok(self
            .die(die)?
            .attrs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, value)| value.clone()))
    }
}
