//! Debug info backends
//!
//! The analyzer only ever talks to a [`DebugInfoProvider`]. Each backend is a
//! thin translation layer from its own object model into the small vocabulary
//! defined here ([`Tag`], [`AttrKind`], [`AttrValue`]), so the traversal and
//! classification logic exists exactly once.

pub mod arena;
pub mod demangle;
pub mod dwarf;

use std::fmt;
use std::hash::Hash;

use crate::analyzer::file_table::FileTable;
use crate::error::BackendError;

pub use arena::{DieArena, DieId, UnitId};
pub use dwarf::{DieRef, DwarfProvider};

/// DIE tags the analyzer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Full compile unit root
    CompileUnit,
    /// Partial unit root (only reachable through an import)
    PartialUnit,
    /// Type unit root
    TypeUnit,
    /// Function, either a definition or a declaration
    Subprogram,
    /// Formal parameter of a subprogram
    FormalParameter,
    /// Reference that pulls another unit's entries into this one
    ImportedUnit,
    /// `class` type
    ClassType,
    /// `struct` type
    StructureType,
    /// `union` type
    UnionType,
    /// `enum` type
    EnumerationType,
    /// Scalar base type
    BaseType,
    /// Pointer type
    PointerType,
    /// Array type
    ArrayType,
    /// `const` qualifier
    ConstType,
    /// `volatile` qualifier
    VolatileType,
    /// `typedef` alias
    Typedef,
    /// Any other tag, carrying the raw DWARF tag value
    Other(u16),
}

/// Attribute kinds the analyzer looks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// Plain source-level name
    Name,
    /// Mangled symbol name
    LinkageName,
    /// Pre-DWARF-4 vendor spelling of the mangled symbol name
    MipsLinkageName,
    /// Declaration file index into the unit's file table
    DeclFile,
    /// Declaration line
    DeclLine,
    /// Marks a DIE as a declaration only
    Declaration,
    /// Reference to the entity's type
    Type,
    /// Reference from a concrete or inlined instance to its abstract DIE
    AbstractOrigin,
    /// Reference from an out-of-line definition to its declaration
    Specification,
    /// Reference from an imported unit entry to the imported DIE
    Import,
}

/// A backend-neutral attribute value
///
/// References are already resolved into the backend's DIE handle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue<D> {
    /// String-valued attribute
    String(String),
    /// Unsigned constant (also used for file indices)
    Unsigned(u64),
    /// Flag attribute
    Flag(bool),
    /// Reference to another DIE
    Reference(D),
}

impl<D: Copy> AttrValue<D> {
    /// Take the string payload, if this is a string value
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The unsigned payload, if this is an unsigned value
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(value) => Some(*value),
            _ => None,
        }
    }

    /// The referenced DIE, if this is a reference value
    pub fn as_reference(&self) -> Option<D> {
        match self {
            Self::Reference(die) => Some(*die),
            _ => None,
        }
    }
}

/// Capability interface every debug info backend implements
///
/// All lookups report a miss as `Ok(None)`. An `Err` means the backend hit
/// malformed data; the analyzer treats it as a miss for that entity only.
/// Integration through `abstract_origin`/`specification` is not part of this
/// trait: the analyzer implements it once on top of [`attr`](Self::attr).
pub trait DebugInfoProvider {
    /// Handle identifying one unit
    type Unit: Copy + fmt::Debug;
    /// Opaque DIE handle; cheap to copy and owns no DIE memory
    type Die: Copy + Eq + Hash + fmt::Debug;

    /// All units of the loaded binary, in section order
    fn units(&self) -> Vec<Self::Unit>;

    /// Root DIE of a unit
    fn unit_root(&self, unit: Self::Unit) -> Result<Option<Self::Die>, BackendError>;

    /// Source file table of a unit
    fn file_table(&self, unit: Self::Unit) -> Result<FileTable, BackendError>;

    /// Tag of a DIE
    fn tag(&self, die: Self::Die) -> Result<Tag, BackendError>;

    /// First child of a DIE
    fn first_child(&self, die: Self::Die) -> Result<Option<Self::Die>, BackendError>;

    /// Next sibling of a DIE
    fn next_sibling(&self, die: Self::Die) -> Result<Option<Self::Die>, BackendError>;

    /// Attribute stored directly on a DIE, without following any origin
    fn attr(&self, die: Self::Die, kind: AttrKind)
        -> Result<Option<AttrValue<Self::Die>>, BackendError>;

    /// Resolve a reference-valued attribute into the referenced DIE
    fn attr_die(&self, die: Self::Die, kind: AttrKind) -> Result<Option<Self::Die>, BackendError> {
        Ok(self.attr(die, kind)?.and_then(|value| value.as_reference()))
    }

    /// Whether the attribute is present directly on the DIE
    fn has_attr(&self, die: Self::Die, kind: AttrKind) -> Result<bool, BackendError> {
        Ok(self.attr(die, kind)?.is_some())
    }

    /// Demangle a linkage name into a signature with parameter types
    fn demangle(&self, linkage_name: &str) -> Option<String> {
        demangle::demangle(linkage_name)
    }
}
