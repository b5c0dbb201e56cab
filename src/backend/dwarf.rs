//! DWARF backend built on `gimli` and `object`

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use gimli::{
    AttributeValue, DebugInfoOffset, DebugTypeSignature, EndianRcSlice, Reader as _,
    RunTimeEndian, Unit, UnitOffset, UnitType,
};
use log::{debug, warn};
use object::{Object, ObjectSection};

use crate::analyzer::file_table::FileTable;
use crate::backend::{AttrKind, AttrValue, DebugInfoProvider, Tag};
use crate::error::BackendError;

/// Reader over reference-counted section data, so the provider owns its
/// sections without borrowing from the file buffer
type Reader = EndianRcSlice<RunTimeEndian>;

/// Handle to a DIE: the index of its unit plus its offset within that unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DieRef {
    /// Index into the provider's unit list
    unit: usize,
    /// Offset of the entry within its unit
    offset: UnitOffset,
}

impl DieRef {
    /// Index of the unit this DIE belongs to
    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Offset of the DIE within its unit
    pub fn offset(&self) -> usize {
        self.offset.0
    }
}

/// Debug info provider over the DWARF sections of an object file
pub struct DwarfProvider {
    /// DWARF sections
    dwarf: gimli::Dwarf<Reader>,
    /// Every unit of `.debug_info` and `.debug_types`, parsed once up front
    units: Vec<Unit<Reader>>,
    /// Type unit signatures and the type DIE each one names
    signatures: HashMap<DebugTypeSignature, DieRef>,
}

impl DwarfProvider {
    /// Open and parse a binary from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| BackendError::Open {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_bytes(&data)
    }

    /// Parse an in-memory object file
    pub fn from_bytes(data: &[u8]) -> Result<Self, BackendError> {
        let object = object::File::parse(data)?;
        let endian = if object.is_little_endian() {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };

        // Missing sections load as empty; compressed ones are inflated here
        let load_section = |id: gimli::SectionId| -> Result<Reader, BackendError> {
            let data = match object.section_by_name(id.name()) {
                Some(section) => section.uncompressed_data()?,
                None => Cow::Borrowed(&[][..]),
            };
            Ok(EndianRcSlice::new(Rc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(load_section)?;
        let units = load_units(&dwarf);
        let signatures = index_type_units(&units);
        debug!("loaded {} DWARF units, {} type units", units.len(), signatures.len());

        Ok(Self {
            dwarf,
            units,
            signatures,
        })
    }

    /// Number of units that parsed successfully
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn unit(&self, index: usize) -> Result<&Unit<Reader>, BackendError> {
        self.units
            .get(index)
            .ok_or_else(|| BackendError::InvalidHandle(format!("unit {}", index)))
    }

    /// Find the unit containing a `.debug_info` offset
    fn resolve_debug_info_ref(&self, offset: DebugInfoOffset) -> Option<DieRef> {
        self.units.iter().enumerate().find_map(|(unit, raw)| {
            offset
                .to_unit_offset(&raw.header)
                .map(|offset| DieRef { unit, offset })
        })
    }

    fn convert(
        &self,
        raw: &Unit<Reader>,
        die: DieRef,
        value: AttributeValue<Reader>,
    ) -> Result<Option<AttrValue<DieRef>>, BackendError> {
        let converted = match value {
            AttributeValue::UnitRef(offset) => Some(AttrValue::Reference(DieRef {
                unit: die.unit,
                offset,
            })),
            AttributeValue::DebugInfoRef(offset) => {
                self.resolve_debug_info_ref(offset).map(AttrValue::Reference)
            }
            AttributeValue::DebugTypesRef(signature) => {
                self.signatures.get(&signature).copied().map(AttrValue::Reference)
            }
            AttributeValue::Flag(flag) => Some(AttrValue::Flag(flag)),
            AttributeValue::FileIndex(index) => Some(AttrValue::Unsigned(index)),
            AttributeValue::Udata(v) => Some(AttrValue::Unsigned(v)),
            AttributeValue::Data1(v) => Some(AttrValue::Unsigned(u64::from(v))),
            AttributeValue::Data2(v) => Some(AttrValue::Unsigned(u64::from(v))),
            AttributeValue::Data4(v) => Some(AttrValue::Unsigned(u64::from(v))),
            AttributeValue::Data8(v) => Some(AttrValue::Unsigned(v)),
            AttributeValue::Sdata(v) => u64::try_from(v).ok().map(AttrValue::Unsigned),
            AttributeValue::String(_)
            | AttributeValue::DebugStrRef(_)
            | AttributeValue::DebugStrOffsetsIndex(_)
            | AttributeValue::DebugLineStrRef(_) => {
                let raw_string = self.dwarf.attr_string(raw, value)?;
                Some(AttrValue::String(raw_string.to_string_lossy()?.into_owned()))
            }
            other => {
                debug!("unsupported attribute form on {:?}: {:?}", die, other);
                None
            }
        };

        Ok(converted)
    }
}

impl DebugInfoProvider for DwarfProvider {
    type Unit = usize;
    type Die = DieRef;

    fn units(&self) -> Vec<usize> {
        (0..self.units.len()).collect()
    }

    fn unit_root(&self, unit: usize) -> Result<Option<DieRef>, BackendError> {
        let raw = self.unit(unit)?;
        let mut cursor = raw.entries();
        Ok(cursor
            .next_dfs()?
            .map(|(_, entry)| DieRef { unit, offset: entry.offset() }))
    }

    fn file_table(&self, unit: usize) -> Result<FileTable, BackendError> {
        build_file_table(&self.dwarf, self.unit(unit)?)
    }

    fn tag(&self, die: DieRef) -> Result<Tag, BackendError> {
        let entry = self.unit(die.unit)?.entry(die.offset)?;
        Ok(tag_from_dwarf(entry.tag()))
    }

    fn first_child(&self, die: DieRef) -> Result<Option<DieRef>, BackendError> {
        let mut cursor = self.unit(die.unit)?.entries_at_offset(die.offset)?;
        match cursor.next_dfs()? {
            Some((_, entry)) if entry.has_children() => {}
            _ => return Ok(None),
        }

        // An empty child list is just a null entry; the next DIE is then a sibling
        Ok(cursor.next_dfs()?.and_then(|(delta, entry)| {
            (delta == 1).then(|| DieRef { unit: die.unit, offset: entry.offset() })
        }))
    }

    fn next_sibling(&self, die: DieRef) -> Result<Option<DieRef>, BackendError> {
        let mut cursor = self.unit(die.unit)?.entries_at_offset(die.offset)?;
        if cursor.next_entry()?.is_none() {
            return Ok(None);
        }

        Ok(cursor
            .next_sibling()?
            .map(|entry| DieRef { unit: die.unit, offset: entry.offset() }))
    }

    fn attr(&self, die: DieRef, kind: AttrKind) -> Result<Option<AttrValue<DieRef>>, BackendError> {
        let raw = self.unit(die.unit)?;
        let entry = raw.entry(die.offset)?;
        match entry.attr_value(attr_to_dwarf(kind))? {
            Some(value) => self.convert(raw, die, value),
            None => Ok(None),
        }
    }
}

/// Parse every unit header of `.debug_info`, then of `.debug_types`
///
/// Enumeration of a section stops at the first header that cannot be read.
fn load_units(dwarf: &gimli::Dwarf<Reader>) -> Vec<Unit<Reader>> {
    let mut units = Vec::new();

    let mut headers = dwarf.units();
    loop {
        match headers.next() {
            Ok(Some(header)) => push_unit(dwarf, header, &mut units),
            Ok(None) => break,
            Err(e) => {
                warn!("stopping at unreadable unit header: {}", e);
                break;
            }
        }
    }

    let mut headers = dwarf.type_units();
    loop {
        match headers.next() {
            Ok(Some(header)) => push_unit(dwarf, header, &mut units),
            Ok(None) => break,
            Err(e) => {
                warn!("stopping at unreadable type unit header: {}", e);
                break;
            }
        }
    }

    units
}

fn push_unit(
    dwarf: &gimli::Dwarf<Reader>,
    header: gimli::UnitHeader<Reader>,
    units: &mut Vec<Unit<Reader>>,
) {
    let offset = header.offset();
    match dwarf.unit(header) {
        Ok(unit) => units.push(unit),
        Err(e) => warn!("skipping unit at {:?}: {}", offset, e),
    }
}

/// Map each type unit's signature to the type DIE it describes
fn index_type_units(units: &[Unit<Reader>]) -> HashMap<DebugTypeSignature, DieRef> {
    let mut signatures = HashMap::new();
    for (unit, raw) in units.iter().enumerate() {
        match raw.header.type_() {
            UnitType::Type {
                type_signature,
                type_offset,
            }
            | UnitType::SplitType {
                type_signature,
                type_offset,
            } => {
                signatures.insert(type_signature, DieRef { unit, offset: type_offset });
            }
            _ => {}
        }
    }
    signatures
}

/// Build a unit's file table from its line program header
fn build_file_table(
    dwarf: &gimli::Dwarf<Reader>,
    unit: &Unit<Reader>,
) -> Result<FileTable, BackendError> {
    let Some(program) = unit.line_program.as_ref() else {
        return Ok(FileTable::default());
    };
    let header = program.header();

    let comp_dir = match unit.comp_dir {
        Some(ref dir) => dir.to_string_lossy()?.into_owned(),
        None => String::new(),
    };

    // Before DWARF 5, directory 0 is the compilation directory and is not listed
    let mut dirs = Vec::new();
    if header.version() < 5 {
        dirs.push(comp_dir.clone());
    }
    for dir in header.include_directories() {
        let dir = dwarf.attr_string(unit, dir.clone())?;
        dirs.push(dir.to_string_lossy()?.into_owned());
    }

    let mut paths = Vec::with_capacity(header.file_names().len());
    for file in header.file_names() {
        let name = dwarf.attr_string(unit, file.path_name())?;
        let name = name.to_string_lossy()?;
        let dir = usize::try_from(file.directory_index())
            .ok()
            .and_then(|index| dirs.get(index))
            .map_or("", String::as_str);
        paths.push(join_path(&comp_dir, dir, &name));
    }

    // DWARF 5 numbers files from 0, earlier versions from 1
    let first_index = if header.version() >= 5 { 0 } else { 1 };
    Ok(FileTable::with_first_index(paths, first_index))
}

/// Join compilation directory, include directory, and file name
fn join_path(comp_dir: &str, dir: &str, name: &str) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }

    let mut path = String::new();
    if !dir.starts_with('/') && dir != comp_dir {
        path.push_str(comp_dir);
    }
    for part in [dir, name] {
        if part.is_empty() {
            continue;
        }
        if !path.is_empty() && !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(part);
    }
    path
}

fn tag_from_dwarf(tag: gimli::DwTag) -> Tag {
    match tag {
        gimli::DW_TAG_compile_unit => Tag::CompileUnit,
        gimli::DW_TAG_partial_unit => Tag::PartialUnit,
        gimli::DW_TAG_type_unit => Tag::TypeUnit,
        gimli::DW_TAG_subprogram => Tag::Subprogram,
        gimli::DW_TAG_formal_parameter => Tag::FormalParameter,
        gimli::DW_TAG_imported_unit => Tag::ImportedUnit,
        gimli::DW_TAG_class_type => Tag::ClassType,
        gimli::DW_TAG_structure_type => Tag::StructureType,
        gimli::DW_TAG_union_type => Tag::UnionType,
        gimli::DW_TAG_enumeration_type => Tag::EnumerationType,
        gimli::DW_TAG_base_type => Tag::BaseType,
        gimli::DW_TAG_pointer_type => Tag::PointerType,
        gimli::DW_TAG_array_type => Tag::ArrayType,
        gimli::DW_TAG_const_type => Tag::ConstType,
        gimli::DW_TAG_volatile_type => Tag::VolatileType,
        gimli::DW_TAG_typedef => Tag::Typedef,
        other => Tag::Other(other.0),
    }
}

fn attr_to_dwarf(kind: AttrKind) -> gimli::DwAt {
    match kind {
        AttrKind::Name => gimli::DW_AT_name,
        AttrKind::LinkageName => gimli::DW_AT_linkage_name,
        AttrKind::MipsLinkageName => gimli::DW_AT_MIPS_linkage_name,
        AttrKind::DeclFile => gimli::DW_AT_decl_file,
        AttrKind::DeclLine => gimli::DW_AT_decl_line,
        AttrKind::Declaration => gimli::DW_AT_declaration,
        AttrKind::Type => gimli::DW_AT_type,
        AttrKind::AbstractOrigin => gimli::DW_AT_abstract_origin,
        AttrKind::Specification => gimli::DW_AT_specification,
        AttrKind::Import => gimli::DW_AT_import,
    }
}
