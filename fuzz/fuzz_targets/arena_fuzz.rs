#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nontrivial_param::backend::{AttrKind, DieArena, DieId, Tag};
use nontrivial_param::{analyze, AnalysisConfig};

/// One step of building a DIE tree
#[derive(Arbitrary, Debug)]
enum Op {
    Unit { partial: bool },
    Child { parent: u8, tag: u8 },
    Reference { die: u8, kind: u8, target: u8 },
    Number { die: u8, kind: u8, value: u8 },
    Declaration { die: u8 },
}

fn tag(raw: u8) -> Tag {
    match raw % 10 {
        0 => Tag::Subprogram,
        1 => Tag::FormalParameter,
        2 => Tag::ImportedUnit,
        3 => Tag::ClassType,
        4 => Tag::StructureType,
        5 => Tag::UnionType,
        6 => Tag::ConstType,
        7 => Tag::Typedef,
        8 => Tag::PointerType,
        _ => Tag::Other(u16::from(raw)),
    }
}

fn reference_kind(raw: u8) -> AttrKind {
    match raw % 4 {
        0 => AttrKind::Type,
        1 => AttrKind::AbstractOrigin,
        2 => AttrKind::Specification,
        _ => AttrKind::Import,
    }
}

fuzz_target!(|ops: Vec<Op>| {
    // Arbitrary graphs, cycles included, must terminate
    let mut arena = DieArena::new();
    let mut dies: Vec<DieId> = Vec::new();
    let pick = |dies: &[DieId], raw: u8| {
        (!dies.is_empty()).then(|| dies[usize::from(raw) % dies.len()])
    };

    for op in ops {
        match op {
            Op::Unit { partial } => {
                let tag = if partial { Tag::PartialUnit } else { Tag::CompileUnit };
                dies.push(arena.add_unit(tag, ["/src/a.c", "/usr/include/b.h"]));
            }
            Op::Child { parent, tag: raw } => {
                if let Some(parent) = pick(&dies, parent) {
                    dies.push(arena.add_child(parent, tag(raw)));
                }
            }
            Op::Reference { die, kind, target } => {
                if let (Some(die), Some(target)) = (pick(&dies, die), pick(&dies, target)) {
                    arena.set_ref(die, reference_kind(kind), target);
                }
            }
            Op::Number { die, kind, value } => {
                if let Some(die) = pick(&dies, die) {
                    let kind = if kind % 2 == 0 { AttrKind::DeclFile } else { AttrKind::DeclLine };
                    arena.set_udata(die, kind, u64::from(value));
                }
            }
            Op::Declaration { die } => {
                if let Some(die) = pick(&dies, die) {
                    arena.set_flag(die, AttrKind::Declaration);
                }
            }
        }
    }

    let _ = analyze(&arena, &AnalysisConfig::default(), std::io::sink());
});
