use nontrivial_param::backend::{AttrKind, DieArena, DieId, Tag};
use nontrivial_param::{analyze, AnalysisConfig};

use crate::test_helpers::diagnostics_of;

fn struct_param_function(
    arena: &mut DieArena,
    parent: DieId,
    ty: DieId,
    name: &str,
    line: u64,
) -> DieId {
    let f = arena.add_child(parent, Tag::Subprogram);
    arena
        .set_str(f, AttrKind::Name, name)
        .set_udata(f, AttrKind::DeclFile, 1)
        .set_udata(f, AttrKind::DeclLine, line);
    let p = arena.add_child(f, Tag::FormalParameter);
    arena
        .set_str(p, AttrKind::Name, "s")
        .set_udata(p, AttrKind::DeclFile, 1)
        .set_udata(p, AttrKind::DeclLine, line)
        .set_ref(p, AttrKind::Type, ty);
    f
}

#[test]
fn test_functions_nested_in_scopes_are_found() {
    let mut arena = DieArena::new();
    let root = arena.add_unit(Tag::CompileUnit, ["/src/a.cc"]);
    let ty = arena.add_child(root, Tag::StructureType);
    let namespace = arena.add_child(root, Tag::Other(0x39));
    struct_param_function(&mut arena, namespace, ty, "outer", 1);
    let class = arena.add_child(namespace, Tag::ClassType);
    struct_param_function(&mut arena, class, ty, "method", 2);

    assert_eq!(
        diagnostics_of(&arena),
        "/src/a.cc: In function 'outer':\n\
         /src/a.cc:1: note: parameter 's' type is not trivial\n\
         /src/a.cc: In function 'method':\n\
         /src/a.cc:2: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_declarations_are_not_processed() {
    let mut arena = DieArena::new();
    let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
    let ty = arena.add_child(root, Tag::StructureType);
    let decl = struct_param_function(&mut arena, root, ty, "extern_fn", 1);
    arena.set_flag(decl, AttrKind::Declaration);

    assert_eq!(diagnostics_of(&arena), "");
}

#[test]
fn test_partial_units_are_only_walked_through_imports() {
    let mut arena = DieArena::new();
    let partial = arena.add_unit(Tag::PartialUnit, ["/ignored.c"]);
    let ty = arena.add_child(partial, Tag::StructureType);
    struct_param_function(&mut arena, partial, ty, "shared", 3);

    // Nothing imports the partial unit yet
    assert_eq!(diagnostics_of(&arena), "");

    let root = arena.add_unit(Tag::CompileUnit, ["/src/main.c"]);
    let import = arena.add_child(root, Tag::ImportedUnit);
    arena.set_ref(import, AttrKind::Import, partial);
    struct_param_function(&mut arena, root, ty, "local", 9);

    // Imported DIEs resolve file indices against the importing unit's table
    assert_eq!(
        diagnostics_of(&arena),
        "/src/main.c: In function 'shared':\n\
         /src/main.c:3: note: parameter 's' type is not trivial\n\
         /src/main.c: In function 'local':\n\
         /src/main.c:9: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_import_cycle_terminates() {
    let mut arena = DieArena::new();
    let first = arena.add_unit(Tag::PartialUnit, Vec::<String>::new());
    let second = arena.add_unit(Tag::PartialUnit, Vec::<String>::new());
    let ty = arena.add_child(first, Tag::StructureType);
    struct_param_function(&mut arena, first, ty, "looped", 1);

    let to_second = arena.add_child(first, Tag::ImportedUnit);
    arena.set_ref(to_second, AttrKind::Import, second);
    let to_first = arena.add_child(second, Tag::ImportedUnit);
    arena.set_ref(to_first, AttrKind::Import, first);

    let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
    let import = arena.add_child(root, Tag::ImportedUnit);
    arena.set_ref(import, AttrKind::Import, first);

    let mut out = Vec::new();
    let summary = analyze(&arena, &AnalysisConfig::default(), &mut out).unwrap();
    assert_eq!(summary.units, 1);
    assert_eq!(summary.notes, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "/src/a.c: In function 'looped':\n\
         /src/a.c:1: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_unit_imported_twice_is_walked_once() {
    let mut arena = DieArena::new();
    let shared = arena.add_unit(Tag::PartialUnit, Vec::<String>::new());
    let ty = arena.add_child(shared, Tag::StructureType);
    struct_param_function(&mut arena, shared, ty, "common", 2);

    // Two paths into the same unit
    let left = arena.add_unit(Tag::PartialUnit, Vec::<String>::new());
    let right = arena.add_unit(Tag::PartialUnit, Vec::<String>::new());
    for side in [left, right] {
        let import = arena.add_child(side, Tag::ImportedUnit);
        arena.set_ref(import, AttrKind::Import, shared);
    }

    let root = arena.add_unit(Tag::CompileUnit, ["/src/d.c"]);
    for side in [left, right] {
        let import = arena.add_child(root, Tag::ImportedUnit);
        arena.set_ref(import, AttrKind::Import, side);
    }

    assert_eq!(
        diagnostics_of(&arena),
        "/src/d.c: In function 'common':\n\
         /src/d.c:2: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_densely_cross_importing_units_are_walked_once_each() {
    let mut arena = DieArena::new();
    let units: Vec<DieId> = (0..12)
        .map(|_| arena.add_unit(Tag::PartialUnit, Vec::<String>::new()))
        .collect();
    let ty = arena.add_child(units[0], Tag::StructureType);
    struct_param_function(&mut arena, units[0], ty, "hub", 1);

    for &from in &units {
        for &to in &units {
            if from != to {
                let import = arena.add_child(from, Tag::ImportedUnit);
                arena.set_ref(import, AttrKind::Import, to);
            }
        }
    }

    let root = arena.add_unit(Tag::CompileUnit, ["/src/mesh.c"]);
    let import = arena.add_child(root, Tag::ImportedUnit);
    arena.set_ref(import, AttrKind::Import, units[0]);

    let mut out = Vec::new();
    let config = AnalysisConfig::default();
    let summary = analyze(&arena, &config, &mut out).unwrap();
    assert_eq!(summary.functions, 1);
    assert_eq!(summary.notes, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "/src/mesh.c: In function 'hub':\n\
         /src/mesh.c:1: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_unresolved_import_is_ignored() {
    let mut arena = DieArena::new();
    let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
    let ty = arena.add_child(root, Tag::StructureType);
    arena.add_child(root, Tag::ImportedUnit);
    struct_param_function(&mut arena, root, ty, "after", 4);

    assert_eq!(
        diagnostics_of(&arena),
        "/src/a.c: In function 'after':\n\
         /src/a.c:4: note: parameter 's' type is not trivial\n"
    );
}

#[test]
fn test_nameless_function_prints_notes_without_header() {
    let mut arena = DieArena::new();
    let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
    let ty = arena.add_child(root, Tag::StructureType);
    let f = arena.add_child(root, Tag::Subprogram);
    arena.set_udata(f, AttrKind::DeclFile, 1);
    let p = arena.add_child(f, Tag::FormalParameter);
    arena
        .set_str(p, AttrKind::Name, "s")
        .set_udata(p, AttrKind::DeclFile, 1)
        .set_udata(p, AttrKind::DeclLine, 6)
        .set_ref(p, AttrKind::Type, ty);

    assert_eq!(diagnostics_of(&arena), "/src/a.c:6: note: parameter 's' type is not trivial\n");
}

#[test]
fn test_every_unit_uses_its_own_file_table() {
    let mut arena = DieArena::new();
    let first = arena.add_unit(Tag::CompileUnit, ["/src/one.c"]);
    let ty = arena.add_child(first, Tag::StructureType);
    struct_param_function(&mut arena, first, ty, "one", 1);
    let second = arena.add_unit(Tag::CompileUnit, ["/src/two.c"]);
    struct_param_function(&mut arena, second, ty, "two", 2);

    assert_eq!(
        diagnostics_of(&arena),
        "/src/one.c: In function 'one':\n\
         /src/one.c:1: note: parameter 's' type is not trivial\n\
         /src/two.c: In function 'two':\n\
         /src/two.c:2: note: parameter 's' type is not trivial\n"
    );
}
