use nontrivial_param::analyzer::file_table::FileTable;
use nontrivial_param::analyzer::types::{classify, Triviality};
use nontrivial_param::backend::{AttrKind, DieArena, DieId, Tag};
use proptest::prelude::*;

/// Build `qualifiers` wrapped around `leaf`, outermost first; returns the outermost DIE
fn qualified(arena: &mut DieArena, root: DieId, qualifiers: &[u8], leaf: Tag) -> DieId {
    let mut inner = arena.add_child(root, leaf);
    for q in qualifiers.iter().rev() {
        let tag = match q % 3 {
            0 => Tag::ConstType,
            1 => Tag::VolatileType,
            _ => Tag::Typedef,
        };
        let outer = arena.add_child(root, tag);
        arena.set_ref(outer, AttrKind::Type, inner);
        inner = outer;
    }
    inner
}

proptest! {
    // Qualifiers and typedefs never change the classification of what they wrap
    #[test]
    fn qualifier_chains_are_transparent(
        qualifiers in prop::collection::vec(any::<u8>(), 0..32),
        is_struct in any::<bool>(),
    ) {
        let mut arena = DieArena::new();
        let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
        let leaf = if is_struct { Tag::StructureType } else { Tag::PointerType };
        let ty = qualified(&mut arena, root, &qualifiers, leaf);

        let expected = if is_struct { Triviality::NonTrivial } else { Triviality::Trivial };
        prop_assert_eq!(classify(&arena, Some(ty), 64), expected);
    }

    // Chains longer than the bound are classified trivial instead of looping
    #[test]
    fn overlong_chains_are_trivial(extra in 1usize..16) {
        let bound = 8;
        let mut arena = DieArena::new();
        let root = arena.add_unit(Tag::CompileUnit, ["/src/a.c"]);
        let ty = qualified(&mut arena, root, &vec![2u8; bound + extra], Tag::ClassType);

        prop_assert_eq!(classify(&arena, Some(ty), bound), Triviality::Trivial);
    }

    // Every index inside the table resolves, every index outside does not
    #[test]
    fn file_table_resolves_exactly_its_range(
        len in 0usize..16,
        first_index in 0u64..2,
        index in 0u64..32,
    ) {
        let paths: Vec<String> = (0..len).map(|i| format!("/src/f{}.c", i)).collect();
        let files = FileTable::with_first_index(paths, first_index);

        let in_range = index >= first_index && index < first_index + len as u64;
        prop_assert_eq!(files.resolve(index).is_some(), in_range);
        if in_range {
            let expected = format!("/src/f{}.c", index - first_index);
            prop_assert_eq!(files.resolve(index), Some(expected.as_str()));
        }
    }
}
