//! Parameter type classification

use std::fmt;

use log::debug;

use crate::analyzer::{fetch, lookup};
use crate::backend::{AttrKind, DebugInfoProvider, Tag};

/// Whether a type is passed around like a scalar or like an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triviality {
    /// Scalars, pointers, enums, unions, arrays, function types, no type
    Trivial,
    /// A class or struct, possibly behind const/volatile/typedef
    NonTrivial,
}

impl Triviality {
    /// Whether this is [`Triviality::NonTrivial`]
    pub fn is_nontrivial(self) -> bool {
        self == Self::NonTrivial
    }
}

impl fmt::Display for Triviality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::NonTrivial => write!(f, "nontrivial"),
        }
    }
}

/// Classify the type DIE `type_ref`
///
/// Qualifiers and typedefs are looked through, up to `max_depth` of them.
/// Unions are deliberately trivial. A missing or unresolvable type, and a
/// chain longer than `max_depth`, are trivial too.
pub fn classify<P: DebugInfoProvider>(
    provider: &P,
    type_ref: Option<P::Die>,
    max_depth: usize,
) -> Triviality {
    let mut current = type_ref;
    let mut depth = 0;

    while let Some(die) = current {
        let Some(tag) = fetch(provider.tag(die)) else {
            return Triviality::Trivial;
        };

        match tag {
            Tag::ClassType | Tag::StructureType => return Triviality::NonTrivial,
            Tag::ConstType | Tag::VolatileType | Tag::Typedef => {
                if depth == max_depth {
                    debug!(
                        "type chain at {:?} deeper than {}, treating as trivial",
                        type_ref, max_depth
                    );
                    return Triviality::Trivial;
                }
                depth += 1;
                current = lookup(provider.attr_die(die, AttrKind::Type));
            }
            _ => return Triviality::Trivial,
        }
    }

    Triviality::Trivial
}
