//! Attribute lookup through `abstract_origin` / `specification` chains
//!
//! Out-of-line definitions and inlined instances usually carry their name and
//! declaration position only on the DIE they were created from. Integration
//! follows those links until the attribute turns up.

use log::debug;

use crate::analyzer::lookup;
use crate::backend::{AttrKind, AttrValue, DebugInfoProvider};

/// Look up `kind` on `die`, falling back along its origin chain
///
/// `abstract_origin` is preferred over `specification` at each link. At most
/// `max_depth` links are followed, so a cyclic chain ends as a miss.
pub fn resolve_integrated<P: DebugInfoProvider>(
    provider: &P,
    die: P::Die,
    kind: AttrKind,
    max_depth: usize,
) -> Option<AttrValue<P::Die>> {
    let mut current = die;
    for _ in 0..=max_depth {
        if let Some(value) = lookup(provider.attr(current, kind)) {
            return Some(value);
        }

        let origin = lookup(provider.attr_die(current, AttrKind::AbstractOrigin))
            .or_else(|| lookup(provider.attr_die(current, AttrKind::Specification)));
        match origin {
            Some(next) => current = next,
            None => return None,
        }
    }

    debug!("origin chain of {:?} longer than {} links while looking up {:?}", die, max_depth, kind);
    None
}

/// Integrated lookup of a string attribute
pub fn integrated_string<P: DebugInfoProvider>(
    provider: &P,
    die: P::Die,
    kind: AttrKind,
    max_depth: usize,
) -> Option<String> {
    resolve_integrated(provider, die, kind, max_depth).and_then(AttrValue::into_string)
}

/// Integrated lookup of an unsigned attribute
pub fn integrated_unsigned<P: DebugInfoProvider>(
    provider: &P,
    die: P::Die,
    kind: AttrKind,
    max_depth: usize,
) -> Option<u64> {
    resolve_integrated(provider, die, kind, max_depth).and_then(|value| value.as_unsigned())
}
