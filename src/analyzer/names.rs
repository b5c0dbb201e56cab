//! Human-readable function names

use crate::analyzer::attributes::integrated_string;
use crate::backend::{AttrKind, DebugInfoProvider};

/// Placeholder printed for entities without a name
pub const NULL_NAME: &str = "(null)";

/// The printable name of a function, or `None` if it has no identity
///
/// A linkage name (integrated) is preferred and demangled with its parameter
/// list; if demangling fails the raw linkage name is used. Otherwise the
/// plain (integrated) name is returned. Callers print [`NULL_NAME`] for
/// `None` where a name is required.
pub fn resolve_name<P: DebugInfoProvider>(
    provider: &P,
    function: P::Die,
    max_depth: usize,
) -> Option<String> {
    for kind in [AttrKind::LinkageName, AttrKind::MipsLinkageName] {
        if let Some(linkage_name) = integrated_string(provider, function, kind, max_depth) {
            return Some(provider.demangle(&linkage_name).unwrap_or(linkage_name));
        }
    }

    integrated_string(provider, function, AttrKind::Name, max_depth)
}
