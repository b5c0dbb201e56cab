//! Itanium C++ symbol demangling shared by all backends

use cpp_demangle::{DemangleOptions, Symbol};
use log::trace;

/// Demangle `linkage_name`, rendering the parameter list (`foo(int)`)
///
/// Returns `None` when the name is not a valid Itanium mangling.
pub fn demangle(linkage_name: &str) -> Option<String> {
    let symbol = match Symbol::new(linkage_name) {
        Ok(symbol) => symbol,
        Err(e) => {
            trace!("not demangling {}: {}", linkage_name, e);
            return None;
        }
    };

    symbol.demangle(&DemangleOptions::new()).ok()
}
