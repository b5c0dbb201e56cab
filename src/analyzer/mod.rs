//! Backend-agnostic analysis of function parameter types
//!
//! [`analyze`] walks every compile unit a [`DebugInfoProvider`] exposes and
//! writes a note for each function parameter whose type is a class or struct
//! (possibly const/volatile-qualified or behind typedefs).

pub mod attributes;
pub mod diagnostics;
pub mod file_table;
pub mod function;
pub mod names;
pub mod types;
pub mod walker;

use std::fmt;
use std::io::Write;

use log::{debug, info, trace};

use crate::backend::{DebugInfoProvider, Tag};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, BackendError};

use diagnostics::Diagnostics;
use function::UnitScope;
use walker::FunctionWalker;

/// Totals for one analysis run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Compile units walked
    pub units: usize,
    /// Functions whose parameters were examined
    pub functions: usize,
    /// Functions skipped for lack of a file or for being in a system header
    pub skipped_functions: usize,
    /// Parameter notes written
    pub notes: usize,
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} units, {} functions ({} skipped), {} non-trivial parameters",
            self.units, self.functions, self.skipped_functions, self.notes
        )
    }
}

/// Run the analysis, writing diagnostics to `out`
///
/// Only units rooted at a compile unit DIE are walked; partial units are
/// reached through imports. Malformed debug info never fails the run; only
/// a write error on `out` does.
pub fn analyze<P, W>(
    provider: &P,
    config: &AnalysisConfig,
    out: W,
) -> Result<AnalysisSummary, AnalysisError>
where
    P: DebugInfoProvider,
    W: Write,
{
    let mut diagnostics = Diagnostics::new(out);
    let mut summary = AnalysisSummary::default();

    for unit in provider.units() {
        let Some(root) = lookup(provider.unit_root(unit)) else {
            continue;
        };
        match fetch(provider.tag(root)) {
            Some(Tag::CompileUnit) => {}
            other => {
                trace!("{:?}: not a compile unit ({:?})", unit, other);
                continue;
            }
        }

        // Lives exactly as long as this unit's walk
        let files = fetch(provider.file_table(unit)).unwrap_or_default();
        let scope = UnitScope {
            provider,
            config,
            files: &files,
        };
        FunctionWalker::new(scope, &mut diagnostics, &mut summary).walk(root)?;
        summary.units += 1;
    }

    diagnostics.flush()?;
    info!("analysis done: {}", summary);
    Ok(summary)
}

/// Collapse a backend lookup into an option, logging backend errors
pub(crate) fn lookup<T>(result: Result<Option<T>, BackendError>) -> Option<T> {
    fetch(result).flatten()
}

/// Downgrade a backend error to a miss
pub(crate) fn fetch<T>(result: Result<T, BackendError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("lookup failed: {}", e);
            None
        }
    }
}
