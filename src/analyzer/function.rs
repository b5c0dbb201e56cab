//! Per-function processing
//!
//! A function is reduced to a [`FunctionRecord`] (declaration file and direct
//! formal parameters), its parameters are classified in declaration order,
//! and every non-trivial one is reported.

use std::io::{self, Write};

use log::trace;

use crate::analyzer::attributes::{integrated_string, integrated_unsigned};
use crate::analyzer::diagnostics::Diagnostics;
use crate::analyzer::file_table::FileTable;
use crate::analyzer::names::{self, NULL_NAME};
use crate::analyzer::types::{self, Triviality};
use crate::analyzer::{fetch, lookup};
use crate::backend::{AttrKind, DebugInfoProvider, Tag};
use crate::config::AnalysisConfig;

/// Everything a function needs from the unit being walked
pub struct UnitScope<'a, P: DebugInfoProvider> {
    /// Backend
    pub provider: &'a P,
    /// Analysis settings
    pub config: &'a AnalysisConfig,
    /// File table of the compile unit being walked
    pub files: &'a FileTable,
}

impl<P: DebugInfoProvider> Clone for UnitScope<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: DebugInfoProvider> Copy for UnitScope<'_, P> {}

/// A formal parameter of a function
#[derive(Debug, Clone)]
pub struct ParameterRecord<D> {
    /// The parameter DIE
    pub die: D,
    /// Parameter name
    pub name: Option<String>,
    /// Declaration file path
    pub decl_file: Option<String>,
    /// Declaration line
    pub decl_line: Option<u64>,
    /// The parameter's type DIE
    pub type_die: Option<D>,
}

impl<D: Copy + Eq + std::fmt::Debug> ParameterRecord<D> {
    /// Read a parameter DIE
    pub fn collect<P: DebugInfoProvider<Die = D>>(scope: UnitScope<'_, P>, die: D) -> Self {
        let depth = scope.config.max_origin_depth;
        let decl_file = integrated_unsigned(scope.provider, die, AttrKind::DeclFile, depth)
            .and_then(|index| scope.files.resolve(index))
            .map(str::to_string);

        Self {
            die,
            name: integrated_string(scope.provider, die, AttrKind::Name, depth),
            decl_file,
            decl_line: integrated_unsigned(scope.provider, die, AttrKind::DeclLine, depth),
            // The parameter's own type only: concrete instances of inlined
            // functions leave it on the abstract DIE, which is reported itself
            type_die: lookup(scope.provider.attr_die(die, AttrKind::Type)),
        }
    }

    /// Classify the parameter's type; computed afresh on every call
    pub fn classify<P>(&self, provider: &P, config: &AnalysisConfig) -> Triviality
    where
        P: DebugInfoProvider<Die = D>,
    {
        types::classify(provider, self.type_die, config.max_type_depth)
    }

    /// Name to print in a note
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NULL_NAME)
    }
}

/// A function that passed the declaration-location filter
#[derive(Debug, Clone)]
pub struct FunctionRecord<D> {
    /// The function DIE
    pub die: D,
    /// Declaration file path
    pub decl_file: String,
    /// Direct formal parameters, in declaration order
    pub parameters: Vec<ParameterRecord<D>>,
}

/// Result of processing one function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionOutcome {
    /// No declaration file, or declared in a system header
    Skipped,
    /// Parameters were examined
    Scanned {
        /// Notes written for this function
        notes: usize,
    },
}

/// Build the record for a function DIE, or `None` if it is filtered out
pub fn collect_function<P: DebugInfoProvider>(
    scope: UnitScope<'_, P>,
    function: P::Die,
) -> Option<FunctionRecord<P::Die>> {
    let depth = scope.config.max_origin_depth;

    let Some(index) = integrated_unsigned(scope.provider, function, AttrKind::DeclFile, depth)
    else {
        trace!("{:?}: no declaration file", function);
        return None;
    };
    let Some(file) = scope.files.resolve(index) else {
        trace!("{:?}: file index {} not in table of {} files", function, index, scope.files.len());
        return None;
    };
    if scope.config.is_system_header(file) {
        trace!("{:?}: declared in system header {}", function, file);
        return None;
    }

    Some(FunctionRecord {
        die: function,
        decl_file: file.to_string(),
        parameters: formal_parameters(scope, function),
    })
}

/// Direct children of `function` tagged as formal parameters
///
/// Nested scopes are not descended into.
pub fn formal_parameters<P: DebugInfoProvider>(
    scope: UnitScope<'_, P>,
    function: P::Die,
) -> Vec<ParameterRecord<P::Die>> {
    let mut parameters = Vec::new();
    let mut child = lookup(scope.provider.first_child(function));
    while let Some(die) = child {
        if fetch(scope.provider.tag(die)) == Some(Tag::FormalParameter) {
            parameters.push(ParameterRecord::collect(scope, die));
        }
        child = lookup(scope.provider.next_sibling(die));
    }
    parameters
}

/// Report the non-trivial parameters of one function
///
/// The function's name is resolved when the first note is due, and the
/// header is written then. A function without any printable identity gets
/// no header at all, but its notes are still written.
pub fn process_function<P: DebugInfoProvider, W: Write>(
    scope: UnitScope<'_, P>,
    function: P::Die,
    out: &mut Diagnostics<W>,
) -> io::Result<FunctionOutcome> {
    let Some(record) = collect_function(scope, function) else {
        return Ok(FunctionOutcome::Skipped);
    };

    let mut header_printed = false;
    let mut notes = 0;
    for parameter in &record.parameters {
        let triviality = parameter.classify(scope.provider, scope.config);
        trace!("{:?}: parameter {} is {}", parameter.die, parameter.display_name(), triviality);
        if !triviality.is_nontrivial() {
            continue;
        }

        if !header_printed {
            let depth = scope.config.max_origin_depth;
            if let Some(name) = names::resolve_name(scope.provider, record.die, depth) {
                out.function_header(&record.decl_file, &name)?;
            }
            header_printed = true;
        }

        out.parameter_note(
            parameter.decl_file.as_deref(),
            parameter.decl_line,
            parameter.name.as_deref(),
        )?;
        notes += 1;
    }

    Ok(FunctionOutcome::Scanned { notes })
}
