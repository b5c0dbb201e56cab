//! Depth-first walk over a unit's DIE tree

use std::collections::HashSet;
use std::io::{self, Write};

use log::debug;

use crate::analyzer::diagnostics::Diagnostics;
use crate::analyzer::function::{process_function, FunctionOutcome, UnitScope};
use crate::analyzer::{fetch, lookup, AnalysisSummary};
use crate::backend::{AttrKind, DebugInfoProvider, Tag};

/// Pre-order walker that hands every function definition to the processor
pub struct FunctionWalker<'a, P: DebugInfoProvider, W: Write> {
    /// Unit being walked
    scope: UnitScope<'a, P>,
    /// Diagnostic stream
    out: &'a mut Diagnostics<W>,
    /// Running totals
    summary: &'a mut AnalysisSummary,
    /// Imported DIEs already entered while walking this unit
    imported: HashSet<P::Die>,
    /// Imports currently being walked
    import_depth: usize,
}

impl<'a, P: DebugInfoProvider, W: Write> FunctionWalker<'a, P, W> {
    /// Create a walker for one compile unit
    pub fn new(
        scope: UnitScope<'a, P>,
        out: &'a mut Diagnostics<W>,
        summary: &'a mut AnalysisSummary,
    ) -> Self {
        Self {
            scope,
            out,
            summary,
            imported: HashSet::new(),
            import_depth: 0,
        }
    }

    /// Walk the subtree rooted at `die`
    ///
    /// Subprograms that are not mere declarations are processed. Imported
    /// units are walked in place, before the importing DIE's own children,
    /// and each imported DIE at most once per compile unit.
    pub fn walk(&mut self, die: P::Die) -> io::Result<()> {
        let provider = self.scope.provider;
        let tag = fetch(provider.tag(die));

        if tag == Some(Tag::Subprogram) && !self.is_declaration(die) {
            match process_function(self.scope, die, self.out)? {
                FunctionOutcome::Skipped => self.summary.skipped_functions += 1,
                FunctionOutcome::Scanned { notes } => {
                    self.summary.functions += 1;
                    self.summary.notes += notes;
                }
            }
        }

        if tag == Some(Tag::ImportedUnit) {
            self.walk_import(die)?;
        }

        let mut child = lookup(provider.first_child(die));
        while let Some(current) = child {
            self.walk(current)?;
            child = lookup(provider.next_sibling(current));
        }

        Ok(())
    }

    fn is_declaration(&self, die: P::Die) -> bool {
        fetch(self.scope.provider.has_attr(die, AttrKind::Declaration)).unwrap_or(false)
    }

    fn walk_import(&mut self, die: P::Die) -> io::Result<()> {
        let Some(target) = lookup(self.scope.provider.attr_die(die, AttrKind::Import)) else {
            debug!("{:?}: unresolved import", die);
            return Ok(());
        };
        let max_depth = self.scope.config.max_import_depth;
        if self.import_depth >= max_depth {
            debug!("{:?}: imports nested deeper than {}", die, max_depth);
            return Ok(());
        }
        // Covers both import cycles and the same unit imported twice
        if !self.imported.insert(target) {
            debug!("{:?}: {:?} already imported into this unit", die, target);
            return Ok(());
        }

        self.import_depth += 1;
        let result = self.walk(target);
        self.import_depth -= 1;
        result
    }
}
