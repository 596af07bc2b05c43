//! Program transforms for the wgslx WGSL minifier.
//!
//! Provides a [`Pass`] trait and the two minifying passes: dead
//! declaration elimination and identifier renaming. A pass reads a
//! resolved program and builds a new, unresolved one; the caller
//! re-resolves it before running the next pass.

mod dce;
pub mod keywords;
mod rename;

pub use dce::DeadCodeElimination;
pub use rename::{IdentifierRenamer, RenameTable, fresh_name};

use std::fmt::Debug;

use wgslx_ast::{Program, ResolvedProgram};

/// The result of running a [`Pass`].
#[derive(Debug)]
pub struct PassOutput {
    /// The rebuilt program. Not yet resolved.
    pub program: Program,
    /// Entry points renamed by the pass.
    pub remappings: RenameTable,
}

impl PassOutput {
    /// Output of a pass that renames nothing.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            remappings: RenameTable::new(),
        }
    }
}

/// A transform from a resolved program to a new program.
pub trait Pass: Debug {
    /// Human-readable name of the pass.
    fn name(&self) -> &str;

    /// Run the pass. The input is never modified.
    fn run(&self, input: &ResolvedProgram) -> PassOutput;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgslx_ast::FrontEnd;
    use wgslx_reader::Reader;

    #[test]
    fn passes_run_in_sequence() {
        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(DeadCodeElimination::default()),
            Box::new(IdentifierRenamer),
        ];
        let mut resolved = Reader
            .parse("fn unused() {} @compute @workgroup_size(1) fn main() {}")
            .expect("should resolve");
        let mut remappings = RenameTable::new();
        for pass in &passes {
            let output = pass.run(&resolved);
            remappings.extend(output.remappings);
            resolved = Reader.resolve(output.program).expect("pass output should resolve");
        }
        assert_eq!(resolved.program.declarations.len(), 1);
        assert_eq!(remappings.get("main"), Some("a"));
    }

    #[test]
    fn pass_names() {
        assert_eq!(DeadCodeElimination::default().name(), "eliminate-dead-code");
        assert_eq!(IdentifierRenamer.name(), "rename-identifiers");
    }
}
