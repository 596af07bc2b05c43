//! Dead declaration elimination pass.
//!
//! Removes module-scope functions and constants that no entry point
//! reaches, directly or through other declarations.

use std::collections::{HashMap, HashSet};

use wgslx_ast::visit::{IdentSite, Visitor, walk_ident};
use wgslx_ast::{Declaration, Ident, Program, ResolvedProgram, Symbol};

use crate::{Pass, PassOutput};

/// Removes unreachable functions and constants.
///
/// Only declarations selected by `functions` and `consts` are removal
/// candidates. Everything else (entry points, structs, aliases,
/// variables, overrides, const assertions) is kept and acts as a root.
#[derive(Clone, Copy, Debug)]
pub struct DeadCodeElimination {
    /// Remove unreachable non-entry-point functions.
    pub functions: bool,
    /// Remove unreachable module-scope `const` declarations.
    pub consts: bool,
}

impl Default for DeadCodeElimination {
    fn default() -> Self {
        Self {
            functions: true,
            consts: true,
        }
    }
}

impl Pass for DeadCodeElimination {
    fn name(&self) -> &str {
        "eliminate-dead-code"
    }

    fn run(&self, input: &ResolvedProgram) -> PassOutput {
        let program = &input.program;
        let live = self.live_declarations(program);

        let declarations: Vec<Declaration> = program
            .declarations
            .iter()
            .zip(&live)
            .filter(|(_, live)| **live)
            .map(|(decl, _)| decl.clone())
            .collect();
        log::debug!(
            "{}: removed {} of {} declarations",
            self.name(),
            program.declarations.len() - declarations.len(),
            program.declarations.len()
        );

        PassOutput::new(Program {
            symbols: program.symbols.clone(),
            directives: program.directives.clone(),
            declarations,
        })
    }
}

impl DeadCodeElimination {
    fn is_candidate(&self, decl: &Declaration) -> bool {
        match decl {
            Declaration::Function(func) => self.functions && !func.is_entry_point(),
            Declaration::Variable(var) => self.consts && var.is_const(),
            _ => false,
        }
    }

    /// Marks every declaration reachable from a root.
    fn live_declarations(&self, program: &Program) -> Vec<bool> {
        let decls = &program.declarations;

        // Graph nodes: the removal candidates, by name.
        let candidates: HashMap<Symbol, usize> = decls
            .iter()
            .enumerate()
            .filter(|(_, decl)| self.is_candidate(decl))
            .filter_map(|(index, decl)| Some((decl.name()?, index)))
            .collect();

        if !candidates.is_empty() && program.entry_points().next().is_none() {
            log::warn!("program has no entry point; every function and const is unreachable");
        }

        let mut live = vec![false; decls.len()];
        let mut worklist = Vec::new();
        for (index, decl) in decls.iter().enumerate() {
            if !self.is_candidate(decl) {
                live[index] = true;
                worklist.push(index);
            }
        }

        while let Some(index) = worklist.pop() {
            for symbol in references(&decls[index]) {
                if let Some(&target) = candidates.get(&symbol) {
                    if !live[target] {
                        live[target] = true;
                        worklist.push(target);
                    }
                }
            }
        }
        live
    }
}

/// Collects every symbol a declaration refers to.
#[derive(Default)]
struct References {
    symbols: HashSet<Symbol>,
}

impl Visitor for References {
    fn visit_ident(&mut self, ident: &Ident, _site: IdentSite) {
        self.symbols.insert(ident.symbol);
        walk_ident(self, ident);
    }
}

fn references(decl: &Declaration) -> HashSet<Symbol> {
    let mut refs = References::default();
    refs.visit_declaration(decl);
    refs.symbols
}
