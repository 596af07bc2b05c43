//! WGSL front end for wgslx.
//!
//! Turns source text into a [`Program`] (lexing, template-list discovery,
//! recursive-descent parsing) and resolves it into a [`ResolvedProgram`]
//! carrying the semantic annotations the minifier relies on.

mod builtins;
mod layout;
mod lexer;
mod parser;
mod resolve;
mod template;
mod token;

use wgslx_ast::{Diagnostics, FrontEnd, Program, ResolvedProgram};

pub use lexer::tokenize;
pub use resolve::resolve;
pub use token::{Token, TokenKind, is_keyword};

/// Parse WGSL source into an unresolved [`Program`].
pub fn parse(source: &str) -> Result<Program, Diagnostics> {
    let mut tokens = lexer::tokenize(source)?;
    template::discover_templates(&mut tokens);
    log::debug!("lexed {} tokens", tokens.len());
    let program = parser::Parser::new(tokens).parse_program()?;
    log::debug!(
        "parsed {} declarations, {} symbols",
        program.declarations.len(),
        program.symbols.len()
    );
    Ok(program)
}

/// The wgslx WGSL front end.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reader;

impl FrontEnd for Reader {
    fn parse(&self, source: &str) -> Result<ResolvedProgram, Diagnostics> {
        resolve(parse(source)?)
    }

    fn resolve(&self, program: Program) -> Result<ResolvedProgram, Diagnostics> {
        resolve(program)
    }
}
