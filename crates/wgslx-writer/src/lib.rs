//! Compact WGSL code generator.
//!
//! [`write`] prints a resolved program as the shortest WGSL text that
//! reads back to the same program: no redundant whitespace, only the
//! parentheses the grammar needs, merged `enable` and `requires`
//! directives, and shortened numeric literals and type spellings.

mod aliases;
mod literals;
mod precedence;
mod printer;

pub use precedence::{OperatorGroup, Position, requires_parens};

use wgslx_ast::ResolvedProgram;

/// Printer options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Print floats with every significant digit instead of rounding to
    /// six fractional digits.
    pub precise_float: bool,
    /// Spell `vec4<f32>` and friends with their predeclared aliases.
    pub use_type_alias: bool,
    /// Keep every literal suffix, even where the context implies it.
    pub keep_literal_suffix: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precise_float: false,
            use_type_alias: true,
            keep_literal_suffix: false,
        }
    }
}

/// Prints a resolved program as compact WGSL.
pub fn write(resolved: &ResolvedProgram, options: &Options) -> String {
    let wgsl = printer::Printer::new(resolved, options).print();
    log::debug!("wrote {} bytes of WGSL", wgsl.len());
    wgsl
}
