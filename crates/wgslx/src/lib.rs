//! WGSL minifier.
//!
//! Runs the whole pipeline over WGSL source: the front end parses and
//! resolves it, [`wgslx_minify`] passes drop unreachable declarations and
//! shorten identifiers, and [`wgslx_writer`] prints the compact result.
//! The tree is re-resolved after every pass, so each pass sees up to date
//! semantic information.
//!
//! ```
//! let output = wgslx::minify(
//!     "@compute @workgroup_size(1) fn main() { let unused = 1.0; }",
//!     &wgslx::Config::default(),
//! )
//! .unwrap();
//! assert_eq!(output.wgsl, "@compute@workgroup_size(1)fn a(){let b=1.;}");
//! assert_eq!(output.remappings.get("main"), Some("a"));
//! ```

mod error;

pub use error::Error;
pub use wgslx_minify::RenameTable;
pub use wgslx_writer::Options;

use serde::Serialize;
use wgslx_ast::{FrontEnd, ResolvedProgram};
use wgslx_minify::{DeadCodeElimination, IdentifierRenamer, Pass};
use wgslx_reader::Reader;

/// Minifier settings. Every toggle is independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Replace declared names with short generated ones.
    pub rename_identifiers: bool,
    /// Remove declarations no entry point reaches.
    pub remove_unreachable_declarations: bool,
    /// Treat non-entry-point functions as removal candidates.
    pub remove_useless_functions: bool,
    /// Treat module-scope `const` declarations as removal candidates.
    pub remove_useless_consts: bool,
    /// Print floats with every significant digit.
    pub precise_float_literals: bool,
    /// Spell `vec4<f32>` and friends with their predeclared aliases.
    pub use_short_type_aliases: bool,
    /// Keep literal suffixes the context already implies.
    pub keep_literal_suffixes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rename_identifiers: true,
            remove_unreachable_declarations: true,
            remove_useless_functions: true,
            remove_useless_consts: true,
            precise_float_literals: false,
            use_short_type_aliases: true,
            keep_literal_suffixes: false,
        }
    }
}

impl Config {
    /// Printer options for this configuration.
    pub fn writer_options(&self) -> Options {
        Options {
            precise_float: self.precise_float_literals,
            use_type_alias: self.use_short_type_aliases,
            keep_literal_suffix: self.keep_literal_suffixes,
        }
    }

    /// The passes to run, in order.
    pub fn passes(&self) -> Vec<Box<dyn Pass>> {
        let mut passes: Vec<Box<dyn Pass>> = Vec::new();
        if self.remove_unreachable_declarations {
            passes.push(Box::new(DeadCodeElimination {
                functions: self.remove_useless_functions,
                consts: self.remove_useless_consts,
            }));
        }
        if self.rename_identifiers {
            passes.push(Box::new(IdentifierRenamer));
        }
        passes
    }
}

/// Minified source and the entry point renames applied to it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Output {
    pub wgsl: String,
    /// Original to new name of every renamed entry point.
    pub remappings: RenameTable,
}

/// Minifies WGSL source with the wgslx front end.
pub fn minify(source: &str, config: &Config) -> Result<Output, Error> {
    minify_with(&Reader, source, config)
}

/// Minifies WGSL source with the given front end.
pub fn minify_with(
    front_end: &impl FrontEnd,
    source: &str,
    config: &Config,
) -> Result<Output, Error> {
    let resolved = front_end.parse(source)?;
    minify_program(front_end, resolved, config)
}

/// Minifies an already resolved program.
///
/// `front_end` re-resolves the output of every pass. A pass whose output
/// fails to resolve is reported as [`Error::InternalConsistency`].
pub fn minify_program(
    front_end: &impl FrontEnd,
    mut resolved: ResolvedProgram,
    config: &Config,
) -> Result<Output, Error> {
    let mut remappings = RenameTable::new();
    for pass in config.passes() {
        log::debug!("running {}", pass.name());
        let output = pass.run(&resolved);
        remappings.extend(output.remappings);
        resolved = front_end
            .resolve(output.program)
            .map_err(|diagnostics| Error::InternalConsistency {
                stage: pass.name().to_owned(),
                diagnostics,
            })?;
    }
    let wgsl = wgslx_writer::write(&resolved, &config.writer_options());
    Ok(Output { wgsl, remappings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgslx_ast::{Diagnostics, Program};

    const AVERAGE: &str = "fn average(a: f32, b: f32) -> f32 { return (a + b) / 2; }";

    #[test]
    fn unreachable_function_is_removed() {
        let output = minify(AVERAGE, &Config::default()).expect("should minify");
        assert_eq!(output.wgsl, "");
        assert!(output.remappings.is_empty());
    }

    #[test]
    fn entry_point_renames_are_reported() {
        let source = format!(
            "{AVERAGE}
             @vertex fn vs1() -> @builtin(position) vec4f {{ return vec4f(average(0, 1)); }}"
        );
        let output = minify(&source, &Config::default()).expect("should minify");
        assert_eq!(
            output.wgsl,
            "fn a(b:f32,c:f32)->f32{return(b+c)/2;}\
             @vertex fn d()->@builtin(position)vec4f{return vec4f(a(0,1));}"
        );
        assert_eq!(output.remappings.iter().collect::<Vec<_>>(), vec![("vs1", "d")]);
    }

    #[test]
    fn passes_follow_config() {
        let names = |config: Config| -> Vec<String> {
            config
                .passes()
                .iter()
                .map(|pass| pass.name().to_owned())
                .collect()
        };
        assert_eq!(
            names(Config::default()),
            ["eliminate-dead-code", "rename-identifiers"]
        );
        let config = Config {
            remove_unreachable_declarations: false,
            ..Config::default()
        };
        assert_eq!(names(config), ["rename-identifiers"]);
        let config = Config {
            rename_identifiers: false,
            remove_unreachable_declarations: false,
            ..Config::default()
        };
        assert!(names(config).is_empty());
    }

    #[test]
    fn everything_off_only_compacts() {
        let config = Config {
            rename_identifiers: false,
            remove_unreachable_declarations: false,
            use_short_type_aliases: false,
            keep_literal_suffixes: true,
            ..Config::default()
        };
        let output = minify(
            "const unused = vec2<u32>(1u, 2u); fn helper() -> f32 { return 0.5f; }",
            &config,
        )
        .expect("should minify");
        assert_eq!(
            output.wgsl,
            "const unused=vec2<u32>(1u,2u);fn helper()->f32{return .5f;}"
        );
    }

    #[test]
    fn kept_declaration_kinds() {
        let source = "const k = 4; fn helper() {} @compute @workgroup_size(1) fn main() {}";
        let config = Config {
            rename_identifiers: false,
            remove_useless_functions: false,
            ..Config::default()
        };
        let output = minify(source, &config).expect("should minify");
        assert_eq!(output.wgsl, "fn helper(){}@compute@workgroup_size(1)fn main(){}");
    }

    #[test]
    fn parse_errors_are_joined() {
        let err = minify("fn f() { let a = b; let c = d; }", &Config::default())
            .expect_err("should fail");
        match err {
            Error::ParseOrResolve(text) => {
                assert_eq!(text.lines().count(), 2, "{text}");
                assert!(text.contains("unresolved identifier 'b'"), "{text}");
                assert!(text.contains("unresolved identifier 'd'"), "{text}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Front end that rejects every rebuilt program.
    struct Rejecting;

    impl FrontEnd for Rejecting {
        fn parse(&self, source: &str) -> Result<ResolvedProgram, Diagnostics> {
            Reader.parse(source)
        }

        fn resolve(&self, _program: Program) -> Result<ResolvedProgram, Diagnostics> {
            let mut diagnostics = Diagnostics::new();
            diagnostics.error("rejected", None);
            Err(diagnostics)
        }
    }

    #[test]
    fn unresolvable_pass_output_is_internal() {
        let err = minify_with(&Rejecting, AVERAGE, &Config::default()).expect_err("should fail");
        assert!(matches!(
            &err,
            Error::InternalConsistency { stage, .. } if stage == "eliminate-dead-code"
        ));
        assert_eq!(
            err.to_string(),
            "internal compiler error: output of eliminate-dead-code does not resolve\nerror: rejected"
        );
    }

    #[test]
    fn output_serializes_as_object() {
        let output = minify(
            "@fragment fn fs_main() -> @location(0) vec4f { return vec4f(1.0); }",
            &Config::default(),
        )
        .expect("should minify");
        let json = serde_json::to_string(&output).expect("output should serialize");
        assert_eq!(
            json,
            r#"{"wgsl":"@fragment fn a()->@location(0)vec4f{return vec4f(1.);}","remappings":{"fs_main":"a"}}"#
        );
    }
}
