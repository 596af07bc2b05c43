use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{Context, IntoDiagnostic};

use wgslx::Config;

/// wgslx: WGSL minifier
///
/// Prints `{"wgsl": ..., "remappings": {...}}` to stdout, where
/// `remappings` maps each renamed entry point to its new name.
#[derive(Parser, Debug)]
#[command(name = "wgslx", version, about)]
struct Cli {
    /// Input WGSL file
    input: PathBuf,

    /// Keep declared names
    #[arg(long)]
    no_rename: bool,

    /// Keep declarations no entry point reaches
    #[arg(long)]
    keep_dead_code: bool,

    /// Never remove unreachable functions
    #[arg(long)]
    keep_functions: bool,

    /// Never remove unreachable module-scope constants
    #[arg(long)]
    keep_consts: bool,

    /// Print floats with every significant digit
    #[arg(long)]
    precise_floats: bool,

    /// Keep template spellings such as vec4<f32>
    #[arg(long)]
    no_short_types: bool,

    /// Keep literal suffixes the context already implies
    #[arg(long)]
    keep_suffixes: bool,

    /// Check the output with naga before printing it
    #[arg(long)]
    validate: bool,

    /// Log pass progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            rename_identifiers: !self.no_rename,
            remove_unreachable_declarations: !self.keep_dead_code,
            remove_useless_functions: !self.keep_functions,
            remove_useless_consts: !self.keep_consts,
            precise_float_literals: self.precise_floats,
            use_short_type_aliases: !self.no_short_types,
            keep_literal_suffixes: self.keep_suffixes,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        // Prefix match: covers every wgslx_* crate.
        .filter_module("wgslx", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> miette::Result<()> {
    let source = std::fs::read_to_string(&cli.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.input.display()))?;

    let output = wgslx::minify(&source, &cli.config())
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err_with(|| format!("failed to minify {}", cli.input.display()))?;
    log::debug!(
        "{}: {} -> {} bytes",
        cli.input.display(),
        source.len(),
        output.wgsl.len()
    );

    if cli.validate {
        validate(&output.wgsl).wrap_err("minified output failed validation")?;
    }

    let json = serde_json::to_string(&output).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Parses and validates WGSL with naga.
fn validate(wgsl: &str) -> miette::Result<()> {
    let module = naga::front::wgsl::parse_str(wgsl)
        .map_err(|e| miette::miette!("{}", e.emit_to_string(wgsl)))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| miette::miette!("{}", e.emit_to_string(wgsl)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wgslx").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_library_defaults() {
        let cli = parse(&["shader.wgsl"]);
        assert_eq!(cli.input, PathBuf::from("shader.wgsl"));
        assert_eq!(cli.config(), Config::default());
        assert!(!cli.validate);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse(&[
            "--no-rename",
            "--keep-dead-code",
            "--keep-functions",
            "--keep-consts",
            "--precise-floats",
            "--no-short-types",
            "--keep-suffixes",
            "-v",
            "shader.wgsl",
        ]);
        assert!(cli.verbose);
        assert_eq!(
            cli.config(),
            Config {
                rename_identifiers: false,
                remove_unreachable_declarations: false,
                remove_useless_functions: false,
                remove_useless_consts: false,
                precise_float_literals: true,
                use_short_type_aliases: false,
                keep_literal_suffixes: true,
            }
        );
    }

    #[test]
    fn input_is_required_and_single() {
        let none = Cli::try_parse_from(["wgslx"]).expect_err("missing input");
        assert!(none.use_stderr());
        let two = Cli::try_parse_from(["wgslx", "a.wgsl", "b.wgsl"]).expect_err("two inputs");
        assert!(two.use_stderr());
        let help = Cli::try_parse_from(["wgslx", "--help"]).expect_err("help exits early");
        assert!(!help.use_stderr());
    }

    #[test]
    fn naga_accepts_minified_output() {
        let output = wgslx::minify(
            "@fragment fn main(@location(0) x: f32) -> @location(0) vec4<f32> {
               return vec4<f32>(x, 0.5, 0.25, 1.0);
             }",
            &Config::default(),
        )
        .expect("should minify");
        validate(&output.wgsl).expect("naga should accept the output");
        assert!(validate("fn f() -> i32 { return 1.5; }").is_err());
    }
}
