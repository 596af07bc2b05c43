use wgslx::Config;
use wgslx_ast::{Declaration, FrontEnd, dump_program};
use wgslx_reader::Reader;

/// Sample shaders under `shaders/`.
#[allow(dead_code)]
pub const SHADERS: [&str; 4] = ["triangle", "blur", "lighting", "particles"];

/// Load a sample shader by name (without extension).
#[allow(dead_code)]
pub fn load_shader(name: &str) -> String {
    let path = format!("{}/../../shaders/{name}.wgsl", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to load {path}: {e}"))
}

/// Minify with the given configuration, panicking with context on failure.
#[allow(dead_code)]
pub fn minify(source: &str, config: &Config) -> wgslx::Output {
    wgslx::minify(source, config).unwrap_or_else(|e| panic!("minify failed: {e}\n{source}"))
}

/// Settings under which the reference printout of the output must equal
/// that of the input: nothing is removed or renamed, and every literal
/// and type keeps its spelling.
#[allow(dead_code)]
pub fn faithful_config() -> Config {
    Config {
        rename_identifiers: false,
        remove_unreachable_declarations: false,
        precise_float_literals: true,
        use_short_type_aliases: false,
        keep_literal_suffixes: true,
        ..Config::default()
    }
}

/// Reference printout of a program given as source text.
#[allow(dead_code)]
pub fn reference(source: &str) -> String {
    let resolved = Reader
        .parse(source)
        .unwrap_or_else(|e| panic!("source should resolve: {e}\n{source}"));
    dump_program(&resolved.program)
}

/// Parse and validate WGSL with naga.
#[allow(dead_code)]
pub fn naga_validate(wgsl: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(wgsl).map_err(|e| e.emit_to_string(wgsl))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| e.emit_to_string(wgsl))?;
    Ok(())
}

/// Member offsets of every struct, as placed by the reader.
#[allow(dead_code)]
pub fn member_offsets(wgsl: &str) -> Vec<(String, u32)> {
    let resolved = Reader
        .parse(wgsl)
        .unwrap_or_else(|e| panic!("source should resolve: {e}\n{wgsl}"));
    let program = &resolved.program;
    let mut offsets = Vec::new();
    for decl in &program.declarations {
        if let Declaration::Struct(s) = decl {
            for member in &s.members {
                let layout = resolved.sem.layout(member.id).expect("members have a layout");
                offsets.push((program.name(member.name).to_owned(), layout.offset));
            }
        }
    }
    offsets
}

/// Member offsets of every struct, as placed by naga.
#[allow(dead_code)]
pub fn naga_member_offsets(wgsl: &str) -> Vec<(String, u32)> {
    let module = naga::front::wgsl::parse_str(wgsl)
        .unwrap_or_else(|e| panic!("naga should parse:\n{}", e.emit_to_string(wgsl)));
    let mut offsets = Vec::new();
    for (_, ty) in module.types.iter() {
        if let naga::TypeInner::Struct { members, .. } = &ty.inner {
            for member in members {
                offsets.push((member.name.clone().unwrap_or_default(), member.offset));
            }
        }
    }
    offsets
}
