mod common;

use wgslx::Config;
use wgslx_ast::{FrontEnd, dump_program};
use wgslx_minify::{DeadCodeElimination, IdentifierRenamer, Pass};
use wgslx_reader::Reader;

#[test]
fn faithful_output_reads_back_identically() {
    for name in common::SHADERS {
        let source = common::load_shader(name);
        let output = common::minify(&source, &common::faithful_config());
        assert_eq!(
            common::reference(&output.wgsl),
            common::reference(&source),
            "{name}: {}",
            output.wgsl
        );
    }
}

#[test]
fn renamed_output_reads_back_identically() {
    // Same passes as the pipeline, printed with the reference printer.
    let passes: [&dyn Pass; 2] = [&DeadCodeElimination::default(), &IdentifierRenamer];
    let config = Config {
        precise_float_literals: true,
        use_short_type_aliases: false,
        keep_literal_suffixes: true,
        ..Config::default()
    };
    for name in common::SHADERS {
        let source = common::load_shader(name);
        let mut resolved = Reader.parse(&source).expect("shader should resolve");
        for pass in passes {
            resolved = Reader
                .resolve(pass.run(&resolved).program)
                .expect("pass output should resolve");
        }
        let output = common::minify(&source, &config);
        assert_eq!(
            common::reference(&output.wgsl),
            dump_program(&resolved.program),
            "{name}: {}",
            output.wgsl
        );
    }
}

#[test]
fn dropped_suffixes_keep_types() {
    let source = "
        fn f(x: u32, v: vec2<f32>) -> u32 {
            var y: u32 = 1u;
            y = y + 2u;
            let w = v * 0.5f + vec2<f32>(1.0f, 2.0f)[1u];
            return x << 3u;
        }";
    let config = Config {
        rename_identifiers: false,
        remove_unreachable_declarations: false,
        ..Config::default()
    };
    let output = common::minify(source, &config);
    assert_eq!(
        output.wgsl,
        "fn f(x:u32,v:vec2f)->u32{var y:u32=1;y=y+2;let w=v*.5+vec2f(1.,2.)[1];return x<<3;}"
    );
    common::naga_validate(&output.wgsl).expect("naga should accept the output");
}

#[test]
fn inferred_pointers_read_back_identically() {
    let sources = [
        "fn f() { var a = 4; let p = &a; *p = 5; }",
        "struct S { v: f32 } fn f() -> f32 { var s = S(1.0); let p = &s; let x = (*p).v; return x + p.v; }",
    ];
    for source in sources {
        let output = common::minify(source, &common::faithful_config());
        assert_eq!(
            common::reference(&output.wgsl),
            common::reference(source),
            "{}",
            output.wgsl
        );
    }
    let output = common::minify(sources[0], &common::faithful_config());
    assert_eq!(output.wgsl, "fn f(){var a=4;let p=&a;*p=5;}");
}

#[test]
fn precise_floats_read_back_exactly() {
    let source = "const a = 0.1f; const b = 3.4028234e38f;
                  const c = 1e-7; const d = 6.02214076e23;";
    let config = common::faithful_config();
    let output = common::minify(source, &config);
    assert_eq!(common::reference(&output.wgsl), common::reference(source));
}
