mod common;

use wgslx::Config;

const AVERAGE: &str = "fn average(a:f32,b:f32)->f32{return (a+b)/2;}";

#[test]
fn lone_function_is_eliminated() {
    let output = common::minify(AVERAGE, &Config::default());
    assert_eq!(output.wgsl, "");
    assert!(output.remappings.is_empty());
}

#[test]
fn only_entry_points_are_remapped() {
    let source = format!(
        "{AVERAGE}\n@vertex fn vs1()->@builtin(position) vec4f{{return vec4f(average(0,1));}}"
    );
    let output = common::minify(&source, &Config::default());
    let pairs: Vec<(&str, &str)> = output.remappings.iter().collect();
    assert_eq!(pairs.len(), 1);
    let (from, to) = pairs[0];
    assert_eq!(from, "vs1");
    assert_ne!(to, "vs1");
    assert!(output.wgsl.contains(&format!("@vertex fn {to}()")), "{}", output.wgsl);
    assert!(!output.wgsl.contains("average"), "{}", output.wgsl);
    assert_eq!(output.wgsl.matches("fn ").count(), 2, "{}", output.wgsl);
}

#[test]
fn enables_are_merged() {
    let output = common::minify(
        "enable f16, dual_source_blending; enable clip_distances, clip_distances;",
        &Config::default(),
    );
    assert_eq!(output.wgsl, "enable clip_distances,dual_source_blending,f16;");
}

#[test]
fn explicit_offset_becomes_padding() {
    let output = common::minify(
        "struct S { a: f32, @offset(20) b: f32 }",
        &Config::default(),
    );
    assert_eq!(output.wgsl, "struct a{b:f32,@size(16)padding_0:u32,c:f32}");

    // The padded struct keeps the original layout.
    let reread = common::minify(&output.wgsl, &common::faithful_config());
    assert_eq!(reread.wgsl, output.wgsl);
}

#[test]
fn logical_operators_keep_grouping() {
    let source = "
        @compute @workgroup_size(1)
        fn main() {
            var a = true;
            var b = false;
            var c = true;
            let d = a && (b || c);
            let e = (a && b) && c;
        }";
    let config = Config {
        rename_identifiers: false,
        ..Config::default()
    };
    let output = common::minify(source, &config);
    assert_eq!(
        output.wgsl,
        "@compute@workgroup_size(1)fn main(){var a=true;var b=false;var c=true;\
         let d=a&&(b||c);let e=(a&&b)&&c;}"
    );
}

#[test]
fn consts_feeding_attributes_survive() {
    let source = "
        const SIZE = 64u;
        const UNUSED = 1;
        @compute @workgroup_size(SIZE)
        fn main() {}";
    let config = Config {
        rename_identifiers: false,
        ..Config::default()
    };
    let output = common::minify(source, &config);
    assert_eq!(
        output.wgsl,
        "const SIZE=64u;@compute@workgroup_size(SIZE)fn main(){}"
    );
}
