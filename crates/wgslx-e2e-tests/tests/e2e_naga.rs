mod common;

use wgslx::Config;

fn configs() -> [Config; 3] {
    [
        Config::default(),
        common::faithful_config(),
        Config {
            precise_float_literals: true,
            ..Config::default()
        },
    ]
}

#[test]
fn minified_shaders_validate() {
    for name in common::SHADERS {
        let source = common::load_shader(name);
        // Only meaningful for shaders naga accepts in the first place.
        if let Err(err) = common::naga_validate(&source) {
            eprintln!("skipping {name}: naga rejects the source\n{err}");
            continue;
        }
        for config in configs() {
            let output = common::minify(&source, &config);
            if let Err(err) = common::naga_validate(&output.wgsl) {
                panic!("{name} with {config:?}:\n{}\n{err}", output.wgsl);
            }
        }
    }
}

#[test]
fn minified_fragment_shader_validates() {
    let source = "
        struct Light {
            direction: vec3<f32>,
            color: vec3<f32>,
        }

        @group(0) @binding(0) var<uniform> light: Light;

        fn shade(normal: vec3<f32>) -> vec3<f32> {
            let lambert = max(dot(normal, -light.direction), 0.0);
            return light.color * lambert;
        }

        @fragment
        fn fs_main(@location(0) normal: vec3<f32>) -> @location(0) vec4<f32> {
            var color = shade(normalize(normal));
            if (color.r > 1.0 || color.g > 1.0) {
                color = color / max(color.r, color.g);
            }
            return vec4<f32>(color, 1.0);
        }";
    common::naga_validate(source).expect("naga should accept the source");
    for config in configs() {
        let output = common::minify(source, &config);
        if let Err(err) = common::naga_validate(&output.wgsl) {
            panic!("{config:?}:\n{}\n{err}", output.wgsl);
        }
    }
}

#[test]
fn padded_struct_validates() {
    let source = "
        struct Params {
            scale: f32,
            @offset(32) offset: vec4<f32>,
        }

        @group(0) @binding(0) var<uniform> params: Params;

        @fragment
        fn main() -> @location(0) vec4<f32> {
            return params.offset * params.scale;
        }";
    let output = common::minify(source, &Config::default());
    assert!(output.wgsl.contains("@size(16)padding_0:u32"), "{}", output.wgsl);
    common::naga_validate(&output.wgsl).expect("naga should accept the padded struct");
}

#[test]
fn half_precision_padding_keeps_offsets() {
    let config = Config {
        rename_identifiers: false,
        remove_unreachable_declarations: false,
        ..Config::default()
    };
    for (offset, fields) in [(4, 3), (6, 4), (8, 4), (10, 4)] {
        let source = format!(
            "enable f16;
             struct S {{ a: f16, b: f16, @offset({offset}) c: f16 }}
             @group(0) @binding(0) var<storage, read_write> s: S;
             @compute @workgroup_size(1) fn main() {{ s.c = s.a; }}"
        );
        let expected = common::member_offsets(&source);
        let output = common::minify(&source, &config);
        let kept: Vec<(String, u32)> = common::member_offsets(&output.wgsl)
            .into_iter()
            .filter(|(name, _)| !name.starts_with("padding_"))
            .collect();
        assert_eq!(kept, expected, "{}", output.wgsl);
        assert_eq!(common::member_offsets(&output.wgsl).len(), fields, "{}", output.wgsl);

        if let Err(err) = common::naga_validate(&output.wgsl) {
            panic!("{}\n{err}", output.wgsl);
        }
        let naga_kept: Vec<(String, u32)> = common::naga_member_offsets(&output.wgsl)
            .into_iter()
            .filter(|(name, _)| !name.starts_with("padding_"))
            .collect();
        assert_eq!(naga_kept, expected, "{}", output.wgsl);
    }
}

#[test]
fn inferred_pointers_validate() {
    let source = "
        struct S { v: f32 }

        @compute @workgroup_size(1)
        fn main() {
            var a = 4;
            let p = &a;
            *p = 5;
            var s = S(1.0);
            let q = &s;
            let x = (*q).v;
            (*q).v = x + f32(*p);
        }";
    common::naga_validate(source).expect("naga should accept the source");
    for config in configs() {
        let output = common::minify(source, &config);
        if let Err(err) = common::naga_validate(&output.wgsl) {
            panic!("{config:?}:\n{}\n{err}", output.wgsl);
        }
    }
}
