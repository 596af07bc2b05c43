//! Predeclared short spellings of vector and matrix types.

/// Full template spelling to predeclared alias, sorted by spelling.
const SHORT_ALIASES: &[(&str, &str)] = &[
    ("mat2x2<f16>", "mat2x2h"),
    ("mat2x2<f32>", "mat2x2f"),
    ("mat2x3<f16>", "mat2x3h"),
    ("mat2x3<f32>", "mat2x3f"),
    ("mat2x4<f16>", "mat2x4h"),
    ("mat2x4<f32>", "mat2x4f"),
    ("mat3x2<f16>", "mat3x2h"),
    ("mat3x2<f32>", "mat3x2f"),
    ("mat3x3<f16>", "mat3x3h"),
    ("mat3x3<f32>", "mat3x3f"),
    ("mat3x4<f16>", "mat3x4h"),
    ("mat3x4<f32>", "mat3x4f"),
    ("mat4x2<f16>", "mat4x2h"),
    ("mat4x2<f32>", "mat4x2f"),
    ("mat4x3<f16>", "mat4x3h"),
    ("mat4x3<f32>", "mat4x3f"),
    ("mat4x4<f16>", "mat4x4h"),
    ("mat4x4<f32>", "mat4x4f"),
    ("vec2<f16>", "vec2h"),
    ("vec2<f32>", "vec2f"),
    ("vec2<i32>", "vec2i"),
    ("vec2<u32>", "vec2u"),
    ("vec3<f16>", "vec3h"),
    ("vec3<f32>", "vec3f"),
    ("vec3<i32>", "vec3i"),
    ("vec3<u32>", "vec3u"),
    ("vec4<f16>", "vec4h"),
    ("vec4<f32>", "vec4f"),
    ("vec4<i32>", "vec4i"),
    ("vec4<u32>", "vec4u"),
];

/// The predeclared alias of `name<scalar>`, such as `vec4f` for `vec4<f32>`.
pub(crate) fn short_alias(name: &str, scalar: &str) -> Option<&'static str> {
    let spelling = format!("{name}<{scalar}>");
    SHORT_ALIASES
        .binary_search_by(|(full, _)| (*full).cmp(spelling.as_str()))
        .ok()
        .map(|index| SHORT_ALIASES[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(SHORT_ALIASES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(SHORT_ALIASES.len(), 30);
    }

    #[test]
    fn lookups() {
        assert_eq!(short_alias("vec4", "f32"), Some("vec4f"));
        assert_eq!(short_alias("vec2", "u32"), Some("vec2u"));
        assert_eq!(short_alias("mat3x2", "f16"), Some("mat3x2h"));
        assert_eq!(short_alias("mat4x4", "i32"), None);
        assert_eq!(short_alias("vec3", "bool"), None);
        assert_eq!(short_alias("array", "f32"), None);
    }
}
