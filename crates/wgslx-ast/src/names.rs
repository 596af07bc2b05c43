//! Names predeclared by WGSL.
//!
//! Every table is sorted so lookups can binary search.

/// Words that can never be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "alias",
    "break",
    "case",
    "const",
    "const_assert",
    "continue",
    "continuing",
    "default",
    "diagnostic",
    "discard",
    "else",
    "enable",
    "false",
    "fn",
    "for",
    "if",
    "let",
    "loop",
    "override",
    "requires",
    "return",
    "struct",
    "switch",
    "true",
    "var",
    "while",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.binary_search(&name).is_ok()
}

/// Predeclared type-generator and type names.
pub const BUILTIN_TYPES: &[&str] = &[
    "array", "atomic", "bool", "f16", "f32", "i32", "mat2x2", "mat2x2f", "mat2x2h", "mat2x3",
    "mat2x3f", "mat2x3h", "mat2x4", "mat2x4f", "mat2x4h", "mat3x2", "mat3x2f", "mat3x2h", "mat3x3",
    "mat3x3f", "mat3x3h", "mat3x4", "mat3x4f", "mat3x4h", "mat4x2", "mat4x2f", "mat4x2h", "mat4x3",
    "mat4x3f", "mat4x3h", "mat4x4", "mat4x4f", "mat4x4h", "ptr", "sampler", "sampler_comparison",
    "texture_1d", "texture_2d", "texture_2d_array", "texture_3d", "texture_cube",
    "texture_cube_array", "texture_depth_2d", "texture_depth_2d_array", "texture_depth_cube",
    "texture_depth_cube_array", "texture_depth_multisampled_2d", "texture_external",
    "texture_multisampled_2d", "texture_storage_1d", "texture_storage_2d",
    "texture_storage_2d_array", "texture_storage_3d", "u32", "vec2", "vec2f", "vec2h", "vec2i",
    "vec2u", "vec3", "vec3f", "vec3h", "vec3i", "vec3u", "vec4", "vec4f", "vec4h", "vec4i", "vec4u",
];

/// Predeclared function names.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "abs", "acos", "acosh", "all", "any", "arrayLength", "asin", "asinh", "atan", "atan2", "atanh",
    "atomicAdd", "atomicAnd", "atomicCompareExchangeWeak", "atomicExchange", "atomicLoad",
    "atomicMax", "atomicMin", "atomicOr", "atomicStore", "atomicSub", "atomicXor", "bitcast",
    "ceil", "clamp", "cos", "cosh", "countLeadingZeros", "countOneBits", "countTrailingZeros",
    "cross", "degrees", "determinant", "distance", "dot", "dot4I8Packed", "dot4U8Packed", "dpdx",
    "dpdxCoarse", "dpdxFine", "dpdy", "dpdyCoarse", "dpdyFine", "exp", "exp2", "extractBits",
    "faceForward", "firstLeadingBit", "firstTrailingBit", "floor", "fma", "fract", "frexp",
    "fwidth", "fwidthCoarse", "fwidthFine", "insertBits", "inverseSqrt", "ldexp", "length", "log",
    "log2", "max", "min", "mix", "modf", "normalize", "pack2x16float", "pack2x16snorm",
    "pack2x16unorm", "pack4x8snorm", "pack4x8unorm", "pack4xI8", "pack4xI8Clamp", "pack4xU8",
    "pack4xU8Clamp", "pow", "quadBroadcast", "quadSwapDiagonal", "quadSwapX", "quadSwapY",
    "quantizeToF16", "radians", "reflect", "refract", "reverseBits", "round", "saturate", "select",
    "sign", "sin", "sinh", "smoothstep", "sqrt", "step", "storageBarrier", "subgroupAdd",
    "subgroupAll", "subgroupAnd", "subgroupAny", "subgroupBallot", "subgroupBroadcast",
    "subgroupBroadcastFirst", "subgroupElect", "subgroupExclusiveAdd", "subgroupExclusiveMul",
    "subgroupInclusiveAdd", "subgroupInclusiveMul", "subgroupMax", "subgroupMin", "subgroupMul",
    "subgroupOr", "subgroupShuffle", "subgroupShuffleDown", "subgroupShuffleUp",
    "subgroupShuffleXor", "subgroupXor", "tan", "tanh", "textureBarrier", "textureDimensions",
    "textureGather", "textureGatherCompare", "textureLoad", "textureNumLayers", "textureNumLevels",
    "textureNumSamples", "textureSample", "textureSampleBaseClampToEdge", "textureSampleBias",
    "textureSampleCompare", "textureSampleCompareLevel", "textureSampleGrad", "textureSampleLevel",
    "textureStore", "transpose", "trunc", "unpack2x16float", "unpack2x16snorm", "unpack2x16unorm",
    "unpack4x8snorm", "unpack4x8unorm", "unpack4xI8", "unpack4xU8", "workgroupBarrier",
    "workgroupUniformLoad",
];

/// Predeclared enumerants: address spaces, access modes and texel formats.
pub const BUILTIN_ENUMERANTS: &[&str] = &[
    "bgra8unorm", "function", "private", "r32float", "r32sint", "r32uint", "read", "read_write",
    "rg32float", "rg32sint", "rg32uint", "rgba16float", "rgba16sint", "rgba16uint", "rgba32float",
    "rgba32sint", "rgba32uint", "rgba8sint", "rgba8snorm", "rgba8uint", "rgba8unorm", "storage",
    "uniform", "workgroup", "write",
];

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.binary_search(&name).is_ok()
}

pub fn is_builtin_function(name: &str) -> bool {
    BUILTIN_FUNCTIONS.binary_search(&name).is_ok()
}

pub fn is_builtin_enumerant(name: &str) -> bool {
    BUILTIN_ENUMERANTS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted() {
        for table in [KEYWORDS, BUILTIN_TYPES, BUILTIN_FUNCTIONS, BUILTIN_ENUMERANTS] {
            assert!(table.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn lookups() {
        assert!(is_keyword("loop"));
        assert!(!is_keyword("vec4f"));
        assert!(is_builtin_type("vec4f"));
        assert!(is_builtin_type("texture_storage_2d"));
        assert!(!is_builtin_type("vec5"));
        assert!(is_builtin_function("atomicCompareExchangeWeak"));
        assert!(!is_builtin_function("average"));
        assert!(is_builtin_enumerant("read_write"));
    }
}
