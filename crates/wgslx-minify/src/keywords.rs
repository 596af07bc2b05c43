//! Names a fresh identifier must never take.

use std::sync::LazyLock;

use wgslx_ast::names::{BUILTIN_ENUMERANTS, BUILTIN_FUNCTIONS, BUILTIN_TYPES, KEYWORDS};

/// Words WGSL reserves for future use.
pub const RESERVED_WORDS: &[&str] = &[
    "NULL", "Self", "abstract", "active", "alignas", "alignof", "as", "asm", "asm_fragment",
    "async", "attribute", "auto", "await", "become", "binding_array", "cast", "catch", "class",
    "co_await", "co_return", "co_yield", "coherent", "column_major", "common", "compile",
    "compile_fragment", "concept", "const_cast", "consteval", "constexpr", "constinit", "crate",
    "debugger", "decltype", "delete", "demote", "demote_to_helper", "do", "dynamic_cast",
    "enum", "explicit", "export", "extends", "extern", "external", "fallthrough", "filter",
    "final", "finally", "friend", "from", "fxgroup", "get", "goto", "groupshared", "highp",
    "impl", "implements", "import", "inline", "instanceof", "interface", "layout", "lowp",
    "macro", "macro_rules", "match", "mediump", "meta", "mod", "module", "move", "mut",
    "mutable", "namespace", "new", "nil", "noexcept", "noinline", "nointerpolation",
    "noperspective", "null", "nullptr", "of", "operator", "package", "packoffset", "partition",
    "pass", "patch", "pixelfragment", "precise", "precision", "premerge", "priv", "protected",
    "pub", "public", "readonly", "ref", "regardless", "register", "reinterpret_cast", "require",
    "resource", "restrict", "self", "set", "shared", "sizeof", "smooth", "snorm", "static",
    "static_assert", "static_cast", "std", "subroutine", "super", "target", "template", "this",
    "thread_local", "throw", "trait", "try", "type", "typedef", "typeid", "typename", "typeof",
    "union", "unless", "unorm", "unsafe", "unsized", "use", "using", "varying", "virtual",
    "volatile", "wgsl", "where", "with", "writeonly", "yield",
];

/// Keywords, reserved words and every predeclared type, function and
/// enumerant name, sorted and deduplicated.
static TABLE: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut table: Vec<&'static str> = [
        KEYWORDS,
        RESERVED_WORDS,
        BUILTIN_TYPES,
        BUILTIN_FUNCTIONS,
        BUILTIN_ENUMERANTS,
    ]
    .concat();
    table.sort_unstable();
    table.dedup();
    table
});

/// Returns `true` if `name` may not be used for a renamed identifier.
pub fn is_reserved(name: &str) -> bool {
    TABLE.binary_search(&name).is_ok()
}
