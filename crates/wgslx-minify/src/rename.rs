//! Identifier renaming pass.
//!
//! Every user-declared name is replaced by the shortest name not yet
//! taken, in order of first appearance. Names spelled by the language
//! itself (builtin types and functions, enumerants, swizzles, members of
//! builtin result structs, diagnostic rules) keep their spelling.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use wgslx_ast::fold::{Fold, fold_program, fold_template_args};
use wgslx_ast::visit::IdentSite;
use wgslx_ast::{
    CallTarget, Ident, IdentKind, MemberAccess, ResolvedProgram, Sem, Symbol, SymbolTable,
};

use crate::keywords::is_reserved;
use crate::{Pass, PassOutput};

/// Original to new names of the renamed entry points.
///
/// Ordered by original name so serialized output is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenameTable(BTreeMap<String, String>);

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// New name of the entry point originally called `from`.
    pub fn get(&self, from: &str) -> Option<&str> {
        self.0.get(from).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }

    pub fn extend(&mut self, other: RenameTable) {
        self.0.extend(other.0);
    }
}

const LEADING_CHARS: usize = 52;
const TRAILING_CHARS: usize = 62;

fn name_char(digit: usize) -> char {
    let byte = match digit {
        0..26 => b'a' + digit as u8,
        26..52 => b'A' + (digit - 26) as u8,
        _ => b'0' + (digit - 52) as u8,
    };
    char::from(byte)
}

/// The `index`-th identifier in shortlex order: `a`..`Z`, then `aa`..`Z9`,
/// and so on. A name starts with a letter and continues with letters or
/// digits.
pub fn fresh_name(mut index: usize) -> String {
    let mut tier = LEADING_CHARS;
    let mut trailing = 0;
    while index >= tier {
        index -= tier;
        tier = tier.saturating_mul(TRAILING_CHARS);
        trailing += 1;
    }
    let mut chars = Vec::with_capacity(trailing + 1);
    for _ in 0..trailing {
        chars.push(name_char(index % TRAILING_CHARS));
        index /= TRAILING_CHARS;
    }
    chars.push(name_char(index % LEADING_CHARS));
    chars.iter().rev().collect()
}

/// Hands out fresh names, skipping reserved ones.
#[derive(Debug, Default)]
struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    fn next_name(&mut self) -> String {
        loop {
            let name = fresh_name(self.next);
            self.next += 1;
            if !is_reserved(&name) {
                return name;
            }
        }
    }
}

/// Renames every user-declared identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentifierRenamer;

impl Pass for IdentifierRenamer {
    fn name(&self) -> &str {
        "rename-identifiers"
    }

    fn run(&self, input: &ResolvedProgram) -> PassOutput {
        let source = &input.program;
        let mut renamer = Renamer {
            sem: &input.sem,
            symbols: source.symbols.clone(),
            names: HashMap::new(),
            generator: NameGenerator::default(),
        };
        let mut program = fold_program(&mut renamer, source);
        log::debug!("{}: renamed {} names", self.name(), renamer.names.len());

        let mut remappings = RenameTable::new();
        for func in source.entry_points() {
            let Some(&renamed) = renamer.names.get(&func.name) else {
                continue;
            };
            let from = source.name(func.name);
            let to = &renamer.symbols[renamed];
            if from != to {
                remappings.insert(from, to);
            }
        }

        program.symbols = renamer.symbols;
        PassOutput {
            program,
            remappings,
        }
    }
}

struct Renamer<'a> {
    sem: &'a Sem,
    /// The source table, extended with the fresh names.
    symbols: SymbolTable,
    names: HashMap<Symbol, Symbol>,
    generator: NameGenerator,
}

impl Renamer<'_> {
    fn rename(&mut self, symbol: Symbol) -> Symbol {
        if let Some(&renamed) = self.names.get(&symbol) {
            return renamed;
        }
        let name = self.generator.next_name();
        let renamed = self.symbols.intern(&name);
        self.names.insert(symbol, renamed);
        renamed
    }

    /// Whether the identifier at `site` is spelled by the language rather
    /// than declared by the program.
    fn is_preserved(&self, site: IdentSite) -> bool {
        match site {
            IdentSite::Expression(id) => !matches!(
                self.sem.ident(id),
                Some(IdentKind::Value | IdentKind::Type { builtin: false })
            ),
            IdentSite::CallTarget(id) => self.sem.call(id).is_none_or(CallTarget::is_builtin),
            IdentSite::Member(id) => !matches!(
                self.sem.member(id),
                Some(MemberAccess::Field {
                    builtin_struct: false
                })
            ),
        }
    }
}

impl Fold for Renamer<'_> {
    fn fold_ident(&mut self, ident: &Ident, site: IdentSite) -> Ident {
        let symbol = if self.is_preserved(site) {
            ident.symbol
        } else {
            self.rename(ident.symbol)
        };
        fold_template_args(self, ident, symbol)
    }

    fn fold_declared_name(&mut self, name: Symbol) -> Symbol {
        self.rename(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use wgslx_ast::{FrontEnd, dump_program};
    use wgslx_reader::Reader;

    fn rename(source: &str) -> (String, RenameTable) {
        let resolved = Reader.parse(source).expect("source should resolve");
        let output = IdentifierRenamer.run(&resolved);
        let renamed = Reader
            .resolve(output.program)
            .expect("renamed program should resolve");
        (dump_program(&renamed.program), output.remappings)
    }

    #[test]
    fn fresh_names_in_shortlex_order() {
        assert_eq!(fresh_name(0), "a");
        assert_eq!(fresh_name(25), "z");
        assert_eq!(fresh_name(26), "A");
        assert_eq!(fresh_name(51), "Z");
        assert_eq!(fresh_name(52), "aa");
        assert_eq!(fresh_name(53), "ab");
        assert_eq!(fresh_name(52 + 61), "a9");
        assert_eq!(fresh_name(52 + 62), "ba");
        assert_eq!(fresh_name(52 + 52 * 62), "aaa");
    }

    #[test]
    fn generator_skips_reserved_names() {
        let mut generator = NameGenerator::default();
        let names: Vec<String> = (0..4000).map(|_| generator.next_name()).collect();
        assert!(names.iter().any(|n| n == "ar"));
        assert!(names.iter().any(|n| n == "at"));
        assert!(!names.iter().any(|n| n == "as"));
        assert!(names.iter().all(|n| !is_reserved(n)));
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn renames_in_order_of_appearance() {
        let (dump, remappings) = rename(
            "fn average(a: f32, b: f32) -> f32 { return (a + b) / 2; }
             @vertex fn vs1() -> @builtin(position) vec4f { return vec4f(average(0, 1)); }",
        );
        assert!(dump.contains("fn a(b: f32, c: f32) -> f32 {"), "{dump}");
        assert!(dump.contains("return (b + c) / 2;"), "{dump}");
        assert!(dump.contains("@vertex fn d() -> @builtin(position) vec4f {"), "{dump}");
        assert!(dump.contains("return vec4f(a(0, 1));"), "{dump}");
        assert_eq!(remappings.iter().collect::<Vec<_>>(), vec![("vs1", "d")]);
    }

    #[test]
    fn language_names_keep_their_spelling() {
        let (dump, _) = rename(
            "struct Light { color: vec3f }
             @group(0) @binding(0) var<storage, read> light: Light;
             @fragment fn main(@location(0) v: vec4f) -> @location(0) vec4f {
                 let m = modf(v);
                 return vec4f(light.color * m.fract.xyz, v.w);
             }",
        );
        assert!(dump.contains("struct a {"), "{dump}");
        assert!(dump.contains("b: vec3f,"), "{dump}");
        assert!(dump.contains("var<storage, read> c: a;"), "{dump}");
        assert!(dump.contains("let f = modf(e);"), "{dump}");
        assert!(dump.contains("vec4f(c.b * f.fract.xyz, e.w)"), "{dump}");
    }

    #[test]
    fn locals_shadowing_builtins_are_renamed() {
        let (dump, _) = rename(
            "@compute @workgroup_size(1) fn main() {
                 let max = 1.0;
                 let x = min(max, 2.0);
             }",
        );
        assert!(dump.contains("let b = 1.0;"), "{dump}");
        assert!(dump.contains("let c = min(b, 2.0);"), "{dump}");
    }

    #[test]
    fn unchanged_entry_points_are_not_reported() {
        let (_, remappings) = rename("@compute @workgroup_size(1) fn a() {}");
        assert!(remappings.is_empty());
    }

    #[test]
    fn rename_table_serializes_as_object() {
        let mut table = RenameTable::new();
        table.insert("vs_main", "b");
        table.insert("fs_main", "a");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("vs_main"), Some("b"));
        let json = serde_json::to_string(&table).expect("table should serialize");
        assert_eq!(json, r#"{"fs_main":"a","vs_main":"b"}"#);
    }
}
