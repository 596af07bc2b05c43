//! Integration tests running the minifying passes over sample shaders.

use std::collections::HashSet;

use wgslx_ast::visit::{Visitor, walk_program};
use wgslx_ast::{FrontEnd, Program, ResolvedProgram, Symbol};
use wgslx_minify::keywords::is_reserved;
use wgslx_minify::{DeadCodeElimination, IdentifierRenamer, Pass, RenameTable};
use wgslx_reader::Reader;

fn run_passes(source: &str) -> (ResolvedProgram, RenameTable) {
    let passes: Vec<Box<dyn Pass>> = vec![
        Box::new(DeadCodeElimination::default()),
        Box::new(IdentifierRenamer),
    ];
    let mut resolved = Reader.parse(source).expect("shader should resolve");
    let mut remappings = RenameTable::new();
    for pass in &passes {
        let output = pass.run(&resolved);
        remappings.extend(output.remappings);
        resolved = Reader
            .resolve(output.program)
            .unwrap_or_else(|err| panic!("{} output should resolve: {err}", pass.name()));
    }
    (resolved, remappings)
}

#[derive(Default)]
struct DeclaredNames(HashSet<Symbol>);

impl Visitor for DeclaredNames {
    fn visit_declared_name(&mut self, name: Symbol) {
        self.0.insert(name);
    }
}

fn declared_names(program: &Program) -> HashSet<String> {
    let mut names = DeclaredNames::default();
    walk_program(&mut names, program);
    names
        .0
        .into_iter()
        .map(|symbol| program.name(symbol).to_owned())
        .collect()
}

fn top_level_names(program: &Program) -> Vec<String> {
    program
        .declarations
        .iter()
        .filter_map(|decl| decl.name())
        .map(|name| program.name(name).to_owned())
        .collect()
}

#[test]
fn triangle() {
    let source = include_str!("../../../shaders/triangle.wgsl");
    let original = wgslx_reader::parse(source).expect("triangle.wgsl should parse");
    let (resolved, remappings) = run_passes(source);

    // unused_helper is gone; everything else survives.
    assert_eq!(resolved.program.declarations.len(), 7);
    assert_eq!(remappings.len(), 2);
    assert!(remappings.get("vs_main").is_some());
    assert!(remappings.get("fs_main").is_some());

    let before = declared_names(&original);
    let after = declared_names(&resolved.program);
    // unused_helper and its parameter x.
    assert_eq!(after.len(), before.len() - 2);
    assert!(after.iter().all(|name| !is_reserved(name)));
}

#[test]
fn lighting_drops_dead_chain() {
    let source = include_str!("../../../shaders/lighting.wgsl");
    let resolved = Reader.parse(source).expect("lighting.wgsl should resolve");
    let output = DeadCodeElimination::default().run(&resolved);
    let names = top_level_names(&output.program);
    assert!(!names.iter().any(|n| n == "to_srgb"));
    assert!(!names.iter().any(|n| n == "GAMMA"));
    assert!(names.iter().any(|n| n == "MATERIAL"));
    assert!(names.iter().any(|n| n == "Color"));

    let (_, remappings) = run_passes(source);
    assert_eq!(
        remappings.iter().map(|(from, _)| from).collect::<Vec<_>>(),
        vec!["fs_main", "vs_main"]
    );
}

#[test]
fn blur_keeps_override_and_workgroup_var() {
    let source = include_str!("../../../shaders/blur.wgsl");
    let resolved = Reader.parse(source).expect("blur.wgsl should resolve");
    let output = DeadCodeElimination::default().run(&resolved);
    assert_eq!(
        top_level_names(&output.program),
        vec![
            "Params",
            "params",
            "source",
            "destination",
            "tile",
            "WORKGROUP_SIZE",
            "pixel_index",
            "average",
            "main",
        ]
    );

    let (renamed, remappings) = run_passes(source);
    assert_eq!(remappings.get("main"), Some("q"));
    assert_eq!(renamed.program.declarations.len(), 9);
}
