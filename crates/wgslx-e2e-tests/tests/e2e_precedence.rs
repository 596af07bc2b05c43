//! Every pairing of operators, nested both ways, must print with just
//! enough parentheses to read back as the same tree.

mod common;

const INT_OPS: [&str; 10] = ["*", "/", "%", "+", "-", "<<", ">>", "&", "|", "^"];
const COMPARISONS: [&str; 6] = ["<", "<=", ">", ">=", "==", "!="];
const BOOL_OPS: [&str; 6] = ["&&", "||", "&", "|", "==", "!="];

/// Both nestings of two operators over `x`, `y`, `z`, plus the unary
/// operator applied to the inner pair and to a leaf.
fn shapes(inner: &[&str], outer: &[&str], unary: &str) -> Vec<String> {
    let mut exprs = Vec::new();
    for a in inner {
        for b in outer {
            exprs.push(format!("(x {a} y) {b} z"));
            exprs.push(format!("x {b} (y {a} z)"));
        }
    }
    for a in inner {
        exprs.push(format!("{unary}(x {a} y)"));
        exprs.push(format!("({unary}x) {a} y"));
        exprs.push(format!("x {a} ({unary}y)"));
    }
    exprs
}

fn check(params: &str, ret: &str, exprs: &[String]) {
    let config = common::faithful_config();
    for expr in exprs {
        let source = format!("fn f({params}) -> {ret} {{ return {expr}; }}");
        let output = common::minify(&source, &config);
        assert_eq!(
            common::reference(&output.wgsl),
            common::reference(&source),
            "{expr} printed as {}",
            output.wgsl
        );
        if let Err(err) = common::naga_validate(&output.wgsl) {
            panic!("{expr} printed as {}\n{err}", output.wgsl);
        }
    }
}

#[test]
fn integer_operators() {
    check(
        "x: u32, y: u32, z: u32",
        "u32",
        &shapes(&INT_OPS, &INT_OPS, "~"),
    );
}

#[test]
fn signed_negation() {
    let ops = ["*", "/", "%", "+", "-"];
    check("x: i32, y: i32, z: i32", "i32", &shapes(&ops, &ops, "-"));
}

#[test]
fn integer_operands_of_comparisons() {
    let mut exprs = Vec::new();
    for a in INT_OPS {
        for b in COMPARISONS {
            exprs.push(format!("(x {a} y) {b} z"));
            exprs.push(format!("x {b} (y {a} z)"));
        }
    }
    check("x: u32, y: u32, z: u32", "bool", &exprs);
}

#[test]
fn boolean_operators() {
    check(
        "x: bool, y: bool, z: bool",
        "bool",
        &shapes(&BOOL_OPS, &BOOL_OPS, "!"),
    );
}

#[test]
fn comparisons_under_logical_operators() {
    let mut exprs = Vec::new();
    for a in COMPARISONS {
        for b in BOOL_OPS {
            exprs.push(format!("(x {a} y) {b} (y {a} z)"));
        }
    }
    check("x: u32, y: u32, z: u32", "bool", &exprs);
}

#[test]
fn less_than_in_arguments() {
    // Written unparenthesized, `x < y, y > x` would be a template list.
    let exprs = [
        "select((x < y), y > x, x < z)".to_owned(),
        "select(x > y, (x < y), y > z)".to_owned(),
        "all(vec2<bool>((x < y), y > z))".to_owned(),
    ];
    check("x: u32, y: u32, z: u32", "bool", &exprs);
}
