//! Attributes and diagnostic controls.

use std::fmt;

use crate::expr::Expr;
use crate::symbol::Symbol;

/// Pipeline stage of an entry point.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }
}

/// Severity named by a `diagnostic` directive or attribute.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Off,
}

impl Severity {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            "off" => Some(Severity::Off),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Off => "off",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A diagnostic rule name, optionally qualified by a category (`chromium.unreachable_code`).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct DiagnosticRule {
    pub category: Option<Symbol>,
    pub name: Symbol,
}

/// `(severity, rule)` as written in a `diagnostic` directive or attribute.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct DiagnosticControl {
    pub severity: Severity,
    pub rule: DiagnosticRule,
}

/// The closed set of attributes.
///
/// Builtin value names and interpolation parameters are context-dependent
/// names rather than identifiers, so they are kept as plain strings.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Align(Expr),
    Binding(Expr),
    BlendSrc(Expr),
    Builtin(String),
    Diagnostic(DiagnosticControl),
    Group(Expr),
    Id(Expr),
    Interpolate {
        kind: String,
        sampling: Option<String>,
    },
    Invariant,
    Location(Expr),
    MustUse,
    /// Legacy explicit member offset. Never printed back; the layout it
    /// describes is reproduced with padding members.
    Offset(Expr),
    Size(Expr),
    Stage(ShaderStage),
    WorkgroupSize {
        x: Expr,
        y: Option<Expr>,
        z: Option<Expr>,
    },
}

impl Attribute {
    /// Attribute name as written after `@`.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Align(_) => "align",
            Attribute::Binding(_) => "binding",
            Attribute::BlendSrc(_) => "blend_src",
            Attribute::Builtin(_) => "builtin",
            Attribute::Diagnostic(_) => "diagnostic",
            Attribute::Group(_) => "group",
            Attribute::Id(_) => "id",
            Attribute::Interpolate { .. } => "interpolate",
            Attribute::Invariant => "invariant",
            Attribute::Location(_) => "location",
            Attribute::MustUse => "must_use",
            Attribute::Offset(_) => "offset",
            Attribute::Size(_) => "size",
            Attribute::Stage(stage) => stage.name(),
            Attribute::WorkgroupSize { .. } => "workgroup_size",
        }
    }

    /// Expression arguments in source order.
    pub fn expressions(&self) -> Vec<&Expr> {
        match self {
            Attribute::Align(e)
            | Attribute::Binding(e)
            | Attribute::BlendSrc(e)
            | Attribute::Group(e)
            | Attribute::Id(e)
            | Attribute::Location(e)
            | Attribute::Offset(e)
            | Attribute::Size(e) => vec![e],
            Attribute::WorkgroupSize { x, y, z } => {
                let mut args = vec![x];
                args.extend(y.iter());
                args.extend(z.iter());
                args
            }
            Attribute::Builtin(_)
            | Attribute::Diagnostic(_)
            | Attribute::Interpolate { .. }
            | Attribute::Invariant
            | Attribute::MustUse
            | Attribute::Stage(_) => Vec::new(),
        }
    }
}

/// Returns the pipeline stage named by an attribute list, if any.
pub fn stage_of(attributes: &[Attribute]) -> Option<ShaderStage> {
    attributes.iter().find_map(|attr| match attr {
        Attribute::Stage(stage) => Some(*stage),
        _ => None,
    })
}
