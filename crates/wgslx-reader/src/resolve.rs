//! Name binding and type inference.
//!
//! Module-scope declarations are order independent, so they are resolved
//! lazily: the first reference to a declaration resolves it (memoized),
//! and a declaration reached again while it is still being resolved is a
//! dependency cycle. Function bodies are resolved last, once every module
//! declaration has a type.

use std::collections::{HashMap, HashSet};

use wgslx_ast::names::{is_builtin_enumerant, is_builtin_function, is_builtin_type};
use wgslx_ast::{
    Attribute, BinaryOp, Block, CallTarget, CaseSelector, Declaration, Diagnostics, Else, Expr,
    ExprKind, Function, Ident, IdentKind, IfStatement, MemberAccess, NodeId, Program,
    ResolvedProgram, Scalar, Sem, Statement, Struct, Symbol, Type, UnaryOp, Variable,
    VariableKind, VectorSize,
};

use crate::builtins::{self, BuiltinType, TemplateArg};
use crate::layout::{ConstEval, StructLayout, StructSize, type_layout};

const KNOWN_EXTENSIONS: &[&str] = &[
    "chromium_disable_uniformity_analysis",
    "chromium_experimental_framebuffer_fetch",
    "chromium_experimental_pixel_local",
    "chromium_experimental_push_constant",
    "chromium_experimental_subgroup_matrix",
    "chromium_internal_graphite",
    "chromium_internal_input_attachments",
    "clip_distances",
    "dual_source_blending",
    "f16",
    "primitive_index",
    "subgroups",
];

const KNOWN_FEATURES: &[&str] = &[
    "packed_4x8_integer_dot_product",
    "pointer_composite_access",
    "readonly_and_readwrite_storage_textures",
    "unrestricted_pointer_parameters",
];

const BUILTIN_VALUES: &[&str] = &[
    "clip_distances",
    "frag_depth",
    "front_facing",
    "global_invocation_id",
    "instance_index",
    "local_invocation_id",
    "local_invocation_index",
    "num_workgroups",
    "position",
    "primitive_index",
    "sample_index",
    "sample_mask",
    "subgroup_invocation_id",
    "subgroup_size",
    "vertex_index",
    "workgroup_id",
];

/// Resolves a parsed program, producing its semantic annotations.
pub fn resolve(program: Program) -> Result<ResolvedProgram, Diagnostics> {
    let (sem, diagnostics) = {
        let mut resolver = Resolver::new(&program);
        resolver.run();
        (resolver.sem, resolver.diags)
    };
    if diagnostics.has_errors() {
        return Err(diagnostics);
    }
    for warning in diagnostics.warnings() {
        log::warn!("{warning}");
    }
    Ok(ResolvedProgram {
        program,
        sem,
        warnings: diagnostics,
    })
}

/// What a module-scope name resolved to.
#[derive(Clone, Debug)]
enum Global {
    Value(Type),
    /// A function and its return type.
    Function(Option<Type>),
    Type(Type),
    /// Resolution failed; the error is already reported.
    Invalid,
}

/// What an expression denotes.
#[derive(Clone, Debug)]
enum Operand {
    Value(Type),
    Type(Type),
    Enumerant,
}

struct StructInfo {
    members: Vec<(Symbol, Type)>,
}

struct Resolver<'p> {
    program: &'p Program,
    sem: Sem,
    diags: Diagnostics,
    globals: HashMap<Symbol, usize>,
    resolved: HashMap<usize, Global>,
    in_progress: HashSet<usize>,
    structs: HashMap<Symbol, StructInfo>,
    struct_sizes: HashMap<Symbol, StructSize>,
    scopes: Vec<HashMap<Symbol, Type>>,
}

impl<'p> Resolver<'p> {
    fn new(program: &'p Program) -> Self {
        Self {
            program,
            sem: Sem::new(),
            diags: Diagnostics::new(),
            globals: HashMap::new(),
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
            structs: HashMap::new(),
            struct_sizes: HashMap::new(),
            scopes: Vec::new(),
        }
    }

    fn name(&self, symbol: Symbol) -> &'p str {
        let program = self.program;
        program.name(symbol)
    }

    fn describe_type(&self, ty: &Type) -> String {
        let program = self.program;
        ty.display(&program.symbols).to_string()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.diags.error(message, None);
    }

    fn run(&mut self) {
        let program = self.program;
        self.check_directives();

        for (index, decl) in program.declarations.iter().enumerate() {
            let Some(name) = decl.name() else { continue };
            if self.globals.contains_key(&name) {
                self.error(format!("redeclaration of '{}'", self.name(name)));
            } else {
                self.globals.insert(name, index);
            }
        }

        for index in 0..program.declarations.len() {
            self.global(index);
        }

        for decl in &program.declarations {
            match decl {
                Declaration::Function(func) => self.function_body(func),
                Declaration::ConstAssert(expr) => self.const_assert(expr),
                _ => {}
            }
        }
    }

    fn check_directives(&mut self) {
        let directives = &self.program.directives;
        for name in directives.enables.iter().flat_map(|e| &e.extensions) {
            if KNOWN_EXTENSIONS.binary_search(&name.as_str()).is_err() {
                self.error(format!("unknown extension '{name}'"));
            }
        }
        for name in directives.requires.iter().flat_map(|r| &r.features) {
            if KNOWN_FEATURES.binary_search(&name.as_str()).is_err() {
                self.error(format!("unknown language feature '{name}'"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Module scope
    // -----------------------------------------------------------------------

    fn global(&mut self, index: usize) -> Global {
        if let Some(global) = self.resolved.get(&index) {
            return global.clone();
        }
        let decl = &self.program.declarations[index];
        if !self.in_progress.insert(index) {
            let name = decl.name().map_or("", |n| self.name(n));
            self.error(format!("cyclic dependency involving '{name}'"));
            return Global::Invalid;
        }

        // Module declarations never see function locals.
        let scopes = std::mem::take(&mut self.scopes);
        let global = match decl {
            Declaration::Variable(var) => self
                .variable(var)
                .map_or(Global::Invalid, Global::Value),
            Declaration::Struct(s) => self.structure(s),
            Declaration::Alias(alias) => self
                .type_expr(&alias.ty)
                .map_or(Global::Invalid, Global::Type),
            Declaration::Function(func) => self.function_signature(func),
            Declaration::ConstAssert(_) => Global::Invalid,
        };
        self.scopes = scopes;

        self.in_progress.remove(&index);
        self.resolved.insert(index, global.clone());
        global
    }

    fn function_signature(&mut self, func: &Function) -> Global {
        self.attributes(&func.attributes);
        for param in &func.parameters {
            self.attributes(&param.attributes);
            self.type_expr(&param.ty);
        }
        self.attributes(&func.return_attributes);
        let ret = func.return_type.as_ref().and_then(|ty| self.type_expr(ty));
        if func.return_type.is_some() && ret.is_none() {
            return Global::Invalid;
        }
        Global::Function(ret)
    }

    fn structure(&mut self, s: &Struct) -> Global {
        let mut layout = StructLayout::new();
        let mut members: Vec<(Symbol, Type)> = Vec::new();
        for member in &s.members {
            for attr in &member.attributes {
                self.attribute(attr);
            }
            if members.iter().any(|(name, _)| *name == member.name) {
                self.error(format!(
                    "redeclaration of member '{}' in struct '{}'",
                    self.name(member.name),
                    self.name(s.name)
                ));
            }
            let Some(ty) = self.type_expr(&member.ty) else {
                continue;
            };

            let (mut align, mut size) = type_layout(&ty, &self.struct_sizes);
            let mut offset = None;
            for attr in &member.attributes {
                match attr {
                    Attribute::Align(e) => {
                        if let Some(value) = self.attribute_u32(e, "align") {
                            if value.is_power_of_two() {
                                align = value;
                            } else {
                                self.error("@align value must be a power of 2");
                            }
                        }
                    }
                    Attribute::Size(e) => {
                        if let Some(value) = self.attribute_u32(e, "size") {
                            if value < size {
                                self.error(format!(
                                    "@size must be at least the byte size of the member type ({size})"
                                ));
                            } else {
                                size = value;
                            }
                        }
                    }
                    Attribute::Offset(e) => {
                        if let Some(value) = self.attribute_u32(e, "offset") {
                            if value < layout.end() {
                                self.error("@offset overlaps the previous member");
                            } else {
                                offset = Some(value);
                            }
                        }
                    }
                    _ => {}
                }
            }
            let placed = layout.place(align, size, offset);
            self.sem.set_layout(member.id, placed);
            members.push((member.name, ty));
        }
        self.struct_sizes.insert(s.name, layout.finish());
        self.structs.insert(s.name, StructInfo { members });
        Global::Type(Type::Struct(s.name))
    }

    fn attribute_u32(&mut self, expr: &Expr, attr: &str) -> Option<u32> {
        let value = ConstEval {
            program: self.program,
            globals: &self.globals,
        }
        .int(expr);
        match value.and_then(|v| u32::try_from(v).ok()) {
            Some(value) => Some(value),
            None => {
                self.error(format!(
                    "@{attr} requires a non-negative constant integer expression"
                ));
                None
            }
        }
    }

    fn attribute(&mut self, attr: &Attribute) {
        for expr in attr.expressions() {
            self.value(expr);
        }
        match attr {
            Attribute::Builtin(name) if BUILTIN_VALUES.binary_search(&name.as_str()).is_err() => {
                self.error(format!("unknown builtin value '{name}'"));
            }
            Attribute::Interpolate { kind, sampling } => {
                if !matches!(kind.as_str(), "perspective" | "linear" | "flat") {
                    self.error(format!("unknown interpolation type '{kind}'"));
                }
                if let Some(sampling) = sampling {
                    if !matches!(
                        sampling.as_str(),
                        "center" | "centroid" | "sample" | "first" | "either"
                    ) {
                        self.error(format!("unknown interpolation sampling '{sampling}'"));
                    }
                }
            }
            Attribute::Offset(_) => {
                self.diags
                    .warning("@offset is deprecated, use @align and @size instead", None);
            }
            _ => {}
        }
    }

    fn const_assert(&mut self, expr: &Expr) {
        if let Some(ty) = self.value(expr) {
            if ty != Type::Scalar(Scalar::BOOL) {
                self.error("const_assert condition must be a bool");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Functions and statements
    // -----------------------------------------------------------------------

    fn lookup_local(&self, symbol: Symbol) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&symbol))
    }

    fn bind(&mut self, symbol: Symbol, ty: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol, ty);
        }
    }

    fn function_body(&mut self, func: &Function) {
        let mut scope = HashMap::new();
        for param in &func.parameters {
            let ty = self.sem.type_of(param.ty.id).cloned().unwrap_or(Type::Void);
            scope.insert(param.name, ty);
        }
        self.scopes.push(scope);
        for attr in &func.body.attributes {
            self.attribute(attr);
        }
        for stmt in &func.body.statements {
            self.statement(stmt);
        }
        self.scopes.pop();
    }

    fn block(&mut self, block: &Block) {
        self.scopes.push(HashMap::new());
        self.block_contents(block);
        self.scopes.pop();
    }

    fn block_contents(&mut self, block: &Block) {
        for attr in &block.attributes {
            self.attribute(attr);
        }
        for stmt in &block.statements {
            self.statement(stmt);
        }
    }

    fn attributes(&mut self, attrs: &[Attribute]) {
        for attr in attrs {
            self.attribute(attr);
        }
    }

    fn if_statement(&mut self, stmt: &IfStatement) {
        self.attributes(&stmt.attributes);
        self.condition(&stmt.condition);
        self.block(&stmt.accept);
        match &stmt.reject {
            Some(Else::If(nested)) => self.if_statement(nested),
            Some(Else::Block(block)) => self.block(block),
            None => {}
        }
    }

    fn condition(&mut self, expr: &Expr) {
        if let Some(ty) = self.value(expr) {
            if ty != Type::Scalar(Scalar::BOOL) {
                let ty = self.describe_type(&ty);
                self.error(format!("condition must be of type 'bool', found '{ty}'"));
            }
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::Assign { lhs, rhs } | Statement::CompoundAssign { lhs, rhs, .. } => {
                if !matches!(lhs.kind, ExprKind::Phony) {
                    self.value(lhs);
                }
                self.value(rhs);
            }
            Statement::Increment(expr)
            | Statement::Decrement(expr)
            | Statement::Call(expr)
            | Statement::Return(Some(expr)) => {
                self.value(expr);
            }
            Statement::BreakIf(expr) => self.condition(expr),
            Statement::ConstAssert(expr) => self.const_assert(expr),
            Statement::If(if_stmt) => self.if_statement(if_stmt),
            Statement::Switch(switch) => {
                self.attributes(&switch.attributes);
                self.value(&switch.selector);
                self.attributes(&switch.body_attributes);
                for clause in &switch.clauses {
                    for selector in &clause.selectors {
                        if let CaseSelector::Expr(expr) = selector {
                            self.value(expr);
                        }
                    }
                    self.block(&clause.body);
                }
            }
            Statement::Loop(lp) => {
                self.attributes(&lp.attributes);
                // `continuing` sees the declarations of the loop body.
                self.scopes.push(HashMap::new());
                self.block_contents(&lp.body);
                if let Some(continuing) = &lp.continuing {
                    self.block(continuing);
                }
                self.scopes.pop();
            }
            Statement::For(for_stmt) => {
                self.attributes(&for_stmt.attributes);
                self.scopes.push(HashMap::new());
                if let Some(init) = &for_stmt.initializer {
                    self.statement(init);
                }
                if let Some(cond) = &for_stmt.condition {
                    self.condition(cond);
                }
                if let Some(update) = &for_stmt.update {
                    self.statement(update);
                }
                self.block(&for_stmt.body);
                self.scopes.pop();
            }
            Statement::While(while_stmt) => {
                self.attributes(&while_stmt.attributes);
                self.condition(&while_stmt.condition);
                self.block(&while_stmt.body);
            }
            Statement::Declaration(var) => {
                let ty = self.variable(var).unwrap_or(Type::Void);
                self.bind(var.name, ty);
            }
            Statement::Break | Statement::Continue | Statement::Discard | Statement::Return(None) => {}
        }
    }

    /// Resolves a variable declaration and returns the type of its name.
    fn variable(&mut self, var: &Variable) -> Option<Type> {
        self.attributes(&var.attributes);
        if let VariableKind::Var {
            address_space,
            access_mode,
        } = &var.kind
        {
            for expr in address_space.iter().chain(access_mode.iter()) {
                self.enumerant(expr);
            }
        }
        let declared = var.ty.as_ref().and_then(|ty| self.type_expr(ty));
        let init = var.initializer.as_ref().and_then(|e| self.value(e));
        if let Some(ty) = declared {
            return Some(ty);
        }
        let init = init?;
        match var.kind {
            VariableKind::Const => Some(init),
            _ => Some(builtins::concretize(&init)),
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn value(&mut self, expr: &Expr) -> Option<Type> {
        match self.expr(expr)? {
            Operand::Value(ty) => Some(ty),
            Operand::Type(ty) => {
                let ty = self.describe_type(&ty);
                self.error(format!("type '{ty}' cannot be used as a value"));
                None
            }
            Operand::Enumerant => {
                self.error(format!(
                    "'{}' cannot be used as a value",
                    self.describe(expr)
                ));
                None
            }
        }
    }

    fn type_expr(&mut self, expr: &Expr) -> Option<Type> {
        match self.expr(expr)? {
            Operand::Type(ty) => Some(ty),
            _ => {
                self.error(format!("'{}' is not a type", self.describe(expr)));
                None
            }
        }
    }

    fn enumerant(&mut self, expr: &Expr) {
        match self.expr(expr) {
            Some(Operand::Enumerant) | None => {}
            Some(_) => self.error(format!(
                "expected an address space or access mode, found '{}'",
                self.describe(expr)
            )),
        }
    }

    fn describe(&self, expr: &Expr) -> &'p str {
        match &expr.kind {
            ExprKind::Ident(ident) => self.name(ident.symbol),
            _ => "expression",
        }
    }

    fn expr(&mut self, expr: &Expr) -> Option<Operand> {
        let result = match &expr.kind {
            ExprKind::Literal(lit) => Some(Operand::Value(Type::Scalar(lit.scalar()))),
            ExprKind::Phony => None,
            ExprKind::Ident(ident) => self.ident_expr(expr.id, ident),
            ExprKind::Call { target, arguments } => {
                self.call(expr.id, target, arguments).map(Operand::Value)
            }
            ExprKind::Index { base, index } => {
                let base = self.value(base);
                self.value(index);
                self.index(base?).map(Operand::Value)
            }
            ExprKind::Member { base, member } => {
                let base = self.value(base)?;
                self.member(expr.id, base, member).map(Operand::Value)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.value(operand)?;
                self.unary(*op, operand).map(Operand::Value)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.value(left);
                let right = self.value(right);
                Some(Operand::Value(binary_type(*op, &left?, &right?)))
            }
        };
        match &result {
            Some(Operand::Value(ty) | Operand::Type(ty)) => self.sem.set_type(expr.id, ty.clone()),
            Some(Operand::Enumerant) | None => {}
        }
        result
    }

    fn ident_expr(&mut self, id: NodeId, ident: &Ident) -> Option<Operand> {
        let name = self.name(ident.symbol);
        if let Some(ty) = self.lookup_local(ident.symbol).cloned() {
            if ident.is_templated() {
                self.error(format!("'{name}' does not take template arguments"));
                return None;
            }
            self.sem.set_ident(id, IdentKind::Value);
            return Some(Operand::Value(ty));
        }

        if let Some(&index) = self.globals.get(&ident.symbol) {
            if ident.is_templated() {
                self.error(format!("'{name}' does not take template arguments"));
                return None;
            }
            return match self.global(index) {
                Global::Value(ty) => {
                    self.sem.set_ident(id, IdentKind::Value);
                    Some(Operand::Value(ty))
                }
                Global::Type(ty) => {
                    self.sem.set_ident(id, IdentKind::Type { builtin: false });
                    Some(Operand::Type(ty))
                }
                Global::Function(_) => {
                    self.error(format!("cannot use function '{name}' as a value"));
                    None
                }
                Global::Invalid => None,
            };
        }

        if is_builtin_type(name) {
            return match self.builtin_type(ident)? {
                BuiltinType::Concrete(ty) => {
                    self.sem.set_ident(id, IdentKind::Type { builtin: true });
                    Some(Operand::Type(ty))
                }
                BuiltinType::Inferred(_) => {
                    self.error(format!("'{name}' requires template arguments"));
                    None
                }
            };
        }

        if is_builtin_enumerant(name) && !ident.is_templated() {
            self.sem.set_ident(id, IdentKind::BuiltinEnumerant);
            return Some(Operand::Enumerant);
        }

        self.error(format!("unresolved identifier '{name}'"));
        None
    }

    fn template_arg(&mut self, arg: &Expr) -> Option<TemplateArg> {
        match self.expr(arg)? {
            Operand::Type(ty) => Some(TemplateArg::Type(ty)),
            Operand::Enumerant => Some(TemplateArg::Enumerant(self.describe(arg).to_owned())),
            Operand::Value(_) => {
                let value = ConstEval {
                    program: self.program,
                    globals: &self.globals,
                }
                .int(arg);
                Some(TemplateArg::Value(value))
            }
        }
    }

    fn builtin_type(&mut self, ident: &Ident) -> Option<BuiltinType> {
        let args: Vec<Option<TemplateArg>> = ident
            .template_args
            .iter()
            .map(|arg| self.template_arg(arg))
            .collect();
        let args: Vec<TemplateArg> = args.into_iter().collect::<Option<_>>()?;
        match builtins::builtin_type(self.name(ident.symbol), &args) {
            Ok(ty) => Some(ty),
            Err(message) => {
                self.error(message);
                None
            }
        }
    }

    fn call(&mut self, id: NodeId, target: &Ident, arguments: &[Expr]) -> Option<Type> {
        let arg_types: Vec<Option<Type>> = arguments.iter().map(|arg| self.value(arg)).collect();
        let name = self.name(target.symbol);

        if self.lookup_local(target.symbol).is_some() {
            self.error(format!("'{name}' is not callable"));
            return None;
        }

        if let Some(&index) = self.globals.get(&target.symbol) {
            return match self.global(index) {
                Global::Function(ret) => {
                    self.sem.set_call(id, CallTarget::UserFunction);
                    Some(ret.unwrap_or(Type::Void))
                }
                Global::Type(ty) => {
                    self.sem.set_call(id, CallTarget::UserTypeConstructor);
                    Some(ty)
                }
                Global::Value(_) => {
                    self.error(format!("'{name}' is not callable"));
                    None
                }
                Global::Invalid => None,
            };
        }

        let arg_types: Vec<Type> = arg_types.into_iter().collect::<Option<_>>()?;

        if is_builtin_type(name) {
            let ty = match self.builtin_type(target)? {
                BuiltinType::Concrete(ty) => ty,
                BuiltinType::Inferred(shape) => {
                    match builtins::infer_constructor(shape, &arg_types) {
                        Some(ty) => ty,
                        None => {
                            self.error(format!("cannot infer the template arguments of '{name}'"));
                            return None;
                        }
                    }
                }
            };
            let target_kind = if is_conversion(&ty, &arg_types) {
                CallTarget::ValueConversion
            } else {
                CallTarget::ValueConstructor
            };
            self.sem.set_call(id, target_kind);
            return Some(ty);
        }

        if is_builtin_function(name) {
            let template = if name == "bitcast" {
                match &target.template_args[..] {
                    [ty] => Some(self.type_expr(ty)?),
                    _ => {
                        self.error("'bitcast' requires one template argument");
                        return None;
                    }
                }
            } else if target.is_templated() {
                self.error(format!("'{name}' does not take template arguments"));
                return None;
            } else {
                None
            };
            self.sem.set_call(id, CallTarget::BuiltinFunction);
            return Some(builtins::function_type(name, &arg_types, template.as_ref()));
        }

        self.error(format!("unresolved function '{name}'"));
        None
    }

    fn index(&mut self, base: Type) -> Option<Type> {
        match base.store_type() {
            Type::Vector { scalar, .. } => Some(Type::Scalar(*scalar)),
            Type::Matrix { rows, scalar, .. } => Some(Type::Vector {
                size: *rows,
                scalar: *scalar,
            }),
            Type::Array { base, .. } => Some((**base).clone()),
            other => {
                let other = self.describe_type(other);
                self.error(format!("cannot index a value of type '{other}'"));
                None
            }
        }
    }

    fn member(&mut self, id: NodeId, base: Type, member: &Ident) -> Option<Type> {
        let name = self.name(member.symbol);
        match base.store_type() {
            Type::Vector { size, scalar } => match swizzle_len(name, *size) {
                Some(1) => {
                    self.sem.set_member(id, MemberAccess::Swizzle);
                    Some(Type::Scalar(*scalar))
                }
                Some(len) => {
                    self.sem.set_member(id, MemberAccess::Swizzle);
                    VectorSize::from_count(len).map(|size| Type::Vector {
                        size,
                        scalar: *scalar,
                    })
                }
                None => {
                    self.error(format!("invalid vector swizzle '{name}'"));
                    None
                }
            },
            Type::Struct(struct_name) => {
                let found = self.structs.get(struct_name).and_then(|info| {
                    info.members
                        .iter()
                        .find(|(m, _)| *m == member.symbol)
                        .map(|(_, ty)| ty.clone())
                });
                match found {
                    Some(ty) => {
                        self.sem
                            .set_member(id, MemberAccess::Field { builtin_struct: false });
                        Some(ty)
                    }
                    None => {
                        let struct_name = self.name(*struct_name);
                        self.error(format!("struct '{struct_name}' has no member named '{name}'"));
                        None
                    }
                }
            }
            Type::BuiltinStruct(builtin) => match builtin.member(name) {
                Some(ty) => {
                    self.sem
                        .set_member(id, MemberAccess::Field { builtin_struct: true });
                    Some(ty)
                }
                None => {
                    self.error(format!("builtin structure has no member named '{name}'"));
                    None
                }
            },
            other => {
                let other = self.describe_type(other);
                self.error(format!("invalid member access '{name}' on type '{other}'"));
                None
            }
        }
    }

    fn unary(&mut self, op: UnaryOp, operand: Type) -> Option<Type> {
        match op {
            UnaryOp::Negate | UnaryOp::Not | UnaryOp::Complement => {
                Some(operand.store_type().clone())
            }
            UnaryOp::AddressOf => Some(Type::Pointer(Box::new(operand))),
            UnaryOp::Indirection => match operand {
                Type::Pointer(inner) => Some(*inner),
                other => {
                    let other = self.describe_type(&other);
                    self.error(format!("cannot dereference a value of type '{other}'"));
                    None
                }
            },
        }
    }
}

/// Number of components selected by a swizzle, if `name` is one for a
/// vector of `size` components.
fn swizzle_len(name: &str, size: VectorSize) -> Option<usize> {
    if !(1..=4).contains(&name.len()) {
        return None;
    }
    let within = |set: &str| {
        name.chars()
            .all(|c| set.find(c).is_some_and(|i| (i as u32) < size.count()))
    };
    (within("xyzw") || within("rgba")).then_some(name.len())
}

fn is_conversion(ty: &Type, args: &[Type]) -> bool {
    let [arg] = args else { return false };
    if !matches!(ty, Type::Scalar(_) | Type::Vector { .. }) {
        return false;
    }
    match (ty.scalar(), arg.store_type().scalar()) {
        (Some(to), Some(from)) => !from.is_abstract() && from != to,
        _ => false,
    }
}

fn binary_type(op: BinaryOp, left: &Type, right: &Type) -> Type {
    let l = left.store_type();
    let r = right.store_type();
    if op.is_comparison() {
        return match (l, r) {
            (Type::Vector { size, .. }, _) | (_, Type::Vector { size, .. }) => Type::Vector {
                size: *size,
                scalar: Scalar::BOOL,
            },
            _ => Type::Scalar(Scalar::BOOL),
        };
    }
    let scalar = match (l.scalar(), r.scalar()) {
        (Some(a), Some(b)) => builtins::unify_scalars(a, b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return l.clone(),
    };
    match (op, l, r) {
        (BinaryOp::LogicalAnd | BinaryOp::LogicalOr, _, _) => Type::Scalar(Scalar::BOOL),
        (BinaryOp::ShiftLeft | BinaryOp::ShiftRight, _, _) => l.clone(),
        (BinaryOp::Multiply, Type::Matrix { rows, .. }, Type::Vector { .. }) => Type::Vector {
            size: *rows,
            scalar,
        },
        (BinaryOp::Multiply, Type::Vector { .. }, Type::Matrix { columns, .. }) => {
            Type::Vector {
                size: *columns,
                scalar,
            }
        }
        (BinaryOp::Multiply, Type::Matrix { rows, .. }, Type::Matrix { columns, .. }) => {
            Type::Matrix {
                columns: *columns,
                rows: *rows,
                scalar,
            }
        }
        (_, Type::Matrix { columns, rows, .. }, _) | (_, _, Type::Matrix { columns, rows, .. }) => {
            Type::Matrix {
                columns: *columns,
                rows: *rows,
                scalar,
            }
        }
        (_, Type::Vector { size, .. }, _) | (_, _, Type::Vector { size, .. }) => Type::Vector {
            size: *size,
            scalar,
        },
        _ => Type::Scalar(scalar),
    }
}
