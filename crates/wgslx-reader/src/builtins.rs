//! Predeclared types and functions: how builtin type names turn into
//! [`Type`]s and what each builtin function returns.

use wgslx_ast::{ArraySize, BuiltinStruct, Scalar, ScalarKind, Type, VectorSize};

/// A resolved template argument.
#[derive(Clone, Debug)]
pub(crate) enum TemplateArg {
    Type(Type),
    /// A value; holds the constant integer it evaluates to, if any.
    Value(Option<i64>),
    Enumerant(String),
}

/// The shape of a constructor whose component type comes from its arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Inferred {
    Vector(VectorSize),
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
    },
    Array,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BuiltinType {
    Concrete(Type),
    /// `vec3`, `mat2x2` or `array` written without template arguments.
    Inferred(Inferred),
}

fn vector_size(digit: u8) -> Option<VectorSize> {
    VectorSize::from_count(usize::from(digit.wrapping_sub(b'0')))
}

fn suffix_scalar(suffix: &str) -> Option<Scalar> {
    match suffix {
        "f" => Some(Scalar::F32),
        "h" => Some(Scalar::F16),
        "i" => Some(Scalar::I32),
        "u" => Some(Scalar::U32),
        _ => None,
    }
}

fn single_scalar(name: &str, args: &[TemplateArg]) -> Result<Scalar, String> {
    match args {
        [TemplateArg::Type(Type::Scalar(s))] if !s.is_abstract() => Ok(*s),
        _ => Err(format!("'{name}' requires a scalar template argument")),
    }
}

fn texel_scalar(format: &str) -> Scalar {
    if format.ends_with("sint") {
        Scalar::I32
    } else if format.ends_with("uint") {
        Scalar::U32
    } else {
        Scalar::F32
    }
}

fn texture_dimensions(name: &str) -> u8 {
    if name.contains("1d") {
        1
    } else if name.contains("3d") {
        3
    } else {
        2
    }
}

/// Builds the type named by a builtin type name and its template arguments.
pub(crate) fn builtin_type(name: &str, args: &[TemplateArg]) -> Result<BuiltinType, String> {
    let no_args = |ty: Type| {
        if args.is_empty() {
            Ok(BuiltinType::Concrete(ty))
        } else {
            Err(format!("'{name}' does not take template arguments"))
        }
    };

    if let Some(scalar) = Scalar::from_name(name) {
        return no_args(Type::Scalar(scalar));
    }

    let bytes = name.as_bytes();
    if let Some(rest) = name.strip_prefix("vec").filter(|rest| !rest.is_empty()) {
        let size = vector_size(bytes[3]).ok_or_else(|| format!("unknown type '{name}'"))?;
        return match &rest[1..] {
            "" if args.is_empty() => Ok(BuiltinType::Inferred(Inferred::Vector(size))),
            "" => Ok(BuiltinType::Concrete(Type::Vector {
                size,
                scalar: single_scalar(name, args)?,
            })),
            suffix => {
                let scalar = suffix_scalar(suffix).ok_or_else(|| format!("unknown type '{name}'"))?;
                no_args(Type::Vector { size, scalar })
            }
        };
    }

    if name.starts_with("mat") && bytes.len() >= 6 {
        let columns = vector_size(bytes[3]).ok_or_else(|| format!("unknown type '{name}'"))?;
        let rows = vector_size(bytes[5]).ok_or_else(|| format!("unknown type '{name}'"))?;
        return match &name[6..] {
            "" if args.is_empty() => Ok(BuiltinType::Inferred(Inferred::Matrix { columns, rows })),
            "" => {
                let scalar = single_scalar(name, args)?;
                if scalar.kind != ScalarKind::Float {
                    return Err(format!("'{name}' requires a floating-point component type"));
                }
                Ok(BuiltinType::Concrete(Type::Matrix {
                    columns,
                    rows,
                    scalar,
                }))
            }
            suffix => {
                let scalar = suffix_scalar(suffix)
                    .filter(|s| s.kind == ScalarKind::Float)
                    .ok_or_else(|| format!("unknown type '{name}'"))?;
                no_args(Type::Matrix {
                    columns,
                    rows,
                    scalar,
                })
            }
        };
    }

    match name {
        "array" => match args {
            [] => Ok(BuiltinType::Inferred(Inferred::Array)),
            [TemplateArg::Type(base)] => Ok(BuiltinType::Concrete(Type::Array {
                base: Box::new(base.clone()),
                size: ArraySize::Dynamic,
            })),
            [TemplateArg::Type(base), TemplateArg::Value(count)] => {
                let size = match count {
                    Some(n) if *n > 0 => ArraySize::Constant(
                        u32::try_from(*n).map_err(|_| "array count is too large".to_owned())?,
                    ),
                    Some(_) => return Err("array count must be greater than 0".to_owned()),
                    // Sized by an override expression.
                    None => ArraySize::Dynamic,
                };
                Ok(BuiltinType::Concrete(Type::Array {
                    base: Box::new(base.clone()),
                    size,
                }))
            }
            _ => Err("'array' requires an element type and an optional count".to_owned()),
        },
        "atomic" => {
            let scalar = single_scalar(name, args)?;
            if scalar != Scalar::I32 && scalar != Scalar::U32 {
                return Err("atomic component type must be 'i32' or 'u32'".to_owned());
            }
            Ok(BuiltinType::Concrete(Type::Atomic(scalar)))
        }
        "ptr" => match args {
            [TemplateArg::Enumerant(_), TemplateArg::Type(store)]
            | [
                TemplateArg::Enumerant(_),
                TemplateArg::Type(store),
                TemplateArg::Enumerant(_),
            ] => Ok(BuiltinType::Concrete(Type::Pointer(Box::new(store.clone())))),
            _ => Err("'ptr' requires an address space, a store type and an optional access mode"
                .to_owned()),
        },
        "sampler" => no_args(Type::Sampler { comparison: false }),
        "sampler_comparison" => no_args(Type::Sampler { comparison: true }),
        "texture_external" => no_args(Type::Texture {
            depth: false,
            dimensions: 2,
            sampled: Scalar::F32,
        }),
        _ if name.starts_with("texture_depth_") => no_args(Type::Texture {
            depth: true,
            dimensions: texture_dimensions(name),
            sampled: Scalar::F32,
        }),
        _ if name.starts_with("texture_storage_") => match args {
            [TemplateArg::Enumerant(format), TemplateArg::Enumerant(_)] => {
                Ok(BuiltinType::Concrete(Type::Texture {
                    depth: false,
                    dimensions: texture_dimensions(name),
                    sampled: texel_scalar(format),
                }))
            }
            _ => Err(format!("'{name}' requires a texel format and an access mode")),
        },
        _ if name.starts_with("texture_") => {
            let sampled = single_scalar(name, args)?;
            Ok(BuiltinType::Concrete(Type::Texture {
                depth: false,
                dimensions: texture_dimensions(name),
                sampled,
            }))
        }
        _ => Err(format!("unknown type '{name}'")),
    }
}

/// The scalar two operands convert to. Abstract scalars give way to
/// concrete ones and abstract integers to abstract floats.
pub(crate) fn unify_scalars(a: Scalar, b: Scalar) -> Scalar {
    match (a.is_abstract(), b.is_abstract()) {
        _ if a == b => a,
        (true, false) => b,
        (false, true) => a,
        (true, true) => Scalar::ABSTRACT_FLOAT,
        (false, false) => a,
    }
}

/// The type a `let`, `var` or `override` takes from an abstract initializer.
pub(crate) fn concretize(ty: &Type) -> Type {
    match ty {
        Type::Scalar(s) => Type::Scalar(s.concretize()),
        Type::Vector { size, scalar } => Type::Vector {
            size: *size,
            scalar: scalar.concretize(),
        },
        Type::Matrix {
            columns,
            rows,
            scalar,
        } => Type::Matrix {
            columns: *columns,
            rows: *rows,
            scalar: scalar.concretize(),
        },
        Type::Array { base, size } => Type::Array {
            base: Box::new(concretize(base)),
            size: *size,
        },
        other => other.clone(),
    }
}

/// Infers the type of a constructor written without template arguments.
pub(crate) fn infer_constructor(shape: Inferred, args: &[Type]) -> Option<Type> {
    let first = args.first()?;
    match shape {
        Inferred::Vector(size) => {
            let scalar = args
                .iter()
                .filter_map(|t| t.store_type().scalar())
                .reduce(unify_scalars)?;
            Some(Type::Vector { size, scalar })
        }
        Inferred::Matrix { columns, rows } => {
            let scalar = args
                .iter()
                .filter_map(|t| t.store_type().scalar())
                .reduce(unify_scalars)?;
            let scalar = if scalar == Scalar::ABSTRACT_INT {
                Scalar::ABSTRACT_FLOAT
            } else {
                scalar
            };
            Some(Type::Matrix {
                columns,
                rows,
                scalar,
            })
        }
        Inferred::Array => Some(Type::Array {
            base: Box::new(first.store_type().clone()),
            size: ArraySize::Constant(u32::try_from(args.len()).ok()?),
        }),
    }
}

fn vec(size: VectorSize, scalar: Scalar) -> Type {
    Type::Vector { size, scalar }
}

/// Return type of a call to the builtin function `name`.
///
/// Arguments that failed to resolve are already reported, so missing
/// information degrades to [`Type::Void`] instead of another error.
pub(crate) fn function_type(name: &str, args: &[Type], template: Option<&Type>) -> Type {
    let first = args
        .first()
        .map(|t| t.store_type().clone())
        .unwrap_or(Type::Void);
    let first_scalar = first.scalar().map(Type::Scalar).unwrap_or(Type::Void);
    let texture = args.iter().find_map(|t| match t.store_type() {
        Type::Texture {
            depth,
            dimensions,
            sampled,
        } => Some((*depth, *dimensions, *sampled)),
        _ => None,
    });

    match name {
        "all" | "any" | "subgroupElect" | "subgroupAll" | "subgroupAny" => {
            Type::Scalar(Scalar::BOOL)
        }
        "arrayLength" | "pack2x16float" | "pack2x16snorm" | "pack2x16unorm" | "pack4x8snorm"
        | "pack4x8unorm" | "pack4xI8" | "pack4xI8Clamp" | "pack4xU8" | "pack4xU8Clamp"
        | "dot4U8Packed" | "textureNumLayers" | "textureNumLevels" | "textureNumSamples" => {
            Type::Scalar(Scalar::U32)
        }
        "dot4I8Packed" => Type::Scalar(Scalar::I32),
        "dot" | "length" | "distance" | "determinant" => first_scalar,
        "transpose" => match first {
            Type::Matrix {
                columns,
                rows,
                scalar,
            } => Type::Matrix {
                columns: rows,
                rows: columns,
                scalar,
            },
            other => other,
        },
        "frexp" => Type::BuiltinStruct(BuiltinStruct::Frexp(Box::new(first))),
        "modf" => Type::BuiltinStruct(BuiltinStruct::Modf(Box::new(first))),
        "atomicStore" | "storageBarrier" | "workgroupBarrier" | "textureBarrier"
        | "textureStore" => Type::Void,
        "atomicCompareExchangeWeak" => match first.scalar() {
            Some(scalar) => Type::BuiltinStruct(BuiltinStruct::AtomicCompareExchange(scalar)),
            None => Type::Void,
        },
        _ if name.starts_with("atomic") => first_scalar,
        "workgroupUniformLoad" => first,
        "bitcast" => template.cloned().unwrap_or(Type::Void),
        "unpack4x8snorm" | "unpack4x8unorm" => vec(VectorSize::Quad, Scalar::F32),
        "unpack2x16float" | "unpack2x16snorm" | "unpack2x16unorm" => {
            vec(VectorSize::Bi, Scalar::F32)
        }
        "unpack4xI8" => vec(VectorSize::Quad, Scalar::I32),
        "unpack4xU8" | "subgroupBallot" => vec(VectorSize::Quad, Scalar::U32),
        "textureDimensions" => match texture {
            Some((_, 1, _)) => Type::Scalar(Scalar::U32),
            Some((_, dims, _)) => vec(
                VectorSize::from_count(usize::from(dims)).unwrap_or(VectorSize::Bi),
                Scalar::U32,
            ),
            None => Type::Void,
        },
        "textureSampleCompare" | "textureSampleCompareLevel" => Type::Scalar(Scalar::F32),
        "textureGatherCompare" => vec(VectorSize::Quad, Scalar::F32),
        "textureGather" => match texture {
            Some((_, _, sampled)) => vec(VectorSize::Quad, sampled),
            None => Type::Void,
        },
        "textureSample"
        | "textureSampleBias"
        | "textureSampleGrad"
        | "textureSampleLevel"
        | "textureSampleBaseClampToEdge"
        | "textureLoad" => match texture {
            Some((true, _, _)) => Type::Scalar(Scalar::F32),
            Some((false, _, sampled)) => vec(VectorSize::Quad, sampled),
            None => Type::Void,
        },
        // Component-wise builtins return their first argument's type.
        _ => first,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concrete(name: &str, args: &[TemplateArg]) -> Type {
        match builtin_type(name, args) {
            Ok(BuiltinType::Concrete(ty)) => ty,
            other => panic!("'{name}' did not build a concrete type: {other:?}"),
        }
    }

    #[test]
    fn short_and_long_vector_spellings_agree() {
        let long = concrete("vec4", &[TemplateArg::Type(Type::Scalar(Scalar::F32))]);
        assert_eq!(long, concrete("vec4f", &[]));
        assert_eq!(
            builtin_type("vec3", &[]),
            Ok(BuiltinType::Inferred(Inferred::Vector(VectorSize::Tri)))
        );
        assert!(builtin_type("vec4f", &[TemplateArg::Type(Type::Scalar(Scalar::F32))]).is_err());
    }

    #[test]
    fn matrices_require_float_components() {
        assert_eq!(
            concrete("mat2x3h", &[]),
            Type::Matrix {
                columns: VectorSize::Bi,
                rows: VectorSize::Tri,
                scalar: Scalar::F16,
            }
        );
        assert!(builtin_type("mat2x2", &[TemplateArg::Type(Type::Scalar(Scalar::I32))]).is_err());
        assert!(builtin_type("mat2x2i", &[]).is_err());
    }

    #[test]
    fn arrays() {
        let elem = TemplateArg::Type(Type::Scalar(Scalar::U32));
        assert_eq!(
            concrete("array", &[elem.clone(), TemplateArg::Value(Some(4))]),
            Type::Array {
                base: Box::new(Type::Scalar(Scalar::U32)),
                size: ArraySize::Constant(4),
            }
        );
        assert!(builtin_type("array", &[elem.clone(), TemplateArg::Value(Some(0))]).is_err());
        assert!(matches!(
            concrete("array", &[elem]),
            Type::Array {
                size: ArraySize::Dynamic,
                ..
            }
        ));
    }

    #[test]
    fn storage_texture_texel_type() {
        let ty = concrete(
            "texture_storage_2d",
            &[
                TemplateArg::Enumerant("rgba8uint".into()),
                TemplateArg::Enumerant("write".into()),
            ],
        );
        assert_eq!(
            ty,
            Type::Texture {
                depth: false,
                dimensions: 2,
                sampled: Scalar::U32,
            }
        );
    }

    #[test]
    fn scalar_unification() {
        assert_eq!(unify_scalars(Scalar::ABSTRACT_INT, Scalar::F32), Scalar::F32);
        assert_eq!(
            unify_scalars(Scalar::ABSTRACT_INT, Scalar::ABSTRACT_FLOAT),
            Scalar::ABSTRACT_FLOAT
        );
        assert_eq!(unify_scalars(Scalar::U32, Scalar::ABSTRACT_INT), Scalar::U32);
    }

    #[test]
    fn inferred_constructors() {
        let args = [Type::Scalar(Scalar::ABSTRACT_INT), Type::Scalar(Scalar::F32)];
        assert_eq!(
            infer_constructor(Inferred::Vector(VectorSize::Bi), &args),
            Some(vec(VectorSize::Bi, Scalar::F32))
        );
        assert_eq!(
            infer_constructor(Inferred::Array, &args[..1]),
            Some(Type::Array {
                base: Box::new(Type::Scalar(Scalar::ABSTRACT_INT)),
                size: ArraySize::Constant(1),
            })
        );
        assert_eq!(infer_constructor(Inferred::Array, &[]), None);
    }

    #[test]
    fn function_return_types() {
        let v3 = vec(VectorSize::Tri, Scalar::F32);
        assert_eq!(function_type("normalize", &[v3.clone()], None), v3);
        assert_eq!(
            function_type("length", &[v3.clone()], None),
            Type::Scalar(Scalar::F32)
        );
        assert_eq!(
            function_type("modf", &[v3.clone()], None),
            Type::BuiltinStruct(BuiltinStruct::Modf(Box::new(v3)))
        );
        let atomic = Type::Pointer(Box::new(Type::Atomic(Scalar::U32)));
        assert_eq!(
            function_type("atomicAdd", &[atomic, Type::Scalar(Scalar::U32)], None),
            Type::Scalar(Scalar::U32)
        );
        let tex = Type::Texture {
            depth: true,
            dimensions: 2,
            sampled: Scalar::F32,
        };
        assert_eq!(
            function_type("textureDimensions", &[tex.clone()], None),
            vec(VectorSize::Bi, Scalar::U32)
        );
        assert_eq!(
            function_type("textureLoad", &[tex], None),
            Type::Scalar(Scalar::F32)
        );
    }
}
