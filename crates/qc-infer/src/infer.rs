use crate::bridge::type_ref_to_schema_type;
use crate::common::{infer_common_type, CommonArg};
use crate::env::InferEnv;
use crate::error::{QueryError, QueryResult};
use qc_ir::arena::{Arena, NodeId};
use qc_ir::expr::{ExprKind, Statement};
use qc_ir::name::Name;
use qc_schema::schema::Schema;
use qc_schema::types::{CollectionType, Primitive, ScalarKind, Type};

fn describe(ty: &Type) -> String {
    format!("{ty:?}")
}

fn is_indexable(env: &InferEnv, ty: &Type) -> bool {
    match ty {
        Type::Collection(CollectionType::Array(_)) => true,
        Type::Pseudo(_) => true,
        Type::Scalar(id) => env.schema.get_scalar(*id).is_some_and(|s| {
            matches!(
                s.kind,
                ScalarKind::Primitive(Primitive::Str)
                    | ScalarKind::Primitive(Primitive::Bytes)
                    | ScalarKind::Primitive(Primitive::Json)
            )
        }),
        _ => false,
    }
}

fn is_integer_scalar(env: &InferEnv, ty: &Type) -> bool {
    match ty {
        Type::Scalar(id) => env.schema.get_scalar(*id).is_some_and(|s| match &s.kind {
            ScalarKind::Primitive(p) => matches!(p, Primitive::Int16 | Primitive::Int32 | Primitive::Int64),
            ScalarKind::Enum(_) => false,
        }),
        _ => false,
    }
}

fn is_string_scalar(env: &InferEnv, ty: &Type) -> bool {
    match ty {
        Type::Scalar(id) => env
            .schema
            .get_scalar(*id)
            .is_some_and(|s| matches!(s.kind, ScalarKind::Primitive(Primitive::Str))),
        _ => false,
    }
}

fn is_json_indexable_operand(ty: &Type, env: &InferEnv) -> bool {
    match ty {
        Type::Pseudo(_) => true,
        Type::Scalar(id) => env
            .schema
            .get_scalar(*id)
            .is_some_and(|s| matches!(s.kind, ScalarKind::Primitive(Primitive::Json))),
        _ => false,
    }
}

/// A json operand additionally accepts a string key; everything else
/// (array, string, bytes) requires an integer index.
fn is_valid_index_type(env: &InferEnv, operand_ty: &Type, index_ty: &Type) -> bool {
    if is_integer_scalar(env, index_ty) {
        return true;
    }
    is_json_indexable_operand(operand_ty, env) && is_string_scalar(env, index_ty)
}

fn int64_scalar_type(schema: &Schema) -> Option<Type> {
    schema
        .scalars()
        .find(|s| matches!(s.kind, ScalarKind::Primitive(Primitive::Int64)))
        .map(|s| Type::Scalar(s.base.id))
}

fn element_type_of(ty: &Type) -> Type {
    match ty {
        Type::Collection(CollectionType::Array(inner)) => (**inner).clone(),
        other => other.clone(),
    }
}

/// Record the common type onto every `CommonArg::Empty` in `observed`, both
/// in `env`'s amended-type map and by re-deriving the node's own `PathId`
/// into the `__derived__` namespace, so a later lookup of either the node's
/// type or its path sees the amendment rather than its original empty state.
fn amend_empties(observed: &[CommonArg], result: &Type, arena: &mut Arena, env: &mut InferEnv) {
    for arg in observed {
        if let CommonArg::Empty(node) = arg {
            env.amend_empty_set(*node, result.clone());
            let rptr = Name::simple(format!("empty~{node}"));
            let rederived = arena.get(*node).path_id.rederive_in_derived_module(rptr);
            arena.get_mut(*node).path_id = rederived;
        }
    }
}

/// `infer_type`: the per-`ExprKind` dispatch table. Memoized per node
/// within `env` so a node reachable from two shapes is only inferred once.
pub fn infer_type(node: NodeId, arena: &mut Arena, env: &mut InferEnv) -> QueryResult<Type> {
    if let Some(ty) = env.memoized(node) {
        return Ok(ty.clone());
    }

    let set = arena.get(node);
    let context = format!("node {node}");

    let ty = match set.expr.as_deref() {
        None => {
            return Err(QueryError::EmptySetType { context });
        }
        Some(ExprKind::EmptySet) => {
            return Err(QueryError::EmptySetType { context });
        }

        // Literals, parameters, calls and introspection are typed upstream
        // (by the out-of-scope parser/catalog) and simply carry the right
        // TypeRef on the node; inference here is a read, not a computation.
        Some(
            ExprKind::Literal(_)
            | ExprKind::Parameter { .. }
            | ExprKind::FunctionCall { .. }
            | ExprKind::OperatorCall { .. }
            | ExprKind::TypeIntrospection { .. }
            | ExprKind::TypeCheckOp { .. },
        ) => type_ref_to_schema_type(&set.type_ref),

        Some(ExprKind::TypeCast { target, .. }) => {
            if target.is_object() && target.is_abstract && target.collection.is_none() {
                // Abstract, non-collection cast targets with no name hint at
                // all are the generic/polymorphic case.
                if target.name_hint.is_none() {
                    return Err(QueryError::CastIntoGenericType {
                        context,
                        target: "<anonymous>".to_string(),
                    });
                }
            }
            type_ref_to_schema_type(target)
        }

        Some(ExprKind::SetConstructor { elements }) => {
            let elements = elements.clone();
            let observed = observe(&elements, arena, env)?;
            let common = infer_common_type(&observed, env.schema, &context)?;
            amend_empties(&observed, &common, arena, env);
            common
        }

        Some(ExprKind::ArrayConstructor {
            elements,
            declared_type,
        }) => {
            if let Some(declared) = declared_type {
                type_ref_to_schema_type(declared)
            } else {
                let elements = elements.clone();
                let observed = observe(&elements, arena, env)?;
                let elem_ty = infer_common_type(&observed, env.schema, &context)?;
                amend_empties(&observed, &elem_ty, arena, env);
                Type::Collection(CollectionType::Array(Box::new(elem_ty)))
            }
        }

        Some(ExprKind::TupleConstructor { elements, names }) => {
            let elements = elements.clone();
            let names = names.clone();
            let mut member_types = Vec::with_capacity(elements.len());
            for el in elements {
                member_types.push(infer_type(el, arena, env)?);
            }
            match names {
                Some(names) => Type::Collection(CollectionType::NamedTuple(
                    names.into_iter().zip(member_types).collect(),
                )),
                None => Type::Collection(CollectionType::Tuple(member_types)),
            }
        }

        Some(ExprKind::SliceIndirection {
            operand,
            start,
            stop,
        }) => {
            let (operand, start, stop) = (*operand, *start, *stop);
            let operand_ty = infer_type(operand, arena, env)?;
            if !is_indexable(env, &operand_ty) {
                return Err(QueryError::IllegalSlice {
                    context,
                    operand_type: describe(&operand_ty),
                    index_type: "slice bound".to_string(),
                });
            }
            for bound in [start, stop].into_iter().flatten() {
                infer_slice_bound(bound, arena, env, &context)?;
            }
            operand_ty
        }

        Some(ExprKind::IndexIndirection { operand, index }) => {
            let (operand, index) = (*operand, *index);
            let operand_ty = infer_type(operand, arena, env)?;
            let index_ty = infer_type(index, arena, env)?;
            if !is_indexable(env, &operand_ty) || !is_valid_index_type(env, &operand_ty, &index_ty) {
                return Err(QueryError::IllegalIndex {
                    context,
                    operand_type: describe(&operand_ty),
                    index_type: describe(&index_ty),
                });
            }
            element_type_of(&operand_ty)
        }

        Some(ExprKind::Statement(stmt)) => {
            let stmt = stmt.clone();
            infer_statement(&stmt, arena, env, &context)?
        }
    };

    env.memoize(node, ty.clone());
    Ok(ty)
}

/// Infer and validate one `SliceIndirection` bound (`start` or `stop`).
/// Slice bounds must be implicitly castable to int64; an `EmptySet` bound is
/// amended to int64 rather than rejected, matching the treatment of any
/// other empty-typed argument to a common-type computation.
fn infer_slice_bound(
    bound: NodeId,
    arena: &mut Arena,
    env: &mut InferEnv,
    context: &str,
) -> QueryResult<()> {
    let is_empty = matches!(arena.get(bound).expr.as_deref(), Some(ExprKind::EmptySet) | None);
    if is_empty {
        let Some(int64) = int64_scalar_type(env.schema) else {
            return Err(QueryError::EmptySetType {
                context: context.to_string(),
            });
        };
        amend_empties(&[CommonArg::Empty(bound)], &int64, arena, env);
        return Ok(());
    }

    let bound_ty = infer_type(bound, arena, env)?;
    if !is_integer_scalar(env, &bound_ty) {
        return Err(QueryError::IllegalSlice {
            context: context.to_string(),
            operand_type: describe(&bound_ty),
            index_type: "slice bound".to_string(),
        });
    }
    Ok(())
}

fn infer_statement(
    stmt: &Statement,
    arena: &mut Arena,
    env: &mut InferEnv,
    context: &str,
) -> QueryResult<Type> {
    match stmt {
        Statement::Select { result, .. }
        | Statement::Update { result, .. }
        | Statement::Delete { result, .. }
        | Statement::Group { result, .. }
        | Statement::For { result, .. }
        | Statement::With { result, .. } => infer_type(*result, arena, env),

        Statement::Insert {
            result,
            on_conflict_else,
            ..
        } => {
            let result_ty = infer_type(*result, arena, env)?;
            match on_conflict_else {
                None => Ok(result_ty),
                Some(else_node) => {
                    let else_ty = infer_type(*else_node, arena, env)?;
                    infer_common_type(
                        &[CommonArg::Typed(result_ty), CommonArg::Typed(else_ty)],
                        env.schema,
                        context,
                    )
                }
            }
        }

        Statement::Configure(_) => Ok(Type::Pseudo(qc_schema::types::PseudoType::Anytype)),
    }
}

fn observe(nodes: &[NodeId], arena: &mut Arena, env: &mut InferEnv) -> QueryResult<Vec<CommonArg>> {
    let mut out = Vec::with_capacity(nodes.len());
    for &n in nodes {
        let is_empty = matches!(arena.get(n).expr.as_deref(), Some(ExprKind::EmptySet) | None);
        if is_empty {
            out.push(CommonArg::Empty(n));
        } else {
            out.push(CommonArg::Typed(infer_type(n, arena, env)?));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_ir::path_id::PathId;
    use qc_ir::type_ref::{TypeRef, TypeRefId};
    use qc_schema::id::ObjectId;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::schema::Schema;
    use qc_schema::types::{ScalarType, Type as SchemaType};

    fn tref(id: u128) -> TypeRef {
        TypeRef::scalar(TypeRefId(id), Name::simple("int64"))
    }

    fn schema_with_int64() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType {
            base: SchemaObjectBase::new(id, Name::simple("int64")),
            kind: ScalarKind::Primitive(Primitive::Int64),
        });
        (schema, id)
    }

    fn schema_with_json() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType {
            base: SchemaObjectBase::new(id, Name::simple("json")),
            kind: ScalarKind::Primitive(Primitive::Json),
        });
        (schema, id)
    }

    fn schema_with_str() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType {
            base: SchemaObjectBase::new(id, Name::simple("str")),
            kind: ScalarKind::Primitive(Primitive::Str),
        });
        (schema, id)
    }

    #[test]
    fn literal_infers_from_its_own_type_ref() {
        let mut arena = Arena::new();
        let node = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(7),
            ExprKind::Literal(qc_ir::expr::Literal::Int64(1)),
        ));
        let schema = Schema::new(1);
        let mut env = InferEnv::new(&schema);
        let ty = infer_type(node, &mut arena, &mut env).unwrap();
        assert_eq!(ty, Type::Scalar(qc_schema::id::ObjectId(7)));
    }

    #[test]
    fn bare_empty_set_fails_type_inference() {
        let mut arena = Arena::new();
        let node = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(1),
            ExprKind::EmptySet,
        ));
        let schema = Schema::new(1);
        let mut env = InferEnv::new(&schema);
        let err = infer_type(node, &mut arena, &mut env).unwrap_err();
        assert!(matches!(err, QueryError::EmptySetType { .. }));
    }

    #[test]
    fn select_statement_infers_to_its_result_type() {
        let mut arena = Arena::new();
        let lit = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(3),
            ExprKind::Literal(qc_ir::expr::Literal::Int64(42)),
        ));
        let select = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(3),
            ExprKind::Statement(Statement::Select {
                result: lit,
                filter: None,
                orderby: Vec::new(),
            }),
        ));
        let schema = Schema::new(1);
        let mut env = InferEnv::new(&schema);
        let ty = infer_type(select, &mut arena, &mut env).unwrap();
        assert_eq!(ty, Type::Scalar(qc_schema::id::ObjectId(3)));
    }

    #[test]
    fn type_check_op_reads_bool_from_its_own_type_ref() {
        let mut arena = Arena::new();
        let operand = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(1),
            ExprKind::Literal(qc_ir::expr::Literal::Bool(true)),
        ));
        let bool_ref = TypeRef::scalar(TypeRefId(99), Name::simple("bool"));
        let check = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            bool_ref,
            ExprKind::TypeCheckOp {
                left: operand,
                right: tref(1),
                op: qc_ir::expr::TypeCheckKind::Is,
            },
        ));
        let schema = Schema::new(1);
        let mut env = InferEnv::new(&schema);
        let ty = infer_type(check, &mut arena, &mut env).unwrap();
        assert_eq!(ty, Type::Scalar(qc_schema::id::ObjectId(99)));
    }

    #[test]
    fn empty_set_mixed_into_array_constructor_is_amended_to_the_common_type() {
        let (schema, int_id) = schema_with_int64();
        let mut arena = Arena::new();
        let empty = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(1),
            ExprKind::EmptySet,
        ));
        let one = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(int_id.0 as u128), Name::simple("int64")),
            ExprKind::Literal(qc_ir::expr::Literal::Int64(1)),
        ));
        let array = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(1),
            ExprKind::ArrayConstructor {
                elements: vec![empty, one],
                declared_type: None,
            },
        ));
        let mut env = InferEnv::new(&schema);
        let ty = infer_type(array, &mut arena, &mut env).unwrap();
        assert_eq!(
            ty,
            Type::Collection(CollectionType::Array(Box::new(SchemaType::Scalar(int_id))))
        );
        assert_eq!(env.amended_type_of(empty), Some(&SchemaType::Scalar(int_id)));
        assert!(arena
            .get(empty)
            .path_id
            .steps()
            .last()
            .unwrap()
            .namespace
            .is_derived());
    }

    #[test]
    fn slice_with_empty_start_amends_it_to_int64() {
        let (mut schema, int_id) = schema_with_int64();
        let str_id = ObjectId(77);
        schema.add_scalar(ScalarType {
            base: SchemaObjectBase::new(str_id, Name::simple("str")),
            kind: ScalarKind::Primitive(Primitive::Str),
        });

        let mut arena = Arena::new();
        let operand = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(str_id.0 as u128), Name::simple("str")),
            ExprKind::Parameter {
                name: "s".to_string(),
            },
        ));
        let start = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            tref(1),
            ExprKind::EmptySet,
        ));
        let slice = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(str_id.0 as u128), Name::simple("str")),
            ExprKind::SliceIndirection {
                operand,
                start: Some(start),
                stop: None,
            },
        ));
        let mut env = InferEnv::new(&schema);
        infer_type(slice, &mut arena, &mut env).unwrap();
        assert_eq!(env.amended_type_of(start), Some(&SchemaType::Scalar(int_id)));
    }

    #[test]
    fn json_operand_accepts_string_index() {
        let (mut schema, json_id) = schema_with_json();
        let str_id = {
            let id = schema.id_alloc.next();
            schema.add_scalar(ScalarType {
                base: SchemaObjectBase::new(id, Name::simple("str")),
                kind: ScalarKind::Primitive(Primitive::Str),
            });
            id
        };
        let mut arena = Arena::new();
        let operand = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(json_id.0 as u128), Name::simple("json")),
            ExprKind::Parameter {
                name: "doc".to_string(),
            },
        ));
        let index = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(str_id.0 as u128), Name::simple("str")),
            ExprKind::Literal(qc_ir::expr::Literal::Str("k".to_string())),
        ));
        let idx_expr = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(json_id.0 as u128), Name::simple("json")),
            ExprKind::IndexIndirection { operand, index },
        ));
        let mut env = InferEnv::new(&schema);
        let ty = infer_type(idx_expr, &mut arena, &mut env).unwrap();
        assert_eq!(ty, Type::Scalar(json_id));
    }

    #[test]
    fn array_index_rejects_string_key() {
        let (mut schema, str_id) = schema_with_str();
        let elem_id = {
            let id = schema.id_alloc.next();
            schema.add_scalar(ScalarType {
                base: SchemaObjectBase::new(id, Name::simple("int64")),
                kind: ScalarKind::Primitive(Primitive::Int64),
            });
            id
        };
        let mut arena = Arena::new();
        let operand = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::array(TypeRefId(2), TypeRef::scalar(TypeRefId(elem_id.0 as u128), Name::simple("int64"))),
            ExprKind::Parameter {
                name: "arr".to_string(),
            },
        ));
        let index = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(str_id.0 as u128), Name::simple("str")),
            ExprKind::Literal(qc_ir::expr::Literal::Str("k".to_string())),
        ));
        let idx_expr = arena.alloc(qc_ir::expr::Expr::new_kind(
            PathId::root(),
            TypeRef::scalar(TypeRefId(elem_id.0 as u128), Name::simple("int64")),
            ExprKind::IndexIndirection { operand, index },
        ));
        let mut env = InferEnv::new(&schema);
        let err = infer_type(idx_expr, &mut arena, &mut env).unwrap_err();
        assert!(matches!(err, QueryError::IllegalIndex { .. }));
    }
}
