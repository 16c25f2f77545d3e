use crate::error::{QueryError, QueryResult};
use qc_ir::arena::NodeId;
use qc_schema::schema::Schema;
use qc_schema::types::{CollectionType, Type};

///
/// CommonArg
///
/// One argument observed by [`infer_common_type`]: either already typed, or
/// an `EmptySet` node recorded for later amendment.
///

#[derive(Clone, Debug)]
pub enum CommonArg {
    Typed(Type),
    Empty(NodeId),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Partition {
    Object,
    Scalar,
    Collection,
}

fn partition_of(ty: &Type) -> Partition {
    match ty {
        Type::Object(_) => Partition::Object,
        Type::Scalar(_) | Type::Pseudo(_) => Partition::Scalar,
        Type::Collection(_) => Partition::Collection,
    }
}

/// `find_common_implicitly_castable_type`: the common type of two
/// scalar or collection types, folding via implicit-cast rank for numeric
/// scalars, exact match for everything else, and element-wise recursion for
/// collections. Returns `None` on incompatibility.
#[must_use]
pub fn find_common_implicitly_castable_type(a: &Type, b: &Type) -> Option<Type> {
    match (a, b) {
        (Type::Scalar(ida), Type::Scalar(idb)) if ida == idb => Some(a.clone()),
        (Type::Pseudo(_), other) | (other, Type::Pseudo(_)) => Some(other.clone()),
        (Type::Collection(CollectionType::Array(ea)), Type::Collection(CollectionType::Array(eb))) => {
            find_common_implicitly_castable_type(ea, eb)
                .map(|common| Type::Collection(CollectionType::Array(Box::new(common))))
        }
        (Type::Collection(CollectionType::Tuple(ta)), Type::Collection(CollectionType::Tuple(tb)))
            if ta.len() == tb.len() =>
        {
            let mut out = Vec::with_capacity(ta.len());
            for (x, y) in ta.iter().zip(tb) {
                out.push(find_common_implicitly_castable_type(x, y)?);
            }
            Some(Type::Collection(CollectionType::Tuple(out)))
        }
        _ => None,
    }
}

/// Implicit numeric widening used when both sides are concrete numeric
/// scalars backed by `qc_schema::types::Primitive` (looked up by the
/// caller, since `Type::Scalar` only carries an id here). Exposed
/// separately so `infer.rs` can resolve the backing `Primitive` via the
/// schema before delegating to rank comparison.
#[must_use]
pub fn common_numeric_primitive(
    a: qc_schema::types::Primitive,
    b: qc_schema::types::Primitive,
) -> Option<qc_schema::types::Primitive> {
    let (ra, rb) = (a.numeric_rank()?, b.numeric_rank()?);
    Some(if ra >= rb { a } else { b })
}

/// `infer_common_type`: partition the observed argument types into
/// {object, scalar, collection}; disallow mixed partitions; fold scalars and
/// collections pairwise; take the nearest common ancestor for objects.
pub fn infer_common_type(
    observed: &[CommonArg],
    schema: &Schema,
    context: &str,
) -> QueryResult<Type> {
    let typed: Vec<&Type> = observed
        .iter()
        .filter_map(|a| match a {
            CommonArg::Typed(t) => Some(t),
            CommonArg::Empty(_) => None,
        })
        .collect();

    if typed.is_empty() {
        return Err(QueryError::EmptySetType {
            context: context.to_string(),
        });
    }

    let first_partition = partition_of(typed[0]);
    if typed.iter().any(|t| partition_of(t) != first_partition) {
        return Err(QueryError::NoCommonType {
            context: context.to_string(),
        });
    }

    match first_partition {
        Partition::Object => {
            let ids: Vec<_> = typed
                .iter()
                .map(|t| match t {
                    Type::Object(id) => *id,
                    _ => unreachable!("partition guard ensures all are Object"),
                })
                .collect();
            schema
                .nearest_common_ancestor(&ids)
                .map(Type::Object)
                .map_err(|_| QueryError::NoCommonType {
                    context: context.to_string(),
                })
        }
        Partition::Scalar | Partition::Collection => {
            let mut acc = typed[0].clone();
            for t in &typed[1..] {
                acc = find_common_implicitly_castable_type(&acc, t).ok_or_else(|| {
                    QueryError::IncompatibleCommonType {
                        context: context.to_string(),
                    }
                })?;
            }
            Ok(acc)
        }
    }
}
