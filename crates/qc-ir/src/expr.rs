use crate::arena::NodeId;
use crate::cardinality::CardinalityCell;
use crate::name::Name;
use crate::path_id::PathId;
use crate::type_ref::TypeRef;
use serde::{Deserialize, Serialize};

///
/// ReversePointer
///
/// How a `Set` was reached from its parent in a path expression, e.g. the
/// `.friends` in `User.friends`. `None` for a root set.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReversePointer {
    pub pointer_name: Name,
    pub is_link_property: bool,
}

///
/// Shape
///
/// The set of pointer projections requested on an object set, e.g. the
/// `{ name, friends: { name } }` of a shaped query. Each element references
/// another `Set` node in the owning [`Arena`](crate::arena::Arena).
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub elements: Vec<ShapeElement>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub name: Name,
    pub set: NodeId,
    pub is_computable: bool,
}

///
/// Set
///
/// Every compiled expression is a `Set`: a wrapper carrying a [`PathId`], a
/// [`TypeRef`], an optional inner expression node, an optional reverse
/// pointer annotation, and shape metadata.
///
/// All fields except `cardinality` are frozen at construction; cardinality is
/// assigned post-construction by a later inference pass.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Set {
    pub path_id: PathId,
    pub type_ref: TypeRef,
    pub expr: Option<Box<ExprKind>>,
    pub rptr: Option<ReversePointer>,
    pub shape: Shape,
    #[serde(skip)]
    pub cardinality: CardinalityCell,
}

impl Set {
    #[must_use]
    pub fn new(path_id: PathId, type_ref: TypeRef) -> Self {
        Self {
            path_id,
            type_ref,
            expr: None,
            rptr: None,
            shape: Shape::default(),
            cardinality: CardinalityCell::default(),
        }
    }

    #[must_use]
    pub fn with_expr(mut self, expr: ExprKind) -> Self {
        self.expr = Some(Box::new(expr));
        self
    }

    #[must_use]
    pub const fn is_empty_set(&self) -> bool {
        matches!(self.expr.as_deref(), Some(ExprKind::EmptySet) | None) && self.rptr.is_none()
    }
}

///
/// Expr
///
/// One arena-allocated IR node. Distinct from [`Set`] (the typed wrapper): an
/// `Expr` is the thing a `NodeId` points to, and is itself a `Set` plus
/// whatever inner variant it carries. Kept as a thin wrapper so the arena can
/// be generic over "a node", while call sites keep working with `Set`'s
/// richer API.
///

pub type Expr = Set;

impl Expr {
    #[must_use]
    pub fn new_kind(path_id: PathId, type_ref: TypeRef, kind: ExprKind) -> Self {
        Self::new(path_id, type_ref).with_expr(kind)
    }
}

///
/// ExprKind
///
/// Inner expression nodes: constants, parameters, function and
/// operator calls, type casts, type-introspection, set constructors,
/// tuple/array constructors, slice and index operations, and statements.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExprKind {
    /// A set with no elements and no assigned type; amended later by common
    /// type inference.
    EmptySet,
    Literal(Literal),
    Parameter {
        name: String,
    },
    FunctionCall {
        func_name: Name,
        args: Vec<NodeId>,
    },
    OperatorCall {
        op_name: Name,
        args: Vec<NodeId>,
    },
    TypeCast {
        operand: NodeId,
        target: TypeRef,
    },
    TypeIntrospection {
        operand: NodeId,
    },
    TypeCheckOp {
        left: NodeId,
        right: TypeRef,
        op: TypeCheckKind,
    },
    SetConstructor {
        elements: Vec<NodeId>,
    },
    ArrayConstructor {
        elements: Vec<NodeId>,
        declared_type: Option<TypeRef>,
    },
    TupleConstructor {
        elements: Vec<NodeId>,
        names: Option<Vec<String>>,
    },
    SliceIndirection {
        operand: NodeId,
        start: Option<NodeId>,
        stop: Option<NodeId>,
    },
    IndexIndirection {
        operand: NodeId,
        index: NodeId,
    },
    Statement(Statement),
}

///
/// TypeCheckKind
///
/// `IS` / `IS NOT` type-check operators; always infer to `bool`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TypeCheckKind {
    Is,
    IsNot,
}

///
/// Literal
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

///
/// Statement
///
/// SELECT, INSERT, UPDATE, DELETE, GROUP, FOR, WITH and CONFIGURE statements.
/// A statement's inferred type is the type of its `result` expression,
/// with `InsertStmt` taking the common type of `result` and any
/// `ON CONFLICT ... ELSE` branch.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Statement {
    Select {
        result: NodeId,
        filter: Option<NodeId>,
        orderby: Vec<NodeId>,
    },
    Insert {
        subject: TypeRef,
        result: NodeId,
        on_conflict_else: Option<NodeId>,
    },
    Update {
        subject: TypeRef,
        result: NodeId,
        filter: Option<NodeId>,
    },
    Delete {
        subject: TypeRef,
        result: NodeId,
        filter: Option<NodeId>,
    },
    Group {
        subject: NodeId,
        by: Vec<NodeId>,
        result: NodeId,
    },
    For {
        iterator: NodeId,
        result: NodeId,
    },
    With {
        bindings: Vec<(Name, NodeId)>,
        result: NodeId,
    },
    Configure(ConfigOp),
}

///
/// ConfigOp
///
/// `CONFIGURE SET` / `CONFIGURE RESET` / `CONFIGURE INSERT` statements.
/// These infer to the `anytype` pseudo-type placeholder, reproduced here
/// rather than silently given a more precise type, because downstream
/// callers depend on the placeholder.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConfigOp {
    Set { name: Name, value: NodeId },
    Reset { name: Name },
    Insert { name: Name, value: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ref::TypeRefId;

    fn tref() -> TypeRef {
        TypeRef::scalar(TypeRefId(1), Name::simple("int64"))
    }

    #[test]
    fn fresh_set_has_no_expr_and_counts_as_empty() {
        let set = Set::new(PathId::root(), tref());
        assert!(set.is_empty_set());
    }

    #[test]
    fn set_with_literal_is_not_empty() {
        let set =
            Set::new(PathId::root(), tref()).with_expr(ExprKind::Literal(Literal::Int64(1)));
        assert!(!set.is_empty_set());
    }

    #[test]
    fn explicit_empty_set_kind_is_empty() {
        let set = Set::new(PathId::root(), tref()).with_expr(ExprKind::EmptySet);
        assert!(set.is_empty_set());
    }
}
