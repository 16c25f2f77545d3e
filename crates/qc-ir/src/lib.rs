//! Canonical intermediate representation shared between the front-end parser
//! and the back-end code generator.
//!
//! The tree is a DAG, not a tree: the same [`Set`](expr::Set) can appear both
//! as a subexpression and as a member of a shape. Nodes are allocated into an
//! [`Arena`](arena::Arena) and referenced by handle so that sharing is cheap
//! and equality is by handle, never by following back-pointers.

pub mod arena;
pub mod cardinality;
pub mod expr;
pub mod expr_box;
pub mod name;
pub mod path_id;
pub mod type_ref;

pub mod prelude {
    pub use crate::{
        arena::{Arena, NodeId},
        cardinality::{Cardinality, CardinalityCell},
        expr::{ConfigOp, Expr, ExprKind, ReversePointer, Set, Shape, Statement},
        expr_box::ExprBox,
        name::{ModuleName, Name},
        path_id::{Direction, Namespace, PathId, PathStep},
        type_ref::{CollectionKind, TypeRef, TypeRefId},
    };
}
