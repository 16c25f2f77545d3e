use crate::expr::Expr;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// NodeId
///
/// A handle into an [`Arena`]. The IR is a DAG, not a tree: the same node
/// may be reachable from more than one parent. Equality and identity are by handle, never
/// by following the node's own fields.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct NodeId(usize);

///
/// Arena
///
/// Owns every [`Expr`] node produced while compiling one query. Nodes are
/// appended and never removed or mutated in place (beyond the cardinality
/// cell inside `Expr` itself), so a `NodeId` handed out once stays valid for
/// the arena's whole lifetime.
///

#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: Vec<Expr>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Expr) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Expr {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Expr {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprKind;
    use crate::path_id::PathId;
    use crate::type_ref::{TypeRef, TypeRefId};

    fn leaf() -> Expr {
        Expr::new(
            PathId::root(),
            TypeRef::scalar(TypeRefId(1), crate::name::Name::simple("int64")),
            ExprKind::EmptySet,
        )
    }

    #[test]
    fn alloc_returns_stable_increasing_ids() {
        let mut arena = Arena::new();
        let a = arena.alloc(leaf());
        let b = arena.alloc(leaf());
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn shared_node_is_reachable_from_two_handles() {
        // Simulates a subexpression reused as a shape member: two places in
        // the caller's own structure can hold the same NodeId.
        let mut arena = Arena::new();
        let shared = arena.alloc(leaf());
        let holder_a = shared;
        let holder_b = shared;
        assert_eq!(holder_a, holder_b);
        assert!(std::ptr::eq(arena.get(holder_a), arena.get(holder_b)));
    }
}
