use crate::arena::{Arena, NodeId};
use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// ExprBox
///
/// A deferred-compiled expression: a
/// source-language expression value that carries its original text, an
/// optional parsed tree (opaque to this crate — owned by the out-of-scope
/// parser), and an optional compiled IR node. The lazy fields are populated
/// on demand by the caller and must be cleared again before the box crosses
/// a serialization boundary, since neither the parsed tree nor a `NodeId`
/// into someone else's arena is meaningful once detached from the compiling
/// session.
///
/// `refs` is the authoritative dependency list used for schema diffing: the
/// set of schema objects this expression's compiled form refers to. It is
/// populated alongside `compiled` and is the only part of the box that
/// survives serialization.
///

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExprBox {
    pub text: String,
    #[serde(skip)]
    compiled: Option<NodeId>,
    refs: BTreeSet<Name>,
}

impl ExprBox {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            compiled: None,
            refs: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    #[must_use]
    pub fn compiled(&self) -> Option<NodeId> {
        self.compiled
    }

    /// Attach a compiled IR node and its reference set. Called once by
    /// whatever owns the `Arena` the compiled form was allocated into.
    pub fn set_compiled(&mut self, node: NodeId, refs: impl IntoIterator<Item = Name>) {
        self.compiled = Some(node);
        self.refs = refs.into_iter().collect();
    }

    /// Clear the lazy fields ahead of a serialization boundary. `refs` is
    /// kept: it is the authoritative dependency list and must survive.
    pub fn clear_lazy(&mut self) {
        self.compiled = None;
    }

    #[must_use]
    pub fn refs(&self) -> &BTreeSet<Name> {
        &self.refs
    }

    /// True if the box depends on `name`, used by schema diffing to decide
    /// whether an altered schema object invalidates this expression.
    #[must_use]
    pub fn depends_on(&self, name: &Name) -> bool {
        self.refs.contains(name)
    }
}

/// Sanity check that an `ExprBox`'s compiled node, if present, actually
/// resolves in the given arena. Used by debug assertions in the delta
/// dispatcher before it trusts a cached compiled form.
#[must_use]
pub fn compiled_node_is_valid(expr_box: &ExprBox, arena: &Arena) -> bool {
    match expr_box.compiled() {
        Some(id) => arena.contains(id),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_box_is_not_compiled() {
        let b = ExprBox::from_text(".name");
        assert!(!b.is_compiled());
        assert!(b.refs().is_empty());
    }

    #[test]
    fn clear_lazy_drops_compiled_but_keeps_refs() {
        let mut arena = Arena::new();
        let node = arena.alloc(crate::expr::Set::new(
            crate::path_id::PathId::root(),
            crate::type_ref::TypeRef::scalar(crate::type_ref::TypeRefId(1), Name::simple("x")),
        ));
        let mut b = ExprBox::from_text(".name");
        b.set_compiled(node, [Name::simple("User"), Name::simple("name")]);
        assert!(b.is_compiled());

        b.clear_lazy();
        assert!(!b.is_compiled());
        assert!(b.depends_on(&Name::simple("User")), "refs survive clearing");
    }
}
