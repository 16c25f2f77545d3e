use qc_ir::arena::NodeId;
use qc_schema::schema::Schema;
use qc_schema::types::Type;
use std::collections::HashMap;

///
/// InferEnv
///
/// The mutable context threaded through `infer_type`: the schema
/// handle queries are resolved against, a memoization map from IR node
/// identity to inferred type (inference never runs twice for the same node
/// within one env), and the `set_types` patch map recording the types
/// amended onto originally-`EmptySet` nodes.
///

pub struct InferEnv<'s> {
    pub schema: &'s Schema,
    memo: HashMap<NodeId, Type>,
    set_types: HashMap<NodeId, Type>,
}

impl<'s> InferEnv<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            memo: HashMap::new(),
            set_types: HashMap::new(),
        }
    }

    #[must_use]
    pub fn memoized(&self, node: NodeId) -> Option<&Type> {
        self.memo.get(&node)
    }

    pub fn memoize(&mut self, node: NodeId, ty: Type) {
        self.memo.insert(node, ty);
    }

    /// Record the type amended onto an originally-`EmptySet` node. Also updates the memo map so a subsequent
    /// `infer_type` call on the same node sees the patched type rather than
    /// re-raising "cannot determine the type of an empty set".
    pub fn amend_empty_set(&mut self, node: NodeId, ty: Type) {
        self.set_types.insert(node, ty.clone());
        self.memo.insert(node, ty);
    }

    #[must_use]
    pub fn set_types(&self) -> &HashMap<NodeId, Type> {
        &self.set_types
    }

    #[must_use]
    pub fn amended_type_of(&self, node: NodeId) -> Option<&Type> {
        self.set_types.get(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_schema::id::ObjectId;

    #[test]
    fn amend_empty_set_populates_both_maps() {
        let schema = Schema::new(1);
        let mut env = InferEnv::new(&schema);
        let node = NodeId::default();
        env.amend_empty_set(node, Type::Scalar(ObjectId(1)));

        assert_eq!(
            env.amended_type_of(node),
            Some(&Type::Scalar(ObjectId(1)))
        );
        assert_eq!(env.memoized(node), Some(&Type::Scalar(ObjectId(1))));
    }
}
