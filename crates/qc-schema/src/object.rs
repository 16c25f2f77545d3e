use crate::id::ObjectId;
use qc_ir::name::Name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// FieldValue
///
/// A schema object's "bag of named fields" is heterogeneous: some
/// fields are plain scalars (annotations, comments), others reference other
/// objects by id. Kept untyped here so every subtype can reuse the same
/// storage without each needing its own struct-of-options.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Ref(ObjectId),
    RefList(Vec<ObjectId>),
}

///
/// SchemaObjectBase
///
/// Common header shared by every schema object: an immutable 128-bit
/// identity, a qualified name, the direct base set, the transitively-closed
/// ancestor set (by convention containing the object itself last), and a
/// bag of named fields for subtype-specific attributes that don't warrant
/// their own struct field.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchemaObjectBase {
    pub id: ObjectId,
    pub name: Name,
    pub direct_bases: Vec<ObjectId>,
    pub ancestors: Vec<ObjectId>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl SchemaObjectBase {
    #[must_use]
    pub fn new(id: ObjectId, name: Name) -> Self {
        Self {
            id,
            name,
            direct_bases: Vec::new(),
            ancestors: vec![id],
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_bases(mut self, direct_bases: Vec<ObjectId>, ancestors: Vec<ObjectId>) -> Self {
        self.direct_bases = direct_bases;
        self.ancestors = ancestors;
        if !self.ancestors.contains(&self.id) {
            self.ancestors.push(self.id);
        }
        self
    }

    #[must_use]
    pub fn is_subclass_of(&self, other: ObjectId) -> bool {
        self.ancestors.contains(&other)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Every schema object exposes its common header through this trait so that
/// generic code (referrer indexing, ancestor walks, name resolution) can
/// operate uniformly over `ScalarType`, `ObjectType`, `Pointer`, and the
/// auxiliary object kinds.
pub trait SchemaObject {
    fn base(&self) -> &SchemaObjectBase;

    fn id(&self) -> ObjectId {
        self.base().id
    }

    fn name(&self) -> &Name {
        &self.base().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestor_set_always_contains_self_last_by_convention() {
        let base = SchemaObjectBase::new(ObjectId(1), Name::simple("Foo"))
            .with_bases(vec![ObjectId(0)], vec![ObjectId(0)]);
        assert_eq!(base.ancestors.last(), Some(&ObjectId(1)));
        assert!(base.is_subclass_of(ObjectId(0)));
        assert!(base.is_subclass_of(ObjectId(1)));
    }
}
