use crate::name::Name;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// TypeRefId
///
/// TypeRefs are hash-consed by id: two `TypeRef`s describing the same
/// schema type carry the same id, so code generation can compare ids instead
/// of deep-structural type equality.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TypeRefId(pub u128);

///
/// CollectionKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Array,
    Tuple,
    NamedTuple,
}

///
/// TypeRef
///
/// A descriptor duplicating schema type information in a form convenient
/// for code generation: id, name hint, collection kind and subtypes,
/// union/intersection members, material type (for views), and
/// abstract/scalar/view/opaque flags. `TypeRef`s never hold a live schema
/// reference; they are cheap, `Clone`-able snapshots.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: TypeRefId,
    pub name_hint: Option<Name>,
    pub is_abstract: bool,
    pub is_scalar: bool,
    pub is_view: bool,
    pub is_opaque: bool,
    /// For a view, the concrete type actually materialized in storage.
    pub material_type: Option<Box<TypeRef>>,
    pub collection: Option<CollectionTypeRef>,
    /// Non-empty for a union or intersection type; empty otherwise.
    pub union_of: Vec<TypeRef>,
    pub intersection_of: Vec<TypeRef>,
}

impl TypeRef {
    #[must_use]
    pub fn scalar(id: TypeRefId, name_hint: Name) -> Self {
        Self {
            id,
            name_hint: Some(name_hint),
            is_abstract: false,
            is_scalar: true,
            is_view: false,
            is_opaque: false,
            material_type: None,
            collection: None,
            union_of: Vec::new(),
            intersection_of: Vec::new(),
        }
    }

    #[must_use]
    pub fn object(id: TypeRefId, name_hint: Name, is_abstract: bool) -> Self {
        Self {
            id,
            name_hint: Some(name_hint),
            is_abstract,
            is_scalar: false,
            is_view: false,
            is_opaque: false,
            material_type: None,
            collection: None,
            union_of: Vec::new(),
            intersection_of: Vec::new(),
        }
    }

    #[must_use]
    pub fn array(id: TypeRefId, element: TypeRef) -> Self {
        Self {
            id,
            name_hint: None,
            is_abstract: false,
            is_scalar: false,
            is_view: false,
            is_opaque: false,
            material_type: None,
            collection: Some(CollectionTypeRef {
                kind: CollectionKind::Array,
                subtypes: vec![element],
                element_names: None,
            }),
            union_of: Vec::new(),
            intersection_of: Vec::new(),
        }
    }

    #[must_use]
    pub fn tuple(id: TypeRefId, elements: Vec<TypeRef>, names: Option<Vec<String>>) -> Self {
        let kind = if names.is_some() {
            CollectionKind::NamedTuple
        } else {
            CollectionKind::Tuple
        };
        Self {
            id,
            name_hint: None,
            is_abstract: false,
            is_scalar: false,
            is_view: false,
            is_opaque: false,
            material_type: None,
            collection: Some(CollectionTypeRef {
                kind,
                subtypes: elements,
                element_names: names,
            }),
            union_of: Vec::new(),
            intersection_of: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection.is_some()
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        !self.union_of.is_empty()
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        !self.is_scalar && self.collection.is_none() && self.union_of.is_empty()
    }

    /// The type a query planner should actually read storage through: the
    /// material type for a view, `self` otherwise.
    #[must_use]
    pub fn effective(&self) -> &TypeRef {
        self.material_type.as_deref().unwrap_or(self)
    }
}

///
/// CollectionTypeRef
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CollectionTypeRef {
    pub kind: CollectionKind,
    pub subtypes: Vec<TypeRef>,
    pub element_names: Option<Vec<String>>,
}
