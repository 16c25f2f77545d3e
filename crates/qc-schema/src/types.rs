use crate::id::ObjectId;
use crate::object::{SchemaObject, SchemaObjectBase};
use derive_more::Display;
use qc_ir::name::Name;
use serde::{Deserialize, Serialize};

///
/// Primitive
///
/// Base scalar kinds. Mirrors the shape of a typed primitive registry
/// (grounded on `icydb-schema::types::Primitive`) but trimmed to the
/// families this compiler's type inference and backend translation actually
/// branch on.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Str,
    Bytes,
    Json,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Uuid,
    Datetime,
    Duration,
}

impl Primitive {
    /// Implicit-cast rank used by `find_common_implicitly_castable_type`
    ///: a higher rank can always represent a lower one. Families with
    /// no implicit relationship (e.g. `Str` vs `Int64`) return `None` from
    /// the comparison in `common.rs`, not from this table.
    #[must_use]
    pub const fn numeric_rank(self) -> Option<u8> {
        match self {
            Self::Int16 => Some(0),
            Self::Int32 => Some(1),
            Self::Int64 => Some(2),
            Self::Float32 => Some(3),
            Self::Float64 => Some(4),
            Self::Decimal => Some(5),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }
}

///
/// ScalarType
///
/// A primitive or an enum. Enum values are ordered: order matters for
/// the backend DDL translator's enum-evolution rules.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    pub base: SchemaObjectBase,
    pub kind: ScalarKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ScalarKind {
    Primitive(Primitive),
    Enum(Vec<String>),
}

impl ScalarType {
    #[must_use]
    pub fn primitive(base: SchemaObjectBase, primitive: Primitive) -> Self {
        Self {
            base,
            kind: ScalarKind::Primitive(primitive),
        }
    }

    #[must_use]
    pub fn new_enum(base: SchemaObjectBase, values: Vec<String>) -> Self {
        Self {
            base,
            kind: ScalarKind::Enum(values),
        }
    }

    #[must_use]
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            ScalarKind::Enum(values) => Some(values),
            ScalarKind::Primitive(_) => None,
        }
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, ScalarKind::Enum(_))
    }
}

impl SchemaObject for ScalarType {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// ObjectTypeKind
///
/// Whether an `ObjectType` is a plain concrete record, abstract, a compound type (union/intersection, never physically
/// stored), or a view.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ObjectTypeKind {
    Concrete,
    Abstract,
    Union(Vec<ObjectId>),
    Intersection(Vec<ObjectId>),
    View { material_type: ObjectId },
}

///
/// ObjectType
///
/// A user-defined record type with pointers.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub base: SchemaObjectBase,
    pub kind: ObjectTypeKind,
    pub pointers: Vec<ObjectId>,
}

impl ObjectType {
    #[must_use]
    pub fn new(base: SchemaObjectBase, kind: ObjectTypeKind) -> Self {
        Self {
            base,
            kind,
            pointers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        matches!(self.kind, ObjectTypeKind::Abstract)
    }

    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(
            self.kind,
            ObjectTypeKind::Union(_) | ObjectTypeKind::Intersection(_)
        )
    }

    #[must_use]
    pub const fn is_view(&self) -> bool {
        matches!(self.kind, ObjectTypeKind::View { .. })
    }

    /// True when the type needs a backing table at all: not
    /// abstract, not a compound type, not a view.
    #[must_use]
    pub const fn has_backing_table(&self) -> bool {
        matches!(self.kind, ObjectTypeKind::Concrete)
    }
}

impl SchemaObject for ObjectType {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// CollectionType
///
/// Parameterized containers: `Array<T>`, `Tuple<…>`, or a named tuple
///. Collection types are allocated on demand during type inference
/// rather than declared, so they carry no independent identity
/// beyond their shape — two collection types with the same shape compare
/// equal.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CollectionType {
    Array(Box<Type>),
    Tuple(Vec<Type>),
    NamedTuple(Vec<(String, Type)>),
}

///
/// PseudoType
///
/// Polymorphic placeholders: `Anytype`, `Anytuple`. A cast into a
/// pseudo type always fails.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PseudoType {
    Anytype,
    Anytuple,
}

///
/// Type
///
/// The sum of every first-class type kind. This is the schema-side
/// counterpart to `qc_ir::TypeRef`: `Type` is the authoritative value held by
/// the schema, `TypeRef` is the codegen-facing snapshot derived from it.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Scalar(ObjectId),
    Object(ObjectId),
    Collection(CollectionType),
    Pseudo(PseudoType),
}

impl Type {
    #[must_use]
    pub const fn is_pseudo(&self) -> bool {
        matches!(self, Self::Pseudo(_))
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}
