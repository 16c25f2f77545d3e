//! The persistent object schema model: names, types, pointers,
//! auxiliary objects, and the immutable `Schema` value that holds them.

pub mod aux;
pub mod error;
pub mod id;
pub mod object;
pub mod pointer;
pub mod schema;
pub mod types;

pub mod prelude {
    pub use crate::{
        aux::{Annotation, Cast, Constraint, ConstraintKind, Function, Index, Operator, Parameter},
        error::{SchemaError, SchemaResult},
        id::{IdAllocator, ObjectId},
        object::{FieldValue, SchemaObject, SchemaObjectBase},
        pointer::{OnTargetDelete, Pointer, PointerCardinality, PointerDirection, PointerKind, Upper},
        schema::{DeleteOutcome, Referrer, Schema},
        types::{
            CollectionType, ObjectType, ObjectTypeKind, Primitive, PseudoType, ScalarKind,
            ScalarType, Type,
        },
    };
}
