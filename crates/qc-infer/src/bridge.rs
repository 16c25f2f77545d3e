use qc_ir::type_ref::{CollectionKind, TypeRef};
use qc_schema::id::ObjectId;
use qc_schema::types::{CollectionType, PseudoType, Type};

/// Resolve a `TypeRef` to the schema `Type` it describes.
///
/// A `TypeRef`'s id is hash-consed (qc_ir::type_ref): by construction in
/// this workspace, a scalar or object `TypeRef`'s id is always the raw
/// `ObjectId` of the schema object it was derived from — `TypeRef` exists
/// purely so code generation does not need to hold a live `&Schema`, not to
/// introduce a second identity space. Collection and pseudo types carry no schema object at all and are
/// allocated on the fly, so they are reconstructed structurally
/// instead of looked up.
#[must_use]
pub fn type_ref_to_schema_type(type_ref: &TypeRef) -> Type {
    if let Some(collection) = &type_ref.collection {
        let subtypes: Vec<Type> = collection
            .subtypes
            .iter()
            .map(type_ref_to_schema_type)
            .collect();
        let coll = match collection.kind {
            CollectionKind::Array => {
                CollectionType::Array(Box::new(subtypes.into_iter().next().unwrap_or(
                    Type::Pseudo(PseudoType::Anytype),
                )))
            }
            CollectionKind::Tuple => CollectionType::Tuple(subtypes),
            CollectionKind::NamedTuple => {
                let names = collection.element_names.clone().unwrap_or_default();
                CollectionType::NamedTuple(names.into_iter().zip(subtypes).collect())
            }
        };
        return Type::Collection(coll);
    }

    if type_ref.is_scalar {
        return Type::Scalar(ObjectId(type_ref.id.0));
    }

    Type::Object(ObjectId(type_ref.id.0))
}

/// The inverse direction, used when a freshly computed `Type` (e.g. a common
/// type folded from several operands) needs to be attached to a new node as
/// a `TypeRef`.
#[must_use]
pub fn schema_type_to_type_ref(schema: &qc_schema::schema::Schema, ty: &Type) -> TypeRef {
    match ty {
        Type::Scalar(id) => {
            let name = schema
                .get_scalar(*id)
                .map(|s| s.base.name.clone())
                .unwrap_or_else(|| qc_ir::name::Name::simple("<unknown scalar>"));
            TypeRef::scalar(qc_ir::type_ref::TypeRefId(id.0), name)
        }
        Type::Object(id) => {
            let (name, is_abstract) = schema
                .get_object(*id)
                .map(|o| (o.base.name.clone(), o.is_abstract()))
                .unwrap_or_else(|| (qc_ir::name::Name::simple("<unknown object>"), false));
            TypeRef::object(qc_ir::type_ref::TypeRefId(id.0), name, is_abstract)
        }
        Type::Collection(CollectionType::Array(inner)) => TypeRef::array(
            qc_ir::type_ref::TypeRefId(0),
            schema_type_to_type_ref(schema, inner),
        ),
        Type::Collection(CollectionType::Tuple(elems)) => {
            let refs = elems
                .iter()
                .map(|t| schema_type_to_type_ref(schema, t))
                .collect();
            TypeRef::tuple(qc_ir::type_ref::TypeRefId(0), refs, None)
        }
        Type::Collection(CollectionType::NamedTuple(elems)) => {
            let names = elems.iter().map(|(n, _)| n.clone()).collect();
            let refs = elems
                .iter()
                .map(|(_, t)| schema_type_to_type_ref(schema, t))
                .collect();
            TypeRef::tuple(qc_ir::type_ref::TypeRefId(0), refs, Some(names))
        }
        Type::Pseudo(_) => {
            TypeRef::scalar(qc_ir::type_ref::TypeRefId(0), qc_ir::name::Name::simple("anytype"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_ir::type_ref::TypeRefId;

    #[test]
    fn scalar_type_ref_round_trips_id() {
        let tref = TypeRef::scalar(TypeRefId(42), Name::simple("int64"));
        let ty = type_ref_to_schema_type(&tref);
        assert_eq!(ty, Type::Scalar(ObjectId(42)));
    }

    #[test]
    fn array_type_ref_becomes_collection_array() {
        let elem = TypeRef::scalar(TypeRefId(1), Name::simple("int64"));
        let arr = TypeRef::array(TypeRefId(99), elem);
        let ty = type_ref_to_schema_type(&arr);
        assert!(matches!(ty, Type::Collection(CollectionType::Array(_))));
    }
}
