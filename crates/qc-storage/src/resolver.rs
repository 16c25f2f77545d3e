use qc_schema::object::SchemaObject;
use qc_schema::pointer::{Pointer, PointerKind};
use qc_schema::schema::Schema;
use qc_schema::types::{Primitive, ScalarKind, Type};

///
/// TableKind
///
/// Where a pointer's value physically lives: inline on the source
/// type's own table, or in a dedicated link table keyed by `(source,
/// target)`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableKind {
    SourceInline,
    LinkTable,
}

///
/// ColumnType
///
/// A backend-facing column type, already resolved from the schema `Type`
///. Object references always store as
/// `Uuid` (the object identity column); collections, which have no single
/// scalar backend column type, are stored as `Json`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnType {
    Uuid,
    Text,
    Bool,
    Bytes,
    Json,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Numeric,
    Timestamptz,
    Interval,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uuid => "uuid",
            Self::Text => "text",
            Self::Bool => "boolean",
            Self::Bytes => "bytea",
            Self::Json => "jsonb",
            Self::Int16 => "smallint",
            Self::Int32 => "integer",
            Self::Int64 => "bigint",
            Self::Float32 => "real",
            Self::Float64 => "double precision",
            Self::Numeric => "numeric",
            Self::Timestamptz => "timestamptz",
            Self::Interval => "interval",
        };
        f.write_str(s)
    }
}

fn primitive_column_type(p: Primitive) -> ColumnType {
    match p {
        Primitive::Bool => ColumnType::Bool,
        Primitive::Str => ColumnType::Text,
        Primitive::Bytes => ColumnType::Bytes,
        Primitive::Json => ColumnType::Json,
        Primitive::Int16 => ColumnType::Int16,
        Primitive::Int32 => ColumnType::Int32,
        Primitive::Int64 => ColumnType::Int64,
        Primitive::Float32 => ColumnType::Float32,
        Primitive::Float64 => ColumnType::Float64,
        Primitive::Decimal => ColumnType::Numeric,
        Primitive::Uuid => ColumnType::Uuid,
        Primitive::Datetime => ColumnType::Timestamptz,
        Primitive::Duration => ColumnType::Interval,
    }
}

/// Resolve the backend column type a schema `Type` would be stored as.
/// Object references always resolve to `Uuid` (the identity column); enum
/// scalars store as `Text` (the enum's own backend domain is a separate
/// DDL concern, out of scope here); collections fall back to `Json`.
#[must_use]
pub fn column_type_of(schema: &Schema, ty: &Type) -> ColumnType {
    match ty {
        Type::Object(_) => ColumnType::Uuid,
        Type::Scalar(id) => schema
            .get_scalar(*id)
            .map(|s| match &s.kind {
                ScalarKind::Primitive(p) => primitive_column_type(*p),
                ScalarKind::Enum(_) => ColumnType::Text,
            })
            .unwrap_or(ColumnType::Text),
        Type::Collection(_) | Type::Pseudo(_) => ColumnType::Json,
    }
}

///
/// StorageInfo
///
/// The resolved physical layout of one pointer.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageInfo {
    pub table_kind: TableKind,
    pub table_name: String,
    pub column_name: String,
    pub column_type: ColumnType,
}

fn table_name_for_object(schema: &Schema, id: qc_schema::id::ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

/// `resolve`: given a pointer, return its physical layout, or
/// `None` if the pointer is computable/derived and therefore has no storage
/// at all.
///
/// Rule, verbatim from the design notes: a link, a multi pointer, or a link
/// with link properties lives in a dedicated link table; everything else
/// (a scalar, single, non-link-property pointer) is a column inline on the
/// source type's own table.
#[must_use]
pub fn resolve(schema: &Schema, pointer: &Pointer) -> Option<StorageInfo> {
    if pointer.is_derived() {
        return None;
    }

    let needs_link_table =
        pointer.is_link() || pointer.cardinality.is_multi() || pointer.has_link_properties();

    let column_name = pointer.name().local_name().to_lowercase();
    let source_table = table_name_for_object(schema, pointer.source);

    if needs_link_table {
        Some(StorageInfo {
            table_kind: TableKind::LinkTable,
            table_name: format!("{source_table}_{column_name}_link"),
            column_name: "target".to_string(),
            column_type: ColumnType::Uuid,
        })
    } else {
        Some(StorageInfo {
            table_kind: TableKind::SourceInline,
            table_name: source_table,
            column_name,
            column_type: column_type_of(schema, &pointer.target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::id::ObjectId;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::pointer::{PointerCardinality, PointerKind};
    use qc_schema::types::{ObjectType, ObjectTypeKind};
    use rstest::rstest;

    fn schema_with_source() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        let base = SchemaObjectBase::new(id, Name::simple("User"));
        schema.add_object(ObjectType::new(base, ObjectTypeKind::Concrete));
        (schema, id)
    }

    #[test]
    fn scalar_single_property_is_source_inline() {
        let (schema, source) = schema_with_source();
        let ptr_id = schema.id_alloc.next();
        let ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("age")),
            PointerKind::Property,
            source,
            Type::Scalar(ObjectId(500)),
            PointerCardinality::single_optional(),
        );
        let info = resolve(&schema, &ptr).unwrap();
        assert_eq!(info.table_kind, TableKind::SourceInline);
        assert_eq!(info.table_name, "user");
        assert_eq!(info.column_name, "age");
    }

    #[test]
    fn single_link_still_uses_a_link_table() {
        let (schema, source) = schema_with_source();
        let ptr_id = schema.id_alloc.next();
        let ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("best_friend")),
            PointerKind::Link {
                allows_link_properties: false,
            },
            source,
            Type::Object(ObjectId(501)),
            PointerCardinality::single_optional(),
        );
        let info = resolve(&schema, &ptr).unwrap();
        assert_eq!(info.table_kind, TableKind::LinkTable);
        assert_eq!(info.table_name, "user_best_friend_link");
    }

    #[test]
    fn computable_pointer_has_no_storage() {
        let (schema, source) = schema_with_source();
        let ptr_id = schema.id_alloc.next();
        let mut ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("full_name")),
            PointerKind::Property,
            source,
            Type::Scalar(ObjectId(500)),
            PointerCardinality::single_optional(),
        );
        ptr.computable = Some(qc_ir::expr_box::ExprBox::from_text(".first ++ ' ' ++ .last"));
        assert!(resolve(&schema, &ptr).is_none());
    }

    #[rstest]
    #[case(Primitive::Int64, ColumnType::Int64)]
    #[case(Primitive::Str, ColumnType::Text)]
    #[case(Primitive::Bool, ColumnType::Bool)]
    fn primitive_maps_to_expected_column_type(#[case] p: Primitive, #[case] expected: ColumnType) {
        assert_eq!(primitive_column_type(p), expected);
    }
}
