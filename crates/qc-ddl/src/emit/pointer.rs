use crate::op::{ColumnDef, PgOp};
use crate::view::InheritanceViewManager;
use qc_schema::id::ObjectId;
use qc_schema::object::{FieldValue, SchemaObject};
use qc_schema::pointer::Pointer;
use qc_schema::schema::Schema;
use qc_storage::resolver::{self, ColumnType, StorageInfo, TableKind};
use std::collections::BTreeMap;

fn table_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

fn column_def(info: &StorageInfo, not_null: bool) -> ColumnDef {
    ColumnDef {
        name: info.column_name.clone(),
        sql_type: info.column_type.to_string(),
        not_null,
    }
}

/// `Create`: derived pointers carry no
/// storage. Everything else either gets its own link table or a new column
/// on the owning object's table, then the owner's inheritance view is marked
/// dirty since its column projection just changed.
pub fn create(schema: &mut Schema, ptr: Pointer, ops: &mut Vec<PgOp>, views: &mut InheritanceViewManager) {
    let id = ptr.id();
    let source = ptr.source;
    let required = ptr.cardinality.required;
    views.snapshot_columns(schema, source);
    schema.add_pointer(ptr);

    let Some(info) = resolver::resolve(schema, schema.get_pointer(id).expect("just inserted")) else {
        return;
    };

    match info.table_kind {
        TableKind::LinkTable => {
            ops.push(PgOp::CreateTable {
                table: info.table_name.clone(),
                columns: vec![
                    ColumnDef { name: "source".to_string(), sql_type: ColumnType::Uuid.to_string(), not_null: true },
                    ColumnDef { name: "target".to_string(), sql_type: ColumnType::Uuid.to_string(), not_null: true },
                ],
            });
        }
        TableKind::SourceInline => {
            ops.push(PgOp::AlterTableAddColumn {
                table: table_name(schema, source),
                column: column_def(&info, required),
            });
        }
    }
    views.mark_dirty(source);
}

/// `Alter`. Reads three optional keys off the command's field map:
/// `cardinality` (`"single"`/`"multi"`), `required` (bool), `target_type`
/// (backend type name for a USING-clause cast).
pub fn alter(
    schema: &Schema,
    id: ObjectId,
    fields: &BTreeMap<String, FieldValue>,
    ops: &mut Vec<PgOp>,
) {
    let Some(ptr) = schema.get_pointer(id) else { return };
    let Some(info) = resolver::resolve(schema, ptr) else { return };
    if info.table_kind != TableKind::SourceInline {
        // Cardinality/optionality/type changes on a link-table-backed
        // pointer require migrating rows between tables; out of scope for
        // this translator.
        return;
    }
    let table = info.table_name.clone();
    let column = info.column_name.clone();

    if let Some(FieldValue::Bool(required)) = fields.get("required") {
        if *required {
            // optional -> required: backfill first so the NOT NULL doesn't
            // fail on existing rows with a null value.
            ops.push(PgOp::RawUpdate {
                table: table.clone(),
                set_clause: format!("{} = {}", column, crate::quote::literal_quote("")),
                where_clause: Some(format!("{column} IS NULL")),
            });
            ops.push(PgOp::AlterTableSetNotNull { table: table.clone(), column: column.clone() });
        } else {
            ops.push(PgOp::AlterTableDropNotNull { table: table.clone(), column: column.clone() });
        }
    }

    if let Some(FieldValue::Str(new_type)) = fields.get("target_type") {
        ops.push(PgOp::AlterTableAlterColumnType {
            table,
            column: column.clone(),
            new_type: new_type.clone(),
            using: Some(format!("{column}::{new_type}")),
        });
    }
}

/// `Delete`: drop the link table, or the inline column, whichever
/// backs the pointer. No-op for a derived pointer that never had storage.
pub fn delete(schema: &mut Schema, id: ObjectId, ops: &mut Vec<PgOp>, views: &mut InheritanceViewManager) {
    let Some(ptr) = schema.get_pointer(id) else { return };
    let source = ptr.source;
    views.snapshot_columns(schema, source);
    if let Some(info) = resolver::resolve(schema, ptr) {
        match info.table_kind {
            TableKind::LinkTable => ops.push(PgOp::DropTable { table: info.table_name }),
            TableKind::SourceInline => ops.push(PgOp::AlterTableDropColumn {
                table: info.table_name,
                column: info.column_name,
            }),
        }
        views.mark_dirty(source);
    }
    schema.remove_pointer(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::pointer::{PointerCardinality, PointerKind};
    use qc_schema::types::{ObjectType, ObjectTypeKind, Primitive, ScalarType};

    fn schema_with_owner() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let owner = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(owner, Name::simple("User")),
            ObjectTypeKind::Concrete,
        ));
        (schema, owner)
    }

    #[test]
    fn creating_a_scalar_property_adds_a_column() {
        let (mut schema, owner) = schema_with_owner();
        let scalar_id = schema.id_alloc.next();
        schema.add_scalar(ScalarType::primitive(
            SchemaObjectBase::new(scalar_id, Name::simple("str")),
            Primitive::Str,
        ));
        let ptr_id = schema.id_alloc.next();
        let ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("name")),
            PointerKind::Property,
            owner,
            qc_schema::types::Type::Scalar(scalar_id),
            PointerCardinality::single_required(),
        );
        let mut ops = Vec::new();
        let mut views = InheritanceViewManager::new();
        create(&mut schema, ptr, &mut ops, &mut views);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], PgOp::AlterTableAddColumn { .. }));
    }
}
