use crate::op::{ColumnDef, PgOp};
use crate::view::{self, InheritanceViewManager};
use qc_schema::id::ObjectId;
use qc_schema::object::SchemaObject;
use qc_schema::schema::{DeleteOutcome, Schema};
use qc_schema::types::ObjectType;

fn table_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

/// `Create`: register the type, and if it needs a
/// backing table, emit `CREATE TABLE` plus its inheritance view. Abstract,
/// compound, and view kinds carry no storage of their own.
pub fn create(schema: &mut Schema, obj: ObjectType, ops: &mut Vec<PgOp>, views: &mut InheritanceViewManager) {
    let id = obj.id();
    let has_table = obj.has_backing_table();
    schema.add_object(obj);

    if !has_table {
        return;
    }

    ops.push(PgOp::CreateTable {
        table: table_name(schema, id),
        columns: vec![ColumnDef {
            name: "id".to_string(),
            sql_type: "uuid".to_string(),
            not_null: true,
        }],
    });
    ops.push(view::create_view(schema, id));
    views.mark_dirty(id);
}

/// `Delete`: deletion is gated on [`Schema::check_delete`] —
/// `if_unused` turns a still-referenced delete into a no-op instead of an
/// error. Concrete ancestors lose `id` as a UNION ALL member, so their
/// inheritance views are snapshotted and marked dirty before `id` is removed
/// from the schema — the ancestor set can't be recovered afterward.
pub fn delete(
    schema: &mut Schema,
    id: ObjectId,
    if_unused: bool,
    ops: &mut Vec<PgOp>,
    views: &mut InheritanceViewManager,
) -> qc_schema::error::SchemaResult<DeleteOutcome> {
    let outcome = schema.check_delete(id, if_unused)?;
    if outcome == DeleteOutcome::Deleted {
        if let Some(obj) = schema.get_object(id) {
            if obj.has_backing_table() {
                for ancestor in view::concrete_ancestors_of(schema, id) {
                    views.snapshot_columns(schema, ancestor);
                    views.mark_dirty(ancestor);
                }
                ops.push(view::drop_view(schema, id));
                ops.push(PgOp::DropTable {
                    table: table_name(schema, id),
                });
            }
        }
        schema.remove_object(id);
    }
    Ok(outcome)
}
