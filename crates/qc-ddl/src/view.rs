use crate::op::PgOp;
use crate::quote::ident_quote;
use qc_schema::id::ObjectId;
use qc_schema::object::SchemaObject;
use qc_schema::schema::Schema;
use qc_storage::resolver::{resolve, TableKind};
use std::collections::BTreeSet;

fn table_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

fn view_name(schema: &Schema, id: ObjectId) -> String {
    format!("{}_view", table_name(schema, id))
}

/// The column projection of one concrete object type: its own
/// source-inline pointer columns, sorted for determinism, plus the
/// identity column every backing table carries.
#[must_use]
pub fn columns_of(schema: &Schema, id: ObjectId) -> Vec<String> {
    let mut cols: Vec<String> = schema
        .pointers_of(id)
        .filter_map(|p| resolve(schema, p))
        .filter(|info| info.table_kind == TableKind::SourceInline)
        .map(|info| info.column_name)
        .collect();
    cols.sort();
    cols.insert(0, "id".to_string());
    cols
}

/// Every concrete (backed-by-a-table) strict descendant of `id`.
#[must_use]
pub fn descendants_of(schema: &Schema, id: ObjectId) -> Vec<ObjectId> {
    schema
        .objects()
        .filter(|o| o.has_backing_table() && o.id() != id && o.base.is_subclass_of(id))
        .map(|o| o.id())
        .collect()
}

/// Every strict ancestor of `id` that itself has a backing table (and
/// therefore its own inheritance view to keep in sync).
#[must_use]
pub fn concrete_ancestors_of(schema: &Schema, id: ObjectId) -> Vec<ObjectId> {
    schema
        .ancestor_set(id)
        .into_iter()
        .filter(|&a| a != id && schema.get_object(a).is_some_and(|o| o.has_backing_table()))
        .collect()
}

fn union_all_query(schema: &Schema, id: ObjectId) -> String {
    let columns = columns_of(schema, id);
    let mut members = vec![id];
    members.extend(descendants_of(schema, id));

    let select_cols: Vec<String> = columns.iter().map(|c| ident_quote(c)).collect();
    let selects: Vec<String> = members
        .iter()
        .map(|&m| {
            format!(
                "SELECT {} FROM {}",
                select_cols.join(", "),
                ident_quote(&table_name(schema, m))
            )
        })
        .collect();
    selects.join(" UNION ALL ")
}

/// `create`: emit the UNION-ALL view for a freshly created concrete
/// object type.
#[must_use]
pub fn create_view(schema: &Schema, id: ObjectId) -> PgOp {
    PgOp::CreateView {
        view: view_name(schema, id),
        query: union_all_query(schema, id),
    }
}

/// `alter`: recreate the view. A
/// non-shrinking, non-renaming column change uses `CREATE OR REPLACE`;
/// anything that removes or renames a column must DROP+CREATE, since the
/// backend forbids altering a view's column list in place.
#[must_use]
pub fn alter_view(schema: &Schema, id: ObjectId, previous_columns: &[String]) -> Vec<PgOp> {
    let new_columns = columns_of(schema, id);
    let shrank_or_renamed = previous_columns.iter().any(|c| !new_columns.contains(c));

    if shrank_or_renamed {
        vec![
            PgOp::DropView {
                view: view_name(schema, id),
            },
            create_view(schema, id),
        ]
    } else {
        vec![PgOp::CreateOrReplaceView {
            view: view_name(schema, id),
            query: union_all_query(schema, id),
        }]
    }
}

#[must_use]
pub fn drop_view(schema: &Schema, id: ObjectId) -> PgOp {
    PgOp::DropView {
        view: view_name(schema, id),
    }
}

/// `cascade`: ancestor views only ever need a `CREATE OR
/// REPLACE`, since a descendant's column changes never alter an ancestor's
/// own projection — only which tables feed its UNION ALL.
#[must_use]
pub fn cascade_ancestors(schema: &Schema, id: ObjectId) -> Vec<PgOp> {
    concrete_ancestors_of(schema, id)
        .into_iter()
        .map(|anc| PgOp::CreateOrReplaceView {
            view: view_name(schema, anc),
            query: union_all_query(schema, anc),
        })
        .collect()
}

///
/// InheritanceViewManager
///
/// Batches view-refresh requests across a single delta: rather than
/// recreating a view after every individual command, object types whose
/// column set changed are marked dirty and flushed once, after all
/// per-object command work for the enclosing delta.
///

#[derive(Debug, Default)]
pub struct InheritanceViewManager {
    dirty: BTreeSet<ObjectId>,
    previous_columns: std::collections::BTreeMap<ObjectId, Vec<String>>,
}

impl InheritanceViewManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`'s column set as of "before this delta touched it", so a
    /// later flush can tell whether the change shrank/renamed the view.
    pub fn snapshot_columns(&mut self, schema: &Schema, id: ObjectId) {
        self.previous_columns
            .entry(id)
            .or_insert_with(|| columns_of(schema, id));
    }

    pub fn mark_dirty(&mut self, id: ObjectId) {
        self.dirty.insert(id);
    }

    /// Flush every dirty type's view (plus cascading ancestor refreshes),
    /// in id order, and clear the pending set.
    pub fn flush(&mut self, schema: &Schema) -> Vec<PgOp> {
        let mut ops = Vec::new();
        for &id in &self.dirty {
            let previous = self
                .previous_columns
                .remove(&id)
                .unwrap_or_else(|| columns_of(schema, id));
            ops.extend(alter_view(schema, id, &previous));
            ops.extend(cascade_ancestors(schema, id));
        }
        self.dirty.clear();
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::types::{ObjectType, ObjectTypeKind};

    fn base_schema() -> (Schema, ObjectId, ObjectId) {
        let mut schema = Schema::new(1);
        let base_id = schema.id_alloc.next();
        let base = SchemaObjectBase::new(base_id, Name::simple("Animal"));
        schema.add_object(ObjectType::new(base, ObjectTypeKind::Concrete));

        let child_id = schema.id_alloc.next();
        let child_base = SchemaObjectBase::new(child_id, Name::simple("Dog"))
            .with_bases(vec![base_id], vec![base_id, child_id]);
        schema.add_object(ObjectType::new(child_base, ObjectTypeKind::Concrete));

        (schema, base_id, child_id)
    }

    #[test]
    fn create_view_unions_self_and_descendants() {
        let (schema, base_id, _) = base_schema();
        let op = create_view(&schema, base_id);
        match op {
            PgOp::CreateView { view, query } => {
                assert_eq!(view, "animal_view");
                assert!(query.contains("\"animal\""));
                assert!(query.contains("\"dog\""));
                assert!(query.contains("UNION ALL"));
            }
            _ => panic!("expected CreateView"),
        }
    }

    #[test]
    fn alter_view_uses_replace_when_columns_only_grow() {
        let (schema, base_id, _) = base_schema();
        let previous = vec!["id".to_string()];
        let ops = alter_view(&schema, base_id, &previous);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], PgOp::CreateOrReplaceView { .. }));
    }

    #[test]
    fn alter_view_drops_and_recreates_when_a_column_disappears() {
        let (schema, base_id, _) = base_schema();
        let previous = vec!["id".to_string(), "ghost_column".to_string()];
        let ops = alter_view(&schema, base_id, &previous);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], PgOp::DropView { .. }));
        assert!(matches!(ops[1], PgOp::CreateView { .. }));
    }

    #[test]
    fn cascade_refreshes_ancestor_with_replace_only() {
        let (schema, base_id, child_id) = base_schema();
        let ops = cascade_ancestors(&schema, child_id);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            PgOp::CreateOrReplaceView { view, .. } => assert_eq!(view, &format!("{}_view", "animal")),
            _ => panic!("expected CreateOrReplaceView"),
        }
        let _ = base_id;
    }
}
