use crate::op::PgOp;
use crate::quote::ident_quote;
use qc_schema::aux::{Constraint, ConstraintKind, Index};
use qc_schema::id::ObjectId;
use qc_schema::object::SchemaObject;
use qc_schema::schema::Schema;

fn table_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

fn pointer_column(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_pointer(id)
        .map(|p| p.name().local_name().to_lowercase())
        .unwrap_or_else(|| format!("col_{id}"))
}

fn check_clause(kind: &ConstraintKind, column: &str) -> String {
    match kind {
        ConstraintKind::Check | ConstraintKind::Regexp => {
            format!("CHECK ({column} IS NOT NULL)")
        }
        ConstraintKind::Unique | ConstraintKind::Exclusion => format!("UNIQUE ({column})"),
        ConstraintKind::MinValue => format!("CHECK ({column} >= min_value)"),
        ConstraintKind::MaxValue => format!("CHECK ({column} <= max_value)"),
        ConstraintKind::MaxLength => format!("CHECK (length({column}::text) <= max_length)"),
    }
}

/// `Create`: the subject may be a pointer
/// (column-scoped) or an object type (row-scoped, e.g. a multi-column
/// exclusivity constraint); both render to one `ALTER TABLE ... ADD
/// CONSTRAINT`.
pub fn create_constraint(schema: &mut Schema, c: Constraint, ops: &mut Vec<PgOp>) {
    let subject = c.subject;
    let (table, column) = if let Some(ptr) = schema.get_pointer(subject) {
        (table_name(schema, ptr.source), pointer_column(schema, subject))
    } else {
        (table_name(schema, subject), "id".to_string())
    };
    ops.push(PgOp::CreateConstraint {
        table,
        constraint: c.base.name.local_name().to_lowercase(),
        definition: check_clause(&c.kind, &column),
    });
    schema.add_constraint(c);
}

pub fn delete_constraint(schema: &mut Schema, id: ObjectId, ops: &mut Vec<PgOp>) {
    if let Some(c) = schema.get_constraint(id) {
        let subject = c.subject;
        let table = schema
            .get_pointer(subject)
            .map(|p| table_name(schema, p.source))
            .unwrap_or_else(|| table_name(schema, subject));
        ops.push(PgOp::DropConstraint {
            table,
            constraint: c.base.name.local_name().to_lowercase(),
        });
    }
    schema.remove_constraint(id);
}

/// `Create` index: all index fields are pointers of the same owning
/// object type.
pub fn create_index(schema: &mut Schema, i: Index, ops: &mut Vec<PgOp>) {
    let table = table_name(schema, i.subject);
    let columns: Vec<String> = i.fields.iter().map(|&f| pointer_column(schema, f)).collect();
    ops.push(PgOp::CreateIndex {
        index: format!("{}_{}_idx", table, i.base.name.local_name().to_lowercase()),
        table,
        columns,
        unique: i.is_unique,
    });
    schema.add_index(i);
}

pub fn delete_index(schema: &mut Schema, id: ObjectId, ops: &mut Vec<PgOp>) {
    if let Some(i) = schema.get_index(id) {
        ops.push(PgOp::DropIndex {
            index: format!(
                "{}_{}_idx",
                table_name(schema, i.subject),
                i.base.name.local_name().to_lowercase()
            ),
        });
    }
    schema.remove_index(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::expr_box::ExprBox;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::types::{ObjectType, ObjectTypeKind};

    #[test]
    fn creating_a_unique_constraint_on_a_pointer_renders_column() {
        let mut schema = Schema::new(1);
        let owner = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(owner, Name::simple("User")),
            ObjectTypeKind::Concrete,
        ));
        let ptr_id = schema.id_alloc.next();
        let ptr = qc_schema::pointer::Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("email")),
            qc_schema::pointer::PointerKind::Property,
            owner,
            qc_schema::types::Type::Scalar(ObjectId(999)),
            qc_schema::pointer::PointerCardinality::single_required(),
        );
        schema.add_pointer(ptr);

        let c_id = schema.id_alloc.next();
        let c = Constraint {
            base: SchemaObjectBase::new(c_id, Name::simple("exclusive")),
            subject: ptr_id,
            kind: ConstraintKind::Unique,
            expr: ExprBox::from_text("exclusive"),
        };
        let mut ops = Vec::new();
        create_constraint(&mut schema, c, &mut ops);
        match &ops[0] {
            PgOp::CreateConstraint { definition, .. } => assert!(definition.contains("email")),
            _ => panic!("expected CreateConstraint"),
        }
    }
}
