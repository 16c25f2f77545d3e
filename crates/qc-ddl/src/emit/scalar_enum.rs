use crate::op::PgOp;
use qc_schema::id::ObjectId;
use qc_schema::schema::Schema;
use qc_schema::types::{ScalarKind, ScalarType};

fn type_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_scalar(id)
        .map(|s| s.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("scalar_{id}"))
}

/// `Create`: a primitive scalar has no
/// DDL footprint of its own (it's a Postgres built-in); an enum gets its own
/// `CREATE TYPE ... AS ENUM`.
pub fn create(schema: &mut Schema, scalar: ScalarType, ops: &mut Vec<PgOp>) {
    if let ScalarKind::Enum(values) = &scalar.kind {
        ops.push(PgOp::CreateEnum {
            type_name: scalar.base.name.local_name().to_lowercase(),
            values: values.clone(),
        });
    }
    schema.add_scalar(scalar);
}

/// Does `new` consist of `old` with exactly one value inserted somewhere
/// (order of the rest preserved)? Returns the inserted value and, if it
/// wasn't inserted at the tail, the existing value it was inserted before.
fn single_insertion(old: &[String], new: &[String]) -> Option<(String, Option<String>)> {
    if new.len() != old.len() + 1 {
        return None;
    }
    let mut oi = 0;
    let mut inserted = None;
    for (ni, v) in new.iter().enumerate() {
        if oi < old.len() && *v == old[oi] {
            oi += 1;
        } else if inserted.is_none() {
            inserted = Some((v.clone(), new.get(ni + 1).cloned()));
        } else {
            return None;
        }
    }
    (oi == old.len()).then_some(inserted).flatten()
}

/// `Alter` enum values: a pure suffix append grows the
/// Postgres enum type in place with one `ALTER TYPE ... ADD VALUE` per new
/// value; a single value inserted ahead of an existing one uses the same
/// statement's `BEFORE` clause. Anything else (a removal, a multi-value
/// reorder) cannot be expressed as an in-place enum mutation in Postgres:
/// the type is dropped and recreated with the new value list. Enum-typed
/// columns in this translator are always stored as `text`, never bound to
/// the Postgres enum type itself, so no column needs repointing around the
/// drop.
pub fn alter_enum_values(
    schema: &mut Schema,
    id: ObjectId,
    new_values: Vec<String>,
    ops: &mut Vec<PgOp>,
) -> qc_schema::error::SchemaResult<()> {
    let Some(existing) = schema.get_scalar(id) else {
        return Err(qc_schema::error::SchemaError::UnknownId(id));
    };
    let Some(old_values) = existing.enum_values().map(<[String]>::to_vec) else {
        return Ok(());
    };

    let is_pure_append = old_values.len() <= new_values.len()
        && old_values.iter().zip(&new_values).all(|(a, b)| a == b);

    let name = type_name(schema, id);
    if is_pure_append {
        for v in new_values.iter().skip(old_values.len()) {
            ops.push(PgOp::AlterEnumAddValue {
                type_name: name.clone(),
                value: v.clone(),
                before: None,
            });
        }
    } else if let Some((value, before)) = single_insertion(&old_values, &new_values) {
        ops.push(PgOp::AlterEnumAddValue {
            type_name: name.clone(),
            value,
            before,
        });
    } else if old_values != new_values {
        ops.push(PgOp::DropType {
            type_name: name.clone(),
        });
        ops.push(PgOp::CreateEnum {
            type_name: name.clone(),
            values: new_values.clone(),
        });
    }

    if let Some(mut s) = schema.get_scalar(id).cloned() {
        s.kind = ScalarKind::Enum(new_values);
        schema.add_scalar(s);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;

    #[test]
    fn creating_an_enum_emits_create_enum() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        let scalar = ScalarType::new_enum(
            SchemaObjectBase::new(id, Name::simple("Color")),
            vec!["Red".to_string(), "Green".to_string()],
        );
        let mut ops = Vec::new();
        create(&mut schema, scalar, &mut ops);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], PgOp::CreateEnum { .. }));
    }

    #[test]
    fn appending_enum_values_uses_add_value() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType::new_enum(
            SchemaObjectBase::new(id, Name::simple("Color")),
            vec!["Red".to_string()],
        ));
        let mut ops = Vec::new();
        alter_enum_values(&mut schema, id, vec!["Red".to_string(), "Green".to_string()], &mut ops).unwrap();
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], PgOp::AlterEnumAddValue { .. }));
    }

    #[test]
    fn reordering_enum_values_drops_and_recreates_the_type() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType::new_enum(
            SchemaObjectBase::new(id, Name::simple("Color")),
            vec!["Red".to_string(), "Green".to_string()],
        ));
        let mut ops = Vec::new();
        alter_enum_values(&mut schema, id, vec!["Green".to_string(), "Red".to_string()], &mut ops).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], PgOp::DropType { .. }));
        assert!(matches!(ops[1], PgOp::CreateEnum { .. }));
        assert_eq!(
            schema.get_scalar(id).unwrap().enum_values(),
            Some(&["Green".to_string(), "Red".to_string()][..])
        );
    }

    #[test]
    fn removing_an_enum_value_drops_and_recreates_the_type() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType::new_enum(
            SchemaObjectBase::new(id, Name::simple("Color")),
            vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
        ));
        let mut ops = Vec::new();
        alter_enum_values(&mut schema, id, vec!["Red".to_string(), "Blue".to_string()], &mut ops).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], PgOp::DropType { .. }));
        assert!(matches!(ops[1], PgOp::CreateEnum { .. }));
    }

    #[test]
    fn inserting_a_value_before_an_existing_one_uses_add_value_before() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_scalar(ScalarType::new_enum(
            SchemaObjectBase::new(id, Name::simple("Color")),
            vec!["A".to_string(), "C".to_string()],
        ));
        let mut ops = Vec::new();
        alter_enum_values(
            &mut schema,
            id,
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            &mut ops,
        )
        .unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            PgOp::AlterEnumAddValue { value, before, .. } => {
                assert_eq!(value, "B");
                assert_eq!(before.as_deref(), Some("C"));
            }
            other => panic!("expected AlterEnumAddValue, got {other:?}"),
        }
    }
}
