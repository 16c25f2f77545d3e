use crate::emit;
use crate::op::PgOp;
use crate::trigger;
use crate::view::InheritanceViewManager;
use qc_delta::command::{Command, CommandKind, DeltaRoot, ObjectClass, SchemaObjectPayload};
use qc_schema::error::SchemaError;
use qc_schema::id::ObjectId;
use qc_schema::object::{FieldValue, SchemaObject};
use qc_schema::schema::Schema;
use qc_schema::types::Type;
use std::collections::BTreeSet;
use thiserror::Error;

///
/// DispatchError
///
/// The delta dispatcher never partially applies a command: a
/// schema-level failure (unknown name, still-referenced delete without
/// `if_unused`) aborts the whole delta before any `PgOp` is returned, so the
/// caller's pre-delta `Schema` handle stays valid.
///

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("command {0:?}/{1:?} requires a payload but none was attached")]
    MissingPayload(ObjectClass, CommandKind),
}

/// `apply`: walk every command of `delta` depth-first
/// (prerequisites, self, main, caused — matching [`Command::walk`]),
/// mutating `schema` and accumulating backend operations in declaration
/// order. Inheritance-view refreshes and referential-action trigger
/// resynthesis are batched and appended once, after every command
/// in the delta has been applied, rather than after each individual command.
pub fn apply(schema: &mut Schema, delta: &DeltaRoot) -> Result<Vec<PgOp>, DispatchError> {
    let mut ops = Vec::new();
    let mut views = InheritanceViewManager::new();
    let mut touched_targets: BTreeSet<ObjectId> = BTreeSet::new();

    for cmd in &delta.commands {
        dispatch_node(schema, cmd, &mut ops, &mut views, &mut touched_targets)?;
    }

    ops.extend(views.flush(schema));

    for target in touched_targets {
        if schema.get_object(target).is_some() {
            ops.extend(trigger::triggers_for(schema, target));
        }
    }

    Ok(ops)
}

fn dispatch_node(
    schema: &mut Schema,
    cmd: &Command,
    ops: &mut Vec<PgOp>,
    views: &mut InheritanceViewManager,
    touched_targets: &mut BTreeSet<ObjectId>,
) -> Result<(), DispatchError> {
    for p in &cmd.prerequisites {
        dispatch_node(schema, p, ops, views, touched_targets)?;
    }
    dispatch_self(schema, cmd, ops, views, touched_targets)?;
    for m in &cmd.main {
        dispatch_node(schema, m, ops, views, touched_targets)?;
    }
    for c in &cmd.caused {
        dispatch_node(schema, c, ops, views, touched_targets)?;
    }
    Ok(())
}

fn dispatch_self(
    schema: &mut Schema,
    cmd: &Command,
    ops: &mut Vec<PgOp>,
    views: &mut InheritanceViewManager,
    touched_targets: &mut BTreeSet<ObjectId>,
) -> Result<(), DispatchError> {
    match (cmd.class, cmd.kind) {
        (ObjectClass::ScalarType, CommandKind::Create) => {
            let scalar = expect_scalar(cmd)?;
            emit::scalar_enum::create(schema, scalar, ops);
        }
        (ObjectClass::ScalarType, CommandKind::Alter) => {
            if let Some(SchemaObjectPayload::Scalar(new_scalar)) = &cmd.payload {
                if let Some(values) = new_scalar.enum_values() {
                    emit::scalar_enum::alter_enum_values(schema, new_scalar.id(), values.to_vec(), ops)?;
                }
            }
        }
        (ObjectClass::ScalarType, CommandKind::Delete) => {
            let id = schema.resolve_name(&cmd.subject)?;
            let outcome = schema.check_delete(id, cmd.if_unused)?;
            if outcome == qc_schema::schema::DeleteOutcome::Deleted {
                if let Some(s) = schema.get_scalar(id) {
                    if s.is_enum() {
                        ops.push(PgOp::DropType {
                            type_name: s.base.name.local_name().to_lowercase(),
                        });
                    }
                }
                schema.remove_scalar(id);
            }
        }

        (ObjectClass::ObjectType, CommandKind::Create) => {
            let obj = expect_object(cmd)?;
            emit::object_type::create(schema, obj, ops, views);
        }
        (ObjectClass::ObjectType, CommandKind::Alter) => {
            let id = schema.resolve_name(&cmd.subject)?;
            merge_fields(schema, id, &cmd.fields);
        }
        (ObjectClass::ObjectType, CommandKind::Delete) => {
            let id = schema.resolve_name(&cmd.subject)?;
            emit::object_type::delete(schema, id, cmd.if_unused, ops, views)?;
        }

        (ObjectClass::Pointer, CommandKind::Create) => {
            let ptr = expect_pointer(cmd)?;
            if let Type::Object(target) = ptr.target {
                touched_targets.insert(target);
            }
            emit::pointer::create(schema, ptr, ops, views);
        }
        (ObjectClass::Pointer, CommandKind::Alter) => {
            let id = schema.resolve_name(&cmd.subject)?;
            emit::pointer::alter(schema, id, &cmd.fields, ops);
        }
        (ObjectClass::Pointer, CommandKind::Delete) => {
            let id = schema.resolve_name(&cmd.subject)?;
            if let Some(ptr) = schema.get_pointer(id) {
                if let Type::Object(target) = ptr.target {
                    touched_targets.insert(target);
                }
            }
            emit::pointer::delete(schema, id, ops, views);
        }

        (ObjectClass::Constraint, CommandKind::Create) => {
            let c = expect_constraint(cmd)?;
            emit::constraint_index::create_constraint(schema, c, ops);
        }
        (ObjectClass::Constraint, CommandKind::Delete) => {
            let id = schema.resolve_name(&cmd.subject)?;
            emit::constraint_index::delete_constraint(schema, id, ops);
        }

        (ObjectClass::Index, CommandKind::Create) => {
            let i = expect_index(cmd)?;
            emit::constraint_index::create_index(schema, i, ops);
        }
        (ObjectClass::Index, CommandKind::Delete) => {
            let id = schema.resolve_name(&cmd.subject)?;
            emit::constraint_index::delete_index(schema, id, ops);
        }

        (ObjectClass::Function, CommandKind::Create) => {
            let f = expect_function(cmd)?;
            emit::function::create(schema, f, ops);
        }
        (ObjectClass::Operator, CommandKind::Create) => {
            let o = expect_operator(cmd)?;
            emit::cast_operator::create_operator(schema, o, ops);
        }
        (ObjectClass::Cast, CommandKind::Create) => {
            let c = expect_cast(cmd)?;
            emit::cast_operator::create_cast(schema, c, ops);
        }
        (ObjectClass::Annotation, CommandKind::Create) => {
            if let Some(SchemaObjectPayload::Annotation(a)) = &cmd.payload {
                schema.add_annotation(a.clone());
            }
        }

        // Rename/Rebase and every remaining (class, Delete) combination for
        // auxiliary object kinds (Function/Operator/Cast/Annotation): these
        // mutate only the name index or a field, never the backend, so
        // there's nothing for this dispatcher to emit.
        _ => {}
    }
    Ok(())
}

fn merge_fields(schema: &mut Schema, id: ObjectId, fields: &std::collections::BTreeMap<String, FieldValue>) {
    if let Some(obj) = schema.get_object(id).cloned() {
        let mut obj = obj;
        for (k, v) in fields {
            obj.base.set_field(k.clone(), v.clone());
        }
        schema.add_object(obj);
    }
}

fn expect_scalar(cmd: &Command) -> Result<qc_schema::types::ScalarType, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Scalar(s)) => Ok(s.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_object(cmd: &Command) -> Result<qc_schema::types::ObjectType, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Object(o)) => Ok(o.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_pointer(cmd: &Command) -> Result<qc_schema::pointer::Pointer, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Pointer(p)) => Ok(p.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_constraint(cmd: &Command) -> Result<qc_schema::aux::Constraint, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Constraint(c)) => Ok(c.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_index(cmd: &Command) -> Result<qc_schema::aux::Index, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Index(i)) => Ok(i.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_function(cmd: &Command) -> Result<qc_schema::aux::Function, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Function(f)) => Ok(f.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_operator(cmd: &Command) -> Result<qc_schema::aux::Operator, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Operator(o)) => Ok(o.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

fn expect_cast(cmd: &Command) -> Result<qc_schema::aux::Cast, DispatchError> {
    match &cmd.payload {
        Some(SchemaObjectPayload::Cast(c)) => Ok(c.clone()),
        _ => Err(DispatchError::MissingPayload(cmd.class, cmd.kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::types::{ObjectType, ObjectTypeKind};

    #[test]
    fn creating_an_object_type_produces_table_and_view_ops() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        let obj = ObjectType::new(SchemaObjectBase::new(id, Name::simple("User")), ObjectTypeKind::Concrete);
        let mut root = DeltaRoot::new();
        let cmd = Command::new(ObjectClass::ObjectType, CommandKind::Create, Name::simple("User"))
            .with_payload(SchemaObjectPayload::Object(obj));
        root.push(cmd);

        let ops = apply(&mut schema, &root).unwrap();
        assert!(ops.iter().any(|op| matches!(op, PgOp::CreateTable { .. })));
        assert!(ops.iter().any(|op| matches!(op, PgOp::CreateView { .. })));
        assert!(schema.get_object(id).is_some());
    }

    #[test]
    fn create_without_payload_reports_missing_payload() {
        let mut schema = Schema::new(1);
        let mut root = DeltaRoot::new();
        root.push(Command::new(
            ObjectClass::ObjectType,
            CommandKind::Create,
            Name::simple("Ghost"),
        ));
        let err = apply(&mut schema, &root).unwrap_err();
        assert!(matches!(err, DispatchError::MissingPayload(..)));
    }
}
