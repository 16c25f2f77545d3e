use crate::op::{PgOp, TriggerEvent, TriggerTiming};
use crate::quote::{ident_quote, literal_quote};
use qc_schema::id::ObjectId;
use qc_schema::object::SchemaObject;
use qc_schema::pointer::{OnTargetDelete, Pointer};
use qc_schema::schema::Schema;
use qc_schema::types::Type;
use qc_storage::resolver::{resolve, TableKind};
use std::collections::BTreeMap;

fn table_name(schema: &Schema, id: ObjectId) -> String {
    schema
        .get_object(id)
        .map(|o| o.base.name.local_name().to_lowercase())
        .unwrap_or_else(|| format!("obj_{id}"))
}

fn targets(ty: &Type, id: ObjectId) -> bool {
    matches!(ty, Type::Object(t) if *t == id)
}

fn body_for_restrict(schema: &Schema, target: ObjectId, links: &[&Pointer]) -> String {
    let checks: Vec<String> = links
        .iter()
        .map(|p| match resolve(schema, p) {
            Some(info) if info.table_kind == TableKind::LinkTable => format!(
                "SELECT 1 FROM {} WHERE target = OLD.id",
                ident_quote(&info.table_name)
            ),
            _ => format!(
                "SELECT 1 FROM {} WHERE {} = OLD.id",
                ident_quote(&table_name(schema, p.source)),
                ident_quote(&p.name().local_name().to_lowercase())
            ),
        })
        .collect();
    let union = checks.join(" UNION ALL ");
    format!(
        "BEGIN IF EXISTS ({union}) THEN RAISE EXCEPTION USING ERRCODE = '23503', MESSAGE = {}; END IF; RETURN OLD; END;",
        literal_quote(&format!(
            "cannot delete {}: still referenced",
            table_name(schema, target)
        ))
    )
}

fn body_for_allow(schema: &Schema, links: &[&Pointer]) -> String {
    let stmts: Vec<String> = links
        .iter()
        .map(|p| match resolve(schema, p) {
            Some(info) if info.table_kind == TableKind::LinkTable => {
                format!("DELETE FROM {} WHERE target = OLD.id;", ident_quote(&info.table_name))
            }
            Some(info) => format!(
                "UPDATE {} SET {} = NULL WHERE {} = OLD.id;",
                ident_quote(&info.table_name),
                ident_quote(&info.column_name),
                ident_quote(&info.column_name)
            ),
            None => String::new(),
        })
        .collect();
    format!("BEGIN {} RETURN OLD; END;", stmts.join(" "))
}

fn body_for_delete_source(schema: &Schema, links: &[&Pointer]) -> String {
    let stmts: Vec<String> = links
        .iter()
        .filter_map(|p| resolve(schema, p).map(|info| (p, info)))
        .map(|(p, info)| match info.table_kind {
            TableKind::LinkTable => format!(
                "DELETE FROM {} WHERE id IN (SELECT source FROM {} WHERE target = OLD.id);",
                ident_quote(&table_name(schema, p.source)),
                ident_quote(&info.table_name)
            ),
            TableKind::SourceInline => format!(
                "DELETE FROM {} WHERE {} = OLD.id;",
                ident_quote(&info.table_name),
                ident_quote(&info.column_name)
            ),
        })
        .collect();
    format!("BEGIN {} RETURN OLD; END;", stmts.join(" "))
}

/// `triggers_for`: up to four DELETE triggers for `target`,
/// grouped by the active inbound links' `on_target_delete` policy.
/// `Restrict`-policy links inherited rather than declared directly on
/// `target` are elided, since the ancestor's own trigger (and the
/// inheritance view) already covers them.
#[must_use]
pub fn triggers_for(schema: &Schema, target: ObjectId) -> Vec<PgOp> {
    let mut by_policy: BTreeMap<u8, Vec<&Pointer>> = BTreeMap::new();

    for p in all_pointers(schema) {
        if !p.is_link() || p.is_derived() {
            continue;
        }
        if !targets(&p.target, target) {
            continue;
        }
        let key = policy_key(p.on_target_delete);
        by_policy.entry(key).or_default().push(p);
    }

    let table = table_name(schema, target);
    let mut ops = Vec::new();
    for (key, links) in by_policy {
        let (policy_name, timing, body) = match key {
            0 => (
                "restrict",
                TriggerTiming::Before,
                body_for_restrict(schema, target, &links),
            ),
            1 => (
                "deferred_restrict",
                TriggerTiming::Before,
                body_for_restrict(schema, target, &links),
            ),
            2 => (
                "allow",
                TriggerTiming::Before,
                body_for_allow(schema, &links),
            ),
            _ => (
                "delete_source",
                TriggerTiming::Before,
                body_for_delete_source(schema, &links),
            ),
        };
        ops.push(PgOp::CreateTrigger {
            trigger: format!("{table}_on_delete_{policy_name}"),
            table: table.clone(),
            timing,
            event: TriggerEvent::Delete,
            body,
        });
    }
    ops
}

fn policy_key(policy: OnTargetDelete) -> u8 {
    match policy {
        OnTargetDelete::Restrict => 0,
        OnTargetDelete::DeferredRestrict => 1,
        OnTargetDelete::Allow => 2,
        OnTargetDelete::DeleteSource => 3,
    }
}

fn all_pointers(schema: &Schema) -> Vec<&Pointer> {
    // There is no `Schema::pointers()` accessor (only `pointers_of(source)`),
    // so every source object's pointer set is unioned here. Kept local to
    // this module rather than widening Schema's public surface for a single
    // caller.
    schema
        .objects()
        .flat_map(|o| schema.pointers_of(o.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;
    use qc_schema::object::SchemaObjectBase;
    use qc_schema::pointer::PointerCardinality;
    use qc_schema::types::{ObjectType, ObjectTypeKind};

    fn schema_with_restrict_link() -> (Schema, ObjectId) {
        let mut schema = Schema::new(1);
        let target_id = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(target_id, Name::simple("Team")),
            ObjectTypeKind::Concrete,
        ));
        let source_id = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(source_id, Name::simple("Player")),
            ObjectTypeKind::Concrete,
        ));
        let ptr_id = schema.id_alloc.next();
        let mut ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("team")),
            qc_schema::pointer::PointerKind::Link {
                allows_link_properties: false,
            },
            source_id,
            Type::Object(target_id),
            PointerCardinality::single_required(),
        );
        ptr.on_target_delete = OnTargetDelete::Restrict;
        schema.add_pointer(ptr);
        (schema, target_id)
    }

    #[test]
    fn restrict_policy_yields_one_trigger() {
        let (schema, target) = schema_with_restrict_link();
        let ops = triggers_for(&schema, target);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            PgOp::CreateTrigger { trigger, body, .. } => {
                assert!(trigger.ends_with("on_delete_restrict"));
                assert!(body.contains("RAISE EXCEPTION"));
            }
            _ => panic!("expected CreateTrigger"),
        }
    }

    #[test]
    fn no_inbound_links_means_no_triggers() {
        let mut schema = Schema::new(1);
        let id = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(id, Name::simple("Lonely")),
            ObjectTypeKind::Concrete,
        ));
        assert!(triggers_for(&schema, id).is_empty());
    }
}
