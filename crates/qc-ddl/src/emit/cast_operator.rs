use crate::op::PgOp;
use qc_schema::aux::{Cast, Operator};
use qc_schema::schema::Schema;
use qc_schema::types::Type;

fn backend_type_name(schema: &Schema, ty: &Type) -> String {
    match ty {
        Type::Object(id) => schema
            .get_object(*id)
            .map(|o| o.base.name.local_name().to_lowercase())
            .unwrap_or_else(|| format!("obj_{id}")),
        Type::Scalar(id) => schema
            .get_scalar(*id)
            .map(|s| s.base.name.local_name().to_lowercase())
            .unwrap_or_else(|| format!("scalar_{id}")),
        Type::Collection(_) => "jsonb".to_string(),
        Type::Pseudo(_) => "anyelement".to_string(),
    }
}

/// `Create` operator: both infix (`left OP right`)
/// and prefix operators are represented by the same `PgOp::CreateOperator`,
/// with `left_type` absent for a prefix operator.
pub fn create_operator(schema: &mut Schema, o: Operator, ops: &mut Vec<PgOp>) {
    let name = o.base.name.local_name().to_lowercase();
    let function = format!("{name}_impl");
    let (left_type, right_type) = if o.is_infix && o.operand_types.len() == 2 {
        (
            Some(backend_type_name(schema, &o.operand_types[0])),
            Some(backend_type_name(schema, &o.operand_types[1])),
        )
    } else {
        (
            None,
            o.operand_types
                .first()
                .map(|t| backend_type_name(schema, t)),
        )
    };
    ops.push(PgOp::CreateOperator {
        name,
        left_type,
        right_type,
        function,
    });
    schema.add_operator(o);
}

/// `Create` cast: `allow_implicit`/`allow_assignment` control which
/// `CREATE CAST ... AS` clause gets rendered; a cast with no body is an
/// `INOUT` (binary-compatible) cast.
pub fn create_cast(schema: &mut Schema, c: Cast, ops: &mut Vec<PgOp>) {
    let from_type = backend_type_name(schema, &c.from_type);
    let to_type = backend_type_name(schema, &c.to_type);
    let function = c.base.name.local_name().to_lowercase();
    ops.push(PgOp::CreateCast {
        from_type,
        to_type,
        function: c.body.as_ref().map(|_| function),
        implicit: c.allow_implicit,
        assignment: c.allow_assignment,
    });
    schema.add_cast(c);
}
