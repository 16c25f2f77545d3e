use crate::constraint::{classify, ConstraintCategory};
use crate::details::ErrorDetails;
use crate::domain::DomainError;
use qc_schema::object::SchemaObject;
use qc_schema::schema::Schema;
use qc_storage::resolver::resolve;

///
/// Pass1Outcome
///
/// The result of classifying a backend error by SQLSTATE alone. Some codes
/// resolve completely on their own; others need the schema to translate a
/// raw column/table name into a display name before a `DomainError` can be
/// produced.
///

enum Pass1Outcome {
    Resolved(DomainError),
    NeedsSchema,
}

fn pass1(details: &ErrorDetails) -> Pass1Outcome {
    match details.code.as_str() {
        "23502" => Pass1Outcome::NeedsSchema,
        "23505" => {
            let category = details
                .constraint_name
                .as_deref()
                .map(classify)
                .unwrap_or(ConstraintCategory::Unknown);
            let message = if matches!(category, ConstraintCategory::LinkTarget) {
                "unique link constraint violation".to_string()
            } else {
                details.message.clone()
            };
            Pass1Outcome::Resolved(DomainError::ConstraintViolation { message })
        }
        "40001" => Pass1Outcome::Resolved(DomainError::TransactionSerialization),
        "40P01" => Pass1Outcome::Resolved(DomainError::TransactionDeadlock),
        "22P02" => Pass1Outcome::NeedsSchema,
        "22003" => Pass1Outcome::Resolved(DomainError::NumericOutOfRange),
        "3D000" => Pass1Outcome::Resolved(DomainError::UnknownDatabase {
            name: details.schema_name.clone().unwrap_or_default(),
        }),
        "42P04" => Pass1Outcome::Resolved(DomainError::DuplicateDatabaseDefinition {
            name: details.schema_name.clone().unwrap_or_default(),
        }),
        "21000" => Pass1Outcome::Resolved(DomainError::CardinalityViolation {
            message: details.message.clone(),
        }),
        _ => Pass1Outcome::Resolved(DomainError::Unknown {
            code: details.code.clone(),
            message: details.message.clone(),
        }),
    }
}

/// Reverse-map a `(table_name, column_name)` pair to the pointer that owns
/// that physical column, by resolving every pointer in the schema and
/// comparing against the backend-reported names.
fn find_pointer_verbose_name(schema: &Schema, table: &str, column: &str) -> Option<String> {
    schema.objects().find_map(|obj| {
        schema.pointers_of(obj.id()).find_map(|ptr| {
            let info = resolve(schema, ptr)?;
            if info.table_name == table && info.column_name == column {
                Some(format!("{}.{}", obj.name(), ptr.name()))
            } else {
                None
            }
        })
    })
}

fn pass2(details: &ErrorDetails, schema: &Schema) -> DomainError {
    match details.code.as_str() {
        "23502" => {
            let pointer = match (&details.table_name, &details.column_name) {
                (Some(t), Some(c)) => {
                    find_pointer_verbose_name(schema, t, c).unwrap_or_else(|| format!("{t}.{c}"))
                }
                _ => details.message.clone(),
            };
            DomainError::MissingRequired { pointer }
        }
        "22P02" => {
            let type_name = details
                .table_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            DomainError::InvalidValue {
                type_name,
                value: details.message.clone(),
            }
        }
        _ => DomainError::Unknown {
            code: details.code.clone(),
            message: details.message.clone(),
        },
    }
}

/// `translate`: classify a raw backend error. When the first
/// pass alone is enough (most codes), the schema is never consulted; the
/// caller may therefore translate errors that occur before any schema has
/// been loaded. When `schema` is `None` and the first pass needs it, the
/// untranslated `table_name.column_name` pair is used as a fallback display
/// name rather than failing the translation outright.
#[must_use]
pub fn translate(details: &ErrorDetails, schema: Option<&Schema>) -> DomainError {
    match pass1(details) {
        Pass1Outcome::Resolved(err) => err,
        Pass1Outcome::NeedsSchema => match schema {
            Some(schema) => pass2(details, schema),
            None => DomainError::Unknown {
                code: details.code.clone(),
                message: details.message.clone(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_null_violation_without_schema_falls_back_to_unknown() {
        let details = ErrorDetails::new("23502", "null value in column \"email\"")
            .with_table("user")
            .with_column("email");
        let err = translate(&details, None);
        assert!(matches!(err, DomainError::Unknown { .. }));
    }

    #[test]
    fn not_null_violation_with_schema_resolves_pointer_name() {
        use qc_ir::name::Name;
        use qc_schema::object::SchemaObjectBase;
        use qc_schema::pointer::{Pointer, PointerCardinality, PointerKind};
        use qc_schema::types::{ObjectType, ObjectTypeKind, Type};

        let mut schema = Schema::new(1);
        let owner = schema.id_alloc.next();
        schema.add_object(ObjectType::new(
            SchemaObjectBase::new(owner, Name::simple("User")),
            ObjectTypeKind::Concrete,
        ));
        let ptr_id = schema.id_alloc.next();
        let ptr = Pointer::new(
            SchemaObjectBase::new(ptr_id, Name::simple("email")),
            PointerKind::Property,
            owner,
            Type::Scalar(qc_schema::id::ObjectId(9)),
            PointerCardinality::single_required(),
        );
        schema.add_pointer(ptr);

        let details = ErrorDetails::new("23502", "null value in column \"email\"")
            .with_table("user")
            .with_column("email");
        let err = translate(&details, Some(&schema));
        match err {
            DomainError::MissingRequired { pointer } => assert!(pointer.contains("email")),
            other => panic!("expected MissingRequired, got {other:?}"),
        }
    }

    #[test]
    fn deadlock_code_resolves_without_schema() {
        let details = ErrorDetails::new("40P01", "deadlock detected");
        assert!(matches!(translate(&details, None), DomainError::TransactionDeadlock));
    }
}
