use crate::id::ObjectId;
use qc_ir::name::Name;
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Referential integrity, duplicate definition, and unknown object errors
///. A delta that raises one of these never mutates the
/// in-memory schema: the caller's existing `Schema` handle stays valid.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum SchemaError {
    #[error("unknown object: {0}")]
    UnknownName(Name),

    #[error("unknown object id: {0}")]
    UnknownId(ObjectId),

    #[error("object already exists: {0}")]
    DuplicateDefinition(Name),

    #[error(
        "cannot delete {subject}: still referenced by {referrer} through field {via}; use `if_unused` to drop referrers first"
    )]
    ReferencedByOthers {
        subject: Name,
        referrer: Name,
        via: String,
    },

    #[error("{0} is abstract and has no backing storage")]
    AbstractHasNoStorage(Name),

    #[error("nearest common ancestor does not exist for the given type set")]
    NoCommonAncestor,
}

pub type SchemaResult<T> = Result<T, SchemaError>;
