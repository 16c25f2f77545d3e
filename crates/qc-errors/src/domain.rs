use thiserror::Error as ThisError;

///
/// DomainError
///
/// The backend's SQLSTATE taxonomy, translated into the domain vocabulary a
/// caller actually wants to report. `MissingRequired` and
/// `InvalidValue` carry a schema-aware display name only after the second
/// translation pass has run; before that they fall
/// back to the raw column/type name the backend reported.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DomainError {
    #[error("missing value for required {pointer}")]
    MissingRequired { pointer: String },

    #[error("unique link constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("could not serialize access due to concurrent update")]
    TransactionSerialization,

    #[error("deadlock detected")]
    TransactionDeadlock,

    #[error("invalid input for type {type_name}: {value}")]
    InvalidValue { type_name: String, value: String },

    #[error("numeric value out of range")]
    NumericOutOfRange,

    #[error("unknown database: {name}")]
    UnknownDatabase { name: String },

    #[error("database already exists: {name}")]
    DuplicateDatabaseDefinition { name: String },

    #[error("cardinality violation: {message}")]
    CardinalityViolation { message: String },

    #[error("unclassified backend error ({code}): {message}")]
    Unknown { code: String, message: String },
}
