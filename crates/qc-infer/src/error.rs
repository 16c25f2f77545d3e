use thiserror::Error as ThisError;

///
/// QueryError
///
/// Input errors surfaced by type inference: bad query,
/// undetermined type, illegal cast, illegal slice/index operand. These fail
/// fast with a source context attached and are never retried. Source
/// positions are tracked by the out-of-scope parser; this crate carries
/// only the `context` label the parser attached to the offending node.
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum QueryError {
    #[error("{context}: cannot determine the type of an empty set")]
    EmptySetType { context: String },

    #[error("{context}: cannot determine common type")]
    NoCommonType { context: String },

    #[error("{context}: cannot cast into generic type '{target}'")]
    CastIntoGenericType { context: String, target: String },

    #[error("{context}: cannot slice {operand_type} by {index_type}")]
    IllegalSlice {
        context: String,
        operand_type: String,
        index_type: String,
    },

    #[error("{context}: cannot index {operand_type} by {index_type}")]
    IllegalIndex {
        context: String,
        operand_type: String,
        index_type: String,
    },

    #[error("{context}: operand types are not implicitly castable to a common type")]
    IncompatibleCommonType { context: String },
}

pub type QueryResult<T> = Result<T, QueryError>;
