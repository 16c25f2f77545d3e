pub mod bridge;
pub mod common;
pub mod env;
pub mod error;
pub mod infer;

pub mod prelude {
    pub use crate::bridge::{schema_type_to_type_ref, type_ref_to_schema_type};
    pub use crate::common::{find_common_implicitly_castable_type, infer_common_type, CommonArg};
    pub use crate::env::InferEnv;
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::infer::infer_type;
}
