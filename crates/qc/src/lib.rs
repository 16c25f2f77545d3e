//! # qc
//!
//! The public facade crate for the query compiler. It is the recommended
//! dependency for anything embedding the compiler end to end: a schema
//! loader, a migration tool, or a backend supervisor.
//!
//! Low-level internals live in their own crates (`qc-ir`, `qc-schema`,
//! `qc-infer`, `qc-storage`, `qc-delta`, `qc-ddl`, `qc-errors`,
//! `qc-backend`) and are re-exported here under matching module names so a
//! caller never needs to depend on them directly.
//!
//! ## Crate layout
//!
//! - `ir` — expression and statement nodes, the arena, path ids (C2, C3)
//! - `schema` — the persistent schema model (C1)
//! - `infer` — static type inference over `ir` expressions (C4)
//! - `storage` — physical storage-shape resolution (C5)
//! - `delta` — the schema delta / migration command tree (input to C7)
//! - `ddl` — inheritance views, referential triggers, per-class DDL
//!   emitters, and the delta dispatcher (C6, C7, C8, C9)
//! - `errors` — backend error classification and translation (C10)
//! - `backend` — the backend process supervision contract (C11)
//!
//! `prelude` re-exports the pieces most callers touch across all of the
//! above; reach into the individual modules for anything more specific.

pub use qc_backend as backend;
pub use qc_ddl as ddl;
pub use qc_delta as delta;
pub use qc_errors as errors;
pub use qc_infer as infer;
pub use qc_ir as ir;
pub use qc_schema as schema;
pub use qc_storage as storage;

pub mod prelude {
    pub use qc_backend::prelude::*;
    pub use qc_ddl::prelude::*;
    pub use qc_delta::prelude::*;
    pub use qc_errors::prelude::*;
    pub use qc_infer::prelude::*;
    pub use qc_ir::prelude::*;
    pub use qc_schema::prelude::*;
    pub use qc_storage::prelude::*;
}
