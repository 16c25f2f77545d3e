pub mod command;

pub mod prelude {
    pub use crate::command::{Command, CommandKind, DeltaRoot, ObjectClass, SchemaObjectPayload};
}
