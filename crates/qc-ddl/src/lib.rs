pub mod dispatcher;
pub mod emit;
pub mod op;
pub mod quote;
pub mod trigger;
pub mod view;

pub mod prelude {
    pub use crate::dispatcher::{apply, DispatchError};
    pub use crate::op::{ColumnDef, PgOp, TriggerEvent, TriggerTiming};
    pub use crate::quote::{ident_quote, literal_quote};
    pub use crate::trigger::triggers_for;
    pub use crate::view::{create_view, InheritanceViewManager};
}
