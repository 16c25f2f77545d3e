pub mod resolver;

pub mod prelude {
    pub use crate::resolver::{column_type_of, resolve, ColumnType, StorageInfo, TableKind};
}
