use serde::{Deserialize, Serialize};

///
/// ErrorDetails
///
/// The backend's raw error fields, parsed once at the call site
/// before classification. `detail_json` is populated only for errors that
/// embed a structured payload (constraint-violation detail messages often
/// do); everything else leaves it `None`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
    pub detail: Option<String>,
    pub detail_json: Option<serde_json::Value>,
    pub code: String,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub constraint_name: Option<String>,
}

impl ErrorDetails {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    #[must_use]
    pub fn with_column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint_name: impl Into<String>) -> Self {
        self.constraint_name = Some(constraint_name.into());
        self
    }
}
