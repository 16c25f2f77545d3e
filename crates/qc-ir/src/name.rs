use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Name
///
/// A name is either a bare identifier or a qualified `(module, name)` pair.
/// Qualified names are equal by component equality and are the schema's
/// primary key for objects.
///

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Name {
    Simple(String),
    Qualified(ModuleName, String),
}

impl Name {
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    #[must_use]
    pub fn qualified(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified(ModuleName(module.into()), name.into())
    }

    #[must_use]
    pub fn module(&self) -> Option<&ModuleName> {
        match self {
            Self::Simple(_) => None,
            Self::Qualified(module, _) => Some(module),
        }
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        match self {
            Self::Simple(name) | Self::Qualified(_, name) => name,
        }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(name) => write!(f, "{name}"),
            Self::Qualified(module, name) => write!(f, "{module}::{name}"),
        }
    }
}

///
/// ModuleName
///

#[derive(Clone, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ModuleName(pub String);

impl ModuleName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_names_compare_by_component() {
        let a = Name::qualified("std", "int64");
        let b = Name::qualified("std", "int64");
        let c = Name::qualified("other", "int64");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn simple_name_has_no_module() {
        let n = Name::simple("x");
        assert!(n.module().is_none());
        assert_eq!(n.local_name(), "x");
    }

    #[test]
    fn display_formats_qualified_as_double_colon() {
        let n = Name::qualified("__derived__", "expr~1");
        assert_eq!(n.to_string(), "__derived__::expr~1");
    }
}
