use std::cell::Cell;
use std::fmt;

///
/// Cardinality
///
/// The result cardinality of a `Set`: how many rows (`Many`/`One`) and
/// whether at least one is guaranteed (`AtLeastOne`). Unlike the schema's
/// pointer cardinality (upper {ONE, MANY} x lower {required, optional}),
/// this is an IR-local fact about an expression's *result stream*, derived
/// by a separate inference pass and therefore mutable after construction.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Cardinality {
    #[default]
    Unknown,
    AtMostOne,
    One,
    Many,
    AtLeastOne,
}

impl Cardinality {
    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self, Self::One | Self::AtMostOne)
    }

    #[must_use]
    pub const fn is_possibly_empty(self) -> bool {
        matches!(self, Self::Unknown | Self::AtMostOne | Self::Many)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::AtMostOne => "at-most-one",
            Self::One => "one",
            Self::Many => "many",
            Self::AtLeastOne => "at-least-one",
        };
        write!(f, "{label}")
    }
}

///
/// CardinalityCell
///
/// A post-construction-mutable cardinality slot, used on call nodes and
/// pointer references. Wrapping in `Cell` keeps the rest of an IR node
/// `Copy`-free but field-by-field immutable, matching invariant that
/// only cardinality is mutated after construction.
///

#[derive(Clone, Debug, Default)]
pub struct CardinalityCell(Cell<Cardinality>);

impl CardinalityCell {
    #[must_use]
    pub fn new(initial: Cardinality) -> Self {
        Self(Cell::new(initial))
    }

    #[must_use]
    pub fn get(&self) -> Cardinality {
        self.0.get()
    }

    pub fn set(&self, value: Cardinality) {
        self.0.set(value);
    }
}

impl PartialEq for CardinalityCell {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}
impl Eq for CardinalityCell {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cardinality_is_unknown() {
        assert_eq!(Cardinality::default(), Cardinality::Unknown);
    }

    #[test]
    fn cell_is_mutable_after_construction() {
        let cell = CardinalityCell::new(Cardinality::Unknown);
        assert_eq!(cell.get(), Cardinality::Unknown);
        cell.set(Cardinality::One);
        assert_eq!(cell.get(), Cardinality::One);
    }

    #[test]
    fn one_and_at_most_one_are_single() {
        assert!(Cardinality::One.is_single());
        assert!(Cardinality::AtMostOne.is_single());
        assert!(!Cardinality::Many.is_single());
    }
}
