use crate::name::Name;
use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Whether a path step follows a pointer from source to target (`Outbound`)
/// or target to source (`Inbound`, i.e. a backlink traversal `.<ptr`).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Inbound,
}

///
/// Namespace
///
/// Scopes a path step to the lexical context it was produced in. Nodes
/// synthesized by the compiler (rather than written by the user, e.g. an
/// amended `EmptySet`) live in the reserved `__derived__` namespace so that
/// their identity never collides with a user path.
///

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    User,
    Derived,
    Named(String),
}

impl Namespace {
    pub const DERIVED_MODULE: &'static str = "__derived__";

    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(self, Self::Derived)
    }
}

///
/// PathStep
///
/// One `(type-or-pointer, direction, namespace)` step of a `PathId`.
///

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    pub rptr: Name,
    pub direction: Direction,
    pub namespace: Namespace,
}

impl PathStep {
    #[must_use]
    pub fn new(rptr: Name, direction: Direction, namespace: Namespace) -> Self {
        Self {
            rptr,
            direction,
            namespace,
        }
    }
}

///
/// PathId
///
/// A symbolic, structural identity for an IR set's provenance along a path
/// expression. Equality is structural: two path ids are equal iff
/// their step sequences are equal component-wise.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PathId {
    steps: Vec<PathStep>,
}

impl PathId {
    #[must_use]
    pub const fn root() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub fn extend(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Re-derive this path id into the reserved `__derived__` namespace, as
    /// happens when an `EmptySet`'s type is amended by common-type inference.
    /// The last step (if any) is rewritten in place; a root path
    /// gains a synthetic derived step so the rewrite is always observable.
    #[must_use]
    pub fn rederive_in_derived_module(&self, rptr: Name) -> Self {
        let mut steps = self.steps.clone();
        let step = PathStep::new(rptr, Direction::Outbound, Namespace::Derived);
        if let Some(last) = steps.last_mut() {
            *last = step;
        } else {
            steps.push(step);
        }
        Self { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_has_no_steps() {
        assert!(PathId::root().is_root());
    }

    #[test]
    fn extend_appends_and_preserves_identity() {
        let root = PathId::root();
        let step = PathStep::new(Name::simple("name"), Direction::Outbound, Namespace::User);
        let extended = root.extend(step.clone());

        assert_eq!(extended.steps(), &[step]);
        assert!(root.is_root(), "extend must not mutate the original");
    }

    #[test]
    fn structural_equality_ignores_identity() {
        let a = PathId::root().extend(PathStep::new(
            Name::simple("x"),
            Direction::Outbound,
            Namespace::User,
        ));
        let b = PathId::root().extend(PathStep::new(
            Name::simple("x"),
            Direction::Outbound,
            Namespace::User,
        ));
        assert_eq!(a, b);
    }

    #[test]
    fn rederive_moves_last_step_into_derived_module() {
        let p = PathId::root().extend(PathStep::new(
            Name::simple("x"),
            Direction::Outbound,
            Namespace::User,
        ));
        let derived = p.rederive_in_derived_module(Name::simple("x"));
        assert!(derived.steps().last().unwrap().namespace.is_derived());
    }
}
