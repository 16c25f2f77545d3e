use crate::id::ObjectId;
use crate::object::{SchemaObject, SchemaObjectBase};
use qc_ir::expr_box::ExprBox;
use serde::{Deserialize, Serialize};

///
/// PointerCardinality
///
/// Upper (`ONE`/`MANY`) x lower (required/optional) cardinality, as an
/// independent pair rather than a single enum, matching exact phrase
/// "cardinality (upper {ONE, MANY} x lower {required, optional})".
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointerCardinality {
    pub upper: Upper,
    pub required: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Upper {
    One,
    Many,
}

impl PointerCardinality {
    #[must_use]
    pub const fn single_required() -> Self {
        Self {
            upper: Upper::One,
            required: true,
        }
    }

    #[must_use]
    pub const fn single_optional() -> Self {
        Self {
            upper: Upper::One,
            required: false,
        }
    }

    #[must_use]
    pub const fn multi(required: bool) -> Self {
        Self {
            upper: Upper::Many,
            required,
        }
    }

    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self.upper, Upper::Many)
    }

    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self.upper, Upper::One)
    }
}

///
/// PointerDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PointerDirection {
    Forward,
    Inverse,
}

///
/// OnTargetDelete
///
/// The policy consulted by the referential-action trigger synthesizer
/// when the pointer's target row is deleted.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OnTargetDelete {
    Restrict,
    DeferredRestrict,
    Allow,
    DeleteSource,
}

///
/// PointerKind
///
/// A `Link` (object to object, may carry its own properties) or a
/// `Property` (object to scalar/collection) —
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PointerKind {
    Link { allows_link_properties: bool },
    Property,
}

///
/// Pointer
///
/// The generalization of `Link` and `Property`. `source` is
/// always an `ObjectType`, except for a link property's own pointers, whose
/// `source` is the owning `Link`'s id.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pointer {
    pub base: SchemaObjectBase,
    pub kind: PointerKind,
    pub source: ObjectId,
    pub target: crate::types::Type,
    pub cardinality: PointerCardinality,
    pub direction: PointerDirection,
    pub on_target_delete: OnTargetDelete,
    #[serde(skip)]
    pub computable: Option<ExprBox>,
    #[serde(skip)]
    pub default: Option<ExprBox>,
    /// Only meaningful for `PointerKind::Link`: properties local to the
    /// link itself.
    pub link_properties: Vec<ObjectId>,
}

impl Pointer {
    #[must_use]
    pub fn new(
        base: SchemaObjectBase,
        kind: PointerKind,
        source: ObjectId,
        target: crate::types::Type,
        cardinality: PointerCardinality,
    ) -> Self {
        Self {
            base,
            kind,
            source,
            target,
            cardinality,
            direction: PointerDirection::Forward,
            on_target_delete: OnTargetDelete::Restrict,
            computable: None,
            default: None,
            link_properties: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self.kind, PointerKind::Link { .. })
    }

    #[must_use]
    pub const fn is_computable(&self) -> bool {
        self.computable.is_some()
    }

    ///: computable and derived pointers have no storage regardless of
    /// any other attribute.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        self.is_computable()
    }

    #[must_use]
    pub const fn has_link_properties(&self) -> bool {
        !self.link_properties.is_empty()
    }
}

impl SchemaObject for Pointer {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.kind == other.kind
            && self.source == other.source
            && self.target == other.target
            && self.cardinality == other.cardinality
            && self.direction == other.direction
            && self.on_target_delete == other.on_target_delete
            && self.link_properties == other.link_properties
    }
}
impl Eq for Pointer {}
