use crate::id::ObjectId;
use crate::object::{SchemaObject, SchemaObjectBase};
use crate::types::Type;
use qc_ir::expr_box::ExprBox;
use serde::{Deserialize, Serialize};

///
/// Constraint
///
/// A named auxiliary object referencing a subject pointer or scalar type.
/// `expr` is the constraint predicate; `subjectexpr`, when present,
/// is evaluated on the subject's enclosing object (e.g. an exclusivity
/// constraint spanning more than one property).
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Constraint {
    pub base: SchemaObjectBase,
    pub subject: ObjectId,
    pub kind: ConstraintKind,
    #[serde(skip)]
    pub expr: ExprBox,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    Check,
    Unique,
    Exclusion,
    MinValue,
    MaxValue,
    MaxLength,
    Regexp,
}

impl SchemaObject for Constraint {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// Index
///
/// A named auxiliary object over one or more pointers of an `ObjectType`.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Index {
    pub base: SchemaObjectBase,
    pub subject: ObjectId,
    pub fields: Vec<ObjectId>,
    pub is_unique: bool,
}

impl SchemaObject for Index {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// Parameter
///
/// One positional or named parameter of a `Function`. Declared type may be
/// a `PseudoType` (`anytype`) for polymorphic, object-dispatched overloads.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub has_default: bool,
}

///
/// Function
///
/// A named auxiliary object with one or more overloads sharing a name. Each
/// overload's body is a source-language expression compiled to the backend
/// SQL dialect by C8.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Function {
    pub base: SchemaObjectBase,
    pub params: Vec<Parameter>,
    pub return_type: Type,
    #[serde(skip)]
    pub body: ExprBox,
}

impl Function {
    /// True when any parameter's declared type is `anytype`, triggering the
    /// object-type dispatcher codegen path.
    #[must_use]
    pub fn needs_object_dispatch(&self) -> bool {
        self.params
            .iter()
            .any(|p| matches!(p.ty, Type::Object(_)) && self.has_sibling_overloads())
    }

    fn has_sibling_overloads(&self) -> bool {
        // Overload grouping is tracked by the schema's name index;
        // this placeholder keeps the decision local to the function object
        // so callers can override without touching the schema.
        self.base
            .get_field("has_sibling_overloads")
            .map(|v| matches!(v, crate::object::FieldValue::Bool(true)))
            .unwrap_or(false)
    }
}

impl SchemaObject for Function {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// Operator
///
/// A named auxiliary object binding a backend `OPERATOR` to one or two
/// operand types and a return type.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operator {
    pub base: SchemaObjectBase,
    pub operand_types: Vec<Type>,
    pub return_type: Type,
    pub is_infix: bool,
    #[serde(skip)]
    pub body: Option<ExprBox>,
}

impl SchemaObject for Operator {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// Cast
///
/// A named auxiliary object describing one source type -> target type
/// conversion.
///

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cast {
    pub base: SchemaObjectBase,
    pub from_type: Type,
    pub to_type: Type,
    pub allow_implicit: bool,
    pub allow_assignment: bool,
    #[serde(skip)]
    pub body: Option<ExprBox>,
}

impl SchemaObject for Cast {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

///
/// Annotation
///
/// A named auxiliary object attaching a literal string value to any schema
/// object (docstrings, display names, deprecation notices). Annotation
/// commands mutate the schema value only and never reach the backend
/// dispatcher.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub base: SchemaObjectBase,
    pub subject: ObjectId,
    pub value: String,
    pub inheritable: bool,
}

impl SchemaObject for Annotation {
    fn base(&self) -> &SchemaObjectBase {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_ir::name::Name;

    #[test]
    fn function_without_sibling_overloads_skips_dispatch() {
        let base = SchemaObjectBase::new(ObjectId(1), Name::simple("describe"));
        let func = Function {
            base,
            params: vec![Parameter {
                name: "x".into(),
                ty: Type::Object(ObjectId(2)),
                has_default: false,
            }],
            return_type: Type::Scalar(ObjectId(3)),
            body: ExprBox::from_text("select 'x'"),
        };
        assert!(!func.needs_object_dispatch());
    }
}
