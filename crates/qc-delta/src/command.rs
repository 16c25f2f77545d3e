use qc_ir::name::Name;
use qc_schema::aux::{Annotation, Cast, Constraint, Function, Index, Operator};
use qc_schema::object::FieldValue;
use qc_schema::pointer::Pointer;
use qc_schema::types::{ObjectType, ScalarType};
use std::collections::BTreeMap;

///
/// SchemaObjectPayload
///
/// A `Create` command's full object definition. describes a command's
/// mutation surface as "a field-update map", which is the right shape for
/// `Alter` (sparse field changes) but not for `Create` (a brand new object
/// needs its complete definition, not a diff against nothing) — this payload
/// carries that definition so the dispatcher (C7) can hand it straight to
/// the matching `Schema::add_*` method.
///

#[derive(Clone, Debug)]
pub enum SchemaObjectPayload {
    Scalar(ScalarType),
    Object(ObjectType),
    Pointer(Pointer),
    Constraint(Constraint),
    Index(Index),
    Function(Function),
    Operator(Operator),
    Cast(Cast),
    Annotation(Annotation),
}

///
/// ObjectClass
///
/// Which schema object subtype a [`Command`] targets. The dispatcher
/// (C7) looks up an emitter by `(ObjectClass, CommandKind)`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ObjectClass {
    ScalarType,
    ObjectType,
    Pointer,
    Constraint,
    Index,
    Function,
    Operator,
    Cast,
    Annotation,
}

///
/// CommandKind
///
/// What a [`Command`] does to its subject.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Create,
    Alter,
    Rename,
    Rebase,
    Delete,
}

///
/// Command
///
/// One node of a delta plan: a subject (class + name), a kind, a
/// field-update map, and three ordered lists of child commands —
/// prerequisites (must apply before this command's own effect), main
/// (nested alters that are logically part of this command, e.g. a pointer
/// alter nested under its owning object type's alter), and caused (follow-on
/// commands this one's effect requires, e.g. an inheritance-view refresh).
///
/// `if_unused` only matters for `CommandKind::Delete`: when set, a delete
/// whose subject is still referenced is skipped rather than failing.
///

#[derive(Clone, Debug)]
pub struct Command {
    pub class: ObjectClass,
    pub kind: CommandKind,
    pub subject: Name,
    pub if_unused: bool,
    pub fields: BTreeMap<String, FieldValue>,
    pub payload: Option<SchemaObjectPayload>,
    pub prerequisites: Vec<Command>,
    pub main: Vec<Command>,
    pub caused: Vec<Command>,
}

impl Command {
    #[must_use]
    pub fn new(class: ObjectClass, kind: CommandKind, subject: Name) -> Self {
        Self {
            class,
            kind,
            subject,
            if_unused: false,
            fields: BTreeMap::new(),
            payload: None,
            prerequisites: Vec::new(),
            main: Vec::new(),
            caused: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_if_unused(mut self, if_unused: bool) -> Self {
        self.if_unused = if_unused;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: SchemaObjectPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// True for an `Alter` with no field updates and no children: applying
    /// it should produce a schema snapshot identical by value to the input.
    #[must_use]
    pub fn is_no_op_alter(&self) -> bool {
        matches!(self.kind, CommandKind::Alter)
            && self.fields.is_empty()
            && self.prerequisites.is_empty()
            && self.main.is_empty()
            && self.caused.is_empty()
    }

    /// Depth-first walk: prerequisites, then
    /// this command itself, then its main subcommands, then caused
    /// commands, each in declaration order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Command)) {
        for p in &self.prerequisites {
            p.walk(visit);
        }
        visit(self);
        for m in &self.main {
            m.walk(visit);
        }
        for c in &self.caused {
            c.walk(visit);
        }
    }
}

///
/// DeltaRoot
///
/// Groups the top-level commands of one delta. Execution
/// materializes a new schema snapshot and an ordered list of backend
/// operations.
///

#[derive(Clone, Debug, Default)]
pub struct DeltaRoot {
    pub commands: Vec<Command>,
}

impl DeltaRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Walk every top-level command in declaration order, each depth-first.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Command)) {
        for cmd in &self.commands {
            cmd.walk(&mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_field_alter_with_no_children_is_a_no_op() {
        let cmd = Command::new(
            ObjectClass::ObjectType,
            CommandKind::Alter,
            Name::simple("User"),
        );
        assert!(cmd.is_no_op_alter());
    }

    #[test]
    fn walk_visits_prerequisites_then_self_then_main_then_caused() {
        let mut root = Command::new(ObjectClass::ObjectType, CommandKind::Create, Name::simple("Root"));
        root.prerequisites.push(Command::new(
            ObjectClass::ScalarType,
            CommandKind::Create,
            Name::simple("Pre"),
        ));
        root.main.push(Command::new(
            ObjectClass::Pointer,
            CommandKind::Create,
            Name::simple("Main"),
        ));
        root.caused.push(Command::new(
            ObjectClass::Index,
            CommandKind::Create,
            Name::simple("Caused"),
        ));

        let mut seen = Vec::new();
        root.walk(&mut |cmd| seen.push(cmd.subject.to_string()));

        assert_eq!(seen, vec!["Pre", "Root", "Main", "Caused"]);
    }

    #[test]
    fn delta_root_preserves_declaration_order_across_top_level_commands() {
        let mut root = DeltaRoot::new();
        root.push(Command::new(
            ObjectClass::ObjectType,
            CommandKind::Create,
            Name::simple("A"),
        ));
        root.push(Command::new(
            ObjectClass::ObjectType,
            CommandKind::Create,
            Name::simple("B"),
        ));

        let mut seen = Vec::new();
        root.walk(|cmd| seen.push(cmd.subject.to_string()));
        assert_eq!(seen, vec!["A", "B"]);
    }
}
