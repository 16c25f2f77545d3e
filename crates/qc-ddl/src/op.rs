use crate::quote::ident_quote;

///
/// ColumnDef
///
/// One column of a `CreateTable` / `AlterTableAddColumn` operation. `name`
/// and `sql_type` are already the backend's own spelling (e.g. `bigint`);
/// quoting of `name` happens at `Display` time, not at construction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
    pub not_null: bool,
}

///
/// TriggerTiming / TriggerEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriggerTiming {
    Before,
    After,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
}

///
/// PgOp
///
/// A strongly typed backend operation. Emitters append these to an
/// ordered buffer instead of formatting SQL text directly; the `Display`
/// impl below is a minimal rendering sufficient for tests and diagnostics,
/// not the canonical renderer.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PgOp {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
    },
    AlterTableAddColumn {
        table: String,
        column: ColumnDef,
    },
    AlterTableDropColumn {
        table: String,
        column: String,
    },
    AlterTableAlterColumnType {
        table: String,
        column: String,
        new_type: String,
        using: Option<String>,
    },
    AlterTableSetNotNull {
        table: String,
        column: String,
    },
    AlterTableDropNotNull {
        table: String,
        column: String,
    },
    DropTable {
        table: String,
    },
    CreateView {
        view: String,
        query: String,
    },
    CreateOrReplaceView {
        view: String,
        query: String,
    },
    DropView {
        view: String,
    },
    CreateTrigger {
        trigger: String,
        table: String,
        timing: TriggerTiming,
        event: TriggerEvent,
        body: String,
    },
    DropTrigger {
        trigger: String,
        table: String,
    },
    CreateEnum {
        type_name: String,
        values: Vec<String>,
    },
    AlterEnumAddValue {
        type_name: String,
        value: String,
        before: Option<String>,
    },
    DropType {
        type_name: String,
    },
    CreateIndex {
        index: String,
        table: String,
        columns: Vec<String>,
        unique: bool,
    },
    DropIndex {
        index: String,
    },
    CreateConstraint {
        table: String,
        constraint: String,
        definition: String,
    },
    DropConstraint {
        table: String,
        constraint: String,
    },
    RawUpdate {
        table: String,
        set_clause: String,
        where_clause: Option<String>,
    },
    RawInsertSelect {
        into_table: String,
        select: String,
    },
    RawDelete {
        table: String,
        where_clause: Option<String>,
    },
    CreateFunction {
        name: String,
        args: String,
        returns: String,
        body: String,
    },
    CreateOperator {
        name: String,
        left_type: Option<String>,
        right_type: Option<String>,
        function: String,
    },
    CreateCast {
        from_type: String,
        to_type: String,
        function: Option<String>,
        implicit: bool,
        assignment: bool,
    },
    Comment {
        object: String,
        text: String,
    },
}

impl std::fmt::Display for PgOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateTable { table, columns } => {
                let cols: Vec<String> = columns
                    .iter()
                    .map(|c| {
                        format!(
                            "{} {}{}",
                            ident_quote(&c.name),
                            c.sql_type,
                            if c.not_null { " NOT NULL" } else { "" }
                        )
                    })
                    .collect();
                write!(f, "CREATE TABLE {} ({})", ident_quote(table), cols.join(", "))
            }
            Self::AlterTableAddColumn { table, column } => write!(
                f,
                "ALTER TABLE {} ADD COLUMN {} {}{}",
                ident_quote(table),
                ident_quote(&column.name),
                column.sql_type,
                if column.not_null { " NOT NULL" } else { "" }
            ),
            Self::AlterTableDropColumn { table, column } => write!(
                f,
                "ALTER TABLE {} DROP COLUMN {}",
                ident_quote(table),
                ident_quote(column)
            ),
            Self::AlterTableAlterColumnType {
                table,
                column,
                new_type,
                using,
            } => write!(
                f,
                "ALTER TABLE {} ALTER COLUMN {} TYPE {}{}",
                ident_quote(table),
                ident_quote(column),
                new_type,
                using
                    .as_ref()
                    .map(|u| format!(" USING {u}"))
                    .unwrap_or_default()
            ),
            Self::AlterTableSetNotNull { table, column } => write!(
                f,
                "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                ident_quote(table),
                ident_quote(column)
            ),
            Self::AlterTableDropNotNull { table, column } => write!(
                f,
                "ALTER TABLE {} ALTER COLUMN {} DROP NOT NULL",
                ident_quote(table),
                ident_quote(column)
            ),
            Self::DropTable { table } => write!(f, "DROP TABLE {}", ident_quote(table)),
            Self::CreateView { view, query } => {
                write!(f, "CREATE VIEW {} AS {}", ident_quote(view), query)
            }
            Self::CreateOrReplaceView { view, query } => {
                write!(f, "CREATE OR REPLACE VIEW {} AS {}", ident_quote(view), query)
            }
            Self::DropView { view } => write!(f, "DROP VIEW {}", ident_quote(view)),
            Self::CreateTrigger {
                trigger,
                table,
                timing,
                event,
                body,
            } => write!(
                f,
                "CREATE TRIGGER {} {} {} ON {} EXECUTE {}",
                ident_quote(trigger),
                match timing {
                    TriggerTiming::Before => "BEFORE",
                    TriggerTiming::After => "AFTER",
                },
                match event {
                    TriggerEvent::Insert => "INSERT",
                    TriggerEvent::Update => "UPDATE",
                    TriggerEvent::Delete => "DELETE",
                },
                ident_quote(table),
                body
            ),
            Self::DropTrigger { trigger, table } => write!(
                f,
                "DROP TRIGGER {} ON {}",
                ident_quote(trigger),
                ident_quote(table)
            ),
            Self::CreateEnum { type_name, values } => write!(
                f,
                "CREATE TYPE {} AS ENUM ({})",
                ident_quote(type_name),
                values
                    .iter()
                    .map(|v| crate::quote::literal_quote(v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::AlterEnumAddValue {
                type_name,
                value,
                before,
            } => write!(
                f,
                "ALTER TYPE {} ADD VALUE {}{}",
                ident_quote(type_name),
                crate::quote::literal_quote(value),
                before
                    .as_ref()
                    .map(|b| format!(" BEFORE {}", crate::quote::literal_quote(b)))
                    .unwrap_or_default()
            ),
            Self::DropType { type_name } => write!(f, "DROP TYPE {}", ident_quote(type_name)),
            Self::CreateIndex {
                index,
                table,
                columns,
                unique,
            } => write!(
                f,
                "CREATE {}INDEX {} ON {} ({})",
                if *unique { "UNIQUE " } else { "" },
                ident_quote(index),
                ident_quote(table),
                columns
                    .iter()
                    .map(|c| ident_quote(c))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::DropIndex { index } => write!(f, "DROP INDEX {}", ident_quote(index)),
            Self::CreateConstraint {
                table,
                constraint,
                definition,
            } => write!(
                f,
                "ALTER TABLE {} ADD CONSTRAINT {} {}",
                ident_quote(table),
                ident_quote(constraint),
                definition
            ),
            Self::DropConstraint { table, constraint } => write!(
                f,
                "ALTER TABLE {} DROP CONSTRAINT {}",
                ident_quote(table),
                ident_quote(constraint)
            ),
            Self::RawUpdate {
                table,
                set_clause,
                where_clause,
            } => write!(
                f,
                "UPDATE {} SET {}{}",
                ident_quote(table),
                set_clause,
                where_clause
                    .as_ref()
                    .map(|w| format!(" WHERE {w}"))
                    .unwrap_or_default()
            ),
            Self::RawInsertSelect { into_table, select } => {
                write!(f, "INSERT INTO {} {}", ident_quote(into_table), select)
            }
            Self::RawDelete {
                table,
                where_clause,
            } => write!(
                f,
                "DELETE FROM {}{}",
                ident_quote(table),
                where_clause
                    .as_ref()
                    .map(|w| format!(" WHERE {w}"))
                    .unwrap_or_default()
            ),
            Self::CreateFunction {
                name,
                args,
                returns,
                body,
            } => write!(
                f,
                "CREATE FUNCTION {}({}) RETURNS {} AS {}",
                ident_quote(name),
                args,
                returns,
                body
            ),
            Self::CreateOperator {
                name,
                left_type,
                right_type,
                function,
            } => write!(
                f,
                "CREATE OPERATOR {} (LEFTARG = {}, RIGHTARG = {}, FUNCTION = {})",
                name,
                left_type.as_deref().unwrap_or("NONE"),
                right_type.as_deref().unwrap_or("NONE"),
                function
            ),
            Self::CreateCast {
                from_type,
                to_type,
                function,
                implicit,
                assignment,
            } => write!(
                f,
                "CREATE CAST ({from_type} AS {to_type}) WITH {} AS {}",
                function
                    .as_ref()
                    .map_or_else(|| "INOUT".to_string(), |fun| format!("FUNCTION {fun}")),
                if *implicit {
                    "IMPLICIT"
                } else if *assignment {
                    "ASSIGNMENT"
                } else {
                    "EXPLICIT"
                }
            ),
            Self::Comment { object, text } => write!(
                f,
                "COMMENT ON {} IS {}",
                object,
                crate::quote::literal_quote(text)
            ),
        }
    }
}
