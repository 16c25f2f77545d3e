///
/// Quoting discipline:
/// every identifier goes through [`ident_quote`], every literal through
/// [`literal_quote`]. Nothing in this crate string-concatenates a raw name
/// into generated DDL or trigger bodies.
///

/// Quote a backend identifier (table, column, trigger, type name), doubling
/// any embedded double quote.
#[must_use]
pub fn ident_quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a backend string literal, doubling any embedded single quote.
#[must_use]
pub fn literal_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_quote_doubles_embedded_quotes() {
        assert_eq!(ident_quote("Foo\"Bar"), "\"Foo\"\"Bar\"");
    }

    #[test]
    fn literal_quote_doubles_embedded_apostrophes() {
        assert_eq!(literal_quote("O'Brien"), "'O''Brien'");
    }
}
