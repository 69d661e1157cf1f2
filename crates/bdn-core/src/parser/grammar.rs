//! Grammar — the productions of the notation, as text
//!
//! The parser names each production it enters; when a committed production
//! fails, the text of the innermost one is appended to the error excerpt.

/// Production name and its right hand side
pub const GRAMMAR: &[(&str, &str)] = &[
    ("document", "component EOL EOF"),
    ("source", "component EOF"),
    ("component", "entity context? note?"),
    ("entity", "element | string | collection | procedure"),
    ("context", "'(' parameters ')'"),
    ("parameters", "parameter (',' parameter)* | EOL (parameter EOL)+"),
    ("parameter", "symbol ':' component"),
    ("collection", "'[' (catalog | range | list) ']'"),
    ("catalog", "association (',' association)* | EOL (association EOL)* | ':'"),
    ("association", "primitive ':' component"),
    ("range", "primitive? ('..' | '<..' | '..<' | '<..<') primitive?"),
    ("list", "component (',' component)* | EOL (component EOL)* | /*empty*/"),
    ("procedure", "'{' statement ((';' | EOL) statement)* '}'"),
    ("primitive", "element | string"),
    (
        "element",
        "ANGLE | BOOLEAN | DURATION | MOMENT | NUMBER | PATTERN | PERCENTAGE | PROBABILITY | RESOURCE | SYMBOL | TAG",
    ),
    ("string", "BINARY | NAME | NARRATIVE | QUOTE | VERSION"),
    ("note", "NOTE"),
];

/// The right hand side of a production
pub fn production(rule: &str) -> Option<&'static str> {
    GRAMMAR
        .iter()
        .find(|(name, _)| *name == rule)
        .map(|(_, text)| *text)
}

/// Render a production the way it appears in error messages
pub fn describe(rule: &str) -> String {
    match production(rule) {
        Some(text) => format!("{}: {}", rule, text),
        None => rule.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_is_unique() {
        for (index, (name, _)) in GRAMMAR.iter().enumerate() {
            assert!(
                GRAMMAR[index + 1..].iter().all(|(other, _)| other != name),
                "duplicate rule {}",
                name
            );
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("parameter"), "parameter: symbol ':' component");
        assert_eq!(describe("unknown"), "unknown");
    }
}
