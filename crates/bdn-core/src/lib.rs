//! BDN Core - tokenizer, parser, and canonical formatter for document notation
//!
//! Documents are trees of components: typed elements, strings, collections
//! and procedures, each optionally carrying a parameter context and a note.
//!
//! # Architecture
//!
//! ```text
//! Text → Tokenizer → Parser → Component → Formatter → Canonical Form
//!                                              ↓
//!                                        SHA-256 digest
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Canonical**: One formatted text per component tree
//! - **Round-trip**: `parse(format(c)) == c` for every well-formed component
//! - **Bounded**: Parser and formatter nesting limits are configurable

pub mod codex;
pub mod collections;
pub mod elements;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod strings;

pub use collections::{Association, Catalog, Extent, List, Range};
pub use elements::{
    Angle, Boolean, Duration, Moment, Number, Pattern, Percentage, Probability, Resource, Symbol,
    Tag,
};
pub use error::{Error, Result};
pub use formatter::{
    canonical_digest, canonicalize, format_component, format_document, format_value,
    FormatOptions, Formatter,
};
pub use parser::ast::*;
pub use parser::{
    parse_document, parse_document_with_options, parse_source, parse_source_with_options,
    ParseOptions,
};
pub use strings::{Binary, Citation, Name, Narrative, Quote, Text, Version};

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "[\n    $name: \"sensor\"\n    $range: [1..5]\n    $when: <2009-04>\n]($type: /bali/Document/v1)\n";

    #[test]
    fn test_document_round_trip() {
        let component = parse_document(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(format_document(&component), DOCUMENT);
    }

    #[test]
    fn test_component_serialization() {
        let component = parse_source("[$a: ~π, $b: [1, .5, #ABC]]").unwrap();
        let json = serde_json::to_string(&component).unwrap();
        let deserialized: Component = serde_json::from_str(&json).unwrap();
        assert_eq!(component, deserialized);
    }

    #[test]
    fn test_determinism_100_iterations() {
        let first = canonical_digest(&parse_document(DOCUMENT.as_bytes()).unwrap());
        for i in 0..100 {
            let component = parse_document(DOCUMENT.as_bytes()).unwrap();
            let digest = canonical_digest(&component);
            assert_eq!(first, digest, "Determinism failure at iteration {}", i);
        }
    }
}
