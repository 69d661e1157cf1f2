//! Canonical formatter — renders components back into notation text
//!
//! The formatter is the inverse of the parser: formatting the tree parsed
//! from some text yields the canonical form of that text, and parsing the
//! canonical form yields the same tree.
//!
//! # Pipeline
//!
//! `text → parse → Component → format_document → SHA-256`
//!
//! # Guarantees
//!
//! - **Idempotent**: `canonicalize(canonicalize(x)) == canonicalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Bounded**: nesting past `max_depth` is truncated to `...`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::collections::{Catalog, List, Range};
use crate::elements::{Boolean, Number, Symbol};
use crate::parser::ast::{Collection, Component, Element, Entity, Primitive, Procedure};
use crate::strings::{Binary, Quote, Text};
use crate::{Error, Result};

/// Longest binary body written on the same line as its quotes
const BINARY_LINE_WIDTH: usize = 60;

/// Marker written in place of a structure nested too deeply
const TRUNCATION: &str = "...";

/// Formatter settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Indentation level of the first line
    pub indentation: usize,
    /// Deepest nesting of collections, contexts and procedures rendered
    pub max_depth: usize,
    /// Text of one level of indentation
    pub indent_unit: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indentation: 0,
            max_depth: 8,
            indent_unit: "    ".to_string(),
        }
    }
}

/// Renders components in canonical form
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Formatter { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn format_component(&self, component: &Component) -> String {
        debug!(max_depth = self.options.max_depth, "formatting component");
        let mut out = String::new();
        self.write_component(&mut out, component, self.options.indentation, 0);
        out
    }

    /// The component followed by a final end of line
    pub fn format_document(&self, component: &Component) -> String {
        let mut out = self.format_component(component);
        out.push('\n');
        out
    }

    // ── Component ──────────────────────────────────────

    fn write_component(&self, out: &mut String, component: &Component, level: usize, depth: usize) {
        self.write_entity(out, &component.entity, level, depth);
        if let Some(context) = &component.context {
            if !context.is_empty() {
                self.write_context(out, context, level, depth);
            }
        }
        if let Some(note) = &component.note {
            out.push_str("  ");
            out.push_str(note);
        }
    }

    fn write_entity(&self, out: &mut String, entity: &Entity, level: usize, depth: usize) {
        match entity {
            Entity::Element(element) => out.push_str(&element.to_string()),
            Entity::Text(text) => self.write_text(out, text, level),
            Entity::Collection(collection) => {
                if self.truncated(out, depth) {
                    return;
                }
                self.write_collection(out, collection, level, depth + 1);
            }
            Entity::Procedure(procedure) => {
                if self.truncated(out, depth) {
                    return;
                }
                self.write_procedure(out, procedure, level);
            }
        }
    }

    fn write_text(&self, out: &mut String, text: &Text, level: usize) {
        match text {
            Text::Binary(binary) => self.write_binary(out, binary, level),
            other => out.push_str(&other.to_string()),
        }
    }

    /// Emit the truncation marker when `depth` is already at the limit
    fn truncated(&self, out: &mut String, depth: usize) -> bool {
        if depth < self.options.max_depth {
            return false;
        }
        warn!(max_depth = self.options.max_depth, "truncating deeply nested structure");
        out.push_str(TRUNCATION);
        true
    }

    // ── Collections ────────────────────────────────────

    fn write_collection(&self, out: &mut String, collection: &Collection, level: usize, depth: usize) {
        match collection {
            Collection::List(list) => self.write_list(out, list, level, depth),
            Collection::Catalog(catalog) => self.write_catalog(out, catalog, level, depth),
            Collection::Range(range) => write_range(out, range),
        }
    }

    fn write_list(&self, out: &mut String, list: &List<Component>, level: usize, depth: usize) {
        match list.size() {
            0 => out.push_str("[ ]"),
            1 if list.iter().all(|item| item.note.is_none()) => {
                out.push('[');
                for item in list {
                    self.write_component(out, item, level, depth);
                }
                out.push(']');
            }
            _ => {
                out.push_str("[\n");
                for item in list {
                    self.write_indent(out, level + 1);
                    self.write_component(out, item, level + 1, depth);
                    out.push('\n');
                }
                self.write_indent(out, level);
                out.push(']');
            }
        }
    }

    fn write_catalog(
        &self,
        out: &mut String,
        catalog: &Catalog<Primitive, Component>,
        level: usize,
        depth: usize,
    ) {
        if catalog.is_empty() {
            out.push_str("[:]");
            return;
        }
        out.push('[');
        self.write_associations(out, catalog.iter().map(|a| (&a.key, &a.value)), level, depth);
        out.push(']');
    }

    fn write_context(
        &self,
        out: &mut String,
        context: &Catalog<Symbol, Component>,
        level: usize,
        depth: usize,
    ) {
        if self.truncated(out, depth) {
            return;
        }
        out.push('(');
        self.write_associations(out, context.iter().map(|a| (&a.key, &a.value)), level, depth + 1);
        out.push(')');
    }

    /// Shared layout of catalogs and contexts, between their delimiters
    fn write_associations<'c, K: std::fmt::Display + 'c>(
        &self,
        out: &mut String,
        associations: impl Iterator<Item = (&'c K, &'c Component)> + Clone,
        level: usize,
        depth: usize,
    ) {
        let count = associations.clone().count();
        let inline = count == 1 && associations.clone().all(|(_, value)| value.note.is_none());
        if inline {
            for (key, value) in associations {
                out.push_str(&format!("{}: ", key));
                self.write_component(out, value, level, depth);
            }
            return;
        }
        out.push('\n');
        for (key, value) in associations {
            self.write_indent(out, level + 1);
            out.push_str(&format!("{}: ", key));
            self.write_component(out, value, level + 1, depth);
            out.push('\n');
        }
        self.write_indent(out, level);
    }

    // ── Procedures and binaries ────────────────────────

    fn write_procedure(&self, out: &mut String, procedure: &Procedure, level: usize) {
        match procedure.statements.as_slice() {
            [] => out.push_str("{ }"),
            [statement] => {
                out.push('{');
                out.push_str(statement);
                out.push('}');
            }
            statements => {
                out.push_str("{\n");
                for statement in statements {
                    self.write_indent(out, level + 1);
                    out.push_str(statement);
                    out.push('\n');
                }
                self.write_indent(out, level);
                out.push('}');
            }
        }
    }

    fn write_binary(&self, out: &mut String, binary: &Binary, level: usize) {
        let body = binary.to_base64();
        if body.len() <= BINARY_LINE_WIDTH {
            out.push('\'');
            out.push_str(&body);
            out.push('\'');
            return;
        }
        out.push_str("'\n");
        // base-64 text is ASCII, so byte chunks are character chunks
        for line in body.as_bytes().chunks(BINARY_LINE_WIDTH) {
            self.write_indent(out, level + 1);
            out.push_str(&String::from_utf8_lossy(line));
            out.push('\n');
        }
        self.write_indent(out, level);
        out.push('\'');
    }

    // ── Helpers ────────────────────────────────────────

    fn write_indent(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str(&self.options.indent_unit);
        }
    }
}

fn write_range(out: &mut String, range: &Range<Primitive>) {
    out.push('[');
    if let Some(first) = &range.first {
        out.push_str(&first.to_string());
    }
    out.push_str(range.extent.delimiter());
    if let Some(last) = &range.last {
        out.push_str(&last.to_string());
    }
    out.push(']');
}

// ── Host values ───────────────────────────────────────────

/// Translate a JSON value into the component it denotes
fn component_from_json(value: &serde_json::Value) -> Result<Component> {
    use serde_json::Value;

    let entity: Entity = match value {
        Value::Null => {
            return Err(Error::FormatError(
                "null has no counterpart in the notation".to_string(),
            ))
        }
        Value::Bool(flag) => Element::Boolean(Boolean::new(*flag)).into(),
        Value::Number(number) => {
            let real = number.as_f64().ok_or_else(|| {
                Error::FormatError(format!("number {} is not representable", number))
            })?;
            Element::Number(Number::from_real(real)).into()
        }
        Value::String(text) => Text::Quote(Quote::new(text.as_str())).into(),
        Value::Array(items) => {
            let list = items
                .iter()
                .map(component_from_json)
                .collect::<Result<List<Component>>>()?;
            Collection::List(list).into()
        }
        Value::Object(fields) => {
            let mut catalog = Catalog::new();
            for (key, field) in fields {
                let key = Primitive::Text(Text::Quote(Quote::new(key.as_str())));
                catalog.put(key, component_from_json(field)?);
            }
            Collection::Catalog(catalog).into()
        }
    };
    Ok(Component::new(entity))
}

// ── Public API ────────────────────────────────────────────

/// Format a component with the default options
pub fn format_component(component: &Component) -> String {
    Formatter::default().format_component(component)
}

/// Format a component as a document (with its final end of line)
pub fn format_document(component: &Component) -> String {
    Formatter::default().format_document(component)
}

/// Format any serializable host value.
///
/// Booleans, numbers, strings, sequences and maps are rendered as the
/// corresponding elements and collections; map keys become quotes.
///
/// # Errors
/// Returns `FormatError` for values the notation cannot express (`null`).
pub fn format_value<T: Serialize>(value: &T, indentation: usize) -> Result<String> {
    let json = serde_json::to_value(value)
        .map_err(|e| Error::FormatError(format!("value is not serializable: {}", e)))?;
    let component = component_from_json(&json)?;
    let formatter = Formatter::new(FormatOptions {
        indentation,
        ..FormatOptions::default()
    });
    Ok(formatter.format_component(&component))
}

/// Parse a document and render it in canonical form
pub fn canonicalize(document: &[u8]) -> Result<String> {
    let component = crate::parser::parse_document(document)?;
    Ok(format_document(&component))
}

/// Compute the SHA-256 digest of a component's canonical document text
///
/// Equal components always have equal digests.
pub fn canonical_digest(component: &Component) -> String {
    let canonical = format_document(component);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
