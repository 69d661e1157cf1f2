//! Syntax tree — the component, entity and primitive node types
//!
//! A parsed document is a single [`Component`]: an entity, an optional
//! parameter context, and an optional trailing note. Every node is an owned
//! value; the tree cannot contain cycles.
//!
//! All node types derive Debug, Clone, PartialEq, Serialize, Deserialize.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collections::{Catalog, List, Range};
use crate::elements::{
    Angle, Boolean, Duration, Moment, Number, Pattern, Percentage, Probability, Resource, Symbol,
    Tag,
};
use crate::parser::tokenizer::TokenKind;
use crate::strings::Text;
use crate::{Error, Result};

/// One of the eleven primitive element kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Angle(Angle),
    Boolean(Boolean),
    Duration(Duration),
    Moment(Moment),
    Number(Number),
    Pattern(Pattern),
    Percentage(Percentage),
    Probability(Probability),
    Resource(Resource),
    Symbol(Symbol),
    Tag(Tag),
}

impl Element {
    /// Build the element a literal token denotes
    pub fn from_token(kind: TokenKind, text: &str) -> Result<Element> {
        Ok(match kind {
            TokenKind::Angle => Element::Angle(text.parse()?),
            TokenKind::Boolean => Element::Boolean(text.parse()?),
            TokenKind::Duration => Element::Duration(text.parse()?),
            TokenKind::Moment => Element::Moment(text.parse()?),
            TokenKind::Number => Element::Number(text.parse()?),
            TokenKind::Pattern => Element::Pattern(text.parse()?),
            TokenKind::Percentage => Element::Percentage(text.parse()?),
            TokenKind::Probability => Element::Probability(text.parse()?),
            TokenKind::Resource => Element::Resource(text.parse()?),
            TokenKind::Symbol => Element::Symbol(text.parse()?),
            TokenKind::Tag => Element::Tag(text.parse()?),
            other => {
                return Err(Error::value(
                    "element",
                    text,
                    format!("{} is not an element token", other),
                ))
            }
        })
    }

    /// Element kinds, for error messages
    pub fn is_element_token(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Angle
                | TokenKind::Boolean
                | TokenKind::Duration
                | TokenKind::Moment
                | TokenKind::Number
                | TokenKind::Pattern
                | TokenKind::Percentage
                | TokenKind::Probability
                | TokenKind::Resource
                | TokenKind::Symbol
                | TokenKind::Tag
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Angle(v) => v.fmt(f),
            Element::Boolean(v) => v.fmt(f),
            Element::Duration(v) => v.fmt(f),
            Element::Moment(v) => v.fmt(f),
            Element::Number(v) => v.fmt(f),
            Element::Pattern(v) => v.fmt(f),
            Element::Percentage(v) => v.fmt(f),
            Element::Probability(v) => v.fmt(f),
            Element::Resource(v) => v.fmt(f),
            Element::Symbol(v) => v.fmt(f),
            Element::Tag(v) => v.fmt(f),
        }
    }
}

/// An element or a string: the values usable as catalog keys and range endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Element(Element),
    Text(Text),
}

impl Primitive {
    /// The integer value of a real, integral number
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Primitive::Element(Element::Number(n)) => {
                let (re, im) = (n.real(), n.imaginary());
                let integral = im == 0.0 && re.is_finite() && re.fract() == 0.0;
                (integral && re.abs() < i64::MAX as f64).then_some(re as i64)
            }
            _ => None,
        }
    }

    /// The real value of a number with no imaginary part
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Primitive::Element(Element::Number(n)) if n.imaginary() == 0.0 => Some(n.real()),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Primitive::Element(v) => v.fmt(f),
            Primitive::Text(v) => v.fmt(f),
        }
    }
}

impl From<Element> for Primitive {
    fn from(element: Element) -> Self {
        Primitive::Element(element)
    }
}

impl From<Text> for Primitive {
    fn from(text: Text) -> Self {
        Primitive::Text(text)
    }
}

/// A list, catalog or range of components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Collection {
    List(List<Component>),
    Catalog(Catalog<Primitive, Component>),
    Range(Range<Primitive>),
}

impl Collection {
    pub fn size(&self) -> Option<u64> {
        match self {
            Collection::List(list) => Some(list.size() as u64),
            Collection::Catalog(catalog) => Some(catalog.size() as u64),
            Collection::Range(range) => range.size(),
        }
    }
}

impl Range<Primitive> {
    /// Number of integers in a range whose endpoints are integral numbers
    pub fn size(&self) -> Option<u64> {
        let first = self.first.as_ref()?.as_integer()?;
        let last = self.last.as_ref()?.as_integer()?;
        Range::new(Some(first), self.extent, Some(last)).size()
    }

    /// Whether `value` lies in a range whose present endpoints are real numbers
    pub fn contains(&self, value: f64) -> bool {
        let bound = |end: &Option<Primitive>| match end {
            Some(primitive) => primitive.as_real().map(Some),
            None => Some(None),
        };
        match (bound(&self.first), bound(&self.last)) {
            (Some(first), Some(last)) => Range::new(first, self.extent, last).contains(value),
            _ => false,
        }
    }
}

/// A procedure, kept as the raw text of its statements
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Procedure {
    pub statements: Vec<String>,
}

/// The payload of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Element(Element),
    Text(Text),
    Collection(Collection),
    Procedure(Procedure),
}

impl From<Element> for Entity {
    fn from(element: Element) -> Self {
        Entity::Element(element)
    }
}

impl From<Text> for Entity {
    fn from(text: Text) -> Self {
        Entity::Text(text)
    }
}

impl From<Primitive> for Entity {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Element(element) => Entity::Element(element),
            Primitive::Text(text) => Entity::Text(text),
        }
    }
}

impl From<Collection> for Entity {
    fn from(collection: Collection) -> Self {
        Entity::Collection(collection)
    }
}

/// Parameters attached to a component: `($type: /bali/types/Angle)`
pub type Context = Catalog<Symbol, Component>;

/// A parsed value with its optional parameters and trailing note.
///
/// The fields are only reachable through the builders, which keep every
/// component writable: an empty context is no context, and a note is a
/// single `! `-prefixed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ComponentFields")]
pub struct Component {
    pub(crate) entity: Entity,
    pub(crate) context: Option<Context>,
    pub(crate) note: Option<String>,
}

#[derive(Deserialize)]
struct ComponentFields {
    entity: Entity,
    context: Option<Context>,
    note: Option<String>,
}

impl From<ComponentFields> for Component {
    fn from(fields: ComponentFields) -> Self {
        Component {
            entity: fields.entity,
            context: fields.context.filter(|context| !context.is_empty()),
            note: fields.note.as_deref().and_then(note_text),
        }
    }
}

/// Normalize note text to one `! body` line; an empty body is no note
pub(crate) fn note_text(text: &str) -> Option<String> {
    let line = text.split(['\r', '\n']).next().unwrap_or("").trim_end();
    let body = line.strip_prefix('!').unwrap_or(line).trim_start();
    if body.is_empty() {
        None
    } else {
        Some(format!("! {}", body))
    }
}

impl Component {
    pub fn new(entity: impl Into<Entity>) -> Self {
        Component {
            entity: entity.into(),
            context: None,
            note: None,
        }
    }

    /// Attach parameters; an empty context leaves the component without one
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = if context.is_empty() { None } else { Some(context) };
        self
    }

    /// Attach a note; only the first line is kept and the `! ` prefix is
    /// added when missing
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note_text(note);
        self
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// The note, including its `! ` prefix
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn parameter(&self, symbol: &Symbol) -> Option<&Component> {
        self.context.as_ref()?.get(symbol)
    }

    pub fn as_list(&self) -> Option<&List<Component>> {
        match &self.entity {
            Entity::Collection(Collection::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn as_catalog(&self) -> Option<&Catalog<Primitive, Component>> {
        match &self.entity {
            Entity::Collection(Collection::Catalog(catalog)) => Some(catalog),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&Range<Primitive>> {
        match &self.entity {
            Entity::Collection(Collection::Range(range)) => Some(range),
            _ => None,
        }
    }
}

impl From<Element> for Component {
    fn from(element: Element) -> Self {
        Component::new(element)
    }
}

impl From<Collection> for Component {
    fn from(collection: Collection) -> Self {
        Component::new(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Extent;

    fn number(value: f64) -> Primitive {
        Primitive::Element(Element::Number(Number::from_real(value)))
    }

    #[test]
    fn test_element_from_token() {
        let angle = Element::from_token(TokenKind::Angle, "~π").unwrap();
        assert_eq!(angle, Element::Angle(Angle::PI));
        assert_eq!(angle.to_string(), "~π");
        assert!(Element::from_token(TokenKind::Tag, "#EEE").is_err());
        assert!(Element::from_token(TokenKind::Identifier, "abc").is_err());
    }

    #[test]
    fn test_range_size_honours_extent() {
        let range = Range::new(Some(number(-1.0)), Extent::Exclusive, Some(number(5.0)));
        assert_eq!(range.size(), Some(5));
        let range = Range::new(Some(number(1.0)), Extent::Inclusive, Some(number(1.5)));
        assert_eq!(range.size(), None);
        let range = Range::new(None, Extent::Inclusive, Some(number(3.0)));
        assert_eq!(range.size(), None);
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(Some(number(0.0)), Extent::RightExclusive, Some(number(10.0)));
        assert!(range.contains(0.0));
        assert!(range.contains(9.99));
        assert!(!range.contains(10.0));
        let text = Primitive::Text("v1".parse().unwrap());
        let range = Range::new(Some(text), Extent::Inclusive, None);
        assert!(!range.contains(1.0));
    }

    #[test]
    fn test_component_builders() {
        let mut context = Context::new();
        let key: Symbol = "$type".parse().unwrap();
        context.put(key.clone(), Component::new(Element::Boolean(Boolean::TRUE)));
        let component = Component::new(Element::Number(Number::ONE))
            .with_context(context)
            .with_note("first");
        assert_eq!(component.note(), Some("! first"));
        assert!(component.parameter(&key).is_some());
        assert!(component.as_list().is_none());
    }

    #[test]
    fn test_builders_normalize() {
        let one = || Component::new(Element::Number(Number::ONE));
        assert!(one().with_context(Context::new()).context().is_none());
        assert_eq!(one().with_note("! kept").note(), Some("! kept"));
        assert_eq!(one().with_note("!tight").note(), Some("! tight"));
        assert_eq!(one().with_note("two\nlines").note(), Some("! two"));
        assert_eq!(one().with_note("   ").note(), None);
        assert_eq!(one().with_note("!").note(), None);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let mut value = serde_json::to_value(Component::new(Element::Boolean(Boolean::TRUE))).unwrap();
        value["context"] = serde_json::to_value(Context::new()).unwrap();
        value["note"] = serde_json::json!("plain");
        let component: Component = serde_json::from_value(value).unwrap();
        assert!(component.context().is_none());
        assert_eq!(component.note(), Some("! plain"));
    }
}
